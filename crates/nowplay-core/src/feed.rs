//! Classical MPR playlist-feed client and the supplemental enrichment pass.
//!
//! The player bridge reports essentially nothing useful for the station's
//! live stream (no composer, no position), but the station publishes a
//! "now playing" JSON feed. When the current track's URL is exactly the
//! known stream address, we fetch the feed and overwrite the sparse local
//! metadata with the feed's current entry.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::config::FeedConfig;
use crate::status::{NowPlaying, TickError};

/// Classical MPR's live AAC stream, as the Music app reports it.
pub const CLASSICAL_MPR_STREAM_URL: &str = "https://cms.stream.publicradio.org/cms.aac";
/// The station's public playlist feed.
pub const CLASSICAL_MPR_PLAYLIST_URL: &str =
    "https://nowplaying.publicradio.org/classical-mpr/playlist";

// ── Feed body ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Playlist {
    pub data: PlaylistData,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaylistData {
    /// Ordered newest-first: `songs[0]` is the entry currently on air.
    #[serde(default)]
    pub songs: Vec<Song>,
}

/// One playlist entry. Every field is optional in practice; the feed leaves
/// slots it has no data for as null or empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Song {
    pub title: Option<String>,
    pub composer: Option<String>,
    pub orch_ensemble: Option<String>,
    pub conductor: Option<String>,
    pub soloist_1: Option<String>,
    pub soloist_2: Option<String>,
    pub soloist_3: Option<String>,
    pub soloist_4: Option<String>,
    pub soloist_5: Option<String>,
    pub soloist_6: Option<String>,
    /// `"M:SS"` or `"H:MM:SS"`.
    pub duration: Option<String>,
    /// ISO-8601 timestamp of when the entry started airing.
    pub played_at: Option<String>,
}

// ── Enrichment ────────────────────────────────────────────────────────────────

/// Run the supplemental pass over a raw status.
///
/// Anything that is not the configured stream passes through untouched
/// (including a status with no URL at all). For the stream, a fetch or parse
/// failure fails the whole tick; the reducer handles the fallback.
pub async fn enrich(
    client: &reqwest::Client,
    cfg: &FeedConfig,
    mut status: NowPlaying,
) -> Result<NowPlaying, TickError> {
    if status.url.as_deref() != Some(cfg.stream_url.as_str()) {
        return Ok(status);
    }
    let playlist = fetch_playlist(client, &cfg.playlist_url).await?;
    debug!("feed: {} songs in playlist", playlist.data.songs.len());
    apply_current_song(&mut status, &playlist.data.songs, Utc::now());
    Ok(status)
}

/// GET the playlist feed and decode it.
pub async fn fetch_playlist(
    client: &reqwest::Client,
    url: &str,
) -> Result<Playlist, TickError> {
    let body = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    serde_json::from_str(&body).map_err(|e| TickError::FeedParse(e.to_string()))
}

/// Overwrite the status's track metadata from the feed's current entry.
///
/// Pure so the whole overwrite policy is testable without a socket. A missing
/// current entry leaves the status as-is.
pub fn apply_current_song(status: &mut NowPlaying, songs: &[Song], now: DateTime<Utc>) {
    let Some(current) = songs.first() else {
        return;
    };

    status.name = current.title.clone();
    status.composer = current.composer.clone();
    status.ensemble = current.orch_ensemble.clone();
    status.conductor = current.conductor.clone();
    status.soloists = collect_soloists(songs);

    status.duration = current
        .duration
        .as_deref()
        .map(|d| parse_duration_str(d) as f64);

    // Position is wall clock minus the published start time. Clock skew or a
    // stale feed can push this negative or past the duration; the renderer
    // clamps it.
    status.position = current
        .played_at
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|started| (now - started.with_timezone(&Utc)).num_milliseconds() as f64 / 1000.0);
}

/// Gather the soloist name slots, skipping empty ones.
///
/// TODO: slot 1 is read from the current entry but slots 2-6 come from the
/// next entry in the list. That asymmetry looks like a bug, but the feed
/// rarely fills more than one slot so it has never shown; confirm the
/// intended indexing against live feed data before changing it.
fn collect_soloists(songs: &[Song]) -> Vec<String> {
    let current = songs.first();
    let next = songs.get(1);
    let slots = [
        current.and_then(|s| s.soloist_1.as_deref()),
        next.and_then(|s| s.soloist_2.as_deref()),
        next.and_then(|s| s.soloist_3.as_deref()),
        next.and_then(|s| s.soloist_4.as_deref()),
        next.and_then(|s| s.soloist_5.as_deref()),
        next.and_then(|s| s.soloist_6.as_deref()),
    ];
    slots
        .iter()
        .filter_map(|s| *s)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Duration strings ──────────────────────────────────────────────────────────

/// Parse `[[hours:]minutes:]seconds` into whole seconds.
///
/// Minutes are one or two digits, seconds exactly two. Anything that does
/// not match degrades silently to `0`, which downstream reads as an
/// indeterminate-length track — callers must not rely on observing a parse
/// failure any other way. The whole trimmed string must match: a duration
/// embedded in surrounding text (`"3:456"`, `"dur 3:45"`) is rejected rather
/// than scanned for a valid substring.
pub fn parse_duration_str(s: &str) -> u64 {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let (hours, minutes, seconds) = match parts.as_slice() {
        [m, sec] => ("0", *m, *sec),
        [h, m, sec] => (*h, *m, *sec),
        _ => return 0,
    };

    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hours) || !all_digits(minutes) || !all_digits(seconds) {
        return 0;
    }
    if minutes.len() > 2 || seconds.len() != 2 {
        return 0;
    }

    let h: u64 = hours.parse().unwrap_or(0);
    let m: u64 = minutes.parse().unwrap_or(0);
    let sec: u64 = seconds.parse().unwrap_or(0);
    h * 3600 + m * 60 + sec
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stream_status() -> NowPlaying {
        NowPlaying {
            active: true,
            playing: true,
            name: Some("Classical MPR".into()),
            url: Some(CLASSICAL_MPR_STREAM_URL.into()),
            ..Default::default()
        }
    }

    fn song(title: &str) -> Song {
        Song {
            title: Some(title.into()),
            composer: Some("Sibelius".into()),
            orch_ensemble: Some("Minnesota Orchestra".into()),
            conductor: Some("Osmo Vänskä".into()),
            duration: Some("3:45".into()),
            played_at: Some("2024-03-01T12:00:00-06:00".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_duration_minutes_seconds() {
        assert_eq!(parse_duration_str("3:45"), 225);
        assert_eq!(parse_duration_str("0:07"), 7);
        assert_eq!(parse_duration_str("12:03"), 723);
    }

    #[test]
    fn test_parse_duration_with_hours() {
        assert_eq!(parse_duration_str("1:02:03"), 3723);
        assert_eq!(parse_duration_str("10:00:00"), 36000);
    }

    #[test]
    fn test_parse_duration_malformed_degrades_to_zero() {
        assert_eq!(parse_duration_str("abc"), 0);
        assert_eq!(parse_duration_str(""), 0);
        assert_eq!(parse_duration_str("3:4"), 0); // seconds must be two digits
        assert_eq!(parse_duration_str("3:456"), 0);
        assert_eq!(parse_duration_str("1:2:3:4"), 0);
        assert_eq!(parse_duration_str("-1:30"), 0);
        assert_eq!(parse_duration_str("dur 3:45"), 0); // no embedded-match scan
    }

    #[test]
    fn test_apply_overwrites_metadata() {
        let mut status = stream_status();
        let songs = vec![song("Finlandia")];
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 18, 1, 30).unwrap();
        apply_current_song(&mut status, &songs, now);

        assert_eq!(status.name.as_deref(), Some("Finlandia"));
        assert_eq!(status.composer.as_deref(), Some("Sibelius"));
        assert_eq!(status.ensemble.as_deref(), Some("Minnesota Orchestra"));
        assert_eq!(status.conductor.as_deref(), Some("Osmo Vänskä"));
        assert_eq!(status.duration, Some(225.0));
        // played_at is 18:00:00 UTC; 90 s have elapsed.
        assert_eq!(status.position, Some(90.0));
    }

    #[test]
    fn test_apply_position_may_run_negative() {
        let mut status = stream_status();
        let songs = vec![song("Finlandia")];
        // "Now" predates the published start — clocks disagree.
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 17, 59, 0).unwrap();
        apply_current_song(&mut status, &songs, now);
        assert_eq!(status.position, Some(-60.0));
    }

    #[test]
    fn test_soloist_slots_split_across_entries() {
        let mut first = song("Current");
        first.soloist_1 = Some("Joshua Bell".into());
        first.soloist_2 = Some("ignored: slot 2 of the current entry".into());
        let mut second = song("Previous");
        second.soloist_2 = Some("Yo-Yo Ma".into());
        second.soloist_4 = Some("  ".into()); // blank slots are skipped

        let mut status = stream_status();
        apply_current_song(&mut status, &[first, second], Utc::now());
        assert_eq!(status.soloists, vec!["Joshua Bell", "Yo-Yo Ma"]);
    }

    #[test]
    fn test_apply_with_empty_playlist_is_a_no_op() {
        let mut status = stream_status();
        let before = status.clone();
        apply_current_song(&mut status, &[], Utc::now());
        assert_eq!(status, before);
    }

    #[test]
    fn test_malformed_feed_duration_yields_indeterminate() {
        let mut entry = song("Live broadcast");
        entry.duration = Some("n/a".into());
        let mut status = stream_status();
        apply_current_song(&mut status, &[entry], Utc::now());
        assert_eq!(status.duration, Some(0.0));
        assert!(status.is_indeterminate());
    }

    #[tokio::test]
    async fn test_enrich_skips_other_urls() {
        let client = reqwest::Client::new();
        let cfg = FeedConfig::default();

        let mut status = stream_status();
        status.url = Some("https://example.com/other.aac".into());
        let before = status.clone();
        // No network touched: the URL gate short-circuits first.
        let out = enrich(&client, &cfg, status).await.unwrap();
        assert_eq!(out, before);

        let mut no_url = stream_status();
        no_url.url = None;
        let before = no_url.clone();
        let out = enrich(&client, &cfg, no_url).await.unwrap();
        assert_eq!(out, before);
    }

    #[test]
    fn test_playlist_body_decodes() {
        let body = r#"{
            "data": {
                "songs": [
                    {
                        "title": "Finlandia",
                        "composer": "Jean Sibelius",
                        "orch_ensemble": "Minnesota Orchestra",
                        "conductor": null,
                        "soloist_1": "",
                        "duration": "8:50",
                        "played_at": "2024-03-01T12:00:00-06:00"
                    }
                ]
            }
        }"#;
        let playlist: Playlist = serde_json::from_str(body).unwrap();
        let current = &playlist.data.songs[0];
        assert_eq!(current.title.as_deref(), Some("Finlandia"));
        assert!(current.conductor.is_none());
        assert_eq!(parse_duration_str(current.duration.as_deref().unwrap()), 530);
    }
}
