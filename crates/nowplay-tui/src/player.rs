//! Player automation bridge.
//!
//! Queries the Music app through `osascript -l JavaScript`. The embedded JXA
//! probe wraps every field lookup in its own try/catch so one missing
//! property degrades to null instead of sinking the whole record; on the
//! Rust side serde defaults do the same for fields the probe never emitted.
//! Only an unreachable bridge, a timeout, or unparseable stdout fails the
//! query.

use std::time::Duration;

use nowplay_core::status::{NowPlaying, TickError};
use tracing::{debug, warn};

/// Hard ceiling on the bridge round-trip, well under the tick period.
const QUERY_TIMEOUT: Duration = Duration::from_secs(4);

/// JXA probe. Emits one JSON object on stdout. `active` stays false when the
/// Music process is not running; every other lookup is best-effort.
const PROBE_SCRIPT: &str = r#"
const out = {active: false, playing: false, name: null, url: null, position: null, duration: null, composer: null, soloists: [], ensemble: null, conductor: null}
if (Application('Music').running()) {
    out.active = true
    const music = Application('Music')
    try { out.playing = music.playerState() === 'playing' } catch (e) {}
    try { out.name = music.currentTrack.name() } catch (e) {}
    try { out.url = music.currentTrack.address() } catch (e) {}
    try { out.position = music.playerPosition() } catch (e) {}
    try { out.duration = music.currentTrack.duration() } catch (e) {}
    try { out.composer = music.currentTrack.composer() } catch (e) {}
    try { out.ensemble = music.currentTrack.artist() } catch (e) {}
}
JSON.stringify(out)
"#;

/// Run the probe and parse its output.
pub async fn query() -> Result<NowPlaying, TickError> {
    let run = tokio::process::Command::new("osascript")
        .args(["-l", "JavaScript", "-e", PROBE_SCRIPT])
        .stdin(std::process::Stdio::null())
        .output();

    let output = tokio::time::timeout(QUERY_TIMEOUT, run)
        .await
        .map_err(|_| TickError::PlayerQuery("osascript timed out".to_string()))?
        .map_err(|e| TickError::PlayerQuery(format!("osascript spawn: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        warn!("player: osascript exited {}: {}", output.status, stderr.trim());
        return Err(TickError::PlayerQuery(format!(
            "osascript exited {}",
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let status = parse_bridge_output(&stdout)?;
    debug!(
        "player: active={} playing={} name={:?}",
        status.active, status.playing, status.name
    );
    Ok(status)
}

/// Decode the probe's stdout. Tolerant of fields the probe left out — serde
/// defaults fill them as unknown — but a body that is not our JSON object at
/// all is a bridge failure.
fn parse_bridge_output(stdout: &str) -> Result<NowPlaying, TickError> {
    serde_json::from_str(stdout.trim())
        .map_err(|e| TickError::PlayerQuery(format!("bridge output parse: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inactive_player() {
        let out = r#"{"active": false, "playing": false, "name": null, "url": null, "position": null, "duration": null, "composer": null, "soloists": [], "ensemble": null, "conductor": null}"#;
        let status = parse_bridge_output(out).unwrap();
        assert!(!status.active);
        assert!(!status.playing);
        assert!(status.name.is_none());
    }

    #[test]
    fn test_parse_active_track() {
        let out = r#"{"active": true, "playing": true, "name": "Finlandia", "url": null, "position": 12.5, "duration": 530.0, "composer": "Sibelius", "soloists": [], "ensemble": "Minnesota Orchestra", "conductor": null}"#;
        let status = parse_bridge_output(out).unwrap();
        assert!(status.active);
        assert_eq!(status.name.as_deref(), Some("Finlandia"));
        assert_eq!(status.position, Some(12.5));
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        // A field the probe could not read is simply absent from the record.
        let status = parse_bridge_output(r#"{"active": true, "playing": false}"#).unwrap();
        assert!(status.active);
        assert!(status.url.is_none());
        assert!(status.soloists.is_empty());
    }

    #[test]
    fn test_parse_garbage_is_a_bridge_failure() {
        assert!(matches!(
            parse_bridge_output("execution error: Music got an error"),
            Err(TickError::PlayerQuery(_))
        ));
    }
}
