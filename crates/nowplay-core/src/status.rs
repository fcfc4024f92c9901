//! Now-playing status model and the per-tick reducer.
//!
//! One shape serves three roles: the raw status from the player bridge, the
//! enriched status after the feed pass, and the view model the renderer
//! reads. Only the view model survives across ticks, and it is written
//! exclusively through [`reduce`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the local player is doing right now, plus whatever track metadata
/// could be gathered. Every field except `active`/`playing` is best-effort:
/// `None` (or an empty list) means "unknown", never zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NowPlaying {
    /// True iff the player process is running. When false, no other field
    /// is meaningful.
    pub active: bool,
    /// True iff the player reports it is actually playing (not paused).
    pub playing: bool,
    pub name: Option<String>,
    /// Stream address of the current track, when the player exposes one.
    /// Exact equality against the configured stream URL gates enrichment.
    pub url: Option<String>,
    /// Seconds into the current track. May be negative or past `duration`
    /// after enrichment; the renderer clamps, not us.
    pub position: Option<f64>,
    /// Track length in seconds. `<= 0` (or unknown) means indeterminate,
    /// e.g. a live stream.
    pub duration: Option<f64>,
    pub composer: Option<String>,
    pub soloists: Vec<String>,
    pub ensemble: Option<String>,
    pub conductor: Option<String>,
}

impl NowPlaying {
    /// Indeterminate-length sentinel: no duration, or a non-positive one.
    pub fn is_indeterminate(&self) -> bool {
        self.duration.unwrap_or(0.0) <= 0.0
    }
}

/// Why a tick produced no usable status.
#[derive(Debug, Error)]
pub enum TickError {
    /// The osascript bridge could not be reached, timed out, or returned
    /// output we could not parse at all.
    #[error("player query failed: {0}")]
    PlayerQuery(String),
    /// The playlist feed could not be fetched.
    #[error("playlist fetch failed: {0}")]
    FeedFetch(#[from] reqwest::Error),
    /// The playlist feed body was not the JSON shape we expect.
    #[error("playlist response malformed: {0}")]
    FeedParse(String),
}

/// Fold one tick's outcome into the persisted view model.
///
/// Any error resets to the inactive default — stale track info after a
/// failure is worse than a blank card, so there is no partial recovery; the
/// next tick is the only retry. `None` (a tick that produced neither output
/// nor error, which should not normally happen) leaves the previous view
/// model in place.
pub fn reduce(tick: Option<Result<NowPlaying, TickError>>, previous: NowPlaying) -> NowPlaying {
    match tick {
        Some(Ok(next)) => next,
        Some(Err(_)) => NowPlaying::default(),
        None => previous,
    }
}
