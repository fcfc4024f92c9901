//! App — terminal lifecycle and the tick-driven fetch loop.
//!
//! Every poll tick runs the same chain: query the player bridge, then (for
//! the known stream) the playlist enrichment, then fold the outcome into the
//! persisted view model. The view model is the only cross-tick state and is
//! written in exactly one place, when a chain's result message arrives. At
//! most one chain is in flight; a tick that fires while one is pending is
//! skipped.

use std::io;
use std::time::Duration;

use anyhow::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use nowplay_core::config::Config;
use nowplay_core::feed;
use nowplay_core::status::{reduce, NowPlaying, TickError};

use crate::components::track_card;
use crate::player;

/// Widest the card ever gets; narrower terminals use their full width.
const CARD_MAX_WIDTH: u16 = 64;

enum AppMessage {
    /// Keyboard input from the blocking reader task.
    Event(Event),
    /// Outcome of one fetch chain (player query + enrichment).
    TickResult(Result<NowPlaying, TickError>),
}

pub struct App {
    config: Config,
    client: reqwest::Client,
    /// The persisted view model. Replaced wholesale through `reduce`.
    view: NowPlaying,
    fetch_in_flight: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.feed.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            client,
            view: NowPlaying::default(),
            fetch_in_flight: false,
            should_quit: false,
        })
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(64);

        // ── Background task: keyboard events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Poll tick ─────────────────────────────────────────────────────────
        let mut poll_tick =
            tokio::time::interval(Duration::from_secs(self.config.polling.interval_secs.max(1)));
        poll_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        info!(
            "polling every {}s, stream gate {}",
            self.config.polling.interval_secs, self.config.feed.stream_url
        );

        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                _ = poll_tick.tick() => {
                    if !self.fetch_in_flight {
                        self.fetch_in_flight = true;
                        self.spawn_fetch_chain(tx.clone());
                    } else {
                        debug!("tick skipped: previous fetch still pending");
                    }
                }
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    /// Spawn one fetch chain: player bridge, then the feed pass. The result
    /// comes back as a message so this loop stays the only writer of `view`.
    fn spawn_fetch_chain(&self, tx: mpsc::Sender<AppMessage>) {
        let client = self.client.clone();
        let feed_cfg = self.config.feed.clone();
        tokio::spawn(async move {
            let result = match player::query().await {
                Ok(raw) => feed::enrich(&client, &feed_cfg, raw).await,
                Err(e) => Err(e),
            };
            let _ = tx.send(AppMessage::TickResult(result)).await;
        });
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::TickResult(result) => {
                if let Err(e) = &result {
                    warn!("tick failed: {}", e);
                }
                self.fetch_in_flight = false;
                let previous = std::mem::take(&mut self.view);
                self.view = reduce(Some(result), previous);
                true
            }
            AppMessage::Event(Event::Key(key)) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.should_quit = true
                    }
                    _ => {}
                }
                self.should_quit
            }
            AppMessage::Event(Event::Resize(_, _)) => true,
            AppMessage::Event(_) => false,
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&self, frame: &mut Frame) {
        // Inactive: nothing at all. The card disappears rather than showing
        // stale or placeholder text.
        if !self.view.active {
            return;
        }
        let area = card_area(frame.area());
        track_card::draw(frame, area, &self.view);
    }
}

/// Horizontally centered card rect, capped at `CARD_MAX_WIDTH` columns.
fn card_area(r: Rect) -> Rect {
    let width = r.width.min(CARD_MAX_WIDTH);
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    Rect::new(x, r.y, width, r.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_area_centers_and_caps() {
        let area = card_area(Rect::new(0, 0, 200, 40));
        assert_eq!(area.width, CARD_MAX_WIDTH);
        assert_eq!(area.x, (200 - CARD_MAX_WIDTH) / 2);
        assert_eq!(area.height, 40);
    }

    #[test]
    fn test_card_area_narrow_terminal_uses_full_width() {
        let area = card_area(Rect::new(0, 0, 40, 10));
        assert_eq!(area.width, 40);
        assert_eq!(area.x, 0);
    }
}
