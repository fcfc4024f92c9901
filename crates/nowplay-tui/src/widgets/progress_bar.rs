//! Three-mode progress bar: playing, paused, indeterminate.
//!
//! The mode is decided fresh on every render call, nothing is persisted.
//! A non-positive (or unknown) duration means indeterminate: the track shows
//! a diagonal-stripe pattern and the fill fraction is pinned to 0 instead of
//! a proportional fill. Paused is checked independently and only changes the
//! colours — a paused live stream keeps its stripes but turns red.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use nowplay_core::status::NowPlaying;

use crate::theme::{C_BAR, C_BAR_TRACK, C_MUTED, C_PAUSED, C_PAUSED_TRACK, C_SECONDARY};

/// Resolved visual state of the bar for one render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarVisual {
    /// Fill fraction in `0.0..=1.0`. Always 0 when indeterminate.
    pub fill: f64,
    pub indeterminate: bool,
    pub paused: bool,
}

/// Decide the bar's visual state from the view model.
///
/// Clamping out-of-range positions is our job, not the enricher's: the feed
/// position is wall-clock derived and can be negative or past the end.
pub fn bar_visual(vm: &NowPlaying) -> BarVisual {
    let indeterminate = vm.is_indeterminate();
    let fill = if indeterminate {
        0.0
    } else {
        let duration = vm.duration.unwrap_or(0.0);
        (vm.position.unwrap_or(0.0) / duration).clamp(0.0, 1.0)
    };
    BarVisual {
        fill,
        indeterminate,
        paused: !vm.playing,
    }
}

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Build the bar body: a smooth eighth-block fill over a dotted track, or a
/// repeating stripe pattern when indeterminate. Returns (fill, track) halves
/// so the caller can colour them independently.
pub fn bar_strings(visual: BarVisual, width: usize) -> (String, String) {
    if width == 0 {
        return (String::new(), String::new());
    }

    if visual.indeterminate {
        // Fixed stripe texture across the whole track, no proportional fill.
        let stripes: String = (0..width).map(|i| if i % 2 == 0 { '╱' } else { ' ' }).collect();
        return (String::new(), stripes);
    }

    let eighths = (visual.fill * width as f64 * 8.0) as usize;
    let full = eighths / 8;
    let partial = eighths % 8;

    let mut fill = String::with_capacity(width);
    for _ in 0..full {
        fill.push('█');
    }
    let mut track = String::with_capacity(width);
    if full < width {
        if partial > 0 {
            fill.push(BLOCKS[partial]);
        } else {
            track.push('·');
        }
        for _ in (full + 1)..width {
            track.push('·');
        }
    }
    (fill, track)
}

/// Render the bar with flanking time labels in `area`.
pub fn draw_bar(frame: &mut Frame, area: Rect, vm: &NowPlaying) {
    if area.width < 8 || area.height == 0 {
        return;
    }

    let visual = bar_visual(vm);

    let left_label = vm.position.map(fmt_time).unwrap_or_default();
    let right_label = if visual.indeterminate {
        "--:--".to_string()
    } else {
        vm.duration.map(fmt_time).unwrap_or_default()
    };
    let label_w = left_label.len() + right_label.len() + 2;
    let bar_w = (area.width as usize).saturating_sub(label_w).max(4);

    // Paused colours take precedence over everything, indeterminate styling
    // included.
    let (fill_style, track_style) = if visual.paused {
        (
            Style::default().fg(C_PAUSED),
            Style::default().fg(C_PAUSED_TRACK),
        )
    } else if visual.indeterminate {
        (Style::default().fg(C_BAR), Style::default().fg(C_MUTED))
    } else {
        (Style::default().fg(C_BAR), Style::default().fg(C_BAR_TRACK))
    };

    let (fill, track) = bar_strings(visual, bar_w);

    let mut spans = Vec::new();
    if !left_label.is_empty() {
        spans.push(Span::styled(
            format!("{} ", left_label),
            Style::default().fg(C_SECONDARY),
        ));
    }
    spans.push(Span::styled(fill, fill_style));
    spans.push(Span::styled(track, track_style));
    if !right_label.is_empty() {
        spans.push(Span::styled(
            format!(" {}", right_label),
            Style::default().fg(C_SECONDARY),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn fmt_time(secs: f64) -> String {
    if secs < 0.0 {
        return "0:00".to_string();
    }
    let s = secs as u64;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let s = s % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
