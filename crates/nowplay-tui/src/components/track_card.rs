//! The now-playing card: title, composer, progress bar, and three glyph-led
//! detail columns (soloists / ensemble / conductor).
//!
//! Everything here is a pure function of the view model; the card holds no
//! state of its own. An inactive view model draws nothing at all — the
//! widget simply disappears rather than showing a placeholder.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use nowplay_core::status::NowPlaying;

use crate::theme::{style_icon, style_secondary, style_title};
use crate::widgets::progress_bar::draw_bar;

const ICON_SOLOISTS: &str = "★";
const ICON_ENSEMBLE: &str = "♫";
const ICON_CONDUCTOR: &str = "♚";

/// Draw the card into `area`. No-op when the player is inactive.
pub fn draw(frame: &mut Frame, area: Rect, vm: &NowPlaying) {
    if !vm.active || area.height < 5 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // composer
            Constraint::Length(1),
            Constraint::Length(1), // progress bar
            Constraint::Length(1),
            Constraint::Min(2), // detail columns
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(title_line(vm)).alignment(Alignment::Center),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(composer_line(vm)).alignment(Alignment::Center),
        rows[1],
    );
    draw_bar(frame, rows[3], vm);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(rows[5]);

    let ensemble: Vec<String> = vm.ensemble.iter().cloned().collect();
    let conductor: Vec<String> = vm.conductor.iter().cloned().collect();
    let groups: [(&str, &[String]); 3] = [
        (ICON_SOLOISTS, &vm.soloists),
        (ICON_ENSEMBLE, &ensemble),
        (ICON_CONDUCTOR, &conductor),
    ];

    for (i, (icon, names)) in groups.iter().enumerate() {
        let col = cols[i];
        frame.render_widget(
            Paragraph::new(detail_lines(icon, names, col.width as usize))
                .alignment(Alignment::Center),
            col,
        );
    }
}

fn title_line(vm: &NowPlaying) -> Line<'static> {
    Line::from(Span::styled(
        vm.name.clone().unwrap_or_default(),
        style_title(),
    ))
}

fn composer_line(vm: &NowPlaying) -> Line<'static> {
    Line::from(Span::styled(
        vm.composer.clone().unwrap_or_default(),
        style_secondary(),
    ))
}

/// One detail column: the glyph on top, then one line per (wrapped) name.
/// A group with nothing to show still gets its glyph — an empty group, not
/// an error marker.
fn detail_lines(icon: &str, names: &[String], width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(icon.to_string(), style_icon()))];
    let wrap_width = width.saturating_sub(2).max(8);
    for name in names {
        for piece in word_wrap(name, wrap_width) {
            lines.push(Line::from(Span::styled(piece, style_secondary())));
        }
    }
    lines
}

fn word_wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current.clone());
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
