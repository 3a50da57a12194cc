//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a bordered button. `accent` colours the border and text when
/// the button is highlighted.
fn render_button(
    frame: &mut Frame,
    area: Rect,
    content: &str,
    accent: Option<Color>,
    is_enabled: bool,
) {
    let (border_style, text_style) = match accent {
        Some(color) if is_enabled => (
            Style::default().fg(color),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        _ if !is_enabled => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        ),
        _ => (Style::default().fg(Color::DarkGray), Style::default()),
    };

    let paragraph = Paragraph::new(format!(" {content} ")).style(text_style);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(paragraph.block(block), area);
}

/// Render a sidebar button with its hotkey and label
pub fn render_sidebar_button(
    frame: &mut Frame,
    area: Rect,
    hotkey: &str,
    label: &str,
    is_selected: bool,
) {
    let content = format!("{hotkey} {label}");
    let accent = is_selected.then_some(Color::Cyan);
    render_button(frame, area, &content, accent, true);
}

/// Render a form action button. The primary action is drawn in green.
pub fn render_action_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    shortcut: &str,
    is_enabled: bool,
    is_primary: bool,
) {
    let content = format!("{label} ({shortcut})");
    let accent = is_primary.then_some(Color::Green);
    render_button(frame, area, &content, accent, is_enabled);
}
