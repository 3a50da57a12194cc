//! Base dialog component

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Configuration for rendering a dialog
pub struct DialogConfig<'a> {
    pub title: &'a str,
    /// Colour of the title and border
    pub color: Color,
    /// Message content (can be multi-line with \n)
    pub message: &'a str,
    /// Hint line shown at the bottom
    pub hint: Option<Vec<Span<'a>>>,
    pub max_width: u16,
}

/// Render a centered dialog overlay
pub fn render_dialog(frame: &mut Frame, config: DialogConfig) {
    let area = frame.area();
    let padding = 4u16;
    let max_line_width = config.max_width.saturating_sub(padding).max(1) as usize;

    let wrapped_lines = wrap_text(config.message, max_line_width);

    let content_width = content_width(config.title, &wrapped_lines, config.hint.as_deref());
    let dialog_width = content_width
        .saturating_add(padding + 2)
        .min(config.max_width)
        .min(area.width);

    // title + blank + message + (blank + hint) + borders
    let hint_lines = if config.hint.is_some() { 2 } else { 0 };
    let dialog_height = (2 + wrapped_lines.len() as u16 + hint_lines + 2)
        .max(5)
        .min(area.height);

    let dialog_area = Rect {
        x: area.x + area.width.saturating_sub(dialog_width) / 2,
        y: area.y + area.height.saturating_sub(dialog_height) / 2,
        width: dialog_width,
        height: dialog_height,
    };

    frame.render_widget(Clear, dialog_area);

    let mut content = vec![
        Line::from(Span::styled(
            config.title,
            Style::default()
                .fg(config.color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    content.extend(wrapped_lines.into_iter().map(Line::from));

    if let Some(hint_spans) = config.hint {
        content.push(Line::from(""));
        content.push(Line::from(hint_spans));
    }

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(config.color)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(dialog, dialog_area);
}

/// Widest of the title, the wrapped message lines and the hint line
fn content_width(title: &str, lines: &[String], hint: Option<&[Span]>) -> u16 {
    let hint_width = hint
        .map(|spans| spans.iter().map(|s| s.content.chars().count()).sum())
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title.chars().count())
        .max(hint_width)
        .min(u16::MAX as usize) as u16
}

/// Greedy word wrap; explicit newlines are kept
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = current.chars().count() + word.chars().count() + 1;
            if needed > max_width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_wrap_breaks_on_words() {
        let lines = wrap_text("Failed to load leads: backend returned 502", 20);
        assert_eq!(
            lines,
            vec!["Failed to load", "leads: backend", "returned 502"]
        );
    }

    #[test]
    fn test_wrap_keeps_blank_lines() {
        assert_eq!(wrap_text("one\n\ntwo", 40), vec!["one", "", "two"]);
        assert_eq!(wrap_text("", 40), vec![""]);
    }

    #[test]
    fn test_hint_widens_short_message() {
        let hint = [Span::raw("Press Enter"), Span::raw(" to dismiss")];
        let lines = vec!["oops".to_string()];
        assert_eq!(content_width("Error", &lines, Some(&hint)), 22);
        assert_eq!(content_width("Error", &lines, None), 5);
    }

    #[test]
    fn test_hint_is_drawn_in_full() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| {
                render_dialog(
                    f,
                    DialogConfig {
                        title: "Error",
                        color: Color::Red,
                        message: "oops",
                        hint: Some(vec![Span::raw("Press Enter or Esc to dismiss")]),
                        max_width: 60,
                    },
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = (0..20)
            .flat_map(|y| (0..80).map(move |x| (x, y)))
            .map(|pos| buffer[pos].symbol().to_string())
            .collect();
        assert!(screen.contains("Press Enter or Esc to dismiss"));
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let lines = wrap_text("see https://example.nz/a/very/long/path", 10);
        assert_eq!(lines, vec!["see", "https://example.nz/a/very/long/path"]);
    }
}
