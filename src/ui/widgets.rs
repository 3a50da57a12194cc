//! Reusable UI widget helpers

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListState},
    Frame,
};

/// Render a list that scrolls to keep the selected item visible
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// `Label: value` line used by detail views
pub fn label_line<'a>(label: &'a str, value: impl Into<String>) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value.into()),
    ])
}

pub fn section_heading(title: &str) -> Vec<Line<'_>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "─".repeat(40),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
    ]
}

/// Render markdown into styled terminal lines
pub fn markdown_lines<'a>(markdown: &str) -> Vec<Line<'a>> {
    let mut lines: Vec<Line<'a>> = Vec::new();
    let mut spans: Vec<Span<'a>> = Vec::new();
    let mut styles = vec![Style::default()];
    // One entry per open list: next number for ordered lists
    let mut lists: Vec<Option<u64>> = Vec::new();
    let mut in_code = false;

    fn flush<'b>(lines: &mut Vec<Line<'b>>, spans: &mut Vec<Span<'b>>) {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    }

    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        let style = styles.last().copied().unwrap_or_default();
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush(&mut lines, &mut spans);
                styles.push(heading_style(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut lines, &mut spans);
                styles.pop();
                lines.push(Line::from(""));
            }
            Event::End(TagEnd::Paragraph) => {
                flush(&mut lines, &mut spans);
                if lists.is_empty() {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::BlockQuote(_)) => {
                flush(&mut lines, &mut spans);
                styles.push(
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::ITALIC),
                );
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                flush(&mut lines, &mut spans);
                styles.pop();
            }
            Event::Start(Tag::List(first)) => {
                flush(&mut lines, &mut spans);
                lists.push(first);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut lines, &mut spans);
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        *n += 1;
                        format!("{indent}{}. ", *n - 1)
                    }
                    _ => format!("{indent}• "),
                };
                spans.push(Span::styled(marker, Style::default().fg(Color::Cyan)));
            }
            Event::End(TagEnd::Item) => flush(&mut lines, &mut spans),
            Event::Start(Tag::CodeBlock(_)) => {
                flush(&mut lines, &mut spans);
                in_code = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::Emphasis) => styles.push(style.add_modifier(Modifier::ITALIC)),
            Event::Start(Tag::Strong) => styles.push(style.add_modifier(Modifier::BOLD)),
            Event::Start(Tag::Strikethrough) => {
                styles.push(style.add_modifier(Modifier::CROSSED_OUT));
            }
            Event::End(TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough) => {
                styles.pop();
            }
            Event::Text(text) if in_code => {
                lines.extend(text.lines().map(|l| {
                    Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Yellow)))
                }));
            }
            Event::Text(text) => spans.push(Span::styled(text.into_string(), style)),
            Event::Code(code) => spans.push(Span::styled(
                code.into_string(),
                Style::default().fg(Color::Yellow),
            )),
            Event::SoftBreak => spans.push(Span::styled(" ", style)),
            Event::HardBreak => flush(&mut lines, &mut spans),
            Event::Rule => {
                flush(&mut lines, &mut spans);
                lines.push(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            _ => {}
        }
    }
    flush(&mut lines, &mut spans);

    while lines.last().is_some_and(|l| l.width() == 0) {
        lines.pop();
    }
    lines
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        HeadingLevel::H2 => Style::default().fg(Color::Cyan),
        _ => Style::default().fg(Color::Blue),
    }
}
