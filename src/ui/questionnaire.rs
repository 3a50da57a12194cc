//! Fact-find questionnaire page

use super::components::{
    draw_field, field_height, render_action_button, FieldView, BUTTON_HEIGHT,
};
use crate::app::App;
use crate::platform::{NEXT_SHORTCUT, PREV_SHORTCUT, SAVE_SHORTCUT};
use crate::questionnaire::{FocusSlot, Phase, StepDefinition, STEP_COUNT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Wrap},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    match app.form.phase() {
        Phase::Step(_) => draw_step(frame, area, app),
        Phase::Submitting => draw_message(
            frame,
            area,
            "Submitting",
            Color::Yellow,
            &["Sending your fact find to the office...", "Please wait."],
        ),
        Phase::Submitted => draw_message(
            frame,
            area,
            "Thank you",
            Color::Green,
            &[
                "Your fact find has been received.",
                "Your advisor will be in touch shortly.",
                "",
                "Press Enter to start a new fact find.",
            ],
        ),
    }
}

fn draw_step(frame: &mut Frame, area: Rect, app: &App) {
    let step = app.form.current_step();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),             // Progress header
            Constraint::Min(0),                // Fields
            Constraint::Length(BUTTON_HEIGHT), // Actions
        ])
        .split(area);

    draw_header(frame, chunks[0], step);
    draw_fields(frame, chunks[1], app);
    draw_actions(frame, chunks[2], step);
}

fn draw_header(frame: &mut Frame, area: Rect, step: &StepDefinition) {
    let block = Block::default()
        .title(format!(" Step {} of {} - {} ", step.index, STEP_COUNT, step.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let mut intro = vec![Span::styled(step.intro, Style::default().fg(Color::Gray))];
    if step.required_fields().next().is_some() {
        intro.push(Span::styled(
            "  (* required)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(intro)), rows[0]);
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(Color::Cyan))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .ratio(step.index as f64 / STEP_COUNT as f64);
    frame.render_widget(gauge, rows[1]);
}

fn draw_fields(frame: &mut Frame, area: Rect, app: &App) {
    let slots = app.form.slots();
    let heights: Vec<u16> = slots
        .iter()
        .map(|s| field_height(s.is_multiline()))
        .collect();
    let focus = app.form.focus();
    let (start, end) = visible_window(&heights, focus, area.height);

    let mut y = area.y;
    for (offset, slot) in slots[start..end].iter().enumerate() {
        let idx = start + offset;
        let height = heights[idx].min(area.bottom().saturating_sub(y));
        if height == 0 {
            break;
        }
        let field_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        let label = match slot {
            FocusSlot::Field(field) if field.is_required() => format!("{} *", slot.label()),
            _ => slot.label(),
        };
        let value = slot.display_value(app.form.values());
        draw_field(
            frame,
            field_area,
            FieldView {
                label: &label,
                value: &value,
                is_active: idx == focus,
                is_multiline: slot.is_multiline(),
                error: slot_error(app, slot),
            },
        );
        y += height;
    }
}

/// Errors are keyed by field; a group's error shows on its add control
fn slot_error<'a>(app: &'a App, slot: &FocusSlot) -> Option<&'a str> {
    match slot {
        FocusSlot::Cell { .. } => None,
        _ => app.form.errors().get(slot.field().name),
    }
}

/// Range of slots to draw so the focused one is on screen. Scrolls by
/// whole fields and prefers showing the fields above the focus.
pub fn visible_window(heights: &[u16], focus: usize, available: u16) -> (usize, usize) {
    if heights.is_empty() {
        return (0, 0);
    }
    let focus = focus.min(heights.len() - 1);

    // Walk back from the focus while the fields still fit
    let mut start = focus;
    let mut used = heights[focus];
    while start > 0 && used + heights[start - 1] <= available {
        start -= 1;
        used += heights[start];
    }

    // Then fill any room below it
    let mut end = focus + 1;
    while end < heights.len() && used + heights[end] <= available {
        used += heights[end];
        end += 1;
    }

    (start, end)
}

fn draw_actions(frame: &mut Frame, area: Rect, step: &StepDefinition) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    render_action_button(frame, chunks[0], "Previous", PREV_SHORTCUT, step.index > 1, false);
    render_action_button(frame, chunks[1], "Save", SAVE_SHORTCUT, true, false);
    let forward = if step.is_last() { "Submit" } else { "Next" };
    render_action_button(frame, chunks[2], forward, NEXT_SHORTCUT, true, true);
}

fn draw_message(frame: &mut Frame, area: Rect, title: &str, color: Color, lines: &[&str]) {
    let mut content = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    content.extend(lines.iter().map(|l| Line::from(*l)));

    let top_padding = area.height.saturating_sub(content.len() as u16 + 2) / 2;
    let mut padded = vec![Line::from(""); top_padding as usize];
    padded.extend(content);

    let paragraph = Paragraph::new(padded)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Fact Find ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(paragraph, area);
}
