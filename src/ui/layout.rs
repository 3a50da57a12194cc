//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::{
    ADD_ENTRY_SHORTCUT, NEXT_SHORTCUT, PREV_SHORTCUT, REMOVE_ENTRY_SHORTCUT, SAVE_SHORTCUT,
};
use crate::questionnaire::{NotificationLevel, Phase};
use crate::state::{Section, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SIDEBAR_WIDTH: u16 = 20;
const QUIT_HINT: &str = " ^C:quit ";

/// Split the screen into sidebar and main content, leaving the bottom row
/// for the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[0]);

    (columns[0], columns[1])
}

/// Draw the sidebar with one boxed button per section
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let mut constraints = vec![Constraint::Min(0)];
    constraints.extend(Section::ALL.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let current = app.state.current_view.section();
    for (idx, section) in Section::ALL.iter().enumerate() {
        render_sidebar_button(
            frame,
            chunks[idx + 1],
            section.hotkey(),
            section.label(),
            *section == current,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![if app.state.backend_connected {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    }];

    spans.push(Span::styled(
        view_hints(app),
        Style::default().fg(Color::Gray),
    ));

    if let Some(toast) = &app.state.toast {
        let color = match toast.level {
            NotificationLevel::Info => Color::Cyan,
            NotificationLevel::Success => Color::Green,
            NotificationLevel::Error => Color::Red,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(&toast.message, Style::default().fg(color)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_width = QUIT_HINT.len() as u16;
    if status_area.width > quit_width {
        let quit_area = Rect {
            x: status_area.right() - quit_width,
            width: quit_width,
            ..status_area
        };
        let quit_widget =
            Paragraph::new(QUIT_HINT).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
        frame.render_widget(quit_widget, quit_area);
    }
}

/// Keyboard hints for the current view
fn view_hints(app: &App) -> String {
    match app.state.current_view {
        View::Questionnaire => match app.form.phase() {
            Phase::Step(_) => format!(
                "Tab:field  {NEXT_SHORTCUT}:next  {PREV_SHORTCUT}:back  {SAVE_SHORTCUT}:save  \
                 {ADD_ENTRY_SHORTCUT}/{REMOVE_ENTRY_SHORTCUT}:entry  ←/→:choose"
            ),
            Phase::Submitting => "Submitting...".to_string(),
            Phase::Submitted => "Enter:new fact find  F2:leads".to_string(),
        },
        View::Leads => "j/k:nav  Enter:open  r:reload  q:quit".to_string(),
        View::LeadDetail => "s:advance status  b:book  y:copy email  j/k:scroll  Esc:back".to_string(),
        View::Blog => "j/k:nav  Enter:read  r:reload  q:quit".to_string(),
        View::BlogPost => "j/k:scroll  d/u:page  Esc:back".to_string(),
    }
}
