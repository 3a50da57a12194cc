//! Lead list and detail views

use super::widgets::{label_line, render_scrollable_list, section_heading};
use crate::app::App;
use crate::backend::{Contact, LeadStatus, QuestionnaireDetail};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

fn status_color(status: LeadStatus) -> Color {
    match status {
        LeadStatus::New => Color::Yellow,
        LeadStatus::Contacted => Color::Blue,
        LeadStatus::Qualified => Color::Green,
        LeadStatus::Closed => Color::DarkGray,
    }
}

/// Per-status counts shown under the list
fn status_summary(leads: &[Contact]) -> Line<'static> {
    let mut spans = vec![Span::raw(" ")];
    for status in LeadStatus::ALL {
        let count = leads.iter().filter(|l| l.status == status).count();
        spans.push(Span::styled(
            format!("{status} {count} "),
            Style::default().fg(status_color(status)),
        ));
    }
    Line::from(spans)
}

/// Draw the lead list
pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let leads = &app.state.leads;
    let block = Block::default()
        .title(format!(" Leads ({}) ", leads.len()))
        .title_bottom(status_summary(leads))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if leads.is_empty() {
        let message = if app.state.backend_connected {
            "No leads yet.\nPress 'r' to reload."
        } else {
            "Backend unreachable.\nPress 'r' to retry."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = leads
        .iter()
        .enumerate()
        .map(|(idx, lead)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let created = lead
                .created_at
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_default();

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(
                    format!("{:<10}", lead.status.as_str()),
                    Style::default().fg(status_color(lead.status)),
                ),
                Span::styled(lead.full_name(), style.add_modifier(Modifier::BOLD)),
                Span::raw("  "),
                Span::styled(&lead.email, Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::styled(created, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    render_scrollable_list(frame, area, List::new(items).block(block), app.state.selected_index);
}

/// Draw the open lead with its questionnaire and appointments
pub fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let detail = &app.state.lead_detail;
    let Some(contact) = &detail.contact else {
        let message = Paragraph::new("Lead not found")
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title(" Lead ").borders(Borders::ALL));
        frame.render_widget(message, area);
        return;
    };

    let mut content = contact_lines(contact);

    let heading = match &detail.questionnaire {
        Some(q) => match q.created_at {
            Some(at) => format!("Fact find #{} ({})", q.id, at.format("%Y-%m-%d")),
            None => format!("Fact find #{}", q.id),
        },
        None => "Fact find".to_string(),
    };
    content.extend(section_heading(&heading));
    match &detail.questionnaire {
        Some(questionnaire) => content.extend(questionnaire_lines(questionnaire)),
        None => content.push(Line::from(Span::styled(
            "No questionnaire on file",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    content.extend(section_heading("Appointments"));
    if detail.appointments.is_empty() {
        content.push(Line::from(Span::styled(
            "None booked",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for appointment in &detail.appointments {
        let mut spans = vec![
            Span::styled("• ", Style::default().fg(Color::Cyan)),
            Span::raw(appointment.scheduled_for.clone()),
            Span::styled(
                format!("  #{}", appointment.id),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if let Some(notes) = &appointment.notes {
            spans.push(Span::styled(
                format!("  {notes}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        content.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset.min(u16::MAX as usize) as u16, 0))
        .block(
            Block::default()
                .title(format!(" {} ", contact.full_name()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(paragraph, area);
}

fn contact_lines(contact: &Contact) -> Vec<Line<'static>> {
    let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

    vec![
        Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                contact.status.to_string(),
                Style::default()
                    .fg(status_color(contact.status))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        label_line("Email", contact.email.clone()),
        label_line("Phone", contact.phone.clone()),
        label_line(
            "Prefers",
            contact
                .contact_preference
                .map(|p| p.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        label_line(
            "Interest",
            contact
                .insurance_interest
                .map(|i| i.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        label_line(
            "Preferred slot",
            format!(
                "{} {}",
                or_dash(&contact.preferred_date),
                contact.preferred_time.clone().unwrap_or_default()
            )
            .trim_end()
            .to_string(),
        ),
        label_line("Notes", or_dash(&contact.notes)),
    ]
}

fn questionnaire_lines(detail: &QuestionnaireDetail) -> Vec<Line<'static>> {
    let answers = &detail.answers;
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let name = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };
    let amount = |v: Option<f64>| v.map(|n| format!("${n:.0}")).unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        label_line("Client", name(&answers.client_name)),
        label_line("Partner", text(&answers.partner_name)),
        label_line("Advisor", name(&answers.advisor_name)),
        label_line("Occupation", text(&answers.occupation)),
        label_line("Annual income", amount(answers.annual_income)),
        label_line("Monthly expenses", amount(answers.monthly_expenses)),
        label_line("Mortgage", amount(answers.mortgage_balance)),
        label_line("Objectives", text(&answers.objectives)),
    ];

    for dependent in &answers.dependents {
        let age = dependent.age.map(|a| format!(", {a}")).unwrap_or_default();
        lines.push(label_line(
            "Dependent",
            format!("{}{} ({})", dependent.name, age, dependent.relationship),
        ));
    }
    for policy in &answers.existing_policies {
        lines.push(label_line(
            "Policy",
            format!(
                "{} {} cover {}",
                policy.provider,
                policy.cover_type,
                amount(policy.sum_insured)
            ),
        ));
    }
    lines
}
