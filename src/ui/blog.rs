//! Blog list and post views

use super::widgets::{markdown_lines, render_scrollable_list};
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let posts = &app.state.posts;
    let block = Block::default()
        .title(" Blog ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if posts.is_empty() {
        let content = Paragraph::new(format!(
            "No posts found in {}.\nAdd markdown files with a title and date, then press 'r'.",
            app.blog_dir().display()
        ))
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false })
        .block(block);
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = posts
        .iter()
        .enumerate()
        .map(|(idx, post)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(
                        post.date.format("%Y-%m-%d").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::raw("  "),
                    Span::styled(&post.title, style.add_modifier(Modifier::BOLD)),
                ]),
                Line::from(Span::styled(
                    format!("    {}", post.excerpt),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    render_scrollable_list(frame, area, List::new(items).block(block), app.state.selected_index);
}

pub fn draw_post(frame: &mut Frame, area: Rect, app: &App) {
    let Some(post) = &app.state.open_post else {
        let message = Paragraph::new("Post not found")
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title(" Blog ").borders(Borders::ALL));
        frame.render_widget(message, area);
        return;
    };

    let mut content = vec![
        Line::from(Span::styled(
            post.date.format("%e %B %Y").to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];
    content.extend(markdown_lines(&post.markdown));

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset.min(u16::MAX as usize) as u16, 0))
        .block(
            Block::default()
                .title(format!(" {} ", post.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(paragraph, area);
}
