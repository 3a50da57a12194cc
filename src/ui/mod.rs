//! UI module for rendering the TUI

mod blog;
mod components;
mod layout;
mod leads;
mod questionnaire;
mod widgets;

use crate::app::App;
use crate::state::View;
use components::render_error_dialog;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (sidebar_area, main_area) = layout::create_layout(frame.area());

    layout::draw_sidebar(frame, sidebar_area, app);

    match app.state.current_view {
        View::Questionnaire => questionnaire::draw(frame, main_area, app),
        View::Leads => leads::draw_list(frame, main_area, app),
        View::LeadDetail => leads::draw_detail(frame, main_area, app),
        View::Blog => blog::draw_list(frame, main_area, app),
        View::BlogPost => blog::draw_post(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    // Modal on top of everything else
    if let Some(error) = app.state.current_error() {
        render_error_dialog(frame, error, app.state.errors.len());
    }
}
