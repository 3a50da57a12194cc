//! Reusable UI components

mod button;
mod dialog;
mod field;

pub use button::{render_action_button, render_sidebar_button, BUTTON_HEIGHT};
pub use dialog::render_error_dialog;
pub use field::{draw_field, field_height, FieldView};
