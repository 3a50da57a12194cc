//! Application state definitions

use crate::backend::{Appointment, Contact, QuestionnaireDetail};
use crate::blog::BlogPost;
use crate::questionnaire::NotificationLevel;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// How long a toast stays in the status bar
pub const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Questionnaire,
    Leads,
    LeadDetail,
    Blog,
    BlogPost,
}

impl View {
    /// Sidebar entry this view belongs to
    pub fn section(&self) -> Section {
        match self {
            Self::Questionnaire => Section::Questionnaire,
            Self::Leads | Self::LeadDetail => Section::Leads,
            Self::Blog | Self::BlogPost => Section::Blog,
        }
    }
}

/// Top-level sidebar sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Questionnaire,
    Leads,
    Blog,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Questionnaire, Section::Leads, Section::Blog];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Questionnaire => "Fact Find",
            Self::Leads => "Leads",
            Self::Blog => "Blog",
        }
    }

    /// Function key that jumps to this section
    pub fn hotkey(&self) -> &'static str {
        match self {
            Self::Questionnaire => "F1",
            Self::Leads => "F2",
            Self::Blog => "F3",
        }
    }

    pub fn view(&self) -> View {
        match self {
            Self::Questionnaire => View::Questionnaire,
            Self::Leads => View::Leads,
            Self::Blog => View::Blog,
        }
    }
}

/// Short-lived status bar message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: NotificationLevel,
    pub message: String,
    pub expires_at: Instant,
}

/// Lead opened in the detail view
#[derive(Debug, Clone, Default)]
pub struct LeadDetailState {
    pub contact: Option<Contact>,
    pub questionnaire: Option<QuestionnaireDetail>,
    pub appointments: Vec<Appointment>,
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,
    /// Earlier views with the selection each one had
    pub view_history: Vec<(View, usize)>,

    // Data
    pub leads: Vec<Contact>,
    pub lead_detail: LeadDetailState,
    pub posts: Vec<BlogPost>,
    pub open_post: Option<BlogPost>,

    // Selection
    pub selected_index: usize,
    pub scroll_offset: usize,

    // UI state
    pub backend_connected: bool,
    pub errors: VecDeque<String>,
    pub toast: Option<Toast>,
}

impl AppState {
    /// Switch view, remembering where we came from
    pub fn navigate(&mut self, view: View) {
        if self.current_view == view {
            return;
        }
        self.view_history.push((self.current_view, self.selected_index));
        self.current_view = view;
        self.reset_selection();
    }

    /// Jump to a sidebar section, dropping history
    pub fn open_section(&mut self, section: Section) {
        self.view_history.clear();
        if self.current_view != section.view() {
            self.current_view = section.view();
            self.reset_selection();
        }
    }

    /// Return to the previous view. Returns false when there is none.
    pub fn go_back(&mut self) -> bool {
        match self.view_history.pop() {
            Some((view, selected)) => {
                self.current_view = view;
                self.selected_index = selected;
                self.scroll_offset = 0;
                true
            }
            None => false,
        }
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down a page (10 lines)
    pub fn scroll_down_page(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(10);
    }

    /// Scroll up a page (10 lines)
    pub fn scroll_up_page(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(10);
    }

    pub fn selected_lead(&self) -> Option<&Contact> {
        self.leads.get(self.selected_index)
    }

    pub fn selected_post(&self) -> Option<&BlogPost> {
        self.posts.get(self.selected_index)
    }

    /// Queue an error for the modal dialog
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push_back(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    pub fn show_toast(&mut self, level: NotificationLevel, message: impl Into<String>, now: Instant) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: now + TOAST_DURATION,
        });
    }

    /// Drop the toast once it has expired
    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }
    }
}
