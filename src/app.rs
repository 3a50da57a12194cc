//! Application state and core logic

use crate::backend::{
    BackendClient, Channel, CommunicationLog, LeadBackend, LeadStatus, NewAppointment,
};
use crate::blog::BlogReader;
use crate::config::AppConfig;
use crate::platform::is_command;
use crate::questionnaire::{
    DraftStore, FileDraftStore, FormController, NotificationLevel, Phase,
};
use crate::state::{AppState, LeadDetailState, Section, View};
use crate::submission::{SubmissionAdapter, SubmissionOutcome, WebhookNotifier};
use anyhow::{anyhow, Result};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Collaborators the app is assembled from
pub struct AppParts {
    pub backend: Arc<dyn LeadBackend>,
    pub adapter: SubmissionAdapter,
    pub drafts: Box<dyn DraftStore>,
    pub blog: BlogReader,
    pub autosave_interval: Duration,
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Questionnaire session
    pub form: FormController,
    backend: Arc<dyn LeadBackend>,
    adapter: SubmissionAdapter,
    blog: BlogReader,
    /// Result of the in-flight submission, if any
    pending_submission: Option<oneshot::Receiver<SubmissionOutcome>>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Build the app from configuration
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let client = BackendClient::new(
            config.backend_url.clone(),
            config.api_key.clone(),
            config.request_timeout(),
        )
        .map_err(|e| anyhow!("Failed to create backend client: {}", e))?;
        info!("Lead backend at {}", client.base_url());
        let backend: Arc<dyn LeadBackend> = Arc::new(client);

        let mut adapter = SubmissionAdapter::new(Arc::clone(&backend));
        if let Some(url) = &config.webhook_url {
            let notifier = WebhookNotifier::new(url.clone(), config.request_timeout())
                .map_err(|e| anyhow!("Failed to create webhook notifier: {}", e))?;
            info!("Lead webhook enabled for {}", notifier.url());
            adapter = adapter.with_notifier(Arc::new(notifier));
        }

        let drafts = FileDraftStore::in_data_dir(&config.draft_key).unwrap_or_else(|| {
            let dir = std::env::temp_dir().join("factfind-tui");
            warn!("No data directory available, keeping drafts in {}", dir.display());
            FileDraftStore::new(dir, &config.draft_key)
        });
        info!("Drafts stored at {}", drafts.path().display());

        let mut app = Self::from_parts(
            AppParts {
                backend,
                adapter,
                drafts: Box::new(drafts),
                blog: BlogReader::new(config.resolved_blog_dir()),
                autosave_interval: config.autosave_interval(),
            },
            Instant::now(),
        );
        app.refresh_connection().await;
        Ok(app)
    }

    /// Assemble the app from already-built collaborators
    pub fn from_parts(parts: AppParts, now: Instant) -> Self {
        let form = FormController::mount(parts.drafts, None, parts.autosave_interval, now)
            .with_completion(Box::new(|values| {
                info!(fields = values.len(), "Fact find completed");
            }));

        Self {
            state: AppState::default(),
            form,
            backend: parts.backend,
            adapter: parts.adapter,
            blog: parts.blog,
            pending_submission: None,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message);
    }

    pub fn blog_dir(&self) -> &std::path::Path {
        self.blog.dir()
    }

    pub async fn refresh_connection(&mut self) {
        self.state.backend_connected = self.backend.check_connection().await;
    }

    /// Periodic housekeeping driven by the event loop
    pub fn tick(&mut self, now: Instant) {
        self.poll_submission();
        self.form.tick(now);
        for note in self.form.drain_notifications() {
            self.state.show_toast(note.level, note.message, now);
        }
        self.state.expire_toast(now);
    }

    /// Hand a finished submission back to the controller
    pub fn poll_submission(&mut self) {
        let Some(rx) = self.pending_submission.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => SubmissionOutcome::Failed {
                error: "submission task ended unexpectedly".to_string(),
            },
        };
        self.pending_submission = None;
        info!(success = outcome.is_success(), "Submission finished");
        self.form.finish_submit(&outcome);
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        let section = match key.code {
            KeyCode::F(1) => Some(Section::Questionnaire),
            KeyCode::F(2) => Some(Section::Leads),
            KeyCode::F(3) => Some(Section::Blog),
            _ => None,
        };
        if let Some(section) = section {
            self.open_section(section).await;
            return Ok(());
        }

        match self.state.current_view {
            View::Questionnaire => self.handle_questionnaire_key(key),
            View::Leads => self.handle_leads_key(key).await?,
            View::LeadDetail => self.handle_lead_detail_key(key).await?,
            View::Blog => self.handle_blog_key(key),
            View::BlogPost => self.handle_blog_post_key(key),
        }

        Ok(())
    }

    async fn open_section(&mut self, section: Section) {
        self.state.open_section(section);
        match section {
            Section::Leads if self.state.leads.is_empty() => self.load_leads().await,
            Section::Blog if self.state.posts.is_empty() => self.load_posts(),
            _ => {}
        }
    }

    /// Go back to the previous view
    fn go_back(&mut self) {
        self.state.go_back();
    }

    fn handle_questionnaire_key(&mut self, key: KeyEvent) {
        match self.form.phase() {
            Phase::Submitting => {}
            Phase::Submitted => {
                if matches!(key.code, KeyCode::Enter) || is_command(&key, 'n') {
                    self.form.restart(Instant::now());
                }
            }
            Phase::Step(_) => self.handle_step_key(key),
        }
    }

    fn handle_step_key(&mut self, key: KeyEvent) {
        if is_command(&key, 'n') {
            if self.form.current_step().is_last() {
                self.start_submission();
            } else {
                self.form.next();
            }
            return;
        }
        if is_command(&key, 'p') {
            self.form.previous();
            return;
        }
        if is_command(&key, 's') {
            self.form.save();
            return;
        }

        let slot = self.form.focused_slot();
        if is_command(&key, 'a') {
            if let Some(action) = slot.and_then(|s| s.add_entry()) {
                self.form.apply(action);
            }
            return;
        }
        if is_command(&key, 'x') {
            if let Some(action) = slot.and_then(|s| s.remove_entry()) {
                self.form.apply(action);
            }
            return;
        }

        let action = match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.form.next_field();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.prev_field();
                None
            }
            KeyCode::Esc => {
                self.form.previous();
                None
            }
            KeyCode::Left => slot.and_then(|s| s.cycle(self.form.values(), false)),
            KeyCode::Right => slot.and_then(|s| s.cycle(self.form.values(), true)),
            KeyCode::Enter => match slot.and_then(|s| s.activate()) {
                Some(action) => Some(action),
                None => {
                    self.form.next_field();
                    None
                }
            },
            KeyCode::Backspace => slot.and_then(|s| s.backspace()),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                slot.and_then(|s| s.input_char(c))
            }
            _ => None,
        };

        if let Some(action) = action {
            self.form.apply(action);
        }
    }

    /// Spawn the submission; the controller's busy flag drops repeats
    fn start_submission(&mut self) {
        let Some(values) = self.form.begin_submit() else {
            return;
        };
        let adapter = self.adapter.clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let outcome = adapter.submit(&values).await;
            let _ = tx.send(outcome);
        });
        self.pending_submission = Some(rx);
    }

    async fn handle_leads_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_selection_down(self.state.leads.len());
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.move_selection_up();
            }
            KeyCode::Char('r') => {
                self.refresh_connection().await;
                self.load_leads().await;
            }
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Enter => {
                if let Some(id) = self.state.selected_lead().map(|c| c.id.clone()) {
                    self.open_lead(&id).await;
                }
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    async fn handle_lead_detail_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('s') => self.advance_lead_status().await,
            KeyCode::Char('b') => self.book_appointment().await,
            KeyCode::Char('y') => self.copy_lead_email(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
        Ok(())
    }

    fn handle_blog_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.state.move_selection_down(self.state.posts.len());
            }
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('r') => self.load_posts(),
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Enter => {
                if let Some(slug) = self.state.selected_post().map(|p| p.slug.clone()) {
                    self.open_post(&slug);
                }
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn handle_blog_post_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('d') | KeyCode::PageDown => self.state.scroll_down_page(),
            KeyCode::Char('u') | KeyCode::PageUp => self.state.scroll_up_page(),
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    async fn load_leads(&mut self) {
        match self.backend.list_contacts().await {
            Ok(leads) => {
                info!("Loaded {} leads", leads.len());
                self.state.leads = leads;
                self.state.clamp_selection(self.state.leads.len());
            }
            Err(e) => self.push_error(format!("Failed to load leads: {e}")),
        }
    }

    async fn open_lead(&mut self, id: &str) {
        let contact = match self.backend.get_contact(id).await {
            Ok(contact) => contact,
            Err(e) => {
                self.push_error(format!("Failed to load lead: {e}"));
                return;
            }
        };
        let questionnaire = match self.backend.get_questionnaire_for_contact(id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!("Questionnaire lookup for {id} failed: {e}");
                None
            }
        };
        let appointments = self.backend.list_appointments(id).await.unwrap_or_else(|e| {
            warn!("Appointment lookup for {id} failed: {e}");
            Vec::new()
        });

        self.state.lead_detail = LeadDetailState {
            contact: Some(contact),
            questionnaire,
            appointments,
        };
        self.state.navigate(View::LeadDetail);
    }

    /// Move the open lead one step along the triage flow and log it
    async fn advance_lead_status(&mut self) {
        let Some(contact) = self.state.lead_detail.contact.as_ref() else {
            return;
        };
        let (id, from) = (contact.id.clone(), contact.status);
        let to = from.advance();
        if to == from {
            self.toast(NotificationLevel::Info, "Lead is already closed");
            return;
        }

        if let Err(e) = self.backend.update_contact_status(&id, to).await {
            self.push_error(format!("Failed to update lead: {e}"));
            return;
        }
        self.set_lead_status(&id, to);

        let entry = CommunicationLog {
            contact_id: id.clone(),
            channel: Channel::Note,
            summary: format!("Status changed from {from} to {to}"),
            logged_at: Utc::now(),
        };
        if let Err(e) = self.backend.log_communication(&entry).await {
            warn!("Failed to log status change for {id}: {e}");
        }
        self.toast(NotificationLevel::Success, format!("Lead marked {to}"));
    }

    fn set_lead_status(&mut self, id: &str, status: LeadStatus) {
        if let Some(contact) = self.state.lead_detail.contact.as_mut() {
            contact.status = status;
        }
        if let Some(lead) = self.state.leads.iter_mut().find(|c| c.id == id) {
            lead.status = status;
        }
    }

    /// Book an appointment at the lead's preferred date and time
    async fn book_appointment(&mut self) {
        let Some(contact) = self.state.lead_detail.contact.as_ref() else {
            return;
        };
        let Some(date) = contact.preferred_date.clone() else {
            self.toast(NotificationLevel::Error, "Lead has no preferred date");
            return;
        };
        let scheduled_for = match &contact.preferred_time {
            Some(time) => format!("{date} {time}"),
            None => date,
        };
        let id = contact.id.clone();
        let appointment = NewAppointment {
            contact_id: id.clone(),
            scheduled_for: scheduled_for.clone(),
            notes: None,
        };

        if let Err(e) = self.backend.create_appointment(&appointment).await {
            self.push_error(format!("Failed to book appointment: {e}"));
            return;
        }
        match self.backend.list_appointments(&id).await {
            Ok(appointments) => self.state.lead_detail.appointments = appointments,
            Err(e) => warn!("Appointment refresh for {id} failed: {e}"),
        }
        self.toast(
            NotificationLevel::Success,
            format!("Appointment booked for {scheduled_for}"),
        );
    }

    fn copy_lead_email(&mut self) {
        let Some(email) = self
            .state
            .lead_detail
            .contact
            .as_ref()
            .map(|c| c.email.clone())
        else {
            return;
        };
        match copy_to_clipboard(&email) {
            Ok(()) => self.toast(NotificationLevel::Success, format!("Copied {email}")),
            Err(e) => self.push_error(format!("Failed to copy email: {e}")),
        }
    }

    fn load_posts(&mut self) {
        match self.blog.list_posts() {
            Ok(posts) => {
                self.state.posts = posts;
                self.state.clamp_selection(self.state.posts.len());
            }
            Err(e) => self.push_error(format!("Failed to load blog: {e}")),
        }
    }

    fn open_post(&mut self, slug: &str) {
        match self.blog.get_post(slug) {
            Ok(Some(post)) => {
                self.state.open_post = Some(post);
                self.state.navigate(View::BlogPost);
            }
            Ok(None) => self.push_error(format!("Post '{slug}' no longer exists")),
            Err(e) => self.push_error(format!("Failed to open post: {e}")),
        }
    }

    fn toast(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.state.show_toast(level, message, Instant::now());
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}
