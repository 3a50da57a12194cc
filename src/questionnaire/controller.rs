//! Step controller for the fact-find questionnaire
//!
//! Owns the session's [`FormState`], the current step, field errors and the
//! draft store. Forward moves are gated on the step's validation rules,
//! backward moves never are. Submission is split into [`FormController::begin_submit`]
//! and [`FormController::finish_submit`] so the network call can run off the
//! UI loop while the `Submitting` phase acts as the busy flag.

use super::draft::{read_draft, write_draft, DraftStore};
use super::focus::{focus_slots, FocusSlot};
use super::schema::{ValidationErrors, CONSENT_FIELD};
use super::steps::{step, StepDefinition, STEP_COUNT};
use super::values::{FormAction, FormState};
use crate::submission::SubmissionOutcome;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Where the controller is in the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing step `n` (1-based)
    Step(usize),
    Submitting,
    Submitted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// User-facing message raised by the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Called with the final answers after a successful submission
pub type Completion = Box<dyn FnMut(&FormState) + Send>;

/// Periodic draft snapshot schedule
#[derive(Debug, Clone)]
struct AutosaveTimer {
    interval: Duration,
    last: Instant,
    running: bool,
}

impl AutosaveTimer {
    fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last: now,
            running: true,
        }
    }

    fn is_due(&self, now: Instant) -> bool {
        self.running && now.saturating_duration_since(self.last) >= self.interval
    }

    fn reset(&mut self, now: Instant) {
        self.last = now;
    }

    fn stop(&mut self) {
        self.running = false;
    }
}

pub struct FormController {
    phase: Phase,
    values: FormState,
    errors: ValidationErrors,
    focus: usize,
    store: Box<dyn DraftStore>,
    autosave: AutosaveTimer,
    notifications: VecDeque<Notification>,
    on_complete: Option<Completion>,
}

impl FormController {
    /// Start a session at step 1.
    ///
    /// Caller-supplied `initial` values win; otherwise a stored draft is
    /// restored if one can be read.
    pub fn mount(
        store: Box<dyn DraftStore>,
        initial: Option<FormState>,
        autosave_interval: Duration,
        now: Instant,
    ) -> Self {
        let mut notifications = VecDeque::new();
        let values = match initial {
            Some(values) => values,
            None => match read_draft(store.as_ref()) {
                Some(draft) if !draft.is_empty() => {
                    info!("Restored questionnaire draft ({} fields)", draft.len());
                    notifications.push_back(Notification::new(
                        NotificationLevel::Info,
                        "Restored your saved progress",
                    ));
                    draft
                }
                _ => FormState::new(),
            },
        };

        Self {
            phase: Phase::Step(1),
            values,
            errors: ValidationErrors::default(),
            focus: 0,
            store,
            autosave: AutosaveTimer::start(autosave_interval, now),
            notifications,
            on_complete: None,
        }
    }

    /// Register a callback run after a successful submission
    pub fn with_completion(mut self, callback: Completion) -> Self {
        self.on_complete = Some(callback);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn values(&self) -> &FormState {
        &self.values
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, Phase::Submitting)
    }

    /// Step being shown; the last step while submitting or after submission
    pub fn current_step(&self) -> &'static StepDefinition {
        let index = match self.phase {
            Phase::Step(i) => i,
            Phase::Submitting | Phase::Submitted => STEP_COUNT,
        };
        step(index).unwrap_or(&super::steps::STEPS[0])
    }

    /// Focusable slots of the current step
    pub fn slots(&self) -> Vec<FocusSlot> {
        focus_slots(self.current_step(), &self.values)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_slot(&self) -> Option<FocusSlot> {
        self.slots().get(self.focus).copied()
    }

    pub fn next_field(&mut self) {
        let count = self.slots().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn prev_field(&mut self) {
        let count = self.slots().len();
        if count == 0 {
            return;
        }
        self.focus = if self.focus == 0 {
            count - 1
        } else {
            self.focus - 1
        };
    }

    /// Apply an edit. Ignored unless a step is showing.
    pub fn apply(&mut self, action: FormAction) {
        if !matches!(self.phase, Phase::Step(_)) {
            return;
        }
        self.errors.remove(action.field());
        self.values.apply(action);
        // Removing a group entry can shrink the slot list under the cursor
        let count = self.slots().len();
        if count > 0 && self.focus >= count {
            self.focus = count - 1;
        }
    }

    /// Advance one step if the current step validates
    pub fn next(&mut self) -> bool {
        let Phase::Step(current) = self.phase else {
            return false;
        };
        if current >= STEP_COUNT {
            return false;
        }

        if let Err(errors) = self.current_step().validate(&self.values) {
            debug!("Step {current} blocked by {} field(s): {errors}", errors.len());
            if errors.contains(CONSENT_FIELD) {
                self.notify(
                    NotificationLevel::Error,
                    "Please confirm the disclosure consent before continuing",
                );
            }
            // Jump to the first invalid field on the page
            if let Some(index) = self
                .slots()
                .iter()
                .position(|slot| errors.contains(slot.field().name))
            {
                self.focus = index;
            }
            self.errors = errors;
            return false;
        }

        self.errors.clear();
        self.phase = Phase::Step(current + 1);
        self.focus = 0;
        info!("Questionnaire advanced to step {}", current + 1);
        true
    }

    /// Go back one step. Never validated.
    pub fn previous(&mut self) -> bool {
        match self.phase {
            Phase::Step(current) if current > 1 => {
                self.phase = Phase::Step(current - 1);
                self.errors.clear();
                self.focus = 0;
                true
            }
            _ => false,
        }
    }

    /// Write the current answers to the draft store
    pub fn save(&mut self) {
        if !matches!(self.phase, Phase::Step(_)) {
            return;
        }
        match write_draft(self.store.as_mut(), &self.values) {
            Ok(()) => {
                info!("Questionnaire draft saved");
                self.notify(NotificationLevel::Success, "Progress saved");
            }
            Err(e) => {
                warn!("Failed to save draft: {e}");
                self.notify(NotificationLevel::Error, "Could not save your progress");
            }
        }
    }

    /// Autosave hook driven by the event loop. Returns true when a snapshot
    /// was written.
    pub fn tick(&mut self, now: Instant) -> bool {
        if matches!(self.phase, Phase::Submitted) || !self.autosave.is_due(now) {
            return false;
        }
        self.autosave.reset(now);
        // Nothing typed yet, so there is nothing worth restoring
        if self.values.is_empty() {
            return false;
        }
        match write_draft(self.store.as_mut(), &self.values) {
            Ok(()) => {
                debug!("Autosaved questionnaire draft");
                true
            }
            Err(e) => {
                warn!("Autosave failed: {e}");
                false
            }
        }
    }

    /// Enter `Submitting` and hand out the answers to submit.
    ///
    /// Returns `None` when not on the last step, when the last step does not
    /// validate, or when a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<FormState> {
        match self.phase {
            Phase::Step(current) if current == STEP_COUNT => {
                if let Err(errors) = self.current_step().validate(&self.values) {
                    self.errors = errors;
                    return None;
                }
                self.errors.clear();
                self.phase = Phase::Submitting;
                info!("Submitting questionnaire");
                Some(self.values.clone())
            }
            Phase::Submitting => {
                debug!("Submission already in flight, ignoring");
                None
            }
            _ => None,
        }
    }

    /// Resolve an in-flight submission
    pub fn finish_submit(&mut self, outcome: &SubmissionOutcome) {
        if !self.is_submitting() {
            return;
        }

        let message = match outcome {
            SubmissionOutcome::Failed { error } => {
                warn!("Questionnaire submission failed: {error}");
                self.phase = Phase::Step(STEP_COUNT);
                self.notify(
                    NotificationLevel::Error,
                    format!(
                        "We couldn't submit your fact find ({error}). Your answers are still here, please try again."
                    ),
                );
                return;
            }
            SubmissionOutcome::Partial { contact_id, error } => {
                warn!("Lead {contact_id} captured but questionnaire detail failed: {error}");
                "Thanks, we have your details. Some answers didn't save, our team will follow up with you."
            }
            SubmissionOutcome::Complete { contact_id, .. } => {
                info!("Lead {contact_id} captured with questionnaire detail");
                "Thank you! Your fact find has been submitted."
            }
        };

        if let Err(e) = self.store.clear() {
            warn!("Failed to clear draft after submission: {e}");
        }
        self.notify(NotificationLevel::Success, message);
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&self.values);
        }
        self.values.clear();
        self.errors.clear();
        self.focus = 0;
        self.phase = Phase::Submitted;
        self.autosave.stop();
    }

    /// Start a fresh session after a completed submission
    pub fn restart(&mut self, now: Instant) {
        if !matches!(self.phase, Phase::Submitted) {
            return;
        }
        self.values.clear();
        self.errors.clear();
        self.focus = 0;
        self.phase = Phase::Step(1);
        self.autosave = AutosaveTimer::start(self.autosave.interval, now);
    }

    /// Take the notifications raised since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push_back(Notification::new(level, message));
    }
}
