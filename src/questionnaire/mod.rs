//! Multi-step fact-find questionnaire: field model, steps, drafts and the
//! step controller

mod controller;
mod draft;
mod focus;
mod schema;
mod steps;
mod values;

pub use controller::{FormController, NotificationLevel, Phase};
pub use draft::{DraftStore, FileDraftStore, DEFAULT_DRAFT_KEY};
pub use focus::FocusSlot;
pub use schema::CONSENT_FIELD;
pub use steps::{StepDefinition, STEP_COUNT};
pub use values::{FormState, GroupEntry};

#[cfg(test)]
pub use draft::MemoryDraftStore;
#[cfg(test)]
pub use values::FormAction;
