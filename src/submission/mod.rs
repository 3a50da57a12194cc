//! Questionnaire submission: record mapping, backend calls and the lead webhook

mod adapter;
mod webhook;

pub use adapter::{SubmissionAdapter, SubmissionOutcome};
pub use webhook::WebhookNotifier;
