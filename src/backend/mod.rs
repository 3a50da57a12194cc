//! Lead backend client for the hosted REST data store

mod client;
mod error;
mod records;
mod traits;

pub use client::{BackendClient, DEFAULT_ADDRESS, DEFAULT_TIMEOUT};
pub use records::{
    Appointment, Channel, CommunicationLog, Contact, ContactPreference, Dependent,
    ExistingPolicy, InsuranceInterest, LeadStatus, NewAppointment, NewContact, NewQuestionnaire,
    QuestionnaireAnswers, QuestionnaireDetail,
};
pub use traits::LeadBackend;

#[cfg(test)]
pub use error::BackendError;
#[cfg(test)]
pub use traits::MockLeadBackend;
