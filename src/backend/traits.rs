//! Trait abstraction over the lead backend to enable mocking in tests

use super::error::BackendError;
use super::records::{
    Appointment, CommunicationLog, Contact, LeadStatus, NewAppointment, NewContact,
    NewQuestionnaire, QuestionnaireDetail,
};
use async_trait::async_trait;

/// Typed record operations against the hosted backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadBackend: Send + Sync {
    /// Check if the backend is reachable
    async fn check_connection(&self) -> bool;

    /// Create the primary lead record, returning its id
    async fn create_contact(&self, contact: &NewContact) -> Result<String, BackendError>;

    /// All leads, newest first
    async fn list_contacts(&self) -> Result<Vec<Contact>, BackendError>;

    async fn get_contact(&self, id: &str) -> Result<Contact, BackendError>;

    async fn update_contact_status(&self, id: &str, status: LeadStatus)
        -> Result<(), BackendError>;

    /// Create the questionnaire detail record, returning its id
    async fn create_questionnaire(
        &self,
        questionnaire: &NewQuestionnaire,
    ) -> Result<String, BackendError>;

    /// Detail record for a lead, if one was saved
    async fn get_questionnaire_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<QuestionnaireDetail>, BackendError>;

    async fn create_appointment(&self, appointment: &NewAppointment)
        -> Result<String, BackendError>;

    async fn list_appointments(&self, contact_id: &str) -> Result<Vec<Appointment>, BackendError>;

    /// Append to a lead's communication history
    async fn log_communication(&self, entry: &CommunicationLog) -> Result<(), BackendError>;
}
