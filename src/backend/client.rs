//! HTTP client for the hosted lead backend
//!
//! The backend exposes one JSON collection per record type under the base
//! URL (`/contacts`, `/questionnaires`, `/appointments`, `/communications`).
//! Create calls answer `{"id": ..}`; list calls answer a JSON array.

use super::error::BackendError;
use super::records::{
    Appointment, CommunicationLog, Contact, Created, LeadStatus, NewAppointment, NewContact,
    NewQuestionnaire, QuestionnaireDetail,
};
use super::traits::LeadBackend;
use async_trait::async_trait;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default backend address
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:54321/rest/v1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the lead backend's REST surface
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackendClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut builder = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        debug!("Backend answered {status}: {body}");
        Err(BackendError::from_status(status, &body))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Malformed(e.to_string()))
    }

    async fn create<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<String, BackendError> {
        let response = self
            .send(self.request(Method::POST, path).json(body))
            .await?;
        let created: Created = Self::read_json(response).await?;
        Ok(created.id)
    }
}

#[async_trait]
impl LeadBackend for BackendClient {
    async fn check_connection(&self) -> bool {
        match self.request(Method::GET, "").send().await {
            Ok(response) => !response.status().is_server_error(),
            Err(_) => false,
        }
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<String, BackendError> {
        self.create("contacts", contact).await
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, BackendError> {
        let response = self
            .send(
                self.request(Method::GET, "contacts")
                    .query(&[("order", "created_at.desc")]),
            )
            .await?;
        let rows: Vec<serde_json::Value> = Self::read_json(response).await?;
        // One unreadable row must not hide the rest of the list
        let mut contacts: Vec<Contact> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Contact>(row) {
                Ok(contact) => Some(contact),
                Err(e) => {
                    warn!("Skipping unreadable lead row: {e}");
                    None
                }
            })
            .collect();
        // Leads without a timestamp sink to the bottom
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(contacts)
    }

    async fn get_contact(&self, id: &str) -> Result<Contact, BackendError> {
        match self
            .send(self.request(Method::GET, &format!("contacts/{id}")))
            .await
        {
            Ok(response) => Self::read_json(response).await,
            Err(BackendError::Rejected { status, .. }) if status == StatusCode::NOT_FOUND => {
                Err(BackendError::NotFound {
                    kind: "contact",
                    id: id.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn update_contact_status(
        &self,
        id: &str,
        status: LeadStatus,
    ) -> Result<(), BackendError> {
        self.send(
            self.request(Method::PATCH, &format!("contacts/{id}"))
                .json(&serde_json::json!({ "status": status })),
        )
        .await?;
        Ok(())
    }

    async fn create_questionnaire(
        &self,
        questionnaire: &NewQuestionnaire,
    ) -> Result<String, BackendError> {
        self.create("questionnaires", questionnaire).await
    }

    async fn get_questionnaire_for_contact(
        &self,
        contact_id: &str,
    ) -> Result<Option<QuestionnaireDetail>, BackendError> {
        let response = self
            .send(
                self.request(Method::GET, "questionnaires")
                    .query(&[("contact_id", contact_id)]),
            )
            .await?;
        let details: Vec<QuestionnaireDetail> = Self::read_json(response).await?;
        // Latest submission wins when a contact filled the form more than once
        Ok(details
            .into_iter()
            .filter(|d| d.contact_id == contact_id)
            .max_by_key(|d| d.created_at))
    }

    async fn create_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<String, BackendError> {
        self.create("appointments", appointment).await
    }

    async fn list_appointments(&self, contact_id: &str) -> Result<Vec<Appointment>, BackendError> {
        let response = self
            .send(
                self.request(Method::GET, "appointments")
                    .query(&[("contact_id", contact_id)]),
            )
            .await?;
        let mut appointments: Vec<Appointment> = Self::read_json(response).await?;
        appointments.retain(|a| a.contact_id == contact_id);
        appointments.sort_by(|a, b| a.scheduled_for.cmp(&b.scheduled_for));
        Ok(appointments)
    }

    async fn log_communication(&self, entry: &CommunicationLog) -> Result<(), BackendError> {
        self.send(self.request(Method::POST, "communications").json(entry))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::records::{ContactPreference, InsuranceInterest};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header as header_is, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(server.uri(), Some("anon-key".to_string()), DEFAULT_TIMEOUT).unwrap()
    }

    fn new_contact() -> NewContact {
        NewContact {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "021 555 0100".to_string(),
            contact_preference: ContactPreference::Email,
            insurance_interest: InsuranceInterest::Life,
            preferred_date: None,
            preferred_time: None,
            notes: None,
            status: LeadStatus::New,
            source: "fact-find".to_string(),
        }
    }

    mod create {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_create_contact_returns_id_and_sends_key() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/contacts"))
                .and(header_is("apikey", "anon-key"))
                .and(header_is("authorization", "Bearer anon-key"))
                .and(body_partial_json(json!({"first_name": "Jane", "source": "fact-find"})))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 17})))
                .expect(1)
                .mount(&server)
                .await;

            let id = client_for(&server)
                .create_contact(&new_contact())
                .await
                .unwrap();
            assert_eq!(id, "17");
        }

        #[tokio::test]
        async fn test_validation_failure_is_rejected_with_message() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/contacts"))
                .respond_with(
                    ResponseTemplate::new(400).set_body_json(json!({"error": "email is invalid"})),
                )
                .mount(&server)
                .await;

            let err = client_for(&server)
                .create_contact(&new_contact())
                .await
                .unwrap_err();
            match err {
                BackendError::Rejected { status, message } => {
                    assert_eq!(status, StatusCode::BAD_REQUEST);
                    assert_eq!(message, "email is invalid");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_backend_failure_is_server_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/questionnaires"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let questionnaire = NewQuestionnaire {
                contact_id: "17".to_string(),
                answers: Default::default(),
            };
            let err = client_for(&server)
                .create_questionnaire(&questionnaire)
                .await
                .unwrap_err();
            assert!(matches!(err, BackendError::Server { .. }));
        }

        #[tokio::test]
        async fn test_create_without_id_is_malformed() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/appointments"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
                .mount(&server)
                .await;

            let appointment = NewAppointment {
                contact_id: "17".to_string(),
                scheduled_for: "2026-11-02 10:00".to_string(),
                notes: None,
            };
            let err = client_for(&server)
                .create_appointment(&appointment)
                .await
                .unwrap_err();
            assert!(matches!(err, BackendError::Malformed(_)));
        }

        #[tokio::test]
        async fn test_unreachable_backend_is_transport_error() {
            let client =
                BackendClient::new("http://127.0.0.1:9", None, Duration::from_millis(500)).unwrap();
            let err = client.create_contact(&new_contact()).await.unwrap_err();
            assert!(matches!(err, BackendError::Transport(_)));
            assert!(!client.check_connection().await);
        }
    }

    mod read {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_list_contacts_newest_first() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/contacts"))
                .and(query_param("order", "created_at.desc"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"id": "a", "first_name": "Old", "created_at": "2026-01-01T00:00:00Z"},
                    {"id": "b", "first_name": "New", "created_at": "2026-03-01T00:00:00Z"}
                ])))
                .mount(&server)
                .await;

            let contacts = client_for(&server).list_contacts().await.unwrap();
            let names: Vec<_> = contacts.iter().map(|c| c.first_name.as_str()).collect();
            assert_eq!(names, vec!["New", "Old"]);
        }

        #[tokio::test]
        async fn test_unreadable_row_is_skipped() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/contacts"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"id": "a", "first_name": "Aroha", "status": "new"},
                    {"id": "b", "first_name": "Ben", "status": "archived"},
                    {"first_name": "No id"},
                    {"id": "c", "first_name": null, "insurance_interest": "pet"}
                ])))
                .mount(&server)
                .await;

            let contacts = client_for(&server).list_contacts().await.unwrap();
            let ids: Vec<_> = contacts.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["a", "c"]);
            assert_eq!(contacts[1].insurance_interest, None);
        }

        #[tokio::test]
        async fn test_missing_contact_is_not_found() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/contacts/zzz"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;

            let err = client_for(&server).get_contact("zzz").await.unwrap_err();
            assert!(matches!(err, BackendError::NotFound { kind: "contact", .. }));
        }

        #[tokio::test]
        async fn test_questionnaire_lookup_empty_is_none() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/questionnaires"))
                .and(query_param("contact_id", "17"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(&server)
                .await;

            let detail = client_for(&server)
                .get_questionnaire_for_contact("17")
                .await
                .unwrap();
            assert!(detail.is_none());
        }

        #[tokio::test]
        async fn test_questionnaire_lookup_reads_flat_record() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/questionnaires"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                    "id": 3,
                    "contact_id": 17,
                    "client_name": "Jane Doe",
                    "annual_income": 85000,
                    "dependents": [{"name": "Sam", "age": 4, "relationship": "son"}]
                }])))
                .mount(&server)
                .await;

            let detail = client_for(&server)
                .get_questionnaire_for_contact("17")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(detail.contact_id, "17");
            assert_eq!(detail.answers.annual_income, Some(85000.0));
            assert_eq!(detail.answers.dependents[0].age, Some(4));
        }

        #[tokio::test]
        async fn test_questionnaire_lookup_prefers_latest() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/questionnaires"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"id": 3, "contact_id": 17, "created_at": "2026-03-01T09:00:00Z"},
                    {"id": 9, "contact_id": 17, "created_at": "2026-05-01T09:00:00Z"},
                    {"id": 12, "contact_id": 18, "created_at": "2026-06-01T09:00:00Z"}
                ])))
                .mount(&server)
                .await;

            let detail = client_for(&server)
                .get_questionnaire_for_contact("17")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(detail.id, "9");
        }

        #[tokio::test]
        async fn test_appointments_sorted_and_scoped_to_contact() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/appointments"))
                .and(query_param("contact_id", "17"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"id": 2, "contact_id": 17, "scheduled_for": "2026-11-09 14:00"},
                    {"id": 1, "contact_id": 17, "scheduled_for": "2026-11-02 10:00"},
                    {"id": 5, "contact_id": 99, "scheduled_for": "2026-10-30 09:00"}
                ])))
                .mount(&server)
                .await;

            let appointments = client_for(&server).list_appointments("17").await.unwrap();
            let ids: Vec<_> = appointments.iter().map(|a| a.id.as_str()).collect();
            assert_eq!(ids, vec!["1", "2"]);
        }
    }

    mod update {
        use super::*;
        use crate::backend::records::Channel;
        use chrono::Utc;

        #[tokio::test]
        async fn test_update_status_patches_contact() {
            let server = MockServer::start().await;
            Mock::given(method("PATCH"))
                .and(path("/contacts/17"))
                .and(body_partial_json(json!({"status": "contacted"})))
                .respond_with(ResponseTemplate::new(204))
                .expect(1)
                .mount(&server)
                .await;

            client_for(&server)
                .update_contact_status("17", LeadStatus::Contacted)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_log_communication_posts_entry() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/communications"))
                .and(body_partial_json(json!({"contact_id": "17", "channel": "note"})))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
                .expect(1)
                .mount(&server)
                .await;

            let entry = CommunicationLog {
                contact_id: "17".to_string(),
                channel: Channel::Note,
                summary: "Status changed to contacted".to_string(),
                logged_at: Utc::now(),
            };
            client_for(&server).log_communication(&entry).await.unwrap();
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BackendClient::new("http://host/api/", Some("  ".to_string()), DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(client.base_url(), "http://host/api");
        assert!(client.api_key.is_none());
    }
}
