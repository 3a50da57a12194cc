//! Turns questionnaire answers into backend records and submits them
//!
//! The contact record is primary: it must be created for a submission to
//! count. The questionnaire detail is secondary and its failure only
//! degrades the result to [`SubmissionOutcome::Partial`].

use super::webhook::{LeadNotifier, LeadPayload, LEAD_SOURCE};
use crate::backend::{
    ContactPreference, Dependent, ExistingPolicy, InsuranceInterest, LeadBackend, LeadStatus,
    NewContact, NewQuestionnaire, QuestionnaireAnswers,
};
use crate::questionnaire::{FormState, GroupEntry, CONSENT_FIELD};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

pub const UNKNOWN_FIRST_NAME: &str = "Unknown";
pub const UNKNOWN_LAST_NAME: &str = "Client";
pub const UNKNOWN_EMAIL: &str = "not-provided@placeholder.invalid";
pub const UNKNOWN_PHONE: &str = "not provided";

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Primary record not created; nothing was persisted
    Failed { error: String },
    /// Primary record created, questionnaire detail failed
    Partial { contact_id: String, error: String },
    Complete {
        contact_id: String,
        questionnaire_id: String,
    },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Submits a finished questionnaire to the backend
#[derive(Clone)]
pub struct SubmissionAdapter {
    backend: Arc<dyn LeadBackend>,
    notifier: Option<Arc<dyn LeadNotifier>>,
}

impl SubmissionAdapter {
    pub fn new(backend: Arc<dyn LeadBackend>) -> Self {
        Self {
            backend,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn LeadNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub async fn submit(&self, values: &FormState) -> SubmissionOutcome {
        let contact = build_contact(values);
        let contact_id = match self.backend.create_contact(&contact).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Contact creation failed: {e}");
                return SubmissionOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };
        info!("Created contact {contact_id}");

        self.notify_lead(&contact_id, &contact);

        let questionnaire = NewQuestionnaire {
            contact_id: contact_id.clone(),
            answers: build_answers(values),
        };
        match self.backend.create_questionnaire(&questionnaire).await {
            Ok(questionnaire_id) => SubmissionOutcome::Complete {
                contact_id,
                questionnaire_id,
            },
            Err(e) => {
                warn!("Questionnaire detail for contact {contact_id} failed: {e}");
                SubmissionOutcome::Partial {
                    contact_id,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Fire the webhook without waiting on it
    fn notify_lead(&self, contact_id: &str, contact: &NewContact) {
        let Some(notifier) = self.notifier.clone() else {
            return;
        };
        let payload = LeadPayload {
            submission_id: contact_id.to_string(),
            name: format!("{} {}", contact.first_name, contact.last_name),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            interest: contact.insurance_interest.as_str().to_string(),
            submitted_at: Utc::now(),
            source: LEAD_SOURCE.to_string(),
        };
        tokio::spawn(async move {
            if let Err(e) = notifier.notify(&payload).await {
                warn!("Lead webhook failed for {}: {e}", payload.submission_id);
            }
        });
    }
}

/// Primary record for `values`, with placeholders for missing identity fields
pub fn build_contact(values: &FormState) -> NewContact {
    let (first_name, last_name) = split_name(values.trimmed("clientName"));
    NewContact {
        first_name,
        last_name,
        email: values.trimmed("email").unwrap_or(UNKNOWN_EMAIL).to_string(),
        phone: values.trimmed("phone").unwrap_or(UNKNOWN_PHONE).to_string(),
        contact_preference: values
            .trimmed("contactPreference")
            .and_then(ContactPreference::parse)
            .unwrap_or_default(),
        insurance_interest: values
            .trimmed("insuranceInterest")
            .and_then(InsuranceInterest::parse)
            .unwrap_or(InsuranceInterest::General),
        preferred_date: owned(values.trimmed("preferredDate")),
        preferred_time: owned(values.trimmed("preferredTime")),
        notes: owned(values.trimmed("notes")),
        status: LeadStatus::New,
        source: LEAD_SOURCE.to_string(),
    }
}

/// Questionnaire detail for `values`; unparseable amounts become `None`
pub fn build_answers(values: &FormState) -> QuestionnaireAnswers {
    let amount = |field: &str| values.trimmed(field).and_then(parse_amount);
    QuestionnaireAnswers {
        client_name: values.trimmed("clientName").unwrap_or_default().to_string(),
        partner_name: owned(values.trimmed("partnerName")),
        advisor_name: values.trimmed("advisorName").unwrap_or_default().to_string(),
        meeting_date: owned(values.trimmed("meetingDate")),
        disclose_info: values.flag(CONSENT_FIELD),
        date_of_birth: owned(values.trimmed("dateOfBirth")),
        address: owned(values.trimmed("address")),
        occupation: owned(values.trimmed("occupation")),
        smoker: values.flag("smoker"),
        dependents: values
            .group("dependents")
            .iter()
            .filter(|entry| !is_blank(entry))
            .map(|entry| Dependent {
                name: cell(entry, "name"),
                age: entry.get("age").and_then(|a| a.trim().parse().ok()),
                relationship: cell(entry, "relationship"),
            })
            .collect(),
        annual_income: amount("annualIncome"),
        partner_income: amount("partnerIncome"),
        monthly_expenses: amount("monthlyExpenses"),
        total_assets: amount("totalAssets"),
        total_liabilities: amount("totalLiabilities"),
        mortgage_balance: amount("mortgageBalance"),
        kiwisaver_balance: amount("kiwisaverBalance"),
        existing_policies: values
            .group("existingPolicies")
            .iter()
            .filter(|entry| !is_blank(entry))
            .map(|entry| ExistingPolicy {
                provider: cell(entry, "provider"),
                cover_type: cell(entry, "coverType"),
                sum_insured: entry.get("sumInsured").and_then(|v| parse_amount(v)),
                premium: entry.get("premium").and_then(|v| parse_amount(v)),
            })
            .collect(),
        objectives: owned(values.trimmed("objectives")),
    }
}

/// Parse a money-like string: `"$85,000"`, `"1 200.50"`, `"85k"`, `"2.5m"`.
/// Anything else is `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("NZ")
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
        .collect();
    let lower = cleaned.to_ascii_lowercase();
    let (digits, multiplier) = if let Some(rest) = lower.strip_suffix('k') {
        (rest, 1_000.0)
    } else if let Some(rest) = lower.strip_suffix('m') {
        (rest, 1_000_000.0)
    } else {
        (lower.as_str(), 1.0)
    };
    if digits.is_empty() {
        return None;
    }
    digits
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n * multiplier)
}

fn split_name(full: Option<&str>) -> (String, String) {
    let Some(full) = full else {
        return (UNKNOWN_FIRST_NAME.to_string(), UNKNOWN_LAST_NAME.to_string());
    };
    match full.split_once(char::is_whitespace) {
        Some((first, rest)) if !rest.trim().is_empty() => {
            (first.to_string(), rest.trim().to_string())
        }
        _ => (full.to_string(), UNKNOWN_LAST_NAME.to_string()),
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn cell(entry: &GroupEntry, column: &str) -> String {
    entry
        .get(column)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn is_blank(entry: &GroupEntry) -> bool {
    entry.values().all(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, MockLeadBackend};
    use crate::questionnaire::FormAction;
    use crate::submission::webhook::{MockLeadNotifier, WebhookError};
    use reqwest::StatusCode;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn filled() -> FormState {
        let mut values = FormState::new()
            .with_text("clientName", "Jane Mary Doe")
            .with_text("advisorName", "Andrew Cave")
            .with_flag(CONSENT_FIELD, true)
            .with_text("email", "jane@example.com")
            .with_text("contactPreference", "phone")
            .with_text("insuranceInterest", "trauma")
            .with_text("annualIncome", "$85,000")
            .with_text("monthlyExpenses", "about 3k")
            .with_text("notes", "  call after 5  ");
        values.apply(FormAction::AddEntry {
            group: "dependents",
        });
        values.apply(FormAction::AddEntry {
            group: "dependents",
        });
        for ch in "Sam".chars() {
            values.apply(FormAction::PushCellChar {
                group: "dependents",
                index: 0,
                column: "name",
                ch,
            });
        }
        values.apply(FormAction::PushCellChar {
            group: "dependents",
            index: 0,
            column: "age",
            ch: '4',
        });
        values
    }

    mod amounts {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_parse_amount_formats() {
            assert_eq!(parse_amount("$85,000"), Some(85000.0));
            assert_eq!(parse_amount("1 200.50"), Some(1200.5));
            assert_eq!(parse_amount("85k"), Some(85000.0));
            assert_eq!(parse_amount("2.5M"), Some(2_500_000.0));
            assert_eq!(parse_amount("NZ$ 450"), Some(450.0));
            assert_eq!(parse_amount("-250"), Some(-250.0));
        }

        #[test]
        fn test_parse_amount_rejects_garbage() {
            assert_eq!(parse_amount("abc"), None);
            assert_eq!(parse_amount(""), None);
            assert_eq!(parse_amount("$"), None);
            assert_eq!(parse_amount("k"), None);
            assert_eq!(parse_amount("about 3k"), None);
            assert_eq!(parse_amount("inf"), None);
        }
    }

    mod mapping {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_empty_form_uses_placeholders() {
            let contact = build_contact(&FormState::new());
            assert_eq!(contact.first_name, UNKNOWN_FIRST_NAME);
            assert_eq!(contact.last_name, UNKNOWN_LAST_NAME);
            assert_eq!(contact.email, UNKNOWN_EMAIL);
            assert_eq!(contact.phone, UNKNOWN_PHONE);
            assert_eq!(contact.contact_preference, ContactPreference::Email);
            assert_eq!(contact.insurance_interest, InsuranceInterest::General);
            assert_eq!(contact.status, LeadStatus::New);
            assert_eq!(contact.source, "fact-find");
        }

        #[test]
        fn test_contact_from_filled_form() {
            let contact = build_contact(&filled());
            assert_eq!(contact.first_name, "Jane");
            assert_eq!(contact.last_name, "Mary Doe");
            assert_eq!(contact.email, "jane@example.com");
            assert_eq!(contact.phone, UNKNOWN_PHONE);
            assert_eq!(contact.contact_preference, ContactPreference::Phone);
            assert_eq!(contact.insurance_interest, InsuranceInterest::Trauma);
            assert_eq!(contact.notes.as_deref(), Some("call after 5"));
            assert!(contact.preferred_date.is_none());
        }

        #[test]
        fn test_single_word_name() {
            let values = FormState::new().with_text("clientName", "Cher");
            let contact = build_contact(&values);
            assert_eq!(contact.first_name, "Cher");
            assert_eq!(contact.last_name, UNKNOWN_LAST_NAME);
        }

        #[test]
        fn test_answers_parse_amounts_and_groups() {
            let answers = build_answers(&filled());
            assert_eq!(answers.client_name, "Jane Mary Doe");
            assert!(answers.disclose_info);
            assert_eq!(answers.annual_income, Some(85000.0));
            assert_eq!(answers.monthly_expenses, None);
            // Second dependent was left blank
            assert_eq!(
                answers.dependents,
                vec![Dependent {
                    name: "Sam".to_string(),
                    age: Some(4),
                    relationship: String::new(),
                }]
            );
            assert!(answers.existing_policies.is_empty());
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        fn adapter(backend: MockLeadBackend) -> SubmissionAdapter {
            SubmissionAdapter::new(Arc::new(backend))
        }

        #[tokio::test]
        async fn test_complete_submission() {
            let mut backend = MockLeadBackend::new();
            backend
                .expect_create_contact()
                .times(1)
                .returning(|_| Ok("c-1".to_string()));
            backend
                .expect_create_questionnaire()
                .withf(|q| q.contact_id == "c-1" && q.answers.annual_income == Some(85000.0))
                .times(1)
                .returning(|_| Ok("q-1".to_string()));

            let outcome = adapter(backend).submit(&filled()).await;
            assert_eq!(
                outcome,
                SubmissionOutcome::Complete {
                    contact_id: "c-1".to_string(),
                    questionnaire_id: "q-1".to_string(),
                }
            );
        }

        #[tokio::test]
        async fn test_primary_failure_skips_secondary() {
            let mut backend = MockLeadBackend::new();
            backend.expect_create_contact().returning(|_| {
                Err(BackendError::Server {
                    status: StatusCode::SERVICE_UNAVAILABLE,
                })
            });
            backend.expect_create_questionnaire().never();

            let outcome = adapter(backend).submit(&filled()).await;
            assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
            assert!(!outcome.is_success());
        }

        #[tokio::test]
        async fn test_secondary_failure_is_partial() {
            let mut backend = MockLeadBackend::new();
            backend
                .expect_create_contact()
                .returning(|_| Ok("c-9".to_string()));
            backend.expect_create_questionnaire().returning(|_| {
                Err(BackendError::Rejected {
                    status: StatusCode::BAD_REQUEST,
                    message: "annual_income must be numeric".to_string(),
                })
            });

            let outcome = adapter(backend).submit(&FormState::new()).await;
            match outcome {
                SubmissionOutcome::Partial { contact_id, error } => {
                    assert_eq!(contact_id, "c-9");
                    assert!(error.contains("annual_income"));
                }
                other => panic!("expected partial, got {other:?}"),
            }
        }

        #[tokio::test]
        async fn test_webhook_fires_after_primary_success() {
            let mut backend = MockLeadBackend::new();
            backend
                .expect_create_contact()
                .returning(|_| Ok("c-1".to_string()));
            backend
                .expect_create_questionnaire()
                .returning(|_| Ok("q-1".to_string()));

            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut notifier = MockLeadNotifier::new();
            notifier.expect_notify().times(1).returning(move |payload| {
                let _ = tx.send(payload.clone());
                Ok(())
            });

            let outcome = adapter(backend)
                .with_notifier(Arc::new(notifier))
                .submit(&filled())
                .await;
            assert!(outcome.is_success());

            let payload = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(payload.submission_id, "c-1");
            assert_eq!(payload.name, "Jane Mary Doe");
            assert_eq!(payload.interest, "trauma");
            assert_eq!(payload.source, "fact-find");
        }

        #[tokio::test]
        async fn test_webhook_failure_does_not_change_outcome() {
            let mut backend = MockLeadBackend::new();
            backend
                .expect_create_contact()
                .returning(|_| Ok("c-1".to_string()));
            backend
                .expect_create_questionnaire()
                .returning(|_| Ok("q-1".to_string()));

            let (tx, mut rx) = mpsc::unbounded_channel();
            let mut notifier = MockLeadNotifier::new();
            notifier.expect_notify().returning(move |_| {
                let _ = tx.send(());
                Err(WebhookError::Status(StatusCode::BAD_GATEWAY))
            });

            let outcome = adapter(backend)
                .with_notifier(Arc::new(notifier))
                .submit(&filled())
                .await;
            assert!(matches!(outcome, SubmissionOutcome::Complete { .. }));
            tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_no_webhook_when_primary_fails() {
            let mut backend = MockLeadBackend::new();
            backend.expect_create_contact().returning(|_| {
                Err(BackendError::Malformed("missing id".to_string()))
            });
            let mut notifier = MockLeadNotifier::new();
            notifier.expect_notify().never();

            let outcome = adapter(backend)
                .with_notifier(Arc::new(notifier))
                .submit(&filled())
                .await;
            assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
        }
    }
}
