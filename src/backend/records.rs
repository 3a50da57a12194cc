//! Record shapes exchanged with the lead backend

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Where a lead is in the office's follow-up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Closed,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Closed,
    ];

    /// Next status in the triage flow; `Closed` stays closed
    pub fn advance(self) -> Self {
        match self {
            Self::New => Self::Contacted,
            Self::Contacted => Self::Qualified,
            Self::Qualified | Self::Closed => Self::Closed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPreference {
    #[default]
    Email,
    Phone,
    Either,
}

impl ContactPreference {
    /// Parse a form value; unknown or blank input is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "email" => Some(Self::Email),
            "phone" => Some(Self::Phone),
            "either" | "any" | "both" => Some(Self::Either),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Either => "either",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsuranceInterest {
    Life,
    Income,
    Trauma,
    Health,
    Mortgage,
    General,
}

impl InsuranceInterest {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "life" => Some(Self::Life),
            "income" | "income protection" => Some(Self::Income),
            "trauma" => Some(Self::Trauma),
            "health" | "medical" => Some(Self::Health),
            "mortgage" | "mortgage protection" => Some(Self::Mortgage),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Life => "life",
            Self::Income => "income",
            Self::Trauma => "trauma",
            Self::Health => "health",
            Self::Mortgage => "mortgage",
            Self::General => "general",
        }
    }
}

/// Primary lead record as sent on submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub contact_preference: ContactPreference,
    pub insurance_interest: InsuranceInterest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub source: String,
}

/// Stored lead record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contact {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    /// Values this build does not know read as `None`
    #[serde(default, deserialize_with = "known_or_none")]
    pub contact_preference: Option<ContactPreference>,
    #[serde(default, deserialize_with = "known_or_none")]
    pub insurance_interest: Option<InsuranceInterest>,
    #[serde(default)]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: LeadStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Household member who relies on the client
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dependent {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub relationship: String,
}

/// Policy the client already holds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExistingPolicy {
    pub provider: String,
    #[serde(default)]
    pub cover_type: String,
    #[serde(default)]
    pub sum_insured: Option<f64>,
    #[serde(default)]
    pub premium: Option<f64>,
}

/// Questionnaire detail answers, shared by the create and read shapes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionnaireAnswers {
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    #[serde(default)]
    pub advisor_name: String,
    #[serde(default)]
    pub meeting_date: Option<String>,
    #[serde(default)]
    pub disclose_info: bool,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub dependents: Vec<Dependent>,
    #[serde(default)]
    pub annual_income: Option<f64>,
    #[serde(default)]
    pub partner_income: Option<f64>,
    #[serde(default)]
    pub monthly_expenses: Option<f64>,
    #[serde(default)]
    pub total_assets: Option<f64>,
    #[serde(default)]
    pub total_liabilities: Option<f64>,
    #[serde(default)]
    pub mortgage_balance: Option<f64>,
    #[serde(default)]
    pub kiwisaver_balance: Option<f64>,
    #[serde(default)]
    pub existing_policies: Vec<ExistingPolicy>,
    #[serde(default)]
    pub objectives: Option<String>,
}

/// Secondary record linked to a contact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewQuestionnaire {
    pub contact_id: String,
    #[serde(flatten)]
    pub answers: QuestionnaireAnswers,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionnaireDetail {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub contact_id: String,
    #[serde(flatten)]
    pub answers: QuestionnaireAnswers,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAppointment {
    pub contact_id: String,
    pub scheduled_for: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub contact_id: String,
    pub scheduled_for: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// How the office reached out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Phone,
    Note,
}

/// Entry appended to a contact's communication history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunicationLog {
    pub contact_id: String,
    pub channel: Channel,
    pub summary: String,
    pub logged_at: DateTime<Utc>,
}

/// `{"id": ..}` returned by create calls
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Created {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
}

/// Accept ids as either JSON strings or numbers
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn known_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_status_advance_stops_at_closed() {
        let mut status = LeadStatus::New;
        let mut seen = vec![status];
        while status != LeadStatus::Closed {
            status = status.advance();
            seen.push(status);
        }
        assert_eq!(seen, LeadStatus::ALL.to_vec());
        assert_eq!(LeadStatus::Closed.advance(), LeadStatus::Closed);
    }

    #[test]
    fn test_enum_parsing_is_lenient() {
        assert_eq!(ContactPreference::parse(" Phone "), Some(ContactPreference::Phone));
        assert_eq!(ContactPreference::parse(""), None);
        assert_eq!(
            InsuranceInterest::parse("Income Protection"),
            Some(InsuranceInterest::Income)
        );
        assert_eq!(InsuranceInterest::parse("boats"), None);
    }

    #[test]
    fn test_contact_accepts_numeric_id_and_missing_fields() {
        let contact: Contact = serde_json::from_value(json!({
            "id": 42,
            "first_name": "Jane",
            "last_name": "Doe",
            "status": "qualified"
        }))
        .unwrap();
        assert_eq!(contact.id, "42");
        assert_eq!(contact.status, LeadStatus::Qualified);
        assert_eq!(contact.full_name(), "Jane Doe");
        assert!(contact.email.is_empty());
    }

    #[test]
    fn test_contact_tolerates_nulls_and_unknown_choices() {
        let contact: Contact = serde_json::from_value(json!({
            "id": "c-9",
            "first_name": null,
            "last_name": "Ngata",
            "email": null,
            "contact_preference": "carrier pigeon",
            "insurance_interest": "pet",
            "status": null
        }))
        .unwrap();
        assert_eq!(contact.full_name(), "Ngata");
        assert!(contact.email.is_empty());
        assert_eq!(contact.contact_preference, None);
        assert_eq!(contact.insurance_interest, None);
        assert_eq!(contact.status, LeadStatus::New);
    }

    #[test]
    fn test_unknown_status_is_still_an_error() {
        let result = serde_json::from_value::<Contact>(json!({"id": 1, "status": "archived"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_questionnaire_is_flat() {
        let record = NewQuestionnaire {
            contact_id: "c-1".to_string(),
            answers: QuestionnaireAnswers {
                client_name: "Jane Doe".to_string(),
                annual_income: Some(85000.0),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["contact_id"], "c-1");
        assert_eq!(value["client_name"], "Jane Doe");
        assert_eq!(value["annual_income"], 85000.0);
        assert!(value.get("answers").is_none());
    }

    #[test]
    fn test_new_contact_omits_absent_optionals() {
        let contact = NewContact {
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
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value["insurance_interest"], "life");
        assert_eq!(value["status"], "new");
        assert!(value.get("notes").is_none());
    }
}
