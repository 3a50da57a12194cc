//! The six questionnaire steps

use super::schema::{self, FieldSpec, GroupColumn, GroupSpec, ValidationErrors, CONSENT_FIELD};
use super::values::FormState;

pub const CONTACT_PREFERENCES: &[&str] = &["email", "phone", "either"];

pub const INSURANCE_INTERESTS: &[&str] =
    &["life", "income", "trauma", "health", "mortgage", "general"];

pub const DEPENDENTS: GroupSpec = GroupSpec {
    item: "dependent",
    columns: &[
        GroupColumn {
            name: "name",
            label: "Name",
        },
        GroupColumn {
            name: "age",
            label: "Age",
        },
        GroupColumn {
            name: "relationship",
            label: "Relationship",
        },
    ],
};

pub const EXISTING_POLICIES: GroupSpec = GroupSpec {
    item: "policy",
    columns: &[
        GroupColumn {
            name: "provider",
            label: "Provider",
        },
        GroupColumn {
            name: "coverType",
            label: "Cover type",
        },
        GroupColumn {
            name: "sumInsured",
            label: "Sum insured",
        },
        GroupColumn {
            name: "premium",
            label: "Premium",
        },
    ],
};

/// A page of the questionnaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    /// 1-based position
    pub index: usize,
    pub title: &'static str,
    pub intro: &'static str,
    pub fields: &'static [FieldSpec],
}

impl StepDefinition {
    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.is_required())
    }

    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn validate(&self, values: &FormState) -> Result<(), ValidationErrors> {
        schema::validate(self.fields, values)
    }

    pub fn is_last(&self) -> bool {
        self.index == STEP_COUNT
    }
}

pub const STEP_COUNT: usize = 6;

pub static STEPS: [StepDefinition; STEP_COUNT] = [
    StepDefinition {
        index: 1,
        title: "Client & consent",
        intro: "Who is this fact find for, and may we use the information you share?",
        fields: &[
            FieldSpec::text("clientName", "Client name").required(),
            FieldSpec::text("partnerName", "Partner name"),
            FieldSpec::text("advisorName", "Advisor name").required(),
            FieldSpec::text("meetingDate", "Meeting date"),
            FieldSpec::flag(
                CONSENT_FIELD,
                "I authorise my advisor to collect and disclose this information",
            )
            .must_accept(),
        ],
    },
    StepDefinition {
        index: 2,
        title: "Personal details",
        intro: "How we can reach you and a little about you.",
        fields: &[
            FieldSpec::text("dateOfBirth", "Date of birth"),
            FieldSpec::text("email", "Email"),
            FieldSpec::text("phone", "Phone"),
            FieldSpec::multiline("address", "Address"),
            FieldSpec::text("occupation", "Occupation"),
            FieldSpec::flag("smoker", "Smoked in the last 12 months"),
            FieldSpec::choice("contactPreference", "Preferred contact", CONTACT_PREFERENCES),
        ],
    },
    StepDefinition {
        index: 3,
        title: "Dependents",
        intro: "Anyone who relies on you financially.",
        fields: &[FieldSpec::group("dependents", "Dependents", &DEPENDENTS)],
    },
    StepDefinition {
        index: 4,
        title: "Financial position",
        intro: "Approximate figures are fine.",
        fields: &[
            FieldSpec::amount("annualIncome", "Annual income"),
            FieldSpec::amount("partnerIncome", "Partner annual income"),
            FieldSpec::amount("monthlyExpenses", "Monthly expenses"),
            FieldSpec::amount("totalAssets", "Total assets"),
            FieldSpec::amount("totalLiabilities", "Total liabilities"),
            FieldSpec::amount("mortgageBalance", "Mortgage balance"),
            FieldSpec::amount("kiwisaverBalance", "KiwiSaver balance"),
        ],
    },
    StepDefinition {
        index: 5,
        title: "Existing cover",
        intro: "Policies you already hold.",
        fields: &[FieldSpec::group(
            "existingPolicies",
            "Existing policies",
            &EXISTING_POLICIES,
        )],
    },
    StepDefinition {
        index: 6,
        title: "Needs & objectives",
        intro: "What you would like to protect, and when we should talk.",
        fields: &[
            FieldSpec::choice("insuranceInterest", "Main interest", INSURANCE_INTERESTS),
            FieldSpec::multiline("objectives", "Objectives"),
            FieldSpec::text("preferredDate", "Preferred appointment date"),
            FieldSpec::text("preferredTime", "Preferred appointment time"),
            FieldSpec::multiline("notes", "Anything else we should know"),
        ],
    },
];

/// Look up a step by its 1-based index
pub fn step(index: usize) -> Option<&'static StepDefinition> {
    index.checked_sub(1).and_then(|i| STEPS.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_indices_are_contiguous_and_one_based() {
        for (position, definition) in STEPS.iter().enumerate() {
            assert_eq!(definition.index, position + 1);
        }
        assert!(step(0).is_none());
        assert!(step(STEP_COUNT + 1).is_none());
        assert_eq!(step(1).map(|s| s.title), Some("Client & consent"));
        assert!(step(STEP_COUNT).unwrap().is_last());
    }

    #[test]
    fn test_field_names_unique_across_steps() {
        let mut seen = HashSet::new();
        for field in STEPS.iter().flat_map(|s| s.fields.iter()) {
            assert!(seen.insert(field.name), "duplicate field {}", field.name);
        }
    }

    #[test]
    fn test_only_first_step_has_required_fields() {
        let required: Vec<_> = step(1).unwrap().required_fields().map(|f| f.name).collect();
        assert_eq!(required, vec!["clientName", "advisorName", CONSENT_FIELD]);
        for definition in &STEPS[1..] {
            assert_eq!(definition.required_fields().count(), 0);
        }
    }

    #[test]
    fn test_later_steps_accept_empty_form() {
        let empty = FormState::new();
        for definition in &STEPS[1..] {
            assert!(definition.validate(&empty).is_ok());
        }
    }

    #[test]
    fn test_first_step_example_passes() {
        let values = FormState::new()
            .with_text("clientName", "Jane Doe")
            .with_text("advisorName", "Andrew Cave")
            .with_flag(CONSENT_FIELD, true);
        assert!(step(1).unwrap().validate(&values).is_ok());
    }

    #[test]
    fn test_first_step_missing_consent_names_field() {
        let values = FormState::new()
            .with_text("clientName", "Jane Doe")
            .with_text("advisorName", "Andrew Cave");
        let errors = step(1).unwrap().validate(&values).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![CONSENT_FIELD]);
    }

    #[test]
    fn test_field_lookup() {
        let personal = step(2).unwrap();
        assert_eq!(personal.field("email").map(|f| f.label), Some("Email"));
        assert!(personal.field("clientName").is_none());
    }
}
