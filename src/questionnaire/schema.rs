//! Field declarations and validation rules

use super::values::FormState;
use std::collections::BTreeMap;
use std::fmt;

/// Consent flag that must be set before leaving the first step
pub const CONSENT_FIELD: &str = "discloseInfo";

/// Column of a repeatable group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupColumn {
    pub name: &'static str,
    pub label: &'static str,
}

/// Shape of a repeatable group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    /// Singular noun used in labels ("Dependent 1", "Add dependent")
    pub item: &'static str,
    pub columns: &'static [GroupColumn],
}

/// How a field is edited and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    /// Money amount typed as free text, parsed at submission
    Amount,
    Flag,
    Choice(&'static [&'static str]),
    Group(&'static GroupSpec),
}

/// Navigation rule attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Optional,
    Required,
    /// Flag that must be true
    MustAccept,
}

/// Declaration of a single questionnaire field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rule: Rule,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn multiline(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Multiline)
    }

    pub const fn amount(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Amount)
    }

    pub const fn flag(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Flag)
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::Choice(options))
    }

    pub const fn group(name: &'static str, label: &'static str, spec: &'static GroupSpec) -> Self {
        Self::new(name, label, FieldKind::Group(spec))
    }

    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            rule: Rule::Optional,
        }
    }

    pub const fn required(mut self) -> Self {
        self.rule = Rule::Required;
        self
    }

    pub const fn must_accept(mut self) -> Self {
        self.rule = Rule::MustAccept;
        self
    }

    pub fn is_required(&self) -> bool {
        !matches!(self.rule, Rule::Optional)
    }

    /// Error message if `values` break this field's rule
    pub fn check(&self, values: &FormState) -> Option<String> {
        match self.rule {
            Rule::Optional => None,
            Rule::Required => values
                .trimmed(self.name)
                .is_none()
                .then(|| format!("{} is required", self.label)),
            Rule::MustAccept => (!values.flag(self.name))
                .then(|| "Consent to disclose information is required to continue".to_string()),
        }
    }
}

/// Field-level validation failures, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    pub fn remove(&mut self, field: &str) {
        self.fields.remove(field);
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.fields().collect();
        write!(f, "invalid fields: {}", names.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check every rule in `fields` against `values`
pub fn validate(fields: &[FieldSpec], values: &FormState) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for field in fields {
        if let Some(message) = field.check(values) {
            errors.fields.insert(field.name, message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("clientName", "Client name").required(),
        FieldSpec::text("email", "Email"),
        FieldSpec::flag(CONSENT_FIELD, "I agree").must_accept(),
    ];

    #[test]
    fn test_optional_fields_never_fail() {
        let values = FormState::new()
            .with_text("clientName", "Jane")
            .with_flag(CONSENT_FIELD, true);
        assert!(validate(FIELDS, &values).is_ok());
    }

    #[test]
    fn test_required_field_blank() {
        let values = FormState::new()
            .with_text("clientName", "  ")
            .with_flag(CONSENT_FIELD, true);
        let errors = validate(FIELDS, &values).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("clientName"), Some("Client name is required"));
    }

    #[test]
    fn test_consent_false_is_error() {
        let values = FormState::new()
            .with_text("clientName", "Jane")
            .with_flag(CONSENT_FIELD, false);
        let errors = validate(FIELDS, &values).unwrap_err();
        assert!(errors.contains(CONSENT_FIELD));
    }

    #[test]
    fn test_display_lists_fields() {
        let errors = validate(FIELDS, &FormState::new()).unwrap_err();
        assert_eq!(errors.to_string(), "invalid fields: clientName, discloseInfo");
    }

    #[test]
    fn test_is_required() {
        assert!(FIELDS[0].is_required());
        assert!(!FIELDS[1].is_required());
        assert!(FIELDS[2].is_required());
    }
}
