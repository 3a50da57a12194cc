//! Form value store and typed update actions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of a repeatable group (column name to text)
pub type GroupEntry = BTreeMap<String, String>;

/// A single answer in the questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
    Group(Vec<GroupEntry>),
}

/// Typed edits applied to [`FormState`]
#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    SetText {
        field: &'static str,
        value: String,
    },
    PushChar {
        field: &'static str,
        ch: char,
    },
    PopChar {
        field: &'static str,
    },
    SetFlag {
        field: &'static str,
        value: bool,
    },
    ToggleFlag {
        field: &'static str,
    },
    AddEntry {
        group: &'static str,
    },
    RemoveEntry {
        group: &'static str,
        index: usize,
    },
    PushCellChar {
        group: &'static str,
        index: usize,
        column: &'static str,
        ch: char,
    },
    PopCellChar {
        group: &'static str,
        index: usize,
        column: &'static str,
    },
}

impl FormAction {
    /// Name of the field or group this action edits
    pub fn field(&self) -> &'static str {
        match self {
            Self::SetText { field, .. }
            | Self::PushChar { field, .. }
            | Self::PopChar { field }
            | Self::SetFlag { field, .. }
            | Self::ToggleFlag { field } => field,
            Self::AddEntry { group }
            | Self::RemoveEntry { group, .. }
            | Self::PushCellChar { group, .. }
            | Self::PopCellChar { group, .. } => group,
        }
    }
}

/// All answers of one questionnaire session, keyed by field name.
///
/// Serializes to a flat JSON object (`{"clientName": "...", "discloseInfo": true}`),
/// which is also the draft format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_text(mut self, field: &str, value: impl Into<String>) -> Self {
        self.values
            .insert(field.to_string(), FieldValue::Text(value.into()));
        self
    }

    #[cfg(test)]
    pub fn with_flag(mut self, field: &str, value: bool) -> Self {
        self.values.insert(field.to_string(), FieldValue::Flag(value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Text value, or "" when absent or not text
    pub fn text(&self, field: &str) -> &str {
        match self.values.get(field) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    /// Trimmed text value, `None` when blank
    pub fn trimmed(&self, field: &str) -> Option<&str> {
        let value = self.text(field).trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn flag(&self, field: &str) -> bool {
        matches!(self.values.get(field), Some(FieldValue::Flag(true)))
    }

    pub fn group(&self, group: &str) -> &[GroupEntry] {
        match self.values.get(group) {
            Some(FieldValue::Group(entries)) => entries,
            _ => &[],
        }
    }

    /// Apply a single edit
    pub fn apply(&mut self, action: FormAction) {
        match action {
            FormAction::SetText { field, value } => {
                self.values.insert(field.to_string(), FieldValue::Text(value));
            }
            FormAction::PushChar { field, ch } => {
                if let Some(text) = self.text_mut(field) {
                    text.push(ch);
                }
            }
            FormAction::PopChar { field } => {
                if let Some(text) = self.text_mut(field) {
                    text.pop();
                }
            }
            FormAction::SetFlag { field, value } => {
                self.values.insert(field.to_string(), FieldValue::Flag(value));
            }
            FormAction::ToggleFlag { field } => {
                let value = !self.flag(field);
                self.values.insert(field.to_string(), FieldValue::Flag(value));
            }
            FormAction::AddEntry { group } => {
                if let Some(entries) = self.group_mut(group) {
                    entries.push(GroupEntry::new());
                }
            }
            FormAction::RemoveEntry { group, index } => {
                if let Some(entries) = self.group_mut(group) {
                    if index < entries.len() {
                        entries.remove(index);
                    }
                }
            }
            FormAction::PushCellChar {
                group,
                index,
                column,
                ch,
            } => {
                if let Some(entry) = self.group_mut(group).and_then(|e| e.get_mut(index)) {
                    entry.entry(column.to_string()).or_default().push(ch);
                }
            }
            FormAction::PopCellChar {
                group,
                index,
                column,
            } => {
                if let Some(cell) = self
                    .group_mut(group)
                    .and_then(|e| e.get_mut(index))
                    .and_then(|entry| entry.get_mut(column))
                {
                    cell.pop();
                }
            }
        }
    }

    /// Drop every answer
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Text slot for `field`, created if absent. `None` if the field holds a
    /// flag or a group.
    fn text_mut(&mut self, field: &str) -> Option<&mut String> {
        let slot = self
            .values
            .entry(field.to_string())
            .or_insert_with(|| FieldValue::Text(String::new()));
        match slot {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn group_mut(&mut self, group: &str) -> Option<&mut Vec<GroupEntry>> {
        let slot = self
            .values
            .entry(group.to_string())
            .or_insert_with(|| FieldValue::Group(Vec::new()));
        match slot {
            FieldValue::Group(entries) => Some(entries),
            _ => None,
        }
    }
}
