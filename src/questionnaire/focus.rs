//! Focusable slots of a step and how key input maps onto form actions

use super::schema::{FieldKind, FieldSpec, GroupColumn, GroupSpec};
use super::steps::StepDefinition;
use super::values::{FormAction, FormState};

/// One focusable item on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusSlot {
    /// Scalar field (text, amount, flag, choice)
    Field(&'static FieldSpec),
    /// One cell of a repeatable group entry
    Cell {
        field: &'static FieldSpec,
        group: &'static GroupSpec,
        entry: usize,
        column: &'static GroupColumn,
    },
    /// "Add entry" control at the end of a group
    AddEntry {
        field: &'static FieldSpec,
        group: &'static GroupSpec,
    },
}

/// Focus slots of `step`, in display order. Group fields expand to one slot
/// per cell plus a trailing add control.
pub fn focus_slots(step: &'static StepDefinition, values: &FormState) -> Vec<FocusSlot> {
    let mut slots = Vec::new();
    for field in step.fields {
        match field.kind {
            FieldKind::Group(group) => {
                let entries = values.group(field.name).len();
                for entry in 0..entries {
                    for column in group.columns {
                        slots.push(FocusSlot::Cell {
                            field,
                            group,
                            entry,
                            column,
                        });
                    }
                }
                slots.push(FocusSlot::AddEntry { field, group });
            }
            _ => slots.push(FocusSlot::Field(field)),
        }
    }
    slots
}

impl FocusSlot {
    /// Field (or group) this slot belongs to
    pub fn field(&self) -> &'static FieldSpec {
        match self {
            Self::Field(field) | Self::Cell { field, .. } | Self::AddEntry { field, .. } => *field,
        }
    }

    /// Label shown on the slot's border
    pub fn label(&self) -> String {
        match self {
            Self::Field(field) => field.label.to_string(),
            Self::Cell {
                group,
                entry,
                column,
                ..
            } => format!("{} {}: {}", capitalize(group.item), entry + 1, column.label),
            Self::AddEntry { group, .. } => format!("+ Add {}", group.item),
        }
    }

    /// Current display text of the slot
    pub fn display_value(&self, values: &FormState) -> String {
        match self {
            Self::Field(field) => match field.kind {
                FieldKind::Flag => {
                    if values.flag(field.name) {
                        "[x] Yes".to_string()
                    } else {
                        "[ ] No".to_string()
                    }
                }
                FieldKind::Choice(_) => match values.trimmed(field.name) {
                    Some(choice) => format!("< {choice} >"),
                    None => "< choose >".to_string(),
                },
                _ => values.text(field.name).to_string(),
            },
            Self::Cell {
                field,
                entry,
                column,
                ..
            } => values
                .group(field.name)
                .get(*entry)
                .and_then(|e| e.get(column.name))
                .cloned()
                .unwrap_or_default(),
            Self::AddEntry { field, .. } => {
                format!("{} so far", values.group(field.name).len())
            }
        }
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::Field(f) if f.kind == FieldKind::Multiline)
    }

    /// Action for a typed character, if the slot takes text
    pub fn input_char(&self, ch: char) -> Option<FormAction> {
        match self {
            Self::Field(field) => match field.kind {
                FieldKind::Text | FieldKind::Multiline | FieldKind::Amount => {
                    Some(FormAction::PushChar {
                        field: field.name,
                        ch,
                    })
                }
                FieldKind::Flag => match ch {
                    ' ' => Some(FormAction::ToggleFlag { field: field.name }),
                    'y' | 'Y' => Some(FormAction::SetFlag {
                        field: field.name,
                        value: true,
                    }),
                    'n' | 'N' => Some(FormAction::SetFlag {
                        field: field.name,
                        value: false,
                    }),
                    _ => None,
                },
                _ => None,
            },
            Self::Cell {
                field,
                entry,
                column,
                ..
            } => Some(FormAction::PushCellChar {
                group: field.name,
                index: *entry,
                column: column.name,
                ch,
            }),
            Self::AddEntry { .. } => None,
        }
    }

    /// Action for backspace
    pub fn backspace(&self) -> Option<FormAction> {
        match self {
            Self::Field(field) => match field.kind {
                FieldKind::Text | FieldKind::Multiline | FieldKind::Amount => {
                    Some(FormAction::PopChar { field: field.name })
                }
                _ => None,
            },
            Self::Cell {
                field,
                entry,
                column,
                ..
            } => Some(FormAction::PopCellChar {
                group: field.name,
                index: *entry,
                column: column.name,
            }),
            Self::AddEntry { .. } => None,
        }
    }

    /// Action for Enter, other than moving focus
    pub fn activate(&self) -> Option<FormAction> {
        match self {
            Self::Field(field) => match field.kind {
                FieldKind::Flag => Some(FormAction::ToggleFlag { field: field.name }),
                FieldKind::Multiline => Some(FormAction::PushChar {
                    field: field.name,
                    ch: '\n',
                }),
                _ => None,
            },
            Self::AddEntry { field, .. } => Some(FormAction::AddEntry { group: field.name }),
            Self::Cell { .. } => None,
        }
    }

    /// Step a choice field forwards or backwards through its options
    pub fn cycle(&self, values: &FormState, forward: bool) -> Option<FormAction> {
        let Self::Field(field) = self else {
            return None;
        };
        let FieldKind::Choice(options) = field.kind else {
            return None;
        };
        if options.is_empty() {
            return None;
        }
        let current = options.iter().position(|o| *o == values.text(field.name));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        Some(FormAction::SetText {
            field: field.name,
            value: options[next].to_string(),
        })
    }

    /// Action adding an entry to the slot's group
    pub fn add_entry(&self) -> Option<FormAction> {
        match self {
            Self::Cell { field, .. } | Self::AddEntry { field, .. } => {
                Some(FormAction::AddEntry { group: field.name })
            }
            Self::Field(_) => None,
        }
    }

    /// Action removing the entry this cell belongs to
    pub fn remove_entry(&self) -> Option<FormAction> {
        match self {
            Self::Cell { field, entry, .. } => Some(FormAction::RemoveEntry {
                group: field.name,
                index: *entry,
            }),
            _ => None,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
