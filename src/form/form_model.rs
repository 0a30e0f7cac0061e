use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    snapshot::snapshot_model::{FieldMap, FieldValue},
    tracker::deferred::{CapturePolicy, CaptureSource},
};

/// The editing surfaces of the clinic front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Patient,
    User,
    Antecedent,
    MedicalRecord,
}

impl Surface {
    pub const ALL: [Surface; 4] = [
        Surface::Patient,
        Surface::User,
        Surface::Antecedent,
        Surface::MedicalRecord,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Surface::Patient => "patient",
            Surface::User => "user",
            Surface::Antecedent => "antecedent",
            Surface::MedicalRecord => "medical_record",
        }
    }

    pub fn from_name(name: &str) -> Option<Surface> {
        Surface::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Digits typed into a text input; `zero_pad` left-pads on open.
    Number { zero_pad: Option<usize> },
    /// `YYYY-MM-DD`. With `default_today`, a new record or an unreadable
    /// stored date opens on the current date.
    Date { default_today: bool },
    Select(&'static [&'static str]),
    /// List of selected identifiers.
    Ids,
    /// HTML produced by a rich-text editor.
    RichText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn blank_value(&self, today: NaiveDate) -> FieldValue {
        match self.kind {
            FieldKind::Ids => FieldValue::Ids(Vec::new()),
            FieldKind::Date { default_today: true } => {
                FieldValue::Text(today.format("%Y-%m-%d").to_string())
            }
            _ => FieldValue::Text(String::new()),
        }
    }
}

/// Field layout and capture behaviour of one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSchema {
    pub surface: Surface,
    pub fields: Vec<FieldSpec>,
    pub capture: CapturePolicy,
    pub capture_source: CaptureSource,
    /// Tabs the surface can switch between; empty when it has none.
    pub categories: &'static [&'static str],
}

impl FormSchema {
    pub fn has_category(&self, name: &str) -> bool {
        self.categories.contains(&name)
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Mapping used when the form opens on a new record.
    pub fn blank(&self, today: NaiveDate) -> FieldMap {
        self.fields
            .iter()
            .map(|f| (f.key, f.blank_value(today)))
            .collect()
    }
}
