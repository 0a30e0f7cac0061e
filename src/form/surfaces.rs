use chrono::{DateTime, NaiveDate};

use crate::{
    form::form_model::{FieldKind, FieldSpec, FormSchema, Surface},
    snapshot::snapshot_model::{FieldMap, FieldValue},
    tracker::deferred::{CapturePolicy, CaptureSource},
};

pub const CIN_LENGTH: usize = 8;

pub const SEXES: &[&str] = &["Homme", "Femme"];
pub const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];
pub const MARITAL_STATUSES: &[&str] = &["Célibataire", "Marié(e)", "Divorcé(e)", "Veuf(ve)"];
pub const PATIENT_TYPES: &[&str] = &["Permanent", "Vacancier", "Fin Traitement"];
pub const END_CAUSES: &[&str] = &["Transféré", "Décès", "Greffe"];

/// Patient type that requires an end date and cause.
pub const END_OF_TREATMENT: &str = "Fin Traitement";

pub const ANTECEDENT_TYPES: &[&str] = &["Médicaux", "Chirurgicaux", "Allergies", "Statut Infectieux"];

impl Surface {
    pub fn schema(&self) -> FormSchema {
        match self {
            Surface::Patient => patient_schema(),
            Surface::User => user_schema(),
            Surface::Antecedent => antecedent_schema(),
            Surface::MedicalRecord => medical_record_schema(),
        }
    }
}

fn field(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        required,
    }
}

/// Patient demographics. The baseline is taken two render cycles after open
/// so that select widgets have settled.
pub fn patient_schema() -> FormSchema {
    use FieldKind::*;

    FormSchema {
        surface: Surface::Patient,
        fields: vec![
            field("nom_complet", "Full name", Text, true),
            field("cin", "CIN", Number { zero_pad: Some(CIN_LENGTH) }, true),
            field("ass_cnss", "Ass/CNSS", Text, true),
            field("date_naissance", "Birth date", Date { default_today: false }, true),
            field("sexe", "Sex", Select(SEXES), true),
            field("groupe_sanguin", "Blood group", Select(BLOOD_GROUPS), true),
            field("profession", "Profession", Text, false),
            field("situation_familiale", "Marital status", Select(MARITAL_STATUSES), false),
            field("telephone", "Phone", Number { zero_pad: None }, false),
            field("telephone_urgence", "Emergency phone", Number { zero_pad: None }, false),
            field("adresse", "Address", Text, false),
            field("date_debut", "Start date", Date { default_today: false }, true),
            field("type_patient", "Type", Select(PATIENT_TYPES), true),
            field("date_fin", "End date", Date { default_today: false }, false),
            field("cause_fin", "End cause", Select(END_CAUSES), false),
        ],
        capture: CapturePolicy::AfterCycles(2),
        capture_source: CaptureSource::Opening,
        categories: &[],
    }
}

/// User account with its authorized patients.
pub fn user_schema() -> FormSchema {
    FormSchema {
        surface: Surface::User,
        fields: vec![
            field("username", "Username", FieldKind::Text, true),
            field("password", "Password", FieldKind::Text, true),
            field("selectedPatients", "Authorized patients", FieldKind::Ids, true),
        ],
        capture: CapturePolicy::Immediate,
        capture_source: CaptureSource::Opening,
        categories: &[],
    }
}

/// One antecedent category, edited in a rich-text editor.
pub fn antecedent_schema() -> FormSchema {
    FormSchema {
        surface: Surface::Antecedent,
        fields: vec![field("content", "Content", FieldKind::RichText, true)],
        capture: CapturePolicy::AwaitDependency { cycles: 1 },
        capture_source: CaptureSource::Opening,
        categories: ANTECEDENT_TYPES,
    }
}

/// Dated medical-record entry. The editor rewrites its content when it
/// mounts, so the baseline follows what it last reported.
pub fn medical_record_schema() -> FormSchema {
    FormSchema {
        surface: Surface::MedicalRecord,
        fields: vec![
            field("date", "Date", FieldKind::Date { default_today: true }, true),
            field("content", "Content", FieldKind::RichText, true),
        ],
        capture: CapturePolicy::AwaitDependency { cycles: 1 },
        capture_source: CaptureSource::LatestObserved,
        categories: &[],
    }
}

/// Turn a stored record into what the form's inputs hold, in schema order.
/// Keys the schema does not know are dropped. `today` fills date fields that
/// default to the current date.
pub fn format_record(schema: &FormSchema, record: &FieldMap, today: NaiveDate) -> FieldMap {
    let mut formatted = FieldMap::new();

    for f in &schema.fields {
        let value = record.get(f.key).unwrap_or(&FieldValue::Null);
        formatted.set(f.key, format_value(&f.kind, value, today));
    }

    formatted
}

fn format_value(kind: &FieldKind, value: &FieldValue, today: NaiveDate) -> FieldValue {
    match kind {
        FieldKind::Ids => match value {
            FieldValue::Ids(ids) => FieldValue::Ids(ids.clone()),
            _ => FieldValue::Ids(Vec::new()),
        },
        FieldKind::Date { default_today } => {
            let date = parse_input_date(&value.to_input_text())
                .or_else(|| default_today.then_some(today));
            FieldValue::Text(date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default())
        }
        FieldKind::Number { zero_pad: Some(width) } => {
            let text = value.to_input_text();
            if text.is_empty() {
                FieldValue::Text(text)
            } else {
                FieldValue::Text(format!("{:0>width$}", text, width = *width))
            }
        }
        _ => FieldValue::Text(value.to_input_text()),
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, or anything starting with a
/// `YYYY-MM-DD` prefix.
pub fn parse_input_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    let prefix = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}
