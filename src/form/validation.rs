use std::fmt;

use chrono::NaiveDate;

use crate::{
    form::{
        form_model::{FormSchema, Surface},
        surfaces::{CIN_LENGTH, END_OF_TREATMENT, parse_input_date},
    },
    snapshot::snapshot_model::FieldMap,
};

pub const MIN_CREDENTIAL_LENGTH: usize = 3;

const REQUIRED: &str = "This field is required";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Per-field validation failures, in the order they were first raised.
/// A later rule on the same field replaces the earlier message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.errors.iter_mut().find(|e| e.field == field) {
            Some(existing) => existing.message = message,
            None => self.errors.push(FieldError {
                field: field.to_string(),
                message,
            }),
        }
    }

    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a form before it is saved. `today` bounds the date rules.
pub fn validate(schema: &FormSchema, fields: &FieldMap, today: NaiveDate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match schema.surface {
        Surface::Patient => validate_patient(schema, fields, today, &mut errors),
        Surface::User => validate_user(fields, &mut errors),
        Surface::Antecedent => validate_antecedent(fields, &mut errors),
        Surface::MedicalRecord => validate_medical_record(fields, &mut errors),
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn validate_patient(schema: &FormSchema, fields: &FieldMap, today: NaiveDate, errors: &mut ValidationErrors) {
    for field in schema.fields.iter().filter(|f| f.required) {
        let blank = fields.get(field.key).map_or(true, |v| v.is_blank());
        if blank {
            errors.set(field.key, REQUIRED);
        }
    }

    let cin = fields.text("cin");
    if !cin.is_empty() && !is_cin(cin) {
        errors.set("cin", "Invalid CIN format");
    }

    let birth = fields.text("date_naissance");
    let start = fields.text("date_debut");
    if !birth.is_empty() && !start.is_empty() {
        validate_patient_dates(fields, today, errors);
    }

    if fields.text("type_patient") == END_OF_TREATMENT {
        if fields.text("date_fin").is_empty() {
            errors.set("date_fin", "End date is required for this patient type");
        }
        if fields.text("cause_fin").is_empty() {
            errors.set("cause_fin", "End cause is required for this patient type");
        }
    }
}

fn validate_patient_dates(fields: &FieldMap, today: NaiveDate, errors: &mut ValidationErrors) {
    let birth = match parse_input_date(fields.text("date_naissance")) {
        Some(d) => d,
        None => return errors.set("date_naissance", "Invalid date"),
    };
    let start = match parse_input_date(fields.text("date_debut")) {
        Some(d) => d,
        None => return errors.set("date_debut", "Invalid date"),
    };

    if birth > today {
        errors.set("date_naissance", "Birth date cannot be in the future");
    }
    if start <= birth {
        errors.set("date_debut", "Start date must be after the birth date");
    }
    if start > today {
        errors.set("date_debut", "Start date cannot be in the future");
    }

    let end_text = fields.text("date_fin");
    if end_text.is_empty() {
        return;
    }
    match parse_input_date(end_text) {
        Some(end) => {
            if end <= start {
                errors.set("date_fin", "End date must be after the start date");
            }
            if end > today {
                errors.set("date_fin", "End date cannot be in the future");
            }
        }
        None => errors.set("date_fin", "Invalid date"),
    }
}

fn is_cin(value: &str) -> bool {
    value.len() == CIN_LENGTH && value.chars().all(|c| c.is_ascii_digit())
}

fn validate_user(fields: &FieldMap, errors: &mut ValidationErrors) {
    for (key, name) in [("username", "Username"), ("password", "Password")] {
        let value = fields.text(key).trim();
        if value.is_empty() {
            errors.set(key, format!("{} is required", name));
        } else if value.chars().count() < MIN_CREDENTIAL_LENGTH {
            errors.set(
                key,
                format!("{} must be at least {} characters", name, MIN_CREDENTIAL_LENGTH),
            );
        }
    }

    let assigned = fields
        .get("selectedPatients")
        .and_then(|v| v.as_ids())
        .map_or(0, |ids| ids.len());
    if assigned == 0 {
        errors.set("selectedPatients", "The user must have at least one authorized patient");
    }
}

fn validate_antecedent(fields: &FieldMap, errors: &mut ValidationErrors) {
    let content = fields.text("content").trim();
    if content.is_empty() || content == "<p></p>" {
        errors.set("content", "Content is required");
    }
}

fn validate_medical_record(fields: &FieldMap, errors: &mut ValidationErrors) {
    if fields.text("date").trim().is_empty() {
        errors.set("date", "Date is required");
    }
    if strip_tags(fields.text("content")).trim().is_empty() {
        errors.set("content", "Content is required");
    }
}

/// Visible text of editor HTML.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text
}
