//! Client-side validation for public intake and agent-run submissions.
//!
//! Validation failures block submission before any network call is made and
//! are field-scoped so a screen can render them inline. Shape checks only —
//! the backend remains the authority on semantic validity.

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, FieldError};

/// Public intake submission, pre-validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntakeForm {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub case_type: String,
    /// Mexican state, required for `mx_*` verticals.
    #[serde(default)]
    pub entidad_federativa: String,
    #[serde(default)]
    pub description: String,
}

impl IntakeForm {
    /// Whether this form targets a Mexican vertical (extra required fields).
    pub fn is_mx(&self) -> bool {
        self.case_type.starts_with("mx_")
    }
}

/// Validate an intake form. All failing fields are reported together so the
/// screen can mark every one inline in a single pass.
pub fn validate_intake(form: &IntakeForm) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if form.full_name.trim().is_empty() {
        errors.push(FieldError::new("full_name", "El nombre es obligatorio"));
    }
    if form.case_type.trim().is_empty() {
        errors.push(FieldError::new("case_type", "Selecciona un tipo de caso"));
    }

    let has_phone = !form.phone.trim().is_empty();
    let has_email = !form.email.trim().is_empty();
    if !has_phone && !has_email {
        errors.push(FieldError::new(
            "phone",
            "Se requiere teléfono o correo electrónico",
        ));
    }
    if has_email && !looks_like_email(form.email.trim()) {
        errors.push(FieldError::new("email", "Correo electrónico inválido"));
    }
    if has_phone && !looks_like_phone(form.phone.trim()) {
        errors.push(FieldError::new("phone", "Teléfono inválido"));
    }

    if form.is_mx() && form.entidad_federativa.trim().is_empty() {
        errors.push(FieldError::new(
            "entidad_federativa",
            "Selecciona tu estado",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Validate the free-text input for an agent run: must parse as a JSON
/// object. Malformed input is never sent.
pub fn validate_agent_input(raw: &str) -> Result<serde_json::Value, ApiError> {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(_) => Err(ApiError::Validation(vec![FieldError::new(
            "input_data",
            "El input debe ser un objeto JSON",
        )])),
        Err(e) => Err(ApiError::Validation(vec![FieldError::new(
            "input_data",
            format!("JSON inválido: {}", e),
        )])),
    }
}

fn looks_like_email(value: &str) -> bool {
    // Minimal shape check; deliverability is the backend's problem.
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

fn looks_like_phone(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    digits >= 7
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> IntakeForm {
        IntakeForm {
            full_name: "Ana Torres".into(),
            phone: "+52 55 1234 5678".into(),
            email: String::new(),
            case_type: "mx_divorce".into(),
            entidad_federativa: "CDMX".into(),
            description: String::new(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_intake(&valid_form()).is_ok());
    }

    #[test]
    fn all_failures_are_reported_together() {
        let form = IntakeForm::default();
        let err = validate_intake(&form).unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                let named: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert!(named.contains(&"full_name"));
                assert!(named.contains(&"case_type"));
                assert!(named.contains(&"phone"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn one_contact_channel_is_enough() {
        let mut form = valid_form();
        form.phone = String::new();
        form.email = "ana@example.mx".into();
        assert!(validate_intake(&form).is_ok());
    }

    #[test]
    fn mx_vertical_requires_state() {
        let mut form = valid_form();
        form.entidad_federativa = String::new();
        let err = validate_intake(&form).unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields[0].field, "entidad_federativa");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn non_mx_vertical_skips_state() {
        let mut form = valid_form();
        form.case_type = "immigration".into();
        form.entidad_federativa = String::new();
        assert!(validate_intake(&form).is_ok());
    }

    #[test]
    fn email_shape_is_checked() {
        let mut form = valid_form();
        form.email = "not-an-email".into();
        assert!(validate_intake(&form).is_err());
    }

    #[test]
    fn agent_input_must_be_a_json_object() {
        assert!(validate_agent_input(r#"{"visa_type": "H1B"}"#).is_ok());
        assert!(validate_agent_input("[1, 2]").is_err());
        assert!(validate_agent_input("{not json").is_err());
    }
}
