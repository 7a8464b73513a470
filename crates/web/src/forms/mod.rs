//! Form binding and validation.
//!
//! Each form deserializes every field as a string so that bad input can be
//! echoed back into the re-rendered page, then `clean()` validates it and
//! produces the typed values a handler persists.

pub mod account;
pub mod book;
pub mod filters;
pub mod review;

use std::borrow::Cow;
use std::collections::BTreeMap;

use validator::{ValidationError, ValidationErrors};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Field-level and form-level messages for a failed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
    non_field: Vec<String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the first message for each failing field.
    ///
    /// Checks run in declaration order, so a blank field reports "required"
    /// rather than also complaining about its format.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut form_errors = Self::new();
        for (field, field_errors) in errors.field_errors() {
            if let Some(first) = field_errors.first() {
                form_errors.add(&field, message_for(first));
            }
        }
        form_errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.non_field.push(message.into());
    }

    /// Messages for one field (empty when it is valid).
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn non_field(&self) -> &[String] {
        &self.non_field
    }

    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.non_field.is_empty()
    }

    /// `Ok(value)` when nothing was recorded, otherwise the errors.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

fn message_for(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => match &*error.code {
            "email" => "Enter a valid email address.".to_string(),
            code => format!("Invalid value ({code})."),
        },
    }
}

/// `custom` validator rejecting blank values.
pub(crate) fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED_MESSAGE)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "email",
            ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED_MESSAGE)),
        );
        errors.add("email", ValidationError::new("email"));

        let form_errors = FormErrors::from_validation(&errors);
        assert_eq!(form_errors.field("email"), [REQUIRED_MESSAGE.to_string()]);
        assert!(form_errors.field("username").is_empty());
    }

    #[test]
    fn into_result_reflects_recorded_errors() {
        assert_eq!(FormErrors::new().into_result(|| 1), Ok(1));

        let mut errors = FormErrors::new();
        errors.add_non_field("Nope.");
        assert!(errors.clone().into_result(|| 1).is_err());
        assert_eq!(errors.non_field(), ["Nope.".to_string()]);
    }

    #[test]
    fn required_rejects_whitespace() {
        assert!(required("  ").is_err());
        assert!(required("x").is_ok());
    }
}
