use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{ValidationError, ValidationErrors};

/// Local mobile numbers: `01`, an operator digit 3-9, then eight digits.
static MOBILE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^01[3-9]\d{8}$").unwrap());

pub const MOBILE_NUMBER_MESSAGE: &str = "Enter a valid mobile number (e.g., 01712345678)";

pub fn is_mobile_number(value: &str) -> bool {
    MOBILE_NUMBER.is_match(value)
}

pub fn validate_mobile_number(value: &str) -> Result<(), ValidationError> {
    if is_mobile_number(value) {
        return Ok(());
    }
    let mut error = ValidationError::new("mobile_number");
    error.message = Some(Cow::Borrowed(MOBILE_NUMBER_MESSAGE));
    Err(error)
}

/// Field-level validation failures, keyed by the camelCase wire name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, failures) in errors.field_errors() {
            let field = to_camel_case(&field.to_string());
            for failure in failures.iter() {
                let message = failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| failure.code.to_string());
                fields.push(&field, message);
            }
        }
        fields
    }
}

fn to_camel_case(field: &str) -> String {
    let mut camel = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            camel.extend(ch.to_uppercase());
            upper = false;
        } else {
            camel.push(ch);
        }
    }
    camel
}
