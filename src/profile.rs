//! Profile and password forms.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{ChangePasswordPayload, UpdateProfilePayload};
use crate::validation::{validate_mobile_number, FieldErrors};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_mobile_number"))]
    pub phone: Option<String>,
    pub image: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ProfileForm {
    /// Blank fields are left out of the update rather than clearing data.
    pub fn into_payload(self) -> Result<UpdateProfilePayload, FieldErrors> {
        let form = Self {
            name: non_blank(self.name),
            phone: non_blank(self.phone),
            image: non_blank(self.image),
        };
        form.validate().map_err(FieldErrors::from)?;
        Ok(UpdateProfilePayload {
            name: form.name,
            phone: form.phone,
            image: form.image,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum PasswordStrength {
    #[serde(rename = "Too short")]
    TooShort,
    Weak,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn assess(password: &str) -> Self {
        match password.chars().count() {
            0..=3 => PasswordStrength::TooShort,
            4..=6 => PasswordStrength::Weak,
            7..=9 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::TooShort => "Too short",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
    #[serde(default)]
    pub revoke_other_sessions: Option<bool>,
}

impl PasswordForm {
    /// A too-short password also reports its strength as a second message.
    pub fn into_payload(self) -> Result<ChangePasswordPayload, FieldErrors> {
        let mut errors = self
            .validate()
            .map_or_else(FieldErrors::from, |_| FieldErrors::new());

        if errors.contains("newPassword") {
            errors.push(
                "newPassword",
                format!("Strength: {}", PasswordStrength::assess(&self.new_password).label()),
            );
        } else if self.new_password == self.current_password {
            errors.push(
                "newPassword",
                "New password must be different from current password",
            );
        }

        errors.into_result()?;
        Ok(ChangePasswordPayload {
            current_password: self.current_password,
            new_password: self.new_password,
            revoke_other_sessions: Some(self.revoke_other_sessions.unwrap_or(true)),
        })
    }
}
