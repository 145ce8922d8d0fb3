//! Input validation utilities

use std::collections::BTreeMap;

use crate::models::{NewUser, ValidatedUser};

/// Field name to message, keyed by the JSON field name
pub type ValidationErrors = BTreeMap<&'static str, String>;

/// Check that every registration field is present and not blank
///
/// All failing fields are reported together. Accepted values are kept as
/// sent.
pub fn validate_new_user(payload: &NewUser) -> Result<ValidatedUser, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let user_name = required("userName", payload.user_name.as_deref(), &mut errors);
    let display_name = required("displayName", payload.display_name.as_deref(), &mut errors);
    let password = required("password", payload.password.as_deref(), &mut errors);

    match (user_name, display_name, password) {
        (Some(user_name), Some(display_name), Some(password)) => Ok(ValidatedUser {
            user_name: user_name.to_string(),
            display_name: display_name.to_string(),
            password: password.to_string(),
        }),
        _ => Err(errors),
    }
}

fn required<'a>(
    field: &'static str,
    value: Option<&'a str>,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.insert(field, format!("{field} is required"));
            None
        }
    }
}
