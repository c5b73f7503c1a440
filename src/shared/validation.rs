//! Request validation
//!
//! Field rules are declared on the request types with `validator` derives;
//! this module holds the custom rules those derives reference and the
//! conversion from `ValidationErrors` into the wire-level [`FieldError`] list.

use std::borrow::Cow;

use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::shared::error::{FieldError, SharedError};
use crate::shared::post::{Category, TAG_MAX_CHARS};

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Usernames may only contain ASCII letters, digits and underscores
pub fn username_chars(username: &str) -> Result<(), ValidationError> {
    if username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(rule(
            "username_chars",
            "Username may only contain letters, numbers and underscores",
        ))
    }
}

/// Passwords need at least one lowercase letter, one uppercase letter and one digit
pub fn password_strength(password: &str) -> Result<(), ValidationError> {
    let lower = password.chars().any(|c| c.is_ascii_lowercase());
    let upper = password.chars().any(|c| c.is_ascii_uppercase());
    let digit = password.chars().any(|c| c.is_ascii_digit());
    if lower && upper && digit {
        Ok(())
    } else {
        Err(rule(
            "password_strength",
            "Password must contain an uppercase letter, a lowercase letter and a digit",
        ))
    }
}

pub fn known_category(category: &str) -> Result<(), ValidationError> {
    category
        .parse::<Category>()
        .map(|_| ())
        .map_err(|_| rule("category", "Please choose a valid category"))
}

pub fn tag_lengths(tags: &[String]) -> Result<(), ValidationError> {
    if tags.iter().all(|tag| tag.trim().chars().count() <= TAG_MAX_CHARS) {
        Ok(())
    } else {
        Err(rule("tags", "Each tag may be at most 20 characters"))
    }
}

pub fn object_id(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| rule("object_id", "Not a valid ID"))
}

/// Trim a required string in place
pub fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trim an optional string in place
pub fn trim_opt_in_place(value: &mut Option<String>) {
    if let Some(inner) = value.as_mut() {
        trim_in_place(inner);
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Flatten `validator` output into field errors, sorted by field name
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(field.as_ref());
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", e.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Run the derived rules of a request and convert failures into a `SharedError`
pub fn check<T: Validate>(request: &T) -> Result<(), SharedError> {
    request
        .validate()
        .map_err(|errors| SharedError::validation_errors(field_errors(&errors)))
}
