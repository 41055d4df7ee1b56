//! Attribute-driven request validation with client-facing field errors.
//!
//! DTOs derive [`validator::Validate`]; [`validate`] runs the derived rules
//! and translates the raw `validator` errors into an ordered list of
//! [`FieldError`]s tagged with the rule names the API documents:
//! `required`, `min`, `max`, `email`, `len`, `numeric`, `alpha`, `alphanum`.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single failing field, serialized verbatim into the response `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name in PascalCase (`role_id` becomes `RoleId`).
    pub field: String,
    /// Name of the rule that failed.
    pub tag: String,
    /// The rejected value rendered as text.
    pub value: String,
    /// Human-readable message.
    pub message: String,
}

/// All field errors of one request, in field declaration order.
///
/// Displays as the `"; "`-joined messages; that form is meant for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure(Vec<FieldError>);

impl ValidationFailure {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_fields(self) -> Vec<FieldError> {
        self.0
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Declaration order of a DTO's validated fields.
///
/// `validator` reports errors in a hash map; this fixes the order in which
/// they are returned to clients.
pub trait FieldOrder {
    const FIELDS: &'static [&'static str];
}

/// Run the derived validation rules on `input`.
pub fn validate<T: Validate + FieldOrder>(input: &T) -> Result<(), ValidationFailure> {
    match input.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(translate(&errors, T::FIELDS)),
    }
}

fn translate(errors: &ValidationErrors, order: &[&str]) -> ValidationFailure {
    let by_field: HashMap<String, &Vec<ValidationError>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs))
        .collect();

    let mut names: Vec<&String> = by_field.keys().collect();
    names.sort_by_key(|name| {
        order
            .iter()
            .position(|o| *o == name.as_str())
            .unwrap_or(order.len())
    });

    let fields = names
        .into_iter()
        .filter_map(|name| {
            let candidates: Vec<(String, &ValidationError)> = by_field[name]
                .iter()
                .map(|err| (tag_for(err), err))
                .collect();
            candidates
                .iter()
                .find(|(tag, _)| tag == "required")
                .or_else(|| candidates.first())
                .map(|(tag, err)| field_error(name, tag, err))
        })
        .collect();

    ValidationFailure(fields)
}

/// Map a raw `validator` error onto the documented rule tag.
fn tag_for(err: &ValidationError) -> String {
    match err.code.as_ref() {
        "length" => {
            let text = param_text(err, "value");
            if text.is_empty() {
                return "required".into();
            }
            if err.params.contains_key("equal") {
                return "len".into();
            }
            let len = text.chars().count() as u64;
            match param_u64(err, "min") {
                Some(min) if len < min => "min".into(),
                _ => "max".into(),
            }
        }
        "range" => {
            let value = err.params.get("value").and_then(Value::as_f64);
            match (value, err.params.get("min").and_then(Value::as_f64)) {
                (Some(v), _) if v == 0.0 => "required".into(),
                (Some(v), Some(min)) if v < min => "min".into(),
                _ => "max".into(),
            }
        }
        other => other.to_string(),
    }
}

fn field_error(field: &str, tag: &str, err: &ValidationError) -> FieldError {
    let name = pascal_case(field);
    let message = match tag {
        "required" => format!("{name} is a required field"),
        "min" if err.code == "range" => {
            format!("{name} must be {} or greater", param_text(err, "min"))
        }
        "max" if err.code == "range" => {
            format!("{name} must be {} or less", param_text(err, "max"))
        }
        "min" => format!(
            "{name} must be at least {} characters in length",
            param_text(err, "min")
        ),
        "max" => format!(
            "{name} must be a maximum of {} characters in length",
            param_text(err, "max")
        ),
        "len" => format!(
            "{name} must be {} characters in length",
            param_text(err, "equal")
        ),
        "email" => format!("{name} must be a valid email address"),
        "numeric" => format!("{name} must be a valid numeric value"),
        "alpha" => format!("{name} can only contain alphabetic characters"),
        "alphanum" => format!("{name} can only contain alphanumeric characters"),
        other => err
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{name} failed on the '{other}' tag")),
    };

    FieldError {
        field: name,
        tag: tag.to_string(),
        value: param_text(err, "value"),
        message,
    }
}

fn param_text(err: &ValidationError, key: &str) -> String {
    match err.params.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn param_u64(err: &ValidationError, key: &str) -> Option<u64> {
    err.params.get(key).and_then(Value::as_u64)
}

/// `role_id` -> `RoleId`.
pub fn pascal_case(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Custom rules for `#[validate(custom(function = "..."))]`
// ---------------------------------------------------------------------------

fn rule_error(code: &'static str, value: &str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.add_param("value".into(), &value);
    err
}

/// Accepts an optionally signed decimal number.
pub fn numeric(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix(['+', '-']).unwrap_or(value);
    let mut parts = digits.splitn(2, '.');
    let int_part = parts.next().unwrap_or_default();
    let frac_part = parts.next();
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    let valid = match frac_part {
        Some(frac) => all_digits(int_part) && !frac.is_empty() && all_digits(frac),
        None => !int_part.is_empty() && all_digits(int_part),
    };
    if valid {
        Ok(())
    } else {
        Err(rule_error("numeric", value))
    }
}

/// Accepts ASCII letters only.
pub fn alpha(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(rule_error("alpha", value))
    }
}

/// Accepts ASCII letters and digits only.
pub fn alphanum(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(rule_error("alphanum", value))
    }
}
