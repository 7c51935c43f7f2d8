//! Field rules for box creation payloads.
//!
//! [`validate`] is a pure function over an untrusted JSON value. It checks
//! every field, collecting all violations, and only returns a [`NewBox`]
//! when each rule passes. Fields other than `height`, `width` and `color`
//! are ignored. String values are trimmed before any rule sees them, and a
//! string that trims to nothing counts as missing.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::NewBox;

/// Smallest accepted height or width.
pub const MIN_DIMENSION: i32 = 1;

/// Largest accepted height or width (the range of the storage column).
pub const MAX_DIMENSION: i32 = i32::MAX;

/// Longest accepted color, in characters.
pub const MAX_COLOR_LENGTH: usize = 50;

/// A rejected payload: every violated rule, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.message())]
pub struct ValidationError {
    errors: BTreeMap<String, Vec<String>>,
    /// First message recorded, in rule order (height, width, color).
    first: String,
}

impl ValidationError {
    /// Field name -> human-readable rule violations.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Whether `field` has at least one violation.
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Summary line: the first violation, plus a count of the rest.
    pub fn message(&self) -> String {
        let remaining = self
            .errors
            .values()
            .map(Vec::len)
            .sum::<usize>()
            .saturating_sub(1);
        match remaining {
            0 => self.first.clone(),
            1 => format!("{} (and 1 more error)", self.first),
            n => format!("{} (and {n} more errors)", self.first),
        }
    }
}

/// Accumulates violations while rules run.
#[derive(Default)]
struct Violations {
    errors: BTreeMap<String, Vec<String>>,
    first: Option<String>,
}

impl Violations {
    fn add(&mut self, field: &str, message: String) {
        if self.first.is_none() {
            self.first = Some(message.clone());
        }
        self.errors
            .entry(field.to_owned())
            .or_default()
            .push(message);
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            errors: self.errors,
            first: self.first.unwrap_or_default(),
        }
    }
}

/// Validate a creation payload.
///
/// A payload that is not a JSON object is treated as empty, so every
/// required field is reported.
pub fn validate(payload: &Value) -> Result<NewBox, ValidationError> {
    let empty = Map::new();
    let fields = payload.as_object().unwrap_or(&empty);
    let mut violations = Violations::default();

    let height = dimension(fields, "height", &mut violations);
    let width = dimension(fields, "width", &mut violations);
    let color = color(fields, "color", &mut violations);

    // Each rule that yields `None` has recorded a violation.
    match (height, width, color) {
        (Some(height), Some(width), Some(color)) => Ok(NewBox {
            height,
            width,
            color,
        }),
        _ => Err(violations.into_error()),
    }
}

/// `required`: absent keys, `null` and blank strings count as missing.
///
/// Strings come back trimmed.
fn present(fields: &Map<String, Value>, field: &str) -> Option<Value> {
    match fields.get(field)? {
        Value::Null => None,
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_owned()))
        }
        value => Some(value.clone()),
    }
}

/// `required|integer|min:1`, bounded by the column range.
fn dimension(fields: &Map<String, Value>, field: &str, out: &mut Violations) -> Option<i32> {
    let Some(value) = present(fields, field) else {
        out.add(field, format!("The {field} field is required."));
        return None;
    };

    let Some(n) = integer_value(&value) else {
        out.add(field, format!("The {field} field must be an integer."));
        return None;
    };

    if n < i128::from(MIN_DIMENSION) {
        out.add(field, format!("The {field} field must be at least {MIN_DIMENSION}."));
        return None;
    }

    if let Ok(n) = i32::try_from(n) {
        Some(n)
    } else {
        out.add(
            field,
            format!("The {field} field must not be greater than {MAX_DIMENSION}."),
        );
        None
    }
}

/// `required|string|max:50`.
fn color(fields: &Map<String, Value>, field: &str, out: &mut Violations) -> Option<String> {
    let Some(value) = present(fields, field) else {
        out.add(field, format!("The {field} field is required."));
        return None;
    };

    let Value::String(color) = value else {
        out.add(field, format!("The {field} field must be a string."));
        return None;
    };

    if color.chars().count() > MAX_COLOR_LENGTH {
        out.add(
            field,
            format!("The {field} field must not be greater than {MAX_COLOR_LENGTH} characters."),
        );
        return None;
    }

    Some(color)
}

/// Interpret a JSON value as an integer.
///
/// Accepts integers, floats with no fractional part, and (already trimmed)
/// strings holding a base-10 integer. Everything else (booleans included)
/// is rejected.
fn integer_value(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i128::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(i128::from(u))
            } else {
                let f = n.as_f64()?;
                #[allow(clippy::cast_possible_truncation)]
                let whole = f as i128;
                (f.is_finite() && f.fract() == 0.0).then_some(whole)
            }
        }
        Value::String(s) => s.parse::<i128>().ok(),
        _ => None,
    }
}
