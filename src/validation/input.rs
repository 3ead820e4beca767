//! Field-level parsing of place and review payloads

use serde_json::{Map, Value};

use super::{FieldError, ValidationErrors};
use crate::types::{PlaceInput, ReviewInput, MAX_RATING, MIN_RATING};

const BODY: &str = "body";

/// Parse a request body as JSON
pub fn parse_json_body(bytes: &[u8]) -> Result<Value, ValidationErrors> {
    serde_json::from_slice(bytes).map_err(|err| {
        ValidationErrors::single(FieldError::new(
            "json_invalid",
            &[BODY],
            format!("JSON decode error: {}", err),
        ))
    })
}

/// Parse the `{place_id}` path segment.
///
/// Any integer is accepted; `None` means it is negative or too large to
/// be an allocated id, which callers report as not found.
pub fn parse_place_id(raw: &str) -> Result<Option<u64>, ValidationErrors> {
    if let Ok(id) = raw.parse::<u64>() {
        return Ok(Some(id));
    }
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    Err(ValidationErrors::single(int_parsing(&["path", "place_id"])))
}

/// Validate a place payload (create and update share the same shape)
pub fn parse_place_input(body: &Value) -> Result<PlaceInput, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = ValidationErrors::new();

    let name = required_string(object, "name", &mut errors);
    let description = required_string(object, "description", &mut errors);
    let street_address = optional_string(object, "street_address", &mut errors);
    let city = optional_string(object, "city", &mut errors);
    let country = optional_string(object, "country", &mut errors);
    let visit_duration = optional_string(object, "visit_duration", &mut errors);
    let is_free = optional_bool(object, "is_free", &mut errors);

    let input = PlaceInput {
        name: name.unwrap_or_default(),
        description: description.unwrap_or_default(),
        street_address,
        city,
        country,
        visit_duration,
        is_free,
    };
    errors.into_result(input)
}

/// Validate a review payload, including the rating range
pub fn parse_review_input(body: &Value) -> Result<ReviewInput, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = ValidationErrors::new();

    let title = required_string(object, "title", &mut errors);
    let content = required_string(object, "content", &mut errors);
    let rating = required_rating(object, "rating", &mut errors);

    let input = ReviewInput {
        title: title.unwrap_or_default(),
        content: content.unwrap_or_default(),
        rating: rating.unwrap_or_default(),
    };
    errors.into_result(input)
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object().ok_or_else(|| {
        ValidationErrors::single(FieldError::new(
            "model_attributes_type",
            &[BODY],
            "Input should be a valid dictionary or object to extract fields from",
        ))
    })
}

fn missing(field: &str) -> FieldError {
    FieldError::new("missing", &[BODY, field], "Field required")
}

fn required_string(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match object.get(field) {
        None => {
            errors.push(missing(field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(string_type(field));
            None
        }
    }
}

fn optional_string(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(string_type(field));
            None
        }
    }
}

fn optional_bool(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<bool> {
    match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push(FieldError::new(
                "bool_type",
                &[BODY, field],
                "Input should be a valid boolean",
            ));
            None
        }
    }
}

fn required_rating(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<u8> {
    let Some(value) = object.get(field) else {
        errors.push(missing(field));
        return None;
    };

    let rating = match value {
        // numeric strings are coerced, like whole floats
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| int_parsing(&[BODY, field])),
        other => as_integer(other).ok_or_else(|| {
            FieldError::new("int_type", &[BODY, field], "Input should be a valid integer")
        }),
    };
    let rating = match rating {
        Ok(rating) => rating,
        Err(err) => {
            errors.push(err);
            return None;
        }
    };

    if rating < MIN_RATING {
        errors.push(FieldError::new(
            "greater_than_equal",
            &[BODY, field],
            format!("Input should be greater than or equal to {}", MIN_RATING),
        ));
        None
    } else if rating > MAX_RATING {
        errors.push(FieldError::new(
            "less_than_equal",
            &[BODY, field],
            format!("Input should be less than or equal to {}", MAX_RATING),
        ));
        None
    } else {
        u8::try_from(rating).ok()
    }
}

/// Integers, and floats with no fractional part (`5.0`)
fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}

fn int_parsing(loc: &[&str]) -> FieldError {
    FieldError::new(
        "int_parsing",
        loc,
        "Input should be a valid integer, unable to parse string as an integer",
    )
}

fn string_type(field: &str) -> FieldError {
    FieldError::new("string_type", &[BODY, field], "Input should be a valid string")
}
