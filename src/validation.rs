//! Product payload validation rules.
//!
//! These operate on the raw JSON body so that a request is rejected with a
//! descriptive message before any typed deserialization or store access.

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::price;

// =============================================================================
// Validation Constants
// =============================================================================

/// Fields every new product must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "description", "price", "category"];

/// Maximum length for product names.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length for product descriptions.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Maximum length for category labels.
pub const MAX_CATEGORY_LENGTH: usize = 100;

/// Validate the body of a create request.
///
/// Rules:
/// - Body must be a JSON object
/// - `name`, `description`, `price` and `category` must be present and non-null
/// - Each present field must satisfy its field rule
pub fn validate_new_product(body: Option<&Value>) -> AppResult<()> {
    let object = expect_object(body)?;

    let missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| object.get(*field).is_none_or(Value::is_null))
        .collect();

    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    validate_fields(object)
}

/// Validate the body of an update request.
///
/// No field is required, but each one that is present must be valid.
pub fn validate_product_patch(body: Option<&Value>) -> AppResult<()> {
    validate_fields(expect_object(body)?)
}

fn expect_object(body: Option<&Value>) -> AppResult<&Map<String, Value>> {
    match body {
        Some(Value::Object(object)) => Ok(object),
        Some(_) => Err(AppError::Validation(
            "Request body must be a JSON object".to_string(),
        )),
        None => Err(AppError::Validation(
            "Request body must be a JSON object with product fields".to_string(),
        )),
    }
}

fn validate_fields(object: &Map<String, Value>) -> AppResult<()> {
    if let Some(value) = present(object, "name") {
        validate_text("name", value, MAX_NAME_LENGTH)?;
    }
    if let Some(value) = present(object, "description") {
        validate_text("description", value, MAX_DESCRIPTION_LENGTH)?;
    }
    if let Some(value) = present(object, "price") {
        validate_price(value)?;
    }
    if let Some(value) = present(object, "category") {
        validate_text("category", value, MAX_CATEGORY_LENGTH)?;
    }
    if let Some(value) = present(object, "inStock") {
        validate_in_stock(value)?;
    }
    Ok(())
}

/// A field counts as present unless it is absent or `null`.
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|v| !v.is_null())
}

/// Validate a required text field.
///
/// Rules:
/// - Must be a JSON string
/// - Must contain something other than whitespace
/// - Must not exceed `max_len` characters
pub fn validate_text(field: &str, value: &Value, max_len: usize) -> AppResult<()> {
    let Some(text) = value.as_str() else {
        return Err(AppError::Validation(format!("Field '{field}' must be a string")));
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Field '{field}' cannot be empty"
        )));
    }

    let len = text.chars().count();
    if len > max_len {
        return Err(AppError::Validation(format!(
            "Field '{field}' cannot exceed {max_len} characters (got {len})"
        )));
    }

    Ok(())
}

/// Validate a price.
///
/// Rules:
/// - Must be a JSON number that is zero or greater
/// - Must fit a `Decimal` without rounding (see [`price::from_number`])
pub fn validate_price(value: &Value) -> AppResult<()> {
    let number = match value {
        Value::Number(number) if number.as_f64().is_some_and(|p| p >= 0.0) => number,
        _ => {
            return Err(AppError::Validation(
                "Price must be a non-negative number".to_string(),
            ));
        }
    };

    price::from_number(number)
        .map(|_| ())
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Validate the optional availability flag.
pub fn validate_in_stock(value: &Value) -> AppResult<()> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Field 'inStock' must be a boolean".to_string(),
        ))
    }
}
