use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{ValidateLength, ValidateRange, ValidationError};

use crate::domain::product::{NewProduct, Product, UpdateProduct, now_millis};

/// Allowed length range for a product code.
pub const CODE_MIN_LEN: u64 = 3;
pub const CODE_MAX_LEN: u64 = 20;

/// Allowed length range for a product name.
pub const NAME_MIN_LEN: u64 = 3;
pub const NAME_MAX_LEN: u64 = 100;

/// Inclusive price bounds.
pub const PRICE_MIN: f64 = 0.01;
pub const PRICE_MAX: f64 = 999_999.99;

/// Inclusive upper bound for the stocked quantity.
pub const QUANTITY_MAX: i32 = 1_000_000;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while turning a payload into a domain value.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// A field validator rejected the payload.
    #[error("{0}")]
    Invalid(String),
    /// A required column was missing from an update payload.
    #[error("column `{0}` cannot be null")]
    MissingColumn(&'static str),
}

impl From<ValidationError> for ProductFormError {
    fn from(value: ValidationError) -> Self {
        ProductFormError::Invalid(validation_message(&value))
    }
}

/// Human-readable message carried by a validation error.
pub fn validation_message(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Strips leading and trailing ASCII control characters and spaces.
///
/// Other Unicode whitespace such as U+00A0 is kept and counts as content.
pub fn trim_blank(value: &str) -> &str {
    value.trim_matches(|ch: char| ch <= ' ')
}

/// Validates a product code: 3 to 20 characters of `[A-Za-z0-9_-]` once trimmed.
pub fn validate_code(code: &str) -> Result<(), ValidationError> {
    let code = trim_blank(code);

    if code.is_empty() {
        return Err(invalid("code_required", "product code must not be empty"));
    }

    if !code.validate_length(Some(CODE_MIN_LEN), Some(CODE_MAX_LEN), None) {
        return Err(invalid(
            "code_length",
            format!("code must be between {CODE_MIN_LEN} and {CODE_MAX_LEN} characters"),
        ));
    }

    if !code
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(invalid(
            "code_charset",
            "code may only contain letters, digits, hyphens and underscores",
        ));
    }

    Ok(())
}

/// Validates a product name: 3 to 100 characters once trimmed.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let name = trim_blank(name);

    if name.is_empty() {
        return Err(invalid("name_required", "product name must not be empty"));
    }

    if !name.validate_length(Some(NAME_MIN_LEN), Some(NAME_MAX_LEN), None) {
        return Err(invalid(
            "name_length",
            format!("name must be between {NAME_MIN_LEN} and {NAME_MAX_LEN} characters"),
        ));
    }

    Ok(())
}

/// Validates a price against the inclusive `[0.01, 999999.99]` range.
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    // NaN compares false against both bounds.
    if price.is_nan() || !price.validate_range(Some(PRICE_MIN), None, None, None) {
        return Err(invalid(
            "price_min",
            format!("price must be at least {PRICE_MIN:.2}"),
        ));
    }

    if !price.validate_range(None, Some(PRICE_MAX), None, None) {
        return Err(invalid(
            "price_max",
            format!("price must not exceed {PRICE_MAX:.2}"),
        ));
    }

    Ok(())
}

/// Validates a stocked quantity against the inclusive `[0, 1000000]` range.
pub fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if !quantity.validate_range(Some(0), None, None, None) {
        return Err(invalid("quantity_min", "quantity must not be negative"));
    }

    if !quantity.validate_range(None, Some(QUANTITY_MAX), None, None) {
        return Err(invalid("quantity_max", "quantity must not exceed 1,000,000"));
    }

    Ok(())
}

/// Validates a product identifier.
pub fn validate_id(id: i64) -> Result<(), ValidationError> {
    if !id.validate_range(None, None, Some(0), None) {
        return Err(invalid("id_positive", "id must be a positive number"));
    }

    Ok(())
}

fn default_active() -> Option<bool> {
    Some(true)
}

/// JSON payload accepted by the create and update endpoints.
///
/// Every field is optional so that missing and `null` values reach the
/// validators instead of failing deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i32>,
    pub image: Option<String>,
    /// An absent key reads as `Some(true)`; only an explicit `null` is `None`.
    #[serde(default = "default_active")]
    pub active: Option<bool>,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            code: None,
            name: None,
            description: None,
            price: None,
            quantity: None,
            image: None,
            active: default_active(),
        }
    }
}

impl ProductForm {
    /// Validates the payload and converts it into a domain `NewProduct`.
    ///
    /// Fields are checked in the order code, name, price, quantity and the
    /// first violation is returned. The `active` flag of the payload is ignored.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        let code = self.code.unwrap_or_default();
        validate_code(&code)?;

        let name = self.name.unwrap_or_default();
        validate_name(&name)?;

        let price = self
            .price
            .ok_or_else(|| invalid("price_required", "product price must not be null"))?;
        validate_price(price)?;

        let quantity = self
            .quantity
            .ok_or_else(|| invalid("quantity_required", "product quantity must not be null"))?;
        validate_quantity(quantity)?;

        let mut new_product = NewProduct::new(code, name, price, quantity);

        if let Some(description) = self.description {
            new_product = new_product.with_description(description);
        }

        if let Some(image) = self.image {
            new_product = new_product.with_image(image);
        }

        Ok(new_product)
    }

    /// Converts the payload into a full replacement of `existing`.
    ///
    /// No field validation is applied here; only columns the store declares
    /// NOT NULL are required. An explicit `null` for `active` deactivates the
    /// product, while an omitted `active` keeps it active.
    pub fn into_update_product(self, existing: &Product) -> ProductFormResult<UpdateProduct> {
        let code = self.code.ok_or(ProductFormError::MissingColumn("code"))?;
        let name = self.name.ok_or(ProductFormError::MissingColumn("name"))?;
        let price = self.price.ok_or(ProductFormError::MissingColumn("price"))?;
        let quantity = self
            .quantity
            .ok_or(ProductFormError::MissingColumn("quantity"))?;

        Ok(UpdateProduct {
            code,
            name,
            description: self.description,
            price,
            quantity,
            image: self.image,
            active: self.active.unwrap_or(false),
            updated_at: now_millis().max(existing.updated_at),
        })
    }
}
