use serde::{Deserialize, Serialize};

/// Current time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Domain representation of a product record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier, immutable once stored.
    pub id: i64,
    /// Unique business code of the product.
    pub code: String,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Unit price.
    pub price: f64,
    /// Units in stock.
    pub quantity: i32,
    /// Optional image reference (URL or path).
    pub image: Option<String>,
    /// Whether the product is visible among active products.
    pub active: bool,
    /// Creation timestamp in milliseconds since the epoch.
    pub created_at: i64,
    /// Timestamp of the last mutation in milliseconds since the epoch.
    pub updated_at: i64,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
    pub image: Option<String>,
    /// Always `true` for freshly created products.
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl NewProduct {
    /// Build an active product payload stamped with the current time.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity: i32,
    ) -> Self {
        let now = now_millis();
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            price,
            quantity,
            image: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an image reference to the product payload.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Full replacement of the mutable columns of an existing product.
///
/// `id` and `created_at` are never part of an update.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProduct {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
    pub image: Option<String>,
    pub active: bool,
    /// Timestamp captured when the update was prepared.
    pub updated_at: i64,
}

impl UpdateProduct {
    /// Start an update that rewrites every column with the current values of `product`.
    ///
    /// The update timestamp never moves backwards relative to `product`.
    pub fn from_existing(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity: product.quantity,
            image: product.image.clone(),
            active: product.active,
            updated_at: now_millis().max(product.updated_at),
        }
    }

    /// Mark the product active or inactive.
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Query definition used to list products.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductListQuery {
    /// Optional case-insensitive fragment matched against the name.
    pub name_contains: Option<String>,
    /// Whether inactive (soft deleted) products should be returned.
    pub include_inactive: bool,
}

impl ProductListQuery {
    /// Construct a query that targets active products only.
    pub fn active() -> Self {
        Self::default()
    }

    /// Construct a query that targets every stored product.
    pub fn all() -> Self {
        Self {
            name_contains: None,
            include_inactive: true,
        }
    }

    /// Filter the results by a case-insensitive name fragment.
    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into());
        self
    }
}
