//! Products, their images and the listing filter used by the catalog and admin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::family::Family;
use super::money::Money;
use crate::config::{
    LOW_STOCK_THRESHOLD, MAX_MOVEMENT_QUANTITY, MAX_PRICE_CENTS, PRODUCT_IMAGE_SUBDIR,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    #[schema(example = "AN-0042")]
    pub reference: String,
    pub family_id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Cents
    pub sale_price: Money,
    /// Cents
    pub purchase_price: Money,
    pub current_stock: i32,
    pub total_sold: i32,
    pub style: Option<String>,
    pub material: Option<String>,
    /// Grams
    pub weight: Option<f64>,
    pub dimensions: Option<String>,
    pub is_active: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    Low,
    Out,
}

impl StockStatus {
    pub fn for_level(stock: i32) -> Self {
        if stock <= 0 {
            StockStatus::Out
        } else if stock <= LOW_STOCK_THRESHOLD {
            StockStatus::Low
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In stock",
            StockStatus::Low => "Low stock",
            StockStatus::Out => "Out of stock",
        }
    }
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::for_level(self.current_stock)
    }

    /// Value of the units on hand at purchase price.
    pub fn stock_value(&self) -> Money {
        self.purchase_price
            .saturating_mul(i64::from(self.current_stock.max(0)))
    }

    /// Visible on the public catalog.
    pub fn is_public(&self) -> bool {
        self.is_active
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductImage {
    pub id: i32,
    pub product_id: i32,
    pub filename: String,
    pub is_primary: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl ProductImage {
    pub fn url(&self) -> String {
        product_image_url(&self.filename)
    }
}

pub fn product_image_url(filename: &str) -> String {
    format!("/media/{}/{}", PRODUCT_IMAGE_SUBDIR, filename)
}

/// Listing row: the product plus what the grid shows next to it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductSummary {
    #[serde(flatten)]
    pub product: Product,
    pub family_name: Option<String>,
    pub primary_image: Option<String>,
}

impl ProductSummary {
    pub fn image_url(&self) -> Option<String> {
        self.primary_image.as_deref().map(product_image_url)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub family: Option<Family>,
    /// Primary first, then by sort order
    pub images: Vec<ProductImage>,
}

fn price_in_range(value: &Money) -> Result<(), ValidationError> {
    if value.is_negative() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Prices cannot be negative".into());
        return Err(err);
    }
    if value.cents() > MAX_PRICE_CENTS {
        let mut err = ValidationError::new("price_cap");
        err.message = Some(
            format!("Prices cannot exceed {}", Money::from_cents(MAX_PRICE_CENTS)).into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Create / update payload shared by the admin form and the JSON API.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 50, message = "Reference must be between 1 and 50 characters"))]
    #[schema(example = "AN-0042")]
    pub reference: String,
    pub family_id: i32,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "price_in_range"))]
    pub sale_price: Money,
    #[validate(custom(function = "price_in_range"))]
    pub purchase_price: Money,
    /// Only read on create; later stock changes go through the inventory ledger.
    #[serde(default)]
    #[validate(range(
        min = 0,
        max = MAX_MOVEMENT_QUANTITY,
        message = "Initial stock must be between 0 and 1000000"
    ))]
    pub initial_stock: i32,
    #[validate(length(max = 100, message = "Style is too long"))]
    pub style: Option<String>,
    #[validate(length(max = 100, message = "Material is too long"))]
    pub material: Option<String>,
    #[validate(range(min = 0.0, message = "Weight cannot be negative"))]
    pub weight: Option<f64>,
    #[validate(length(max = 100, message = "Dimensions are too long"))]
    pub dimensions: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub featured: bool,
}

fn default_true() -> bool {
    true
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ProductInput {
    /// Trim text fields and turn blank optionals into `None`.
    pub fn normalized(self) -> Self {
        Self {
            reference: self.reference.trim().to_string(),
            name: self.name.trim().to_string(),
            description: clean(self.description),
            style: clean(self.style),
            material: clean(self.material),
            dimensions: clean(self.dimensions),
            ..self
        }
    }
}

/// Column the product listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Reference,
    Name,
    SalePrice,
    Stock,
    CreatedAt,
    /// Featured products first, then by reference (public catalog order)
    Featured,
}

impl ProductSort {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reference" => Some(ProductSort::Reference),
            "name" => Some(ProductSort::Name),
            "sale_price" | "price" => Some(ProductSort::SalePrice),
            "stock" | "current_stock" => Some(ProductSort::Stock),
            "created_at" | "newest" => Some(ProductSort::CreatedAt),
            "featured" => Some(ProductSort::Featured),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSort::Reference => "reference",
            ProductSort::Name => "name",
            ProductSort::SalePrice => "sale_price",
            ProductSort::Stock => "stock",
            ProductSort::CreatedAt => "created_at",
            ProductSort::Featured => "featured",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Which products a listing query returns and in what order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub family_id: Option<i32>,
    /// Matched with `LIKE %term%` against reference and name
    pub search: Option<String>,
    pub active_only: bool,
    pub featured_only: bool,
    pub sort: ProductSort,
    pub order: SortOrder,
}

impl ProductFilter {
    /// Public catalog: active products, featured first.
    pub fn public() -> Self {
        Self {
            active_only: true,
            sort: ProductSort::Featured,
            ..Self::default()
        }
    }

    /// Build from raw query-string values. Blank or unknown values fall back
    /// to no filter / reference ascending.
    pub fn from_query(
        family: Option<&str>,
        search: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        Self {
            family_id: family.and_then(|f| f.trim().parse().ok()),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.chars().take(100).collect()),
            sort: sort.and_then(ProductSort::parse).unwrap_or_default(),
            order: order.and_then(SortOrder::parse).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_active_only(mut self) -> Self {
        self.active_only = true;
        self
    }
}

/// Fields written when a product is created.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub input: ProductInput,
    pub created_by: Option<String>,
    /// Files already written to the media directory; the first becomes primary
    pub images: Vec<String>,
}

/// Image metadata stored after an upload has been written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProductImage {
    pub product_id: i32,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        ProductInput {
            reference: " AN-1 ".to_string(),
            family_id: 1,
            name: " Solitaire ring ".to_string(),
            description: Some(" ".to_string()),
            sale_price: Money::from_cents(12900),
            purchase_price: Money::from_cents(5000),
            initial_stock: 3,
            style: Some("Classic".to_string()),
            material: Some("".to_string()),
            weight: Some(2.5),
            dimensions: None,
            is_active: true,
            featured: false,
        }
    }

    #[test]
    fn test_stock_status_levels() {
        assert_eq!(StockStatus::for_level(-1), StockStatus::Out);
        assert_eq!(StockStatus::for_level(0), StockStatus::Out);
        assert_eq!(StockStatus::for_level(1), StockStatus::Low);
        assert_eq!(StockStatus::for_level(10), StockStatus::Low);
        assert_eq!(StockStatus::for_level(11), StockStatus::InStock);
    }

    #[test]
    fn test_input_normalized_and_valid() {
        let input = input().normalized();
        assert_eq!(input.reference, "AN-1");
        assert_eq!(input.name, "Solitaire ring");
        assert!(input.description.is_none());
        assert!(input.material.is_none());
        assert_eq!(input.style.as_deref(), Some("Classic"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_input_rejects_negative_price_and_stock() {
        let mut bad = input();
        bad.sale_price = Money::from_cents(-1);
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.initial_stock = -2;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_input_rejects_oversized_values() {
        let mut bad = input();
        bad.purchase_price = Money::from_cents(MAX_PRICE_CENTS + 1);
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.initial_stock = i32::MAX;
        assert!(bad.validate().is_err());

        let mut ok = input();
        ok.sale_price = Money::from_cents(MAX_PRICE_CENTS);
        ok.initial_stock = MAX_MOVEMENT_QUANTITY;
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_filter_from_query_falls_back() {
        let filter = ProductFilter::from_query(Some(""), Some("  "), Some("bogus"), Some("up"));
        assert_eq!(filter, ProductFilter::default());

        let filter =
            ProductFilter::from_query(Some("4"), Some(" ring "), Some("price"), Some("DESC"));
        assert_eq!(filter.family_id, Some(4));
        assert_eq!(filter.search.as_deref(), Some("ring"));
        assert_eq!(filter.sort, ProductSort::SalePrice);
        assert_eq!(filter.order, SortOrder::Desc);
    }

    #[test]
    fn test_image_url() {
        assert_eq!(product_image_url("a.jpg"), "/media/products/a.jpg");
    }
}
