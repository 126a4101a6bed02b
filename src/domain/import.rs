//! Bulk product import from a spreadsheet export.
//!
//! Columns are matched by header name. `reference`, `family`, `sale_price`
//! and `purchase_price` are required; `name`, `stock`, `description`,
//! `style`, `material`, `weight` and `dimensions` are optional.

use serde::Deserialize;

use super::money::Money;
use super::product::ProductInput;
use crate::errors::{AppError, AppResult};

pub const REQUIRED_IMPORT_COLUMNS: [&str; 4] =
    ["reference", "family", "sale_price", "purchase_price"];

/// Note attached to the adjustment booked when an import changes stock
pub const IMPORT_STOCK_NOTE: &str = "Stock set by product import";

/// One spreadsheet row, still as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportRow {
    pub reference: String,
    /// Family code, e.g. `AN`
    pub family: String,
    pub sale_price: String,
    pub purchase_price: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub stock: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
}

fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ImportRow {
    pub fn family_code(&self) -> String {
        self.family.trim().to_uppercase()
    }

    /// Stock level the row asks for; a blank cell leaves stock alone.
    pub fn stock(&self) -> AppResult<Option<i32>> {
        filled(&self.stock)
            .map(|raw| {
                raw.parse::<i32>().map_err(|_| {
                    AppError::validation(format!("Stock '{}' is not a whole number", raw))
                })
            })
            .transpose()
    }

    /// Product fields for the row. A missing name falls back to the reference.
    pub fn to_input(&self, family_id: i32) -> AppResult<ProductInput> {
        let reference = self.reference.trim().to_string();
        let price = |raw: &str, label: &str| {
            Money::parse(raw).map_err(|_| {
                AppError::validation(format!("{} '{}' is not a valid amount", label, raw.trim()))
            })
        };
        let weight = filled(&self.weight)
            .map(|raw| {
                raw.replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| AppError::validation(format!("Weight '{}' is not a number", raw)))
            })
            .transpose()?;

        Ok(ProductInput {
            name: filled(&self.name).unwrap_or(&reference).to_string(),
            reference,
            family_id,
            description: self.description.clone(),
            sale_price: price(&self.sale_price, "Sale price")?,
            purchase_price: price(&self.purchase_price, "Purchase price")?,
            initial_stock: self.stock()?.unwrap_or(0),
            style: self.style.clone(),
            material: self.material.clone(),
            weight,
            dimensions: self.dimensions.clone(),
            is_active: true,
            featured: false,
        }
        .normalized())
    }
}

/// A row that was left out, with the spreadsheet line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportIssue {
    pub line: u64,
    pub reference: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    /// Existing products whose stock was moved through the ledger
    pub stock_adjusted: usize,
    pub skipped: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn skip(&mut self, line: u64, reference: &str, reason: impl Into<String>) {
        self.skipped.push(ImportIssue {
            line,
            reference: reference.trim().to_string(),
            reason: reason.into(),
        });
    }
}
