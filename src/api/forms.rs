//! Raw HTML form payloads and their conversion into domain inputs.
//!
//! Forms keep the text exactly as typed so a rejected submission can be
//! shown again without losing what the user entered.

use serde::Deserialize;

use crate::domain::contact::checkbox;
use crate::domain::{Money, Product, ProductInput, StockMovement, TransactionType};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    pub reference: String,
    pub family_id: String,
    pub name: String,
    pub description: String,
    pub sale_price: String,
    pub purchase_price: String,
    pub initial_stock: String,
    pub style: String,
    pub material: String,
    pub weight: String,
    pub dimensions: String,
    pub is_active: bool,
    pub featured: bool,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            reference: String::new(),
            family_id: String::new(),
            name: String::new(),
            description: String::new(),
            sale_price: String::new(),
            purchase_price: String::new(),
            initial_stock: "0".to_string(),
            style: String::new(),
            material: String::new(),
            weight: String::new(),
            dimensions: String::new(),
            is_active: true,
            featured: false,
        }
    }
}

impl ProductForm {
    /// Start for a submitted form: unticked checkboxes are simply absent.
    pub fn submitted() -> Self {
        Self {
            initial_stock: String::new(),
            is_active: false,
            ..Self::default()
        }
    }

    pub fn from_product(product: &Product) -> Self {
        Self {
            reference: product.reference.clone(),
            family_id: product.family_id.to_string(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            sale_price: product.sale_price.to_input_value(),
            purchase_price: product.purchase_price.to_input_value(),
            initial_stock: String::new(),
            style: product.style.clone().unwrap_or_default(),
            material: product.material.clone().unwrap_or_default(),
            weight: product.weight.map(|w| w.to_string()).unwrap_or_default(),
            dimensions: product.dimensions.clone().unwrap_or_default(),
            is_active: product.is_active,
            featured: product.featured,
        }
    }

    /// Record one multipart text field. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: String) {
        match name {
            "reference" => self.reference = value,
            "family_id" => self.family_id = value,
            "name" => self.name = value,
            "description" => self.description = value,
            "sale_price" => self.sale_price = value,
            "purchase_price" => self.purchase_price = value,
            "initial_stock" => self.initial_stock = value,
            "style" => self.style = value,
            "material" => self.material = value,
            "weight" => self.weight = value,
            "dimensions" => self.dimensions = value,
            "is_active" => self.is_active = checkbox(&Some(value)),
            "featured" => self.featured = checkbox(&Some(value)),
            _ => {}
        }
    }

    pub fn to_input(&self) -> AppResult<ProductInput> {
        let family_id = self
            .family_id
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::validation("Please select a family"))?;

        let price = |raw: &str, label: &str| {
            Money::parse(raw).map_err(|_| AppError::validation(format!("{} is not a valid amount", label)))
        };

        let initial_stock = match self.initial_stock.trim() {
            "" => 0,
            raw => raw
                .parse::<i32>()
                .map_err(|_| AppError::validation("Initial stock must be a whole number"))?,
        };

        let weight = match self.weight.trim() {
            "" => None,
            raw => Some(
                raw.replace(',', ".")
                    .parse::<f64>()
                    .map_err(|_| AppError::validation("Weight must be a number"))?,
            ),
        };

        Ok(ProductInput {
            reference: self.reference.clone(),
            family_id,
            name: self.name.clone(),
            description: Some(self.description.clone()),
            sale_price: price(&self.sale_price, "Sale price")?,
            purchase_price: price(&self.purchase_price, "Purchase price")?,
            initial_stock,
            style: Some(self.style.clone()),
            material: Some(self.material.clone()),
            weight,
            dimensions: Some(self.dimensions.clone()),
            is_active: self.is_active,
            featured: self.featured,
        }
        .normalized())
    }
}

/// `POST /admin/inventory/movement`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementForm {
    pub product_id: String,
    pub transaction_type: String,
    pub quantity: String,
    #[serde(default)]
    pub unit_price: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Page to go back to afterwards
    #[serde(default)]
    pub return_to: Option<String>,
}

impl MovementForm {
    pub fn to_movement(&self, created_by: Option<String>) -> AppResult<StockMovement> {
        let product_id = self
            .product_id
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::validation("Please select a product"))?;
        let transaction_type = TransactionType::parse(&self.transaction_type)
            .ok_or_else(|| AppError::validation("Unknown transaction type"))?;
        let quantity = self
            .quantity
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::validation("Quantity must be a whole number"))?;
        let unit_price = match self.unit_price.as_deref().map(str::trim) {
            None | Some("") => Money::ZERO,
            Some(raw) => Money::parse(raw)
                .map_err(|_| AppError::validation("Unit price is not a valid amount"))?,
        };

        let movement = StockMovement {
            product_id,
            transaction_type,
            quantity,
            unit_price,
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            created_by,
        };
        movement.validate()?;
        Ok(movement)
    }
}

/// Login form posted by the back office.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SitePasswordForm {
    pub password: String,
}

/// Only local absolute paths are accepted as redirect targets.
pub fn safe_return_path(path: Option<&str>, fallback: &str) -> String {
    match path {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ProductForm {
        let mut form = ProductForm::submitted();
        for (name, value) in [
            ("reference", " AN-0042 "),
            ("family_id", "3"),
            ("name", "Silver ring"),
            ("sale_price", "49,90"),
            ("purchase_price", "20"),
            ("initial_stock", "4"),
            ("weight", "2,5"),
            ("featured", "on"),
        ] {
            form.set_field(name, value.to_string());
        }
        form
    }

    #[test]
    fn test_product_form_to_input() {
        let input = filled().to_input().unwrap();

        assert_eq!(input.reference, "AN-0042");
        assert_eq!(input.family_id, 3);
        assert_eq!(input.sale_price.cents(), 4990);
        assert_eq!(input.purchase_price.cents(), 2000);
        assert_eq!(input.initial_stock, 4);
        assert_eq!(input.weight, Some(2.5));
        assert!(input.description.is_none());
        assert!(input.featured);
        assert!(!input.is_active);
    }

    #[test]
    fn test_product_form_rejects_bad_price() {
        let mut form = filled();
        form.set_field("sale_price", "a lot".to_string());
        let err = form.to_input().unwrap_err();
        assert_eq!(err.to_string(), "Sale price is not a valid amount");
    }

    #[test]
    fn test_product_form_requires_family() {
        let mut form = filled();
        form.set_field("family_id", String::new());
        assert!(form.to_input().is_err());
    }

    #[test]
    fn test_movement_form() {
        let form = MovementForm {
            product_id: "5".to_string(),
            transaction_type: "sale".to_string(),
            quantity: "2".to_string(),
            unit_price: Some("12,50".to_string()),
            notes: Some("  ".to_string()),
            return_to: None,
        };
        let movement = form.to_movement(Some("maria".to_string())).unwrap();

        assert_eq!(movement.transaction_type, TransactionType::Sale);
        assert_eq!(movement.unit_price.cents(), 1250);
        assert!(movement.notes.is_none());
    }

    #[test]
    fn test_movement_form_rejects_oversized_values() {
        let form = MovementForm {
            product_id: "5".to_string(),
            transaction_type: "purchase".to_string(),
            quantity: "2147483647".to_string(),
            ..Default::default()
        };
        assert!(form.to_movement(None).is_err());

        let form = MovementForm {
            product_id: "5".to_string(),
            transaction_type: "purchase".to_string(),
            quantity: "1".to_string(),
            unit_price: Some("99999999999999".to_string()),
            ..Default::default()
        };
        assert!(form.to_movement(None).is_err());
    }

    #[test]
    fn test_safe_return_path() {
        assert_eq!(safe_return_path(Some("/admin/products?page=2"), "/x"), "/admin/products?page=2");
        assert_eq!(safe_return_path(Some("//evil.example"), "/x"), "/x");
        assert_eq!(safe_return_path(Some("https://evil.example"), "/x"), "/x");
        assert_eq!(safe_return_path(None, "/x"), "/x");
    }
}
