//! Customers and suppliers.
//!
//! Both are soft-deleted address-book records searched the same way, so they
//! share [`ContactFilter`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = current, Some = deleted)
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_number: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Supplier {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 50, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 50, message = "Tax number is too long"))]
    pub tax_number: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 100, message = "City is too long"))]
    pub city: Option<String>,
    #[validate(length(max = 20, message = "Postal code is too long"))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100, message = "Country is too long"))]
    pub country: Option<String>,
    pub notes: Option<String>,
    /// HTML checkbox: present ("on") when ticked
    #[serde(default)]
    pub is_active: Option<String>,
}

impl CustomerInput {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: clean(self.email).map(|e| e.to_lowercase()),
            phone: clean(self.phone),
            tax_number: clean(self.tax_number),
            address: clean(self.address),
            city: clean(self.city),
            postal_code: clean(self.postal_code),
            country: clean(self.country),
            notes: clean(self.notes),
            is_active: self.is_active,
        }
    }

    pub fn active(&self) -> bool {
        checkbox(&self.is_active)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SupplierInput {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(length(max = 200, message = "Contact person is too long"))]
    pub contact_person: Option<String>,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 50, message = "Phone number is too long"))]
    pub phone: Option<String>,
    #[validate(length(max = 50, message = "Tax number is too long"))]
    pub tax_number: Option<String>,
    pub address: Option<String>,
    #[validate(url(message = "Website must be a full URL"))]
    pub website: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_active: Option<String>,
}

impl SupplierInput {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            contact_person: clean(self.contact_person),
            email: clean(self.email).map(|e| e.to_lowercase()),
            phone: clean(self.phone),
            tax_number: clean(self.tax_number),
            address: clean(self.address),
            website: clean(self.website),
            notes: clean(self.notes),
            is_active: self.is_active,
        }
    }

    pub fn active(&self) -> bool {
        checkbox(&self.is_active)
    }
}

/// Pre-fill an edit form.
impl From<&Customer> for CustomerInput {
    fn from(c: &Customer) -> Self {
        Self {
            name: c.name.clone(),
            email: c.email.clone(),
            phone: c.phone.clone(),
            tax_number: c.tax_number.clone(),
            address: c.address.clone(),
            city: c.city.clone(),
            postal_code: c.postal_code.clone(),
            country: c.country.clone(),
            notes: c.notes.clone(),
            is_active: c.is_active.then(|| "on".to_string()),
        }
    }
}

impl From<&Supplier> for SupplierInput {
    fn from(s: &Supplier) -> Self {
        Self {
            name: s.name.clone(),
            contact_person: s.contact_person.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            tax_number: s.tax_number.clone(),
            address: s.address.clone(),
            website: s.website.clone(),
            notes: s.notes.clone(),
            is_active: s.is_active.then(|| "on".to_string()),
        }
    }
}

/// Interpret an HTML checkbox value.
pub fn checkbox(value: &Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("on") | Some("true") | Some("1") | Some("yes")
    )
}

/// Which records a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactScope {
    #[default]
    Current,
    Deleted,
}

impl ContactScope {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("deleted") => ContactScope::Deleted,
            _ => ContactScope::Current,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactFilter {
    pub search: Option<String>,
    pub scope: ContactScope,
    pub active_only: bool,
}

impl ContactFilter {
    pub fn from_query(search: Option<&str>, show: Option<&str>, active: Option<&str>) -> Self {
        Self {
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.chars().take(100).collect()),
            scope: ContactScope::parse(show),
            active_only: matches!(active, Some("1") | Some("true") | Some("on")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_input_blank_email_is_valid() {
        let input = CustomerInput {
            name: "Maria Silva".to_string(),
            email: Some("   ".to_string()),
            ..Default::default()
        }
        .normalized();

        assert!(input.email.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_customer_input_rejects_bad_email() {
        let input = CustomerInput {
            name: "Maria Silva".to_string(),
            email: Some("maria-at-example".to_string()),
            ..Default::default()
        }
        .normalized();

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_supplier_website_must_be_url() {
        let mut input = SupplierInput {
            name: "Ourivesaria Norte".to_string(),
            website: Some("ourivesaria".to_string()),
            ..Default::default()
        };
        assert!(input.clone().normalized().validate().is_err());

        input.website = Some("https://ourivesaria.example".to_string());
        assert!(input.normalized().validate().is_ok());
    }

    #[test]
    fn test_checkbox_values() {
        assert!(checkbox(&Some("on".to_string())));
        assert!(!checkbox(&None));
        assert!(!checkbox(&Some("off".to_string())));
    }

    #[test]
    fn test_contact_filter_from_query() {
        let filter = ContactFilter::from_query(Some(" silva "), Some("deleted"), None);
        assert_eq!(filter.search.as_deref(), Some("silva"));
        assert_eq!(filter.scope, ContactScope::Deleted);
        assert!(!filter.active_only);
    }
}
