//! Server-rendered HTML.
//!
//! Every function returns the page body; [`layout::Page`] wraps it in the
//! document shell. All interpolated text goes through [`layout::escape`].

pub mod admin;
pub mod catalog;
pub mod contacts;
pub mod inventory;
pub mod layout;
pub mod products;

pub use layout::{escape, Page};
