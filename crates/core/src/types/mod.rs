//! Core types for Pocket Shop.
//!
//! This module provides type-safe wrappers for catalog records.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::Category;
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Product, ProductFields};
