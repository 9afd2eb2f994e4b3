//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Email/password account creation through the identity provider

pub mod auth;
