//! Pocket Shop Core - Shared catalog types.
//!
//! This crate provides the types shared by every Pocket Shop component:
//! - `storefront` - Catalog selection flow and Firebase clients
//! - `cli` - Terminal front-end for browsing and sign-up
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async
//! runtime. Remote records are normalised into these types by the storefront
//! crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, categories and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
