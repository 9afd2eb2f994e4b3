//! Pocket Shop Storefront library.
//!
//! The client side of a small storefront backed by Cloud Firestore and
//! Firebase Authentication: category-scoped product browsing and account
//! sign-up, exposed as screen controllers so any front-end can drive them.
//!
//! # Modules
//!
//! - [`catalog`] - Category and product loading plus the selection state machine
//! - [`screens`] - Home and sign-up controllers with their view models
//! - [`services`] - Account creation
//! - [`firebase`] - REST clients and the `DocumentStore` / `AuthProvider` seams
//! - [`config`] - Environment configuration
//! - [`error`] - User-facing load errors and Sentry helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod firebase;
pub mod screens;
pub mod services;
pub mod state;
