//! Screen controllers.
//!
//! Each controller owns the state of one screen and drives the services
//! behind it. Rendering is left to the caller: controllers expose plain view
//! models (`HomeView`, `Notice`) instead.
//!
//! # Screens
//!
//! - `home` - Category chips and the product listing
//! - `sign_up` - Email/password account creation

pub mod home;
pub mod sign_up;

pub use home::{CategoryChip, HomeScreen, HomeView, Listing};
pub use sign_up::{Notice, SignUpScreen};

/// Navigation targets a controller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Route {
    /// Where a newly created account lands.
    AdminDashboard,
}
