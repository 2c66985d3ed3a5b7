//! The vintages cleanup pass.
//!
//! Removes vintages whose rating count is below a threshold, together with
//! their top-list rankings, in one transaction on a caller-owned connection.

pub mod cleaner;
pub mod error;

pub use cleaner::{Cleaner, CleanupOptions, CleanupReport, DEFAULT_MIN_RATINGS};
pub use error::CleanupError;
