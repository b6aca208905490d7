//! Utility functions for rule implementations.

pub mod allowance;
pub mod casing;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use allowance::{check_allow_with_reason, AllowCheck, Allowances};
#[doc(inline)]
pub use casing::Casing;
