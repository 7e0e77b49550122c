//! # Field Constraints Validator
//!
//! Validation engine for field constraints. This crate checks single values or
//! whole records against the rules held in a [`constraints_core::ConstraintMap`]:
//!
//! - Built-in validators (required, size, numeric bounds, email, url, digits,
//!   pattern, past and future dates)
//! - A validator registry with custom validators and name aliases
//! - A constraint store that can be fed programmatically or loaded over HTTP
//! - A revalidate signal that fires whenever constraints or classes change
//!
//! ## Example
//!
//! ```rust
//! use constraints_validator::FieldValidator;
//! # use constraints_core::{ConstraintMapBuilder, FieldBuilder};
//!
//! # let constraints = ConstraintMapBuilder::new()
//! #     .field("Person", "email", FieldBuilder::new().required().email().build())
//! #     .build();
//! let validator = FieldValidator::new();
//! validator.add_constraints(constraints);
//!
//! let result = validator.validate("Person", "email", "not-an-email").unwrap();
//!
//! if result.valid {
//!     println!("Validation passed!");
//! } else {
//!     for violation in result.violations() {
//!         println!("{}", violation.render());
//!     }
//! }
//! ```

mod builtin;
mod engine;
mod error;
mod loader;
mod pattern;
mod registry;
mod signal;
mod store;
mod temporal;

pub use builtin::*;
pub use engine::*;
pub use error::*;
pub use loader::*;
pub use pattern::*;
pub use registry::*;
pub use signal::*;
pub use store::*;
pub use temporal::*;
