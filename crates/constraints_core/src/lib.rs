//! # Field Constraints Core
//!
//! Core data structures and types for the Field Constraints Engine.
//!
//! This crate provides the building blocks for describing per-field validation rules
//! and the results produced when values are checked against them. Rules are grouped
//! by a logical type name (a model or form), then by field name, then by validator name.
//!
//! ## Key Concepts
//!
//! - **ConstraintMap**: type name → field name → ordered validator name → parameters
//! - **Constraint**: a named validator reference plus its parameters
//! - **FieldValue**: the value under validation (undefined, null, number, string, ...)
//! - **Violation**: a record describing one failed constraint
//! - **ValidationResult**: the pass/fail outcome with optional violations
//!
//! ## Example
//!
//! ```rust
//! use constraints_core::{ConstraintMapBuilder, FieldBuilder};
//!
//! let constraints = ConstraintMapBuilder::new()
//!     .field(
//!         "Person",
//!         "firstName",
//!         FieldBuilder::new()
//!             .required()
//!             .message("message.required")
//!             .size(Some(2), Some(20))
//!             .build(),
//!     )
//!     .build();
//!
//! let first_name = constraints.field_constraints("Person", "firstName").unwrap();
//! assert_eq!(first_name.names().collect::<Vec<_>>(), vec!["Required", "Size"]);
//! ```

pub mod builder;
pub mod config;
pub mod constraint;
pub mod error;
pub mod message;
pub mod validator;
pub mod value;
pub mod violation;

pub use builder::*;
pub use config::*;
pub use constraint::*;
pub use error::*;
pub use message::*;
pub use validator::*;
pub use value::*;
pub use violation::*;
