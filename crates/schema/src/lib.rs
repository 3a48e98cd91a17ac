//! # jobconf-schema
//!
//! Schema helpers shared by job and plugin configuration fields.
//!
//! Configuration schemas attach validator functions to fields. A validator
//! receives the field's value and name and returns the diagnostics it found;
//! an empty list means the value is acceptable.
//!
//! ```
//! use jobconf_schema::validate_value_func;
//!
//! let validate = validate_value_func(["admin", "user"]);
//! assert!(validate("admin", "role").is_empty());
//! assert_eq!(
//!     validate("root", "role")[0].to_string(),
//!     "root is an invalid value for argument role"
//! );
//! ```

pub mod error;
pub mod validate;

pub use error::ValidationError;
pub use validate::{ValidateFn, validate_value_func};
