//! Reusable Azure field validators.
//!
//! These checks are independent of admission requests: each takes the value
//! under test plus the path it lives at and returns the field errors found.

mod field;
pub mod identity;
pub mod image;
pub mod ssh;
pub mod version;

pub use field::{AggregateError, ErrorKind, ErrorList, FieldError, FieldPath};
pub use identity::{validate_system_assigned_identity, validate_user_assigned_identity};
pub use image::validate_image;
pub use ssh::{SshKeyError, generate_ssh_public_key, validate_ssh_key};
pub use version::parse_tolerant;
