//! Message formats: loading, validation and typed access.
//!
//! A format is a template group file `<name>.stg` that defines the three
//! required templates `location`, `message` and `report`, plus an optional
//! `wantsSingleLineMessage` flag.

mod group;
mod registry;

pub use group::{FormatGroup, FormatOrigin, REQUIRED_TEMPLATES};
pub use registry::{EMBEDDED_DEFAULT, FORMAT_EXTENSION, FormatRegistry};
