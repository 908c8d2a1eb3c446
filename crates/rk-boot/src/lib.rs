//! Boot configuration loading for services
//!
//! Reads a YAML boot document, applies overrides from `RK_`-prefixed
//! environment variables and the `--rkset` flag, and decodes the result into
//! a typed configuration. See [`loader`] for the full sequence.

pub mod args;
pub mod decode;
pub mod document;
pub mod error;
pub mod loader;
pub mod util;

pub use args::{OVERRIDE_FLAG, rkset_values};
pub use decode::{NodeDeserializer, Rendered, from_node};
pub use document::{from_yaml, parse_document};
pub use error::{DecodeError, Error, Result};
pub use loader::{BootLoader, LoadedTree, OverrideSources, shutdown_with_error};
pub use util::{default_if_empty, domain_matches, is_valid_domain, read_local_file};

pub use rk_override::{Node, Overrides, Source};
