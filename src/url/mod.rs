//! URL handling module for Page Analyzer
//!
//! This module validates user-supplied addresses and reduces them to the
//! canonical `scheme://host` form under which they are stored.

mod validate;

pub use validate::{validate_url, CanonicalUrl, MAX_URL_LENGTH};
