pub mod url_validation;
pub use url_validation::{UrlValidationError, normalize_server_url, validate_server_url};
