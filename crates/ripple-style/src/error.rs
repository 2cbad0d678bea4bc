//! Error types for the styling helpers.

/// Result type alias for style operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the styling helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The value is not an `rgb(...)`/`rgba(...)` functional color.
    #[error("'{value}' is not an rgb()/rgba() color")]
    NotRgb { value: String },

    /// A selector attribute name contains characters that cannot be used unquoted.
    #[error("Invalid attribute name '{name}' for a style rule")]
    InvalidAttribute { name: String },
}

impl Error {
    /// Create a non-rgb color error.
    pub fn not_rgb(value: impl Into<String>) -> Self {
        Self::NotRgb {
            value: value.into(),
        }
    }

    /// Create an attribute name error.
    pub fn invalid_attribute(name: impl Into<String>) -> Self {
        Self::InvalidAttribute { name: name.into() }
    }
}
