use std::fmt;

// === LinkError ===

/// Errors related to link store operations.
#[derive(Debug)]
pub enum LinkError {
    /// Link with the given ID was not found.
    NotFound(String),
    /// Child link with the given ID was not found.
    ChildNotFound(String),
    /// The parent link for a child operation was not found.
    ParentNotFound(String),
    /// A required field was missing or empty.
    MissingField(&'static str),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::NotFound(id) => write!(f, "Link not found: {}", id),
            LinkError::ChildNotFound(id) => write!(f, "Child link not found: {}", id),
            LinkError::ParentNotFound(id) => write!(f, "Parent link not found: {}", id),
            LinkError::MissingField(field) => write!(f, "Missing required field: {}", field),
            LinkError::DatabaseError(msg) => write!(f, "Link database error: {}", msg),
        }
    }
}

impl std::error::Error for LinkError {}

// === SettingsError ===

/// Errors related to per-owner dashboard settings.
#[derive(Debug)]
pub enum SettingsError {
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid for its key.
    InvalidValue(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::DatabaseError(msg) => write!(f, "Settings database error: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

// === IconError ===

/// Errors related to the icon storage collaborator.
#[derive(Debug)]
pub enum IconError {
    /// No icon storage endpoint has been configured.
    NotConfigured,
    /// A network error occurred while talking to the storage service.
    NetworkError(String),
    /// The storage service returned an error response.
    ServiceError(String),
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconError::NotConfigured => write!(f, "Icon storage is not configured"),
            IconError::NetworkError(msg) => write!(f, "Icon storage network error: {}", msg),
            IconError::ServiceError(msg) => write!(f, "Icon storage service error: {}", msg),
        }
    }
}

impl std::error::Error for IconError {}

// === FaviconError ===

/// Errors related to favicon lookup.
#[derive(Debug)]
pub enum FaviconError {
    /// The URL could not be parsed into a domain.
    InvalidUrl(String),
    /// A network error occurred while fetching the favicon.
    NetworkError(String),
}

impl fmt::Display for FaviconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaviconError::InvalidUrl(url) => write!(f, "Cannot extract domain from: {}", url),
            FaviconError::NetworkError(msg) => write!(f, "Favicon network error: {}", msg),
        }
    }
}

impl std::error::Error for FaviconError {}
