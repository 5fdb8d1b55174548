use thiserror::Error;

/// Result type alias using RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and the JSON error report written by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup
    UnknownRoot,
    NotFound,

    // Formatting
    UnsupportedValueKind,

    // Store access (recoverable during traversal)
    AccessDenied,
    Io,
    HandleReleased,
    Unauthorised,

    // Input files
    InvalidInput,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnknownRoot => "ERR_UNKNOWN_ROOT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::UnsupportedValueKind => "ERR_UNSUPPORTED_VALUE_KIND",
            ExErrorKind::AccessDenied => "ERR_ACCESS_DENIED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::HandleReleased => "ERR_HANDLE_RELEASED",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the registry
/// context (key path, value name) the failure happened at.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    key_path: Option<String>,
    value_name: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            key_path: None,
            value_name: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add key path context
    pub fn with_key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = Some(key_path.into());
        self
    }

    /// Add value name context
    pub fn with_value_name(mut self, value_name: impl Into<String>) -> Self {
        self.value_name = Some(value_name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the key path context, if any
    pub fn key_path(&self) -> Option<&str> {
        self.key_path.as_deref()
    }

    /// Get the value name context, if any
    pub fn value_name(&self) -> Option<&str> {
        self.value_name.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key_path) = &self.key_path {
            write!(f, " (key_path: {})", key_path)?;
        }
        if let Some(value_name) = &self.value_name {
            write!(f, " (value_name: {})", value_name)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for registry inventory operations
///
/// Traversal treats the store-access variants as recoverable (see
/// [`RegistryError::is_recoverable`]); every other variant aborts the
/// operation it was raised in.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    // ===== Lookup Errors =====
    /// Root name is neither a canonical root name nor an alias
    #[error("Unknown root key: {name}")]
    UnknownRoot { name: String },

    /// Key path does not exist under its root
    #[error("Key not found: {key_path} in {root}")]
    KeyNotFound { root: String, key_path: String },

    // ===== Formatting Errors =====
    /// Value has a kind the interchange format does not cover
    #[error("Unsupported registry value kind {kind} for value '{value_name}' in {key_path}")]
    UnsupportedValueKind {
        key_path: String,
        value_name: String,
        kind: u32,
    },

    // ===== Store Access Errors =====
    /// Permission to read the key was refused
    #[error("Access denied: {key_path}")]
    AccessDenied { key_path: String, message: String },

    /// I/O failure while reading from the store
    #[error("I/O error reading {key_path}")]
    Io { key_path: String, message: String },

    /// Key handle was used after it had been released
    #[error("Key handle already released: {key_path}")]
    HandleReleased { key_path: String },

    /// Caller is not authorised for the operation
    #[error("Unauthorized access: {key_path}")]
    Unauthorized { key_path: String, message: String },

    // ===== Generic Errors =====
    /// Malformed caller input (records, plan files, snapshot files)
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Serialization error (YAML/JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl RegistryError {
    /// Whether traversal logs this error and carries on.
    ///
    /// Permission, I/O, released-handle and unauthorised failures are
    /// recoverable. Everything else propagates and aborts the traversal.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RegistryError::AccessDenied { .. }
                | RegistryError::Io { .. }
                | RegistryError::HandleReleased { .. }
                | RegistryError::Unauthorized { .. }
        )
    }

    /// Detail text carried in addition to the display message, if any.
    pub fn inner_message(&self) -> Option<&str> {
        match self {
            RegistryError::AccessDenied { message, .. }
            | RegistryError::Io { message, .. }
            | RegistryError::Unauthorized { message, .. } => {
                if message.is_empty() {
                    None
                } else {
                    Some(message)
                }
            }
            _ => None,
        }
    }
}

/// Conversion from RegistryError to ExError
impl From<RegistryError> for ExError {
    fn from(err: RegistryError) -> Self {
        let message = err.to_string();
        match err {
            RegistryError::UnknownRoot { .. } => {
                ExError::new(ExErrorKind::UnknownRoot).with_message(message)
            }
            RegistryError::KeyNotFound { key_path, .. } => ExError::new(ExErrorKind::NotFound)
                .with_key_path(key_path)
                .with_message(message),
            RegistryError::UnsupportedValueKind {
                key_path,
                value_name,
                ..
            } => ExError::new(ExErrorKind::UnsupportedValueKind)
                .with_op("format_value")
                .with_key_path(key_path)
                .with_value_name(value_name)
                .with_message(message),
            RegistryError::AccessDenied { key_path, .. } => {
                ExError::new(ExErrorKind::AccessDenied)
                    .with_key_path(key_path)
                    .with_message(message)
            }
            RegistryError::Io { key_path, .. } => ExError::new(ExErrorKind::Io)
                .with_key_path(key_path)
                .with_message(message),
            RegistryError::HandleReleased { key_path } => {
                ExError::new(ExErrorKind::HandleReleased)
                    .with_key_path(key_path)
                    .with_message(message)
            }
            RegistryError::Unauthorized { key_path, .. } => {
                ExError::new(ExErrorKind::Unauthorised)
                    .with_key_path(key_path)
                    .with_message(message)
            }
            RegistryError::InvalidInput { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            RegistryError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            RegistryError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
