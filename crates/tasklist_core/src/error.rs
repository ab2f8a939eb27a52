use std::fmt;

/// Error categories the store can produce: rejected input, a corrupt
/// persistence file, and plain I/O failures. An `Io` error returned from a
/// mutating operation means the in-memory change was applied but the write
/// to disk failed; the store never rolls back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    InvalidInput(String),
    Corrupt(String),
    Io(String),
}

impl StoreError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn corrupt<M: Into<String>>(message: M) -> Self {
        Self::Corrupt(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Corrupt(_) => "corrupt_store",
            Self::Io(_) => "io_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message) => message,
            Self::Corrupt(message) => message,
            Self::Io(message) => message,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for StoreError {}
