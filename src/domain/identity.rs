use std::fmt;
use std::fmt::Write;

/// Prefix and extension of per-identity CSV ledger files.
pub const RECORD_FILE_PREFIX: &str = "expenses_";
pub const RECORD_FILE_EXTENSION: &str = "csv";

/// The caller a session works for. Each identity owns an isolated ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    id: String,
}

impl Identity {
    pub fn new(raw: &str) -> Result<Self, IdentityError> {
        let id = raw.trim();
        if id.is_empty() {
            return Err(IdentityError::Empty);
        }
        Ok(Self { id: id.to_string() })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Filesystem-safe key derived from the identifier.
    ///
    /// ASCII letters, digits and `-` are kept; every other byte becomes `_xx`
    /// (lowercase hex), so two different identifiers never share a key.
    pub fn key(&self) -> String {
        let mut key = String::with_capacity(self.id.len());
        for byte in self.id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                key.push(byte as char);
            } else {
                // Writing to a String cannot fail
                let _ = write!(key, "_{:02x}", byte);
            }
        }
        key
    }

    /// Name of the CSV record holding this identity's ledger.
    pub fn record_file_name(&self) -> String {
        format!(
            "{}{}.{}",
            RECORD_FILE_PREFIX,
            self.key(),
            RECORD_FILE_EXTENSION
        )
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    Empty,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Empty => write!(f, "identity must not be empty"),
        }
    }
}

impl std::error::Error for IdentityError {}
