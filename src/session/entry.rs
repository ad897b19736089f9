//! Input entries held by a session.

use std::fmt;

use crate::io::{Blob, InputFile};
use crate::utils::{format_file_size, random_token};

const ID_LEN: usize = 8;

/// Opaque identifier of an entry, stable for the entry's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(String);

impl EntryId {
    pub(crate) fn generate() -> Self {
        Self(random_token(ID_LEN))
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One document pending merge.
#[derive(Debug, Clone)]
pub struct InputEntry {
    id: EntryId,
    blob: Blob,
    display_name: String,
    byte_size: u64,
}

impl InputEntry {
    pub(crate) fn new(id: EntryId, file: InputFile) -> Self {
        Self {
            id,
            blob: file.bytes,
            display_name: file.name,
            byte_size: file.size,
        }
    }

    /// The entry's id.
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Raw document bytes.
    pub fn blob(&self) -> &Blob {
        &self.blob
    }

    /// Original file name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Size in bytes.
    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    /// Size formatted for display.
    pub fn formatted_size(&self) -> String {
        format_file_size(self.byte_size)
    }
}
