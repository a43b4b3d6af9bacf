//! Object key layout
//!
//! Every object of an upload session lives under `{upload_id}/`: the client
//! writes `{upload_id}/original` and the processor writes derivatives next to it.
//! The first path segment is the only link between an object and its session.

use std::fmt;

use rand::{rngs::OsRng, Rng};

/// Number of characters in a generated upload id
pub const UPLOAD_ID_LENGTH: usize = 30;

/// Name of the source object inside an upload prefix
pub const ORIGINAL_OBJECT_NAME: &str = "original";

const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Opaque token correlating an original image with its derivatives
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadId(String);

impl UploadId {
    /// Generates a fresh id from the operating system's CSPRNG
    #[must_use]
    pub fn generate() -> Self {
        let id = (0..UPLOAD_ID_LENGTH)
            .map(|_| char::from(URL_SAFE_ALPHABET[OsRng.gen_range(0..URL_SAFE_ALPHABET.len())]))
            .collect();
        Self(id)
    }

    /// Recovers the owning upload id from an object key
    ///
    /// Returns `None` when the key has no `/` or starts with one.
    #[must_use]
    pub fn from_object_key(key: &str) -> Option<Self> {
        match key.split_once('/') {
            Some((prefix, _)) if !prefix.is_empty() => Some(Self(prefix.to_string())),
            _ => None,
        }
    }

    /// Key the client uploads the original image to
    #[must_use]
    pub fn original_key(&self) -> String {
        self.object_key(ORIGINAL_OBJECT_NAME)
    }

    /// Key of an object named `name` inside this upload's prefix
    #[must_use]
    pub fn object_key(&self, name: &str) -> String {
        format!("{}/{name}", self.0)
    }

    /// The raw id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UploadId> for String {
    fn from(id: UploadId) -> Self {
        id.0
    }
}
