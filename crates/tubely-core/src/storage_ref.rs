//! Persisted reference to an object in the object store.
//!
//! A video record never stores a URL. It stores `{bucket},{key}` and a signed
//! URL is derived from it on every read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageRefError {
    #[error("reference '{0}' has no ',' separating bucket and key")]
    MissingSeparator(String),

    #[error("reference '{0}' has an empty bucket")]
    EmptyBucket(String),

    #[error("reference '{0}' has an empty key")]
    EmptyKey(String),
}

/// Bucket plus key of a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageRef {
    bucket: String,
    key: String,
}

impl StorageRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Result<Self, StorageRefError> {
        let bucket = bucket.into();
        let key = key.into();
        if bucket.is_empty() {
            return Err(StorageRefError::EmptyBucket(format!("{},{}", bucket, key)));
        }
        if key.is_empty() {
            return Err(StorageRefError::EmptyKey(format!("{},{}", bucket, key)));
        }
        Ok(Self { bucket, key })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for StorageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.bucket, self.key)
    }
}

/// Splits on the first comma only, so keys may contain commas.
impl FromStr for StorageRef {
    type Err = StorageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (bucket, key) = s
            .split_once(',')
            .ok_or_else(|| StorageRefError::MissingSeparator(s.to_string()))?;
        if bucket.is_empty() {
            return Err(StorageRefError::EmptyBucket(s.to_string()));
        }
        if key.is_empty() {
            return Err(StorageRefError::EmptyKey(s.to_string()));
        }
        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }
}

impl TryFrom<String> for StorageRef {
    type Error = StorageRefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StorageRef> for String {
    fn from(value: StorageRef) -> Self {
        value.to_string()
    }
}
