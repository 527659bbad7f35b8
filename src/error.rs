use std::{io, path::StripPrefixError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum LoamError {
    /// Two source files normalize to the same canonical note id. This is the
    /// only error that aborts a build; everything else degrades to a
    /// diagnostic.
    #[error("duplicate note id '{id}': both '{first}' and '{second}' normalize to it")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl From<StripPrefixError> for LoamError {
    fn from(src: StripPrefixError) -> LoamError {
        LoamError::NotFound(format!("Strip prefix failed for path. Error: {src}"))
    }
}

impl From<toml::de::Error> for LoamError {
    fn from(src: toml::de::Error) -> LoamError {
        LoamError::Config(format!("Toml deserialization error: {src}"))
    }
}

impl From<serde_yaml::Error> for LoamError {
    fn from(src: serde_yaml::Error) -> LoamError {
        LoamError::Serialization(format!("Yaml deserialization error: {src}"))
    }
}

impl From<serde_json::Error> for LoamError {
    fn from(src: serde_json::Error) -> LoamError {
        LoamError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for LoamError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => LoamError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => LoamError::PermissionDenied,
            _ => LoamError::Io(format!("IOError: {}", x.kind())),
        }
    }
}
