//
//  codec.rs
//  filedb
//
//  Created by the filedb team
//

//! Serialization formats for stored records.
//!
//! A [`Codec`] turns a value into the bytes of one resource file and back.
//! The codec also owns the file extension, so the on-disk name of a resource
//! is always `<resource>.<EXTENSION>`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// A human-readable serialization format.
pub trait Codec: Send + Sync + 'static {
    /// File extension without the leading dot.
    const EXTENSION: &'static str;

    /// Encode a value as indented text terminated by a newline.
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>>;

    /// Decode a value from the contents of a resource file.
    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T>;
}

/// JSON, pretty-printed with two-space indentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Codec for Json {
    const EXTENSION: &'static str = "json";

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(value)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// YAML block style.
#[derive(Debug, Clone, Copy, Default)]
pub struct Yaml;

impl Codec for Yaml {
    const EXTENSION: &'static str = "yaml";

    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
        let mut text = serde_yaml::to_string(value)?;
        // serde_yaml already terminates documents; never double up
        if !text.ends_with('\n') {
            text.push('\n');
        }
        Ok(text.into_bytes())
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_yaml::from_slice(bytes)?)
    }
}

/// Format names accepted by configuration and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => Json::EXTENSION,
            Format::Yaml => Yaml::EXTENSION,
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(format!("unknown format '{}' (expected json or yaml)", other)),
        }
    }
}
