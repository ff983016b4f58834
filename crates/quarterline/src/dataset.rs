//! Reading chart datasets from JSON.
//!
//! Datasets come from the dashboard API already fetched. Two shapes are
//! accepted: a bare array of points, or the API envelope
//! `{ "data": { "average": [...], "groups": [...] } }`.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::groups::GroupPoint;
use crate::series::QuarterPoint;

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input.
    Stdin,
    /// A JSON file.
    File(PathBuf),
}

impl Source {
    /// Interpret a CLI path argument; missing or `-` means stdin.
    #[must_use]
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            None => Self::Stdin,
            Some(p) if p.as_os_str() == "-" => Self::Stdin,
            Some(p) => Self::File(p.to_path_buf()),
        }
    }

    /// Read and parse the JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetRead`] if the file cannot be opened and
    /// [`Error::Json`] if the content is not valid JSON.
    pub fn read_json(&self) -> Result<Value> {
        match self {
            Self::Stdin => parse_json(io::stdin().lock()),
            Self::File(path) => {
                debug!("Reading dataset from {}", path.display());
                let file = File::open(path).map_err(|source| Error::DatasetRead {
                    path: path.clone(),
                    source,
                })?;
                parse_json(BufReader::new(file))
            }
        }
    }
}

/// Named sections of the API envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// `data.average`
    Average,
    /// `data.groups`
    Groups,
}

impl Section {
    fn key(self) -> &'static str {
        match self {
            Self::Average => "average",
            Self::Groups => "groups",
        }
    }
}

fn parse_json<R: Read>(reader: R) -> Result<Value> {
    Ok(serde_json::from_reader(reader)?)
}

/// Pull the points of `section` out of a parsed payload.
///
/// A bare array is taken as the requested section. A missing or `null`
/// section is an empty dataset.
///
/// # Errors
///
/// Returns [`Error::UnexpectedPayload`] for scalar payloads and
/// [`Error::Json`] when the points do not have the expected shape.
pub fn extract<T: DeserializeOwned>(payload: Value, section: Section) -> Result<Vec<T>> {
    let body = match payload {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => data,
            None => Value::Object(map),
        },
        other => other,
    };

    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => Ok(serde_json::from_value(body)?),
        Value::Object(mut map) => match map.remove(section.key()) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(points) => Ok(serde_json::from_value(points)?),
        },
        other => Err(Error::UnexpectedPayload {
            found: kind(&other),
        }),
    }
}

/// Read the average dataset from `source`.
///
/// # Errors
///
/// See [`Source::read_json`] and [`extract`].
pub fn read_average(source: &Source) -> Result<Vec<QuarterPoint>> {
    extract(source.read_json()?, Section::Average)
}

/// Read the group dataset from `source`.
///
/// # Errors
///
/// See [`Source::read_json`] and [`extract`].
pub fn read_groups(source: &Source) -> Result<Vec<GroupPoint>> {
    extract(source.read_json()?, Section::Groups)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
