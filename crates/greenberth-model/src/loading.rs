// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! JSON loading of planning inputs.
//!
//! The vessel feed is a JSON array of [`Vessel`] records with RFC 3339
//! timestamps. Planning requests and engine configuration are JSON objects
//! whose optional fields fall back to their documented defaults. Every loader
//! accepts a string, any `Read`, or a file path, and reports malformed
//! documents (including bad timestamps) as `InputError::Json`.

use crate::{
    config::{EngineConfig, PlanningRequest},
    err::InputError,
    vessel::Vessel,
};
use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

fn from_reader<D, R>(reader: R) -> Result<D, InputError>
where
    D: DeserializeOwned,
    R: Read,
{
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

fn from_path<D, P>(path: P) -> Result<D, InputError>
where
    D: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    from_reader(file)
}

/// Parses a vessel feed from a JSON string.
pub fn load_vessels_from_str(json: &str) -> Result<Vec<Vessel>, InputError> {
    Ok(serde_json::from_str(json)?)
}

/// Parses a vessel feed from a reader.
pub fn load_vessels_from_reader<R: Read>(reader: R) -> Result<Vec<Vessel>, InputError> {
    from_reader(reader)
}

/// Parses a vessel feed from a file.
pub fn load_vessels_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Vessel>, InputError> {
    let vessels: Vec<Vessel> = from_path(path.as_ref())?;
    tracing::debug!(
        "Loaded {} vessels from {}",
        vessels.len(),
        path.as_ref().display()
    );
    Ok(vessels)
}

impl PlanningRequest {
    pub fn from_json_str(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InputError> {
        from_reader(reader)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        from_path(path)
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InputError> {
        from_reader(reader)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        from_path(path)
    }
}
