// Copyright 2019 Guillaume Becquin
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Manifest reading
//! The manifest is a header-less CSV file with one row per sample. Columns are located through a
//! `ManifestSchema`, and every row references a transcript stored as `<root>/<id>.txt`.

use crate::config::ManifestSchema;
use crate::error::DatasetError;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// # Manifest row
/// Fields of a manifest row, as bound by the `ManifestSchema`
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRow {
    /// Sample identifier (transcript file stem)
    pub id: i64,
    pub title: String,
    /// Raw `"; "`-separated label string
    pub label: String,
    /// Metadata fields, in the order of `ManifestSchema::metadata_columns`
    pub metadata: Vec<String>,
}

/// # Transcript record
/// A manifest row together with its transcript text
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRecord {
    pub row: ManifestRow,
    pub transcript: String,
}

impl TranscriptRecord {
    /// Individual subject labels of the record
    pub fn labels(&self) -> Vec<&str> {
        self.row.label.split("; ").collect()
    }

    /// Metadata field at the given position of the schema metadata columns
    pub fn metadata_field(&self, position: usize) -> Option<&str> {
        self.row.metadata.get(position).map(String::as_str)
    }
}

/// Reads a manifest file and returns its rows.
///
///  # Arguments
/// - path (`&Path`): path to the manifest
/// - schema (`&ManifestSchema`): column layout
///
///  # Returns
/// - `Result<Vec<ManifestRow>, DatasetError>`. Fails if a row is missing a schema column or if its
/// identifier is not a number.
pub fn read_manifest(path: &Path, schema: &ManifestSchema) -> Result<Vec<ManifestRow>, DatasetError> {
    let f = File::open(path).map_err(|e| {
        DatasetError::FileNotFound(format!("{} manifest file not found: {}", path.display(), e))
    })?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b',')
        .flexible(true)
        .from_reader(f);

    let mut rows = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result?;
        let column = |position: usize| {
            record.get(position).ok_or_else(|| {
                DatasetError::MissingColumn(format!(
                    "row {} has {} columns, column {} is required",
                    row_index,
                    record.len(),
                    position
                ))
            })
        };
        let id = parse_sample_id(column(schema.id_column)?, row_index)?;
        let metadata = schema
            .metadata_columns
            .iter()
            .map(|position| column(*position).map(str::to_owned))
            .collect::<Result<Vec<String>, DatasetError>>()?;
        rows.push(ManifestRow {
            id,
            title: column(schema.title_column)?.to_owned(),
            label: column(schema.label_column)?.to_owned(),
            metadata,
        });
    }
    Ok(rows)
}

/// Identifiers are stored as floating point values (e.g. `7.0`) and truncated to an integer
pub fn parse_sample_id(value: &str, row_index: usize) -> Result<i64, DatasetError> {
    let parsed = value.trim().parse::<f64>().map_err(|e| {
        DatasetError::ManifestParsingError(format!(
            "row {}: invalid sample identifier {:?}: {}",
            row_index, value, e
        ))
    })?;
    if !parsed.is_finite() {
        return Err(DatasetError::ManifestParsingError(format!(
            "row {}: invalid sample identifier {:?}",
            row_index, value
        )));
    }
    Ok(parsed.trunc() as i64)
}

/// Location of the transcript of a sample
pub fn transcript_path(root_dir: &Path, id: i64) -> PathBuf {
    root_dir.join(format!("{}.txt", id))
}

/// Reads the transcript of every manifest row, in manifest order. The first missing or unreadable
/// transcript aborts the loading.
pub fn load_transcripts(
    root_dir: &Path,
    rows: Vec<ManifestRow>,
) -> Result<Vec<TranscriptRecord>, DatasetError> {
    rows.into_iter()
        .map(|row| {
            let path = transcript_path(root_dir, row.id);
            let transcript = fs::read_to_string(&path).map_err(|e| match e.kind() {
                ErrorKind::NotFound => DatasetError::FileNotFound(format!(
                    "{} transcript file not found: {}",
                    path.display(),
                    e
                )),
                _ => DatasetError::IOError(format!("{}: {}", path.display(), e)),
            })?;
            log::debug!("Read transcript {} ({} bytes)", path.display(), transcript.len());
            Ok(TranscriptRecord { row, transcript })
        })
        .collect()
}
