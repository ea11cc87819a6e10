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

//! # Dataset configuration
//! All settings are optional when read from JSON and default to the layout of the
//! psychological transcript manifest.

use crate::error::DatasetError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// # Utility to deserialize JSON config files
pub trait Config
where
    for<'de> Self: Deserialize<'de>,
{
    /// Loads a `Config` object from a JSON file.
    /// The parsing will fail if the file contains keys with an unexpected type.
    ///
    /// # Arguments
    ///
    /// * `path` - `Path` to the configuration JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psych_transcripts::config::{Config, DatasetConfig};
    ///
    /// let config = DatasetConfig::from_file("path/to/config.json").unwrap();
    /// ```
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DatasetError::FileNotFound(format!(
                "{} configuration file not found: {}",
                path.display(),
                e
            ))
        })?;
        let br = BufReader::new(f);
        let config: Self = serde_json::from_reader(br)?;
        Ok(config)
    }
}

/// # Manifest column layout
/// Binds the positional manifest columns to named fields. The default matches the
/// manifest shipped with the transcript corpus and must not be changed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSchema {
    /// Column holding the numeric sample identifier (also the transcript file stem)
    pub id_column: usize,
    /// Column holding the document title
    pub title_column: usize,
    /// Column holding the `"; "`-separated subject labels
    pub label_column: usize,
    /// Columns gathered (in order) into the sample metadata
    pub metadata_columns: Vec<usize>,
    /// Position within `metadata_columns` of the clinical diagnosis field
    pub diagnosis_field: usize,
}

impl Default for ManifestSchema {
    fn default() -> Self {
        ManifestSchema {
            id_column: 1,
            title_column: 5,
            label_column: 21,
            metadata_columns: vec![1, 11, 12, 13, 14, 15, 16, 20, 22],
            diagnosis_field: 7,
        }
    }
}

impl ManifestSchema {
    /// Minimum number of columns a manifest row needs to satisfy this schema
    pub fn min_columns(&self) -> usize {
        self.metadata_columns
            .iter()
            .chain([self.id_column, self.title_column, self.label_column].iter())
            .max()
            .map_or(0, |max_column| max_column + 1)
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.diagnosis_field >= self.metadata_columns.len() {
            return Err(DatasetError::ConfigurationError(format!(
                "diagnosis field {} is outside of the {} metadata columns",
                self.diagnosis_field,
                self.metadata_columns.len()
            )));
        }
        Ok(())
    }
}

/// # Speaker role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeakerRole {
    Patient,
    Therapist,
}

/// # Speaker role vocabulary
/// Speaker labels identifying patient and therapist turns. Matching is exact and
/// case-sensitive, the corpus spelling variants (e.g. `PATiENT`) are listed explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleVocabulary {
    pub patient: Vec<String>,
    pub therapist: Vec<String>,
}

impl Default for RoleVocabulary {
    fn default() -> Self {
        let to_owned = |labels: &[&str]| labels.iter().map(|v| v.to_string()).collect();
        RoleVocabulary {
            patient: to_owned(&[
                "CLIENT",
                "PT",
                "PATIENT",
                "CL",
                "Client",
                "PARTICIPANT",
                "RESPONDENT",
                "PATiENT",
            ]),
            therapist: to_owned(&[
                "ANALYST",
                "THERAPIST",
                "COUNSELOR",
                "DR",
                "Therapist",
                "INTERVIEWER",
            ]),
        }
    }
}

impl RoleVocabulary {
    /// Returns the role of a speaker label, `None` if the label is in neither vocabulary.
    /// Patient labels take precedence if a label is listed in both.
    pub fn role_of(&self, label: &str) -> Option<SpeakerRole> {
        if self.patient.iter().any(|v| v == label) {
            Some(SpeakerRole::Patient)
        } else if self.therapist.iter().any(|v| v == label) {
            Some(SpeakerRole::Therapist)
        } else {
            None
        }
    }
}

/// # Policy for samples without any accepted turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyTurnPolicy {
    /// Report an `EmptySequence` error for the sample
    Fail,
    /// Return a single row filled with the padding value
    Fill,
}

impl Default for EmptyTurnPolicy {
    fn default() -> Self {
        EmptyTurnPolicy::Fail
    }
}

/// # Dataset configuration (dataset.json)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Length every transformed turn is truncated or padded to
    pub max_word_len: usize,
    /// Minimum transformed utterance length for a turn to be kept
    pub min_turn_len: usize,
    pub schema: ManifestSchema,
    pub roles: RoleVocabulary,
    /// Substrings marking a sample as positive (case-sensitive)
    pub positive_markers: Vec<String>,
    pub empty_turn_policy: EmptyTurnPolicy,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            max_word_len: 25,
            min_turn_len: 5,
            schema: ManifestSchema::default(),
            roles: RoleVocabulary::default(),
            positive_markers: vec![
                "Depressive disorder".to_string(),
                "Depression (emotion)".to_string(),
                "Depression (eotion)".to_string(),
            ],
            empty_turn_policy: EmptyTurnPolicy::default(),
        }
    }
}

impl DatasetConfig {
    /// Default configuration with a custom maximum turn length
    pub fn with_max_word_len(max_word_len: usize) -> Self {
        DatasetConfig {
            max_word_len,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        if self.max_word_len == 0 {
            return Err(DatasetError::ConfigurationError(
                "max_word_len must be strictly positive".to_string(),
            ));
        }
        self.schema.validate()
    }
}

impl Config for DatasetConfig {}

//==============================
// Unit tests
//==============================
#[cfg(test)]
mod tests {
    extern crate anyhow;

    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_schema_layout() {
        //        Given
        let schema = ManifestSchema::default();

        //        When & Then
        assert_eq!(schema.id_column, 1);
        assert_eq!(schema.title_column, 5);
        assert_eq!(schema.label_column, 21);
        assert_eq!(schema.metadata_columns[schema.diagnosis_field], 20);
        assert_eq!(schema.min_columns(), 23);
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_invalid_diagnosis_field() {
        //        Given
        let schema = ManifestSchema {
            diagnosis_field: 9,
            ..Default::default()
        };

        //        When & Then
        assert!(matches!(
            schema.validate(),
            Err(DatasetError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_role_lookup() {
        //        Given
        let roles = RoleVocabulary::default();

        //        When & Then
        assert_eq!(roles.role_of("THERAPIST"), Some(SpeakerRole::Therapist));
        assert_eq!(roles.role_of("CL"), Some(SpeakerRole::Patient));
        assert_eq!(roles.role_of("PATiENT"), Some(SpeakerRole::Patient));
        assert_eq!(roles.role_of("therapist"), None);
        assert_eq!(roles.role_of("Narrator"), None);
    }

    #[test]
    fn test_partial_config_from_file() -> anyhow::Result<()> {
        //        Given
        let mut config_file = tempfile::NamedTempFile::new()?;
        write!(
            config_file,
            r#"{{"max_word_len": 10, "roles": {{"patient": ["SUBJECT"]}}, "empty_turn_policy": "fill"}}"#
        )?;
        let path = config_file.into_temp_path();

        //        When
        let config = DatasetConfig::from_file(&path)?;

        //        Then
        assert_eq!(config.max_word_len, 10);
        assert_eq!(config.min_turn_len, 5);
        assert_eq!(config.roles.patient, vec!["SUBJECT".to_string()]);
        assert_eq!(config.roles.therapist, RoleVocabulary::default().therapist);
        assert_eq!(config.schema, ManifestSchema::default());
        assert_eq!(config.empty_turn_policy, EmptyTurnPolicy::Fill);
        drop(path);
        Ok(())
    }

    #[test]
    fn test_missing_config_file() {
        //        Given
        let path = "this/path/does/not/exist.json";

        //        When & Then
        assert!(matches!(
            DatasetConfig::from_file(path),
            Err(DatasetError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_zero_max_word_len_is_rejected() {
        assert!(DatasetConfig::with_max_word_len(0).validate().is_err());
        assert!(DatasetConfig::with_max_word_len(1).validate().is_ok());
    }
}
