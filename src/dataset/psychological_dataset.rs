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

use crate::config::{DatasetConfig, EmptyTurnPolicy, SpeakerRole};
use crate::dataset::base_dataset::{Dataset, MultiThreadedDataset};
use crate::dataset::label::{derive_label, DepressionLabel};
use crate::dataset::manifest::{load_transcripts, read_manifest, TranscriptRecord};
use crate::dataset::turns::{classify_speaker, transcript_turns};
use crate::error::DatasetError;
use crate::padding::{pad_sequence, SequenceLayout};
use crate::text::{sequence_length, strip_tags, TextTransform};
use ndarray::{ArrayD, IxDyn};
use std::path::Path;

/// # Transformed transcript sample
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSample<A> {
    /// Accepted turns, shape `[n_turns, max_word_len, *trailing_dims]`
    pub turns: ArrayD<A>,
    /// Transformed title (not padded)
    pub title: ArrayD<A>,
    pub label: DepressionLabel,
}

/// # Raw transcript sample
/// Returned by datasets built without a text transform
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub transcript: String,
    pub title: String,
    pub label: DepressionLabel,
}

/// # Accepted turn
/// A patient or therapist turn that passed the length filter, with its transformed utterance
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedTurn<A> {
    pub speaker: String,
    pub role: SpeakerRole,
    pub sequence: ArrayD<A>,
}

/// Manifest records and configuration shared by the transformed and raw datasets
#[derive(Debug, Clone)]
struct TranscriptCorpus {
    records: Vec<TranscriptRecord>,
    config: DatasetConfig,
}

impl TranscriptCorpus {
    fn load(
        csv_file: &Path,
        root_dir: &Path,
        config: DatasetConfig,
    ) -> Result<TranscriptCorpus, DatasetError> {
        config.validate()?;
        let rows = read_manifest(csv_file, &config.schema)?;
        let records = load_transcripts(root_dir, rows)?;
        log::info!(
            "Loaded {} transcripts from {} (manifest {})",
            records.len(),
            root_dir.display(),
            csv_file.display()
        );
        Ok(TranscriptCorpus { records, config })
    }

    fn record(&self, index: usize) -> Result<&TranscriptRecord, DatasetError> {
        self.records.get(index).ok_or_else(|| {
            DatasetError::IndexOutOfRange(format!(
                "index {} for a dataset of length {}",
                index,
                self.records.len()
            ))
        })
    }

    fn label(&self, record: &TranscriptRecord) -> DepressionLabel {
        let diagnosis = record
            .metadata_field(self.config.schema.diagnosis_field)
            .unwrap_or("");
        derive_label(diagnosis, &record.row.label, &self.config.positive_markers)
    }
}

/// # Psychological transcript dataset
/// Loads a manifest and all its transcripts eagerly. Every `get` strips the transcript markup, keeps
/// the patient and therapist turns, transforms them with the text transform and pads them to
/// `max_word_len`. Nothing is cached: samples are recomputed on each access.
///
/// Reading samples from several threads (`MultiThreadedDataset`) requires the transform to be `Sync`.
pub struct PsychologicalDataset<T> {
    corpus: TranscriptCorpus,
    text_transforms: T,
}

impl<T: TextTransform> PsychologicalDataset<T> {
    /// Creates a dataset with the default configuration and the given maximum turn length.
    ///
    /// # Parameters
    /// - csv_file: path to the manifest
    /// - root_dir: directory containing the `<id>.txt` transcripts
    /// - max_word_len (`usize`): length every transformed turn is truncated or padded to
    /// - text_transforms (`T`): transform applied to every turn and to the title
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psych_transcripts::dataset::{Dataset, PsychologicalDataset};
    /// use psych_transcripts::text::WhitespaceTransform;
    ///
    /// let dataset =
    ///     PsychologicalDataset::new("path/to/manifest.csv", "path/to/transcripts", 25, WhitespaceTransform)
    ///         .unwrap();
    /// let sample = dataset.get(0).unwrap();
    /// ```
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        csv_file: P,
        root_dir: Q,
        max_word_len: usize,
        text_transforms: T,
    ) -> Result<PsychologicalDataset<T>, DatasetError> {
        PsychologicalDataset::from_config(
            csv_file,
            root_dir,
            DatasetConfig::with_max_word_len(max_word_len),
            text_transforms,
        )
    }

    pub fn from_config<P: AsRef<Path>, Q: AsRef<Path>>(
        csv_file: P,
        root_dir: Q,
        config: DatasetConfig,
        text_transforms: T,
    ) -> Result<PsychologicalDataset<T>, DatasetError> {
        let corpus = TranscriptCorpus::load(csv_file.as_ref(), root_dir.as_ref(), config)?;
        Ok(PsychologicalDataset {
            corpus,
            text_transforms,
        })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.corpus.config
    }

    pub fn records(&self) -> &[TranscriptRecord] {
        &self.corpus.records
    }

    pub fn record(&self, index: usize) -> Result<&TranscriptRecord, DatasetError> {
        self.corpus.record(index)
    }

    pub fn text_transforms(&self) -> &T {
        &self.text_transforms
    }

    /// Accepted turns of a sample, in transcript order
    pub fn transformed_turns(
        &self,
        index: usize,
    ) -> Result<Vec<TransformedTurn<T::Elem>>, DatasetError> {
        let record = self.corpus.record(index)?;
        Ok(self.extract_turns(&record.transcript))
    }

    /// Speaker labels of the accepted turns of a sample, in transcript order
    pub fn speakers(&self, index: usize) -> Result<Vec<String>, DatasetError> {
        Ok(self
            .transformed_turns(index)?
            .into_iter()
            .map(|turn| turn.speaker)
            .collect())
    }

    fn extract_turns(&self, transcript: &str) -> Vec<TransformedTurn<T::Elem>> {
        let config = &self.corpus.config;
        let text = strip_tags(transcript);
        transcript_turns(&text)
            .filter_map(|turn| {
                let sequence = self.text_transforms.transform(turn.utterance);
                if sequence_length(&sequence) < config.min_turn_len {
                    return None;
                }
                match classify_speaker(turn.speaker, &config.roles) {
                    Some(role) => Some(TransformedTurn {
                        speaker: turn.speaker.to_owned(),
                        role,
                        sequence,
                    }),
                    None => {
                        log::trace!("Dropping turn from unknown speaker {:?}", turn.speaker);
                        None
                    }
                }
            })
            .collect()
    }

    /// Sample at `index` together with the speaker labels of its turns. The transcript is parsed
    /// and transformed once for both.
    pub fn get_with_speakers(
        &self,
        index: usize,
    ) -> Result<(TranscriptSample<T::Elem>, Vec<String>), DatasetError> {
        let record = self.corpus.record(index)?;
        let (speakers, sequences): (Vec<String>, Vec<ArrayD<T::Elem>>) = self
            .extract_turns(&record.transcript)
            .into_iter()
            .map(|turn| (turn.speaker, turn.sequence))
            .unzip();
        let sample = self.build_sample(index, record, &sequences)?;
        Ok((sample, speakers))
    }

    fn build_sample(
        &self,
        index: usize,
        record: &TranscriptRecord,
        sequences: &[ArrayD<T::Elem>],
    ) -> Result<TranscriptSample<T::Elem>, DatasetError> {
        let title = self.text_transforms.transform(&record.row.title);
        let turns = self.pad_turns(index, record, sequences, &title)?;
        Ok(TranscriptSample {
            turns,
            title,
            label: self.corpus.label(record),
        })
    }

    fn pad_turns(
        &self,
        index: usize,
        record: &TranscriptRecord,
        sequences: &[ArrayD<T::Elem>],
        title: &ArrayD<T::Elem>,
    ) -> Result<ArrayD<T::Elem>, DatasetError> {
        let max_word_len = self.corpus.config.max_word_len;
        if sequences.is_empty() {
            return match self.corpus.config.empty_turn_policy {
                EmptyTurnPolicy::Fail => Err(DatasetError::EmptySequence(format!(
                    "sample {} (id {}) has no accepted turn",
                    index, record.row.id
                ))),
                EmptyTurnPolicy::Fill => {
                    log::warn!(
                        "Sample {} (id {}) has no accepted turn, returning a padding row",
                        index,
                        record.row.id
                    );
                    let mut dims = vec![1, max_word_len];
                    dims.extend_from_slice(title.shape().get(1..).unwrap_or(&[]));
                    Ok(ArrayD::from_elem(IxDyn(&dims), T::Elem::default()))
                }
            };
        }
        pad_sequence(
            sequences,
            SequenceLayout::BatchFirst,
            Some(max_word_len),
            T::Elem::default(),
        )
    }
}

impl<T: TextTransform> Dataset for PsychologicalDataset<T> {
    type Item = TranscriptSample<T::Elem>;

    fn len(&self) -> usize {
        self.corpus.records.len()
    }

    fn get(&self, index: usize) -> Result<TranscriptSample<T::Elem>, DatasetError> {
        let record = self.corpus.record(index)?;
        let sequences: Vec<ArrayD<T::Elem>> = self
            .extract_turns(&record.transcript)
            .into_iter()
            .map(|turn| turn.sequence)
            .collect();
        self.build_sample(index, record, &sequences)
    }
}

impl<T> MultiThreadedDataset for PsychologicalDataset<T>
where
    T: TextTransform + Sync,
    T::Elem: Send,
{
}

/// # Raw psychological transcript dataset
/// Same loading as `PsychologicalDataset`, without a text transform: samples hold the raw
/// transcript and title along with the label.
#[derive(Debug, Clone)]
pub struct RawPsychologicalDataset {
    corpus: TranscriptCorpus,
}

impl RawPsychologicalDataset {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(
        csv_file: P,
        root_dir: Q,
    ) -> Result<RawPsychologicalDataset, DatasetError> {
        RawPsychologicalDataset::from_config(csv_file, root_dir, DatasetConfig::default())
    }

    pub fn from_config<P: AsRef<Path>, Q: AsRef<Path>>(
        csv_file: P,
        root_dir: Q,
        config: DatasetConfig,
    ) -> Result<RawPsychologicalDataset, DatasetError> {
        let corpus = TranscriptCorpus::load(csv_file.as_ref(), root_dir.as_ref(), config)?;
        Ok(RawPsychologicalDataset { corpus })
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.corpus.config
    }

    pub fn records(&self) -> &[TranscriptRecord] {
        &self.corpus.records
    }

    pub fn record(&self, index: usize) -> Result<&TranscriptRecord, DatasetError> {
        self.corpus.record(index)
    }

    /// Attaches a text transform, turning this dataset into a `PsychologicalDataset`
    pub fn with_transform<T: TextTransform>(self, text_transforms: T) -> PsychologicalDataset<T> {
        PsychologicalDataset {
            corpus: self.corpus,
            text_transforms,
        }
    }
}

impl Dataset for RawPsychologicalDataset {
    type Item = RawSample;

    fn len(&self) -> usize {
        self.corpus.records.len()
    }

    fn get(&self, index: usize) -> Result<RawSample, DatasetError> {
        let record = self.corpus.record(index)?;
        Ok(RawSample {
            transcript: record.transcript.clone(),
            title: record.row.title.clone(),
            label: self.corpus.label(record),
        })
    }
}

impl MultiThreadedDataset for RawPsychologicalDataset {}
