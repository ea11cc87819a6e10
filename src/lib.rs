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

//!# Psychological transcript datasets
//!
//! Loading and preprocessing of therapy session transcripts for depression classification.
//! A dataset reads a CSV manifest and one `<id>.txt` transcript per row, then on every access
//! extracts the patient and therapist turns, transforms them with a caller-provided
//! `TextTransform` and pads them into a single `ndarray` array.
//!
//! ```no_run
//! use psych_transcripts::dataset::{Dataset, PsychologicalDataset};
//! use psych_transcripts::text::VocabTransform;
//!
//! let vocab = VocabTransform::from_file("path/to/vocab.txt", true).unwrap();
//! let dataset = PsychologicalDataset::new("path/to/manifest.csv", "path/to/transcripts", 25, vocab)
//!     .unwrap();
//! for index in 0..dataset.len() {
//!     let sample = dataset.get(index).unwrap();
//!     println!("{:?} {:?}", sample.turns.shape(), sample.label);
//! }
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod padding;
pub mod text;

pub use crate::config::{Config, DatasetConfig};
pub use crate::dataset::{
    Dataset, MultiThreadedDataset, PsychologicalDataset, RawPsychologicalDataset, TupleDataset,
};
pub use crate::error::DatasetError;
pub use crate::padding::{pad_sequence, SequenceLayout};

#[macro_use]
extern crate lazy_static;
