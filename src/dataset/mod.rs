//! # Datasets
//! Indexed access to psychological transcripts and to generic `(sample, label)` pairs.

mod base_dataset;
mod label;
mod manifest;
mod psychological_dataset;
mod tuple_dataset;
mod turns;

pub use base_dataset::{Dataset, MultiThreadedDataset};
pub use label::{derive_label, DepressionLabel};
pub use manifest::{
    load_transcripts, parse_sample_id, read_manifest, transcript_path, ManifestRow,
    TranscriptRecord,
};
pub use psychological_dataset::{
    PsychologicalDataset, RawPsychologicalDataset, RawSample, TranscriptSample, TransformedTurn,
};
pub use tuple_dataset::TupleDataset;
pub use turns::{classify_speaker, split_turn, transcript_turns, Turn};
