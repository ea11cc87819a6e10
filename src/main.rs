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

use env_logger::{Builder, Env};
use itertools::Itertools;
use psych_transcripts::config::{Config, DatasetConfig};
use psych_transcripts::dataset::{Dataset, PsychologicalDataset, RawPsychologicalDataset};
use psych_transcripts::error::DatasetError;
use psych_transcripts::text::VocabTransform;
use std::env;
use std::process;

const USAGE: &str = "usage: psych_transcripts_bin <manifest.csv> <root_dir> [vocab.txt] [config.json]";

fn report_transformed<T>(dataset: &PsychologicalDataset<T>) -> Result<(), DatasetError>
where
    T: psych_transcripts::text::TextTransform,
{
    for index in 0..dataset.len() {
        let record = dataset.record(index)?;
        match dataset.get_with_speakers(index) {
            Ok((sample, speakers)) => println!(
                "{}\tturns {:?}\ttitle {:?}\tlabel {}\tspeakers [{}]",
                record.row.id,
                sample.turns.shape(),
                sample.title.shape(),
                sample.label.value(),
                speakers.iter().unique().join(", ")
            ),
            Err(error) => log::warn!("Skipping sample {} (id {}): {}", index, record.row.id, error),
        }
    }
    Ok(())
}

fn run(args: &[String]) -> Result<(), DatasetError> {
    let (manifest, root_dir) = match args {
        [manifest, root_dir, ..] => (manifest, root_dir),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };
    let config = match args.get(3) {
        Some(path) => DatasetConfig::from_file(path)?,
        None => DatasetConfig::default(),
    };

    let raw = RawPsychologicalDataset::from_config(manifest, root_dir, config)?;
    match args.get(2) {
        Some(vocab_path) => {
            let vocab = VocabTransform::from_file(vocab_path, true)?;
            report_transformed(&raw.with_transform(vocab))
        }
        None => {
            let positives = (0..raw.len())
                .map(|index| raw.get(index).map(|sample| sample.label.value() as usize))
                .fold_ok(0, |acc, value| acc + value)?;
            println!(
                "{} transcripts, {} positive, {} negative",
                raw.len(),
                positives,
                raw.len() - positives
            );
            Ok(())
        }
    }
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(error) = run(&args) {
        log::error!("{}", error);
        process::exit(1);
    }
}
