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

use crate::error::DatasetError;
use ndarray::{Array1, ArrayD};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// # Text transform
/// Maps a piece of text to a numeric sequence (e.g. a tokenizer followed by an embedding lookup).
/// The leading axis of the output is the sequence length, all trailing dimensions must be identical
/// for every output of a given transform.
///
/// Datasets call the transform from `get`; a transform used from several threads at once
/// (see `MultiThreadedDataset`) must be `Sync`.
///
/// Any closure `Fn(&str) -> ArrayD<A>` is a `TextTransform`.
pub trait TextTransform {
    /// Element type of the output arrays, its default value is used for padding
    type Elem: Clone + Default;

    /// Transforms a text into a sequence of shape `[length, *trailing_dims]`
    fn transform(&self, text: &str) -> ArrayD<Self::Elem>;
}

impl<F, A> TextTransform for F
where
    F: Fn(&str) -> ArrayD<A>,
    A: Clone + Default,
{
    type Elem = A;

    fn transform(&self, text: &str) -> ArrayD<A> {
        self(text)
    }
}

/// Length of a transformed sequence (size of its leading axis, 0 for a scalar)
pub fn sequence_length<A>(sequence: &ArrayD<A>) -> usize {
    sequence.shape().first().copied().unwrap_or(0)
}

/// # Whitespace transform
/// Splits the text on whitespace and returns, for each word, its number of characters.
/// Output shape is `[n_words]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTransform;

impl TextTransform for WhitespaceTransform {
    type Elem = i64;

    fn transform(&self, text: &str) -> ArrayD<i64> {
        let lengths: Vec<i64> = text
            .split_whitespace()
            .map(|word| word.chars().count() as i64)
            .collect();
        Array1::from(lengths).into_dyn()
    }
}

/// # Vocabulary transform
/// Splits the text on whitespace and punctuation and converts each token to its index in a flat
/// vocabulary (one token per line, the line number being the index). Tokens missing from the
/// vocabulary are mapped to `[UNK]`. Output shape is `[n_tokens]`.
#[derive(Debug, Clone)]
pub struct VocabTransform {
    /// A mapping of tokens as string to indices
    pub values: HashMap<String, i64>,
    /// Index of the unknown token
    pub unknown_index: i64,
    /// Lower case the text before the lookup
    pub lower_case: bool,
}

impl VocabTransform {
    pub fn unknown_value() -> &'static str {
        "[UNK]"
    }

    /// Read a vocabulary file (single column, one token per line)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psych_transcripts::text::VocabTransform;
    ///
    /// let transform = VocabTransform::from_file("path/to/vocab.txt", true).unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P, lower_case: bool) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DatasetError::FileNotFound(format!(
                "{} vocabulary file not found :{}",
                path.display(),
                e
            ))
        })?;
        let br = BufReader::new(f);
        let mut values = HashMap::new();

        for (index, line) in br.lines().enumerate() {
            let line = match line {
                Ok(value) => value,
                Err(e) => {
                    return Err(DatasetError::VocabularyParsingError(e.to_string()));
                }
            };
            values.insert(line.trim().to_owned(), index as i64);
        }
        log::debug!("Read {} vocabulary entries from {}", values.len(), path.display());
        VocabTransform::from_values(values, lower_case)
    }

    pub fn from_values(
        values: HashMap<String, i64>,
        lower_case: bool,
    ) -> Result<Self, DatasetError> {
        let unknown_index = match values.get(VocabTransform::unknown_value()) {
            Some(index) => *index,
            None => {
                return Err(DatasetError::VocabularyParsingError(format!(
                    "The unknown value {} could not be found in the vocabulary",
                    VocabTransform::unknown_value()
                )));
            }
        };
        Ok(VocabTransform {
            values,
            unknown_index,
            lower_case,
        })
    }

    /// Splits a text on whitespace, punctuation characters being returned as separate tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lower_case {
            text.to_lowercase()
        } else {
            text.to_owned()
        };
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            let mut current = String::new();
            for character in word.chars() {
                if is_punctuation(&character) {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    tokens.push(character.to_string());
                } else {
                    current.push(character);
                }
            }
            if !current.is_empty() {
                tokens.push(current);
            }
        }
        tokens
    }

    pub fn token_to_id(&self, token: &str) -> i64 {
        *self.values.get(token).unwrap_or(&self.unknown_index)
    }
}

impl TextTransform for VocabTransform {
    type Elem = i64;

    fn transform(&self, text: &str) -> ArrayD<i64> {
        let ids: Vec<i64> = self
            .tokenize(text)
            .iter()
            .map(|token| self.token_to_id(token))
            .collect();
        Array1::from(ids).into_dyn()
    }
}

fn is_punctuation(character: &char) -> bool {
    let u32_char = *character as u32;
    (33..=47).contains(&u32_char)
        | (58..=64).contains(&u32_char)
        | (91..=96).contains(&u32_char)
        | (123..=126).contains(&u32_char)
        | (!character.is_ascii()
            && !character.is_alphanumeric()
            && !character.is_whitespace()
            && !character.is_control())
}

//==============================
// Unit tests
//==============================
#[cfg(test)]
mod tests {
    extern crate anyhow;

    use super::*;
    use ndarray::{Array2, IxDyn};
    use std::io::Write;

    fn generate_test_vocab() -> HashMap<String, i64> {
        [
            ("hello".to_owned(), 0),
            ("world".to_owned(), 1),
            ("[UNK]".to_owned(), 2),
            ("!".to_owned(), 3),
            (",".to_owned(), 4),
        ]
        .iter()
        .cloned()
        .collect()
    }

    #[test]
    fn test_whitespace_transform() {
        //        Given
        let transform = WhitespaceTransform;

        //        When
        let output = transform.transform("  I am  okay today\n");

        //        Then
        assert_eq!(output.shape(), &[4]);
        assert_eq!(output.iter().cloned().collect::<Vec<i64>>(), vec![1, 2, 4, 5]);
        assert_eq!(sequence_length(&transform.transform("")), 0);
    }

    #[test]
    fn test_closure_transform() {
        //        Given
        let transform = |text: &str| -> ArrayD<f32> {
            Array2::<f32>::ones((text.split_whitespace().count(), 3)).into_dyn()
        };

        //        When
        let output = transform.transform("three word text");

        //        Then
        assert_eq!(output.shape(), &[3, 3]);
        assert_eq!(sequence_length(&output), 3);
    }

    #[test]
    fn test_sequence_length_of_scalar() {
        let scalar = ArrayD::<i64>::zeros(IxDyn(&[]));
        assert_eq!(sequence_length(&scalar), 0);
    }

    #[test]
    fn test_vocab_transform() -> anyhow::Result<()> {
        //        Given
        let transform = VocabTransform::from_values(generate_test_vocab(), true)?;

        //        When
        let tokens = transform.tokenize("Hello, World! Unknown…");
        let output = transform.transform("Hello, World! Unknown…");

        //        Then
        assert_eq!(tokens, vec!["hello", ",", "world", "!", "unknown", "…"]);
        assert_eq!(output.iter().cloned().collect::<Vec<i64>>(), vec![0, 4, 1, 3, 2, 2]);
        Ok(())
    }

    #[test]
    fn test_vocab_transform_cased() -> anyhow::Result<()> {
        //        Given
        let transform = VocabTransform::from_values(generate_test_vocab(), false)?;

        //        When & Then
        assert_eq!(
            transform
                .transform("Hello hello")
                .iter()
                .cloned()
                .collect::<Vec<i64>>(),
            vec![2, 0]
        );
        Ok(())
    }

    #[test]
    fn test_vocab_transform_from_file() -> anyhow::Result<()> {
        //        Given
        let mut vocab_file = tempfile::NamedTempFile::new()?;
        write!(vocab_file, "hello \n world \n [UNK] \n !")?;
        let path = vocab_file.into_temp_path();

        //        When
        let transform = VocabTransform::from_file(&path, false)?;

        //        Then
        assert_eq!(transform.unknown_index, 2);
        assert_eq!(transform.token_to_id("world"), 1);
        assert_eq!(transform.token_to_id("oov_value"), 2);
        drop(path);
        Ok(())
    }

    #[test]
    fn test_vocab_without_unknown_token() -> anyhow::Result<()> {
        //        Given
        let mut vocab_file = tempfile::NamedTempFile::new()?;
        write!(vocab_file, "hello \n world \n !")?;
        let path = vocab_file.into_temp_path();

        //        When & Then
        assert!(matches!(
            VocabTransform::from_file(&path, false),
            Err(DatasetError::VocabularyParsingError(_))
        ));
        Ok(())
    }
}
