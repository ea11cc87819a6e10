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
use rayon::prelude::*;

/// # Base Dataset trait
/// Indexed access to samples, the contract expected by data loaders and batching utilities.
pub trait Dataset {
    /// Sample type returned by `get`
    type Item;

    /// Number of samples in the dataset
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the sample at the given index.
    ///
    /// # Parameters
    /// - index (`usize`): sample index, in `[0, len)`
    ///
    /// # Returns
    /// - `Result<Self::Item, DatasetError>`, `IndexOutOfRange` for an index outside the dataset
    fn get(&self, index: usize) -> Result<Self::Item, DatasetError>;

    /// Validates an index against the dataset length
    fn check_index(&self, index: usize) -> Result<(), DatasetError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(DatasetError::IndexOutOfRange(format!(
                "index {} for a dataset of length {}",
                index,
                self.len()
            )))
        }
    }

    /// Returns the samples at the given indices, in order, one at a time
    fn get_list(&self, indices: &[usize]) -> Result<Vec<Self::Item>, DatasetError> {
        indices.iter().map(|index| self.get(*index)).collect()
    }
}

/// # Multithreaded dataset access
/// Datasets that can be read from several threads at once. For transcript datasets this requires the
/// text transform to be `Sync`.
pub trait MultiThreadedDataset
where
    Self: Dataset + Sync,
    Self::Item: Send,
{
    /// Returns the samples at the given indices (with multithreading), in the requested order.
    /// Fails with the first error encountered.
    ///
    /// # Parameters
    /// - indices (`&[usize]`): sample indices
    ///
    /// # Returns
    /// - `Result<Vec<Self::Item>, DatasetError>` with one sample per index
    ///
    /// # Example
    ///
    /// ```no_run
    /// use psych_transcripts::dataset::{MultiThreadedDataset, PsychologicalDataset};
    /// use psych_transcripts::text::WhitespaceTransform;
    ///
    /// let dataset =
    ///     PsychologicalDataset::new("path/to/manifest.csv", "path/to/transcripts", 25, WhitespaceTransform)
    ///         .unwrap();
    /// let batch = dataset.get_batch(&[0, 1, 2, 3]).unwrap();
    /// ```
    fn get_batch(&self, indices: &[usize]) -> Result<Vec<Self::Item>, DatasetError> {
        indices.par_iter().map(|index| self.get(*index)).collect()
    }
}
