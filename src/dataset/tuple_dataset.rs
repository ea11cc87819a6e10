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

use crate::dataset::base_dataset::{Dataset, MultiThreadedDataset};
use crate::error::DatasetError;
use std::iter::FromIterator;

/// # Tuple dataset
/// Wraps a list of `(sample, label)` pairs. Pairs are returned unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleDataset<S, L> {
    data: Vec<(S, L)>,
}

impl<S, L> TupleDataset<S, L> {
    pub fn new(data: Vec<(S, L)>) -> Self {
        TupleDataset { data }
    }
}

impl<S, L> FromIterator<(S, L)> for TupleDataset<S, L> {
    fn from_iter<I: IntoIterator<Item = (S, L)>>(iter: I) -> Self {
        TupleDataset::new(iter.into_iter().collect())
    }
}

impl<S: Clone, L: Clone> Dataset for TupleDataset<S, L> {
    type Item = (S, L);

    fn len(&self) -> usize {
        self.data.len()
    }

    fn get(&self, index: usize) -> Result<(S, L), DatasetError> {
        self.check_index(index)?;
        Ok(self.data[index].clone())
    }
}

impl<S, L> MultiThreadedDataset for TupleDataset<S, L>
where
    S: Clone + Send + Sync,
    L: Clone + Send + Sync,
{
}
