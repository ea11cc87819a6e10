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

/// # Depression label
/// Binary label of a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepressionLabel {
    Negative,
    Positive,
}

impl DepressionLabel {
    /// Numeric class (0 or 1)
    pub fn value(self) -> u8 {
        match self {
            DepressionLabel::Negative => 0,
            DepressionLabel::Positive => 1,
        }
    }
}

impl From<DepressionLabel> for i64 {
    fn from(label: DepressionLabel) -> Self {
        label.value() as i64
    }
}

/// A sample is positive if any marker is a (case-sensitive) substring of the diagnosis field or of
/// the raw label string.
pub fn derive_label(diagnosis: &str, labels: &str, positive_markers: &[String]) -> DepressionLabel {
    let is_positive = positive_markers
        .iter()
        .any(|marker| diagnosis.contains(marker.as_str()) || labels.contains(marker.as_str()));
    if is_positive {
        DepressionLabel::Positive
    } else {
        DepressionLabel::Negative
    }
}
