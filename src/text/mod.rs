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

//! # Text utilities
//! Markup removal and the text transforms turning utterances into numeric sequences.

mod constants;
mod markup;
mod transform;

pub use markup::{decode_character_references, strip_tags};
pub use transform::{sequence_length, TextTransform, VocabTransform, WhitespaceTransform};
