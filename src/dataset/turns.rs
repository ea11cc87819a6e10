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

use crate::config::{RoleVocabulary, SpeakerRole};
use regex::Regex;

lazy_static! {
    /// Numbered speaker labels such as `CL1` or `CL 1`
    static ref NUMBERED_SPEAKER: Regex = Regex::new(r"^([A-Za-z]+) ?[0-9]+").unwrap();
}

/// # Conversational turn
/// A `speaker:utterance` line of a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn<'a> {
    pub speaker: &'a str,
    pub utterance: &'a str,
}

/// Splits a transcript line on its first colon. Returns `None` if the line has no colon or if
/// either the speaker or the utterance is empty.
pub fn split_turn(line: &str) -> Option<Turn<'_>> {
    let (speaker, utterance) = line.split_once(':')?;
    if speaker.is_empty() || utterance.is_empty() {
        None
    } else {
        Some(Turn { speaker, utterance })
    }
}

/// Non-empty lines of a (tag-stripped) transcript that parse as turns, in order
pub fn transcript_turns<'a>(text: &'a str) -> impl Iterator<Item = Turn<'a>> {
    text.split('\n')
        .filter(|line| !line.is_empty())
        .filter_map(split_turn)
}

/// Role of a speaker label. Labels are matched exactly against the vocabulary first, then with
/// their numeric suffix removed (`CL1` and `CL 1` both resolve as `CL`).
pub fn classify_speaker(speaker: &str, roles: &RoleVocabulary) -> Option<SpeakerRole> {
    roles.role_of(speaker).or_else(|| {
        NUMBERED_SPEAKER
            .captures(speaker)
            .and_then(|captures| captures.get(1))
            .and_then(|prefix| roles.role_of(prefix.as_str()))
    })
}
