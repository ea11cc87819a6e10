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

//! # Sequence padding
//! Stacks variable-length sequences into a single fixed-shape array.

use crate::error::DatasetError;
use ndarray::{ArrayD, Axis, IxDyn, Slice};

/// # Layout of a padded batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceLayout {
    /// Output shape `[n_sequences, padding_len, *trailing_dims]`
    BatchFirst,
    /// Output shape `[padding_len, n_sequences, *trailing_dims]`
    SequenceFirst,
}

impl SequenceLayout {
    fn batch_axis(self) -> Axis {
        match self {
            SequenceLayout::BatchFirst => Axis(0),
            SequenceLayout::SequenceFirst => Axis(1),
        }
    }
}

/// Pads (or truncates) a list of sequences to a common length and stacks them.
///
/// # Parameters
/// - sequences (`&[ArrayD<A>]`): sequences of shape `[length_i, *trailing_dims]`. The trailing
/// dimensions must be identical for all sequences.
/// - layout (`SequenceLayout`): batch-first or sequence-first output
/// - padding_len (`Option<usize>`): target length. Longer sequences keep their first `padding_len`
/// rows, shorter ones are completed with `padding_value`. Defaults to the longest sequence length.
/// - padding_value (`A`): value used to fill the padded positions
///
/// # Returns
/// - `ArrayD<A>` of shape `[n, padding_len, *trailing_dims]` or `[padding_len, n, *trailing_dims]`
///
/// # Errors
/// - `EmptySequence` if `sequences` is empty (the trailing dimensions cannot be inferred)
/// - `ShapeMismatch` if a sequence is a scalar or if trailing dimensions differ
///
/// # Example
///
/// ```
/// use ndarray::{array, ArrayD};
/// use psych_transcripts::padding::{pad_sequence, SequenceLayout};
///
/// let sequences: Vec<ArrayD<i64>> = vec![array![1, 2, 3].into_dyn(), array![4].into_dyn()];
/// let padded = pad_sequence(&sequences, SequenceLayout::BatchFirst, Some(2), 0).unwrap();
/// assert_eq!(padded, array![[1, 2], [4, 0]].into_dyn());
/// ```
pub fn pad_sequence<A: Clone>(
    sequences: &[ArrayD<A>],
    layout: SequenceLayout,
    padding_len: Option<usize>,
    padding_value: A,
) -> Result<ArrayD<A>, DatasetError> {
    let first = sequences.first().ok_or_else(|| {
        DatasetError::EmptySequence(
            "at least one sequence is required to infer the trailing dimensions".to_string(),
        )
    })?;
    if first.ndim() == 0 {
        return Err(DatasetError::ShapeMismatch(
            "sequence 0 is a scalar, expected at least one dimension".to_string(),
        ));
    }
    let trailing_dims = &first.shape()[1..];
    for (idx, sequence) in sequences.iter().enumerate().skip(1) {
        if sequence.ndim() == 0 || &sequence.shape()[1..] != trailing_dims {
            return Err(DatasetError::ShapeMismatch(format!(
                "sequence {} has shape {:?}, expected trailing dimensions {:?}",
                idx,
                sequence.shape(),
                trailing_dims
            )));
        }
    }

    let max_len = match padding_len {
        Some(value) => value,
        None => sequences
            .iter()
            .map(|sequence| sequence.len_of(Axis(0)))
            .max()
            .unwrap_or(0),
    };
    let mut out_dims = match layout {
        SequenceLayout::BatchFirst => vec![sequences.len(), max_len],
        SequenceLayout::SequenceFirst => vec![max_len, sequences.len()],
    };
    out_dims.extend_from_slice(trailing_dims);

    let mut output = ArrayD::from_elem(IxDyn(&out_dims), padding_value);
    for (idx, sequence) in sequences.iter().enumerate() {
        let length = sequence.len_of(Axis(0)).min(max_len);
        let source = sequence.slice_axis(Axis(0), Slice::from(..length));
        let mut target = output.index_axis_mut(layout.batch_axis(), idx);
        target
            .slice_axis_mut(Axis(0), Slice::from(..length))
            .assign(&source);
    }
    Ok(output)
}

//==============================
// Unit tests
//==============================
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};

    fn generate_test_sequences() -> Vec<ArrayD<i64>> {
        vec![
            array![[1, 1], [2, 2], [3, 3], [4, 4]].into_dyn(),
            array![[5, 5]].into_dyn(),
            array![[6, 6], [7, 7]].into_dyn(),
        ]
    }

    #[test]
    fn test_pad_batch_first() {
        //        Given
        let sequences = generate_test_sequences();

        //        When
        let padded = pad_sequence(&sequences, SequenceLayout::BatchFirst, Some(3), 0).unwrap();

        //        Then
        let expected: Array3<i64> = array![
            [[1, 1], [2, 2], [3, 3]],
            [[5, 5], [0, 0], [0, 0]],
            [[6, 6], [7, 7], [0, 0]],
        ];
        assert_eq!(padded.shape(), &[3, 3, 2]);
        assert_eq!(padded, expected.into_dyn());
    }

    #[test]
    fn test_pad_sequence_first() {
        //        Given
        let sequences = generate_test_sequences();

        //        When
        let padded = pad_sequence(&sequences, SequenceLayout::SequenceFirst, Some(3), -1).unwrap();

        //        Then
        assert_eq!(padded.shape(), &[3, 3, 2]);
        assert_eq!(padded.index_axis(Axis(1), 0), array![[1, 1], [2, 2], [3, 3]].into_dyn());
        assert_eq!(padded.index_axis(Axis(1), 1), array![[5, 5], [-1, -1], [-1, -1]].into_dyn());
        assert_eq!(padded.index_axis(Axis(1), 2), array![[6, 6], [7, 7], [-1, -1]].into_dyn());
    }

    #[test]
    fn test_output_dimensions() {
        //        Given
        let test_tuples = [(1usize, 1usize), (1, 7), (4, 1), (5, 12)];

        //        When & Then
        for (n_sequences, padding_len) in test_tuples.iter() {
            let sequences: Vec<ArrayD<f32>> = (0..*n_sequences)
                .map(|idx| Array2::<f32>::ones((idx + 1, 3)).into_dyn())
                .collect();
            let padded = pad_sequence(
                &sequences,
                SequenceLayout::BatchFirst,
                Some(*padding_len),
                0.0,
            )
            .unwrap();
            assert_eq!(padded.shape(), &[*n_sequences, *padding_len, 3]);
        }
    }

    #[test]
    fn test_truncation_keeps_leading_rows() {
        //        Given
        let sequences = vec![array![10, 11, 12, 13, 14].into_dyn()];

        //        When
        let padded = pad_sequence(&sequences, SequenceLayout::BatchFirst, Some(2), 0).unwrap();

        //        Then
        assert_eq!(padded, array![[10, 11]].into_dyn());
    }

    #[test]
    fn test_padding_keeps_input_rows() {
        //        Given
        let sequences = vec![array![10, 11].into_dyn()];

        //        When
        let padded = pad_sequence(&sequences, SequenceLayout::BatchFirst, Some(5), 9).unwrap();

        //        Then
        assert_eq!(padded, array![[10, 11, 9, 9, 9]].into_dyn());
    }

    #[test]
    fn test_default_padding_len_is_longest_sequence() {
        //        Given
        let sequences = generate_test_sequences();

        //        When
        let padded = pad_sequence(&sequences, SequenceLayout::BatchFirst, None, 0).unwrap();

        //        Then
        assert_eq!(padded.shape(), &[3, 4, 2]);
        assert_eq!(padded.index_axis(Axis(0), 0), sequences[0]);
    }

    #[test]
    fn test_empty_input_is_reported() {
        //        Given
        let sequences: Vec<ArrayD<i64>> = vec![];

        //        When & Then
        assert!(matches!(
            pad_sequence(&sequences, SequenceLayout::BatchFirst, Some(3), 0),
            Err(DatasetError::EmptySequence(_))
        ));
    }

    #[test]
    fn test_trailing_dimension_mismatch() {
        //        Given
        let sequences = vec![
            Array2::<i64>::zeros((2, 3)).into_dyn(),
            Array2::<i64>::zeros((2, 4)).into_dyn(),
        ];

        //        When & Then
        assert!(matches!(
            pad_sequence(&sequences, SequenceLayout::BatchFirst, Some(3), 0),
            Err(DatasetError::ShapeMismatch(_))
        ));
    }
}
