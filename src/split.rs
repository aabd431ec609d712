use crate::errors::RegistryError;
use crate::types::DataIndex;

/// Train/test index assignment realized by one shuffle.
///
/// Both sequences must be strictly ascending; construction validates but
/// never reorders, so callers normalize raw collections with
/// [`sorted_unique`] first. Equality is structural, which makes two
/// independently built splits with the same content interchangeable for
/// interning.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Split {
    train_indices: Vec<DataIndex>,
    test_indices: Vec<DataIndex>,
}

impl Split {
    /// Build a split from already-normalized index sequences.
    pub fn new(
        train_indices: Vec<DataIndex>,
        test_indices: Vec<DataIndex>,
    ) -> Result<Self, RegistryError> {
        if !is_strictly_ascending(&train_indices) || !is_strictly_ascending(&test_indices) {
            return Err(RegistryError::InvalidSplit);
        }
        Ok(Self {
            train_indices,
            test_indices,
        })
    }

    /// Indices assigned to the training subset.
    pub fn train_indices(&self) -> &[DataIndex] {
        &self.train_indices
    }

    /// Indices assigned to the test subset.
    pub fn test_indices(&self) -> &[DataIndex] {
        &self.test_indices
    }
}

/// Normalize a raw index collection to the sorted-unique form [`Split::new`]
/// requires.
pub fn sorted_unique(mut indices: Vec<DataIndex>) -> Vec<DataIndex> {
    indices.sort_unstable();
    indices.dedup();
    indices
}

fn is_strictly_ascending(indices: &[DataIndex]) -> bool {
    indices.windows(2).all(|pair| pair[0] < pair[1])
}
