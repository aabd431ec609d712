//! Per-shuffle split documents: the on-disk artifacts holding the train and
//! test indices a shuffle was generated with.

use std::fs;
use std::path::Path;

use serde_json::{Number, Value};

use crate::config::ProjectConfig;
use crate::errors::RegistryError;
use crate::split::{Split, sorted_unique};
use crate::types::{DataIndex, TrainFraction};

/// Wire layout of a split document: an opaque payload followed by the train
/// indices, the test indices, and the training fraction.
type SplitDocument = (Value, Vec<Number>, Vec<Number>, TrainFraction);

/// A split document with its indices normalized into a [`Split`].
#[derive(Debug)]
pub(crate) struct ParsedSplitDocument {
    pub(crate) split: Split,
    pub(crate) train_fraction: TrainFraction,
}

/// Load the split for `(train_fraction, index)` from its document under the
/// project's training-set folder.
pub(crate) fn load_split(
    config: &ProjectConfig,
    train_fraction: TrainFraction,
    index: usize,
) -> Result<Split, RegistryError> {
    let path = config.split_document_path(train_fraction, index);
    if !path.exists() {
        return Err(RegistryError::SplitFileMissing { path });
    }
    Ok(read_split_document(&path)?.split)
}

/// Parse a split document, normalizing the index collections (integer-cast,
/// sort, dedup) before building the [`Split`].
pub(crate) fn read_split_document(path: &Path) -> Result<ParsedSplitDocument, RegistryError> {
    let raw = fs::read_to_string(path)?;
    let (_payload, train, test, train_fraction): SplitDocument = serde_json::from_str(&raw)?;
    let split = Split::new(
        sorted_unique(cast_indices(&train)?),
        sorted_unique(cast_indices(&test)?),
    )?;
    Ok(ParsedSplitDocument {
        split,
        train_fraction,
    })
}

// Legacy tooling wrote index arrays with float-typed numbers; cast them back
// to non-negative integers.
fn cast_indices(numbers: &[Number]) -> Result<Vec<DataIndex>, RegistryError> {
    numbers
        .iter()
        .map(|number| {
            number
                .as_u64()
                .map(|value| value as DataIndex)
                .or_else(|| {
                    number
                        .as_f64()
                        .filter(|value| *value >= 0.0)
                        .map(|value| value as DataIndex)
                })
                .ok_or_else(|| {
                    RegistryError::Document(format!(
                        "split index {number} is not a non-negative integer"
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn config(root: &Path) -> ProjectConfig {
        ProjectConfig {
            task: "reaching".to_string(),
            date: "Jun17".to_string(),
            project_path: root.to_path_buf(),
            train_fractions: vec![0.6],
            iteration: 0,
        }
    }

    fn write_document(path: &PathBuf, document: &serde_json::Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(document).unwrap()).unwrap();
    }

    #[test]
    fn parses_and_normalizes_float_typed_indices() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let path = config.split_document_path(0.6, 0);
        write_document(
            &path,
            &json!([{"images": ["img0.png"]}, [3.0, 1, 2, 2.0], [0, 4.0], 0.6]),
        );

        let parsed = read_split_document(&path).unwrap();
        assert_eq!(parsed.split.train_indices(), &[1, 2, 3]);
        assert_eq!(parsed.split.test_indices(), &[0, 4]);
        assert_eq!(parsed.train_fraction, 0.6);
    }

    #[test]
    fn fractional_indices_are_cast_down() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let path = config.split_document_path(0.6, 1);
        write_document(&path, &json!([null, [2.7], [0], 0.6]));

        let parsed = read_split_document(&path).unwrap();
        assert_eq!(parsed.split.train_indices(), &[2]);
    }

    #[test]
    fn negative_indices_are_rejected() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        let path = config.split_document_path(0.6, 2);
        write_document(&path, &json!([null, [-1], [0], 0.6]));

        let err = read_split_document(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Document(msg) if msg.contains("-1")));
    }

    #[test]
    fn missing_document_carries_reconciliation_guidance() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());

        let err = load_split(&config, 0.6, 9).unwrap_err();
        let expected = config.split_document_path(0.6, 9);
        assert!(matches!(
            &err,
            RegistryError::SplitFileMissing { path } if *path == expected
        ));
        assert!(err.to_string().contains("remove it from the registry file"));
    }
}
