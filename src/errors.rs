use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ModelPrefix, TrainFraction};

/// Error type for registry invariants, document parsing, and IO failures.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A split was constructed from index sequences that are not strictly
    /// ascending.
    #[error("the train and test indices in a split must be sorted in strictly ascending order")]
    InvalidSplit,
    /// `add` was called without `overwrite` for an already-registered key.
    #[error(
        "a shuffle with train fraction {train_fraction} and index {index} is already registered; \
         pass overwrite to replace it"
    )]
    DuplicateShuffle {
        /// Training fraction of the rejected shuffle.
        train_fraction: TrainFraction,
        /// Shuffle index of the rejected shuffle.
        index: usize,
    },
    /// `get` found no shuffle for the requested key.
    #[error("could not find a shuffle with train fraction {train_fraction} and index {index}")]
    ShuffleNotFound {
        /// Training fraction that was searched for.
        train_fraction: TrainFraction,
        /// Shuffle index that was searched for.
        index: usize,
    },
    /// A shuffle's split document is absent from the training-set folder.
    #[error(
        "could not load the split document at {}: the file does not exist. If you deleted the \
         shuffle, you also need to remove it from the registry file or recreate the registry",
        .path.display()
    )]
    SplitFileMissing {
        /// Expected location of the split document.
        path: PathBuf,
    },
    /// An engine alias in a registry document is not part of the closed
    /// enumeration.
    #[error("unknown engine alias '{0}'")]
    UnknownEngine(String),
    /// The model-folder probe found no engine for the requested shuffle.
    #[error(
        "couldn't find any shuffles with trainset index {trainset_index}, shuffle {shuffle} and \
         model prefix '{prefix}'; please check that such a shuffle is defined"
    )]
    NoEngineFound {
        /// Trainset slot index that was probed.
        trainset_index: usize,
        /// Shuffle index that was probed.
        shuffle: usize,
        /// Model prefix namespace that was probed.
        prefix: ModelPrefix,
    },
    /// Invalid project configuration or out-of-range request.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A registry or split document failed structural validation.
    #[error("document error: {0}")]
    Document(String),
    /// The registry document could not be serialized or parsed.
    #[error("malformed registry document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A split document could not be parsed.
    #[error("malformed split document: {0}")]
    Json(#[from] serde_json::Error),
    /// Filesystem failure while reading or writing registry state.
    #[error(transparent)]
    Io(#[from] io::Error),
}
