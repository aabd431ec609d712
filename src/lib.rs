#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Project configuration and the path/name conventions derived from it.
pub mod config;
/// Centralized constants for the registry layout, documents, and engines.
pub mod constants;
mod documents;
/// Closed training-engine enumeration with serialization aliases.
pub mod engine;
mod errors;
mod legacy;
/// Shuffle records and the file-backed registry.
pub mod registry;
/// Engine resolution with model-folder fallback probing.
pub mod resolver;
/// Immutable train/test splits and index normalization.
pub mod split;
/// Shared type aliases.
pub mod types;

pub use config::{ProjectConfig, fraction_percent};
pub use engine::Engine;
pub use errors::RegistryError;
pub use registry::{ShuffleRecord, ShuffleRegistry, register_shuffle};
pub use resolver::{find_engines_from_model_folders, resolve_engine};
pub use split::{Split, sorted_unique};
pub use types::{DataIndex, ModelPrefix, ShuffleName, SplitId, TrainFraction};
