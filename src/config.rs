use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{documents, registry};
use crate::engine::Engine;
use crate::errors::RegistryError;
use crate::types::{ShuffleName, TrainFraction};

/// Project-scope configuration consumed by the registry.
///
/// Only the keys this crate reads are modeled; the project configuration file
/// may carry any number of additional keys, which are ignored on load.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Task label, the leading token of shuffle and dataset names.
    #[serde(rename = "Task")]
    pub task: String,
    /// Project creation date token (e.g. `Jun17`).
    pub date: String,
    /// Root directory of the project.
    pub project_path: PathBuf,
    /// Ordered training fractions, indexed by trainset slot.
    #[serde(rename = "TrainingFraction")]
    pub train_fractions: Vec<TrainFraction>,
    /// Labeling iteration the training sets belong to.
    #[serde(default)]
    pub iteration: usize,
}

impl ProjectConfig {
    /// Read a project configuration from its YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Resolve a trainset slot index to its configured training fraction.
    pub fn train_fraction(&self, trainset_index: usize) -> Result<TrainFraction, RegistryError> {
        self.train_fractions
            .get(trainset_index)
            .copied()
            .ok_or_else(|| {
                RegistryError::Configuration(format!(
                    "trainset index {trainset_index} is out of range: the project configures \
                     {} training fractions",
                    self.train_fractions.len()
                ))
            })
    }

    /// Task/date token prefixed to shuffle and dataset names.
    pub fn name_prefix(&self) -> String {
        format!("{}{}", self.task, self.date)
    }

    /// Canonical name for the shuffle at `(train_fraction, index)`.
    pub fn shuffle_name(&self, train_fraction: TrainFraction, index: usize) -> ShuffleName {
        format!(
            "{}-{}{}{}{}",
            self.name_prefix(),
            documents::TRAINSET_TOKEN,
            fraction_percent(train_fraction),
            documents::SHUFFLE_TOKEN,
            index
        )
    }

    /// Folder holding the training sets (and the registry) for the current
    /// iteration.
    pub fn training_set_folder(&self) -> PathBuf {
        self.project_path
            .join(registry::TRAINING_SETS_DIR)
            .join(format!(
                "{}{}",
                registry::ITERATION_DIR_PREFIX,
                self.iteration
            ))
            .join(format!(
                "{}{}",
                self.name_prefix(),
                registry::DATASET_DIR_SUFFIX
            ))
    }

    /// Location of the split document for `(train_fraction, index)`.
    pub fn split_document_path(&self, train_fraction: TrainFraction, index: usize) -> PathBuf {
        let file_name = format!(
            "{}{}.{}",
            documents::DOCUMENT_PREFIX,
            self.shuffle_name(train_fraction, index),
            documents::DOCUMENT_EXTENSION
        );
        self.training_set_folder().join(file_name)
    }

    /// Expected model folder for a shuffle trained by `engine` under
    /// `model_prefix`.
    pub fn model_folder(
        &self,
        train_fraction: TrainFraction,
        index: usize,
        engine: Engine,
        model_prefix: &str,
    ) -> PathBuf {
        let mut folder = self.project_path.clone();
        if !model_prefix.is_empty() {
            folder.push(model_prefix);
        }
        folder
            .join(engine.model_folder_name())
            .join(format!(
                "{}{}",
                registry::ITERATION_DIR_PREFIX,
                self.iteration
            ))
            .join(self.shuffle_name(train_fraction, index))
    }
}

/// Training fraction expressed as the integer percentage used in names.
///
/// Truncates rather than rounds; existing project folders were named this
/// way, so lookups must truncate too.
pub fn fraction_percent(train_fraction: TrainFraction) -> u32 {
    (100.0 * train_fraction) as u32
}
