use crate::engine::Engine;

/// Constants used by the registry document layout and its on-disk location.
pub mod registry {
    /// Fixed provenance header written before the registry document.
    ///
    /// The trailing line doubles as the YAML document-start marker.
    pub const FILE_HEADER: [&str; 3] = [
        "# This file is automatically generated - DO NOT EDIT",
        "# It contains the information about the shuffles created for the dataset",
        "---",
    ];
    /// File name of the registry document inside the training-set folder.
    pub const REGISTRY_FILENAME: &str = "registry.yaml";
    /// Project-relative root for all training-set folders.
    pub const TRAINING_SETS_DIR: &str = "training-datasets";
    /// Directory-name prefix for one labeling iteration.
    pub const ITERATION_DIR_PREFIX: &str = "iteration-";
    /// Suffix appended to the task/date token to name the dataset folder.
    pub const DATASET_DIR_SUFFIX: &str = "-dataset";
}

/// Constants used by per-shuffle split documents.
pub mod documents {
    /// File-name prefix shared by every split document.
    pub const DOCUMENT_PREFIX: &str = "Documentation_data-";
    /// Token preceding the shuffle index in document and shuffle names.
    pub const SHUFFLE_TOKEN: &str = "shuffle";
    /// Token preceding the fraction percentage in document and shuffle names.
    pub const TRAINSET_TOKEN: &str = "trainset";
    /// Extension of split documents.
    pub const DOCUMENT_EXTENSION: &str = "json";
}

/// Constants used by engine tagging and model-folder probing.
pub mod engines {
    use super::Engine;

    /// Canonical iteration order over the closed engine enumeration.
    pub const ALL_ENGINES: [Engine; 2] = [Engine::Pytorch, Engine::Tensorflow];
    /// Engine assigned to every shuffle migrated from legacy documents.
    pub const LEGACY_ENGINE: Engine = Engine::Tensorflow;
}
