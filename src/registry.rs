use std::fs;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ProjectConfig;
use crate::constants::registry::{FILE_HEADER, REGISTRY_FILENAME};
use crate::documents;
use crate::engine::Engine;
use crate::errors::RegistryError;
use crate::legacy;
use crate::split::{Split, sorted_unique};
use crate::types::{DataIndex, ShuffleName, SplitId, TrainFraction};

/// One registered shuffle: a named binding of a training fraction, a shuffle
/// index, the engine that produced it, and (lazily) its data split.
///
/// `split` being `None` means the split has not been loaded from its document
/// yet, not that it does not exist.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleRecord {
    /// Name of the shuffle, unique within the project's registry.
    pub name: ShuffleName,
    /// Fraction of the dataset used for training.
    pub train_fraction: TrainFraction,
    /// Index of the shuffle within its training fraction.
    pub index: usize,
    /// Engine the shuffle was created with.
    pub engine: Engine,
    /// Train/test split, if already loaded from its document.
    pub split: Option<Split>,
}

impl ShuffleRecord {
    /// Build a record from its parts.
    pub fn new(
        name: ShuffleName,
        train_fraction: TrainFraction,
        index: usize,
        engine: Engine,
        split: Option<Split>,
    ) -> Self {
        Self {
            name,
            train_fraction,
            index,
            engine,
            split,
        }
    }

    /// Load this record's split from its document under the project's
    /// training-set folder, returning a new record with the split populated.
    ///
    /// Fails with [`RegistryError::SplitFileMissing`] when the document is
    /// absent; deleting a shuffle's files requires also removing it from the
    /// registry.
    pub fn load_split(&self, config: &ProjectConfig) -> Result<ShuffleRecord, RegistryError> {
        let split = documents::load_split(config, self.train_fraction, self.index)?;
        let mut record = self.clone();
        record.split = Some(split);
        Ok(record)
    }

    fn matches_key(&self, train_fraction: TrainFraction, index: usize) -> bool {
        self.train_fraction.total_cmp(&train_fraction).is_eq() && self.index == index
    }
}

/// Serialized form of one shuffle inside the registry document.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShuffleDoc {
    train_fraction: TrainFraction,
    index: usize,
    split: SplitId,
    engine: String,
}

/// Serialized form of the registry document.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryDoc {
    shuffles: IndexMap<ShuffleName, ShuffleDoc>,
}

/// File-backed registry of every shuffle created for one project.
///
/// The registry is a persistent value: mutating-looking operations return a
/// new registry, and every constructor re-establishes the invariant that
/// records are sorted by `(train_fraction, index)` with no duplicate keys.
#[derive(Clone, Debug)]
pub struct ShuffleRegistry {
    config: ProjectConfig,
    records: Vec<ShuffleRecord>,
}

impl ShuffleRegistry {
    /// Build a registry from loose records, sorting them and rejecting
    /// duplicate `(train_fraction, index)` keys.
    pub fn from_records(
        config: ProjectConfig,
        records: Vec<ShuffleRecord>,
    ) -> Result<Self, RegistryError> {
        Self::build(config, records)
    }

    fn build(config: ProjectConfig, mut records: Vec<ShuffleRecord>) -> Result<Self, RegistryError> {
        records.sort_by(|a, b| {
            a.train_fraction
                .total_cmp(&b.train_fraction)
                .then_with(|| a.index.cmp(&b.index))
        });
        for pair in records.windows(2) {
            if pair[1].matches_key(pair[0].train_fraction, pair[0].index) {
                return Err(RegistryError::DuplicateShuffle {
                    train_fraction: pair[0].train_fraction,
                    index: pair[0].index,
                });
            }
        }
        Ok(Self { config, records })
    }

    /// Project configuration this registry belongs to.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Registered shuffles, sorted by `(train_fraction, index)`.
    pub fn records(&self) -> &[ShuffleRecord] {
        &self.records
    }

    /// Add a shuffle, returning a new registry.
    ///
    /// Fails with [`RegistryError::DuplicateShuffle`] when a record with the
    /// same `(train_fraction, index)` exists and `overwrite` is false;
    /// with `overwrite` the existing record is replaced.
    pub fn add(
        &self,
        record: ShuffleRecord,
        overwrite: bool,
    ) -> Result<ShuffleRegistry, RegistryError> {
        if !(record.train_fraction > 0.0 && record.train_fraction <= 1.0) {
            return Err(RegistryError::Configuration(format!(
                "train fraction {} must lie in (0, 1]",
                record.train_fraction
            )));
        }

        let exists = self
            .records
            .iter()
            .any(|existing| existing.matches_key(record.train_fraction, record.index));
        if exists && !overwrite {
            return Err(RegistryError::DuplicateShuffle {
                train_fraction: record.train_fraction,
                index: record.index,
            });
        }

        let mut records: Vec<ShuffleRecord> = self
            .records
            .iter()
            .filter(|existing| !existing.matches_key(record.train_fraction, record.index))
            .cloned()
            .collect();
        records.push(record);
        Self::build(self.config.clone(), records)
    }

    /// Add a shuffle from raw index collections, returning a new registry.
    ///
    /// The indices may arrive unordered or with duplicates; they are
    /// normalized before the split is built.
    pub fn add_shuffle(
        &self,
        name: ShuffleName,
        train_fraction: TrainFraction,
        index: usize,
        engine: Engine,
        train_indices: Vec<DataIndex>,
        test_indices: Vec<DataIndex>,
        overwrite: bool,
    ) -> Result<ShuffleRegistry, RegistryError> {
        let split = Split::new(sorted_unique(train_indices), sorted_unique(test_indices))?;
        let record = ShuffleRecord::new(name, train_fraction, index, engine, Some(split));
        self.add(record, overwrite)
    }

    /// Look up the shuffle for a trainset slot and shuffle index.
    ///
    /// The slot index is resolved against the project's configured training
    /// fractions.
    pub fn get(
        &self,
        trainset_index: usize,
        shuffle_index: usize,
    ) -> Result<&ShuffleRecord, RegistryError> {
        let train_fraction = self.config.train_fraction(trainset_index)?;
        self.records
            .iter()
            .find(|record| record.matches_key(train_fraction, shuffle_index))
            .ok_or(RegistryError::ShuffleNotFound {
                train_fraction,
                index: shuffle_index,
            })
    }

    /// Write the registry document to disk.
    ///
    /// Records whose split is not loaded yet are loaded from their documents
    /// first. Split content is interned: structurally equal splits share one
    /// 1-based id, assigned in first-encounter order over the sorted records,
    /// and only the id is stored inline.
    ///
    /// The registry file is written without any locking; when two processes
    /// save concurrently, the later writer wins and the earlier write is
    /// silently lost.
    pub fn save(&self) -> Result<(), RegistryError> {
        let mut interned: IndexMap<Split, SplitId> = IndexMap::new();
        let mut shuffles: IndexMap<ShuffleName, ShuffleDoc> =
            IndexMap::with_capacity(self.records.len());
        for record in &self.records {
            let split = match &record.split {
                Some(split) => split.clone(),
                None => documents::load_split(&self.config, record.train_fraction, record.index)?,
            };
            let next_id = interned.len() + 1;
            let split_id = *interned.entry(split).or_insert(next_id);
            shuffles.insert(
                record.name.clone(),
                ShuffleDoc {
                    train_fraction: record.train_fraction,
                    index: record.index,
                    split: split_id,
                    engine: record.engine.canonical().to_string(),
                },
            );
        }

        let path = Self::path(&self.config);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut contents = FILE_HEADER.join("\n");
        contents.push('\n');
        contents.push_str(&serde_yaml::to_string(&RegistryDoc { shuffles })?);
        fs::write(path, contents)?;
        Ok(())
    }

    /// Load the registry document for a project.
    ///
    /// Records come back with `split: None` unless `load_splits` is set, and
    /// are sorted by `(train_fraction, index)` regardless of on-disk order.
    /// Unknown engine aliases fail with [`RegistryError::UnknownEngine`].
    pub fn load(config: ProjectConfig, load_splits: bool) -> Result<Self, RegistryError> {
        let raw = fs::read_to_string(Self::path(&config))?;
        let doc: RegistryDoc = serde_yaml::from_str(&raw)?;

        let mut records = Vec::with_capacity(doc.shuffles.len());
        for (name, shuffle) in doc.shuffles {
            let engine = Engine::from_alias(&shuffle.engine)?;
            let record =
                ShuffleRecord::new(name, shuffle.train_fraction, shuffle.index, engine, None);
            let record = if load_splits {
                record.load_split(&config)?
            } else {
                record
            };
            records.push(record);
        }
        Self::build(config, records)
    }

    /// Synthesize a registry for a project created before the unified
    /// registry existed, by scanning its legacy per-shuffle split documents.
    ///
    /// Every migrated shuffle is tagged with the legacy engine, and running
    /// the migration twice over unchanged input yields an equal registry.
    pub fn create(config: ProjectConfig) -> Result<Self, RegistryError> {
        legacy::create(config)
    }

    /// Location of the registry document for a project. Pure; no IO.
    pub fn path(config: &ProjectConfig) -> PathBuf {
        config.training_set_folder().join(REGISTRY_FILENAME)
    }
}

/// Register a new shuffle for a project and persist the updated registry.
///
/// Loads the registry with eager splits, synthesizes the shuffle name from
/// the project configuration, adds the shuffle, and saves.
pub fn register_shuffle(
    config: &ProjectConfig,
    train_fraction: TrainFraction,
    index: usize,
    engine: Engine,
    train_indices: Vec<DataIndex>,
    test_indices: Vec<DataIndex>,
    overwrite: bool,
) -> Result<ShuffleRegistry, RegistryError> {
    let registry = ShuffleRegistry::load(config.clone(), true)?;
    let registry = registry.add_shuffle(
        config.shuffle_name(train_fraction, index),
        train_fraction,
        index,
        engine,
        train_indices,
        test_indices,
        overwrite,
    )?;
    registry.save()?;
    Ok(registry)
}
