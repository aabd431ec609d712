use std::collections::BTreeSet;

use tracing::warn;

use crate::config::ProjectConfig;
use crate::constants::engines::ALL_ENGINES;
use crate::engine::Engine;
use crate::errors::RegistryError;
use crate::registry::ShuffleRegistry;

/// Resolve the engine responsible for a shuffle.
///
/// The registry is authoritative: with an empty `model_prefix` the stored
/// engine is returned directly. When the registry document does not exist
/// yet, it is first synthesized from legacy documents and persisted.
///
/// Shuffles duplicated under a non-empty `model_prefix` may have been trained
/// with an engine the registry does not know about, so the filesystem is
/// probed instead: the engine whose model folder exists wins. When several
/// folders exist, the registry's stored engine is preferred if it is among
/// them; otherwise the candidate with the lexicographically smallest
/// canonical alias is chosen. Either way a warning names the candidates and
/// the selection, since an explicit engine choice is the only unambiguous
/// fix.
pub fn resolve_engine(
    config: &ProjectConfig,
    trainset_index: usize,
    shuffle: usize,
    model_prefix: &str,
) -> Result<Engine, RegistryError> {
    if !ShuffleRegistry::path(config).exists() {
        ShuffleRegistry::create(config.clone())?.save()?;
    }

    let registry = ShuffleRegistry::load(config.clone(), false)?;
    let record = registry.get(trainset_index, shuffle)?;
    if model_prefix.is_empty() {
        return Ok(record.engine);
    }

    let engines = find_engines_from_model_folders(config, trainset_index, shuffle, model_prefix)?;
    if engines.is_empty() {
        return Err(RegistryError::NoEngineFound {
            trainset_index,
            shuffle,
            prefix: model_prefix.to_string(),
        });
    }

    let stored = record.engine;
    let selected = if engines.contains(&stored) {
        stored
    } else {
        engines
            .iter()
            .copied()
            .min_by_key(|engine| engine.canonical())
            .unwrap_or(stored)
    };
    if engines.len() > 1 {
        warn!(
            trainset_index,
            shuffle,
            model_prefix,
            candidates = ?engines,
            engine = %selected,
            "found multiple engines for this shuffle; to select another one, specify the engine \
             explicitly"
        );
    }
    Ok(selected)
}

/// Probe which engines have a model folder for the given shuffle.
///
/// Useful with a model prefix, where the engine of a duplicated shuffle may
/// differ from the base shuffle recorded in the registry. The result is
/// ordered, so probing is deterministic.
pub fn find_engines_from_model_folders(
    config: &ProjectConfig,
    trainset_index: usize,
    shuffle: usize,
    model_prefix: &str,
) -> Result<BTreeSet<Engine>, RegistryError> {
    let train_fraction = config.train_fraction(trainset_index)?;
    let mut engines = BTreeSet::new();
    for engine in ALL_ENGINES {
        if config
            .model_folder(train_fraction, shuffle, engine, model_prefix)
            .is_dir()
        {
            engines.insert(engine);
        }
    }
    Ok(engines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    use crate::registry::ShuffleRecord;
    use crate::split::Split;
    use crate::types::TrainFraction;

    fn config(root: &Path) -> ProjectConfig {
        ProjectConfig {
            task: "reaching".to_string(),
            date: "Jun17".to_string(),
            project_path: root.to_path_buf(),
            train_fractions: vec![0.6, 0.95],
            iteration: 0,
        }
    }

    fn write_split_document(
        config: &ProjectConfig,
        train_fraction: TrainFraction,
        index: usize,
    ) {
        let path = config.split_document_path(train_fraction, index);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let document = json!([null, [1, 2, 3], [0, 4], train_fraction]);
        fs::write(path, serde_json::to_string(&document).unwrap()).unwrap();
    }

    fn save_registry_with(config: &ProjectConfig, engine: Engine) {
        let record = ShuffleRecord::new(
            config.shuffle_name(0.6, 0),
            0.6,
            0,
            engine,
            Some(Split::new(vec![1, 2, 3], vec![0, 4]).unwrap()),
        );
        ShuffleRegistry::from_records(config.clone(), vec![record])
            .unwrap()
            .save()
            .unwrap();
    }

    fn create_model_folder(config: &ProjectConfig, engine: Engine, model_prefix: &str) {
        fs::create_dir_all(config.model_folder(0.6, 0, engine, model_prefix)).unwrap();
    }

    #[test]
    fn empty_prefix_returns_the_stored_engine() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        save_registry_with(&config, Engine::Pytorch);

        // No model folder exists; the registry alone decides.
        let engine = resolve_engine(&config, 0, 0, "").unwrap();
        assert_eq!(engine, Engine::Pytorch);
    }

    #[test]
    fn missing_registry_is_bootstrapped_from_legacy_documents() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        write_split_document(&config, 0.6, 0);
        assert!(!ShuffleRegistry::path(&config).exists());

        let engine = resolve_engine(&config, 0, 0, "").unwrap();
        assert_eq!(engine, Engine::Tensorflow);
        // The synthesized registry was persisted for subsequent calls.
        assert!(ShuffleRegistry::path(&config).exists());
    }

    #[test]
    fn prefix_probe_with_no_folders_reports_no_engine() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        save_registry_with(&config, Engine::Pytorch);

        let err = resolve_engine(&config, 0, 0, "augmentation-study").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::NoEngineFound {
                trainset_index: 0,
                shuffle: 0,
                prefix,
            } if prefix == "augmentation-study"
        ));
    }

    #[test]
    fn prefix_probe_with_one_folder_overrides_the_registry() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        save_registry_with(&config, Engine::Tensorflow);
        create_model_folder(&config, Engine::Pytorch, "augmentation-study");

        let engine = resolve_engine(&config, 0, 0, "augmentation-study").unwrap();
        assert_eq!(engine, Engine::Pytorch);
    }

    #[test]
    fn ambiguous_probe_prefers_the_stored_engine() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        save_registry_with(&config, Engine::Tensorflow);
        create_model_folder(&config, Engine::Pytorch, "augmentation-study");
        create_model_folder(&config, Engine::Tensorflow, "augmentation-study");

        let engine = resolve_engine(&config, 0, 0, "augmentation-study").unwrap();
        assert_eq!(engine, Engine::Tensorflow);
    }

    #[test]
    fn probe_only_sees_folders_under_the_requested_prefix() {
        let dir = tempdir().unwrap();
        let config = config(dir.path());
        save_registry_with(&config, Engine::Tensorflow);
        create_model_folder(&config, Engine::Tensorflow, "");
        create_model_folder(&config, Engine::Pytorch, "augmentation-study");

        let engines =
            find_engines_from_model_folders(&config, 0, 0, "augmentation-study").unwrap();
        assert_eq!(engines.len(), 1);
        assert!(engines.contains(&Engine::Pytorch));

        let base = find_engines_from_model_folders(&config, 0, 0, "").unwrap();
        assert_eq!(base.len(), 1);
        assert!(base.contains(&Engine::Tensorflow));
    }
}
