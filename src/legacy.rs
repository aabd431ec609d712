//! Migration of legacy projects into the unified registry.
//!
//! Projects created before the registry existed keep one split document per
//! shuffle in their training-set folder. The migration scans that folder,
//! rebuilds a record per document, and tags everything with the legacy
//! engine; the registry postdates the introduction of the newer one.

use std::io;

use indexmap::IndexMap;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::ProjectConfig;
use crate::constants::documents::{DOCUMENT_EXTENSION, DOCUMENT_PREFIX, SHUFFLE_TOKEN};
use crate::constants::engines::LEGACY_ENGINE;
use crate::documents;
use crate::errors::RegistryError;
use crate::registry::{ShuffleRecord, ShuffleRegistry};
use crate::split::Split;
use crate::types::SplitId;

/// Scan the training-set folder and build a registry over every legacy
/// shuffle document found there.
///
/// The scan is non-recursive and ordered by file name, so repeated runs over
/// unchanged input produce equal registries.
pub(crate) fn create(config: ProjectConfig) -> Result<ShuffleRegistry, RegistryError> {
    let folder = config.training_set_folder();
    if !folder.is_dir() {
        // Nothing to migrate: a fresh project starts from an empty registry.
        return ShuffleRegistry::from_records(config, Vec::new());
    }

    let mut records = Vec::new();
    let mut interned: IndexMap<Split, SplitId> = IndexMap::new();
    for entry in WalkDir::new(&folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        let Some(index) = parse_document_index(file_name) else {
            continue;
        };

        let parsed = documents::read_split_document(entry.path())?;
        let split = intern(&mut interned, parsed.split);
        debug!(
            document = %entry.path().display(),
            index,
            train_fraction = parsed.train_fraction,
            "discovered legacy shuffle document"
        );
        records.push(ShuffleRecord::new(
            config.shuffle_name(parsed.train_fraction, index),
            parsed.train_fraction,
            index,
            LEGACY_ENGINE,
            Some(split),
        ));
    }

    ShuffleRegistry::from_records(config, records)
}

// Records sharing split content share one Split value; the id numbering here
// is recomputed at the first save.
fn intern(interned: &mut IndexMap<Split, SplitId>, split: Split) -> Split {
    if let Some((existing, _)) = interned.get_key_value(&split) {
        return existing.clone();
    }
    let next_id = interned.len() + 1;
    interned.insert(split.clone(), next_id);
    split
}

/// Parse the shuffle index out of a legacy document file name, rejecting
/// files that do not match the `Documentation_data-*shuffle<index>` pattern.
fn parse_document_index(file_name: &str) -> Option<usize> {
    let stem = file_name
        .strip_suffix(DOCUMENT_EXTENSION)?
        .strip_suffix('.')?;
    let rest = stem.strip_prefix(DOCUMENT_PREFIX)?;
    let (head, index) = rest.rsplit_once(SHUFFLE_TOKEN)?;
    if head.is_empty() {
        return None;
    }
    index.parse().ok()
}
