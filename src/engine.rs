use std::fmt;

use crate::errors::RegistryError;

/// Training backend that produced (or consumes) a shuffle's model artifacts.
///
/// The enumeration is closed: registry documents may only name one of these
/// engines, and parsing an unrecognized alias fails rather than defaulting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Engine {
    /// The PyTorch backend.
    Pytorch,
    /// The TensorFlow backend (legacy engine for migrated projects).
    Tensorflow,
}

impl Engine {
    /// Accepted serialization aliases, canonical alias first.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Engine::Pytorch => &["pytorch", "torch"],
            Engine::Tensorflow => &["tensorflow", "tf"],
        }
    }

    /// Alias written to registry documents.
    pub const fn canonical(self) -> &'static str {
        self.aliases()[0]
    }

    /// Root directory name under which this engine stores model folders.
    pub const fn model_folder_name(self) -> &'static str {
        match self {
            Engine::Pytorch => "models-pytorch",
            Engine::Tensorflow => "models",
        }
    }

    /// Resolve an alias string to an engine, failing closed on unknown input.
    pub fn from_alias(alias: &str) -> Result<Self, RegistryError> {
        for engine in crate::constants::engines::ALL_ENGINES {
            if engine.aliases().contains(&alias) {
                return Ok(engine);
            }
        }
        Err(RegistryError::UnknownEngine(alias.to_string()))
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_resolves_to_its_engine() {
        for engine in crate::constants::engines::ALL_ENGINES {
            for alias in engine.aliases() {
                assert_eq!(Engine::from_alias(alias).unwrap(), engine);
            }
        }
    }

    #[test]
    fn unknown_alias_fails_closed() {
        let err = Engine::from_alias("jax").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownEngine(alias) if alias == "jax"));
    }

    #[test]
    fn canonical_alias_is_written_form() {
        assert_eq!(Engine::Pytorch.canonical(), "pytorch");
        assert_eq!(Engine::Tensorflow.canonical(), "tensorflow");
        assert_eq!(Engine::Pytorch.to_string(), "pytorch");
    }

    #[test]
    fn engines_use_distinct_model_folder_roots() {
        assert_ne!(
            Engine::Pytorch.model_folder_name(),
            Engine::Tensorflow.model_folder_name()
        );
    }
}
