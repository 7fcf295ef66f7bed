//! Model registry - map model names to factories.
//!
//! Adding a model means registering a factory under an identifier (plus any
//! aliases accepted on the command line or in configuration):
//!
//! ```rust,ignore
//! let mut registry = ModelRegistry::new();
//! registry
//!     .summarizers
//!     .register("DistilBART-xsum", || Ok(Arc::new(DistilBart::load()?) as Arc<dyn Summarizer>))
//!     .alias("distilbart-xsum", "DistilBART-xsum");
//!
//! let summarizer = registry.summarizers.create("distilbart-xsum")?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::error::{DigestError, Result};
use crate::traits::model::{Recognizer, Summarizer};

type Factory<T> = Arc<dyn Fn() -> Result<Arc<T>> + Send + Sync>;

/// Factories for one kind of model, by identifier.
pub struct Registry<T: ?Sized> {
    factories: HashMap<String, Factory<T>>,
    aliases: HashMap<String, String>,
    fallback: Option<String>,
}

impl<T: ?Sized> Default for Registry<T> {
    fn default() -> Self {
        Self {
            factories: HashMap::new(),
            aliases: HashMap::new(),
            fallback: None,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("models", &self.names())
            .field("aliases", &self.aliases)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl<T: ?Sized> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `id`, replacing any previous one.
    pub fn register<F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
        self
    }

    /// Accept `alias` (case-insensitive) as a name for `id`.
    pub fn alias(&mut self, alias: impl AsRef<str>, id: impl Into<String>) -> &mut Self {
        self.aliases
            .insert(alias.as_ref().to_lowercase(), id.into());
        self
    }

    /// Model used when a requested name is unknown.
    pub fn fallback(&mut self, id: impl Into<String>) -> &mut Self {
        self.fallback = Some(id.into());
        self
    }

    /// Registered identifiers, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a name to a registered identifier.
    ///
    /// Exact identifiers win over aliases, aliases over case-insensitive
    /// identifier matches, and those over the fallback.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some((id, _)) = self.factories.get_key_value(name) {
            return Some(id);
        }

        let lowered = name.to_lowercase();
        let registered = |id: &str| self.factories.get_key_value(id).map(|(k, _)| k.as_str());

        self.aliases
            .get(&lowered)
            .and_then(|id| registered(id))
            .or_else(|| {
                self.factories
                    .keys()
                    .find(|id| id.to_lowercase() == lowered)
                    .map(String::as_str)
            })
            .or_else(|| self.fallback.as_deref().and_then(registered))
    }

    /// Build the model registered under `name`.
    pub fn create(&self, name: &str) -> Result<Arc<T>> {
        let id = self.resolve(name).ok_or_else(|| DigestError::UnknownModel {
            name: name.to_string(),
        })?;
        let factory = &self.factories[id];

        let model = factory()?;
        info!("Model {} instantiated (requested as '{}')", id, name);
        Ok(model)
    }
}

/// Summarization and recognition model factories.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    pub summarizers: Registry<dyn Summarizer>,
    pub recognizers: Registry<dyn Recognizer>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a summarizer by name.
    pub fn summarizer(&self, name: &str) -> Result<Arc<dyn Summarizer>> {
        self.summarizers.create(name)
    }

    /// Build a recognizer by name.
    pub fn recognizer(&self, name: &str) -> Result<Arc<dyn Recognizer>> {
        self.recognizers.create(name)
    }
}
