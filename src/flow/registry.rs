//! Script registry
//!
//! Keeps every flow the wizard can run, keyed by id. Built-in flows are
//! registered on construction; more can be loaded from a directory of TOML
//! script files.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info, warn};

use super::script::{builtin_scripts, Script};
use crate::utils::errors::{Result, SwottingError};

/// Registry of available conversation scripts
#[derive(Debug, Clone)]
pub struct ScriptRegistry {
    scripts: HashMap<String, Arc<Script>>,
}

impl ScriptRegistry {
    /// Create a registry holding the built-in scripts
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for script in builtin_scripts() {
            if let Err(e) = registry.register_script(script) {
                warn!(error = %e, "Skipping invalid built-in script");
            }
        }
        registry
    }

    /// Create a registry with no scripts
    pub fn empty() -> Self {
        Self {
            scripts: HashMap::new(),
        }
    }

    /// Register a script, replacing any script with the same id
    pub fn register_script(&mut self, script: Script) -> Result<()> {
        script.validate()?;
        if self.scripts.contains_key(&script.id) {
            info!(script_id = %script.id, "Replacing registered script");
        }
        debug!(script_id = %script.id, questions = script.len(), "Registered script");
        self.scripts.insert(script.id.clone(), Arc::new(script));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<Script>> {
        self.scripts.get(id).cloned()
    }

    /// Get a script by id, failing with `UnknownFlow`
    pub fn require(&self, id: &str) -> Result<Arc<Script>> {
        self.get(id)
            .ok_or_else(|| SwottingError::UnknownFlow(id.to_string()))
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.scripts.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Find the script a user command refers to, by id or alias
    pub fn resolve(&self, command: &str) -> Option<Arc<Script>> {
        let command = command.trim();
        if command.is_empty() {
            return None;
        }

        if let Some(script) = self.scripts.get(command) {
            return Some(script.clone());
        }

        let mut matches: Vec<&Arc<Script>> = self
            .scripts
            .values()
            .filter(|s| s.answers_to(command))
            .collect();
        // Deterministic pick if two files declare the same alias
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches.first().map(|s| (*s).clone())
    }

    /// Load every `*.toml` script in `dir`.
    ///
    /// Files that fail to parse or validate are logged and skipped. Returns the
    /// number of scripts registered.
    pub async fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut entries = fs::read_dir(dir).await?;
        let mut loaded = 0;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            match load_script_file(&path).await {
                Ok(script) => match self.register_script(script) {
                    Ok(()) => loaded += 1,
                    Err(e) => warn!(path = %path.display(), error = %e, "Rejected script file"),
                },
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to read script file"),
            }
        }

        info!(directory = %dir.display(), loaded = loaded, "Loaded script files");
        Ok(loaded)
    }
}

impl Default for ScriptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a single TOML script file
pub async fn load_script_file(path: &Path) -> Result<Script> {
    let content = fs::read_to_string(path).await?;
    let script: Script = toml::from_str(&content)?;
    Ok(script)
}
