//! Reference module host
//!
//! `ModuleHost` plays the host loader's role for embedders that drive
//! reloads themselves (and for tests): it creates generations, attaches
//! reload channels, and on reload runs the old generation's disposal hooks
//! strictly before the next generation is created.
//!
//! The host tracks only the id and channel of each module's live
//! generation. It never holds a `Generation` handle, so a generation's
//! claimed-key table is freed as soon as the module code drops it.
//!
//! Load, reload and unload each run under the module table lock from the
//! liveness check until the successor is recorded. Of two concurrent
//! reloads of the same generation, exactly one succeeds. Disposal hooks
//! run while that lock is held and must not call back into the host.

use crate::channel::HostChannel;
use crate::config::{HostConfig, CONFIG_FILE_NAME};
use hotkeep_core::{Error, GenerationId, Result};
use hotkeep_engine::{Generation, HandoffData, ReloadChannel};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

struct ModuleRecord {
    generation: GenerationId,
    channel: Option<Arc<HostChannel>>,
    reloads: u64,
}

/// In-process host loader for reloadable modules
pub struct ModuleHost {
    config: HostConfig,
    modules: Mutex<FxHashMap<String, ModuleRecord>>,
}

impl ModuleHost {
    /// Create a host with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: HostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            modules: Mutex::new(FxHashMap::default()),
        })
    }

    /// Open a host configured by `hotkeep.toml` in `dir`
    ///
    /// Creates the directory and a default config file if they are missing.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(CONFIG_FILE_NAME);
        HostConfig::write_default_if_missing(&path)?;
        let config = HostConfig::from_file(&path)?;
        info!(target: "hotkeep::host", path = ?path, hot = config.hot, "Opened host");
        Self::new(config)
    }

    /// Host configuration
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Load `module` from scratch
    ///
    /// A module that is already loaded is unloaded first; its staged data is
    /// discarded rather than handed to the new generation.
    pub fn load(&self, module: &str) -> Generation {
        let mut modules = self.modules.lock();
        if let Some(record) = modules.remove(module) {
            discard(module, record);
        }
        let (generation, record) = self.spawn(module, None, 0);
        modules.insert(module.to_string(), record);
        drop(modules);

        info!(
            target: "hotkeep::host",
            module,
            generation = %generation.id(),
            hot = generation.is_hot(),
            "Loaded module"
        );
        generation
    }

    /// Replace the live generation of a module with a new one
    ///
    /// Runs every disposal hook of `generation` and hands the staged data to
    /// the returned successor.
    ///
    /// # Errors
    ///
    /// - `Error::StaleGeneration` if `generation` is not the module's live
    ///   generation
    /// - `Error::NotReloadable` if the host is cold or the module never
    ///   accepted reloads
    pub fn reload(&self, generation: &Generation) -> Result<Generation> {
        let module = generation.module();
        let mut modules = self.modules.lock();
        let record = modules
            .get(module)
            .filter(|record| record.generation == generation.id())
            .ok_or(Error::StaleGeneration(generation.id()))?;
        let channel = record
            .channel
            .clone()
            .ok_or_else(|| Error::NotReloadable(module.to_string()))?;
        if !channel.is_accepted() {
            return Err(Error::NotReloadable(module.to_string()));
        }
        let reloads = record.reloads + 1;

        let data = channel.dispose();
        debug!(
            target: "hotkeep::host",
            module,
            generation = %generation.id(),
            entries = data.len(),
            "Disposed generation"
        );

        let (next, record) = self.spawn(module, Some(data), reloads);
        modules.insert(module.to_string(), record);
        drop(modules);

        info!(
            target: "hotkeep::host",
            module,
            from = %generation.id(),
            to = %next.id(),
            reloads,
            "Reloaded module"
        );
        Ok(next)
    }

    /// Unload a module, running and discarding its disposal hooks
    ///
    /// # Errors
    ///
    /// `Error::StaleGeneration` if `generation` is not the live generation.
    pub fn unload(&self, generation: &Generation) -> Result<()> {
        let module = generation.module();
        let mut modules = self.modules.lock();
        let is_live = modules
            .get(module)
            .map_or(false, |record| record.generation == generation.id());
        if !is_live {
            return Err(Error::StaleGeneration(generation.id()));
        }
        if let Some(record) = modules.remove(module) {
            discard(module, record);
        }
        drop(modules);

        info!(target: "hotkeep::host", module, "Unloaded module");
        Ok(())
    }

    /// Id of the module's live generation
    pub fn live_generation(&self, module: &str) -> Option<GenerationId> {
        self.modules.lock().get(module).map(|record| record.generation)
    }

    /// Number of reloads since the module was last loaded
    pub fn reload_count(&self, module: &str) -> Option<u64> {
        self.modules.lock().get(module).map(|record| record.reloads)
    }

    /// Names of all loaded modules, sorted
    pub fn modules(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn spawn(
        &self,
        module: &str,
        previous: Option<HandoffData>,
        reloads: u64,
    ) -> (Generation, ModuleRecord) {
        let channel = self
            .config
            .hot
            .then(|| Arc::new(HostChannel::new(previous)));
        let generation = Generation::with_namespace(
            module,
            channel
                .clone()
                .map(|channel| channel as Arc<dyn ReloadChannel>),
            self.config.handoff_namespace.as_str(),
        );
        let record = ModuleRecord {
            generation: generation.id(),
            channel,
            reloads,
        };
        (generation, record)
    }
}

fn discard(module: &str, record: ModuleRecord) {
    if let Some(channel) = record.channel {
        let dropped = channel.dispose();
        debug!(
            target: "hotkeep::host",
            module,
            generation = %record.generation,
            entries = dropped.len(),
            "Discarded staged data"
        );
    }
}
