//! Reload channel contract
//!
//! The capability surface a host loader attaches to a module generation
//! when reloading is available. A generation without a channel was loaded
//! ordinarily; every persistence call on it simply runs its factory.
//!
//! Ordering is the host's responsibility: all disposal hooks of a
//! generation must have run, and returned, before the next generation
//! reads [`ReloadChannel::previous_data`].

use hotkeep_core::Value;
use rustc_hash::FxHashMap;

/// Data handed from a disposed generation to its successor
pub type HandoffData = FxHashMap<String, Value>;

/// Callback run at disposal time; populates the outgoing handoff data
pub type DisposeHook = Box<dyn FnOnce(&mut HandoffData) + Send>;

/// Host-provided reload hooks for one module generation
pub trait ReloadChannel: Send + Sync {
    /// Declare that the module accepts in-place reloads
    fn accept(&self);

    /// Data staged by the previous generation, if this generation replaced one
    fn previous_data(&self) -> Option<&HandoffData>;

    /// Register a hook that stages data for the next generation
    fn on_dispose(&self, hook: DisposeHook);
}
