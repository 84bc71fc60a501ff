//! Reload channel handed out by [`ModuleHost`](crate::ModuleHost)

use hotkeep_engine::{DisposeHook, HandoffData, ReloadChannel};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-process reload channel for one module generation
///
/// Holds the data staged by the previous generation and collects the
/// disposal hooks registered by the current one.
pub struct HostChannel {
    accepted: AtomicBool,
    previous: Option<HandoffData>,
    hooks: Mutex<Vec<DisposeHook>>,
}

impl HostChannel {
    pub(crate) fn new(previous: Option<HandoffData>) -> Self {
        Self {
            accepted: AtomicBool::new(false),
            previous,
            hooks: Mutex::new(Vec::new()),
        }
    }

    /// Whether the module accepted in-place reloads
    pub fn is_accepted(&self) -> bool {
        self.accepted.load(Ordering::SeqCst)
    }

    /// Number of disposal hooks waiting to run
    pub fn pending_hooks(&self) -> usize {
        self.hooks.lock().len()
    }

    /// Run every disposal hook, in registration order, into fresh handoff data
    ///
    /// Hooks are taken out of the channel before they run, so a second
    /// dispose yields empty data.
    pub(crate) fn dispose(&self) -> HandoffData {
        let hooks = std::mem::take(&mut *self.hooks.lock());
        let mut data = HandoffData::default();
        for hook in hooks {
            hook(&mut data);
        }
        data
    }
}

impl ReloadChannel for HostChannel {
    fn accept(&self) {
        self.accepted.store(true, Ordering::SeqCst);
    }

    fn previous_data(&self) -> Option<&HandoffData> {
        self.previous.as_ref()
    }

    fn on_dispose(&self, hook: DisposeHook) {
        self.hooks.lock().push(hook);
    }
}

impl fmt::Debug for HostChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostChannel")
            .field("accepted", &self.is_accepted())
            .field("has_previous", &self.previous.is_some())
            .field("pending_hooks", &self.pending_hooks())
            .finish()
    }
}
