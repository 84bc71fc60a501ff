//! Module generation handle
//!
//! A `Generation` is the explicit context passed to every persistence call.
//! It is created by the host loader, one per load or reload of a module, and
//! owns the per-generation claimed-key table. Nothing in this crate keeps a
//! strong reference to a generation after a call returns: disposal hooks
//! capture values, never the generation, so the claimed-key table is freed
//! together with the last handle.

use crate::channel::ReloadChannel;
use crate::registry::ClaimTable;
use hotkeep_core::GenerationId;
use std::fmt;
use std::sync::{Arc, Weak};

/// Default handoff entry under which persisted slots are staged
pub const HANDOFF_NAMESPACE: &str = "__hotkeep__";

struct GenerationInner {
    id: GenerationId,
    module: String,
    namespace: String,
    channel: Option<Arc<dyn ReloadChannel>>,
    claims: ClaimTable,
}

/// One loaded instance of a reloadable module
#[derive(Clone)]
pub struct Generation {
    inner: Arc<GenerationInner>,
}

impl Generation {
    /// Create a generation staging under [`HANDOFF_NAMESPACE`]
    pub fn new(module: impl Into<String>, channel: Option<Arc<dyn ReloadChannel>>) -> Self {
        Self::with_namespace(module, channel, HANDOFF_NAMESPACE)
    }

    /// Create a generation staging under a custom handoff namespace
    pub fn with_namespace(
        module: impl Into<String>,
        channel: Option<Arc<dyn ReloadChannel>>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(GenerationInner {
                id: GenerationId::new(),
                module: module.into(),
                namespace: namespace.into(),
                channel,
                claims: ClaimTable::default(),
            }),
        }
    }

    /// Create a generation for an ordinary load (no reload channel)
    pub fn detached(module: impl Into<String>) -> Self {
        Self::new(module, None)
    }

    /// Unique id of this generation
    pub fn id(&self) -> GenerationId {
        self.inner.id
    }

    /// Name of the module this generation belongs to
    pub fn module(&self) -> &str {
        &self.inner.module
    }

    /// Handoff entry under which this generation stages its slots
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    /// Reload channel, when the host supports reloading
    pub fn channel(&self) -> Option<&Arc<dyn ReloadChannel>> {
        self.inner.channel.as_ref()
    }

    /// Whether this generation has a reload channel
    pub fn is_hot(&self) -> bool {
        self.inner.channel.is_some()
    }

    /// Accept in-place reloads for this module, if reloading is available
    pub fn mark_reloadable(&self) {
        if let Some(channel) = self.channel() {
            channel.accept();
        }
    }

    /// Keys claimed so far in this generation, sorted
    pub fn claimed_keys(&self) -> Vec<String> {
        self.inner.claims.keys()
    }

    pub(crate) fn claims(&self) -> &ClaimTable {
        &self.inner.claims
    }

    /// Non-owning handle to this generation
    pub fn downgrade(&self) -> WeakGeneration {
        WeakGeneration(Arc::downgrade(&self.inner))
    }

    /// Whether both handles refer to the same generation
    pub fn ptr_eq(&self, other: &Generation) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generation")
            .field("id", &self.inner.id)
            .field("module", &self.inner.module)
            .field("hot", &self.is_hot())
            .finish()
    }
}

/// Non-owning handle to a [`Generation`]
#[derive(Clone)]
pub struct WeakGeneration(Weak<GenerationInner>);

impl WeakGeneration {
    /// Recover the generation if any strong handle is still alive
    pub fn upgrade(&self) -> Option<Generation> {
        self.0.upgrade().map(|inner| Generation { inner })
    }
}
