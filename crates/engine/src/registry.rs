//! Once-registry: at most one persisted value per (generation, key)
//!
//! `once` resolves a persistence slot for a generation:
//!
//! 1. the key is claimed in the generation's [`ClaimTable`]; a second claim
//!    fails with `Error::DuplicateKey`
//! 2. if the previous generation staged a value for the key, that value is
//!    adopted, even when it is `Undefined`, `Null` or `false`
//! 3. otherwise the factory runs
//! 4. when the generation has a reload channel, a disposal hook stages the
//!    resolved value for the next generation
//!
//! Staged slots live in the handoff data under the generation's namespace
//! entry, as own properties of one ordinary object. Presence is tested with
//! `get_own`, never by inspecting the value.

use crate::channel::HandoffData;
use crate::generation::Generation;
use hotkeep_core::{Error, GenerationId, ObjectRef, PropertyDescriptor, Result, Value};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;
use tracing::debug;

/// Keys claimed within one generation
///
/// The check-and-set in [`ClaimTable::claim`] runs under a single lock, so
/// the at-most-once guarantee holds even if a host calls in from several
/// threads.
#[derive(Debug, Default)]
pub struct ClaimTable {
    claimed: Mutex<FxHashSet<String>>,
}

impl ClaimTable {
    /// Claim `key`, failing if it was already claimed
    pub fn claim(&self, generation: GenerationId, key: &str) -> Result<()> {
        let mut claimed = self.claimed.lock();
        if claimed.contains(key) {
            return Err(Error::DuplicateKey {
                key: key.to_string(),
                generation,
            });
        }
        claimed.insert(key.to_string());
        Ok(())
    }

    /// Whether `key` has been claimed
    pub fn is_claimed(&self, key: &str) -> bool {
        self.claimed.lock().contains(key)
    }

    /// All claimed keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.claimed.lock().iter().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of claimed keys
    pub fn len(&self) -> usize {
        self.claimed.lock().len()
    }

    /// Whether no key has been claimed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Resolve the persisted value for `key` in `generation`
///
/// Marks the module reloadable. The factory runs at most once, and only
/// when no value was staged for `key` by the previous generation.
///
/// # Errors
///
/// `Error::DuplicateKey` if `key` was already claimed in `generation`.
pub fn once<F>(generation: &Generation, factory: F, key: &str) -> Result<Value>
where
    F: FnOnce() -> Value,
{
    generation.mark_reloadable();
    generation.claims().claim(generation.id(), key)?;

    let value = match staged_value(generation, key) {
        Some(value) => {
            debug!(
                target: "hotkeep::once",
                generation = %generation.id(),
                module = generation.module(),
                key,
                "Adopted value staged by previous generation"
            );
            value
        }
        None => {
            debug!(
                target: "hotkeep::once",
                generation = %generation.id(),
                module = generation.module(),
                key,
                "Created value from factory"
            );
            factory()
        }
    };

    if let Some(channel) = generation.channel() {
        let namespace = generation.namespace().to_string();
        let key = key.to_string();
        let staged = value.clone();
        channel.on_dispose(Box::new(move |data: &mut HandoffData| {
            stage(data, namespace, key, staged);
        }));
    }

    Ok(value)
}

/// Value staged for `key` by the previous generation, if any
fn staged_value(generation: &Generation, key: &str) -> Option<Value> {
    let data = generation.channel()?.previous_data()?;
    let slots = data.get(generation.namespace())?.as_object()?;
    slots.get_own(key)
}

fn stage(data: &mut HandoffData, namespace: String, key: String, value: Value) {
    let existing = data.get(&namespace).and_then(Value::as_object).cloned();
    let slots = match existing {
        Some(slots) => slots,
        None => {
            let slots = ObjectRef::new();
            data.insert(namespace, Value::Object(slots.clone()));
            slots
        }
    };
    slots.define_property(key, PropertyDescriptor::data(value));
}
