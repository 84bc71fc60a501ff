//! Minimal in-crate reload channel for unit tests

use crate::channel::{DisposeHook, HandoffData, ReloadChannel};
use crate::generation::Generation;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) struct TestChannel {
    accepted: AtomicBool,
    previous: Option<HandoffData>,
    hooks: Mutex<Vec<DisposeHook>>,
}

impl TestChannel {
    pub(crate) fn new(previous: Option<HandoffData>) -> Arc<Self> {
        Arc::new(Self {
            accepted: AtomicBool::new(false),
            previous,
            hooks: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn is_accepted(&self) -> bool {
        self.accepted.load(Ordering::SeqCst)
    }

    pub(crate) fn hook_count(&self) -> usize {
        self.hooks.lock().len()
    }

    pub(crate) fn dispose(&self) -> HandoffData {
        let hooks = std::mem::take(&mut *self.hooks.lock());
        let mut data = HandoffData::default();
        for hook in hooks {
            hook(&mut data);
        }
        data
    }
}

impl ReloadChannel for TestChannel {
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

/// First hot generation of a module
pub(crate) fn hot(module: &str) -> (Generation, Arc<TestChannel>) {
    let channel = TestChannel::new(None);
    let generation = Generation::new(module, Some(channel.clone() as Arc<dyn ReloadChannel>));
    (generation, channel)
}

/// Dispose `generation` and start its successor with the staged data
pub(crate) fn reload(
    generation: Generation,
    channel: &TestChannel,
) -> (Generation, Arc<TestChannel>) {
    let module = generation.module().to_string();
    let data = channel.dispose();
    drop(generation);
    let next = TestChannel::new(Some(data));
    let generation = Generation::new(module, Some(next.clone() as Arc<dyn ReloadChannel>));
    (generation, next)
}
