//! hotkeep - keep state alive across hot module reloads
//!
//! When a module is replaced in place during development, values that were
//! expensive to build, object identities and function identities can be
//! carried over to the new generation of the module instead of being
//! recreated, while behavior still comes from the new code.
//!
//! # Quick Start
//!
//! ```
//! use hotkeep::{persist_function, persist_value, HostConfig, ModuleHost, ObjectRef, Value};
//!
//! # fn main() -> hotkeep::Result<()> {
//! let host = ModuleHost::new(HostConfig::default())?;
//!
//! // First generation: the factory runs, the function gets a dispatcher
//! let g1 = host.load("app::greeter");
//! let counter = persist_value(&g1, || Value::Object(ObjectRef::new()), "counter")?;
//! let greet = persist_function(
//!     &g1,
//!     &ObjectRef::function("greet", 0, |_, _| Ok(Value::from("hello"))),
//!     "greet",
//! )?;
//!
//! // Reload: the same identities come back, behavior is replaced
//! let g2 = host.reload(&g1)?;
//! let counter_again = persist_value(&g2, || Value::Null, "counter")?;
//! persist_function(
//!     &g2,
//!     &ObjectRef::function("greet", 0, |_, _| Ok(Value::from("hi"))),
//!     "greet",
//! )?;
//!
//! assert_eq!(counter, counter_again);
//! assert_eq!(greet.call(&Value::Undefined, &[])?, Value::from("hi"));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `hotkeep-core`: value and object model, property transplant, errors
//! - `hotkeep-engine`: generations, the once-registry and the persistence
//!   wrappers
//! - `hotkeep-host`: an in-process host loader and its `hotkeep.toml`
//!   configuration

pub use hotkeep_core::{
    reconcile, Error, GenerationId, NativeFn, ObjectRef, PropertyDescriptor, Result, Value,
    FUNCTION_INTRINSICS,
};
pub use hotkeep_engine::{
    mark_reloadable, once, persist_function, persist_object, persist_value, ClaimTable,
    DisposeHook, Generation, HandoffData, ReloadChannel, WeakGeneration, HANDOFF_NAMESPACE,
};
pub use hotkeep_host::{HostChannel, HostConfig, ModuleHost, CONFIG_FILE_NAME};
