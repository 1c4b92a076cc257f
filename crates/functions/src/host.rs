//! Host capability boundary.
//!
//! A spreadsheet host exposes one operation to us: associate a name with
//! a callable. Everything the host later passes in is raw JSON, and
//! everything we hand back is a renderable JSON value.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use rangefn_core::{into_cell_value, FunctionError, FunctionResult};
use serde_json::Value;

/// A registered implementation as the host sees it.
pub type CustomFunction = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("host rejected {name}: {reason}")]
    Rejected { name: String, reason: String },
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// The registration capability supplied by the spreadsheet runtime.
pub trait FunctionHost: Send + Sync {
    fn associate(&self, name: &str, implementation: CustomFunction) -> Result<(), HostError>;
}

/// Wrap a typed function so it can be handed to a host.
///
/// Panics are caught and, like every other failure, come back as an
/// in-band `"Error: ..."` cell. Nothing escapes to the host.
pub fn guarded<F>(name: &'static str, f: F) -> CustomFunction
where
    F: Fn(&[Value]) -> FunctionResult + Send + Sync + 'static,
{
    Arc::new(move |args: &[Value]| {
        log::debug!("{} called with {:?}", name, args);
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| f(args)))
            .unwrap_or_else(|payload| Err(FunctionError::Internal(panic_message(payload.as_ref()))));
        if let Err(e) = &result {
            log::debug!("{} failed: {}", name, e);
        }
        into_cell_value(result)
    })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "function panicked".to_string()
    }
}

// ── Readiness slot ──────────────────────────────────────────────────

/// Where the host's capability shows up once the runtime has loaded it.
///
/// Probing is a plain lock; `install` also wakes anyone waiting so a
/// poller does not have to sleep out its interval.
#[derive(Default)]
pub struct HostSlot {
    host: Mutex<Option<Arc<dyn FunctionHost>>>,
    ready: Condvar,
}

impl HostSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the capability available. A second install replaces the first.
    pub fn install(&self, host: Arc<dyn FunctionHost>) {
        *self.host.lock() = Some(host);
        self.ready.notify_all();
    }

    pub fn get(&self) -> Option<Arc<dyn FunctionHost>> {
        self.host.lock().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.host.lock().is_some()
    }

    /// Block up to `timeout` for the capability to appear.
    pub fn wait_for(&self, timeout: Duration) -> Option<Arc<dyn FunctionHost>> {
        let mut guard = self.host.lock();
        if guard.is_none() {
            let _ = self.ready.wait_for(&mut guard, timeout);
        }
        guard.clone()
    }
}

// ── In-process host ─────────────────────────────────────────────────

/// A host that keeps associations in memory and can invoke them by name.
///
/// Used by the `rangefn` harness and by tests. Re-associating a name
/// replaces the earlier implementation, like the spreadsheet runtime does.
#[derive(Default)]
pub struct InMemoryHost {
    functions: Mutex<HashMap<String, CustomFunction>>,
    associations: Mutex<Vec<String>>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call a registered function. `None` if the name is unknown.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Option<Value> {
        let function = self.functions.lock().get(&name.to_uppercase()).cloned()?;
        Some(function(args))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Every `associate` call seen, in order, duplicates included.
    pub fn associations(&self) -> Vec<String> {
        self.associations.lock().clone()
    }
}

impl FunctionHost for InMemoryHost {
    fn associate(&self, name: &str, implementation: CustomFunction) -> Result<(), HostError> {
        if name.is_empty() {
            return Err(HostError::Rejected {
                name: name.to_string(),
                reason: "empty function name".into(),
            });
        }
        self.associations.lock().push(name.to_string());
        self.functions.lock().insert(name.to_uppercase(), implementation);
        Ok(())
    }
}
