// The exported function set

use std::sync::Arc;

use rangefn_config::Settings;
use rangefn_remote_client::{RemoteError, TransformClient};
use serde_json::Value;

use crate::add_one::{add_one, RangeTransport};
use crate::add_value::add_value;
use crate::echo::echo;
use crate::host::{guarded, CustomFunction};

/// Names the host sees, in registration order.
pub const EXPORTED_NAMES: [&str; 3] = ["ADDONE", "ADDVALUE", "TEST"];

/// The functions this library exports, bound to their transport.
#[derive(Clone)]
pub struct FunctionSet {
    transport: Arc<dyn RangeTransport>,
}

impl FunctionSet {
    pub fn new(transport: Arc<dyn RangeTransport>) -> Self {
        Self { transport }
    }

    /// Build the remote client from `remote.endpoint` / `remote.timeoutMs`.
    pub fn from_settings(settings: &Settings) -> Result<Self, RemoteError> {
        let client = TransformClient::new(settings.endpoint.clone(), settings.timeout())?;
        Ok(Self::new(Arc::new(client)))
    }

    /// `(name, implementation)` for every exported function.
    pub fn exports(&self) -> Vec<(&'static str, CustomFunction)> {
        let transport = Arc::clone(&self.transport);
        vec![
            (
                EXPORTED_NAMES[0],
                guarded(EXPORTED_NAMES[0], move |args| add_one(transport.as_ref(), arg(args, 0))),
            ),
            (
                EXPORTED_NAMES[1],
                guarded(EXPORTED_NAMES[1], |args| add_value(arg(args, 0), arg(args, 1))),
            ),
            (
                EXPORTED_NAMES[2],
                guarded(EXPORTED_NAMES[2], |args| echo(arg(args, 0))),
            ),
        ]
    }
}

fn arg(args: &[Value], idx: usize) -> Option<&Value> {
    args.get(idx)
}
