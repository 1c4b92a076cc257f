//! Spreadsheet custom functions and the glue that hands them to a host.
//!
//! Load sequence: the host fills a [`HostSlot`], the [`ReadinessPoller`]
//! notices, and [`register_all`] associates every exported name once.
//! After that the host calls the implementations whenever a cell
//! recalculates.

mod add_one;
mod add_value;
mod echo;
pub mod host;
pub mod poller;
pub mod registrar;
mod set;

pub use add_one::{add_one, RangeTransport};
pub use add_value::add_value;
pub use echo::{echo, echo_at};
pub use host::{guarded, CustomFunction, FunctionHost, HostError, HostSlot, InMemoryHost};
pub use poller::{PollOutcome, PollPolicy, ReadinessPoller};
pub use registrar::{register_all, RegistrationReport};
pub use set::{FunctionSet, EXPORTED_NAMES};
