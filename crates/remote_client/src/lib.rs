//! Remote transform client.
//!
//! This crate is the single source of truth for the transform wire
//! contract: `POST {"data": [[...]]}`, answer `{"status", "result", "error"}`.
//!
//! No retries. No batching. One request per call.

mod client;

pub use client::{RemoteError, TransformClient, TransformRequest, TransformResponse};
