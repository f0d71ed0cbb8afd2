//! Chat Completions stream to Responses stream translation.
//!
//! A provider that only speaks the chat shape streams delta chunks. Each chunk
//! goes through [`ChatToResponsesStreamState::process_chunk`], which returns
//! the sequence-numbered Responses events for it. States are cheap to create,
//! but busy gateways recycle them through a [`StreamStatePool`].

mod events;
mod pool;
pub mod sse;
mod state;

pub use events::{ResponsesStreamEvent, ResponsesStreamEventPayload};
pub use pool::{PooledStreamState, StreamStatePool};
pub use state::ChatToResponsesStreamState;
