//! Bidirectional translation between the Chat Completions and Responses shapes.
//!
//! Requests and completed responses are translated in one call. Messages are
//! expanded on the way to the item shape (one item per tool call) and
//! aggregated on the way back (consecutive function calls merge into one
//! assistant message). Streams go through [`crate::stream`] instead.

mod content;
mod message;
mod request;
mod response;
mod tools;
mod usage;

pub use message::to_chat_messages;
