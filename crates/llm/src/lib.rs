//! Protocol core of the Bifrost gateway.
//!
//! Converts between the Chat Completions and Responses API shapes: requests,
//! messages, tools, completed responses and usage through [`mux`], and live
//! streams through [`stream`].

mod error;
pub mod messages;
pub mod mux;
pub mod stream;

pub use error::{MuxError, MuxResult};
