//! Canonical message types for the two protocol shapes the gateway speaks.
//!
//! The Chat Completions shape groups a turn into one message that may carry
//! several tool calls. The Responses shape flattens the same conversation into
//! a list of discrete items. Both reuse [`MessageContent`] for the
//! string-or-blocks content union.

pub mod chat;
mod content;
mod extra;
pub mod responses;
mod usage;

pub use content::MessageContent;
pub use extra::ExtraFields;
pub use usage::Cost;
