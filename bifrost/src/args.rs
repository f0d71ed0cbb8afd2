use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use config::StreamFraming;

/// Translates between the Chat Completions and Responses API shapes.
#[derive(Debug, Parser)]
#[command(name = "bifrost", version, about)]
pub struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "BIFROST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `llm=debug`. Overrides the configuration file.
    #[arg(long, env = "BIFROST_LOG")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reads Chat Completions stream chunks, one JSON object per line, and
    /// writes the equivalent Responses stream events.
    Stream {
        /// Read chunks from this file instead of stdin.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output framing. Overrides the configuration file.
        #[arg(long, value_enum)]
        framing: Option<Framing>,
    },

    /// Converts one request body.
    Request {
        /// Shape to convert into.
        #[arg(long, value_enum)]
        to: Shape,

        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Converts one completed (non-streaming) response body.
    Response {
        /// Shape to convert into.
        #[arg(long, value_enum)]
        to: Shape,

        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// The Responses API shape.
    Responses,
    /// The Chat Completions shape.
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Framing {
    Sse,
    JsonLines,
}

impl From<Framing> for StreamFraming {
    fn from(framing: Framing) -> Self {
        match framing {
            Framing::Sse => StreamFraming::Sse,
            Framing::JsonLines => StreamFraming::JsonLines,
        }
    }
}
