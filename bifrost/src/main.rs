use args::{Args, Command};
use clap::Parser;
use config::Config;

mod args;
mod convert;
mod io;
mod logger;
mod stream;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let log_filter = args.log.as_deref().unwrap_or(&config.log.filter);
    logger::init(log_filter);

    match args.command {
        Command::Stream { input, framing } => {
            let framing = framing.map(Into::into).unwrap_or(config.stream.framing);
            stream::run(input.as_deref(), framing, &config.stream).await
        }
        Command::Request { to, input } => convert::request(to, input.as_deref()).await,
        Command::Response { to, input } => convert::response(to, input.as_deref()).await,
    }
}
