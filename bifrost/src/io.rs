use std::path::Path;

use tokio::{
    fs::File,
    io::{AsyncBufRead, AsyncReadExt, AsyncWriteExt, BufReader},
};

/// Opens the input file, or stdin when no path is given.
pub async fn reader(input: Option<&Path>) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => {
            log::debug!("Reading input from {}", path.display());
            Box::new(BufReader::new(File::open(path).await?))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    Ok(reader)
}

pub async fn read_to_string(input: Option<&Path>) -> anyhow::Result<String> {
    let mut body = String::new();
    reader(input).await?.read_to_string(&mut body).await?;

    Ok(body)
}

pub async fn write_stdout(output: &str) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();

    stdout.write_all(output.as_bytes()).await?;
    stdout.flush().await?;

    Ok(())
}
