use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dirstream::core::telemetry::logging::init_logging;
use dirstream::{DirectoryStream, ReadableStream, Whence};
use std::io::{self, Write};

#[derive(Debug, Parser)]
#[command(name = "dirstream", version, about = "Read a directory's files as one stream")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the concatenated files to stdout.
    Cat {
        /// Directory, optionally prefixed with `scheme://`.
        target: String,
        /// Position to start from, relative to `--whence`.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
        #[arg(long, value_enum, default_value_t = WhenceArg::Start)]
        whence: WhenceArg,
        /// Stop after this many bytes.
        #[arg(long)]
        length: Option<u64>,
        #[arg(long, default_value_t = 8192)]
        chunk_size: usize,
    },
    /// Show the files making up the stream, in stream order.
    List {
        target: String,
        #[arg(long)]
        json: bool,
    },
    /// Print the total stream size in bytes.
    Size { target: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum WhenceArg {
    Start,
    Current,
    End,
}

impl From<WhenceArg> for Whence {
    fn from(value: WhenceArg) -> Self {
        match value {
            WhenceArg::Start => Whence::Start,
            WhenceArg::Current => Whence::Current,
            WhenceArg::End => Whence::End,
        }
    }
}

fn open(target: &str) -> Result<DirectoryStream> {
    DirectoryStream::open(target, "r").with_context(|| format!("failed to open {target}"))
}

fn cat(
    target: &str,
    offset: i64,
    whence: Whence,
    length: Option<u64>,
    chunk_size: usize,
) -> Result<()> {
    if chunk_size == 0 {
        bail!("--chunk-size must be positive");
    }
    let mut stream = open(target)?;
    if !stream.seek_to(offset, whence) {
        bail!(
            "offset {offset} ({whence:?}) is outside the stream of {} bytes",
            stream.total_size()
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut remaining = length.unwrap_or(u64::MAX);
    while remaining > 0 && !stream.eof() {
        let want = usize::try_from(remaining).map_or(chunk_size, |r| r.min(chunk_size));
        let chunk = stream.read_chunk(want)?;
        if chunk.is_empty() {
            break;
        }
        out.write_all(&chunk)?;
        remaining -= chunk.len() as u64;
    }
    out.flush()?;
    stream.close();

    tracing::debug!("stopped at position {}", stream.tell());
    Ok(())
}

fn list(target: &str, json: bool) -> Result<()> {
    let stream = open(target)?;
    let files = stream.files();
    if json {
        let entries: Vec<_> = files.iter().collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in files {
            println!("{:>12}  {}", entry.size, entry.name);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Cat {
            target,
            offset,
            whence,
            length,
            chunk_size,
        } => cat(&target, offset, whence.into(), length, chunk_size),
        Command::List { target, json } => list(&target, json),
        Command::Size { target } => {
            println!("{}", open(&target)?.total_size());
            Ok(())
        }
    }
}
