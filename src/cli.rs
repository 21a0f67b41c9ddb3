//! Pieces shared by the command-line tools.

use crate::engine::AnalogyEngine;
use crate::loader::{LoadOptions, VectorFormat, load_path};
use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

/// Where to find the vectors and how to read them.
#[derive(clap::Args, Debug, Clone)]
pub struct VectorArgs {
    /// Word vector file
    #[arg(long, env = "WORD_ANALOGY_VECTORS", default_value = "vectors.txt")]
    pub vectors: PathBuf,

    /// File format (guessed from the extension when omitted: .bin is binary)
    #[arg(long, value_enum)]
    pub format: Option<VectorFormat>,

    /// Only load the first N vectors
    #[arg(long)]
    pub limit: Option<usize>,
}

impl VectorArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            format: self
                .format
                .unwrap_or_else(|| VectorFormat::from_path(&self.vectors)),
            limit: self.limit,
        }
    }

    pub fn build_engine(&self) -> anyhow::Result<AnalogyEngine> {
        let table = load_path(&self.vectors, &self.load_options())
            .with_context(|| format!("loading {}", self.vectors.display()))?;
        let engine = AnalogyEngine::build(table)
            .with_context(|| format!("building engine from {}", self.vectors.display()))?;
        Ok(engine)
    }
}

/// Filter from `RUST_LOG` when it is set, otherwise from the verbosity flag.
fn log_filter(rust_log: Option<&str>, verbose: u8) -> anyhow::Result<EnvFilter> {
    if let Some(spec) = rust_log {
        return EnvFilter::try_new(spec).with_context(|| format!("invalid RUST_LOG '{spec}'"));
    }
    let level = match verbose {
        0 => "word_analogy=info",
        1 => "word_analogy=debug",
        _ => "word_analogy=trace",
    };
    Ok(EnvFilter::new(level))
}

/// Log to stderr so interactive output on stdout stays clean. `RUST_LOG`
/// replaces the level chosen by `verbose`.
pub fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), verbose)?)
        .with_writer(io::stderr)
        .init();
    Ok(())
}

/// Print a prompt and read one trimmed line. `None` on end of input.
pub fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    let mut s = String::new();
    if io::stdin().lock().read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}
