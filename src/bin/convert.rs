use anyhow::Context;
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use word_analogy::cli::{VectorArgs, init_tracing};
use word_analogy::loader::{write_text, write_word2vec_binary};
use word_analogy::VectorFormat;

/// Convert word vectors between the text and word2vec binary formats.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    vectors: VectorArgs,

    /// Output file
    #[arg(long)]
    output: PathBuf,

    /// Output format (guessed from the output extension when omitted)
    #[arg(long, value_enum)]
    output_format: Option<VectorFormat>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let engine = cli.vectors.build_engine()?;
    let format = cli
        .output_format
        .unwrap_or_else(|| VectorFormat::from_path(&cli.output));

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let mut out = BufWriter::new(file);
    match format {
        VectorFormat::Text => write_text(&mut out, &engine)?,
        VectorFormat::Binary => write_word2vec_binary(&mut out, &engine)?,
    }
    out.flush()?;

    info!(
        output = %cli.output.display(),
        ?format,
        words = engine.len(),
        "conversion done"
    );
    Ok(())
}
