use clap::Parser;
use std::panic::{self, AssertUnwindSafe};
use word_analogy::cli::{VectorArgs, init_tracing, prompt};
use word_analogy::render::render_result;
use word_analogy::{AnalogyEngine, AnalogyError, AnalogyQuery, DEFAULT_TOP_N};

/// Solve word analogies interactively: A is to B as C is to ?
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    vectors: VectorArgs,

    /// Number of candidates to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn answer(engine: &AnalogyEngine, query: &AnalogyQuery, top_n: usize) {
    // Any panic inside the engine is reported for this query only.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| query.resolve(engine, top_n)));
    match outcome {
        Ok(Ok(result)) => print!("\n{}", render_result(query, &result)),
        Ok(Err(AnalogyError::WordNotFound(word))) => {
            println!("'{word}' is out of vocabulary. Try a simpler or more common word.")
        }
        Ok(Err(e)) => println!("Cannot solve {query}: {e}"),
        Err(_) => println!("An unexpected error occurred while solving {query}"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    if cli.top_n == 0 {
        anyhow::bail!("--top-n must be at least 1");
    }

    let engine = cli.vectors.build_engine()?;

    loop {
        println!("\nWord analogy - MAN is to KING as WOMAN is to ?");
        let Some(s) = prompt("Enter 3 words (EXIT to quit): ")? else {
            break;
        };
        if s == "EXIT" {
            break;
        }
        match AnalogyQuery::parse(&s) {
            Ok(query) => answer(&engine, &query, cli.top_n),
            Err(e) => println!("{e}. Try again."),
        }
    }

    Ok(())
}
