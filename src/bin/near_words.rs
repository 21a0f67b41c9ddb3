use clap::Parser;
use word_analogy::cli::{VectorArgs, init_tracing, prompt};
use word_analogy::render::render_table;

/// Rank the words nearest to a word or to the sum of several words.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    vectors: VectorArgs,

    #[arg(short = 'n', long, default_value_t = 30)]
    top_n: usize,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    if cli.top_n == 0 {
        anyhow::bail!("--top-n must be at least 1");
    }

    let engine = cli.vectors.build_engine()?;

    println!("Near Words Tool - Type 'EXIT' to quit\n");
    loop {
        println!("\nRanking nearest words to a word or sentence.");
        let Some(s) = prompt("Enter 1 or more words: ")? else {
            break;
        };
        if s == "EXIT" {
            println!("Goodbye!");
            break;
        }
        let words: Vec<&str> = s.split_whitespace().collect();
        if words.is_empty() {
            println!("No words were input. Try again");
            continue;
        }

        let oov_words: Vec<&str> = words
            .iter()
            .filter(|&&w| !engine.contains(w))
            .copied()
            .collect();
        if !oov_words.is_empty() {
            for word in &oov_words {
                println!("'{word}' is out of vocabulary");
            }
            continue;
        }

        match engine.nearest(&words, cli.top_n) {
            Ok(result) => {
                println!("\nNearest words to '{}':", words.join(" + "));
                print!("{}", render_table(&result));
            }
            Err(e) => println!("No near words: {e}"),
        }
    }

    Ok(())
}
