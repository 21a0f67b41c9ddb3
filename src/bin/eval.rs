use anyhow::Context;
use chrono::Local;
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use word_analogy::AnalogyEngine;
use word_analogy::cli::{VectorArgs, init_tracing};
use word_analogy::eval::{Score, evaluate, read_questions};

const SEMANTIC_TESTS: [&str; 5] = [
    "capital-common-countries.txt",
    "capital-world.txt",
    "currency.txt",
    "city-in-state.txt",
    "family.txt",
];

const SYNTACTIC_TESTS: [&str; 9] = [
    "gram1-adjective-to-adverb.txt",
    "gram2-opposite.txt",
    "gram3-comparative.txt",
    "gram4-superlative.txt",
    "gram5-present-participle.txt",
    "gram6-nationality-adjective.txt",
    "gram7-past-tense.txt",
    "gram8-plural.txt",
    "gram9-plural-verbs.txt",
];

/// Analogy accuracy of a set of word vectors.
///
/// With `--questions` every given file is scored section by section. Without
/// it, the Google analogy corpus split into one file per category is read
/// from `--question-dir`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    vectors: VectorArgs,

    /// Question files (": section" headers, "a b c d" lines)
    #[arg(long, num_args = 1..)]
    questions: Vec<PathBuf>,

    #[arg(long, default_value = "DATA/question-data")]
    question_dir: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn print_score(label: &str, score: &Score) {
    println!(
        "{label} Accuracy: {:4.2}% ({}/{})",
        100.0 * score.accuracy(),
        score.correct,
        score.seen
    );
    println!(
        "{label} Questions seen/total: {:4.2}% ({}/{})",
        100.0 * score.coverage(),
        score.seen,
        score.total
    );
}

fn score_file(engine: &AnalogyEngine, path: &Path) -> anyhow::Result<Score> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let sections = read_questions(BufReader::new(file))?;
    let report = evaluate(engine, &sections);
    for (name, score) in &report.sections {
        println!(
            "  {name}: {:4.2}% ({}/{})",
            100.0 * score.accuracy(),
            score.correct,
            score.seen
        );
    }
    Ok(report.overall)
}

fn run_test_group(
    label: &str,
    files: &[&str],
    dir: &Path,
    engine: &AnalogyEngine,
) -> anyhow::Result<Score> {
    println!("\n{label} ANALOGY TESTS");
    let mut group = Score::default();
    for fname in files {
        let score = score_file(engine, &dir.join(fname))?;
        println!(
            "File: {fname} - Accuracy: {:4.2}% ({}/{})",
            100.0 * score.accuracy(),
            score.correct,
            score.seen
        );
        group.add(score);
    }
    print_score(&format!("{label} Total"), &group);
    Ok(group)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let engine = cli.vectors.build_engine()?;
    println!(
        "{} - evaluating {} words of dimension {}",
        Local::now().format("%x - %I:%M.%S%p"),
        engine.len(),
        engine.dims()
    );

    let mut overall = Score::default();
    if cli.questions.is_empty() {
        for (label, files) in [
            ("SEMANTIC", &SEMANTIC_TESTS[..]),
            ("SYNTACTIC", &SYNTACTIC_TESTS[..]),
        ] {
            let group = run_test_group(label, files, &cli.question_dir, &engine)?;
            overall.add(group);
        }
    } else {
        for path in &cli.questions {
            println!("\nFile: {}", path.display());
            let score = score_file(&engine, path)?;
            overall.add(score);
        }
    }

    println!("\nOVERALL RESULTS:");
    print_score("Total", &overall);
    println!("{} - done", Local::now().format("%x - %I:%M.%S%p"));
    Ok(())
}
