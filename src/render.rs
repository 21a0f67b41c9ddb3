use crate::engine::Neighbor;
use crate::query::AnalogyQuery;
use std::fmt::Write;

/// Render an analogy answer: a one-line headline, the top score and a
/// ranked table. Similarities are shown to 4 decimal places.
pub fn render_result(query: &AnalogyQuery, result: &[Neighbor]) -> String {
    let mut out = String::new();
    let Some(top) = result.first() else {
        let _ = writeln!(out, "No candidates for {query}");
        return out;
    };

    let _ = writeln!(
        out,
        "{} is to {} as {} is to {}",
        query.positive_b, query.negative, query.positive_c, top.word
    );
    let _ = writeln!(out, "Confidence (cosine similarity): {:.4}", top.similarity);
    out.push('\n');
    out.push_str(&render_table(result));
    out
}

/// Ranked `Rank / Word / Similarity` table.
pub fn render_table(result: &[Neighbor]) -> String {
    let width = result
        .iter()
        .map(|n| n.word.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(out, "{:>4}  {:<width$}  {:>10}", "Rank", "Word", "Similarity");
    let _ = writeln!(out, "{}", "-".repeat(4 + 2 + width + 2 + 10));
    for (i, n) in result.iter().enumerate() {
        let _ = writeln!(out, "{:>4}  {:<width$}  {:>10.4}", i + 1, n.word, n.similarity);
    }
    out
}
