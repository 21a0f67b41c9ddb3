//! Analogy accuracy on question files in the layout of the Google analogy
//! corpus (Mikolov et al, 2013): `: section-name` headers followed by one
//! `a b c d` question per line, read as "a is to b as c is to d".

use crate::engine::AnalogyEngine;
use crate::error::Result;
use crate::table::normalize;
use std::io::BufRead;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub a: String,
    pub b: String,
    pub c: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub questions: Vec<Question>,
}

impl Section {
    fn new(name: &str) -> Self {
        Section {
            name: name.to_string(),
            questions: Vec::new(),
        }
    }
}

/// Correct / seen / total counts for one section or for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub seen: usize,
    pub total: usize,
}

impl Score {
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct, self.seen)
    }

    /// Fraction of questions whose words were all in the vocabulary.
    pub fn coverage(&self) -> f64 {
        ratio(self.seen, self.total)
    }

    pub fn add(&mut self, other: Score) {
        self.correct += other.correct;
        self.seen += other.seen;
        self.total += other.total;
    }
}

fn ratio(n: usize, d: usize) -> f64 {
    if d == 0 { 0.0 } else { n as f64 / d as f64 }
}

#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub sections: Vec<(String, Score)>,
    pub overall: Score,
}

pub fn read_questions<R: BufRead>(reader: R) -> Result<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        // Section headers like ": capital-common-countries"
        if let Some(name) = line.strip_prefix(':') {
            sections.push(Section::new(name.trim()));
            continue;
        }

        let mut parts = line.split_whitespace().map(normalize);
        if let (Some(a), Some(b), Some(c), Some(expected)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        {
            if sections.is_empty() {
                sections.push(Section::new("default"));
            }
            if let Some(section) = sections.last_mut() {
                section.questions.push(Question { a, b, c, expected });
            }
        }
    }

    Ok(sections)
}

fn score_section(engine: &AnalogyEngine, section: &Section) -> Score {
    let mut score = Score::default();
    for q in &section.questions {
        score.total += 1;
        if ![&q.a, &q.b, &q.c, &q.expected]
            .iter()
            .all(|w| engine.contains(w))
        {
            continue;
        }
        score.seen += 1;
        if let Ok(guess) = engine.resolve(&q.a, &q.b, &q.c, 1) {
            if guess.first().is_some_and(|n| n.word == q.expected) {
                score.correct += 1;
            }
        }
    }
    score
}

pub fn evaluate(engine: &AnalogyEngine, sections: &[Section]) -> EvalReport {
    let mut report = EvalReport::default();
    for section in sections {
        let score = score_section(engine, section);
        debug!(section = %section.name, ?score, "section scored");
        report.overall.add(score);
        report.sections.push((section.name.clone(), score));
    }
    report
}
