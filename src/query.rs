use crate::engine::{AnalogyEngine, Neighbor};
use crate::error::{AnalogyError, Result};
use crate::table::normalize;
use std::fmt;

/// "a is to b as c is to ?" with each word normalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalogyQuery {
    pub negative: String,
    pub positive_b: String,
    pub positive_c: String,
}

impl AnalogyQuery {
    pub fn new(a: &str, b: &str, c: &str) -> Self {
        AnalogyQuery {
            negative: normalize(a),
            positive_b: normalize(b),
            positive_c: normalize(c),
        }
    }

    /// Parse a line of user input holding exactly three words.
    pub fn parse(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words[..] {
            [a, b, c] => Ok(AnalogyQuery::new(a, b, c)),
            _ => Err(AnalogyError::WordCount(words.len())),
        }
    }

    pub fn resolve(&self, engine: &AnalogyEngine, top_n: usize) -> Result<Vec<Neighbor>> {
        engine.resolve(&self.negative, &self.positive_b, &self.positive_c, top_n)
    }
}

impl fmt::Display for AnalogyQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} + {}",
            self.positive_b, self.negative, self.positive_c
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_words() {
        let q = AnalogyQuery::parse("  Man KING\twoman ").unwrap();
        assert_eq!(q, AnalogyQuery::new("man", "king", "woman"));
        assert_eq!(q.to_string(), "king - man + woman");
    }

    #[test]
    fn parse_wants_three_words() {
        for (line, found) in [("man king", 2), ("a b c d", 4), ("   ", 0)] {
            match AnalogyQuery::parse(line) {
                Err(AnalogyError::WordCount(n)) => assert_eq!(n, found),
                other => panic!("unexpected {other:?}"),
            }
        }
    }
}
