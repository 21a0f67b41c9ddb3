//! Reading and writing vector tables.
//!
//! Two formats are understood:
//!
//! * text - one `word v1 v2 ... vd` record per line (GloVe output, word2vec
//!   text). An optional word2vec `count dims` header line is skipped.
//! * word2vec binary - an ASCII `count dims` header line, then per record
//!   the word, a space and `dims` little-endian f32 values.

use crate::engine::AnalogyEngine;
use crate::error::{AnalogyError, Result};
use crate::table::VectorTable;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

// Upper bound on allocations sized from an untrusted binary header.
const MAX_PREALLOC: usize = 1 << 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum VectorFormat {
    #[default]
    Text,
    Binary,
}

impl VectorFormat {
    /// Guess the format from a file extension: `.bin` is binary, anything
    /// else is text.
    pub fn from_path(path: &Path) -> VectorFormat {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => VectorFormat::Binary,
            _ => VectorFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub format: VectorFormat,
    /// Keep only the first `limit` records.
    pub limit: Option<usize>,
}

pub fn load_path(path: &Path, options: &LoadOptions) -> Result<VectorTable> {
    let start = Instant::now();
    let reader = BufReader::new(File::open(path)?);
    let table = match options.format {
        VectorFormat::Text => read_text(reader, options.limit)?,
        VectorFormat::Binary => read_word2vec_binary(reader, options.limit)?,
    };
    info!(
        path = %path.display(),
        words = table.len(),
        elapsed = ?start.elapsed(),
        "loaded word vectors"
    );
    Ok(table)
}

fn is_header(parts: &[&str]) -> bool {
    parts.len() == 2 && parts.iter().all(|p| p.parse::<usize>().is_ok())
}

fn check_finite(word: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(AnalogyError::NonFiniteValue {
            word: word.to_string(),
        })
    }
}

/// Read whitespace separated text vectors.
pub fn read_text<R: BufRead>(reader: R, limit: Option<usize>) -> Result<VectorTable> {
    let mut table = VectorTable::new();
    let mut records = 0;

    for (index, line_result) in reader.lines().enumerate() {
        if limit.is_some_and(|n| records >= n) {
            break;
        }
        let line = line_result?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((key, rest)) = parts.split_first() else {
            continue;
        };

        if records == 0 && is_header(&parts) {
            debug!(line = index + 1, "skipping word2vec header");
            continue;
        }

        let values = rest
            .iter()
            .map(|s| {
                s.parse::<f64>().map_err(|e| AnalogyError::Parse {
                    line: index + 1,
                    message: format!("'{s}' for '{key}': {e}"),
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        check_finite(key, &values)?;

        table.insert(key, values);
        records += 1;
    }

    Ok(table)
}

fn parse_header(line: &str) -> Result<(usize, usize)> {
    let mut parts = line.split_whitespace();
    match (
        parts.next().map(str::parse::<usize>),
        parts.next().map(str::parse::<usize>),
        parts.next(),
    ) {
        (Some(Ok(count)), Some(Ok(dims)), None) => Ok((count, dims)),
        _ => Err(AnalogyError::Header(format!(
            "expected 'count dims', got '{}'",
            line.trim()
        ))),
    }
}

/// Read the word2vec binary format.
pub fn read_word2vec_binary<R: BufRead>(mut reader: R, limit: Option<usize>) -> Result<VectorTable> {
    let mut header = String::new();
    reader.read_line(&mut header)?;
    let (count, dims) = parse_header(&header)?;
    let count = limit.map_or(count, |n| n.min(count));

    let mut table = VectorTable::with_capacity(count.min(MAX_PREALLOC));
    let mut word_buf = Vec::new();
    for record in 0..count {
        word_buf.clear();
        reader.read_until(b' ', &mut word_buf)?;
        if word_buf.pop() != Some(b' ') {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("record {} of {count} is truncated", record + 1),
            )
            .into());
        }
        // Records may be separated by a newline.
        let word = String::from_utf8_lossy(&word_buf);
        let word = word.trim_start_matches('\n');
        if word.trim().is_empty() {
            return Err(AnalogyError::Parse {
                line: record + 1,
                message: "empty word".to_string(),
            });
        }

        let mut values = Vec::with_capacity(dims.min(MAX_PREALLOC));
        for _ in 0..dims {
            values.push(f64::from(reader.read_f32::<LittleEndian>()?));
        }
        check_finite(word, &values)?;
        table.insert(word, values);
    }

    Ok(table)
}

/// Write the engine's vocabulary in word2vec binary format.
pub fn write_word2vec_binary<W: Write>(writer: &mut W, engine: &AnalogyEngine) -> Result<()> {
    writeln!(writer, "{} {}", engine.len(), engine.dims())?;
    let mut values: Vec<f32> = Vec::with_capacity(engine.dims());
    for (idx, word) in engine.words().enumerate() {
        write!(writer, "{word} ")?;
        values.clear();
        for &v in engine.get_vector(idx) {
            if v.abs() > f64::from(f32::MAX) {
                return Err(AnalogyError::OutOfRange {
                    word: word.to_string(),
                });
            }
            values.push(v as f32);
        }
        if cfg!(target_endian = "little") {
            writer.write_all(bytemuck::cast_slice(&values))?;
        } else {
            for &v in &values {
                writer.write_f32::<LittleEndian>(v)?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write the engine's vocabulary as text vectors, one word per line.
pub fn write_text<W: Write>(writer: &mut W, engine: &AnalogyEngine) -> Result<()> {
    for (idx, word) in engine.words().enumerate() {
        write!(writer, "{word}")?;
        for v in engine.get_vector(idx) {
            write!(writer, " {v}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TEXT: &str = "\
king 1.0 0.0 1.0
Man 1.0 0.0 0.0

woman 1.0 1.0 0.0
queen 1.0 1.0 1.0
";

    #[test]
    fn reads_text_vectors() {
        let table = read_text(Cursor::new(TEXT), None).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.get("man").unwrap().vector, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn skips_word2vec_text_header() {
        let input = format!("4 3\n{TEXT}");
        let table = read_text(Cursor::new(input), None).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.get("4").is_none());
    }

    #[test]
    fn limit_keeps_leading_records() {
        let table = read_text(Cursor::new(TEXT), Some(2)).unwrap();
        let words: Vec<&str> = table.entries().iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, ["king", "man"]);
    }

    #[test]
    fn bad_number_reports_line() {
        let input = "king 1.0 0.0\nqueen 1.0 x\n";
        match read_text(Cursor::new(input), None) {
            Err(AnalogyError::Parse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("queen"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let input = "king 1.0 NaN\n";
        assert!(matches!(
            read_text(Cursor::new(input), None),
            Err(AnalogyError::NonFiniteValue { word }) if word == "king"
        ));
    }

    fn binary_record(out: &mut Vec<u8>, word: &str, values: &[f32]) {
        out.extend_from_slice(word.as_bytes());
        out.push(b' ');
        for &v in values {
            out.write_f32::<LittleEndian>(v).unwrap();
        }
    }

    #[test]
    fn reads_binary_with_and_without_newlines() {
        let mut data = b"2 2\n".to_vec();
        binary_record(&mut data, "Paris", &[0.5, -1.0]);
        data.push(b'\n');
        binary_record(&mut data, "rome", &[2.0, 0.25]);

        let table = read_word2vec_binary(Cursor::new(data), None).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("paris").unwrap().vector, vec![0.5, -1.0]);
        assert_eq!(table.get("rome").unwrap().vector, vec![2.0, 0.25]);
    }

    #[test]
    fn truncated_binary_is_an_io_error() {
        let mut data = b"2 2\n".to_vec();
        binary_record(&mut data, "paris", &[0.5, -1.0]);
        data.extend_from_slice(b"rome ");
        data.extend_from_slice(&[0, 0]);
        assert!(matches!(
            read_word2vec_binary(Cursor::new(data), None),
            Err(AnalogyError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn huge_binary_count_fails_on_missing_data() {
        let data = b"9223372036854775807 300\nking ".to_vec();
        assert!(matches!(
            read_word2vec_binary(Cursor::new(data), None),
            Err(AnalogyError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn binary_limit_keeps_leading_records() {
        let mut data = b"3 1\n".to_vec();
        binary_record(&mut data, "one", &[1.0]);
        binary_record(&mut data, "two", &[2.0]);
        binary_record(&mut data, "three", &[3.0]);

        let table = read_word2vec_binary(Cursor::new(data), Some(2)).unwrap();
        let words: Vec<&str> = table.entries().iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, ["one", "two"]);
    }

    #[test]
    fn bad_binary_header() {
        assert!(matches!(
            read_word2vec_binary(Cursor::new(b"hello\n".to_vec()), None),
            Err(AnalogyError::Header(_))
        ));
    }

    #[test]
    fn binary_writer_output_reads_back() {
        let table = read_text(Cursor::new(TEXT), None).unwrap();
        let engine = AnalogyEngine::build(table).unwrap();

        let mut out = Vec::new();
        write_word2vec_binary(&mut out, &engine).unwrap();
        let table = read_word2vec_binary(Cursor::new(out), None).unwrap();
        let reread = AnalogyEngine::build(table).unwrap();

        assert_eq!(reread.words().collect::<Vec<_>>(), engine.words().collect::<Vec<_>>());
        assert_eq!(reread.vector_of("queen").unwrap(), engine.vector_of("queen").unwrap());
    }

    #[test]
    fn text_writer_emits_one_line_per_word() {
        let table = read_text(Cursor::new(TEXT), None).unwrap();
        let engine = AnalogyEngine::build(table).unwrap();
        let mut out = Vec::new();
        write_text(&mut out, &engine).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some("king 1 0 1"));
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn text_writer_output_reads_back() {
        let input = "paris 0.125 -3.5 1e-7\nrome 2 0.3333333333333333 -0\n";
        let engine = AnalogyEngine::build(read_text(Cursor::new(input), None).unwrap()).unwrap();

        let mut out = Vec::new();
        write_text(&mut out, &engine).unwrap();
        let reread = AnalogyEngine::build(read_text(Cursor::new(out), None).unwrap()).unwrap();

        for word in ["paris", "rome"] {
            assert_eq!(reread.vector_of(word).unwrap(), engine.vector_of(word).unwrap());
        }
    }

    #[test]
    fn binary_writer_rejects_values_beyond_f32() {
        let table: VectorTable = [("ok", vec![1.0, 2.0]), ("vast", vec![1e39, 0.0])]
            .into_iter()
            .collect();
        let engine = AnalogyEngine::build(table).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            write_word2vec_binary(&mut out, &engine),
            Err(AnalogyError::OutOfRange { word }) if word == "vast"
        ));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(VectorFormat::from_path(Path::new("g.bin")), VectorFormat::Binary);
        assert_eq!(VectorFormat::from_path(Path::new("vectors.txt")), VectorFormat::Text);
    }
}
