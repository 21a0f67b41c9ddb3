//! Word analogies ("a is to b as c is to ?") by exact nearest-neighbour
//! search over a table of pre-trained word vectors.
//!
//! ```no_run
//! use word_analogy::{AnalogyEngine, LoadOptions, load_path};
//!
//! let table = load_path("vectors.txt".as_ref(), &LoadOptions::default())?;
//! let engine = AnalogyEngine::build(table)?;
//! for n in engine.resolve("man", "king", "woman", 5)? {
//!     println!("{} {:.4}", n.word, n.similarity);
//! }
//! # Ok::<(), word_analogy::AnalogyError>(())
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod eval;
pub mod loader;
pub mod query;
pub mod render;
pub mod table;

pub use engine::{AnalogyEngine, DEFAULT_TOP_N, Neighbor};
pub use error::{AnalogyError, Result};
pub use loader::{LoadOptions, VectorFormat, load_path};
pub use query::AnalogyQuery;
pub use table::{VectorTable, VocabularyEntry, normalize};
