// Termscape: term-similarity graphs of long texts
//
// This is the library root. Each module is one stage of the pipeline:
// text -> term index -> density curves -> pair scores -> term matrix -> graph.

pub mod config;
pub mod density;
pub mod error;
pub mod graph;
pub mod matrix;
pub mod output;
pub mod pipeline;
pub mod scoring;
pub mod text;

pub use error::{Result, TermscapeError};
