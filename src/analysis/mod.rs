//! Analysis Module
//!
//! Regex-driven source analysis: language detection, complexity and quality
//! metrics, outlines, chunked reads and folder trees.

mod chunk;
mod language;
mod metrics;
mod outline;
mod tree;

pub use chunk::{chunks_for, read_chunk, Chunk};
pub use language::Language;
pub use metrics::{
    aggregate, analyze_source, complexity, definitions, imports, quality, CodeAnalysis,
    DirectoryAnalysis, FileAnalysis, QualityMetrics, COMPLEX_THRESHOLD, LONG_LINE,
};
pub use outline::{outline_source, ClassOutline, FunctionOutline, Outline};
pub use tree::folder_structure;
