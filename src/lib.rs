pub mod config;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod storage;

pub use models::{CategoryGuess, PipelineOutput, ProductDraft, RawRow, RowSet, SizeVariant};
pub use pipeline::run_pipeline;
pub use reader::read_source;
