//! Description-processing pipeline: per-video link/brand extraction with an
//! LLM-then-regex strategy, concurrent fan-out, and report assembly.

mod extractor;
mod processor;
mod types;
mod xlsx;

pub use extractor::{extract_brand_info, first_link, LlmContext};
pub use processor::{process_records, DEFAULT_CONCURRENCY};
pub use types::{BrandInfo, Report, ResultRow};
pub use xlsx::report_to_xlsx;
