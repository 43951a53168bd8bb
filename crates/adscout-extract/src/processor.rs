//! Concurrent batch processing of video records into an ordered report.

use futures::stream::{self, StreamExt};

use adscout_youtube::VideoRecord;

use crate::extractor::{extract_brand_info, LlmContext};
use crate::types::{BrandInfo, Report, ResultRow};

/// Default size of the bounded worker pool.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Run extraction over all records and assemble the sorted report.
///
/// Each record is processed independently: records with empty descriptions
/// get an empty [`BrandInfo`] without any LLM call; the rest go through
/// [`extract_brand_info`]. Extractions run on a bounded pool of
/// `concurrency` in-flight tasks (`.buffered`, so output position i always
/// corresponds to input position i regardless of completion order).
///
/// Rows are then sorted by a composite descending key: records with
/// non-empty descriptions first, then `published_at` lexicographically
/// descending (reverse-chronological for RFC3339 timestamps). No row is
/// dropped for having an empty brand or link.
///
/// Returns `None` only when `records` is empty.
pub async fn process_records(
    records: Vec<VideoRecord>,
    llm: Option<LlmContext<'_>>,
    concurrency: usize,
) -> Option<Report> {
    let mut rows: Vec<ResultRow> = stream::iter(records)
        .map(|record| async move {
            let info = if record.description.is_empty() {
                BrandInfo::default()
            } else {
                extract_brand_info(llm, &record.description).await
            };
            ResultRow::from_parts(record, info)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    rows.sort_by(|a, b| sort_key(b).cmp(&sort_key(a)));

    if rows.is_empty() {
        None
    } else {
        tracing::info!(rows = rows.len(), "assembled report");
        Some(Report { rows })
    }
}

/// Ascending form of the composite sort key; callers compare reversed.
fn sort_key(row: &ResultRow) -> (bool, &str) {
    (!row.description.is_empty(), row.published_at.as_str())
}
