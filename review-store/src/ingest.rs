//! Ingestion pipeline: read dump → map reviews → embed comments → upsert.
//!
//! Stored points carry the full review as metadata, so retrieval can read
//! `comment` and `name` back without a second lookup.

use std::collections::HashSet;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::StoreConfig;
use crate::embed::EmbeddingsProvider;
use crate::embed_pool::embed_all;
use crate::errors::StoreError;
use crate::io_jsonl::read_dump;
use crate::mappers::map_review;
use crate::record::{ReviewRecord, VectorPoint};
use crate::VectorBackend;

/// Counters reported at the end of an ingestion run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Entries read from the dump (malformed lines excluded).
    pub read: usize,
    /// Malformed JSONL lines.
    pub malformed: usize,
    /// Entries without a professor name or usable comment, plus duplicates.
    pub skipped: usize,
    /// Points acknowledged by the backend.
    pub upserted: u64,
}

/// Ingests a JSON array or JSONL dump of reviews.
pub(crate) async fn ingest_file(
    cfg: &StoreConfig,
    backend: &VectorBackend,
    path: impl AsRef<Path>,
    provider: &dyn EmbeddingsProvider,
) -> Result<IngestReport, StoreError> {
    let (values, malformed) = read_dump(path)?;
    let mut report = ingest_values(cfg, backend, &values, provider).await?;
    report.malformed = malformed;
    Ok(report)
}

/// Ingests already-parsed dump entries.
pub(crate) async fn ingest_values(
    cfg: &StoreConfig,
    backend: &VectorBackend,
    values: &[Value],
    provider: &dyn EmbeddingsProvider,
) -> Result<IngestReport, StoreError> {
    let (records, skipped) = select_reviews(values);
    let mut report = IngestReport {
        read: values.len(),
        skipped,
        ..Default::default()
    };
    info!(
        read = report.read,
        usable = records.len(),
        skipped = report.skipped,
        "review dump loaded"
    );
    if records.is_empty() {
        warn!("No usable reviews in dump");
        return Ok(report);
    }

    let comments: Vec<String> = records.iter().map(|r| r.comment.clone()).collect();
    let pb = progress_bar(comments.len() as u64, "embedding");
    let vectors = embed_all(
        &comments,
        provider,
        cfg.embedding_batch,
        cfg.embedding_concurrency,
        |n| pb.inc(n as u64),
    )
    .await?;
    pb.finish_and_clear();

    let dim = vectors.first().map(Vec::len).unwrap_or(0);
    backend.prepare(dim).await?;

    let points: Vec<VectorPoint> = records
        .iter()
        .zip(vectors)
        .map(|(r, values)| VectorPoint {
            id: r.stable_id(),
            values,
            metadata: r.metadata(),
        })
        .collect();

    let pb = progress_bar(points.len() as u64, "upserting");
    for chunk in points.chunks(cfg.upsert_batch.max(1)) {
        report.upserted += backend.upsert(chunk).await?;
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    info!(
        upserted = report.upserted,
        index = backend.index_name(),
        "ingestion complete"
    );
    Ok(report)
}

/// Maps entries, drops unusable ones and duplicates; returns `(records, skipped)`.
fn select_reviews(values: &[Value]) -> (Vec<ReviewRecord>, usize) {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(values.len());
    for v in values {
        match map_review(v) {
            Some(r) if r.has_comment() && seen.insert(r.stable_id()) => out.push(r),
            _ => {}
        }
    }
    let skipped = values.len() - out.len();
    (out, skipped)
}

fn progress_bar(len: u64, stage: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(
        "{spinner:.green} {msg:10} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .map(|s| s.progress_chars("##-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(stage);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_skips_empty_placeholder_and_duplicate_reviews() {
        let values = vec![
            json!({"name": "Dr. Lee", "comment": "Great explanations"}),
            json!({"name": "Dr. Lee", "comment": "Great explanations", "quality": 5}),
            json!({"name": "Dr. Kim", "comment": "No comment"}),
            json!({"name": "Dr. Kim", "comment": ""}),
            json!({"comment": "nameless"}),
            json!({"name": "Dr. Kim", "comment": "Tough but fair"}),
        ];
        let (records, skipped) = select_reviews(&values);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Dr. Lee", "Dr. Kim"]);
        assert_eq!(skipped, 4);
    }
}
