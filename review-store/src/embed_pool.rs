//! Batched embedding executor with bounded concurrency and dimension checks.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::{embed::EmbeddingsProvider, errors::StoreError};

/// Embeds `texts` in batches of `batch` with at most `concurrency` calls in flight.
///
/// `on_batch` is called with the batch size after each completed call.
///
/// # Errors
/// - [`StoreError::Embedding`] if a call fails or returns the wrong vector count
/// - [`StoreError::VectorSizeMismatch`] if vectors disagree on dimensionality
pub async fn embed_all<F>(
    texts: &[String],
    provider: &dyn EmbeddingsProvider,
    batch: usize,
    concurrency: usize,
    on_batch: F,
) -> Result<Vec<Vec<f32>>, StoreError>
where
    F: Fn(usize),
{
    info!(
        "embed_pool::embed_all: total={} batch={} concurrency={}",
        texts.len(),
        batch,
        concurrency
    );
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let chunks = texts.chunks(batch.max(1)).enumerate();
    let mut results: Vec<(usize, Vec<Vec<f32>>)> = stream::iter(chunks)
        .map(|(i, chunk)| async move {
            let v = provider.embed_batch(chunk).await?;
            if v.len() != chunk.len() {
                return Err(StoreError::Embedding(format!(
                    "expected {} vectors, got {}",
                    chunk.len(),
                    v.len()
                )));
            }
            Ok::<_, StoreError>((i, v))
        })
        .buffer_unordered(concurrency.max(1))
        .map(|r| {
            if let Ok((_, v)) = &r {
                on_batch(v.len());
            }
            r
        })
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, StoreError>>()?;

    results.sort_by_key(|(i, _)| *i);
    let out: Vec<Vec<f32>> = results.into_iter().flat_map(|(_, v)| v).collect();

    let want = out.first().map(Vec::len).unwrap_or(0);
    if want == 0 {
        return Err(StoreError::Embedding("provider returned empty vectors".into()));
    }
    if let Some(bad) = out.iter().find(|v| v.len() != want) {
        return Err(StoreError::VectorSizeMismatch {
            got: bad.len(),
            want,
        });
    }

    debug!("embed_pool::embed_all: {} vectors of dim {}", out.len(), want);
    Ok(out)
}
