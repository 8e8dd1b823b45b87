use image::RgbaImage;
use rayon::prelude::*;

use crate::foundation::error::{CardError, CardResult};
use crate::render::pipeline::render;
use crate::scene::assets::CardAssets;
use crate::scene::params::CardParams;

/// Options controlling [`render_batch`].
#[derive(Clone, Copy, Debug)]
pub struct BatchOpts {
    /// Render items on a dedicated rayon pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

/// One card of a batch.
#[derive(Clone, Debug)]
pub struct BatchItem {
    /// Caller-chosen identifier, echoed in the report and in logs.
    pub id: String,
    /// Decoded inputs.
    pub assets: CardAssets,
    /// Render parameters.
    pub params: CardParams,
}

/// A successfully rendered batch item.
#[derive(Clone, Debug)]
pub struct RenderedCard {
    /// Identifier of the originating [`BatchItem`].
    pub id: String,
    /// Output image.
    pub image: RgbaImage,
}

/// A batch item that failed to render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedCard {
    /// Identifier of the originating [`BatchItem`].
    pub id: String,
    /// Display form of the error.
    pub error: String,
}

/// Outcome of a batch. Both lists keep input order.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    /// Rendered cards.
    pub cards: Vec<RenderedCard>,
    /// Skipped items.
    pub failed: Vec<FailedCard>,
}

impl BatchReport {
    /// Number of items the batch was given.
    pub fn total(&self) -> usize {
        self.cards.len() + self.failed.len()
    }
}

/// Render every item, skipping (and logging) the ones that fail.
///
/// The only error returned is a thread pool that cannot be built; per-item failures end up in
/// [`BatchReport::failed`].
#[tracing::instrument(skip_all, fields(items = items.len(), parallel = opts.parallel))]
pub fn render_batch(items: &[BatchItem], opts: BatchOpts) -> CardResult<BatchReport> {
    let results: Vec<CardResult<RgbaImage>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            items
                .par_iter()
                .map(|item| render(&item.assets, &item.params))
                .collect()
        })
    } else {
        items
            .iter()
            .map(|item| render(&item.assets, &item.params))
            .collect()
    };

    let mut report = BatchReport::default();
    for (item, result) in items.iter().zip(results) {
        match result {
            Ok(image) => report.cards.push(RenderedCard {
                id: item.id.clone(),
                image,
            }),
            Err(e) => {
                tracing::warn!(id = %item.id, error = %e, "card skipped");
                report.failed.push(FailedCard {
                    id: item.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    tracing::info!(
        rendered = report.cards.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

fn build_thread_pool(threads: Option<usize>) -> CardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CardError::config("batch 'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CardError::processing(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/session/batch.rs"]
mod tests;
