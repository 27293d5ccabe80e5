//! Concurrent position lookup that preserves sequential collect order.
//!
//! Lookups for distinct products are independent, so they run as separate
//! tokio tasks. Results are put back in request order before the planner sees
//! them, since that order breaks distance ties. A failing or slow lookup costs
//! only its own product: it is logged and treated as having no positions.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::types::{Candidate, Position};

/// Default per-lookup deadline.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Default number of lookups allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Why a position lookup produced no answer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LookupError {
    /// The backing store could not be reached.
    #[error("position source unavailable: {0}")]
    Unavailable(String),
    /// The backing store answered with a non-success status.
    #[error("position source returned status {status} for product {product_id}")]
    Status {
        /// Product whose lookup was rejected.
        product_id: String,
        /// HTTP status code of the answer.
        status: u16,
    },
    /// The answer could not be decoded into positions.
    #[error("could not decode positions: {0}")]
    Decode(String),
}

/// Something that can resolve a product id to its candidate positions.
pub trait PositionSource: Send + Sync + 'static {
    /// Candidate positions of `product_id`, in source order.
    fn positions(
        &self,
        product_id: &str,
    ) -> impl Future<Output = Result<Vec<Position>, LookupError>> + Send;
}

/// Knobs for [`collect_candidates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    /// Deadline for a single product lookup.
    pub lookup_timeout: Duration,
    /// Maximum number of lookups in flight. Zero is treated as one.
    pub max_concurrency: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Look up one product, mapping every failure to "no positions".
pub async fn resolve<S: PositionSource>(
    source: &S,
    product_id: &str,
    timeout: Duration,
) -> Vec<Position> {
    match tokio::time::timeout(timeout, source.positions(product_id)).await {
        Ok(Ok(positions)) => {
            debug!(product_id, count = positions.len(), "Resolved product positions");
            positions
        }
        Ok(Err(e)) => {
            warn!(product_id, error = %e, "Position lookup failed; product contributes no positions");
            Vec::new()
        }
        Err(_) => {
            warn!(
                product_id,
                timeout_ms = timeout.as_millis() as u64,
                "Position lookup timed out; product contributes no positions"
            );
            Vec::new()
        }
    }
}

/// Resolve every product concurrently and return the tagged candidates in
/// request order.
///
/// The returned order is exactly what a sequential loop over `products`
/// would produce. Dropping the returned future aborts every lookup still in
/// flight, so a cancelled request never produces a partial candidate set.
pub async fn collect_candidates<S: PositionSource>(
    source: Arc<S>,
    products: &[String],
    options: &CollectOptions,
) -> Vec<Candidate> {
    let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, product_id) in products.iter().enumerate() {
        let source = Arc::clone(&source);
        let permits = Arc::clone(&permits);
        let product_id = product_id.clone();
        let timeout = options.lookup_timeout;
        tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only fails on shutdown.
            let _permit = permits.acquire_owned().await.ok();
            let positions = resolve(source.as_ref(), &product_id, timeout).await;
            (index, positions)
        });
    }

    let mut slots: Vec<Vec<Position>> = vec![Vec::new(); products.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, positions)) => slots[index] = positions,
            Err(e) => {
                warn!(error = %e, "Position lookup task did not complete; product contributes no positions");
            }
        }
    }

    products
        .iter()
        .zip(slots)
        .flat_map(|(product_id, positions)| {
            positions
                .into_iter()
                .map(move |position| Candidate::new(product_id.as_str(), position))
        })
        .collect()
}
