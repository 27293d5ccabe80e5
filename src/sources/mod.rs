//! Position sources the planner can be fed from.

mod dataset;
mod remote;

pub use dataset::DatasetSource;
pub use remote::RemoteSource;

use anyhow::{Context, bail};
use picking_planner::{LookupError, Position, PositionSource};
use tracing::{info, warn};

use crate::settings::{Backend, LookupSettings};

/// The configured position source.
#[derive(Debug)]
pub enum Catalog {
    Dataset(DatasetSource),
    Remote(RemoteSource),
}

impl Catalog {
    pub fn from_settings(settings: &LookupSettings) -> anyhow::Result<Self> {
        match settings.backend {
            Backend::Dataset => {
                let dataset = DatasetSource::load(&settings.dataset_path).with_context(|| {
                    format!(
                        "failed to load position dataset from {}",
                        settings.dataset_path.display()
                    )
                })?;
                if dataset.is_empty() {
                    warn!("Position dataset is empty; every request will yield an empty route");
                } else {
                    info!(records = dataset.len(), "Using position dataset");
                }
                Ok(Catalog::Dataset(dataset))
            }
            Backend::Remote => {
                let Some(base_url) = settings.base_url.clone() else {
                    bail!("lookup.base_url is required when lookup.backend = \"remote\"");
                };
                if settings.api_key.is_none() {
                    warn!("No lookup.api_key configured; catalog requests are sent without a credential");
                }
                info!(%base_url, "Using remote position catalog");
                let remote = RemoteSource::new(base_url, settings.api_key.clone(), settings.timeout())
                    .context("failed to build catalog HTTP client")?;
                Ok(Catalog::Remote(remote))
            }
        }
    }
}

impl PositionSource for Catalog {
    async fn positions(&self, product_id: &str) -> Result<Vec<Position>, LookupError> {
        match self {
            Catalog::Dataset(dataset) => dataset.positions(product_id).await,
            Catalog::Remote(remote) => remote.positions(product_id).await,
        }
    }
}
