use std::collections::HashMap;
use std::path::{Path, PathBuf};

use picking_planner::{LookupError, Point3D, Position, PositionSource};
use serde::Deserialize;
use tracing::info;

/// One row of the dataset file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionRecord {
    position_id: String,
    x: f64,
    y: f64,
    z: f64,
    product_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is not a JSON array of position records: {0}")]
    Parse(#[from] serde_json::Error),
}

/// In-memory position table loaded once and indexed by exact product id.
#[derive(Debug, Default)]
pub struct DatasetSource {
    by_product: HashMap<String, Vec<Position>>,
    records: usize,
}

impl DatasetSource {
    /// Read a JSON array of `{positionId, x, y, z, productId}` records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            records = dataset.records,
            products = dataset.by_product.len(),
            "Loaded position dataset"
        );
        Ok(dataset)
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let records: Vec<PositionRecord> = serde_json::from_str(raw)?;
        Ok(Self::from_records(records))
    }

    fn from_records(records: Vec<PositionRecord>) -> Self {
        let mut dataset = DatasetSource {
            records: records.len(),
            ..Default::default()
        };
        // File order is kept within each product; it breaks distance ties later.
        for record in records {
            dataset
                .by_product
                .entry(record.product_id)
                .or_default()
                .push(Position::new(
                    record.position_id,
                    Point3D::new(record.x, record.y, record.z),
                ));
        }
        dataset
    }

    /// Positions stored for `product_id`; empty if the id is unknown.
    pub fn lookup(&self, product_id: &str) -> Vec<Position> {
        self.by_product.get(product_id).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

impl PositionSource for DatasetSource {
    async fn positions(&self, product_id: &str) -> Result<Vec<Position>, LookupError> {
        Ok(self.lookup(product_id))
    }
}
