use std::time::Duration;

use picking_planner::{LookupError, Position, PositionSource};
use tracing::debug;

/// Header carrying the catalog credential.
const API_KEY_HEADER: &str = "x-api-key";

/// Catalog service answering `GET {base_url}/{productId}/positions` with a
/// JSON array of positions.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RemoteSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(RemoteSource {
            client,
            base_url: base_url.into(),
            api_key,
        })
    }

    fn positions_url(&self, product_id: &str) -> String {
        format!(
            "{}/{}/positions",
            self.base_url.trim_end_matches('/'),
            product_id
        )
    }
}

impl PositionSource for RemoteSource {
    async fn positions(&self, product_id: &str) -> Result<Vec<Position>, LookupError> {
        let url = self.positions_url(product_id);
        debug!(%url, "Fetching product positions");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                product_id: product_id.to_owned(),
                status: status.as_u16(),
            });
        }

        response
            .json::<Vec<Position>>()
            .await
            .map_err(|e| LookupError::Decode(e.to_string()))
    }
}
