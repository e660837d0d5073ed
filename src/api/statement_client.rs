use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::models::{Config, StatementEnvelope, StatementRecord};
use crate::schema::StatementType;

use super::{FetchError, StatementProvider};

/// HTTP client for the statement API.
///
/// One GET per lookup: `<base>/<endpoint>?symbol=<SYMBOL>`. The symbol is
/// passed through verbatim; an empty symbol is a legal, if useless, query.
/// No retries and no request de-duplication happen here; the UI layer
/// guards against stale responses with a generation counter.
pub struct StatementClient {
    client: Client,
    base: Url,
}

impl StatementClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("statement-scope/0.1")
            .build()?;

        // A trailing slash makes Url::join treat the base as a directory.
        let mut base_str = config.api_base.clone();
        if !base_str.ends_with('/') {
            base_str.push('/');
        }
        let base = Url::parse(&base_str)?;

        Ok(Self { client, base })
    }

    fn endpoint_url(&self, statement: StatementType, symbol: &str) -> Result<Url, FetchError> {
        let mut url = self.base.join(statement.endpoint())?;
        url.query_pairs_mut().append_pair("symbol", symbol);
        Ok(url)
    }
}

#[async_trait]
impl StatementProvider for StatementClient {
    async fn fetch(
        &self,
        statement: StatementType,
        symbol: &str,
    ) -> Result<Vec<StatementRecord>, FetchError> {
        let url = self.endpoint_url(statement, symbol)?;
        debug!("fetching {} for '{}' from {}", statement.title(), symbol, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        let envelope: StatementEnvelope = serde_json::from_str(&body)?;
        let data = envelope.into_data();

        let schema = statement.schema();
        let mut records = Vec::with_capacity(data.len());
        for raw in &data {
            match StatementRecord::ingest(schema, raw) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!("dropping malformed {} record: {}", statement.title(), err);
                }
            }
        }

        debug!(
            "{} returned {} records for '{}'",
            statement.title(),
            records.len(),
            symbol
        );
        Ok(records)
    }
}
