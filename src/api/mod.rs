use async_trait::async_trait;
use thiserror::Error;

use crate::models::StatementRecord;
use crate::schema::StatementType;

pub mod statement_client;
pub use statement_client::StatementClient;

/// Failure modes of a statement fetch. A successful call with zero records
/// is not an error; it is the "no data for this symbol" case and comes back
/// as `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of statement records, keyed by statement type and symbol.
#[async_trait]
pub trait StatementProvider {
    async fn fetch(
        &self,
        statement: StatementType,
        symbol: &str,
    ) -> Result<Vec<StatementRecord>, FetchError>;
}
