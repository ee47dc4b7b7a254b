//! records
//!
//! Call records served by the protected listing endpoint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::gateway::{Gateway, GatewayError};

/// Record identifier. The service uses numbers, but strings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One call record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: RecordId,

    #[serde(default)]
    pub caller: Option<String>,

    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CallRecord {
    /// Caller for display, or `-` when the record has none.
    pub fn caller_display(&self) -> &str {
        self.caller.as_deref().unwrap_or("-")
    }
}

/// Fetch all call records through the gateway.
pub async fn list_calls(
    gateway: &Gateway,
    server: &ServerConfig,
) -> Result<Vec<CallRecord>, GatewayError> {
    let records: Vec<CallRecord> = gateway.get_json(&server.records_path).await?;
    tracing::debug!(count = records.len(), "fetched call records");
    Ok(records)
}
