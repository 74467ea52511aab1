use serde_json::Value as Json;

use crate::{validate, CloudflareClient, Query, Result};

/// Log retrieval operations, scoped to one zone.
///
/// These endpoints return newline-delimited JSON or plain text rather
/// than the standard envelope, so retrieval goes through the pipeline's
/// raw mode with gzip handled transparently.
#[derive(Clone, Debug)]
pub struct Logs {
    client: CloudflareClient,
    zone_id: String,
}

impl Logs {
    pub fn new(client: CloudflareClient, zone_id: impl Into<String>) -> Self {
        Self {
            client,
            zone_id: zone_id.into(),
        }
    }

    /// Retrieves received logs for an RFC 3339 time window.
    pub async fn received(
        &self,
        start: Option<&str>,
        end: Option<&str>,
        count: Option<u32>,
        fields: Option<&str>,
    ) -> Result<String> {
        let start = validate::required("start", start)?;
        validate::timestamp_rfc3339("start", start)?;
        if let Some(end) = end {
            validate::timestamp_rfc3339("end", end)?;
        }
        if let Some(count) = count {
            validate::range_check("count", count, Some(1), None)?;
        }
        let query = Query::new()
            .push("start", Some(start))
            .push("end", end)
            .push("count", count)
            .push("fields", fields);
        self.client
            .get_raw(&format!("zones/{}/logs/received", self.zone_id), query)
            .await
    }

    /// Unix-epoch variant of [`Logs::received`].
    pub async fn received_unix(
        &self,
        start: Option<i64>,
        end: Option<i64>,
        count: Option<u32>,
        fields: Option<&str>,
    ) -> Result<String> {
        let start = validate::required("start", start)?;
        validate::timestamp_unix("start", start)?;
        if let Some(end) = end {
            validate::timestamp_unix("end", end)?;
        }
        if let Some(count) = count {
            validate::range_check("count", count, Some(1), None)?;
        }
        let query = Query::new()
            .push("start", Some(start))
            .push("end", end)
            .push("count", count)
            .push("fields", fields);
        self.client
            .get_raw(&format!("zones/{}/logs/received", self.zone_id), query)
            .await
    }

    /// Lists the field names available to [`Logs::received`].
    pub async fn received_fields(&self) -> Result<Json> {
        self.client
            .get(&format!("zones/{}/logs/received/fields", self.zone_id), ())
            .await
    }
}
