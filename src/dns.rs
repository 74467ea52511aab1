use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::{
    validate::{self, DEFAULT_MAX_LENGTH},
    wire::Envelope,
    CloudflareClient, Query, Result,
};

/// Record types accepted by the DNS endpoints.
pub const RECORD_TYPES: &[&str] = &[
    "A", "AAAA", "CNAME", "TXT", "SRV", "LOC", "MX", "NS", "SPF",
];

/// DNS record as returned inside the envelope's `result`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

#[derive(Debug, Serialize)]
struct WriteDnsRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'a str,
    name: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxied: Option<bool>,
}

/// DNS record operations, scoped to one zone.
#[derive(Clone, Debug)]
pub struct Dns {
    client: CloudflareClient,
    zone_id: String,
}

impl Dns {
    pub fn new(client: CloudflareClient, zone_id: impl Into<String>) -> Self {
        Self {
            client,
            zone_id: zone_id.into(),
        }
    }

    /// Lists records in the zone, optionally filtered.
    pub async fn list(
        &self,
        record_type: Option<&str>,
        name: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Envelope<Vec<DnsRecord>>> {
        if let Some(record_type) = record_type {
            validate::one_of("type", record_type, RECORD_TYPES)?;
        }
        let query = Query::new()
            .push("type", record_type)
            .push("name", name)
            .push("page", page)
            .push("per_page", per_page);
        self.client
            .get(&format!("zones/{}/dns_records", self.zone_id), query)
            .await
    }

    /// Creates a record. A `ttl` of 1 means "automatic".
    pub async fn create(
        &self,
        record_type: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
        ttl: Option<u32>,
        proxied: Option<bool>,
    ) -> Result<Envelope<DnsRecord>> {
        let record_type = validate::required("type", record_type)?;
        validate::one_of("type", record_type, RECORD_TYPES)?;
        let name = validate::required("name", name)?;
        let content = validate::required("content", content)?;
        if let Some(ttl) = ttl {
            check_ttl(ttl)?;
        }
        let body = WriteDnsRecord {
            record_type,
            name,
            content,
            ttl,
            proxied,
        };
        self.client
            .post(&format!("zones/{}/dns_records", self.zone_id), (), &body)
            .await
    }

    /// Replaces a record.
    pub async fn update(
        &self,
        record_id: &str,
        record_type: Option<&str>,
        name: Option<&str>,
        content: Option<&str>,
        ttl: Option<u32>,
        proxied: Option<bool>,
    ) -> Result<Envelope<DnsRecord>> {
        validate::max_length("record_id", record_id, DEFAULT_MAX_LENGTH)?;
        let record_type = validate::required("type", record_type)?;
        validate::one_of("type", record_type, RECORD_TYPES)?;
        let name = validate::required("name", name)?;
        let content = validate::required("content", content)?;
        if let Some(ttl) = ttl {
            check_ttl(ttl)?;
        }
        let body = WriteDnsRecord {
            record_type,
            name,
            content,
            ttl,
            proxied,
        };
        self.client
            .put(
                &format!("zones/{}/dns_records/{record_id}", self.zone_id),
                (),
                Some(&body),
            )
            .await
    }

    /// Deletes a record.
    pub async fn delete(&self, record_id: &str) -> Result<Envelope<Json>> {
        validate::max_length("record_id", record_id, DEFAULT_MAX_LENGTH)?;
        self.client
            .delete(
                &format!("zones/{}/dns_records/{record_id}", self.zone_id),
                (),
                None::<&Json>,
            )
            .await
    }
}

// 1 selects automatic TTL; anything else must be an explicit duration.
fn check_ttl(ttl: u32) -> Result<()> {
    if ttl == 1 {
        return Ok(());
    }
    validate::range_check("ttl", ttl, Some(120), Some(2_147_483_647))?;
    Ok(())
}
