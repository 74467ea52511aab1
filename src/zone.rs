use serde_json::{json, Value as Json};

use crate::{
    error::ValidationError,
    validate::{self, JsonKind, DEFAULT_MAX_LENGTH},
    wire::Envelope,
    CloudflareClient, Query, Result,
};

/// Statuses accepted by the zone list filter.
pub const ZONE_STATUSES: &[&str] = &[
    "active",
    "pending",
    "initializing",
    "moved",
    "deleted",
    "deactivated",
    "read only",
];

/// Zone operations.
///
/// Holds a clone of the shared client; validation happens before the
/// single pipeline call and the decoded envelope is returned verbatim.
#[derive(Clone, Debug)]
pub struct Zone {
    client: CloudflareClient,
}

impl Zone {
    pub fn new(client: CloudflareClient) -> Self {
        Self { client }
    }

    /// Lists zones. `page`/`per_page` pass through verbatim; `result_info`
    /// is never followed.
    pub async fn list(
        &self,
        name: Option<&str>,
        status: Option<&str>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> Result<Envelope<Json>> {
        if let Some(status) = status {
            validate::one_of("status", status, ZONE_STATUSES)?;
        }
        let query = Query::new()
            .push("name", name)
            .push("status", status)
            .push("page", page)
            .push("per_page", per_page);
        self.client.get("zones", query).await
    }

    /// Creates a zone.
    pub async fn create(
        &self,
        name: Option<&str>,
        organization: Option<&Json>,
        jump_start: Option<bool>,
    ) -> Result<Envelope<Json>> {
        let name = validate::required("name", name)?;
        let mut body = serde_json::Map::new();
        body.insert("name".to_owned(), json!(name));
        if let Some(organization) = organization {
            validate::type_check("organization", organization, JsonKind::Object)?;
            body.insert("organization".to_owned(), organization.clone());
        }
        if let Some(jump_start) = jump_start {
            body.insert("jump_start".to_owned(), json!(jump_start));
        }
        self.client.post("zones", (), &Json::Object(body)).await
    }

    /// Fetches details for one zone.
    pub async fn details(&self, zone_id: &str) -> Result<Envelope<Json>> {
        validate::max_length("zone_id", zone_id, DEFAULT_MAX_LENGTH)?;
        self.client.get(&format!("zones/{zone_id}"), ()).await
    }

    /// Deletes a zone.
    pub async fn delete(&self, zone_id: &str) -> Result<Envelope<Json>> {
        validate::max_length("zone_id", zone_id, DEFAULT_MAX_LENGTH)?;
        self.client
            .delete(&format!("zones/{zone_id}"), (), None::<&Json>)
            .await
    }

    /// Purges files or cache tags from the zone cache.
    ///
    /// At least one of `files`/`tags` must be given, and whichever is
    /// given must be non-empty.
    pub async fn purge_cache(
        &self,
        zone_id: &str,
        files: Option<&[String]>,
        tags: Option<&[String]>,
    ) -> Result<Envelope<Json>> {
        validate::max_length("zone_id", zone_id, DEFAULT_MAX_LENGTH)?;
        if files.is_none() && tags.is_none() {
            return Err(ValidationError::MissingArgument {
                field: "files or tags".to_owned(),
            }
            .into());
        }
        let mut body = serde_json::Map::new();
        if let Some(files) = files {
            validate::non_empty_array("files", files)?;
            body.insert("files".to_owned(), json!(files));
        }
        if let Some(tags) = tags {
            validate::non_empty_array("tags", tags)?;
            body.insert("tags".to_owned(), json!(tags));
        }
        self.client
            .delete(
                &format!("zones/{zone_id}/purge_cache"),
                (),
                Some(&Json::Object(body)),
            )
            .await
    }
}
