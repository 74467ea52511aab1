use serde_json::Value as Json;

use crate::{validate, wire::Envelope, CloudflareClient, Result};

/// KV keys may be up to 512 bytes, unlike the 32-character resource ids.
const MAX_KEY_LENGTH: usize = 512;

/// Workers KV value operations, scoped to an account and namespace.
#[derive(Clone, Debug)]
pub struct KvValue {
    client: CloudflareClient,
    account_id: String,
    namespace_id: String,
}

impl KvValue {
    pub fn new(
        client: CloudflareClient,
        account_id: impl Into<String>,
        namespace_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            account_id: account_id.into(),
            namespace_id: namespace_id.into(),
        }
    }

    /// Reads a value as text.
    ///
    /// Values are returned outside the standard envelope, so this goes
    /// through the pipeline's raw mode.
    pub async fn read(&self, key: Option<&str>) -> Result<String> {
        let key = validate::required("key", key)?;
        validate::max_length("key", key, MAX_KEY_LENGTH)?;
        self.client.get_raw(&self.value_path(key), ()).await
    }

    /// Writes a value.
    pub async fn write(&self, key: Option<&str>, value: Option<&Json>) -> Result<Envelope<Json>> {
        let key = validate::required("key", key)?;
        validate::max_length("key", key, MAX_KEY_LENGTH)?;
        let value = validate::required("value", value)?;
        self.client.put(&self.value_path(key), (), Some(value)).await
    }

    /// Deletes a value.
    pub async fn delete(&self, key: Option<&str>) -> Result<Envelope<Json>> {
        let key = validate::required("key", key)?;
        validate::max_length("key", key, MAX_KEY_LENGTH)?;
        self.client
            .delete(&self.value_path(key), (), None::<&Json>)
            .await
    }

    fn value_path(&self, key: &str) -> String {
        format!(
            "accounts/{}/storage/kv/namespaces/{}/values/{key}",
            self.account_id, self.namespace_id
        )
    }
}
