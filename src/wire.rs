use serde::Deserialize;

/// Standard Cloudflare v4 response envelope.
///
/// The pipeline decodes the envelope but does not interpret `success` or
/// `errors`; that is left to the caller.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// Entry of the envelope's `errors` / `messages` arrays.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ApiMessage {
    pub code: i64,
    pub message: String,
}

/// Pagination metadata attached to list responses.
///
/// Carried through verbatim; the pipeline never follows it to fetch
/// subsequent pages.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_count: u32,
}
