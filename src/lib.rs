//! `cloudflare-v4-http` is an async HTTP client for the Cloudflare v4 REST API.
//!
//! The crate centers on a shared request pipeline: five verb methods on
//! [`CloudflareClient`] (`get`/`post`/`put`/`patch`/`delete`) that attach
//! authentication, encode JSON bodies, drop absent query parameters,
//! decompress gzip log payloads, and map non-success HTTP statuses onto a
//! typed error taxonomy. Resource wrappers such as [`Zone`] and [`Dns`]
//! validate their input with the [`validate`] helpers and delegate to the
//! pipeline, returning the decoded [`Envelope`] verbatim.

mod client;
mod credentials;
mod dns;
mod error;
mod kv;
mod logs;
mod params;
pub mod validate;
mod wire;
mod zone;

pub use client::{CloudflareClient, API_BASE_URL};
pub use credentials::Credentials;
pub use dns::{Dns, DnsRecord, RECORD_TYPES};
pub use error::{CloudflareError, ErrorKind, ResponseError, ValidationError};
pub use kv::KvValue;
pub use logs::Logs;
pub use params::Query;
pub use wire::{ApiMessage, Envelope, ResultInfo};
pub use zone::{Zone, ZONE_STATUSES};

pub type Result<T> = std::result::Result<T, CloudflareError>;
