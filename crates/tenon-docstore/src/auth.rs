//! Master-key request signing for the Cosmos DB REST API.
//!
//! Each request carries an `Authorization` header of the form
//! `type=master&ver=1.0&sig=<signature>` where the signature is the
//! HMAC-SHA256 of the lowercased verb, the resource type, the resource link
//! and the lowercased RFC 1123 request date, keyed by the base64-decoded
//! account master key. The whole header value is percent-encoded.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{DocStoreError, DocStoreResult};

type HmacSha256 = Hmac<Sha256>;

/// Current UTC time as a lowercased RFC 1123 date string.
///
/// The same string is used both as the `x-ms-date` header and inside the
/// signature payload; the service lowercases the date before verifying, so
/// we lowercase up front.
pub(crate) fn request_date() -> String {
    Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
        .to_lowercase()
}

/// Build the `Authorization` header value for one request.
///
/// `resource_link` is the path of the addressed resource without a leading
/// slash (`dbs/mydb/colls/mycoll/docs/doc1`), or the parent feed link for
/// feed-level operations like create and query.
pub(crate) fn auth_header(
    master_key_b64: &str,
    verb: &str,
    resource_type: &str,
    resource_link: &str,
    date: &str,
) -> DocStoreResult<String> {
    let key = BASE64
        .decode(master_key_b64)
        .map_err(|e| DocStoreError::Config(format!("master key is not valid base64: {e}")))?;

    let payload = format!(
        "{}\n{}\n{}\n{}\n\n",
        verb.to_lowercase(),
        resource_type,
        resource_link,
        date
    );

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| DocStoreError::Config(format!("master key unusable for HMAC: {e}")))?;
    mac.update(payload.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    let header = format!("type=master&ver=1.0&sig={signature}");
    Ok(urlencoding::encode(&header).into_owned())
}
