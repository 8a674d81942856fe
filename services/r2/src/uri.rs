//! Object key encoding and url building.

use crate::constants::KEY_SEGMENT_ENCODE_SET;
use crate::StorageConfig;
use percent_encoding::utf8_percent_encode;
use r2sign_core::{Error, Result};

/// Percent-encode an object key segment by segment, keeping `/` as separator.
///
/// The result is used verbatim both as the request path and as the canonical
/// uri, so the two can never disagree.
///
/// Keys are rejected with an `EncodingInvalid` error when they are empty,
/// contain CR or LF, contain an empty segment other than a trailing one, or
/// contain a `.` or `..` segment. Http clients normalize the last two away,
/// which would change the path after it has been signed.
pub fn encode_key_path(key: &str) -> Result<String> {
    if key.is_empty() {
        return Err(Error::encoding_invalid("object key must not be empty"));
    }
    if key.bytes().any(|b| b == b'\r' || b == b'\n') {
        return Err(Error::encoding_invalid(format!(
            "object key {key:?} must not contain control characters"
        )));
    }

    let segments: Vec<&str> = key.split('/').collect();
    // A trailing '/' marks a folder object and is allowed.
    let checked = if key.ends_with('/') {
        &segments[..segments.len() - 1]
    } else {
        &segments[..]
    };
    for segment in checked {
        match *segment {
            "" => {
                return Err(Error::encoding_invalid(format!(
                    "object key {key:?} contains an empty segment"
                )))
            }
            "." | ".." => {
                return Err(Error::encoding_invalid(format!(
                    "object key {key:?} contains a relative segment"
                )))
            }
            _ => {}
        }
    }

    Ok(encode_segments(key))
}

fn encode_segments(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, &KEY_SEGMENT_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Bucket-style url for an already encoded key:
/// `https://{account_id}.r2.cloudflarestorage.com/{bucket}/{encoded_key}`
pub fn object_url(config: &StorageConfig, encoded_key: &str) -> String {
    format!(
        "https://{}/{}/{}",
        config.host(),
        config.bucket(),
        encoded_key
    )
}

/// Stable public url for a key. Never signed.
///
/// Leading `/` are stripped from the key. With a public base url configured
/// this is `{public_base_url}/{key}`. Otherwise it falls back to the
/// bucket-style storage url with the key percent-encoded.
pub fn public_url(config: &StorageConfig, key: &str) -> String {
    let key = key.trim_start_matches('/');
    match config.public_base_url() {
        Some(base) => format!("{base}/{key}"),
        None => object_url(config, &encode_segments(key)),
    }
}

/// Split an `s3://bucket/key` or `r2://bucket/key` uri into bucket and key.
///
/// The key is empty when the uri names only a bucket.
pub fn parse_object_uri(uri: &str) -> Result<(String, String)> {
    let rest = ["s3://", "r2://"]
        .iter()
        .find_map(|scheme| uri.strip_prefix(scheme))
        .ok_or_else(|| Error::encoding_invalid(format!("unsupported object uri: {uri}")))?;

    let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
    if bucket.is_empty() {
        return Err(Error::encoding_invalid(format!(
            "object uri {uri} has no bucket"
        )));
    }

    Ok((bucket.to_string(), key.to_string()))
}
