use crate::constants::*;
use crate::uri::{encode_key_path, object_url};
use crate::StorageConfig;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use log::debug;
use r2sign_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use r2sign_core::time::{format_date, format_iso8601, DateTime};
use r2sign_core::{Context, Error, Result};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Write};

/// Http methods an object request can be signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectMethod {
    /// Download an object.
    Get,
    /// Upload an object.
    Put,
    /// Delete an object.
    Delete,
}

impl ObjectMethod {
    /// Upper-case method name as it appears in the canonical request.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectMethod::Get => "GET",
            ObjectMethod::Put => "PUT",
            ObjectMethod::Delete => "DELETE",
        }
    }
}

impl Display for ObjectMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ObjectMethod> for http::Method {
    fn from(m: ObjectMethod) -> Self {
        match m {
            ObjectMethod::Get => http::Method::GET,
            ObjectMethod::Put => http::Method::PUT,
            ObjectMethod::Delete => http::Method::DELETE,
        }
    }
}

/// Everything a single signing pass needs besides the config.
#[derive(Debug, Clone)]
pub struct SignRequestInput {
    /// Request method.
    pub method: ObjectMethod,
    /// Object key, not encoded.
    pub key: String,
    /// Exact bytes that will be sent. Empty for GET and DELETE.
    pub body: Bytes,
    /// `content-type`. PUT falls back to `application/octet-stream`.
    pub content_type: Option<String>,
    /// `cache-control`.
    pub cache_control: Option<String>,
    /// Extra signed headers such as object metadata. Names are lower-cased.
    pub extra_headers: BTreeMap<String, String>,
    /// Signing time. The context clock is used when absent.
    pub timestamp: Option<DateTime>,
}

impl SignRequestInput {
    /// Create an input with an empty body and no optional headers.
    pub fn new(method: ObjectMethod, key: impl Into<String>) -> Self {
        Self {
            method,
            key: key.into(),
            body: Bytes::new(),
            content_type: None,
            cache_control: None,
            extra_headers: BTreeMap::new(),
            timestamp: None,
        }
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Set `content-type`.
    pub fn with_content_type(mut self, v: impl Into<String>) -> Self {
        self.content_type = Some(v.into());
        self
    }

    /// Set `cache-control`.
    pub fn with_cache_control(mut self, v: impl Into<String>) -> Self {
        self.cache_control = Some(v.into());
        self
    }

    /// Add an extra signed header.
    pub fn with_header(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.extra_headers.insert(k.into(), v.into());
        self
    }

    /// Pin the signing time.
    pub fn with_timestamp(mut self, t: DateTime) -> Self {
        self.timestamp = Some(t);
        self
    }
}

/// Output of a signing pass: where to send and which headers to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Method the request was signed for.
    pub method: ObjectMethod,
    /// Full object url.
    pub url: String,
    /// Every signed header plus `Authorization`.
    ///
    /// Signed header names are lower-case. `Authorization` keeps its
    /// capitalized spelling, so case-sensitive lookups must use it as is.
    pub headers: BTreeMap<String, String>,
}

impl SignedRequest {
    /// Build an `http::Request` ready for an `HttpSend` implementation.
    ///
    /// `body` must be the same bytes that were hashed while signing.
    pub fn into_http_request(self, body: Bytes) -> Result<http::Request<Bytes>> {
        let mut req = http::Request::builder()
            .method(http::Method::from(self.method))
            .uri(self.url.as_str())
            .body(body)?;

        let headers = req.headers_mut();
        for (k, v) in self.headers {
            let name = HeaderName::from_bytes(k.as_bytes())?;
            let mut value = HeaderValue::from_str(&v)?;
            if name == http::header::AUTHORIZATION {
                value.set_sensitive(true);
            }
            headers.insert(name, value);
        }

        Ok(req)
    }
}

/// The canonical form of a request that gets hashed into the string to sign.
///
/// ```text
/// PUT
/// /bucket/a%20b/c.txt
///
/// content-type:text/plain
/// host:acct1.r2.cloudflarestorage.com
/// x-amz-content-sha256:8f43...
/// x-amz-date:20240101T000000Z
///
/// content-type;host;x-amz-content-sha256;x-amz-date
/// 8f43...
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest {
    headers: BTreeMap<String, String>,
    signed_headers: String,
    canonical: String,
}

impl CanonicalRequest {
    /// Build the canonical request.
    ///
    /// Header names are lower-cased and values trimmed. When two names only
    /// differ in case the later one wins. The query line is always empty.
    pub fn build<'a>(
        method: ObjectMethod,
        canonical_uri: &str,
        headers: impl IntoIterator<Item = (&'a str, &'a str)>,
        payload_hash: &str,
    ) -> Result<Self> {
        let headers: BTreeMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim().to_string()))
            .collect();
        let signed_headers = headers.keys().map(String::as_str).collect::<Vec<_>>().join(";");

        // 256 is specially chosen to avoid reallocation for most requests.
        let mut f = String::with_capacity(256);
        writeln!(f, "{method}")?;
        writeln!(f, "{canonical_uri}")?;
        // No query parameters are ever signed.
        writeln!(f)?;
        for (k, v) in headers.iter() {
            writeln!(f, "{k}:{v}")?;
        }
        writeln!(f)?;
        writeln!(f, "{signed_headers}")?;
        write!(f, "{payload_hash}")?;

        Ok(Self {
            headers,
            signed_headers,
            canonical: f,
        })
    }

    /// Canonical headers, sorted by name.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// `;` joined sorted header names.
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// The canonical request string.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Hex encoded SHA256 of the canonical request string.
    pub fn hash(&self) -> String {
        hex_sha256(self.canonical.as_bytes())
    }
}

/// Derive the signing key for `date_stamp` (`YYYYMMDD`) in the `auto` region
/// for the `s3` service.
pub fn generate_signing_key(secret: &str, date_stamp: &str) -> Vec<u8> {
    derive_signing_key(secret, date_stamp, REGION, SERVICE)
}

fn derive_signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), SCOPE_TERMINATOR.as_bytes())
}

/// Reject a header value that could never be sent, before it gets signed.
///
/// CR and LF would otherwise inject extra lines into the canonical headers.
fn checked_value(name: &str, value: &str) -> Result<String> {
    HeaderValue::from_str(value.trim()).map_err(|e| {
        Error::encoding_invalid(format!("header {name} has an invalid value")).with_source(e)
    })?;
    Ok(value.to_string())
}

/// RequestSigner signs object requests for one storage account.
///
/// Signing is pure: no I/O happens here and nothing is cached between calls,
/// so one signer can be shared across tasks freely.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    config: StorageConfig,
}

impl RequestSigner {
    /// Create a new signer for the given config.
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    /// The config this signer uses.
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Sign a request.
    ///
    /// The timestamp comes from `input.timestamp`, or the context clock when
    /// that is absent.
    pub fn sign(&self, ctx: &Context, input: &SignRequestInput) -> Result<SignedRequest> {
        let now = input.timestamp.unwrap_or_else(|| ctx.now());
        let amz_date = format_iso8601(now);
        let date_stamp = format_date(now);

        let encoded_key = encode_key_path(&input.key)?;
        let canonical_uri = format!("/{}/{}", self.config.bucket(), encoded_key);
        let payload_hash = hex_sha256(&input.body);
        let host = self.config.host();

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        headers.insert(HOST.to_string(), host);
        headers.insert(X_AMZ_CONTENT_SHA_256.to_string(), payload_hash.clone());
        headers.insert(X_AMZ_DATE.to_string(), amz_date.clone());

        let content_type = match (&input.content_type, input.method) {
            (Some(v), _) => Some(v.as_str()),
            (None, ObjectMethod::Put) => Some(DEFAULT_CONTENT_TYPE),
            (None, _) => None,
        };
        if let Some(v) = content_type {
            headers.insert(CONTENT_TYPE.to_string(), checked_value(CONTENT_TYPE, v)?);
        }
        if let Some(v) = &input.cache_control {
            headers.insert(CACHE_CONTROL.to_string(), checked_value(CACHE_CONTROL, v)?);
        }
        for (k, v) in &input.extra_headers {
            let k = k.to_lowercase();
            if matches!(k.as_str(), HOST | X_AMZ_CONTENT_SHA_256 | X_AMZ_DATE)
                || k == AUTHORIZATION.to_lowercase()
            {
                return Err(Error::encoding_invalid(format!(
                    "header {k} is computed by the signer and cannot be overridden"
                )));
            }
            HeaderName::from_bytes(k.as_bytes())?;
            let v = checked_value(&k, v)?;
            headers.insert(k, v);
        }

        let creq = CanonicalRequest::build(
            input.method,
            &canonical_uri,
            headers.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            &payload_hash,
        )?;
        debug!("calculated canonical request: {}", creq.as_str());

        // Scope: "20240101/auto/s3/aws4_request"
        let scope = format!("{date_stamp}/{REGION}/{SERVICE}/{SCOPE_TERMINATOR}");
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20240101T000000Z
        // 20240101/auto/s3/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "{ALGORITHM}")?;
            writeln!(f, "{amz_date}")?;
            writeln!(f, "{scope}")?;
            write!(f, "{}", creq.hash())?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(self.config.secret_access_key(), &date_stamp);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={}, Signature={signature}",
            self.config.access_key_id(),
            creq.signed_headers(),
        );

        let mut headers = creq.headers().clone();
        headers.insert(AUTHORIZATION.to_string(), authorization);

        Ok(SignedRequest {
            method: input.method,
            url: object_url(&self.config, &encoded_key),
            headers,
        })
    }
}
