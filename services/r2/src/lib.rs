//! Cloudflare R2 (S3-compatible) object storage signer and client.
//!
//! Requests are signed with `AWS4-HMAC-SHA256` in the `auto` region for the
//! `s3` service and sent to `https://{account_id}.r2.cloudflarestorage.com`.
//!
//! ## Example
//!
//! ```
//! use r2sign_core::time::parse_rfc3339;
//! use r2sign_core::Context;
//! use r2sign_r2::{ObjectMethod, RequestSigner, SignRequestInput, StorageConfig};
//!
//! # fn main() -> r2sign_core::Result<()> {
//! let signer = RequestSigner::new(StorageConfig::new("acct1", "ak", "secret", "b"));
//! let input = SignRequestInput::new(ObjectMethod::Put, "a b/c.txt")
//!     .with_body("hi")
//!     .with_content_type("text/plain")
//!     .with_timestamp(parse_rfc3339("2024-01-01T00:00:00Z")?);
//!
//! let signed = signer.sign(&Context::new(), &input)?;
//! assert_eq!(signed.url, "https://acct1.r2.cloudflarestorage.com/b/a%20b/c.txt");
//! assert!(signed.headers["Authorization"].starts_with("AWS4-HMAC-SHA256 Credential=ak/20240101/auto/s3/aws4_request"));
//! # Ok(())
//! # }
//! ```

mod client;
pub use client::ObjectClient;
pub use client::PutObjectOptions;
pub use client::PutObjectOutput;

mod config;
pub use config::StorageConfig;

mod constants;

mod sign_request;
pub use sign_request::generate_signing_key;
pub use sign_request::CanonicalRequest;
pub use sign_request::ObjectMethod;
pub use sign_request::RequestSigner;
pub use sign_request::SignRequestInput;
pub use sign_request::SignedRequest;

mod uri;
pub use uri::encode_key_path;
pub use uri::object_url;
pub use uri::parse_object_uri;
pub use uri::public_url;
