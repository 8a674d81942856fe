use crate::sign_request::{ObjectMethod, RequestSigner, SignRequestInput};
use crate::uri::{parse_object_uri, public_url};
use crate::StorageConfig;
use bytes::Bytes;
use http::StatusCode;
use log::{debug, warn};
use r2sign_core::{Context, Error, Result};
use std::collections::BTreeMap;

/// Optional headers for an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutObjectOptions {
    /// `content-type`, `application/octet-stream` when unset.
    pub content_type: Option<String>,
    /// `cache-control`.
    pub cache_control: Option<String>,
    /// User metadata, sent as `x-amz-meta-{name}` headers.
    pub metadata: BTreeMap<String, String>,
}

impl PutObjectOptions {
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

    /// Add one metadata entry.
    pub fn with_metadata(mut self, k: impl Into<String>, v: impl Into<String>) -> Self {
        self.metadata.insert(k.into(), v.into());
        self
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectOutput {
    /// Key the object was stored under.
    pub key: String,
    /// Public url of the stored object.
    pub url: String,
}

/// ObjectClient uploads, downloads and deletes objects in one bucket.
///
/// Every request is signed right before it is dispatched through the
/// context's `HttpSend`, so a signature never outlives its request.
#[derive(Debug, Clone)]
pub struct ObjectClient {
    ctx: Context,
    signer: RequestSigner,
}

impl ObjectClient {
    /// Create a client with an explicit config.
    pub fn new(ctx: Context, config: StorageConfig) -> Self {
        Self {
            ctx,
            signer: RequestSigner::new(config),
        }
    }

    /// Create a client with config resolved from the context's environment.
    pub fn from_env(ctx: Context) -> Result<Self> {
        let config = StorageConfig::from_env(&ctx)?;
        Ok(Self::new(ctx, config))
    }

    /// The config this client signs with.
    pub fn config(&self) -> &StorageConfig {
        self.signer.config()
    }

    /// Public url for a key. No request is made.
    pub fn public_url(&self, key: &str) -> String {
        public_url(self.config(), key)
    }

    /// Upload `body` under `key`.
    ///
    /// Any non-2xx response becomes an `UploadFailed` error carrying the
    /// status and response text.
    pub async fn put(
        &self,
        key: &str,
        body: impl Into<Bytes>,
        opts: PutObjectOptions,
    ) -> Result<PutObjectOutput> {
        let body = body.into();
        let mut input = SignRequestInput::new(ObjectMethod::Put, key).with_body(body.clone());
        input.content_type = opts.content_type;
        input.cache_control = opts.cache_control;
        for (k, v) in opts.metadata {
            input
                .extra_headers
                .insert(format!("x-amz-meta-{}", k.to_lowercase()), v);
        }

        let resp = self.send(input, body).await?;
        if !resp.status().is_success() {
            return Err(Error::upload_failed(resp.status(), body_text(resp.body())));
        }

        Ok(PutObjectOutput {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    /// Upload a local file under `key`, read through the context's `FileRead`.
    pub async fn put_file(
        &self,
        path: &str,
        key: &str,
        opts: PutObjectOptions,
    ) -> Result<PutObjectOutput> {
        let content = self.ctx.file_read(path).await?;
        debug!("read {} bytes from {path} for upload", content.len());
        self.put(key, content, opts).await
    }

    /// Download the object stored under `key`.
    ///
    /// A missing object is an error like any other non-2xx response:
    /// `DownloadFailed` with status 404.
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let input = SignRequestInput::new(ObjectMethod::Get, key);

        let resp = self.send(input, Bytes::new()).await?;
        if !resp.status().is_success() {
            return Err(Error::download_failed(resp.status(), body_text(resp.body())));
        }

        Ok(resp.into_body())
    }

    /// Download an object addressed as `s3://{bucket}/{key}` or
    /// `r2://{bucket}/{key}`.
    ///
    /// The bucket must be the one this client is configured for, otherwise an
    /// `EncodingInvalid` error is returned and nothing is sent.
    pub async fn get_uri(&self, uri: &str) -> Result<Bytes> {
        let (bucket, key) = parse_object_uri(uri)?;
        if bucket != self.config().bucket() {
            return Err(Error::encoding_invalid(format!(
                "object uri {uri} names bucket {bucket}, but the client is bound to {}",
                self.config().bucket()
            )));
        }

        self.get(&key).await
    }

    /// Delete the object stored under `key`.
    ///
    /// Deleting a missing object succeeds.
    pub async fn delete(&self, key: &str) -> Result<()> {
        let input = SignRequestInput::new(ObjectMethod::Delete, key);

        let resp = self.send(input, Bytes::new()).await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            warn!("object {key} not found while deleting, treating as deleted");
            return Ok(());
        }
        if !status.is_success() {
            return Err(Error::delete_failed(status, body_text(resp.body())));
        }

        Ok(())
    }

    async fn send(&self, input: SignRequestInput, body: Bytes) -> Result<http::Response<Bytes>> {
        let method = input.method;
        let signed = self.signer.sign(&self.ctx, &input)?;
        debug!("sending {method} request to {}", signed.url);

        let req = signed.into_http_request(body)?;
        let resp = self.ctx.http_send(req).await?;
        debug!("{method} {} responded with {}", input.key, resp.status());

        Ok(resp)
    }
}

fn body_text(body: &Bytes) -> String {
    String::from_utf8_lossy(body).into_owned()
}
