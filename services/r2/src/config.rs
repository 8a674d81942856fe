use crate::constants::*;
use log::debug;
use r2sign_core::utils::Redact;
use r2sign_core::{Context, Error, Result};
use std::fmt::{Debug, Formatter};

/// Credentials and bucket identity for one storage account.
///
/// Resolved once at startup and never mutated afterwards. Every signing
/// pass reads it by reference.
#[derive(Clone, PartialEq, Eq)]
pub struct StorageConfig {
    account_id: String,
    access_key_id: String,
    secret_access_key: String,
    bucket: String,
    public_base_url: Option<String>,
}

impl Debug for StorageConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("account_id", &self.account_id)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("bucket", &self.bucket)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl StorageConfig {
    /// Create a config from explicit values.
    pub fn new(
        account_id: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket: bucket.into(),
            public_base_url: None,
        }
    }

    /// Set the public or CDN base url.
    ///
    /// Trailing `/` are stripped. An empty value clears it.
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let url = url.trim_end_matches('/');
        self.public_base_url = (!url.is_empty()).then(|| url.to_string());
        self
    }

    /// Resolve the config from the context's environment.
    ///
    /// Reads `R2_ACCOUNT_ID`, `R2_ACCESS_KEY_ID`, `R2_SECRET_ACCESS_KEY` and
    /// `R2_BUCKET_NAME`, all required, plus `R2_PUBLIC_BASE_URL` (falling back
    /// to `R2_CDN_BASE_URL`) which is optional.
    ///
    /// Returns a `ConfigInvalid` error naming the first required variable that
    /// is missing or empty.
    pub fn from_env(ctx: &Context) -> Result<Self> {
        let envs = ctx.env_vars();
        let require = |name: &str| -> Result<String> {
            match envs.get(name) {
                Some(v) if !v.is_empty() => Ok(v.clone()),
                _ => Err(Error::config_invalid(format!(
                    "missing environment variable: {name}"
                ))),
            }
        };

        let mut config = Self::new(
            require(R2_ACCOUNT_ID)?,
            require(R2_ACCESS_KEY_ID)?,
            require(R2_SECRET_ACCESS_KEY)?,
            require(R2_BUCKET_NAME)?,
        );

        let public_base_url = [R2_PUBLIC_BASE_URL, R2_CDN_BASE_URL]
            .iter()
            .filter_map(|name| envs.get(*name))
            .find(|v| !v.trim_end_matches('/').is_empty());
        if let Some(url) = public_base_url {
            config = config.with_public_base_url(url.as_str());
        }

        debug!("resolved storage config: {config:?}");
        Ok(config)
    }

    /// Account id, the first label of the storage host.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Access key id used in the credential scope.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub(crate) fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Bucket name, the first path segment of every object url.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public or CDN base url without trailing `/`.
    pub fn public_base_url(&self) -> Option<&str> {
        self.public_base_url.as_deref()
    }

    /// Storage host: `{account_id}.r2.cloudflarestorage.com`
    pub fn host(&self) -> String {
        format!("{}.{}", self.account_id, HOST_SUFFIX)
    }
}
