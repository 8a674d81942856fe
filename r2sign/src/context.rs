use r2sign_core::{Context, OsEnv, SystemClock};
use r2sign_file_read_tokio::TokioFileRead;
use r2sign_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;

/// Context backed by the process environment, a fresh reqwest client,
/// tokio file reading and the system clock.
pub fn default_context() -> Context {
    Context::new()
        .with_env(OsEnv)
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::new(Client::new()))
        .with_clock(SystemClock)
}

/// Object client over [`default_context`] with config read from `R2_*` variables.
#[cfg(feature = "r2")]
pub fn default_client() -> r2sign_core::Result<r2sign_r2::ObjectClient> {
    r2sign_r2::ObjectClient::from_env(default_context())
}
