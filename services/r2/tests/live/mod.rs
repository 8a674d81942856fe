use anyhow::Result;
use http::StatusCode;
use log::{debug, warn};
use pretty_assertions::assert_eq;
use r2sign_core::{Context, ErrorKind, OsEnv};
use r2sign_file_read_tokio::TokioFileRead;
use r2sign_http_send_reqwest::ReqwestHttpSend;
use r2sign_r2::{ObjectClient, PutObjectOptions};
use std::env;

/// Build a client against a real bucket when `R2SIGN_R2_TEST=on`.
///
/// Credentials come from the usual `R2_*` variables, `.env` included.
fn init_live_client() -> Option<ObjectClient> {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    if env::var("R2SIGN_R2_TEST").ok().as_deref() != Some("on") {
        return None;
    }

    let ctx = Context::new()
        .with_env(OsEnv)
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default());
    Some(ObjectClient::from_env(ctx).expect("R2_* env must be set"))
}

#[tokio::test]
async fn test_live_round_trip() -> Result<()> {
    let Some(client) = init_live_client() else {
        warn!("R2SIGN_R2_TEST is not set, skipped");
        return Ok(());
    };

    let key = "r2sign-test/round trip/蛋白 (1).txt";
    let body = "Hello, World!";

    let out = client
        .put(
            key,
            body,
            PutObjectOptions::default()
                .with_content_type("text/plain")
                .with_metadata("suite", "live"),
        )
        .await?;
    debug!("uploaded to {}", out.url);

    let content = client.get(key).await?;
    assert_eq!(content.as_ref(), body.as_bytes());

    client.delete(key).await?;
    // Second delete hits a missing object and must still succeed.
    client.delete(key).await?;
    Ok(())
}

#[tokio::test]
async fn test_live_get_missing_object() -> Result<()> {
    let Some(client) = init_live_client() else {
        warn!("R2SIGN_R2_TEST is not set, skipped");
        return Ok(());
    };

    let err = client
        .get("r2sign-test/not_exist_file")
        .await
        .expect_err("missing object must fail");
    assert_eq!(err.kind(), ErrorKind::DownloadFailed);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    Ok(())
}
