use crate::{init_mock_client, RecordingHttpSend};
use anyhow::Result;
use http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use r2sign_core::hash::EMPTY_SHA256;
use r2sign_core::{Context, ErrorKind, StaticEnv};
use r2sign_r2::{ObjectClient, PutObjectOptions, StorageConfig};
use std::collections::HashMap;
use std::io::Write;

#[tokio::test]
async fn test_put_sends_signed_request() -> Result<()> {
    let http = RecordingHttpSend::default();
    let client = init_mock_client(http.clone());

    let out = client
        .put(
            "a b/c.txt",
            "hi",
            PutObjectOptions::default().with_content_type("text/plain"),
        )
        .await?;
    assert_eq!(out.key, "a b/c.txt");
    assert_eq!(
        out.url,
        "https://acct1.r2.cloudflarestorage.com/b/a%20b/c.txt"
    );

    let reqs = http.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method, Method::PUT);
    assert_eq!(
        req.uri.to_string(),
        "https://acct1.r2.cloudflarestorage.com/b/a%20b/c.txt"
    );
    assert_eq!(req.body.as_ref(), b"hi");
    assert_eq!(req.headers["content-type"], "text/plain");
    assert_eq!(req.headers["x-amz-date"], "20240101T000000Z");
    assert_eq!(
        req.headers["x-amz-content-sha256"],
        "8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4"
    );
    assert_eq!(
        req.headers["authorization"],
        "AWS4-HMAC-SHA256 Credential=ak/20240101/auto/s3/aws4_request, \
         SignedHeaders=content-type;host;x-amz-content-sha256;x-amz-date, \
         Signature=038d0e526fd184efc759ae5c2e2689369e9e6e4b435bd6afd90ed7c9b9889689"
    );
    Ok(())
}

#[tokio::test]
async fn test_put_signs_optional_headers_and_metadata() -> Result<()> {
    let http = RecordingHttpSend::default();
    let client = init_mock_client(http.clone());

    client
        .put(
            "jobs/42/model.pdb",
            vec![1u8, 2, 3],
            PutObjectOptions::default()
                .with_cache_control("public, max-age=60")
                .with_metadata("Job-Id", "42"),
        )
        .await?;

    let req = &http.requests()[0];
    assert_eq!(req.headers["content-type"], "application/octet-stream");
    assert_eq!(req.headers["cache-control"], "public, max-age=60");
    assert_eq!(req.headers["x-amz-meta-job-id"], "42");
    let auth = req.headers["authorization"].to_str()?;
    assert!(
        auth.contains("SignedHeaders=cache-control;content-type;host;x-amz-content-sha256;x-amz-date;x-amz-meta-job-id,"),
        "{auth}"
    );
    Ok(())
}

#[tokio::test]
async fn test_put_uses_public_base_url() -> Result<()> {
    let config = StorageConfig::new("acct1", "ak", "secret", "b")
        .with_public_base_url("https://cdn.example.com/");
    let client = ObjectClient::new(
        Context::new().with_http_send(RecordingHttpSend::default()),
        config,
    );

    let out = client
        .put("renders/x.png", "png", PutObjectOptions::default())
        .await?;
    assert_eq!(out.url, "https://cdn.example.com/renders/x.png");
    Ok(())
}

#[tokio::test]
async fn test_put_failure_carries_status_and_body() {
    let http = RecordingHttpSend::default().respond(StatusCode::FORBIDDEN, "SignatureDoesNotMatch");
    let client = init_mock_client(http);

    let err = client
        .put("k", "v", PutObjectOptions::default())
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), ErrorKind::UploadFailed);
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
    assert_eq!(err.response_body(), Some("SignatureDoesNotMatch"));
    assert!(err.to_string().contains("403"), "{err}");
}

#[tokio::test]
async fn test_get_returns_body() -> Result<()> {
    let http = RecordingHttpSend::default().respond(StatusCode::OK, "ATOM      1  N");
    let client = init_mock_client(http.clone());

    let content = client.get("a b/c.txt").await?;
    assert_eq!(content.as_ref(), b"ATOM      1  N");

    let req = &http.requests()[0];
    assert_eq!(req.method, Method::GET);
    assert!(req.body.is_empty());
    assert!(req.headers.get("content-type").is_none());
    assert_eq!(req.headers["x-amz-content-sha256"], EMPTY_SHA256);
    assert_eq!(
        req.headers["authorization"],
        "AWS4-HMAC-SHA256 Credential=ak/20240101/auto/s3/aws4_request, \
         SignedHeaders=host;x-amz-content-sha256;x-amz-date, \
         Signature=d4db4cc9bd8f0dba0b4769485b5ca3efa6f73944cc5eef71124d24f82dc142a1"
    );
    Ok(())
}

#[tokio::test]
async fn test_get_missing_object_fails() {
    let http = RecordingHttpSend::default().respond(StatusCode::NOT_FOUND, "NoSuchKey");
    let client = init_mock_client(http);

    let err = client.get("missing").await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::DownloadFailed);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(err.response_body(), Some("NoSuchKey"));
}

#[tokio::test]
async fn test_get_uri() -> Result<()> {
    let http = RecordingHttpSend::default()
        .respond(StatusCode::OK, "ATOM")
        .respond(StatusCode::OK, "HETATM");
    let client = init_mock_client(http.clone());

    assert_eq!(client.get_uri("r2://b/a b/c.txt").await?.as_ref(), b"ATOM");
    assert_eq!(client.get_uri("s3://b/jobs/42.pdb").await?.as_ref(), b"HETATM");

    let reqs = http.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].method, Method::GET);
    assert_eq!(reqs[0].uri.path(), "/b/a%20b/c.txt");
    assert_eq!(reqs[1].uri.path(), "/b/jobs/42.pdb");
    Ok(())
}

#[tokio::test]
async fn test_get_uri_rejects_without_sending() {
    let http = RecordingHttpSend::default();
    let client = init_mock_client(http.clone());

    for uri in [
        "r2://other/a.pdb",
        "s3://b",
        "https://example.com/b/a.pdb",
    ] {
        let err = client.get_uri(uri).await.expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::EncodingInvalid, "{uri}");
    }
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_delete() -> Result<()> {
    let http = RecordingHttpSend::default().respond(StatusCode::NO_CONTENT, "");
    let client = init_mock_client(http.clone());

    client.delete("jobs/42/model.pdb").await?;

    let req = &http.requests()[0];
    assert_eq!(req.method, Method::DELETE);
    assert_eq!(req.uri.path(), "/b/jobs/42/model.pdb");
    Ok(())
}

#[tokio::test]
async fn test_delete_missing_object_succeeds() -> Result<()> {
    let http = RecordingHttpSend::default()
        .respond(StatusCode::NOT_FOUND, "NoSuchKey")
        .respond(StatusCode::NOT_FOUND, "NoSuchKey");
    let client = init_mock_client(http.clone());

    client.delete("gone").await?;
    client.delete("gone").await?;
    assert_eq!(http.requests().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_delete_failure() {
    let http =
        RecordingHttpSend::default().respond(StatusCode::INTERNAL_SERVER_ERROR, "InternalError");
    let client = init_mock_client(http);

    let err = client.delete("k").await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::DeleteFailed);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_put_file() -> Result<()> {
    let mut f = tempfile::NamedTempFile::new()?;
    f.write_all(b"HEADER    PROTEIN\n")?;
    let path = f.path().to_string_lossy().to_string();

    let http = RecordingHttpSend::default();
    let client = init_mock_client(http.clone());

    let out = client
        .put_file(&path, "uploads/p.pdb", PutObjectOptions::default())
        .await?;
    assert_eq!(out.key, "uploads/p.pdb");

    let req = &http.requests()[0];
    assert_eq!(req.body.as_ref(), b"HEADER    PROTEIN\n");
    Ok(())
}

#[tokio::test]
async fn test_put_file_missing_sends_nothing() {
    let http = RecordingHttpSend::default();
    let client = init_mock_client(http.clone());

    let err = client
        .put_file("/definitely/not/here.pdb", "k", PutObjectOptions::default())
        .await
        .expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_invalid_key_sends_nothing() {
    let http = RecordingHttpSend::default();
    let client = init_mock_client(http.clone());

    let err = client.get("a/../b").await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::EncodingInvalid);
    assert!(http.requests().is_empty());
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let client = ObjectClient::new(
        Context::new(),
        StorageConfig::new("acct1", "ak", "secret", "b"),
    );

    let err = client.get("k").await.expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(!err.is_response_error());
}

#[test]
fn test_from_env_missing_config() {
    let ctx = Context::new().with_env(StaticEnv {
        envs: HashMap::from([("R2_ACCOUNT_ID".to_string(), "acct1".to_string())]),
    });

    let err = ObjectClient::from_env(ctx).expect_err("must fail");
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.to_string().contains("R2_ACCESS_KEY_ID"), "{err}");
}
