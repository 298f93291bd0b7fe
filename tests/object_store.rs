//! Object store startup against a local S3 stand-in.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::put;
use axum::Router;
use service_base::storage::{ObjectStoreError, ACCESS_KEY_VAR, SECRET_KEY_VAR};
use service_base::{Environment, InitError, Settings};
use tokio::sync::Mutex;

mod common;

/// Credentials are process-wide; tests touching them take turns.
static ENV_LOCK: Mutex<()> = Mutex::const_new(());

const BUCKET: &str = "uploads";

const ALREADY_OWNED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>BucketAlreadyOwnedByYou</Code><Message>Your previous request to create the named bucket succeeded and you already own it.</Message><BucketName>uploads</BucketName><RequestId>1</RequestId></Error>"#;

const ALREADY_EXISTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Error><Code>BucketAlreadyExists</Code><Message>The requested bucket name is not available.</Message><BucketName>uploads</BucketName><RequestId>2</RequestId></Error>"#;

/// Serve a fixed reply to `PUT /uploads` on an ephemeral port.
async fn stub_s3(status: StatusCode, body: &'static str) -> SocketAddr {
    let reply = move || async move { (status, [("content-type", "application/xml")], body) };
    let app = Router::new()
        .route("/uploads", put(reply.clone()))
        .route("/uploads/", put(reply));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn storage_settings(addr: SocketAddr) -> Settings {
    let mut settings = common::minimal_settings();
    settings.object_store.url = addr.to_string();
    settings.object_store.region = "us-east-1".into();
    settings.object_store.bucket = BUCKET.into();
    settings.object_store.disable_ssl = true;
    settings
}

fn set_credentials() {
    std::env::set_var(ACCESS_KEY_VAR, "test-access");
    std::env::set_var(SECRET_KEY_VAR, "test-secret");
}

#[tokio::test]
async fn test_missing_access_key_aborts_startup() {
    let _guard = ENV_LOCK.lock().await;
    std::env::remove_var(ACCESS_KEY_VAR);
    std::env::set_var(SECRET_KEY_VAR, "test-secret");

    let mut settings = common::minimal_settings();
    settings.object_store.bucket = BUCKET.into();

    let err = Environment::new(settings).await.unwrap_err();
    assert!(matches!(
        err,
        InitError::ObjectStore(ObjectStoreError::MissingCredential("AWS_ACCESS_KEY_ID"))
    ));
    assert!(err.to_string().starts_with("object store error:"));
}

#[tokio::test]
async fn test_bucket_is_created() {
    let _guard = ENV_LOCK.lock().await;
    set_credentials();
    let addr = stub_s3(StatusCode::OK, "").await;

    let env = Environment::new(storage_settings(addr)).await.unwrap();
    let store = env.object_store.as_ref().unwrap();
    assert_eq!(store.bucket(), BUCKET);
}

#[tokio::test]
async fn test_bucket_already_owned_counts_as_created() {
    let _guard = ENV_LOCK.lock().await;
    set_credentials();
    let addr = stub_s3(StatusCode::CONFLICT, ALREADY_OWNED).await;

    let env = Environment::new(storage_settings(addr)).await.unwrap();
    assert!(env.object_store.is_some());
}

#[tokio::test]
async fn test_bucket_owned_elsewhere_aborts_startup() {
    let _guard = ENV_LOCK.lock().await;
    set_credentials();
    let addr = stub_s3(StatusCode::CONFLICT, ALREADY_EXISTS).await;

    let err = Environment::new(storage_settings(addr)).await.unwrap_err();
    match err {
        InitError::ObjectStore(ObjectStoreError::CreateBucket { bucket, source }) => {
            assert_eq!(bucket, BUCKET);
            assert!(source.is_bucket_already_exists());
        }
        other => panic!("unexpected error: {other}"),
    }
}
