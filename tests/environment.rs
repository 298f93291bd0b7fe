//! Startup, run and teardown of the environment.

use std::time::Duration;

use service_base::auth::{KeyError, KeyKind};
use service_base::config::validation::ConfigError;
use service_base::database::{connect_options, DatabaseError};
use service_base::{Environment, InitError, Shutdown};
use sqlx::postgres::PgPoolOptions;

mod common;

#[tokio::test]
async fn test_minimal_settings_yield_empty_environment() {
    let env = Environment::new(common::minimal_settings()).await.unwrap();

    assert!(env.database.is_none());
    assert!(env.object_store.is_none());
    assert!(env.auth_public_key.is_none());
    assert!(env.auth_private_key.is_none());
    assert!(env.server.is_configured());
}

#[tokio::test]
async fn test_empty_bucket_needs_no_credentials() {
    let mut settings = common::minimal_settings();
    settings.object_store.url = "unreachable.invalid:1".into();
    settings.object_store.region = "nowhere".into();

    let env = Environment::new(settings).await.unwrap();
    assert!(env.object_store.is_none());
}

#[tokio::test]
async fn test_empty_listen_address_gives_bare_server() {
    let mut settings = common::minimal_settings();
    settings.http.listen_address.clear();

    let env = Environment::new(settings).await.unwrap();
    assert!(!env.server.is_configured());
}

#[tokio::test]
async fn test_database_without_user_fails_with_config_error() {
    let mut settings = common::minimal_settings();
    settings.database.host = "db.invalid".into();
    settings.database.port = 5432;
    settings.database.name = "app".into();
    settings.database.password = "secret".into();

    let err = Environment::new(settings).await.unwrap_err();
    assert!(matches!(
        err,
        InitError::Database(DatabaseError::Config(ConfigError::Missing("database user")))
    ));
    assert_eq!(err.to_string(), "database error: must specify database user");
}

#[tokio::test]
async fn test_keys_are_loaded_when_configured() {
    let env = Environment::new(common::settings_with_keys()).await.unwrap();
    assert!(env.auth_public_key.is_some());
    assert!(env.auth_private_key.is_some());
}

#[tokio::test]
async fn test_unreadable_private_key_aborts_startup() {
    let mut settings = common::settings_with_keys();
    settings.auth.private_key = common::fixture("missing.pem");

    let err = Environment::new(settings).await.unwrap_err();
    assert!(matches!(err, InitError::PrivateKey(KeyError::Read { .. })));
}

#[tokio::test]
async fn test_private_key_in_public_slot_is_rejected() {
    let mut settings = common::settings_with_keys();
    settings.auth.public_key = common::fixture("signing_private.pem");

    let err = Environment::new(settings).await.unwrap_err();
    assert!(matches!(
        err,
        InitError::PublicKey(KeyError::WrongKind { expected: KeyKind::Public, .. })
    ));
}

#[tokio::test]
async fn test_first_failure_wins() {
    // Database precedes the keys, so the bad key path is never read.
    let mut settings = common::settings_with_keys();
    settings.database.host = "db.invalid".into();
    settings.database.port = 5432;
    settings.auth.private_key = common::fixture("missing.pem");

    let err = Environment::new(settings).await.unwrap_err();
    assert!(matches!(err, InitError::Database(_)));
}

#[tokio::test]
async fn test_destroy_is_idempotent() {
    let mut env = Environment::new(common::minimal_settings()).await.unwrap();

    let mut db = env.settings.database.clone();
    db.host = "127.0.0.1".into();
    db.port = 1;
    db.name = "app".into();
    db.user = "app".into();
    db.password = "secret".into();
    let pool = PgPoolOptions::new().connect_lazy_with(connect_options(&db).unwrap());
    env.database = Some(pool.clone());

    env.destroy().await;
    assert!(env.database.is_none());
    assert!(pool.is_closed());

    env.destroy().await;
    assert!(env.database.is_none());
}

#[tokio::test]
#[should_panic(expected = "no public key set")]
async fn test_jwt_layer_without_public_key_panics() {
    let env = Environment::new(common::minimal_settings()).await.unwrap();
    let _ = env.jwt_layer();
}

#[tokio::test]
async fn test_run_blocks_until_shutdown() {
    let env = Environment::new(common::minimal_settings()).await.unwrap();
    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();

    let server = tokio::spawn(async move { env.run_until(&shutdown).await });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!server.is_finished(), "server returned before shutdown");

    trigger.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_shutdown_before_run_stops_immediately() {
    let env = Environment::new(common::minimal_settings()).await.unwrap();
    let shutdown = Shutdown::new();
    shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(2), env.run_until(&shutdown))
        .await
        .expect("run_until ignored a shutdown triggered before it started");
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_run_reports_address_in_use() {
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let mut settings = common::minimal_settings();
    settings.http.listen_address = occupied.local_addr().unwrap().to_string();

    let env = Environment::new(settings).await.unwrap();
    let err = env.run_until(&Shutdown::new()).await.unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::AddrInUse);
}
