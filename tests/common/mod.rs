//! Shared utilities for integration testing.

use std::path::{Path, PathBuf};

use service_base::config::{DatabaseSettings, Settings};

/// Path of a PEM fixture.
pub fn fixture(name: &str) -> String {
    let path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    path.to_string_lossy().into_owned()
}

/// Settings with every optional subsystem disabled and an ephemeral listen port.
pub fn minimal_settings() -> Settings {
    let mut settings = Settings::default();
    settings.database = DatabaseSettings {
        host: String::new(),
        port: 0,
        ..Default::default()
    };
    settings.http.listen_address = "127.0.0.1:0".to_string();
    settings
}

/// Minimal settings plus the signing key pair.
#[allow(dead_code)]
pub fn settings_with_keys() -> Settings {
    let mut settings = minimal_settings();
    settings.auth.private_key = fixture("signing_private.pem");
    settings.auth.public_key = fixture("signing_public.pem");
    settings
}
