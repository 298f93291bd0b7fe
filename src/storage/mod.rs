//! S3-compatible object storage.
//!
//! Provides the client handed to services plus the startup bucket creation.
//! Credentials come straight from the process environment.

use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use thiserror::Error;

use crate::config::schema::ObjectStoreSettings;
use crate::config::validation::ConfigError;

/// Environment variable holding the access key.
pub const ACCESS_KEY_VAR: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret key.
pub const SECRET_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";

/// Region that rejects an explicit location constraint.
const DEFAULT_REGION: &str = "us-east-1";

/// Object storage errors.
#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("missing credential: {0} is not set")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create bucket {bucket}: {source}")]
    CreateBucket {
        bucket: String,
        source: CreateBucketError,
    },
}

/// Client bound to the configured bucket.
#[derive(Clone, Debug)]
pub struct ObjectStore {
    client: Client,
    bucket: String,
}

impl ObjectStore {
    /// Build a client from settings and environment credentials, then make
    /// sure the bucket exists.
    pub async fn connect(settings: &ObjectStoreSettings) -> Result<Self, ObjectStoreError> {
        settings.validate()?;
        let endpoint = settings.endpoint()?;
        let credentials = credentials_from_env()?;

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(endpoint.as_str().trim_end_matches('/'))
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        let store = Self {
            client: Client::from_conf(config),
            bucket: settings.bucket.clone(),
        };
        store.create_bucket(&settings.region).await?;

        tracing::info!(bucket = %store.bucket, endpoint = %endpoint, "Object store initialized");
        Ok(store)
    }

    /// Create the bucket in `region`. A bucket we already own counts as success.
    pub async fn create_bucket(&self, region: &str) -> Result<(), ObjectStoreError> {
        let result = self
            .client
            .create_bucket()
            .bucket(&self.bucket)
            .set_create_bucket_configuration(bucket_configuration(region))
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(bucket = %self.bucket, region, "Bucket created");
                Ok(())
            }
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_bucket_already_owned_by_you() {
                    tracing::debug!(bucket = %self.bucket, "Bucket already exists");
                    Ok(())
                } else {
                    Err(ObjectStoreError::CreateBucket {
                        bucket: self.bucket.clone(),
                        source: service_err,
                    })
                }
            }
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

fn bucket_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

fn credentials_from_env() -> Result<Credentials, ObjectStoreError> {
    let access_key =
        std::env::var(ACCESS_KEY_VAR).map_err(|_| ObjectStoreError::MissingCredential(ACCESS_KEY_VAR))?;
    let secret_key =
        std::env::var(SECRET_KEY_VAR).map_err(|_| ObjectStoreError::MissingCredential(SECRET_KEY_VAR))?;
    Ok(Credentials::new(access_key, secret_key, None, None, "service-base"))
}
