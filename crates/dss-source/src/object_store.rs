//! S3-compatible object store reader

use crate::cache::CredentialCache;
use crate::error::{SourceError, SourceResult};
use crate::traits::SnapshotReader;
use async_trait::async_trait;
use aws_credential_types::provider::{self, future, ProvideCredentials};
use aws_sdk_s3::config::{BehaviorVersion, IdentityCache, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use std::sync::Arc;

/// Hands the SDK whatever the caller-owned cache currently holds
#[derive(Clone)]
struct CachedCredentials(Arc<CredentialCache>);

impl std::fmt::Debug for CachedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CachedCredentials").finish()
    }
}

impl ProvideCredentials for CachedCredentials {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(async move {
            let credentials = self
                .0
                .get()
                .await
                .map_err(provider::error::CredentialsError::provider_error)?;
            Ok(aws_credential_types::Credentials::new(
                credentials.access_key_id,
                credentials.secret_access_key,
                credentials.session_token,
                None,
                "dss-credential-cache",
            ))
        })
    }
}

/// Fetches objects from one bucket with path-style `GetObject` calls.
///
/// Locations passed to [`SnapshotReader::read`] are object keys. The SDK's
/// own identity cache is disabled so the [`CredentialCache`] decides when
/// credentials are refetched. A 401 or 403 response invalidates that cache
/// before the error is returned; the request itself is not retried.
pub struct ObjectStoreReader {
    client: aws_sdk_s3::Client,
    bucket: String,
    credentials: Arc<CredentialCache>,
}

impl ObjectStoreReader {
    pub fn new(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        region: impl Into<String>,
        credentials: Arc<CredentialCache>,
    ) -> SourceResult<Self> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(SourceError::InvalidEndpoint {
                endpoint,
                message: "expected an http:// or https:// URL".to_string(),
            });
        }

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .endpoint_url(endpoint.trim_end_matches('/'))
            .force_path_style(true)
            .identity_cache(IdentityCache::no_cache())
            .credentials_provider(CachedCredentials(credentials.clone()))
            .build();

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(config),
            bucket: bucket.into(),
            credentials,
        })
    }

    fn display_location(&self, key: &str) -> String {
        format!("{}/{}", self.bucket, key)
    }

    async fn request_error(&self, location: String, err: SdkError<GetObjectError>) -> SourceError {
        match err.raw_response().map(|response| response.status().as_u16()) {
            Some(status @ (401 | 403)) => {
                log::warn!("Object store rejected credentials ({}); invalidating cache", status);
                self.credentials.invalidate().await;
                SourceError::Http { location, status }
            }
            Some(status) => SourceError::Http { location, status },
            None => SourceError::Request {
                location,
                message: DisplayErrorContext(&err).to_string(),
            },
        }
    }
}

#[async_trait]
impl SnapshotReader for ObjectStoreReader {
    async fn read(&self, location: &str) -> SourceResult<Vec<u8>> {
        let display = self.display_location(location);
        // resolve up front so provider failures surface as S005
        self.credentials.get().await?;

        log::info!("Fetching {} from object store", display);
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(location.trim_start_matches('/'))
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => return Err(self.request_error(display, err).await),
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| SourceError::Request {
                location: display.clone(),
                message: e.to_string(),
            })?
            .into_bytes();
        log::debug!("Fetched {} bytes from {}", body.len(), display);
        Ok(body.to_vec())
    }

    fn kind(&self) -> &'static str {
        "object-store"
    }
}

#[cfg(test)]
#[path = "object_store_test.rs"]
mod tests;
