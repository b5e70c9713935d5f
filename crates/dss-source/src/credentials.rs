//! Object store credentials and the providers that produce them
//!
//! Credential resolution mirrors how the portal is deployed: explicit
//! environment variables win, then the `DSSAccess`-style secret in Secrets
//! Manager, then a copy of that secret on disk.

use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_secretsmanager::config::Region;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use serde::Deserialize;
use std::path::PathBuf;

pub const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";
pub const REGION_VAR: &str = "AWS_REGION";

/// Access key pair used to sign object store requests
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    #[serde(rename = "AWS_ACCESS_KEY_ID")]
    pub access_key_id: String,

    #[serde(rename = "AWS_SECRET_ACCESS_KEY")]
    pub secret_access_key: String,

    #[serde(rename = "AWS_SESSION_TOKEN", default)]
    pub session_token: Option<String>,

    /// Region carried with the secret, if any
    #[serde(rename = "AWS_REGION", default)]
    pub region: Option<String>,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
            region: None,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("region", &self.region)
            .finish()
    }
}

/// Source of credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn fetch(&self) -> SourceResult<Credentials>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`
/// and `AWS_REGION` from the process environment
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialProvider;

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn fetch(&self) -> SourceResult<Credentials> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        match (var(ACCESS_KEY_ID_VAR), var(SECRET_ACCESS_KEY_VAR)) {
            (Some(access_key_id), Some(secret_access_key)) => Ok(Credentials {
                access_key_id,
                secret_access_key,
                session_token: var(SESSION_TOKEN_VAR),
                region: var(REGION_VAR),
            }),
            _ => Err(SourceError::CredentialsUnavailable(format!(
                "{} and {} are not set",
                ACCESS_KEY_ID_VAR, SECRET_ACCESS_KEY_VAR
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "env"
    }
}

/// Parse a secret string carrying the `AWS_*` keys
fn parse_secret(content: &str, name: &str) -> SourceResult<Credentials> {
    let credentials: Credentials =
        serde_json::from_str(content).map_err(|e| SourceError::SecretParse {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    if credentials.access_key_id.is_empty() || credentials.secret_access_key.is_empty() {
        return Err(SourceError::SecretParse {
            name: name.to_string(),
            message: "access key id and secret must not be empty".to_string(),
        });
    }
    Ok(credentials)
}

/// Reads the string value of a Secrets Manager secret.
///
/// The secret holds the same keys as the environment variables. Access to
/// Secrets Manager itself goes through the default AWS provider chain.
#[derive(Debug, Clone)]
pub struct SecretsManagerProvider {
    secret_id: String,
    region: String,
    client: Option<aws_sdk_secretsmanager::Client>,
}

impl SecretsManagerProvider {
    pub fn new(secret_id: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            region: region.into(),
            client: None,
        }
    }

    /// Use a preconfigured client instead of loading the default AWS config
    pub fn with_client(mut self, client: aws_sdk_secretsmanager::Client) -> Self {
        self.client = Some(client);
        self
    }

    async fn client(&self) -> aws_sdk_secretsmanager::Client {
        match &self.client {
            Some(client) => client.clone(),
            None => {
                let config = aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(self.region.clone()))
                    .load()
                    .await;
                aws_sdk_secretsmanager::Client::new(&config)
            }
        }
    }
}

#[async_trait]
impl CredentialProvider for SecretsManagerProvider {
    async fn fetch(&self) -> SourceResult<Credentials> {
        let output = self
            .client()
            .await
            .get_secret_value()
            .secret_id(&self.secret_id)
            .send()
            .await
            .map_err(|e| {
                SourceError::CredentialsUnavailable(format!(
                    "secret '{}': {}",
                    self.secret_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        let secret = output
            .secret_string()
            .ok_or_else(|| SourceError::SecretParse {
                name: self.secret_id.clone(),
                message: "secret has no string value".to_string(),
            })?;
        parse_secret(secret, &self.secret_id)
    }

    fn name(&self) -> &'static str {
        "secrets-manager"
    }
}

/// Reads a JSON secret document from disk
#[derive(Debug, Clone)]
pub struct SecretFileProvider {
    path: PathBuf,
}

impl SecretFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialProvider for SecretFileProvider {
    async fn fetch(&self) -> SourceResult<Credentials> {
        let path = self.path.display().to_string();
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::NotFound {
                    location: path.clone(),
                }
            } else {
                SourceError::Io {
                    location: path.clone(),
                    source: e,
                }
            }
        })?;
        parse_secret(&content, &path)
    }

    fn name(&self) -> &'static str {
        "secret-file"
    }
}

/// Tries providers in order and returns the first success
pub struct ChainedCredentialProvider {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl ChainedCredentialProvider {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl CredentialProvider for ChainedCredentialProvider {
    async fn fetch(&self) -> SourceResult<Credentials> {
        let mut failures = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            match provider.fetch().await {
                Ok(credentials) => {
                    log::debug!("Using credentials from {}", provider.name());
                    return Ok(credentials);
                }
                Err(e) => {
                    log::debug!("Credential provider {} failed: {}", provider.name(), e);
                    failures.push(format!("{}: {}", provider.name(), e));
                }
            }
        }
        if failures.is_empty() {
            failures.push("no providers configured".to_string());
        }
        Err(SourceError::CredentialsUnavailable(failures.join("; ")))
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}

#[cfg(test)]
#[path = "credentials_test.rs"]
mod tests;
