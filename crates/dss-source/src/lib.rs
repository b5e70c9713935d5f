//! dss-source - Snapshot retrieval for DSS comparison
//!
//! Provides the [`SnapshotReader`] capability with a local filesystem reader
//! and an S3-compatible object store reader built on the AWS SDK, plus the
//! credential providers and the cache that feeds the reader.

pub mod cache;
pub mod credentials;
pub mod error;
pub mod local;
pub mod object_store;
pub mod traits;

pub use cache::{Clock, CredentialCache, SystemClock};
pub use credentials::{
    ChainedCredentialProvider, CredentialProvider, Credentials, EnvCredentialProvider,
    SecretFileProvider, SecretsManagerProvider,
};
pub use error::{SourceError, SourceResult};
pub use local::LocalFileReader;
pub use object_store::ObjectStoreReader;
pub use traits::SnapshotReader;
