use super::*;
use crate::credentials::{CredentialProvider, Credentials};
use async_trait::async_trait;
use httpmock::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

struct StaticProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl CredentialProvider for StaticProvider {
    async fn fetch(&self) -> SourceResult<Credentials> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Credentials::new("AKIDEXAMPLE", "secret"))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

fn reader(server: &MockServer) -> (ObjectStoreReader, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = Arc::new(CredentialCache::new(
        Box::new(StaticProvider {
            calls: calls.clone(),
        }),
        chrono::Duration::seconds(3600),
    ));
    let reader =
        ObjectStoreReader::new(server.base_url(), "dsslambda", "us-east-1", cache).unwrap();
    (reader, calls)
}

#[test]
fn test_endpoint_must_be_http_url() {
    let cache = Arc::new(CredentialCache::new(
        Box::new(StaticProvider {
            calls: Arc::new(AtomicUsize::new(0)),
        }),
        chrono::Duration::seconds(60),
    ));
    let err = ObjectStoreReader::new("localhost:9000", "dsslambda", "us-east-1", cache)
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("[S007]"), "{err}");
}

#[tokio::test]
async fn test_read_sends_signed_path_style_get() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/dsslambda/latest.csv")
                .header_exists("authorization")
                .header_exists("x-amz-date")
                .header_exists("x-amz-content-sha256");
            then.status(200).body("node,ofd_week,final_tva\nA,1,10\n");
        })
        .await;

    let (reader, calls) = reader(&server);
    assert_eq!(reader.kind(), "object-store");
    let bytes = reader.read("latest.csv").await.unwrap();

    mock.assert_async().await;
    assert_eq!(bytes, b"node,ofd_week,final_tva\nA,1,10\n".to_vec());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // second read reuses cached credentials
    reader.read("latest.csv").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_forbidden_invalidates_credentials() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/dsslambda/prior.csv");
            then.status(403);
        })
        .await;

    let (reader, calls) = reader(&server);
    let err = reader.read("prior.csv").await.unwrap_err();
    assert!(matches!(err, SourceError::Http { status: 403, .. }));
    assert!(!err.is_not_found());

    reader.read("prior.csv").await.unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/dsslambda/missing.csv");
            then.status(404);
        })
        .await;

    let (reader, _calls) = reader(&server);
    let err = reader.read("missing.csv").await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("[S003]"));
}

#[tokio::test]
async fn test_credential_failure_skips_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200);
        })
        .await;

    let cache = Arc::new(CredentialCache::new(
        Box::new(crate::credentials::ChainedCredentialProvider::new(Vec::new())),
        chrono::Duration::seconds(60),
    ));
    let reader =
        ObjectStoreReader::new(server.base_url(), "dsslambda", "us-east-1", cache).unwrap();

    let err = reader.read("latest.csv").await.unwrap_err();
    assert!(matches!(err, SourceError::CredentialsUnavailable(_)));
    mock.assert_hits_async(0).await;
}
