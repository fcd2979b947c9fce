use base64::Engine;

use voice_relay::cache::ArtifactCache;
use voice_relay::convert::{ConversionClient, Converter};
use voice_relay::{AudioArtifact, RelayError};

fn client_with_cache(root: &std::path::Path) -> ConversionClient {
    let cache = ArtifactCache::new(root).unwrap();
    ConversionClient::new("http://localhost:8787/convert", cache)
}

#[tokio::test]
async fn server_error_message_is_surfaced_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with_cache(dir.path());

    let err = client
        .process_response(500, br#"{"message":"bad audio"}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::ConversionServerError { .. }));
    assert_eq!(err.to_string(), "bad audio");
}

#[tokio::test]
async fn unparseable_error_body_falls_back_to_generic_message() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with_cache(dir.path());

    let err = client
        .process_response(502, b"<html>gateway timeout</html>")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "conversion service returned status 502");
}

#[tokio::test]
async fn error_body_without_message_falls_back_too() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with_cache(dir.path());

    let err = client
        .process_response(500, br#"{"code":17}"#)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "conversion service returned status 500");
}

#[tokio::test]
async fn success_without_audio_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with_cache(dir.path());

    let err = client
        .process_response(200, br#"{"status":"ok"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::ConversionMissingAudio));

    let err = client.process_response(200, b"not json").await.unwrap_err();
    assert!(matches!(err, RelayError::ConversionMissingAudio));
}

#[tokio::test]
async fn successful_response_is_decoded_into_a_cached_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with_cache(dir.path());

    let payload = base64::engine::general_purpose::STANDARD.encode([1u8, 2, 3, 4]);
    let body = format!(r#"{{"audio":"{}"}}"#, payload);

    let artifact = client
        .process_response(200, body.as_bytes())
        .await
        .unwrap();

    let path = std::path::Path::new(&artifact.locator);
    let name = path.file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("processed-") && name.ends_with(".wav"));
    assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(artifact.size_hint, Some(4));
}

#[tokio::test]
async fn invalid_base64_payload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with_cache(dir.path());

    let err = client
        .process_response(200, br#"{"audio":"@@not base64@@"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::ConversionInvalidAudio(_)));

    // Nothing was persisted to the cache
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_failure() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("recording-1.wav");
    std::fs::write(&source, b"RIFF").unwrap();

    let cache = ArtifactCache::new(dir.path().join("cache")).unwrap();
    // Port 1 is never listening
    let client = ConversionClient::new("http://127.0.0.1:1/convert", cache);

    let err = client
        .convert(&AudioArtifact::from_path(&source))
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::ConversionNetworkFailure(_)));
}

#[tokio::test]
async fn missing_source_file_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let cache = ArtifactCache::new(dir.path()).unwrap();
    let client = ConversionClient::new("http://127.0.0.1:1/convert", cache);

    let err = client
        .convert(&AudioArtifact::new("/nonexistent/recording.wav"))
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::ConversionNetworkFailure(_)));
}
