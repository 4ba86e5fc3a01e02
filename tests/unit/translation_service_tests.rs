/*!
 * Tests for the translation service, retry policy and batch prompt format
 */

use std::sync::Arc;

use vttranslate::errors::{ProviderError, TranslationError};
use vttranslate::providers::gemini::{build_batch_prompt, split_batch_response};
use vttranslate::providers::mock::MockBackend;
use vttranslate::translation::{BatchTranslator, TranslationService};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Test the happy path through the service
#[tokio::test]
async fn test_translate_batch_withWorkingBackend_shouldReturnOrderedTranslations() {
    let backend = Arc::new(MockBackend::working());
    let service = TranslationService::new(backend, 0, 1);

    let result = service.translate_batch(&texts(&["first", "second"])).await.unwrap();

    assert_eq!(result, vec!["[KO] first", "[KO] second"]);
}

/// Test that an empty batch short-circuits without touching the backend
#[tokio::test]
async fn test_translate_batch_withEmptyInput_shouldNotCallBackend() {
    let backend = Arc::new(MockBackend::working());
    let counter = backend.call_counter();
    let service = TranslationService::new(backend, 0, 1);

    let result = service.translate_batch(&[]).await.unwrap();

    assert!(result.is_empty());
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 0);
}

/// Test length validation of the backend answer
#[tokio::test]
async fn test_translate_batch_withShortAnswer_shouldFailWithCountMismatch() {
    let backend = Arc::new(MockBackend::short_count());
    let service = TranslationService::new(backend, 3, 1);

    let err = service
        .translate_batch(&texts(&["one", "two", "three"]))
        .await
        .unwrap_err();

    match err {
        TranslationError::CountMismatch { expected, actual } => {
            assert_eq!(expected, 3);
            assert_eq!(actual, 2);
        }
        other => panic!("expected CountMismatch, got {:?}", other),
    }
}

/// Test that permanent failures are not retried
#[tokio::test]
async fn test_translate_batch_withAuthFailure_shouldNotRetry() {
    let backend = Arc::new(MockBackend::failing_auth());
    let counter = backend.call_counter();
    let service = TranslationService::new(backend, 3, 1);

    let err = service.translate_batch(&texts(&["text"])).await.unwrap_err();

    assert!(matches!(
        err,
        TranslationError::Provider(ProviderError::AuthenticationError(_))
    ));
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// Test recovery from a transient failure
#[tokio::test]
async fn test_translate_batch_withOneRateLimit_shouldRetryAndSucceed() {
    let backend = Arc::new(MockBackend::rate_limited(1));
    let counter = backend.call_counter();
    let service = TranslationService::new(backend, 3, 1);

    let result = service.translate_batch(&texts(&["text"])).await.unwrap();

    assert_eq!(result, vec!["[KO] text"]);
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 2);
}

/// Test bounded retries for a persistent transient failure
#[tokio::test]
async fn test_translate_batch_withPersistentRateLimit_shouldExhaustRetries() {
    let backend = Arc::new(MockBackend::rate_limited(100));
    let counter = backend.call_counter();
    let service = TranslationService::new(backend, 2, 1);

    let err = service.translate_batch(&texts(&["text"])).await.unwrap_err();

    match err {
        TranslationError::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
    // Initial attempt plus two retries
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 3);
}

/// Test sequential batch driving and order preservation
#[tokio::test]
async fn test_translate_batches_withSeveralBatches_shouldConcatenateInOrder() {
    let backend = Arc::new(MockBackend::working());
    let service = TranslationService::new(backend, 0, 1);
    let translator = BatchTranslator::new(service);

    let batches = vec![texts(&["a", "b"]), texts(&["c", "d"]), texts(&["e"])];
    let result = translator.translate_batches(&batches, |_, _| {}).await.unwrap();

    assert_eq!(result, vec!["[KO] a", "[KO] b", "[KO] c", "[KO] d", "[KO] e"]);
}

/// Test progress reporting over the batch list
#[tokio::test]
async fn test_translate_batches_withProgressCallback_shouldReportEachBatch() {
    let backend = Arc::new(MockBackend::working());
    let service = TranslationService::new(backend, 0, 1);
    let translator = BatchTranslator::new(service);

    let seen = std::sync::Mutex::new(Vec::new());
    let batches = vec![texts(&["a"]), texts(&["b"]), texts(&["c"])];
    translator
        .translate_batches(&batches, |done, total| {
            seen.lock().unwrap().push((done, total));
        })
        .await
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3), (3, 3)]);
}

/// Test that a failing batch aborts the whole run
#[tokio::test]
async fn test_translate_batches_withFailingBatch_shouldAbort() {
    let backend = Arc::new(MockBackend::failing_auth());
    let counter = backend.call_counter();
    let service = TranslationService::new(backend, 0, 1);
    let translator = BatchTranslator::new(service);

    let batches = vec![texts(&["a"]), texts(&["b"])];
    let result = translator.translate_batches(&batches, |_, _| {}).await;

    assert!(result.is_err());
    // The second batch is never issued
    assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
}

/// Test prompt construction with markers and language names
#[test]
fn test_build_batch_prompt_withTexts_shouldFrameEntriesWithMarkers() {
    let prompt = build_batch_prompt(
        "Translate from {source_language} to {target_language}:",
        "English",
        "Korean",
        &texts(&["Hello", "Line one\nLine two"]),
    );

    assert!(prompt.starts_with("Translate from English to Korean:"));
    assert!(prompt.contains("<<ENTRY_0>>\nHello\n"));
    assert!(prompt.contains("<<ENTRY_1>>\nLine one\nLine two\n"));
    assert!(prompt.ends_with("<<END>>"));
}

/// Test response splitting along markers
#[test]
fn test_split_batch_response_withWellFormedResponse_shouldRecoverBlocks() {
    let response = "<<ENTRY_0>>\n안녕\n<<ENTRY_1>>\n첫 줄\n둘째 줄\n<<END>>";
    let blocks = split_batch_response(response, 2).unwrap();

    assert_eq!(blocks, vec!["안녕", "첫 줄\n둘째 줄"]);
}

/// Test that surrounding chatter does not break marker splitting
#[test]
fn test_split_batch_response_withLeadingChatter_shouldStillRecoverBlocks() {
    let response = "Sure, here are the translations:\n<<ENTRY_0>>\n안녕\n<<END>>";
    let blocks = split_batch_response(response, 1).unwrap();

    assert_eq!(blocks, vec!["안녕"]);
}

/// Test rejection of a response that dropped an entry
#[test]
fn test_split_batch_response_withMissingMarker_shouldFail() {
    let response = "<<ENTRY_0>>\n안녕\n<<END>>";
    let err = split_batch_response(response, 2).unwrap_err();

    match err {
        ProviderError::ParseError(message) => assert!(message.contains("<<ENTRY_1>>")),
        other => panic!("expected ParseError, got {:?}", other),
    }
}
