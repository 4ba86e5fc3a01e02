/*!
 * End-to-end tests for the translation pipeline
 *
 * These tests drive the controller over real files in temporary
 * directories, with deterministic stub backends standing in for the
 * Gemini API.
 */

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use vttranslate::app_config::Config;
use vttranslate::app_controller::Controller;
use vttranslate::providers::mock::MockBackend;
use vttranslate::subtitle_processor::VttDocument;
use vttranslate::translation::TranslationService;

use crate::common;

fn controller() -> Controller {
    Controller::with_config(Config::default()).unwrap()
}

fn service_with(backend: Arc<MockBackend>) -> TranslationService {
    TranslationService::new(backend, 0, 1)
}

/// Test the full pipeline with a dictionary stub
#[tokio::test]
async fn test_pipeline_withStubTranslator_shouldWriteTranslatedFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_vtt(&dir, "movie.vtt").unwrap();

    let backend = Arc::new(MockBackend::with_dictionary(&[
        ("Hello", "안녕"),
        ("World", "세계"),
    ]));
    let service = service_with(backend);

    controller()
        .run_with_service(input, &service, false)
        .await
        .unwrap();

    let output_path = dir.join("movie-ko.vtt");
    assert!(output_path.exists());

    let content = fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        content,
        "WEBVTT\n\n\
         00:00:01.000 --> 00:00:02.000\n안녕\n\n\
         00:00:03.000 --> 00:00:04.000\n세계\n"
    );
}

/// Test that a malformed input fails before any translation call
#[tokio::test]
async fn test_pipeline_withEndBeforeStart_shouldFailBeforeTranslation() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let content = "WEBVTT\n\n00:00:05.000 --> 00:00:04.000\nBackwards\n";
    let input = common::create_test_file(&dir, "movie.vtt", content).unwrap();

    let backend = Arc::new(MockBackend::working());
    let counter = backend.call_counter();
    let service = service_with(backend);

    let result = controller().run_with_service(input, &service, false).await;

    assert!(result.is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(!dir.join("movie-ko.vtt").exists());
}

/// Test that a short backend answer aborts the run without writing output
#[tokio::test]
async fn test_pipeline_withShortBackendAnswer_shouldNotWriteOutput() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&dir, "ten.vtt", &common::generate_vtt(10)).unwrap();

    let service = service_with(Arc::new(MockBackend::short_count()));

    let result = controller().run_with_service(input, &service, false).await;

    assert!(result.is_err());
    assert!(!dir.join("ten-ko.vtt").exists());
}

/// Test multi-line cue text through the whole pipeline
#[tokio::test]
async fn test_pipeline_withMultiLineCue_shouldPreserveInternalBreak() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let content = "WEBVTT\n\n00:00:01.000 --> 00:00:03.000\nLine one\nLine two\n";
    let input = common::create_test_file(&dir, "movie.vtt", content).unwrap();

    // The stub sees the cue as one block with the break intact
    let backend = Arc::new(MockBackend::with_dictionary(&[(
        "Line one\nLine two",
        "첫 줄\n둘째 줄",
    )]));
    let service = service_with(backend);

    controller()
        .run_with_service(input, &service, false)
        .await
        .unwrap();

    let output = VttDocument::parse(&fs::read_to_string(dir.join("movie-ko.vtt")).unwrap()).unwrap();
    assert_eq!(output.cues[0].text, vec!["첫 줄", "둘째 줄"]);
}

/// Test that identifiers and settings survive while text changes
#[tokio::test]
async fn test_pipeline_withIdentifiersAndSettings_shouldPreserveStructure() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let content = "WEBVTT\n\n\
intro\n00:00:01.000 --> 00:00:02.000 align:start\nHello\n\n\
00:00:03.000 --> 00:00:04.000\nWorld\n";
    let input = common::create_test_file(&dir, "movie.vtt", content).unwrap();

    let service = service_with(Arc::new(MockBackend::working()));

    controller()
        .run_with_service(input, &service, false)
        .await
        .unwrap();

    let output = VttDocument::parse(&fs::read_to_string(dir.join("movie-ko.vtt")).unwrap()).unwrap();

    assert_eq!(output.cues.len(), 2);
    assert_eq!(output.cues[0].index.as_deref(), Some("intro"));
    assert_eq!(output.cues[0].settings.as_deref(), Some("align:start"));
    assert_eq!(output.cues[0].start.raw, "00:00:01.000");
    assert_eq!(output.cues[0].text, vec!["[KO] Hello"]);
    // No identifier was invented for the second cue
    assert!(output.cues[1].index.is_none());
}

/// Test order and count preservation over several batches
#[tokio::test]
async fn test_pipeline_withManyCues_shouldKeepOrderAcrossBatches() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    // 25 cues against the default batch size of 10
    let input = common::create_test_file(&dir, "long.vtt", &common::generate_vtt(25)).unwrap();

    let service = service_with(Arc::new(MockBackend::working()));

    controller()
        .run_with_service(input, &service, false)
        .await
        .unwrap();

    let output = VttDocument::parse(&fs::read_to_string(dir.join("long-ko.vtt")).unwrap()).unwrap();

    assert_eq!(output.cues.len(), 25);
    for (i, cue) in output.cues.iter().enumerate() {
        assert_eq!(cue.joined_text(), format!("[KO] Text {}", i));
    }
}

/// Test that an existing output is not clobbered without the force flag
#[tokio::test]
async fn test_pipeline_withExistingOutput_shouldSkipUnlessForced() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let input = common::create_test_vtt(&dir, "movie.vtt").unwrap();
    let existing = common::create_test_file(&dir, "movie-ko.vtt", "EXISTING\n").unwrap();

    let backend = Arc::new(MockBackend::working());
    let counter = backend.call_counter();
    let service = service_with(backend);

    // Without force the file is left alone and the backend never runs
    controller()
        .run_with_service(input.clone(), &service, false)
        .await
        .unwrap();
    assert_eq!(fs::read_to_string(&existing).unwrap(), "EXISTING\n");
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    // With force it is rewritten
    controller()
        .run_with_service(input, &service, true)
        .await
        .unwrap();
    assert!(fs::read_to_string(&existing).unwrap().starts_with("WEBVTT"));
}

/// Test the folder sweep
#[tokio::test]
async fn test_pipeline_withFolder_shouldTranslateEachSubtitleFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    common::create_test_vtt(&dir, "one.vtt").unwrap();
    common::create_test_vtt(&dir, "two.vtt").unwrap();
    common::create_test_file(&dir, "ignored.srt", "not vtt").unwrap();
    // A previous output must not be picked up as a new source
    common::create_test_file(&dir, "old-ko.vtt", "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nX\n")
        .unwrap();

    let service = service_with(Arc::new(MockBackend::working()));

    controller()
        .run_folder_with_service(dir.clone(), &service, false)
        .await
        .unwrap();

    assert!(dir.join("one-ko.vtt").exists());
    assert!(dir.join("two-ko.vtt").exists());
    assert!(!dir.join("old-ko-ko.vtt").exists());
    assert!(!dir.join("ignored-ko.srt").exists());
}

/// Test the error path for a missing input file
#[tokio::test]
async fn test_pipeline_withMissingInput_shouldFail() {
    let service = service_with(Arc::new(MockBackend::working()));

    let result = controller()
        .run_with_service(PathBuf::from("/nonexistent/movie.vtt"), &service, false)
        .await;

    assert!(result.is_err());
}
