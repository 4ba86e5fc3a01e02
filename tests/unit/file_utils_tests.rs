/*!
 * Tests for file and path utilities
 */

use std::path::{Path, PathBuf};

use vttranslate::file_utils::FileManager;

use crate::common;

/// Test output path derivation for a plain filename
#[test]
fn test_generate_output_path_withPlainName_shouldInsertTargetSuffix() {
    let output = FileManager::generate_output_path(Path::new("/videos/movie.vtt"), "en", "ko");
    assert_eq!(output, PathBuf::from("/videos/movie-ko.vtt"));
}

/// Test source language suffix replacement
#[test]
fn test_generate_output_path_withSourceSuffix_shouldReplaceIt() {
    let output = FileManager::generate_output_path(Path::new("subtitles-en.vtt"), "en", "ko");
    assert_eq!(output.file_name().unwrap(), "subtitles-ko.vtt");
}

/// Test that unrelated dash segments are left alone
#[test]
fn test_generate_output_path_withUnrelatedDashes_shouldKeepStem() {
    let output =
        FileManager::generate_output_path(Path::new("/a/b/my-show-s01e01.vtt"), "en", "ko");
    assert_eq!(output, PathBuf::from("/a/b/my-show-s01e01-ko.vtt"));
}

/// Test file write and read round trip
#[test]
fn test_write_and_read_withContent_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("nested").join("out.vtt");

    FileManager::write_to_file(&path, "WEBVTT\n").unwrap();

    assert!(FileManager::file_exists(&path));
    assert_eq!(FileManager::read_to_string(&path).unwrap(), "WEBVTT\n");
}

/// Test extension-filtered recursive file discovery
#[test]
fn test_find_files_withMixedTree_shouldReturnOnlyMatchingExtension() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    common::create_test_file(&dir, "a.vtt", "WEBVTT\n").unwrap();
    common::create_test_file(&dir, "notes.txt", "hello").unwrap();
    std::fs::create_dir(dir.join("sub")).unwrap();
    common::create_test_file(&dir.join("sub"), "b.VTT", "WEBVTT\n").unwrap();

    let found = FileManager::find_files(&dir, "vtt").unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(found.len(), 2);
    assert!(names.contains(&"a.vtt".to_string()));
    assert!(names.contains(&"b.VTT".to_string()));
}

/// Test directory existence helpers
#[test]
fn test_dir_exists_withFileAndDir_shouldDistinguish() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_vtt(&dir, "movie.vtt").unwrap();

    assert!(FileManager::dir_exists(&dir));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(&dir));
}
