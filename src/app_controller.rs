use anyhow::{Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::subtitle_processor::VttDocument;
use crate::translation::{BatchTranslator, TranslationService};

// @module: Application controller for the translation pipeline

/// Main application controller for subtitle translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the full pipeline on one subtitle file using the configured backend.
    pub async fn run(&self, input_file: PathBuf, force_overwrite: bool) -> Result<()> {
        let service = TranslationService::from_config(&self.config)?;
        self.run_with_service(input_file, &service, force_overwrite).await
    }

    /// Run the pipeline with an explicit translation service.
    ///
    /// Tests inject services built around stub backends here; `run` wires
    /// in the real Gemini backend.
    pub async fn run_with_service(
        &self,
        input_file: PathBuf,
        service: &TranslationService,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = Instant::now();

        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = FileManager::generate_output_path(
            &input_file,
            &self.config.source_language,
            &self.config.target_language,
        );
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping file, translation already exists (use -f to force overwrite): {:?}",
                output_path
            );
            return Ok(());
        }

        info!("Reading subtitle file: {:?}", input_file);
        let content = FileManager::read_to_string(&input_file)?;
        let document = VttDocument::parse(&content)?;

        if document.cues.is_empty() {
            return Err(anyhow!("No cues found in file: {:?}", input_file));
        }
        info!(
            "Parsed {} cues ({} -> {})",
            document.cues.len(),
            self.config.source_language,
            self.config.target_language
        );

        let batches = document.batch_texts(self.config.translation.batch_size);

        let progress_bar = ProgressBar::new(batches.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        progress_bar.set_message("Translating batches");

        let translator = BatchTranslator::new(service.clone());
        let result = {
            let pb = progress_bar.clone();
            translator
                .translate_batches(&batches, move |done, _total| pb.set_position(done as u64))
                .await
        };

        let translated = match result {
            Ok(texts) => {
                progress_bar.finish_with_message("Translation complete");
                texts
            }
            Err(e) => {
                // Partial translations are discarded; no output file is written
                progress_bar.abandon_with_message("Translation failed");
                return Err(anyhow!("Translation failed: {}", e));
            }
        };

        let translated_document = document.with_translations(&translated)?;

        // Single write, only after every batch succeeded
        FileManager::write_to_file(&output_path, &translated_document.render())?;

        info!(
            "Wrote {} translated cues to {:?} in {:.1?}",
            translated_document.cues.len(),
            output_path,
            start_time.elapsed()
        );

        Ok(())
    }

    /// Translate every subtitle file under a directory.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let service = TranslationService::from_config(&self.config)?;
        self.run_folder_with_service(input_dir, &service, force_overwrite).await
    }

    /// Folder variant of `run_with_service`.
    ///
    /// Per-file failures are logged and do not abort the sweep. Files that
    /// already carry the target-language suffix are skipped so previous
    /// outputs are not re-translated.
    pub async fn run_folder_with_service(
        &self,
        input_dir: PathBuf,
        service: &TranslationService,
        force_overwrite: bool,
    ) -> Result<()> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let target_suffix = format!("-{}.vtt", self.config.target_language);
        let files: Vec<PathBuf> = FileManager::find_files(&input_dir, "vtt")?
            .into_iter()
            .filter(|path| {
                !path
                    .file_name()
                    .map(|name| name.to_string_lossy().ends_with(&target_suffix))
                    .unwrap_or(false)
            })
            .collect();

        if files.is_empty() {
            warn!("No subtitle files found in {:?}", input_dir);
            return Ok(());
        }

        info!("Found {} subtitle file(s) to translate", files.len());

        let mut processed_count = 0;
        for file in &files {
            if let Err(e) = self
                .run_with_service(file.clone(), service, force_overwrite)
                .await
            {
                error!("Error processing file {:?}: {}", file, e);
            } else {
                processed_count += 1;
            }
        }

        info!("Finished processing {}/{} files", processed_count, files.len());

        Ok(())
    }
}
