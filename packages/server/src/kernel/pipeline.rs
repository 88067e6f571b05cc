//! Content pipeline: URL in, media artifacts out.
//!
//! Seven sequential stages — fetch, extract, generate script, persist,
//! audio, images, video. Each stage suspends at its I/O boundary and
//! reports a fixed checkpoint; there is no retry, no rollback of partial
//! artifacts, and no per-stage timeout.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use mulmo_cli::MulmoCli;
use tracing::{info, warn};

use crate::config::Config;
use crate::kernel::jobs::{GenerationResult, JobSpec};
use crate::kernel::openai::{ChatRequest, OpenAIClient};
use crate::kernel::scraper::PageScraper;
use crate::kernel::script::{self, MulmoScript};
use crate::kernel::SCRIPT_MODEL;

/// Stage-boundary checkpoint sink.
///
/// The job runner backs this with the registry and the progress hub; the
/// one-shot CLI just logs.
#[async_trait]
pub trait Progress: Send + Sync {
    async fn checkpoint(&self, progress: u8, message: &str);
}

/// Logging-only reporter for contexts without a job record.
pub struct LogProgress;

#[async_trait]
impl Progress for LogProgress {
    async fn checkpoint(&self, progress: u8, message: &str) {
        info!(progress, "{message}");
    }
}

/// The pipeline behind a trait so the HTTP layer and runner can be tested
/// without network access or the external tool.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, spec: &JobSpec, progress: &dyn Progress)
        -> Result<GenerationResult>;
}

/// Production pipeline: scraper + OpenAI + the external mulmo tool.
pub struct MulmoPipeline {
    scraper: PageScraper,
    openai: OpenAIClient,
    mulmo: MulmoCli,
    output_dir: PathBuf,
}

impl MulmoPipeline {
    pub fn new(
        scraper: PageScraper,
        openai: OpenAIClient,
        mulmo: MulmoCli,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            scraper,
            openai,
            mulmo,
            output_dir,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PageScraper::new()?,
            OpenAIClient::new(config.openai_api_key.clone()),
            MulmoCli::new(config.mulmo_bin.clone()).with_bgm_path(config.bgm_path.clone()),
            config.output_dir.clone(),
        ))
    }

    async fn save_script(&self, script: &MulmoScript, timestamp: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("script_{timestamp}.json"));
        let json = serde_json::to_string_pretty(script).context("failed to serialize script")?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("failed to create {}", self.output_dir.display()))?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        info!(path = %path.display(), "script saved");
        Ok(path)
    }
}

#[async_trait]
impl ContentGenerator for MulmoPipeline {
    async fn generate(
        &self,
        spec: &JobSpec,
        progress: &dyn Progress,
    ) -> Result<GenerationResult> {
        progress.checkpoint(10, "Fetching content from URL").await;
        let html = self.scraper.fetch(&spec.url).await?;

        progress.checkpoint(20, "Extracting page text").await;
        let page = PageScraper::extract(&spec.url, &html);
        if page.text.len() < 100 {
            warn!(url = %spec.url, "page has minimal content");
        }

        progress.checkpoint(30, "Generating MulmoScript").await;
        let prompt = script::build_prompt(&page.text, &spec.style);
        let raw = self
            .openai
            .chat_completion(ChatRequest::json(SCRIPT_MODEL, script::SYSTEM_PROMPT, prompt))
            .await
            .context("script generation failed")?;
        let script = script::parse_script(&raw)?;

        progress.checkpoint(40, "Saving MulmoScript").await;
        let timestamp = file_timestamp(Utc::now());
        let script_path = self.save_script(&script, &timestamp).await?;

        progress.checkpoint(50, "Generating audio").await;
        self.mulmo
            .audio(&script_path)
            .await
            .context("audio generation failed")?;
        progress.checkpoint(60, "Audio generation complete").await;

        progress.checkpoint(70, "Generating images").await;
        self.mulmo
            .images(&script_path)
            .await
            .context("image generation failed")?;
        progress.checkpoint(80, "Image generation complete").await;

        progress.checkpoint(90, "Generating video").await;
        let subtitle_lang = spec.subtitles.then(|| script.lang.as_str());
        self.mulmo
            .movie(&script_path, subtitle_lang)
            .await
            .context("video generation failed")?;
        progress.checkpoint(95, "Video generation complete").await;

        Ok(GenerationResult {
            script_path: script_path.display().to_string(),
            output_dir: self.output_dir.display().to_string(),
            timestamp,
        })
    }
}

/// Timestamp embedded in output filenames: RFC 3339 with `:` and `.`
/// replaced so it is filesystem-safe on every platform.
pub fn file_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Script filename for a given timestamp, shared with the files endpoint.
pub fn script_filename(timestamp: &str) -> String {
    format!("script_{timestamp}.json")
}
