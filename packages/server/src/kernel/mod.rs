//! Kernel module - pipeline infrastructure and shared dependencies.

pub mod deps;
pub mod jobs;
pub mod openai;
pub mod pipeline;
pub mod progress_hub;
pub mod scraper;
pub mod script;
pub mod testing;

/// Model used for script generation — cheap and fast, good enough for
/// summarization into a fixed JSON shape.
pub const SCRIPT_MODEL: &str = "gpt-4o-mini";

pub use deps::ServerDeps;
pub use openai::{ChatRequest, OpenAIClient, OpenAIError};
pub use pipeline::{ContentGenerator, LogProgress, MulmoPipeline, Progress};
pub use progress_hub::ProgressHub;
pub use scraper::{PageContent, PageScraper};
pub use script::{MulmoScript, ScriptError};
