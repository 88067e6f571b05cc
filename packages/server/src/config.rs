use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub openai_api_key: String,
    pub output_dir: PathBuf,
    pub bgm_path: Option<PathBuf>,
    pub mulmo_bin: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            openai_api_key: env::var("OPENAI_API_KEY")
                .context("OPENAI_API_KEY must be set")?,
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./output")),
            bgm_path: env::var("PATH_BGM").ok().map(PathBuf::from),
            mulmo_bin: env::var("MULMO_BIN").unwrap_or_else(|_| "mulmo".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests share process state, so everything lives in one test.
    #[test]
    fn from_env_applies_defaults_and_overrides() {
        env::set_var("OPENAI_API_KEY", "sk-test");
        env::remove_var("PORT");
        env::remove_var("OUTPUT_DIR");
        env::remove_var("PATH_BGM");
        env::remove_var("MULMO_BIN");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.bgm_path, None);
        assert_eq!(config.mulmo_bin, "mulmo");

        env::set_var("PORT", "8080");
        env::set_var("OUTPUT_DIR", "/tmp/media");
        env::set_var("PATH_BGM", "/assets/bgm.mp3");
        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/media"));
        assert_eq!(config.bgm_path, Some(PathBuf::from("/assets/bgm.mp3")));

        env::set_var("PORT", "not-a-port");
        assert!(Config::from_env().is_err());
        env::remove_var("PORT");
    }
}
