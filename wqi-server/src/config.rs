//! Server configuration from CLI flags and environment variables.
//!
//! File-system and scoring settings come from CLI flags; the chat proxy's
//! secrets and endpoint come from the environment so they never appear in
//! process listings.

use std::fs;
use std::path::{Path, PathBuf};
use wqi_core::Profile;

const ENV_API_TOKEN: &str = "HUGGING_FACE_API_TOKEN";
const ENV_CHAT_MODEL: &str = "HF_CHAT_MODEL";
const ENV_CHAT_URL: &str = "CHAT_API_URL";

/// Model used when none is configured, and as the retry fallback when a
/// configured model is rejected upstream.
pub const DEFAULT_CHAT_MODEL: &str = "HuggingFaceTB/SmolLM3-3B:hf-inference";
const DEFAULT_CHAT_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Resolved server configuration.
pub struct Config {
    /// Directory holding the database file and the IoT CSV log.
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub profile: Profile,
    pub chat: ChatConfig,
}

/// Upstream chat-completion settings.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_url: String,
    /// Bearer token; the `/chat` route answers 500 when unset.
    pub token: Option<String>,
    pub model: String,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var(ENV_CHAT_URL).unwrap_or_else(|_| DEFAULT_CHAT_URL.to_string()),
            token: std::env::var(ENV_API_TOKEN).ok().filter(|t| !t.is_empty()),
            model: std::env::var(ENV_CHAT_MODEL)
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
        }
    }
}

impl Config {
    /// Resolve configuration, creating the data directory if needed and
    /// loading a profile override when one was given.
    pub fn load(
        data_dir: PathBuf,
        database: &str,
        profile_path: Option<&Path>,
    ) -> anyhow::Result<Self> {
        fs::create_dir_all(&data_dir)?;
        let profile = match profile_path {
            Some(path) => {
                log::info!("loading parameter profile from {}", path.display());
                Profile::from_json(&fs::read_to_string(path)?)?
            }
            None => Profile::default(),
        };
        let database_path = data_dir.join(database);
        Ok(Self {
            data_dir,
            database_path,
            profile,
            chat: ChatConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wqi_core::{DeviationPolicy, Parameter};

    #[test]
    fn load_without_override_uses_the_default_profile() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("data"), "wqi.db", None).unwrap();
        assert!(config.data_dir.is_dir(), "data directory is created");
        assert_eq!(config.database_path, config.data_dir.join("wqi.db"));
        assert_eq!(config.profile, Profile::default());
    }

    #[test]
    fn load_reads_a_profile_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(
            &path,
            r#"{ "ph": { "ideal": 7.0, "standard": 9.0, "policy": "either_way_bad" } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path().to_path_buf(), "wqi.db", Some(&path)).unwrap();
        let limits = config.profile.limits(Parameter::Ph).unwrap();
        assert_eq!(limits.standard, 9.0);
        assert_eq!(limits.policy, DeviationPolicy::EitherWayBad);
        assert!(
            config.profile.limits(Parameter::Tds).is_none(),
            "an override replaces the default table, it is not merged"
        );
    }

    #[test]
    fn load_rejects_a_malformed_profile_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(Config::load(dir.path().to_path_buf(), "wqi.db", Some(&path)).is_err());

        let missing = dir.path().join("absent.json");
        assert!(Config::load(dir.path().to_path_buf(), "wqi.db", Some(&missing)).is_err());
    }
}
