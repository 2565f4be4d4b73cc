//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    #[serde(default = "default_pool_size")]
    pub db_pool_size: u32,
    /// Secret used to verify session tokens and sign cookies.
    pub secret: String,
    /// Directory where uploaded images are stored.
    pub storage_dir: String,
    /// Externally visible base URL used to build image and short links.
    pub public_base_url: String,
    /// Path to the Google service-account JSON key; push is disabled without it.
    #[serde(default)]
    pub fcm_service_account: Option<String>,
    pub deepseek: LlmConfig,
}

#[derive(Clone, Debug, Deserialize)]
/// Settings of the chat-completions endpoint used for drafting.
pub struct LlmConfig {
    pub api_url: String,
    /// Drafting is disabled when no key is configured.
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    pub system_prompt: String,
    /// Instruction used when condensing a conversation history.
    #[serde(default = "default_summary_prompt")]
    pub summary_prompt: String,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    512
}

fn default_summary_prompt() -> String {
    "Summarize the SMS conversation below in three short sentences, \
     in the language of the messages."
        .to_string()
}

impl ServerConfig {
    /// Public URL of a file stored under `storage_dir`.
    pub fn storage_url(&self, storage_path: &str) -> String {
        format!(
            "{}/storage/{}",
            self.public_base_url.trim_end_matches('/'),
            storage_path.trim_start_matches('/')
        )
    }

    /// Public short link for an encoded id.
    pub fn short_link(&self, code: &str) -> String {
        format!("{}/s/{code}", self.public_base_url.trim_end_matches('/'))
    }
}

fn default_pool_size() -> u32 {
    crate::db::DEFAULT_POOL_SIZE
}
