//! Startup configuration from the environment.
//!
//! Everything is read once before the loop starts; a missing or malformed
//! value fails fast with context instead of surfacing mid-cycle.

use std::env;

use anyhow::{ensure, Context, Result};

const DEFAULT_PORTAL_BASE_URL: &str = "https://arms.sse.saveetha.com/";

#[derive(Debug, Clone)]
pub struct Config {
    /// Bot API token for the command channel.
    pub bot_token: String,
    /// The single operator's chat identity.
    pub operator_chat_id: i64,
    pub portal_username: String,
    pub portal_password: String,
    /// Portal root URL; overridable for staging portals.
    pub portal_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let chat_id_raw = required("CHAT_ID")?;
        let operator_chat_id = chat_id_raw
            .trim()
            .parse()
            .with_context(|| format!("CHAT_ID is not a numeric chat identifier: {chat_id_raw:?}"))?;

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            operator_chat_id,
            portal_username: required("PORTAL_USERNAME")?,
            portal_password: required("PORTAL_PASSWORD")?,
            portal_base_url: env::var("PORTAL_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PORTAL_BASE_URL.to_string()),
        })
    }
}

fn required(name: &str) -> Result<String> {
    let value =
        env::var(name).with_context(|| format!("required environment variable {name} is not set"))?;
    ensure!(!value.trim().is_empty(), "environment variable {name} is empty");
    Ok(value)
}
