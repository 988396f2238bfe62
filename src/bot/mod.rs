//! Bot command channel: inbound command polling and outbound operator
//! notifications over the Telegram bot API.
//!
//! Both directions are trait seams so the scheduler and scan cycle can be
//! exercised with in-memory fakes. The two halves are separate values
//! (sharing one HTTP client) because the loop polls mutably while
//! notifying through a shared reference. Outbound sends are best-effort:
//! a failed notification is logged and swallowed, never fatal.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::portal::FetchError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
// Must exceed the longest long-poll timeout passed to `poll`.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One inbound message from the command channel.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub update_id: i64,
    pub chat_id: i64,
    pub text: String,
}

/// Outbound plain-text notifications to the operator.
pub trait Notifier {
    /// Best-effort send; implementations must swallow failures.
    fn notify(&self, text: &str);
}

/// Inbound command polling with an internally-held cursor, so updates
/// already seen are never redelivered.
pub trait CommandChannel {
    /// Block up to `timeout` waiting for new messages. Every update seen
    /// advances the cursor, including ones the caller will ignore.
    fn poll(&mut self, timeout: Duration) -> Result<Vec<IncomingMessage>, FetchError>;
}

/// Build the two halves of a Telegram bot connection: the polling channel
/// and the operator notifier, sharing one HTTP client.
pub fn telegram(token: &str, operator_chat_id: i64) -> anyhow::Result<(TelegramChannel, TelegramNotifier)> {
    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let api_base = format!("https://api.telegram.org/bot{token}");
    Ok((
        TelegramChannel {
            http: http.clone(),
            api_base: api_base.clone(),
            last_update_id: None,
        },
        TelegramNotifier {
            http,
            api_base,
            operator_chat_id,
        },
    ))
}

#[derive(Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    chat: Chat,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Chat {
    id: i64,
}

/// Inbound half: `getUpdates` long polling with an offset cursor.
pub struct TelegramChannel {
    http: Client,
    api_base: String,
    /// Identifier of the last processed update; process lifetime only.
    last_update_id: Option<i64>,
}

impl CommandChannel for TelegramChannel {
    fn poll(&mut self, timeout: Duration) -> Result<Vec<IncomingMessage>, FetchError> {
        let mut url = format!("{}/getUpdates?timeout={}", self.api_base, timeout.as_secs());
        if let Some(last) = self.last_update_id {
            url.push_str(&format!("&offset={}", last + 1));
        }

        let response: UpdatesResponse = self.http.get(url).send()?.json()?;

        let mut messages = Vec::new();
        for update in response.result {
            // Cursor advances past everything seen, text or not, operator
            // or not: old updates are never replayed within this process.
            self.last_update_id = Some(update.update_id);
            let Some(message) = update.message else { continue };
            let Some(text) = message.text else { continue };
            messages.push(IncomingMessage {
                update_id: update.update_id,
                chat_id: message.chat.id,
                text,
            });
        }
        Ok(messages)
    }
}

/// Outbound half: `sendMessage` to the configured operator chat.
pub struct TelegramNotifier {
    http: Client,
    api_base: String,
    operator_chat_id: i64,
}

impl Notifier for TelegramNotifier {
    fn notify(&self, text: &str) {
        let url = format!("{}/sendMessage", self.api_base);
        let body = json!({ "chat_id": self.operator_chat_id, "text": text });
        match self.http.post(url).json(&body).send() {
            Ok(response) if response.status().is_success() => {
                debug!("notification delivered");
            }
            Ok(response) => {
                warn!(status = %response.status(), "notification rejected");
            }
            Err(err) => {
                warn!(error = %err, "notification failed");
            }
        }
    }
}
