//! Authenticated portal access.
//!
//! The portal is a stateful ASP.NET-style site: a login handshake yields a
//! cookie-backed session, and all course data is only reachable through
//! that session. One fresh login per scan cycle; sessions are never reused
//! across cycles because they may expire and a fresh handshake is cheap at
//! a multi-minute cadence.

pub mod extract;
pub mod slots;

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

use crate::html;
use slots::SlotDefinition;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Anti-forgery hidden fields the login form requires. All three must be
/// present on the login page; a missing one means the portal changed shape.
const LOGIN_TOKEN_FIELDS: [&str; 3] = ["__VIEWSTATE", "__VIEWSTATEGENERATOR", "__EVENTVALIDATION"];

/// Marker expected only on authenticated pages.
const LOGGED_IN_MARKER: &str = "Logout";
/// Marker confirming the session can actually reach course data.
const ENROLLMENT_MARKER: &str = "Enrollment";

const ENROLLMENT_PATH: &str = "StudentPortal/Enrollment.aspx";
const SLOT_LISTING_PATH: &str = "Handler/Student.ashx?Page=StudentInfobyId&Mode=GetCourseBySlot&Id=";

/// Login handshake failures. Any of these aborts the current scan cycle
/// with state untouched; the next cycle retries from scratch.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login page no longer surfaces the required hidden fields.
    #[error("login page is missing required hidden form fields")]
    MalformedLoginPage,
    /// Credentials rejected, or the post-login marker never appeared.
    #[error("login rejected by the portal")]
    LoginRejected,
    /// Logged in, but the enrollment page did not confirm access.
    #[error("session established but enrollment page is not accessible")]
    SessionNotEstablished,
    /// Network failure during the handshake.
    #[error("portal unreachable during login: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Transport(err.to_string())
    }
}

/// Per-request fetch failure outside the handshake. The affected slot is
/// skipped for the cycle and retried naturally next cycle.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct FetchError(pub String);

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError(err.to_string())
    }
}

/// Capability to open an authenticated session. The scan cycle is generic
/// over this seam so it can run against an in-memory fake.
pub trait CoursePortal {
    type Session: SlotListings;

    fn login(&self) -> Result<Self::Session, AuthError>;
}

/// An authenticated session capable of fetching slot listings.
pub trait SlotListings {
    /// Fetch one slot's listing markup. `Ok(None)` means the portal
    /// answered with a non-success status: nothing to report this cycle.
    fn slot_listing(&self, slot: &SlotDefinition) -> Result<Option<String>, FetchError>;
}

/// Factory for authenticated portal sessions.
pub struct PortalClient {
    base_url: String,
    username: String,
    password: String,
}

impl PortalClient {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            username: username.into(),
            password: password.into(),
        }
    }
}

impl CoursePortal for PortalClient {
    type Session = PortalSession;

    /// Perform the full login handshake and return a session holding the
    /// portal cookies. The cookie jar is created per call, so every cycle
    /// starts from a clean, fresh login.
    fn login(&self) -> Result<PortalSession, AuthError> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .cookie_store(true)
            .user_agent("Mozilla/5.0")
            .build()?;

        // Login page carries the anti-forgery tokens the form POST needs.
        let login_page = http.get(self.base_url.clone()).send()?.text()?;
        let mut form: Vec<(&str, String)> = Vec::with_capacity(6);
        for field in LOGIN_TOKEN_FIELDS {
            match html::hidden_input_value(&login_page, field) {
                Some(value) => form.push((field, value)),
                None => return Err(AuthError::MalformedLoginPage),
            }
        }
        form.push(("txtusername", self.username.clone()));
        form.push(("txtpassword", self.password.clone()));
        form.push(("btnlogin", "Login".to_string()));

        let login_body = http
            .post(self.base_url.clone())
            .header("Referer", self.base_url.as_str())
            .form(&form)
            .send()?
            .text()?;
        if !login_body.contains(LOGGED_IN_MARKER) {
            return Err(AuthError::LoginRejected);
        }

        // The logged-in marker alone does not prove course data is
        // reachable; require the enrollment page too.
        let enrollment_url = format!("{}{}", self.base_url, ENROLLMENT_PATH);
        let enrollment_body = http.get(enrollment_url).send()?.text()?;
        if !enrollment_body.contains(ENROLLMENT_MARKER) {
            return Err(AuthError::SessionNotEstablished);
        }

        debug!("portal login handshake complete");
        Ok(PortalSession {
            http,
            base_url: self.base_url.clone(),
        })
    }
}

/// Authenticated session: a cookie-holding client scoped to one cycle and
/// discarded at its end.
pub struct PortalSession {
    http: Client,
    base_url: String,
}

impl SlotListings for PortalSession {
    fn slot_listing(&self, slot: &SlotDefinition) -> Result<Option<String>, FetchError> {
        let url = format!("{}{}{}", self.base_url, SLOT_LISTING_PATH, slot.portal_id);
        let response = self.http.get(url).send()?;
        if !response.status().is_success() {
            debug!(slot = slot.name, status = %response.status(), "slot listing skipped");
            return Ok(None);
        }
        Ok(Some(response.text()?))
    }
}
