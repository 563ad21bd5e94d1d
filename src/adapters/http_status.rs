//! HTTPS status-feed adapter.
//!
//! Implements [`StatusSource`]: one GET of the configured URL per call,
//! body capped at `max_body_bytes`, then handed to
//! [`interpret_response`](crate::app::status::interpret_response).
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` with the ESP-IDF
//!   certificate bundle for TLS.  A fresh connection is opened per poll;
//!   at one poll a minute keep-alive buys nothing.
//! - **all other targets**: serves a canned response so the firmware runs
//!   end to end on a workstation.

use log::debug;

use crate::app::ports::{FetchError, StatusSource};
use crate::app::status::{StatusValue, interpret_response};
use crate::config::DeviceConfig;

#[cfg(target_os = "espidf")]
const HTTP_TIMEOUT_SECS: u64 = 10;

const READ_CHUNK: usize = 512;

pub struct HttpStatusSource {
    url: String,
    user_agent: String,
    field: String,
    max_body_bytes: usize,
    #[cfg(not(target_os = "espidf"))]
    canned_status: u16,
    #[cfg(not(target_os = "espidf"))]
    canned_body: Vec<u8>,
}

impl HttpStatusSource {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            url: config.status_url.clone(),
            user_agent: config.user_agent.clone(),
            field: config.status_field.clone(),
            max_body_bytes: config.max_body_bytes,
            #[cfg(not(target_os = "espidf"))]
            canned_status: 200,
            #[cfg(not(target_os = "espidf"))]
            canned_body: format!("{{\"{}\":\"no\"}}", config.status_field).into_bytes(),
        }
    }

    /// Replace the simulated server response.
    #[cfg(not(target_os = "espidf"))]
    pub fn with_response(mut self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.canned_status = status;
        self.canned_body = body.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn get(&self) -> Result<(u16, Vec<u8>), FetchError> {
        use core::time::Duration;
        use embedded_svc::http::client::Client as HttpClient;
        use embedded_svc::http::{Method, Status};
        use embedded_svc::io::Read;
        use esp_idf_svc::http::client::{Configuration as HttpClientConfiguration, EspHttpConnection};

        let http_conf = HttpClientConfiguration {
            timeout: Some(Duration::from_secs(HTTP_TIMEOUT_SECS)),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let mut client = HttpClient::wrap(EspHttpConnection::new(&http_conf).map_err(transport)?);
        let headers = [("User-Agent", self.user_agent.as_str())];
        let request = client
            .request(Method::Get, &self.url, &headers)
            .map_err(transport)?;
        let mut response = request.submit().map_err(transport)?;

        let status = response.status();
        if status != 200 {
            return Ok((status, Vec::new()));
        }
        let body = read_body(self.max_body_bytes, |buf| {
            response.read(buf).map_err(transport)
        })?;
        Ok((status, body))
    }

    #[cfg(not(target_os = "espidf"))]
    fn get(&self) -> Result<(u16, Vec<u8>), FetchError> {
        debug!("HTTP(sim): GET {} (User-Agent: {})", self.url, self.user_agent);
        let mut rest: &[u8] = &self.canned_body;
        let body = read_body(self.max_body_bytes, |buf| {
            let n = rest.len().min(buf.len());
            buf[..n].copy_from_slice(&rest[..n]);
            rest = &rest[n..];
            Ok(n)
        })?;
        Ok((self.canned_status, body))
    }
}

impl StatusSource for HttpStatusSource {
    fn fetch_status(&mut self) -> Result<StatusValue, FetchError> {
        let (status, body) = self.get()?;
        debug!("HTTP: {} -> {} ({} bytes)", self.url, status, body.len());
        interpret_response(status, &body, &self.field)
    }
}

#[cfg(target_os = "espidf")]
fn transport<E: core::fmt::Debug>(e: E) -> FetchError {
    log::warn!("HTTP: transport error: {:?}", e);
    FetchError::Transport
}

/// Drain `read` into a buffer, failing once more than `max` bytes arrive.
fn read_body(
    max: usize,
    mut read: impl FnMut(&mut [u8]) -> Result<usize, FetchError>,
) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = read(&mut chunk)?;
        if n == 0 {
            return Ok(body);
        }
        if body.len() + n > max {
            return Err(FetchError::BodyTooLarge);
        }
        body.extend_from_slice(&chunk[..n]);
    }
}
