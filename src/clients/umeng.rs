use chrono::Utc;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, info, warn};
use url::Url;

use super::response::ResponseEnvelope;
use crate::errors::{PushError, PushResult};
use crate::notification::PushNotification;
use crate::signer;

pub const DEFAULT_HOST: &str = "http://msg.umeng.com";
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";
pub const DEFAULT_SEND_PATH: &str = "/api/send";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the push client
#[derive(Debug, Clone, PartialEq)]
pub struct UmengClientConfig {
    pub host: String,
    pub upload_path: String,
    pub send_path: String,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for UmengClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            send_path: DEFAULT_SEND_PATH.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
            user_agent: Some(concat!("umeng-push/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl UmengClientConfig {
    /// URL the send path is signed and posted against
    pub fn send_url(&self) -> String {
        format!("{}{}", self.host, self.send_path)
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.host, self.upload_path)
    }

    fn effective_timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }
}

/// A validated, serialized and signed request, ready to post
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    /// Target URL including the `sign` query parameter
    pub url: String,
    /// JSON body exactly as signed
    pub body: String,
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    appkey: &'a str,
    timestamp: i64,
    content: &'a str,
}

/// Async client for the Umeng push API
///
/// Holds no per-request state, so one client can serve concurrent sends.
#[derive(Clone)]
pub struct AsyncUmengClient {
    client: Client,
    config: UmengClientConfig,
}

impl AsyncUmengClient {
    /// Create a new client, checking that the configured URLs parse
    pub fn new(config: UmengClientConfig) -> PushResult<Self> {
        for url in [config.send_url(), config.upload_url()] {
            Url::parse(&url).map_err(|e| PushError::InvalidUrl {
                url: url.clone(),
                source: Some(Box::new(e)),
            })?;
        }

        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.effective_timeout_secs()));

        if let Some(user_agent) = &config.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        }

        let client = client_builder
            .build()
            .map_err(|e| PushError::config_with_source("Failed to create HTTP client", e))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &UmengClientConfig {
        &self.config
    }

    /// Create a sync wrapper around this async client
    pub fn blocking(self) -> UmengClient {
        UmengClient::new(self)
    }

    /// Validate, serialize and sign a notification without sending it
    pub fn prepare<N: PushNotification>(&self, notification: &N) -> PushResult<SignedRequest> {
        notification.validate()?;
        let body = notification.to_body()?;
        Ok(self.sign_request(
            &self.config.send_url(),
            body,
            &notification.base().app_master_secret,
        ))
    }

    /// Send a notification with whatever cast type and timestamp it carries
    pub async fn send<N: PushNotification>(&self, notification: &N) -> PushResult<()> {
        let request = self.prepare(notification)?;

        debug!("Umeng {} notification url: {}", N::PLATFORM, request.url);
        debug!("Umeng {} notification body: {}", N::PLATFORM, request.body);

        let data = self.submit(&request).await?.into_result().map_err(|e| {
            warn!("Umeng {} notification rejected: {}", N::PLATFORM, e);
            e
        })?;

        info!(
            "Umeng {} notification accepted{}",
            N::PLATFORM,
            data.get("msg_id")
                .or_else(|| data.get("task_id"))
                .map(|id| format!(": {id}"))
                .unwrap_or_default()
        );
        Ok(())
    }

    /// Stamp the current time, force `customizedcast`, then send
    pub async fn send_customizedcast<N: PushNotification>(&self, notification: &mut N) -> PushResult<()> {
        notification.base_mut().prepare_customizedcast();
        self.send(notification).await
    }

    /// Upload newline-separated device tokens or aliases, returning the `file_id`
    /// to use in a filecast or customizedcast
    pub async fn upload(&self, app_key: &str, app_master_secret: &str, content: &str) -> PushResult<String> {
        if app_key.is_empty() {
            return Err(PushError::missing("appkey", "the app key identifies the application"));
        }
        if app_master_secret.is_empty() {
            return Err(PushError::missing(
                "app_master_secret",
                "the master secret is needed to sign the request",
            ));
        }
        if content.is_empty() {
            return Err(PushError::missing("content", "nothing to upload"));
        }

        let body = serde_json::to_string(&UploadRequest {
            appkey: app_key,
            timestamp: Utc::now().timestamp_millis(),
            content,
        })
        .map_err(|e| PushError::JsonSerialization {
            context: "upload body".to_string(),
            source: Some(Box::new(e)),
        })?;

        let request = self.sign_request(&self.config.upload_url(), body, app_master_secret);
        debug!("Umeng upload url: {}", request.url);

        let mut data = self.submit(&request).await?.into_result()?;
        data.remove("file_id").ok_or_else(|| PushError::JsonDeserialization {
            context: "upload response has no file_id".to_string(),
            source: None,
        })
    }

    fn sign_request(&self, url: &str, body: String, secret: &str) -> SignedRequest {
        let signature = signer::sign(signer::METHOD, url, &body, secret);
        SignedRequest {
            url: signer::signed_url(url, &signature),
            body,
        }
    }

    /// Post a signed request and parse the envelope, whatever the HTTP status
    async fn submit(&self, request: &SignedRequest) -> PushResult<ResponseEnvelope> {
        let response = self
            .client
            .post(&request.url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(&request.url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(&request.url, e))?;

        debug!("Umeng response ({}): {}", status, text);

        ResponseEnvelope::parse(&text)
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> PushError {
        if err.is_timeout() {
            PushError::NetworkTimeout {
                timeout_secs: self.config.effective_timeout_secs(),
            }
        } else {
            PushError::http_request(url, err)
        }
    }
}

/// Synchronous wrapper around AsyncUmengClient for blocking callers
///
/// Inside a multi-threaded tokio runtime the call runs through
/// `block_in_place`. Inside a current-thread runtime it runs on a scoped
/// thread with its own runtime, and outside any runtime a single-threaded one
/// is created per call.
pub struct UmengClient {
    inner: AsyncUmengClient,
}

impl UmengClient {
    pub fn new(async_client: AsyncUmengClient) -> Self {
        Self { inner: async_client }
    }

    /// Create a new sync client with configuration
    pub fn with_config(config: UmengClientConfig) -> PushResult<Self> {
        Ok(Self::new(AsyncUmengClient::new(config)?))
    }

    pub fn prepare<N: PushNotification>(&self, notification: &N) -> PushResult<SignedRequest> {
        self.inner.prepare(notification)
    }

    /// Send a notification (blocking)
    pub fn send<N: PushNotification>(&self, notification: &N) -> PushResult<()> {
        block_on(self.inner.send(notification))?
    }

    /// Send a customized-cast notification (blocking)
    pub fn send_customizedcast<N: PushNotification>(&self, notification: &mut N) -> PushResult<()> {
        block_on(self.inner.send_customizedcast(notification))?
    }

    /// Upload a target file (blocking)
    pub fn upload(&self, app_key: &str, app_master_secret: &str, content: &str) -> PushResult<String> {
        block_on(self.inner.upload(app_key, app_master_secret, content))?
    }
}

fn block_on<F>(future: F) -> PushResult<F::Output>
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            Ok(tokio::task::block_in_place(|| handle.block_on(future)))
        }
        // block_in_place is not allowed on a current-thread runtime
        Ok(_) => std::thread::scope(|scope| {
            match scope.spawn(move || block_on_fresh_runtime(future)).join() {
                Ok(result) => result,
                Err(_) => Err(PushError::config("Blocking push call panicked")),
            }
        }),
        Err(_) => block_on_fresh_runtime(future),
    }
}

fn block_on_fresh_runtime<F: Future>(future: F) -> PushResult<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| PushError::io_with_source("tokio runtime", "create runtime", e))?;
    Ok(runtime.block_on(future))
}
