//! Shared transport for every service: URL building, bearer headers, and
//! the one generic execute helper all operations funnel through.

use std::fmt::Display;

use daraja::app::App;
use daraja::normalize::Normalized;
use reqwest::header::AUTHORIZATION;
use serde::Serialize;

use crate::error::ClientError;
use crate::outcome::{FromNormalized, GatewayError, Outcome, Reply};

/// An app context bound to an HTTP client and an optional default
/// access token.
///
/// Cloning is cheap (the underlying `reqwest::Client` is pooled and
/// reference-counted), and a single connection may serve any number of
/// concurrent calls; nothing here is mutated after construction.
#[derive(Debug, Clone)]
pub struct Connection {
    app: App,
    client: reqwest::Client,
    access_token: Option<String>,
    #[cfg(test)]
    base_url_override: Option<String>,
}

impl Connection {
    /// Creates a connection with a fresh `reqwest` client and no default
    /// access token.
    #[must_use]
    pub fn new(app: App) -> Self {
        Self {
            app,
            client: reqwest::Client::new(),
            access_token: None,
            #[cfg(test)]
            base_url_override: None,
        }
    }

    /// Routes requests to a mock server instead of the environment's
    /// fixed origin. Test builds only.
    #[cfg(test)]
    pub(crate) fn with_base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Sets the default bearer token used when a call supplies none.
    #[must_use]
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Replaces the HTTP client, e.g. to configure timeouts or proxies.
    /// This layer imposes no timeout of its own.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Returns the app context.
    #[must_use]
    pub const fn app(&self) -> &App {
        &self.app
    }

    /// Returns the default access token, if one is set.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.client
    }

    fn base_url(&self) -> &str {
        #[cfg(test)]
        if let Some(base_url) = &self.base_url_override {
            return base_url;
        }
        self.app.base_url()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn bearer(&self, access_token: Option<&str>) -> String {
        format!(
            "Bearer {}",
            access_token.or(self.access_token.as_deref()).unwrap_or_default()
        )
    }

    /// POSTs a JSON payload with bearer authentication and normalizes
    /// the response. `context` labels the operation in errors and
    /// telemetry (e.g. `"POST /mpesa/stkpush/v1/processrequest"`).
    pub(crate) async fn post_operation<T, P>(
        &self,
        path: &str,
        context: &'static str,
        access_token: Option<&str>,
        payload: &P,
    ) -> Result<Reply<T>, ClientError>
    where
        T: FromNormalized,
        P: Serialize + Sync + ?Sized,
    {
        let request = self
            .client
            .post(self.url(path))
            .header(AUTHORIZATION, self.bearer(access_token))
            .json(payload);
        self.execute(request, context).await
    }

    /// Sends a prepared request and assembles the reply.
    pub(crate) async fn execute<T: FromNormalized>(
        &self,
        request: reqwest::RequestBuilder,
        context: &'static str,
    ) -> Result<Reply<T>, ClientError> {
        let result = self.execute_inner(request, context).await;
        record_result_on_span(context, &result);
        result
    }

    async fn execute_inner<T: FromNormalized>(
        &self,
        request: reqwest::RequestBuilder,
        context: &'static str,
    ) -> Result<Reply<T>, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Http { context, source: e })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::ResponseBodyRead { context, source: e })?;

        let normalized = Normalized::from_body(status.as_u16(), &body)
            .map_err(|e| ClientError::Normalize { context, source: e })?;
        let outcome = if normalized.succeeded() {
            let result = T::from_normalized(&normalized)
                .map_err(|e| ClientError::Normalize { context, source: e })?;
            Outcome::Success(result)
        } else {
            Outcome::Failure(GatewayError::from_normalized(&normalized))
        };
        Ok(Reply::new(status, normalized.into_raw(), outcome))
    }
}

/// Records the outcome of a request on the current tracing span.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(context: &'static str, result: &Result<R, E>) {
    match result {
        Ok(_) => tracing::debug!(operation = context, "daraja request completed"),
        Err(err) => {
            tracing::error!(operation = context, error = %err, "daraja request failed");
        }
    }
}

/// Noop when the telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_context: &'static str, _result: &Result<R, E>) {}
