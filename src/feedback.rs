use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use reqwest::{Client, header::ACCEPT};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::model::RouteData;

pub const FORMSPREE_FORM_ID: &str = "movqvqbp";

/// How long the thank-you step stays up before the dialog closes.
pub const AUTO_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// Shown when the submission fails without a message from the service.
pub const DEFAULT_ERROR: &str = "Failed to submit feedback. Please try again.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
}

/// What goes over the wire. Only inaccurate prices are ever reported,
/// so the accuracy flag is the fixed string "No".
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub price_accurate: &'static str,
    pub feedback: String,
    pub total_price: f64,
    pub route: String,
    pub timestamp: String,
}

/// Posts feedback payloads to a Formspree form.
#[derive(Debug, Clone)]
pub struct FormspreeClient {
    http: Client,
    endpoint: String,
}

impl FormspreeClient {
    pub fn new() -> Self {
        Self::with_endpoint(format!("https://formspree.io/f/{FORMSPREE_FORM_ID}"))
    }

    /// Points the client at another endpoint, e.g. a local mock.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Posts one payload. The response body is read as JSON first, then
    /// non-2xx responses surface the service's `error` field when there
    /// is one.
    pub async fn submit(&self, payload: &FeedbackPayload) -> Result<(), Error> {
        debug!("Submitting feedback to Formspree...");
        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await?;
        if status.is_success() {
            Ok(())
        } else {
            error!("Formspree error: {body}");
            let message = body
                .get("error")
                .and_then(|value| value.as_str())
                .unwrap_or("Failed to submit feedback");
            Err(Error::Rejected(message.to_string()))
        }
    }
}

impl Default for FormspreeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    #[default]
    Initial,
    Feedback,
    Thanks,
}

/// The price accuracy dialog: ask yes/no, collect a reason when the
/// answer is no, submit, thank. "Yes" jumps straight to the thank-you
/// step. Closing resets everything so the dialog is pristine on reopen.
#[derive(Debug, Clone, Default)]
pub struct FeedbackFlow {
    step: Step,
    accurate: Option<bool>,
    feedback: String,
    error: Option<String>,
    submitting: bool,
    total_price: f64,
    route: String,
}

impl FeedbackFlow {
    pub fn new(total_price: f64, route: impl Into<String>) -> Self {
        Self {
            total_price,
            route: route.into(),
            ..Default::default()
        }
    }

    pub fn for_route(route: &RouteData) -> Self {
        Self::new(route.total_price, route.description())
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn accurate(&self) -> Option<bool> {
        self.accurate
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Answers the accuracy question. Ignored outside the initial step.
    pub fn answer(&mut self, accurate: bool) {
        if self.step != Step::Initial {
            return;
        }
        self.accurate = Some(accurate);
        self.step = if accurate { Step::Thanks } else { Step::Feedback };
    }

    pub fn set_feedback(&mut self, text: impl Into<String>) {
        self.feedback = text.into();
    }

    /// Submission needs a non-blank reason and no submission already in
    /// flight.
    pub fn can_submit(&self) -> bool {
        self.step == Step::Feedback && !self.feedback.trim().is_empty() && !self.submitting
    }

    /// Sends the reason. On success the flow moves to the thank-you
    /// step and returns true. On failure an inline error is stored and
    /// the flow stays where it is, with the text intact for a retry.
    pub async fn submit(&mut self, client: &FormspreeClient) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.submitting = true;
        self.error = None;

        let payload = FeedbackPayload {
            price_accurate: "No",
            feedback: self.feedback.clone(),
            total_price: self.total_price,
            route: self.route.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let result = client.submit(&payload).await;
        self.submitting = false;

        match result {
            Ok(()) => {
                self.step = Step::Thanks;
                true
            }
            Err(Error::Rejected(message)) => {
                self.error = Some(message);
                false
            }
            Err(err) => {
                error!("Error submitting feedback: {err}");
                self.error = Some(DEFAULT_ERROR.to_string());
                false
            }
        }
    }

    /// Resets the dialog, whichever step it was closed from.
    pub fn close(&mut self) {
        self.step = Step::Initial;
        self.accurate = None;
        self.feedback.clear();
        self.error = None;
    }
}
