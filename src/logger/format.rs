//! Access log line rendering
//!
//! One line per served request, in one of:
//! - `combined`: CLF plus referer and user agent
//! - `common`: Common Log Format
//! - `json`: one JSON object per line
//! - anything else: a pattern with `$variable` substitution

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Configured shape of access log lines
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum AccessLogFormat {
    Combined,
    Common,
    Json,
    Pattern(String),
}

impl From<String> for AccessLogFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "combined" => Self::Combined,
            "common" => Self::Common,
            "json" => Self::Json,
            _ => Self::Pattern(value),
        }
    }
}

/// What gets recorded about one request/response pair
#[derive(Debug, Clone, Serialize)]
pub struct AccessLogEntry {
    pub remote_addr: String,
    pub time: DateTime<Utc>,
    pub method: String,
    pub path: String,
    /// Without the leading `?`
    pub query: Option<String>,
    /// "1.1", "2.0", ...
    pub http_version: String,
    pub status: u16,
    pub body_bytes: usize,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Entry stamped now, with a 200 status until the response is known
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Utc::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    pub fn render(&self, format: &AccessLogFormat) -> String {
        match format {
            AccessLogFormat::Combined => format!(
                "{} \"{}\" \"{}\"",
                self.common_line(),
                dash(self.referer.as_deref()),
                dash(self.user_agent.as_deref()),
            ),
            AccessLogFormat::Common => self.common_line(),
            AccessLogFormat::Json => {
                serde_json::to_string(self).unwrap_or_else(|_| self.common_line())
            }
            AccessLogFormat::Pattern(pattern) => self.expand(pattern),
        }
    }

    fn request_uri(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }

    fn request_line(&self) -> String {
        format!(
            "{} {} HTTP/{}",
            self.method,
            self.request_uri(),
            self.http_version
        )
    }

    fn common_line(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Substitute `$variable` names, longest name first so that
    /// `$request_time` is not eaten by `$request`
    fn expand(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.request_time_us as f64 / 1_000_000.0;

        let variables = [
            ("$http_user_agent", dash(self.user_agent.as_deref()).to_string()),
            ("$body_bytes_sent", self.body_bytes.to_string()),
            ("$request_method", self.method.clone()),
            ("$time_iso8601", self.time.to_rfc3339()),
            ("$http_referer", dash(self.referer.as_deref()).to_string()),
            ("$request_time", format!("{seconds:.3}")),
            ("$request_uri", self.request_uri()),
            ("$remote_addr", self.remote_addr.clone()),
            ("$time_local", self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string()),
            ("$request", self.request_line()),
            ("$status", self.status.to_string()),
        ];

        variables
            .iter()
            .fold(pattern.to_string(), |line, (name, value)| line.replace(name, value))
    }
}

fn dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}
