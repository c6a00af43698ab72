//! API wrapper error types.

use std::fmt;

use thiserror::Error;

/// Result type for WordPress API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// The backend surface a request was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// `/wp-json/wp/v2`
    Core,
    /// `/wp-json/` discovery document
    Root,
    /// `/wp-json/wc/v3`
    Commerce,
    /// `/wp-json/banildtools/v1`
    Plugin,
    /// wordpress.org plugin directory
    Directory,
    /// `/wp-json/wp/v2/media` multipart upload
    Media,
}

impl Surface {
    /// Human-readable name used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Core => "WordPress",
            Self::Root => "WordPress root",
            Self::Commerce => "WooCommerce",
            Self::Plugin => "BanildTools",
            Self::Directory => "WordPress.org",
            Self::Media => "WordPress media",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failures raised by the API wrappers.
///
/// Every variant renders to a short message that is safe to interpolate into
/// a user-facing tool error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{surface} API error: {status} {reason} - {body}")]
    Status {
        surface: Surface,
        status: u16,
        reason: String,
        body: String,
    },

    /// No response was received (DNS, connect, TLS, body read).
    #[error("Failed to call {surface} API: {message}")]
    Transport { surface: Surface, message: String },

    /// A 2xx response whose body is not JSON.
    #[error("Invalid JSON from {surface} API: {message}")]
    Decode { surface: Surface, message: String },

    /// The remote media source answered with a non-2xx status.
    #[error("Failed to fetch media from URL: {status} {reason}")]
    SourceStatus { status: u16, reason: String },

    /// The remote media source could not be reached.
    #[error("Failed to fetch media from URL: {message}")]
    SourceTransport { message: String },

    /// The request could not be built from the given input.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP client itself could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// Wrap a reqwest failure that happened before a usable response arrived.
    pub fn transport(surface: Surface, err: &reqwest::Error) -> Self {
        Self::Transport {
            surface,
            message: error_chain(err),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::SourceStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Render an error with its sources, `outer: inner: root`.
///
/// reqwest's own `Display` stops at "error sending request", which hides the
/// actual cause (connection refused, DNS, ...).
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
