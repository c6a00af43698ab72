//! Tool-specific error types.

use thiserror::Error;

use crate::core::api::ApiError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Arguments failed validation. The message is shown to the caller as is.
    #[error("{0}")]
    InvalidArguments(String),

    /// A WordPress API call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A sequential batch stopped at its first failing item.
    #[error("{source} ({completed} of {total} completed before the failure)")]
    BatchAborted {
        completed: usize,
        total: usize,
        #[source]
        source: Box<ToolError>,
    },

    /// The backend answered with JSON of an unexpected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    pub fn unexpected_response(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Text of the error envelope for a tool whose failure prefix is `failure`.
    ///
    /// Argument problems are reported verbatim, everything else as
    /// `"{failure}: {cause}"`.
    pub fn envelope_message(&self, failure: &str) -> String {
        match self {
            Self::InvalidArguments(msg) => msg.clone(),
            other => format!("{failure}: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::Surface;

    #[test]
    fn test_envelope_message_prefixes_backend_failures() {
        let err = ToolError::from(ApiError::Status {
            surface: Surface::Core,
            status: 404,
            reason: "Not Found".to_string(),
            body: "no post".to_string(),
        });
        assert_eq!(
            err.envelope_message("Failed to get post"),
            "Failed to get post: WordPress API error: 404 Not Found - no post"
        );
    }

    #[test]
    fn test_envelope_message_keeps_argument_errors_verbatim() {
        let err = ToolError::invalid_arguments("Provide either postId or productId");
        assert_eq!(
            err.envelope_message("Failed to set SEO meta"),
            "Provide either postId or productId"
        );
    }

    #[test]
    fn test_batch_aborted_names_progress() {
        let err = ToolError::BatchAborted {
            completed: 2,
            total: 5,
            source: Box::new(ToolError::internal("boom")),
        };
        assert_eq!(
            err.to_string(),
            "Internal error: boom (2 of 5 completed before the failure)"
        );
    }
}
