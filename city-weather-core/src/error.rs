use thiserror::Error;

/// Failures of the dataset and weather HTTP clients.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Connection or transport failure.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not have the expected JSON shape.
    #[error("failed to parse {context}")]
    Malformed {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "No weather API key configured.\n\
         Hint: run `city-weather configure`, pass --api-key or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl LookupError {
    pub(crate) fn status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Status {
            status: status.as_u16(),
            body: truncate_body(body),
        }
    }

    pub(crate) fn malformed(context: &'static str, source: serde_json::Error) -> Self {
        Self::Malformed { context, source }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
