use reqwest::StatusCode;

/// Failures talking to the question-bank API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Username already taken")]
    Conflict,

    #[error("{context}: server returned {status}")]
    Status {
        context: &'static str,
        status: StatusCode,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Input rejected on the client before any request is made.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Please fill in all fields")]
    MissingCredentials,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Correct option must be between 1 and {max}")]
    CorrectIndexOutOfRange { max: usize },

    #[error("Input must be a JSON array of questions.")]
    NotAnArray,

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Select at least one chapter")]
    NoChapters,
}
