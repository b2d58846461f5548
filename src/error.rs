use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlsError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Problem Validation Error: {0}")]
    Validation(String),

    /// The hard-constraint tracker and the objective tracker hold different
    /// values for the same variable. Fatal: the merged model would be unsound.
    #[error("Model disagreement on '{var}': hard tracker has {hard}, objective tracker has {objective}")]
    ModelDisagreement {
        var: String,
        hard: String,
        objective: String,
    },
}

pub type SlsResult<T> = Result<T, SlsError>;
