//! Domain error types.

/// Top-level error type for regimix.
///
/// Every failure aborts the whole call; nothing is retried or partially
/// recovered. Mapping errors to user-facing output is the boundary layer's
/// job, not the core's.
#[derive(Debug, thiserror::Error)]
pub enum RegimixError {
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("unknown composition mode: {mode}")]
    UnknownComposition { mode: String },

    #[error("input check failed for {function}: {reason}")]
    InvalidInput { function: String, reason: String },

    #[error("output check failed for {function}: {reason}")]
    InvalidOutput { function: String, reason: String },

    #[error("series length mismatch: {reason}")]
    LengthMismatch { reason: String },

    #[error("no data for {asset}: {reason}")]
    DataUnavailable { asset: String, reason: String },

    #[error("insufficient data for {asset}: have {have} samples, need {need}")]
    InsufficientData {
        asset: String,
        have: usize,
        need: usize,
    },

    #[error("execution failed for {function}: {reason}")]
    Execution { function: String, reason: String },

    #[error("intent parsing failed: {reason}")]
    IntentParse { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&RegimixError> for std::process::ExitCode {
    fn from(err: &RegimixError) -> Self {
        let code: u8 = match err {
            RegimixError::Io(_) => 1,
            RegimixError::ConfigParse { .. } | RegimixError::ConfigInvalid { .. } => 2,
            RegimixError::UnknownFunction { .. }
            | RegimixError::UnknownComposition { .. }
            | RegimixError::IntentParse { .. } => 3,
            RegimixError::InvalidInput { .. }
            | RegimixError::InvalidOutput { .. }
            | RegimixError::LengthMismatch { .. } => 4,
            RegimixError::DataUnavailable { .. } | RegimixError::InsufficientData { .. } => 5,
            RegimixError::Execution { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
