use thiserror::Error;

/// Errors raised by the growth/statistics core.
///
/// These are structural failures caused by bad input data. They abort the
/// affected model (normalization) or organism (statistics), never the whole run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrowthError {
    /// Negative/non-finite coefficient or an unrecognized unit encoding.
    #[error("parameter format error: {0}")]
    ParameterFormat(String),

    /// Friedman design is not balanced (a block is missing a treatment).
    #[error("incomplete design: {0}")]
    IncompleteDesign(String),

    /// Fewer than 2 blocks or 2 treatments.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Duplicate (organism, source) rows under the `reject` policy.
    #[error("duplicate model '{organism} / {source_label}' in catalog")]
    DuplicateModel {
        organism: String,
        source_label: String,
    },
}

/// Application-level error carrying a process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<GrowthError> for AppError {
    fn from(err: GrowthError) -> Self {
        let exit_code = match err {
            GrowthError::ParameterFormat(_) | GrowthError::DuplicateModel { .. } => 2,
            GrowthError::IncompleteDesign(_) | GrowthError::InsufficientData(_) => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
