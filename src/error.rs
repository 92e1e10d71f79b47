use nba_stats_api::client::ApiError;
use std::fmt;
use std::path::PathBuf;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug)]
pub enum PipelineError {
    Io(std::io::Error, PathBuf),
    Json(serde_json::Error, PathBuf),
    Csv(csv::Error, PathBuf),
    /// The freeze file does not exist; the schedule step has not run.
    MissingFreezeState(PathBuf),
    /// No frozen roster for the requested day.
    MissingRoster(PathBuf),
    Roster(String),
    Api(ApiError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(e, path) => write!(f, "I/O error on {}: {e}", path.display()),
            PipelineError::Json(e, path) => write!(f, "JSON error in {}: {e}", path.display()),
            PipelineError::Csv(e, path) => write!(f, "CSV error in {}: {e}", path.display()),
            PipelineError::MissingFreezeState(path) => {
                write!(f, "freeze state not found at {} (run the schedule step first)", path.display())
            }
            PipelineError::MissingRoster(path) => write!(f, "frozen roster not found: {}", path.display()),
            PipelineError::Roster(msg) => write!(f, "roster source error: {msg}"),
            PipelineError::Api(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e, _) => Some(e),
            PipelineError::Json(e, _) => Some(e),
            PipelineError::Csv(e, _) => Some(e),
            PipelineError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for PipelineError {
    fn from(e: ApiError) -> Self {
        PipelineError::Api(e)
    }
}
