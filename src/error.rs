use thiserror::Error;

use crate::model::AxisRole;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("theme `{theme}` provides no default colors")]
    MissingThemeColors { theme: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("{role:?} axis index {index} is out of range ({available} available)")]
    AxisIndexOutOfRange {
        role: AxisRole,
        index: usize,
        available: usize,
    },

    #[error("unknown point state `{0}`")]
    UnknownPointState(String),
}
