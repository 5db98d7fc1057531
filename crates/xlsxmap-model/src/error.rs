use thiserror::Error;

use crate::A1ParseError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid workbook description: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cell `{coordinate}` has no usable row/column: {source}")]
    InvalidCoordinate {
        coordinate: String,
        #[source]
        source: A1ParseError,
    },
    #[error("style attribute `{field}` is not a finite number ({value})")]
    NonFiniteNumber { field: &'static str, value: f64 },
}
