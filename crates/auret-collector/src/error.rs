//! 에러 타입 정의.

use auret_data::{SinkError, SourceError};
use thiserror::Error;

/// Collector 에러 타입
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),
    /// 시계열 저장소 에러
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
    /// 데이터 소스 초기화 에러
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),
}

impl From<config::ConfigError> for CollectorError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
