//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 로그에 남길 응답 본문 최대 길이.
const SNIPPET_LEN: usize = 200;

/// 소스 어댑터 오류.
///
/// "데이터 없음"은 오류가 아닙니다. 어댑터는 이를 `Ok(None)`이나 빈 결과로 돌려주고,
/// 이 타입은 전송/형식/값 실패에만 사용합니다.
#[derive(Debug, Error)]
pub enum SourceError {
    /// 네트워크 또는 HTTP 상태 오류
    #[error("[{provider}] 요청 실패: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    /// 응답은 파싱되지만 기대한 구조가 아님
    #[error("[{provider}] 응답 형식 오류: {message} (body: {snippet})")]
    Shape {
        provider: &'static str,
        message: String,
        snippet: String,
    },

    /// 필드는 있지만 숫자로 변환할 수 없음
    #[error("[{provider}] 값 변환 실패: {message}")]
    Value {
        provider: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn transport(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            message: message.into(),
        }
    }

    pub fn shape(provider: &'static str, message: impl Into<String>, body: &str) -> Self {
        Self::Shape {
            provider,
            message: message.into(),
            snippet: snippet(body),
        }
    }

    pub fn value(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Value {
            provider,
            message: message.into(),
        }
    }

    /// 오류를 낸 소스 이름.
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Transport { provider, .. }
            | Self::Shape { provider, .. }
            | Self::Value { provider, .. } => provider,
        }
    }
}

/// 소스 어댑터 Result 타입.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// 시계열 저장소 쓰기 오류.
#[derive(Debug, Error)]
pub enum SinkError {
    /// 저장소 연결 실패
    #[error("저장소 요청 실패: {0}")]
    Transport(#[from] reqwest::Error),

    /// 저장소가 배치를 거부함
    #[error("저장소가 배치를 거부함 [{status}]: {body}")]
    Rejected { status: u16, body: String },

    /// 클라이언트 설정 오류
    #[error("저장소 클라이언트 설정 오류: {0}")]
    Client(String),
}

/// 로그용으로 본문을 자릅니다.
pub fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= SNIPPET_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(SNIPPET_LEN).collect();
    format!("{}...", cut)
}
