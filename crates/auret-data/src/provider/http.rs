//! 소스 어댑터가 공유하는 HTTP 헬퍼.

use std::time::Duration;

use crate::error::{snippet, SourceError, SourceResult};

/// 기본 요청 타임아웃 (초)
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// 기본 User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("auret-collector/", env!("CARGO_PKG_VERSION"));

/// HTTP 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// 요청 타임아웃
    pub timeout: Duration,
    /// User-Agent 헤더
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpSettings {
    /// 타임아웃이 적용된 reqwest 클라이언트를 만듭니다.
    pub fn build_client(&self) -> SourceResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .build()
            .map_err(|e| SourceError::transport("http", format!("HTTP 클라이언트 생성 실패: {}", e)))
    }
}

/// GET 요청 후 본문을 텍스트로 반환합니다.
///
/// 2xx가 아닌 상태 코드는 본문 일부와 함께 `Transport` 오류가 됩니다.
pub async fn get_text(
    client: &reqwest::Client,
    provider: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> SourceResult<String> {
    tracing::debug!(provider = provider, url = %url, "HTTP 요청");

    let response = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| SourceError::transport(provider, format!("{}: {}", url, e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| SourceError::transport(provider, format!("{}: 본문 읽기 실패: {}", url, e)))?;

    if !status.is_success() {
        return Err(SourceError::transport(
            provider,
            format!("{} [{}]: {}", url, status, snippet(&body)),
        ));
    }

    Ok(body)
}

/// GET 요청 후 본문을 JSON으로 파싱합니다.
pub async fn get_json(
    client: &reqwest::Client,
    provider: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> SourceResult<serde_json::Value> {
    let body = get_text(client, provider, url, query).await?;

    serde_json::from_str(&body)
        .map_err(|e| SourceError::shape(provider, format!("JSON 파싱 실패: {}", e), &body))
}

/// JSON 값을 숫자로 변환합니다.
///
/// - 숫자 → 그대로
/// - 숫자 문자열 (`"3.8"`, `"3,8"`) → 파싱
/// - `null` → `Ok(None)`
/// - 그 밖의 값 → `Value` 오류
pub fn json_number(
    provider: &'static str,
    field: &str,
    value: &serde_json::Value,
) -> SourceResult<Option<f64>> {
    use serde_json::Value;

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| SourceError::value(provider, format!("{}: {} 표현 불가", field, n))),
        Value::String(s) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| SourceError::value(provider, format!("{}: '{}' 숫자 아님", field, s))),
        other => Err(SourceError::value(
            provider,
            format!("{}: 지원하지 않는 값 {}", field, other),
        )),
    }
}

/// 객체의 선택 필드를 숫자로 읽습니다. 변환 실패는 경고 후 `None`.
pub fn optional_number(
    provider: &'static str,
    object: &serde_json::Value,
    field: &str,
) -> Option<f64> {
    let value = object.get(field)?;
    match json_number(provider, field, value) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(provider = provider, field = field, error = %e, "숫자 변환 실패, 값 없음으로 처리");
            None
        }
    }
}

/// 객체의 선택 필드를 문자열로 읽습니다. 숫자는 문자열로 바꿉니다.
pub fn optional_string(object: &serde_json::Value, field: &str) -> Option<String> {
    match object.get(field)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_number() {
        assert_eq!(json_number("t", "f", &json!(3.8)).unwrap(), Some(3.8));
        assert_eq!(json_number("t", "f", &json!(14347)).unwrap(), Some(14347.0));
        assert_eq!(json_number("t", "f", &json!("99,512")).unwrap(), Some(99.512));
        assert_eq!(json_number("t", "f", &json!(null)).unwrap(), None);
        assert!(json_number("t", "f", &json!("n/a")).is_err());
        assert!(json_number("t", "f", &json!([1])).is_err());
    }

    #[test]
    fn test_optional_fields() {
        let object = json!({ "rate": "abc", "volume": 10, "name": "SKD 1/25", "code": 42 });

        assert_eq!(optional_number("t", &object, "rate"), None);
        assert_eq!(optional_number("t", &object, "volume"), Some(10.0));
        assert_eq!(optional_number("t", &object, "missing"), None);
        assert_eq!(optional_string(&object, "name"), Some("SKD 1/25".to_string()));
        assert_eq!(optional_string(&object, "code"), Some("42".to_string()));
        assert_eq!(optional_string(&object, "missing"), None);
    }

    #[tokio::test]
    async fn test_get_json_non_success_is_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/data")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let client = HttpSettings::default().build_client().unwrap();
        let url = format!("{}/data", server.url());
        let err = get_json(&client, "test", &url, &[]).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SourceError::Transport { .. }));
        assert!(err.to_string().contains("maintenance"));
    }

    #[tokio::test]
    async fn test_get_json_malformed_body_is_shape_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data")
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let client = HttpSettings::default().build_client().unwrap();
        let url = format!("{}/data", server.url());
        let err = get_json(&client, "test", &url, &[]).await.unwrap_err();

        assert!(matches!(err, SourceError::Shape { .. }));
    }
}
