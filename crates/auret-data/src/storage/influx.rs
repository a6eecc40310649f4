//! InfluxDB 2.x 쓰기 클라이언트.
//!
//! 포인트 배치를 라인 프로토콜로 인코딩해 `/api/v2/write`에 한 번에 전송합니다.
//! 인증 토큰은 설정에서 주입받으며 로그에 노출되지 않습니다.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use super::point::{encode_batch, Point};
use crate::error::{snippet, SinkError};

/// 시계열 저장소.
#[async_trait]
pub trait PointSink: Send + Sync {
    /// 포인트 배치를 한 번의 쓰기로 전송합니다.
    async fn write_batch(&self, points: &[Point]) -> Result<(), SinkError>;

    /// 저장소 이름 (로그용).
    fn name(&self) -> &str;
}

/// InfluxDB 연결 설정.
#[derive(Debug)]
pub struct InfluxConfig {
    /// 서버 URL (예: http://127.0.0.1:8086)
    pub url: String,
    /// 조직
    pub org: String,
    /// 버킷
    pub bucket: String,
    /// API 토큰
    pub token: SecretString,
    /// 요청 타임아웃
    pub timeout: Duration,
}

/// InfluxDB 2.x 라인 프로토콜 전송기.
pub struct InfluxWriter {
    config: InfluxConfig,
    client: reqwest::Client,
}

impl InfluxWriter {
    /// 새 전송기를 생성합니다.
    pub fn new(config: InfluxConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SinkError::Client(e.to_string()))?;

        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    /// `/health` 엔드포인트로 서버 상태를 확인합니다.
    pub async fn health(&self) -> Result<(), SinkError> {
        let url = format!("{}/health", self.base_url());
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        info!(url = %self.config.url, "InfluxDB 연결 확인");
        Ok(())
    }
}

#[async_trait]
impl PointSink for InfluxWriter {
    async fn write_batch(&self, points: &[Point]) -> Result<(), SinkError> {
        let body = encode_batch(points);
        if body.is_empty() {
            warn!("기록할 포인트가 없어 쓰기를 건너뜁니다");
            return Ok(());
        }

        let url = format!("{}/api/v2/write", self.base_url());
        debug!(url = %url, bucket = %self.config.bucket, points = points.len(), "InfluxDB 쓰기");

        let response = self
            .client
            .post(&url)
            .query(&[
                ("org", self.config.org.as_str()),
                ("bucket", self.config.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(
                "Authorization",
                format!("Token {}", self.config.token.expose_secret()),
            )
            .header("Content-Type", "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                status: status.as_u16(),
                body: snippet(&body),
            });
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "influxdb"
    }
}
