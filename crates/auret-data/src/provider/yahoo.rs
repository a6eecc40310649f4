//! Yahoo Finance 최근 종가 제공자.
//!
//! 주식, 지수, 선물 심볼의 최근 일봉 종가를 조회합니다.
//!
//! # 심볼 형식
//!
//! 모든 심볼은 Yahoo Finance 형식으로 전달되어야 합니다:
//! - 미국 주식: "MSFT"
//! - 지수: "^GSPC"
//! - 해외 상장: "VUN.TO", "CEZ.PR"
//! - 선물: "GC=F" (금), "SI=F" (은)
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use auret_data::provider::{EquityQuoteProvider, YahooQuoteProvider};
//!
//! let provider = YahooQuoteProvider::new(Duration::from_secs(15))?;
//! let close = provider.latest_close("MSFT").await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use yahoo_finance_api as yahoo;

use super::EquityQuoteProvider;
use crate::error::{SourceError, SourceResult};

const PROVIDER: &str = "yahoo";

/// Yahoo Finance 기반 최근 종가 제공자.
pub struct YahooQuoteProvider {
    connector: yahoo::YahooConnector,
    /// 캔들 간격
    interval: String,
    /// 조회 기간 (기본 "1d")
    range: String,
    /// 요청 타임아웃
    timeout: Duration,
}

impl YahooQuoteProvider {
    /// 하루 범위의 일봉을 조회하는 제공자를 생성합니다.
    pub fn new(timeout: Duration) -> SourceResult<Self> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            SourceError::transport(PROVIDER, format!("Yahoo Finance 연결 실패: {}", e))
        })?;

        Ok(Self {
            connector,
            interval: "1d".to_string(),
            range: "1d".to_string(),
            timeout,
        })
    }

    /// 조회 기간을 변경합니다 (예: 주말에도 값을 얻기 위해 "5d").
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }
}

#[async_trait]
impl EquityQuoteProvider for YahooQuoteProvider {
    async fn latest_close(&self, symbol: &str) -> SourceResult<Option<f64>> {
        debug!(symbol = symbol, range = %self.range, "Yahoo Finance 종가 조회");

        let request = self
            .connector
            .get_quote_range(symbol, &self.interval, &self.range);

        let response = match tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                SourceError::transport(
                    PROVIDER,
                    format!("{} 요청 시간 초과 ({:?})", symbol, self.timeout),
                )
            })? {
            Ok(response) => response,
            Err(e) if is_empty_series(&e) => {
                debug!(symbol = symbol, "Yahoo Finance: 빈 시계열");
                return Ok(None);
            }
            Err(e) => {
                return Err(SourceError::transport(PROVIDER, format!("{}: {}", symbol, e)));
            }
        };

        close_from_response(symbol, &response)
    }
}

/// 응답에서 최근 종가를 꺼냅니다. 빈 시계열은 `Ok(None)`.
fn close_from_response(symbol: &str, response: &yahoo::YResponse) -> SourceResult<Option<f64>> {
    match response.quotes() {
        Ok(quotes) => {
            let close = latest_close(quotes);
            if close.is_none() {
                debug!(symbol = symbol, "Yahoo Finance: 유효한 종가 없음");
            }
            Ok(close)
        }
        Err(e) if is_empty_series(&e) => {
            debug!(symbol = symbol, "Yahoo Finance: 빈 시계열");
            Ok(None)
        }
        Err(e) => Err(SourceError::shape(
            PROVIDER,
            format!("{} quote 파싱 오류", symbol),
            &e.to_string(),
        )),
    }
}

/// 장 마감 등으로 데이터가 없는 경우 (오류가 아님).
fn is_empty_series(err: &yahoo::YahooError) -> bool {
    matches!(err, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult)
}

/// 시간순으로 정렬한 뒤 마지막 유효 종가를 반환합니다.
fn latest_close(mut quotes: Vec<yahoo::Quote>) -> Option<f64> {
    quotes.sort_by_key(|q| q.timestamp);

    quotes
        .iter()
        .rev()
        .map(|q| q.close)
        .find(|close| close.is_finite())
}
