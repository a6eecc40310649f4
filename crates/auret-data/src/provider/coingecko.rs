//! CoinGecko 암호화폐 가격 클라이언트.
//!
//! `GET /simple/price?ids=<id>&vs_currencies=<fiat>` 응답 형식:
//!
//! ```json
//! { "bitcoin": { "usd": 61234.5 } }
//! ```

use async_trait::async_trait;
use tracing::debug;

use super::http::{self, json_number, HttpSettings};
use super::CryptoQuoteProvider;
use crate::error::SourceResult;

const PROVIDER: &str = "coingecko";

/// CoinGecko 공개 API 기본 URL
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko 가격 클라이언트.
#[derive(Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(base_url: impl Into<String>, settings: &HttpSettings) -> SourceResult<Self> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CryptoQuoteProvider for CoinGeckoClient {
    async fn price(&self, coin_id: &str, vs_currency: &str) -> SourceResult<Option<f64>> {
        let url = format!("{}/simple/price", self.base_url);
        let data = http::get_json(
            &self.client,
            PROVIDER,
            &url,
            &[("ids", coin_id), ("vs_currencies", vs_currency)],
        )
        .await?;

        let price = parse_simple_price(&data, coin_id, vs_currency)?;
        debug!(coin_id = coin_id, vs_currency = vs_currency, price = ?price, "CoinGecko 가격 수신");
        Ok(price)
    }
}

/// `/simple/price` 응답에서 가격을 꺼냅니다.
///
/// 코인 ID나 통화 필드가 없으면 `Ok(None)`, 숫자가 아니면 `Value` 오류.
pub fn parse_simple_price(
    data: &serde_json::Value,
    coin_id: &str,
    vs_currency: &str,
) -> SourceResult<Option<f64>> {
    match data.get(coin_id).and_then(|coin| coin.get(vs_currency)) {
        Some(value) => json_number(PROVIDER, &format!("{}.{}", coin_id, vs_currency), value),
        None => Ok(None),
    }
}
