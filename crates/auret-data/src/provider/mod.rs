//! 데이터 Provider 모듈.
//!
//! 외부 소스별 어댑터와 수집 라운드가 의존하는 trait을 정의합니다.
//!
//! ## Yahoo Finance
//! - `YahooQuoteProvider`: 주식/선물(금 `GC=F`, 은 `SI=F`) 최근 일봉 종가
//!
//! ## CoinGecko
//! - `CoinGeckoClient`: `/simple/price` 암호화폐 법정화폐 가격
//!
//! ## 체코 국립은행 (CNB)
//! - `CnbClient`: 단기 국채(SKD) 낙찰 목록, CZEONIA 일일 금리, 환율 고시 파일
//!
//! 모든 trait 메서드는 "데이터 없음"을 `Ok(None)`/빈 결과로 돌려주고,
//! 전송/형식/값 실패만 `SourceError`로 돌려줍니다.

pub mod cnb;
pub mod coingecko;
pub mod http;
pub mod yahoo;

use std::collections::BTreeMap;

use async_trait::async_trait;
use auret_core::{BondRecord, LongTermBond};

use crate::error::SourceResult;

pub use cnb::{parse_fx_fixing, parse_long_term_rate, parse_short_term_bonds, CnbClient};
pub use coingecko::{parse_simple_price, CoinGeckoClient};
pub use http::HttpSettings;
pub use yahoo::YahooQuoteProvider;

/// 주식/선물 최근 종가 제공자.
#[async_trait]
pub trait EquityQuoteProvider: Send + Sync {
    /// 심볼의 최근 일봉 종가. 시계열이 비어 있으면 `Ok(None)`.
    async fn latest_close(&self, symbol: &str) -> SourceResult<Option<f64>>;
}

/// 암호화폐 가격 제공자.
#[async_trait]
pub trait CryptoQuoteProvider: Send + Sync {
    /// 코인 ID의 법정화폐 가격. 응답에 ID나 통화 필드가 없으면 `Ok(None)`.
    async fn price(&self, coin_id: &str, vs_currency: &str) -> SourceResult<Option<f64>>;
}

/// 단기 국채 낙찰 목록 제공자.
#[async_trait]
pub trait ShortTermBondProvider: Send + Sync {
    /// 발행 코드별로 중복 제거된 낙찰 기록 (발행 코드 순).
    async fn short_term_bonds(&self) -> SourceResult<Vec<BondRecord>>;
}

/// 장기(CZEONIA) 금리 제공자.
#[async_trait]
pub trait LongTermRateProvider: Send + Sync {
    /// 당일 금리. 응답에 금리 객체가 없으면 `LongTermBond::Empty`.
    async fn long_term_rate(&self) -> SourceResult<LongTermBond>;
}

/// 환율 고시 제공자.
#[async_trait]
pub trait FxRateProvider: Send + Sync {
    /// 추적 통화의 1단위당 CZK 환율. 고시에 없는 통화는 결과에서 빠집니다.
    async fn fixing_rates(&self, codes: &[String]) -> SourceResult<BTreeMap<String, f64>>;
}
