//! 테스트용 가짜 소스와 저장소.
//!
//! 가짜 소스는 실제 파서에 업스트림 응답 형태의 데이터를 넣어 동작합니다.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use auret_core::{BondRecord, LongTermBond};
use auret_data::provider::{
    parse_fx_fixing, parse_long_term_rate, parse_short_term_bonds, parse_simple_price,
    CryptoQuoteProvider, EquityQuoteProvider, FxRateProvider, LongTermRateProvider,
    ShortTermBondProvider,
};
use auret_data::{Point, PointSink, SinkError, SourceError, SourceResult};
use serde_json::{json, Value};

use crate::config::RosterConfig;
use crate::modules::round::Sources;

pub(crate) fn roster() -> RosterConfig {
    RosterConfig {
        stocks: vec!["MSFT".to_string(), "CEZ.PR".to_string()],
        cryptocurrencies: vec!["bitcoin".to_string()],
        vs_currency: "usd".to_string(),
        metals: BTreeMap::from([
            ("gold".to_string(), "GC=F".to_string()),
            ("silver".to_string(), "SI=F".to_string()),
        ]),
        currencies: vec!["EUR".to_string(), "USD".to_string()],
    }
}

/// 모든 소스가 정상 응답하는 구성. 은 선물(SI=F)만 가격이 없습니다.
pub(crate) fn sources() -> Sources {
    let cnb = Arc::new(FakeCnb::default());
    Sources {
        equities: Arc::new(FakeEquities::default()),
        crypto: Arc::new(FakeCrypto::default()),
        short_term_bonds: cnb.clone(),
        long_term_rate: cnb.clone(),
        fx: cnb,
    }
}

pub(crate) struct FakeEquities {
    prices: HashMap<String, f64>,
    delay: Option<Duration>,
}

impl Default for FakeEquities {
    fn default() -> Self {
        Self {
            prices: HashMap::from([
                ("MSFT".to_string(), 512.34),
                ("CEZ.PR".to_string(), 1050.0),
                ("GC=F".to_string(), 2650.1),
            ]),
            delay: None,
        }
    }
}

impl FakeEquities {
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl EquityQuoteProvider for FakeEquities {
    async fn latest_close(&self, symbol: &str) -> SourceResult<Option<f64>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.prices.get(symbol).copied())
    }
}

pub(crate) struct FakeCrypto {
    response: Value,
}

impl Default for FakeCrypto {
    fn default() -> Self {
        Self {
            response: json!({ "bitcoin": { "usd": 61234.5 } }),
        }
    }
}

#[async_trait]
impl CryptoQuoteProvider for FakeCrypto {
    async fn price(&self, coin_id: &str, vs_currency: &str) -> SourceResult<Option<f64>> {
        parse_simple_price(&self.response, coin_id, vs_currency)
    }
}

pub(crate) struct FakeCnb {
    pub skd: Value,
    pub czeonia: Value,
    pub fixing: String,
}

impl Default for FakeCnb {
    fn default() -> Self {
        Self {
            skd: json!({
                "skds": [
                    { "issueCode": "SKD 2/25", "issueName": "SKD 2/25", "averagePriceToValue": 99.41 },
                    { "issueCode": "SKD 1/25", "issueName": "SKD 1/25", "averagePriceToValue": 99.12 }
                ]
            }),
            czeonia: json!({
                "czeoniaDaily": { "validFor": "2025-02-04", "volumeInCZKmio": 14347, "rate": 3.8 }
            }),
            fixing: "04 Feb 2025 #24\n\
                     Country|Currency|Amount|Code|Rate\n\
                     EMU|euro|1|EUR|25,125\n\
                     Japan|yen|100|JPY|15,540\n\
                     USA|dollar|1|USD|24,285\n"
                .to_string(),
        }
    }
}

#[async_trait]
impl ShortTermBondProvider for FakeCnb {
    async fn short_term_bonds(&self) -> SourceResult<Vec<BondRecord>> {
        Ok(parse_short_term_bonds(&self.skd))
    }
}

#[async_trait]
impl LongTermRateProvider for FakeCnb {
    async fn long_term_rate(&self) -> SourceResult<LongTermBond> {
        Ok(parse_long_term_rate(&self.czeonia))
    }
}

#[async_trait]
impl FxRateProvider for FakeCnb {
    async fn fixing_rates(&self, codes: &[String]) -> SourceResult<BTreeMap<String, f64>> {
        Ok(parse_fx_fixing(&self.fixing, codes))
    }
}

/// 항상 전송 실패를 반환하는 소스.
pub(crate) struct FailingSource;

fn unreachable_upstream() -> SourceError {
    SourceError::transport("fake", "connection refused")
}

#[async_trait]
impl EquityQuoteProvider for FailingSource {
    async fn latest_close(&self, _symbol: &str) -> SourceResult<Option<f64>> {
        Err(unreachable_upstream())
    }
}

#[async_trait]
impl CryptoQuoteProvider for FailingSource {
    async fn price(&self, _coin_id: &str, _vs_currency: &str) -> SourceResult<Option<f64>> {
        Err(unreachable_upstream())
    }
}

#[async_trait]
impl ShortTermBondProvider for FailingSource {
    async fn short_term_bonds(&self) -> SourceResult<Vec<BondRecord>> {
        Err(unreachable_upstream())
    }
}

#[async_trait]
impl LongTermRateProvider for FailingSource {
    async fn long_term_rate(&self) -> SourceResult<LongTermBond> {
        Err(unreachable_upstream())
    }
}

#[async_trait]
impl FxRateProvider for FailingSource {
    async fn fixing_rates(&self, _codes: &[String]) -> SourceResult<BTreeMap<String, f64>> {
        Err(unreachable_upstream())
    }
}

/// 받은 배치를 기록하는 저장소.
#[derive(Default)]
pub(crate) struct RecordingSink {
    batches: Mutex<Vec<Vec<Point>>>,
    attempts: AtomicUsize,
    reject: bool,
}

impl RecordingSink {
    pub(crate) fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    pub(crate) fn last_batch(&self) -> Option<Vec<Point>> {
        self.batches.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PointSink for RecordingSink {
    async fn write_batch(&self, points: &[Point]) -> Result<(), SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.reject {
            return Err(SinkError::Rejected {
                status: 401,
                body: "unauthorized".to_string(),
            });
        }
        self.batches.lock().unwrap().push(points.to_vec());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
