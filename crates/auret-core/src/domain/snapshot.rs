//! 수집 라운드 스냅샷.
//!
//! 한 라운드에서 수집된 모든 기록을 하나의 타임스탬프로 묶습니다.
//! 스냅샷은 라운드마다 새로 만들어지고, 저장 후 버려집니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bond::{BondRecord, LongTermBond};
use super::quote::{find_price, Quote};

/// 한 라운드의 시세 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// 라운드 시작 시각 (모든 포인트가 공유)
    pub timestamp: DateTime<Utc>,
    /// 주식 시세 (로스터 순서)
    pub stocks: Vec<Quote>,
    /// 암호화폐 시세 (로스터 순서)
    pub cryptocurrencies: Vec<Quote>,
    /// 귀금속 시세 (로스터 순서)
    pub precious_metals: Vec<Quote>,
    /// 단기 국채 (발행 코드 순, 코드 중복 없음)
    pub short_term_bonds: Vec<BondRecord>,
    /// CZEONIA 일일 금리
    pub long_term_bond: LongTermBond,
    /// CZK 기준 환율 (로스터 순서)
    pub exchange_rates: Vec<Quote>,
}

impl Snapshot {
    /// 빈 스냅샷을 생성합니다.
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            stocks: Vec::new(),
            cryptocurrencies: Vec::new(),
            precious_metals: Vec::new(),
            short_term_bonds: Vec::new(),
            long_term_bond: LongTermBond::Unavailable,
            exchange_rates: Vec::new(),
        }
    }

    pub fn stock_price(&self, symbol: &str) -> Option<f64> {
        find_price(&self.stocks, symbol)
    }

    pub fn crypto_price(&self, coin_id: &str) -> Option<f64> {
        find_price(&self.cryptocurrencies, coin_id)
    }

    pub fn metal_price(&self, metal: &str) -> Option<f64> {
        find_price(&self.precious_metals, metal)
    }

    pub fn exchange_rate(&self, currency: &str) -> Option<f64> {
        find_price(&self.exchange_rates, currency)
    }

    /// 발행 코드로 단기 국채 기록을 찾습니다.
    pub fn bond(&self, issue_code: &str) -> Option<&BondRecord> {
        self.short_term_bonds
            .iter()
            .find(|b| b.issue_code == issue_code)
    }

    /// 타임스탬프를 제외한 모든 값이 같은지 비교합니다.
    pub fn same_readings(&self, other: &Snapshot) -> bool {
        self.stocks == other.stocks
            && self.cryptocurrencies == other.cryptocurrencies
            && self.precious_metals == other.precious_metals
            && self.short_term_bonds == other.short_term_bonds
            && self.long_term_bond == other.long_term_bond
            && self.exchange_rates == other.exchange_rates
    }

    /// 시세 항목 수 (채권, 장기 금리 제외).
    pub fn quote_count(&self) -> usize {
        self.stocks.len()
            + self.cryptocurrencies.len()
            + self.precious_metals.len()
            + self.exchange_rates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(timestamp: DateTime<Utc>) -> Snapshot {
        Snapshot {
            stocks: vec![Quote::available("MSFT", 512.34)],
            cryptocurrencies: vec![Quote::available("bitcoin", 61234.5)],
            precious_metals: vec![Quote::available("gold", 2650.1), Quote::unavailable("silver")],
            short_term_bonds: vec![BondRecord::new("SKD123")],
            long_term_bond: LongTermBond::Empty,
            exchange_rates: vec![Quote::available("EUR", 25.125)],
            ..Snapshot::empty(timestamp)
        }
    }

    #[test]
    fn test_lookups() {
        let snapshot = sample(Utc::now());

        assert_eq!(snapshot.stock_price("MSFT"), Some(512.34));
        assert_eq!(snapshot.crypto_price("bitcoin"), Some(61234.5));
        assert_eq!(snapshot.metal_price("gold"), Some(2650.1));
        assert_eq!(snapshot.metal_price("silver"), None);
        assert_eq!(snapshot.exchange_rate("EUR"), Some(25.125));
        assert!(snapshot.bond("SKD123").is_some());
        assert!(snapshot.bond("SKD999").is_none());
        assert_eq!(snapshot.quote_count(), 5);
    }

    #[test]
    fn test_same_readings_ignores_timestamp() {
        let now = Utc::now();
        let a = sample(now);
        let b = sample(now + Duration::minutes(1));

        assert_ne!(a, b);
        assert!(a.same_readings(&b));

        let mut c = sample(now);
        c.stocks = vec![Quote::unavailable("MSFT")];
        assert!(!a.same_readings(&c));
    }
}
