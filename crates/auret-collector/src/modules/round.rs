//! 수집 라운드 모듈.
//!
//! 한 번의 라운드는 로스터의 모든 종목을 모든 소스에서 동시에 조회하고,
//! 하나의 타임스탬프를 공유하는 `Snapshot`을 만듭니다.
//! 소스 하나의 실패는 해당 항목만 "값 없음"으로 만들고 라운드는 계속됩니다.

use std::sync::Arc;
use std::time::Instant;

use auret_core::{BondRecord, LongTermBond, Quote, Snapshot};
use auret_data::provider::{
    CnbClient, CoinGeckoClient, CryptoQuoteProvider, EquityQuoteProvider, FxRateProvider,
    LongTermRateProvider, ShortTermBondProvider, YahooQuoteProvider,
};
use auret_data::SourceResult;
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::{RosterConfig, SourcesConfig};
use crate::stats::{Outcome, RoundStats};
use crate::Result;

/// 라운드가 사용하는 소스 어댑터 묶음.
#[derive(Clone)]
pub struct Sources {
    pub equities: Arc<dyn EquityQuoteProvider>,
    pub crypto: Arc<dyn CryptoQuoteProvider>,
    pub short_term_bonds: Arc<dyn ShortTermBondProvider>,
    pub long_term_rate: Arc<dyn LongTermRateProvider>,
    pub fx: Arc<dyn FxRateProvider>,
}

impl Sources {
    /// 설정으로 실제 소스 어댑터를 생성합니다.
    pub fn from_config(config: &SourcesConfig) -> Result<Self> {
        let http = config.http_settings();

        let equities = YahooQuoteProvider::new(config.timeout())?
            .with_range(config.yahoo_range.clone());
        let crypto = CoinGeckoClient::new(config.coingecko_url.clone(), &http)?;
        let cnb = Arc::new(CnbClient::new(
            config.cnb_api_url.clone(),
            config.cnb_fx_fixing_url.clone(),
            &http,
        )?);

        Ok(Self {
            equities: Arc::new(equities),
            crypto: Arc::new(crypto),
            short_term_bonds: cnb.clone(),
            long_term_rate: cnb.clone(),
            fx: cnb,
        })
    }
}

/// 수집 라운드.
pub struct CollectionRound {
    sources: Sources,
    roster: RosterConfig,
}

impl CollectionRound {
    pub fn new(sources: Sources, roster: RosterConfig) -> Self {
        Self { sources, roster }
    }

    /// 라운드를 한 번 실행합니다.
    ///
    /// 항상 스냅샷을 반환합니다. 실패한 항목은 값 없음으로 남습니다.
    pub async fn run(&self) -> (Snapshot, RoundStats) {
        let start = Instant::now();
        let timestamp = Utc::now();

        debug!(timestamp = %timestamp, "수집 라운드 시작");

        let (stocks, cryptocurrencies, precious_metals, short_term_bonds, long_term_bond, exchange_rates) = tokio::join!(
            self.collect_stocks(),
            self.collect_crypto(),
            self.collect_metals(),
            self.collect_short_term_bonds(),
            self.collect_long_term_rate(),
            self.collect_exchange_rates(),
        );

        let mut stats = RoundStats::new();
        let stocks = unzip_quotes(stocks, &mut stats);
        let cryptocurrencies = unzip_quotes(cryptocurrencies, &mut stats);
        let precious_metals = unzip_quotes(precious_metals, &mut stats);
        let exchange_rates = unzip_quotes(exchange_rates, &mut stats);

        let (short_term_bonds, bond_outcome) = short_term_bonds;
        stats.record(bond_outcome);
        stats.bonds = short_term_bonds.len();

        let (long_term_bond, long_term_outcome) = long_term_bond;
        stats.record(long_term_outcome);

        let snapshot = Snapshot {
            timestamp,
            stocks,
            cryptocurrencies,
            precious_metals,
            short_term_bonds,
            long_term_bond,
            exchange_rates,
        };

        stats.elapsed = start.elapsed();
        log_snapshot(&snapshot);

        (snapshot, stats)
    }

    async fn collect_stocks(&self) -> Vec<(Quote, Outcome)> {
        join_all(self.roster.stocks.iter().map(|symbol| async move {
            let result = self.sources.equities.latest_close(symbol).await;
            settle("stocks", symbol, result)
        }))
        .await
    }

    async fn collect_crypto(&self) -> Vec<(Quote, Outcome)> {
        let vs_currency = self.roster.vs_currency.as_str();
        join_all(self.roster.cryptocurrencies.iter().map(|coin_id| async move {
            let result = self.sources.crypto.price(coin_id, vs_currency).await;
            settle("cryptocurrencies", coin_id, result)
        }))
        .await
    }

    /// 금속별로 독립 조회합니다. 금만 성공하고 은은 실패해도 됩니다.
    async fn collect_metals(&self) -> Vec<(Quote, Outcome)> {
        join_all(self.roster.metals.iter().map(|(metal, ticker)| async move {
            let result = self.sources.equities.latest_close(ticker).await;
            settle("precious_metals", metal, result)
        }))
        .await
    }

    async fn collect_short_term_bonds(&self) -> (Vec<BondRecord>, Outcome) {
        match self.sources.short_term_bonds.short_term_bonds().await {
            Ok(bonds) if bonds.is_empty() => {
                debug!("단기 국채 데이터 없음");
                (bonds, Outcome::Unavailable)
            }
            Ok(bonds) => (bonds, Outcome::Available),
            Err(e) => {
                warn!(category = "short_term_bonds", error = %e, "단기 국채 조회 실패");
                (Vec::new(), Outcome::Failed)
            }
        }
    }

    async fn collect_long_term_rate(&self) -> (LongTermBond, Outcome) {
        match self.sources.long_term_rate.long_term_rate().await {
            Ok(bond @ LongTermBond::Reported(_)) => (bond, Outcome::Available),
            Ok(bond) => {
                debug!(result = ?bond, "장기 금리 데이터 없음");
                (bond, Outcome::Unavailable)
            }
            Err(e) => {
                warn!(category = "long_term_bonds", error = %e, "장기 금리 조회 실패");
                (LongTermBond::Unavailable, Outcome::Failed)
            }
        }
    }

    /// 고시 파일은 한 번만 받고 로스터 통화별로 나눕니다.
    async fn collect_exchange_rates(&self) -> Vec<(Quote, Outcome)> {
        let currencies = &self.roster.currencies;
        if currencies.is_empty() {
            return Vec::new();
        }

        match self.sources.fx.fixing_rates(currencies).await {
            Ok(rates) => currencies
                .iter()
                .map(|code| match rates.get(code) {
                    Some(rate) => (Quote::available(code.as_str(), *rate), Outcome::Available),
                    None => {
                        debug!(currency = %code, "환율 고시에 통화 없음");
                        (Quote::unavailable(code.as_str()), Outcome::Unavailable)
                    }
                })
                .collect(),
            Err(e) => {
                warn!(category = "exchange_rates", error = %e, "환율 조회 실패");
                currencies
                    .iter()
                    .map(|code| (Quote::unavailable(code.as_str()), Outcome::Failed))
                    .collect()
            }
        }
    }
}

/// 어댑터 결과를 시세로 바꿉니다. 실패는 로그를 남기고 값 없음으로 처리합니다.
fn settle(category: &'static str, instrument: &str, result: SourceResult<Option<f64>>) -> (Quote, Outcome) {
    match result {
        Ok(Some(price)) => (Quote::available(instrument, price), Outcome::Available),
        Ok(None) => {
            debug!(category = category, instrument = instrument, "데이터 없음");
            (Quote::unavailable(instrument), Outcome::Unavailable)
        }
        Err(e) => {
            warn!(
                category = category,
                instrument = instrument,
                provider = e.provider(),
                error = %e,
                "조회 실패"
            );
            (Quote::unavailable(instrument), Outcome::Failed)
        }
    }
}

fn unzip_quotes(entries: Vec<(Quote, Outcome)>, stats: &mut RoundStats) -> Vec<Quote> {
    let (quotes, outcomes): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
    stats.record_all(outcomes);
    quotes
}

fn log_snapshot(snapshot: &Snapshot) {
    let ts = snapshot.timestamp;
    for q in &snapshot.stocks {
        info!(timestamp = %ts, symbol = %q.instrument_id, price = ?q.price, "Stock");
    }
    for q in &snapshot.cryptocurrencies {
        info!(timestamp = %ts, crypto = %q.instrument_id, price = ?q.price, "Crypto");
    }
    for q in &snapshot.precious_metals {
        info!(timestamp = %ts, metal = %q.instrument_id, price = ?q.price, "Precious metal");
    }
    for q in &snapshot.exchange_rates {
        info!(timestamp = %ts, currency = %q.instrument_id, czk_per_unit = ?q.price, "Exchange rate");
    }
    info!(
        timestamp = %ts,
        short_term_bonds = snapshot.short_term_bonds.len(),
        long_term = ?snapshot.long_term_bond,
        "Bonds"
    );
}
