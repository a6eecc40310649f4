//! Standalone market-data collector.
//!
//! 공개 시세 소스를 주기적으로 조회해 InfluxDB에 기록하는 바이너리를 제공합니다:
//! - 주식/지수 종가, 금/은 선물 (Yahoo Finance)
//! - 암호화폐 가격 (CoinGecko)
//! - 체코 단기 국채 낙찰, CZEONIA 금리, CZK 환율 고시 (CNB)

pub mod config;
pub mod error;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use modules::{run_daemon, Collector, CollectionRound, DaemonStats, MissingValuePolicy, Sources};
pub use stats::RoundStats;
