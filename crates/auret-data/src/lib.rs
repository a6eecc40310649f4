//! 시세 데이터 소스와 시계열 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - 소스 어댑터 (Yahoo Finance, CoinGecko, 체코 국립은행)
//! - 소스별 응답 파서 (JSON, 파이프 구분 환율 고시 파일)
//! - 시계열 포인트 모델과 InfluxDB 2.x 라인 프로토콜 저장소

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{SinkError, SourceError, SourceResult};

pub use provider::{
    CnbClient, CoinGeckoClient, CryptoQuoteProvider, EquityQuoteProvider, FxRateProvider,
    LongTermRateProvider, ShortTermBondProvider, YahooQuoteProvider,
};
pub use storage::{InfluxConfig, InfluxWriter, Point, PointSink};
