//! 설정 모듈.
//!
//! 설정은 다음 순서로 덮어씁니다:
//! 1. 코드 기본값 (기본 로스터, 공개 API URL)
//! 2. TOML 설정 파일 (기본 `config/collector.toml`, 없으면 무시)
//! 3. `AURET__` 접두사 환경변수 (예: `AURET__DAEMON__INTERVAL_SECS=30`,
//!    `AURET__ROSTER__STOCKS=MSFT,AAPL`)
//!
//! InfluxDB 토큰은 코드에 두지 않습니다. `AURET__INFLUX__TOKEN` 또는 `INFLUXDB_TOKEN`으로 주입합니다.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use auret_data::provider::{cnb, coingecko, http::DEFAULT_TIMEOUT_SECS, HttpSettings};
use auret_data::InfluxConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::error::CollectorError;
use crate::modules::persist::MissingValuePolicy;
use crate::Result;

/// 기본 설정 파일 경로
pub const DEFAULT_CONFIG_PATH: &str = "config/collector.toml";

/// 환경변수 접두사
const ENV_PREFIX: &str = "AURET";

/// 토큰 폴백 환경변수
const TOKEN_ENV_FALLBACK: &str = "INFLUXDB_TOKEN";

/// 쉼표 구분 목록으로 읽는 환경변수 키
const LIST_KEYS: [&str; 3] = ["roster.stocks", "roster.cryptocurrencies", "roster.currencies"];

/// Collector 전체 설정
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// InfluxDB 설정
    pub influx: InfluxSettings,
    /// 데이터 소스 설정
    pub sources: SourcesConfig,
    /// 수집 대상 종목
    pub roster: RosterConfig,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
    /// 저장 설정
    pub writer: WriterConfig,
}

/// InfluxDB 설정
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InfluxSettings {
    /// 서버 URL
    pub url: String,
    /// 조직
    pub org: String,
    /// 버킷
    pub bucket: String,
    /// API 토큰
    #[serde(deserialize_with = "deserialize_secret")]
    pub token: Option<SecretString>,
    /// 쓰기 타임아웃 (초)
    pub timeout_secs: u64,
}

/// 데이터 소스 설정
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// HTTP 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// User-Agent
    pub user_agent: String,
    /// CoinGecko API URL
    pub coingecko_url: String,
    /// CNB Open API URL
    pub cnb_api_url: String,
    /// CNB 환율 고시 파일 URL
    pub cnb_fx_fixing_url: String,
    /// Yahoo Finance 조회 기간
    pub yahoo_range: String,
}

/// 수집 대상 종목
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RosterConfig {
    /// Yahoo Finance 심볼
    pub stocks: Vec<String>,
    /// CoinGecko 코인 ID
    pub cryptocurrencies: Vec<String>,
    /// 암호화폐 가격 기준 법정화폐
    pub vs_currency: String,
    /// 금속명 → Yahoo Finance 선물 심볼
    pub metals: BTreeMap<String, String>,
    /// CNB 고시에서 추적할 통화 코드
    pub currencies: Vec<String>,
}

/// 데몬 모드 설정
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// 라운드 실행 주기 (초 단위)
    pub interval_secs: u64,
}

/// 저장 설정
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// 값이 없는 필드 처리 방식 (zero | omit)
    pub missing_values: MissingValuePolicy,
}

impl Default for InfluxSettings {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8086".to_string(),
            org: "Auret".to_string(),
            bucket: "financial_data".to_string(),
            token: None,
            timeout_secs: 10,
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        let http = HttpSettings::default();
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: http.user_agent,
            coingecko_url: coingecko::DEFAULT_BASE_URL.to_string(),
            cnb_api_url: cnb::DEFAULT_API_URL.to_string(),
            cnb_fx_fixing_url: cnb::DEFAULT_FX_FIXING_URL.to_string(),
            yahoo_range: "1d".to_string(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            stocks: to_strings(&["^GSPC", "VUN.TO", "MSFT", "CEZ.PR"]),
            cryptocurrencies: to_strings(&["bitcoin", "ethereum"]),
            vs_currency: "usd".to_string(),
            metals: [("gold", "GC=F"), ("silver", "SI=F")]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            currencies: to_strings(&["EUR", "USD"]),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl CollectorConfig {
    /// 설정 파일과 환경변수에서 설정 로드
    ///
    /// `path`가 주어지면 해당 파일이 반드시 있어야 하고,
    /// 없으면 `config/collector.toml`을 있을 때만 읽습니다.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            .add_source(env_source());

        let mut config = Self::from_builder(builder)?;

        if config.influx.token.is_none() {
            config.influx.token = std::env::var(TOKEN_ENV_FALLBACK).ok().map(secret);
        }

        config.validate()?;
        Ok(config)
    }

    /// 빌더에서 설정을 역직렬화합니다 (검증 전).
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// 설정 값 검증
    pub fn validate(&self) -> Result<()> {
        if self.influx.token.is_none() {
            return Err(CollectorError::Config(format!(
                "InfluxDB 토큰이 설정되지 않았습니다 (AURET__INFLUX__TOKEN 또는 {})",
                TOKEN_ENV_FALLBACK
            )));
        }
        if self.daemon.interval_secs == 0 {
            return Err(CollectorError::Config(
                "daemon.interval_secs는 0보다 커야 합니다".to_string(),
            ));
        }
        if self.sources.timeout_secs == 0 || self.influx.timeout_secs == 0 {
            return Err(CollectorError::Config(
                "타임아웃은 0보다 커야 합니다".to_string(),
            ));
        }
        Ok(())
    }

    /// InfluxDB 클라이언트 설정
    pub fn influx_config(&self) -> Result<InfluxConfig> {
        let token = self
            .influx
            .token
            .as_ref()
            .ok_or_else(|| CollectorError::Config("InfluxDB 토큰 없음".to_string()))?;

        Ok(InfluxConfig {
            url: self.influx.url.clone(),
            org: self.influx.org.clone(),
            bucket: self.influx.bucket.clone(),
            token: secret(token.expose_secret().to_owned()),
            timeout: Duration::from_secs(self.influx.timeout_secs),
        })
    }
}

impl SourcesConfig {
    /// 소스 공용 HTTP 설정
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.timeout(),
            user_agent: self.user_agent.clone(),
        }
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DaemonConfig {
    /// 라운드 실행 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// `AURET__SECTION__KEY` 환경변수 소스
pub fn env_source() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .list_separator(",")
            .try_parsing(true),
        |env, key| env.with_list_parse_key(key),
    )
}

fn secret(value: String) -> SecretString {
    SecretString::new(value.into_boxed_str())
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()).map(secret))
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
