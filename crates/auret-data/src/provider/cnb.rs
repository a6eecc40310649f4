//! 체코 국립은행(CNB) 클라이언트.
//!
//! 세 가지 공개 데이터를 조회합니다.
//!
//! # 단기 국채 (SKD)
//!
//! `GET {api}/skd/daily`
//!
//! ```json
//! { "skds": [ { "settlementDate": "2025-02-04", "isin": "CZ0001007421",
//!               "issueCode": "SKD 1/25", "issueName": "SKD 1/25",
//!               "nominalValueCZK": 1000000, "averagePriceToValue": 99.512,
//!               "nominalValueOfSettlementCZK": 5000000000 } ] }
//! ```
//!
//! # CZEONIA 일일 금리
//!
//! `GET {api}/czeonia/daily`
//!
//! ```json
//! { "czeoniaDaily": { "validFor": "2025-02-04", "volumeInCZKmio": 14347, "rate": 3.8 } }
//! ```
//!
//! # 환율 고시
//!
//! 파이프로 구분된 텍스트 파일입니다. 첫 줄은 날짜, 둘째 줄은 컬럼 헤더,
//! 이후 `country|currency|amount|code|rate` 행이 이어집니다. 환율은 쉼표 소수점을 씁니다.
//!
//! ```text
//! 04 Feb 2025 #24
//! Country|Currency|Amount|Code|Rate
//! EMU|euro|1|EUR|25,125
//! Japan|yen|100|JPY|15,540
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use auret_core::{BondRecord, LongTermBond, LongTermRate, UNKNOWN_ISSUE_CODE};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::http::{self, optional_number, optional_string, HttpSettings};
use super::{FxRateProvider, LongTermRateProvider, ShortTermBondProvider};
use crate::error::{snippet, SourceResult};

const PROVIDER: &str = "cnb";

/// CNB Open API 기본 URL
pub const DEFAULT_API_URL: &str = "https://api.cnb.cz/cnbapi";

/// CNB 일일 환율 고시 파일 URL
pub const DEFAULT_FX_FIXING_URL: &str =
    "https://www.cnb.cz/en/financial_markets/foreign_exchange_market/exchange_rate_fixing/daily.txt";

/// 환율 고시 파일의 헤더 줄 수 (날짜, 컬럼명)
const FX_HEADER_LINES: usize = 2;

/// CNB 클라이언트.
#[derive(Clone)]
pub struct CnbClient {
    client: reqwest::Client,
    api_url: String,
    fx_fixing_url: String,
}

impl CnbClient {
    /// 새 클라이언트를 생성합니다.
    pub fn new(
        api_url: impl Into<String>,
        fx_fixing_url: impl Into<String>,
        settings: &HttpSettings,
    ) -> SourceResult<Self> {
        Ok(Self {
            client: settings.build_client()?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            fx_fixing_url: fx_fixing_url.into(),
        })
    }

    async fn get_api(&self, path: &str) -> SourceResult<Value> {
        let url = format!("{}/{}", self.api_url, path);
        http::get_json(&self.client, PROVIDER, &url, &[]).await
    }
}

#[async_trait]
impl ShortTermBondProvider for CnbClient {
    async fn short_term_bonds(&self) -> SourceResult<Vec<BondRecord>> {
        let data = self.get_api("skd/daily").await?;
        let bonds = parse_short_term_bonds(&data);
        info!(count = bonds.len(), "CNB 단기 국채 조회 완료");
        Ok(bonds)
    }
}

#[async_trait]
impl LongTermRateProvider for CnbClient {
    async fn long_term_rate(&self) -> SourceResult<LongTermBond> {
        let data = self.get_api("czeonia/daily").await?;
        let result = parse_long_term_rate(&data);
        debug!(result = ?result, "CNB CZEONIA 조회 완료");
        Ok(result)
    }
}

#[async_trait]
impl FxRateProvider for CnbClient {
    async fn fixing_rates(&self, codes: &[String]) -> SourceResult<BTreeMap<String, f64>> {
        let text = http::get_text(&self.client, PROVIDER, &self.fx_fixing_url, &[]).await?;
        let rates = parse_fx_fixing(&text, codes);
        debug!(rates = ?rates, "CNB 환율 고시 조회 완료");
        Ok(rates)
    }
}

/// 단기 국채 응답을 파싱합니다.
///
/// `skds` 목록이 없으면 경고를 남기고 빈 목록을 반환합니다.
/// 발행 코드가 중복되면 마지막 항목이 남습니다. 결과는 발행 코드 순입니다.
pub fn parse_short_term_bonds(data: &Value) -> Vec<BondRecord> {
    let Some(skds) = data.get("skds").and_then(Value::as_array) else {
        warn!(body = %snippet(&data.to_string()), "CNB 단기 국채: 예상하지 못한 응답 형식");
        return Vec::new();
    };

    let mut by_code: BTreeMap<String, BondRecord> = BTreeMap::new();

    for entry in skds {
        if !entry.is_object() {
            warn!(entry = %snippet(&entry.to_string()), "CNB 단기 국채: 객체가 아닌 항목 무시");
            continue;
        }

        let issue_code =
            optional_string(entry, "issueCode").unwrap_or_else(|| UNKNOWN_ISSUE_CODE.to_string());

        let record = BondRecord {
            settlement_date: optional_string(entry, "settlementDate"),
            isin: optional_string(entry, "isin"),
            issue_name: optional_string(entry, "issueName"),
            nominal_value: optional_number(PROVIDER, entry, "nominalValueCZK"),
            average_price_to_value: optional_number(PROVIDER, entry, "averagePriceToValue"),
            nominal_value_of_settlement: optional_number(
                PROVIDER,
                entry,
                "nominalValueOfSettlementCZK",
            ),
            ..BondRecord::new(issue_code.clone())
        };

        if by_code.insert(issue_code.clone(), record).is_some() {
            debug!(issue_code = %issue_code, "CNB 단기 국채: 중복 발행 코드, 마지막 항목 사용");
        }
    }

    by_code.into_values().collect()
}

/// CZEONIA 응답을 파싱합니다.
///
/// `czeoniaDaily` 객체가 없으면 `LongTermBond::Empty`.
pub fn parse_long_term_rate(data: &Value) -> LongTermBond {
    let Some(daily) = data.get("czeoniaDaily").filter(|d| d.is_object()) else {
        warn!(body = %snippet(&data.to_string()), "CNB CZEONIA: 예상하지 못한 응답 형식");
        return LongTermBond::Empty;
    };

    LongTermBond::Reported(LongTermRate {
        rate: optional_number(PROVIDER, daily, "rate"),
        valid_for: optional_string(daily, "validFor"),
        volume_in_czk_mio: optional_number(PROVIDER, daily, "volumeInCZKmio"),
    })
}

/// 환율 고시 파일을 파싱합니다.
///
/// `codes`에 있는 통화만 골라 1단위당 환율(`rate / amount`)을 계산합니다.
/// 잘못된 행은 하나씩 건너뛰고 로그를 남기며, 나머지 행의 파싱은 계속됩니다.
pub fn parse_fx_fixing(text: &str, codes: &[String]) -> BTreeMap<String, f64> {
    let mut rates = BTreeMap::new();

    for (idx, line) in text.lines().enumerate().skip(FX_HEADER_LINES) {
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('|').map(str::trim).collect();
        if parts.len() < 5 {
            warn!(line_no = idx + 1, line = line, "CNB 환율: 필드 수 부족, 행 무시");
            continue;
        }

        let code = parts[3];
        if !codes.iter().any(|c| c == code) {
            continue;
        }

        match parse_fx_row(parts[2], parts[4]) {
            Some(per_unit) => {
                rates.insert(code.to_string(), per_unit);
            }
            None => {
                warn!(line_no = idx + 1, line = line, "CNB 환율: 숫자 변환 실패, 행 무시");
            }
        }
    }

    rates
}

/// 단위 수량과 쉼표 소수점 환율로 1단위당 환율을 계산합니다.
fn parse_fx_row(amount: &str, rate: &str) -> Option<f64> {
    let amount: f64 = amount.parse().ok()?;
    let rate: f64 = rate.replace(',', ".").parse().ok()?;

    if amount <= 0.0 || !rate.is_finite() {
        return None;
    }

    Some(rate / amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use serde_json::json;

    fn tracked() -> Vec<String> {
        vec!["EUR".to_string(), "USD".to_string()]
    }

    const FIXING: &str = "04 Feb 2025 #24\n\
        Country|Currency|Amount|Code|Rate\n\
        Australia|dollar|1|AUD|15,012\n\
        EMU|euro|1|EUR|25,125\n\
        Japan|yen|100|JPY|15,540\n\
        USA|dollar|1|USD|24,285\n";

    #[test]
    fn test_parse_fx_fixing_tracked_codes_only() {
        let rates = parse_fx_fixing(FIXING, &tracked());

        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("EUR"), Some(&25.125));
        assert_eq!(rates.get("USD"), Some(&24.285));
        assert!(rates.get("JPY").is_none());
    }

    #[test]
    fn test_parse_fx_fixing_divides_by_amount() {
        let text = "date\nheader\nEMU|euro|100|EUR|125,50\n";
        let rates = parse_fx_fixing(text, &tracked());

        let eur = rates.get("EUR").copied().unwrap();
        assert!((eur - 1.2550).abs() < 1e-12);
    }

    #[test]
    fn test_parse_fx_fixing_skips_malformed_lines() {
        let text = "date\nheader\n\
            EMU|euro|1|EUR|n/a\n\
            broken line\n\
            USA|dollar|0|USD|24,285\n\
            USA|dollar|1|USD|24,285\n";
        let rates = parse_fx_fixing(text, &tracked());

        assert!(rates.get("EUR").is_none());
        assert_eq!(rates.get("USD"), Some(&24.285));
    }

    #[test]
    fn test_parse_fx_fixing_headers_only() {
        let rates = parse_fx_fixing("date\nheader\n", &tracked());
        assert!(rates.is_empty());

        let rates = parse_fx_fixing("", &tracked());
        assert!(rates.is_empty());
    }

    #[test]
    fn test_parse_short_term_bonds_last_duplicate_wins() {
        let data = json!({
            "skds": [
                { "issueCode": "SKD 2/25", "issueName": "first", "averagePriceToValue": 99.1 },
                { "issueCode": "SKD 1/25", "issueName": "other", "averagePriceToValue": 98.0 },
                { "issueCode": "SKD 2/25", "issueName": "second", "averagePriceToValue": 99.7 }
            ]
        });

        let bonds = parse_short_term_bonds(&data);

        assert_eq!(bonds.len(), 2);
        assert_eq!(bonds[0].issue_code, "SKD 1/25");
        assert_eq!(bonds[1].issue_code, "SKD 2/25");
        assert_eq!(bonds[1].issue_name.as_deref(), Some("second"));
        assert_eq!(bonds[1].average_price_to_value, Some(99.7));
    }

    #[test]
    fn test_parse_short_term_bonds_fields() {
        let data = json!({
            "skds": [{
                "settlementDate": "2025-02-04",
                "isin": "CZ0001007421",
                "issueCode": "SKD 1/25",
                "issueName": "SKD 1/25",
                "nominalValueCZK": 1000000,
                "averagePriceToValue": "bad",
                "nominalValueOfSettlementCZK": 5000000000u64
            }, {
                "issueName": "no code"
            }]
        });

        let bonds = parse_short_term_bonds(&data);
        assert_eq!(bonds.len(), 2);

        let skd = &bonds[0];
        assert_eq!(skd.settlement_date.as_deref(), Some("2025-02-04"));
        assert_eq!(skd.isin.as_deref(), Some("CZ0001007421"));
        assert_eq!(skd.nominal_value, Some(1_000_000.0));
        assert_eq!(skd.average_price_to_value, None);
        assert_eq!(skd.nominal_value_of_settlement, Some(5_000_000_000.0));

        assert_eq!(bonds[1].issue_code, UNKNOWN_ISSUE_CODE);
    }

    #[test]
    fn test_parse_short_term_bonds_missing_list() {
        assert!(parse_short_term_bonds(&json!({})).is_empty());
        assert!(parse_short_term_bonds(&json!({ "skds": "none" })).is_empty());
        assert!(parse_short_term_bonds(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_parse_long_term_rate() {
        let data = json!({
            "czeoniaDaily": { "validFor": "2025-02-04", "volumeInCZKmio": 14347, "rate": 3.8 }
        });

        let expected = LongTermRate {
            rate: Some(3.8),
            valid_for: Some("2025-02-04".to_string()),
            volume_in_czk_mio: Some(14347.0),
        };
        assert_eq!(parse_long_term_rate(&data), LongTermBond::Reported(expected));
    }

    #[test]
    fn test_parse_long_term_rate_missing_key_is_empty() {
        assert_eq!(parse_long_term_rate(&json!({})), LongTermBond::Empty);
        assert_eq!(
            parse_long_term_rate(&json!({ "czeoniaDaily": null })),
            LongTermBond::Empty
        );
    }

    #[test]
    fn test_parse_long_term_rate_partial_fields() {
        let data = json!({ "czeoniaDaily": { "rate": "x" } });

        let LongTermBond::Reported(rate) = parse_long_term_rate(&data) else {
            panic!("expected reported rate");
        };
        assert_eq!(rate.rate, None);
        assert_eq!(rate.valid_for, None);
        assert_eq!(rate.volume_in_czk_mio, None);
    }

    async fn client_for(server: &mockito::ServerGuard) -> CnbClient {
        CnbClient::new(
            format!("{}/cnbapi", server.url()),
            format!("{}/daily.txt", server.url()),
            &HttpSettings::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_client_endpoints() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cnbapi/skd/daily")
            .with_body(r#"{"skds":[{"issueCode":"SKD 1/25","averagePriceToValue":99.5}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/cnbapi/czeonia/daily")
            .with_body("{}")
            .create_async()
            .await;
        server
            .mock("GET", "/daily.txt")
            .with_body(FIXING)
            .create_async()
            .await;

        let client = client_for(&server).await;

        let bonds = client.short_term_bonds().await.unwrap();
        assert_eq!(bonds.len(), 1);
        assert_eq!(bonds[0].average_price_to_value, Some(99.5));

        assert_eq!(client.long_term_rate().await.unwrap(), LongTermBond::Empty);

        let rates = client.fixing_rates(&tracked()).await.unwrap();
        assert_eq!(rates.get("EUR"), Some(&25.125));
    }

    #[tokio::test]
    async fn test_client_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/cnbapi/skd/daily")
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server).await;
        let err = client.short_term_bonds().await.unwrap_err();

        assert!(matches!(err, SourceError::Transport { .. }));
        assert_eq!(err.provider(), "cnb");
    }
}
