//! 체코 국립은행(CNB) 채권 데이터 타입.
//!
//! - `BondRecord` - 단기 국채(SKD) 낙찰 기록
//! - `LongTermRate` / `LongTermBond` - CZEONIA 일일 금리

use serde::{Deserialize, Serialize};

/// 발행 코드가 없는 채권 기록에 사용되는 키.
pub const UNKNOWN_ISSUE_CODE: &str = "unknown";

/// 단기 국채 낙찰 기록.
///
/// 스냅샷 안에서 `issue_code`는 유일합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondRecord {
    /// 발행 코드 (키)
    pub issue_code: String,
    /// 결제일
    pub settlement_date: Option<String>,
    /// ISIN
    pub isin: Option<String>,
    /// 발행명
    pub issue_name: Option<String>,
    /// 액면가 (CZK)
    pub nominal_value: Option<f64>,
    /// 평균 가격 대비 가치
    pub average_price_to_value: Option<f64>,
    /// 결제 액면가 (CZK)
    pub nominal_value_of_settlement: Option<f64>,
}

impl BondRecord {
    /// 발행 코드만 있는 빈 기록을 생성합니다.
    pub fn new(issue_code: impl Into<String>) -> Self {
        Self {
            issue_code: issue_code.into(),
            settlement_date: None,
            isin: None,
            issue_name: None,
            nominal_value: None,
            average_price_to_value: None,
            nominal_value_of_settlement: None,
        }
    }
}

/// CZEONIA 일일 금리.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongTermRate {
    /// 금리 (%)
    pub rate: Option<f64>,
    /// 기준일 (YYYY-MM-DD)
    pub valid_for: Option<String>,
    /// 거래량 (백만 CZK)
    pub volume_in_czk_mio: Option<f64>,
}

/// 라운드별 장기 금리 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LongTermBond {
    /// 당일 금리가 보고됨
    Reported(LongTermRate),
    /// 응답은 왔지만 금리 객체가 없음 (당일 데이터 없음)
    Empty,
    /// 조회 실패
    Unavailable,
}

impl LongTermBond {
    /// 보고된 금리를 반환합니다.
    pub fn reported(&self) -> Option<&LongTermRate> {
        match self {
            Self::Reported(rate) => Some(rate),
            Self::Empty | Self::Unavailable => None,
        }
    }
}
