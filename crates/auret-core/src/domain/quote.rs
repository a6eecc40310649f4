//! 단일 종목 시세 타입.
//!
//! 주식, 암호화폐, 귀금속, 환율은 모두 같은 형태로 표현됩니다:
//! 종목 식별자와 선택적 가격.

use serde::{Deserialize, Serialize};

/// 종목 시세.
///
/// `price`가 `None`이면 해당 라운드에 소스가 사용 가능한 값을 주지 않았다는 뜻입니다.
/// 이는 에러가 아닌 정상 상태이며, 0과는 구분됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 종목 식별자 (티커, 코인 ID, 금속명, 통화 코드)
    pub instrument_id: String,
    /// 가격 (없으면 None)
    pub price: Option<f64>,
}

impl Quote {
    /// 새 시세를 생성합니다.
    pub fn new(instrument_id: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            instrument_id: instrument_id.into(),
            price,
        }
    }

    /// 가격이 있는 시세를 생성합니다.
    pub fn available(instrument_id: impl Into<String>, price: f64) -> Self {
        Self::new(instrument_id, Some(price))
    }

    /// 가격이 없는 시세를 생성합니다.
    pub fn unavailable(instrument_id: impl Into<String>) -> Self {
        Self::new(instrument_id, None)
    }

    /// 가격 보유 여부.
    pub fn is_available(&self) -> bool {
        self.price.is_some()
    }
}

/// 시세 목록에서 종목 가격을 찾습니다.
///
/// 종목이 목록에 없거나 가격이 없으면 `None`.
pub fn find_price(quotes: &[Quote], instrument_id: &str) -> Option<f64> {
    quotes
        .iter()
        .find(|q| q.instrument_id == instrument_id)
        .and_then(|q| q.price)
}
