//! 스냅샷 → InfluxDB 포인트 변환.
//!
//! 측정값 이름과 태그 키는 기존 대시보드가 조회하는 스키마를 그대로 따릅니다.

use auret_core::{LongTermBond, Quote, Snapshot, UNKNOWN_ISSUE_CODE};
use auret_data::{Point, PointSink, SinkError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 측정값 이름.
pub mod measurement {
    pub const STOCKS: &str = "stocks";
    pub const CRYPTOCURRENCIES: &str = "cryptocurrencies";
    pub const PRECIOUS_METALS: &str = "precious_metals";
    pub const SHORT_TERM_BONDS: &str = "short_term_bonds";
    pub const LONG_TERM_BONDS: &str = "long_term_bonds";
    pub const EXCHANGE_RATES: &str = "exchange_rates";
}

/// 값이 없는 필드를 기록하는 방식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// 0으로 기록 (기존 대시보드 호환)
    #[default]
    Zero,
    /// 필드를 생략하고, 필드가 하나도 없으면 포인트를 버림
    Omit,
}

impl MissingValuePolicy {
    fn apply(self, point: Point, key: &str, value: Option<f64>) -> Point {
        match (value, self) {
            (Some(v), _) => point.field(key, v),
            (None, MissingValuePolicy::Zero) => point.field(key, 0.0),
            (None, MissingValuePolicy::Omit) => point,
        }
    }
}

/// 스냅샷을 포인트 목록으로 변환합니다.
///
/// 모든 포인트는 스냅샷 타임스탬프를 공유합니다.
pub fn snapshot_to_points(snapshot: &Snapshot, policy: MissingValuePolicy) -> Vec<Point> {
    let ts = snapshot.timestamp;
    let mut points = Vec::with_capacity(snapshot.quote_count() + snapshot.short_term_bonds.len() + 1);

    points.extend(quote_points(measurement::STOCKS, "symbol", &snapshot.stocks, ts, policy));
    points.extend(quote_points(
        measurement::CRYPTOCURRENCIES,
        "crypto",
        &snapshot.cryptocurrencies,
        ts,
        policy,
    ));
    points.extend(quote_points(
        measurement::PRECIOUS_METALS,
        "metal",
        &snapshot.precious_metals,
        ts,
        policy,
    ));

    for bond in &snapshot.short_term_bonds {
        let code = if bond.issue_code.is_empty() {
            UNKNOWN_ISSUE_CODE
        } else {
            bond.issue_code.as_str()
        };
        let name = bond.issue_name.as_deref().unwrap_or(UNKNOWN_ISSUE_CODE);

        let point = Point::new(measurement::SHORT_TERM_BONDS, ts)
            .tag("issueCode", code)
            .tag("issueName", name);
        points.push(policy.apply(point, "averagePriceToValue", bond.average_price_to_value));
    }

    // 보고된 장기 금리만 기록
    if let LongTermBond::Reported(rate) = &snapshot.long_term_bond {
        let point = Point::new(measurement::LONG_TERM_BONDS, ts).tag(
            "validFor",
            rate.valid_for.as_deref().unwrap_or(UNKNOWN_ISSUE_CODE),
        );
        let point = policy.apply(point, "rate", rate.rate);
        points.push(policy.apply(point, "volumeInCZKmio", rate.volume_in_czk_mio));
    }

    for quote in &snapshot.exchange_rates {
        let point = Point::new(measurement::EXCHANGE_RATES, ts).tag("currency", quote.instrument_id.as_str());
        points.push(policy.apply(point, "rate", quote.price));
    }

    points.retain(Point::has_fields);
    points
}

fn quote_points<'a>(
    measurement: &'a str,
    tag_key: &'a str,
    quotes: &'a [Quote],
    ts: DateTime<Utc>,
    policy: MissingValuePolicy,
) -> impl Iterator<Item = Point> + 'a {
    quotes.iter().map(move |quote| {
        let point = Point::new(measurement, ts).tag(tag_key, quote.instrument_id.as_str());
        policy.apply(point, "price", quote.price)
    })
}

/// 스냅샷을 한 번의 배치 쓰기로 저장하고 기록한 포인트 수를 반환합니다.
pub async fn write_snapshot(
    sink: &dyn PointSink,
    snapshot: &Snapshot,
    policy: MissingValuePolicy,
) -> Result<usize, SinkError> {
    let points = snapshot_to_points(snapshot, policy);
    if points.is_empty() {
        debug!("기록할 포인트 없음");
        return Ok(0);
    }

    sink.write_batch(&points).await?;
    debug!(sink = sink.name(), points = points.len(), "스냅샷 저장 완료");
    Ok(points.len())
}
