//! 시계열 포인트와 InfluxDB 라인 프로토콜 인코딩.
//!
//! ```text
//! measurement,tag1=v1,tag2=v2 field1=1.5,field2=3 1738627200000000000
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};

/// 시계열 포인트 하나.
///
/// 태그는 인덱스되는 식별자, 필드는 숫자 값입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, f64>,
    pub timestamp: DateTime<Utc>,
}

impl Point {
    /// 새 포인트를 생성합니다.
    pub fn new(measurement: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp,
        }
    }

    /// 태그를 추가합니다.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// 필드를 추가합니다.
    pub fn field(mut self, key: impl Into<String>, value: f64) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    /// 기록할 수 있는 필드가 있는지 여부.
    pub fn has_fields(&self) -> bool {
        self.fields.values().any(|v| v.is_finite())
    }

    /// 라인 프로토콜 한 줄로 인코딩합니다 (나노초 정밀도).
    ///
    /// 빈 태그 값과 유한하지 않은 필드는 프로토콜이 허용하지 않으므로 빠집니다.
    /// 기록할 필드가 없으면 `None`.
    pub fn to_line_protocol(&self) -> Option<String> {
        let fields: Vec<String> = self
            .fields
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(k, v)| format!("{}={}", escape_key(k), v))
            .collect();

        if fields.is_empty() {
            return None;
        }

        let mut line = escape_measurement(&self.measurement);
        for (key, value) in self.tags.iter().filter(|(_, v)| !v.is_empty()) {
            let _ = write!(line, ",{}={}", escape_key(key), escape_key(value));
        }
        line.push(' ');
        line.push_str(&fields.join(","));

        if let Some(nanos) = self.timestamp.timestamp_nanos_opt() {
            let _ = write!(line, " {}", nanos);
        }

        Some(line)
    }
}

/// 포인트 목록을 배치 본문으로 인코딩합니다.
pub fn encode_batch(points: &[Point]) -> String {
    points
        .iter()
        .filter_map(Point::to_line_protocol)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_measurement(s: &str) -> String {
    escape(s, &[',', ' '])
}

/// 태그 키/값, 필드 키 이스케이프.
fn escape_key(s: &str) -> String {
    escape(s, &[',', '=', ' '])
}

/// 줄바꿈은 프로토콜에서 이스케이프할 수 없으므로 공백으로 바꿉니다.
fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' => out.push_str("\\ "),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
