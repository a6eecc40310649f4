//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 소스 조회 한 건의 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 값 수신
    Available,
    /// 소스에 값이 없음 (정상)
    Unavailable,
    /// 전송/형식/값 실패
    Failed,
}

/// 라운드 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundStats {
    /// 총 조회 건수
    pub total: usize,
    /// 값을 받은 건수
    pub available: usize,
    /// 값이 없던 건수
    pub unavailable: usize,
    /// 실패 건수
    pub failed: usize,
    /// 단기 국채 기록 수
    pub bonds: usize,
    /// 기록한 포인트 수
    pub points_written: usize,
    /// 저장소 쓰기 실패 여부
    pub write_failed: bool,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RoundStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 조회 결과 한 건 반영
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Available => self.available += 1,
            Outcome::Unavailable => self.unavailable += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    /// 여러 결과 반영
    pub fn record_all<I: IntoIterator<Item = Outcome>>(&mut self, outcomes: I) {
        for outcome in outcomes {
            self.record(outcome);
        }
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.available as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            available = self.available,
            unavailable = self.unavailable,
            failed = self.failed,
            bonds = self.bonds,
            points_written = self.points_written,
            write_failed = self.write_failed,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
