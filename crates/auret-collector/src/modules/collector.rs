//! 한 주기의 수집과 저장.

use std::sync::Arc;

use auret_core::Snapshot;
use auret_data::PointSink;
use tracing::{error, info};

use super::persist::{write_snapshot, MissingValuePolicy};
use super::round::CollectionRound;
use crate::stats::RoundStats;

/// 라운드 실행 후 결과를 저장소에 기록합니다.
pub struct Collector {
    round: CollectionRound,
    sink: Arc<dyn PointSink>,
    policy: MissingValuePolicy,
}

impl Collector {
    pub fn new(round: CollectionRound, sink: Arc<dyn PointSink>, policy: MissingValuePolicy) -> Self {
        Self { round, sink, policy }
    }

    /// 라운드를 한 번 실행하고 저장합니다.
    ///
    /// 저장 실패는 로그로 남기고 통계에만 표시합니다. 다음 주기는 영향받지 않습니다.
    pub async fn collect_once(&self) -> (Snapshot, RoundStats) {
        let (snapshot, mut stats) = self.round.run().await;

        match write_snapshot(self.sink.as_ref(), &snapshot, self.policy).await {
            Ok(written) => {
                stats.points_written = written;
                info!(
                    sink = self.sink.name(),
                    points = written,
                    timestamp = %snapshot.timestamp,
                    "Data written"
                );
            }
            Err(e) => {
                stats.write_failed = true;
                error!(sink = self.sink.name(), error = %e, "Failed to write data");
            }
        }

        (snapshot, stats)
    }
}
