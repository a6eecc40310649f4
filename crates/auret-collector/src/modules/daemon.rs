//! 데몬 모드 실행 루프.
//!
//! 고정 주기로 라운드를 실행합니다. 라운드가 주기보다 길어지면 다음 라운드는
//! 이전 라운드가 끝난 직후 시작하며, 라운드는 겹치지 않습니다.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::collector::Collector;

/// 데몬 실행 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaemonStats {
    /// 완료된 라운드 수
    pub rounds: usize,
    /// 저장에 실패한 라운드 수
    pub failed_writes: usize,
    /// 라운드 진행 중 종료되었는지 여부
    pub interrupted: bool,
}

/// `shutdown`이 완료될 때까지 `period` 주기로 수집합니다.
///
/// 첫 라운드는 즉시 시작합니다. 진행 중인 라운드에서 종료 신호를 받으면
/// 그 라운드의 데이터는 저장하지 않고 버립니다.
pub async fn run_daemon<F>(collector: &Collector, period: Duration, shutdown: F) -> DaemonStats
where
    F: Future<Output = ()>,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut stats = DaemonStats::default();
    info!(interval_secs = period.as_secs(), "데몬 모드 시작");

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("종료 신호 수신, 데몬 종료");
                break;
            }
            _ = interval.tick() => {
                tokio::select! {
                    _ = &mut shutdown => {
                        warn!("라운드 진행 중 종료 신호 수신, 이번 라운드는 버립니다");
                        stats.interrupted = true;
                        break;
                    }
                    (_, round) = collector.collect_once() => {
                        stats.rounds += 1;
                        if round.write_failed {
                            stats.failed_writes += 1;
                        }
                        round.log_summary("수집 라운드");
                        debug!(rounds = stats.rounds, "다음 주기 대기");
                    }
                }
            }
        }
    }

    info!(
        rounds = stats.rounds,
        failed_writes = stats.failed_writes,
        interrupted = stats.interrupted,
        "데몬 종료"
    );
    stats
}
