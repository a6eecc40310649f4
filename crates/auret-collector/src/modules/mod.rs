//! 수집 모듈.
//!
//! - `round` - 소스 동시 조회와 스냅샷 생성
//! - `persist` - 스냅샷 → 포인트 변환과 배치 저장
//! - `collector` - 라운드 + 저장을 묶은 한 주기
//! - `daemon` - 주기 실행 루프

pub mod collector;
pub mod daemon;
pub mod persist;
pub mod round;

#[cfg(test)]
pub(crate) mod testing;

pub use collector::Collector;
pub use daemon::{run_daemon, DaemonStats};
pub use persist::{snapshot_to_points, write_snapshot, MissingValuePolicy};
pub use round::{CollectionRound, Sources};
