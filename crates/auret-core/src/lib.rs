//! # Auret Core
//!
//! 시세 수집기의 핵심 도메인 모델을 제공합니다.
//!
//! 이 크레이트는 수집기 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 시세 (`Quote`)
//! - 단기 국채 낙찰 기록 (`BondRecord`)
//! - CZEONIA 일일 금리 (`LongTermBond`, `LongTermRate`)
//! - 수집 라운드 스냅샷 (`Snapshot`)
//! - 로깅 인프라

pub mod domain;
pub mod logging;

pub use domain::*;
pub use logging::*;
