//! 시계열 저장소.
//!
//! - `Point` - 측정값/태그/필드/타임스탬프 단위
//! - `PointSink` - 배치 쓰기 trait (테스트에서는 가짜 구현으로 대체)
//! - `InfluxWriter` - InfluxDB 2.x 라인 프로토콜 구현

pub mod influx;
pub mod point;

pub use influx::{InfluxConfig, InfluxWriter, PointSink};
pub use point::{encode_batch, Point};
