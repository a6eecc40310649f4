//! 시세 수집을 위한 도메인 모델.

mod bond;
mod quote;
mod snapshot;

pub use bond::*;
pub use quote::*;
pub use snapshot::*;
