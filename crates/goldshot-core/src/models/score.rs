//! 구도 점수.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 구도 점수 (0.0 ~ 1.0, 높을수록 좋음)
///
/// 생성 시 항상 클램프된다. NaN은 0.0으로 취급.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositionScore(f32);

impl CompositionScore {
    /// 최저 점수
    pub const MIN: CompositionScore = CompositionScore(0.0);
    /// 최고 점수
    pub const MAX: CompositionScore = CompositionScore(1.0);

    /// 임의 값을 [0, 1]로 클램프하여 생성
    pub fn new(raw: f32) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        Self(raw.clamp(Self::MIN.0, Self::MAX.0))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// 임계값 이상인지 (`score >= threshold`)
    pub fn clears(&self, threshold: f32) -> bool {
        self.0 >= threshold
    }
}

impl fmt::Display for CompositionScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
