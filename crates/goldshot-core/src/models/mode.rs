//! 캡처 모드 모델.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 캡처 모드
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    /// 수동 촬영 + 힌트 순환
    #[default]
    Manual,
    /// 자동 촬영 (구도 점수 기반)
    Auto,
    /// 수동 + 자동 동시 동작, 고정 안내 문구
    Combined,
}

impl CaptureMode {
    /// 전체 모드
    pub const ALL: [CaptureMode; 3] = [CaptureMode::Manual, CaptureMode::Auto, CaptureMode::Combined];

    /// 샘플링/점수 루프가 동작하는 모드인지
    pub fn samples_frames(&self) -> bool {
        matches!(self, CaptureMode::Auto | CaptureMode::Combined)
    }

    /// 직렬화/CLI 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureMode::Manual => "manual",
            CaptureMode::Auto => "auto",
            CaptureMode::Combined => "combined",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaptureMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manual" => Ok(CaptureMode::Manual),
            "auto" => Ok(CaptureMode::Auto),
            "combined" => Ok(CaptureMode::Combined),
            other => Err(CoreError::InvalidArguments(format!(
                "알 수 없는 캡처 모드: {other} (manual|auto|combined)"
            ))),
        }
    }
}
