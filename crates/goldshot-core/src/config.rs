//! 애플리케이션 설정 구조체.
//!
//! 기본 모드/피사체, 쿨다운, 피드백 표시 시간, 점수 지터, 저장 경로 등
//! 런타임 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.
//! 피사체별 샘플링 주기/임계값은 설정이 아니라 [`crate::profile`]의 정책이다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::models::mode::CaptureMode;
use crate::models::subject::SubjectCategory;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 캡처 스케줄러 설정
    #[serde(default)]
    pub capture: CaptureConfig,
    /// 구도 점수 설정
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// 저장 설정
    #[serde(default)]
    pub output: OutputConfig,
}

// ============================================================
// 캡처 / 점수 / 저장 설정
// ============================================================

/// 캡처 스케줄러 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 세션 시작 시 모드
    #[serde(default)]
    pub default_mode: CaptureMode,
    /// 세션 시작 시 피사체
    #[serde(default)]
    pub default_subject: SubjectCategory,
    /// 자동 캡처 후 쿨다운 (밀리초)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// 수동 촬영 피드백 표시 시간 (밀리초)
    #[serde(default = "default_feedback_display_ms")]
    pub feedback_display_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_mode: CaptureMode::default(),
            default_subject: SubjectCategory::default(),
            debounce_ms: default_debounce_ms(),
            feedback_display_ms: default_feedback_display_ms(),
        }
    }
}

/// 구도 점수 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// 무작위 가산점 최대치 (0.0이면 결정적)
    #[serde(default)]
    pub jitter: f32,
    /// 지터/힌트 RNG 시드 (None이면 OS 엔트로피)
    #[serde(default)]
    pub seed: Option<u64>,
}

/// 캡처 저장 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 저장 디렉토리 (None이면 플랫폼 기본 사진 경로)
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// JPEG 품질 (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 자동 캡처 쿨다운을 Duration으로 반환
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.capture.debounce_ms)
    }

    /// 피드백 표시 시간을 Duration으로 반환
    pub fn feedback_display(&self) -> Duration {
        Duration::from_millis(self.capture.feedback_display_ms)
    }

    /// 값 범위 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.capture.debounce_ms == 0 {
            return Err(CoreError::Validation {
                field: "capture.debounce_ms".to_string(),
                message: "0보다 커야 합니다".to_string(),
            });
        }
        if self.capture.feedback_display_ms == 0 {
            return Err(CoreError::Validation {
                field: "capture.feedback_display_ms".to_string(),
                message: "0보다 커야 합니다".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.scoring.jitter) {
            return Err(CoreError::Validation {
                field: "scoring.jitter".to_string(),
                message: format!("0.0 ~ 1.0 범위여야 합니다: {}", self.scoring.jitter),
            });
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(CoreError::Validation {
                field: "output.jpeg_quality".to_string(),
                message: format!("1 ~ 100 범위여야 합니다: {}", self.output.jpeg_quality),
            });
        }
        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_debounce_ms() -> u64 {
    2_000
}
fn default_feedback_display_ms() -> u64 {
    3_000
}
fn default_jpeg_quality() -> u8 {
    90
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.capture.debounce_ms, 2_000);
        assert_eq!(config.output.jpeg_quality, 90);
        assert!(config.scoring.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"capture": {"default_mode": "combined", "default_subject": "animal"}}"#)
                .unwrap();
        assert_eq!(config.capture.default_mode, CaptureMode::Combined);
        assert_eq!(config.capture.default_subject, SubjectCategory::Animal);
        assert_eq!(config.capture.feedback_display_ms, 3_000);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let mut config = AppConfig::default_config();
        config.scoring.jitter = 1.5;
        assert!(matches!(
            config.validate(),
            Err(CoreError::Validation { ref field, .. }) if field == "scoring.jitter"
        ));

        let mut config = AppConfig::default_config();
        config.capture.debounce_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default_config();
        config.output.jpeg_quality = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn duration_helpers() {
        let config = AppConfig::default_config();
        assert_eq!(config.debounce(), Duration::from_secs(2));
        assert_eq!(config.feedback_display(), Duration::from_secs(3));
    }
}
