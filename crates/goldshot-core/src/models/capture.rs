//! 캡처 이벤트 모델.
//!
//! 스케줄러가 `CaptureSink`로 보내는 "지금 촬영" 이벤트.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::frame::Frame;
use super::mode::CaptureMode;
use super::subject::SubjectCategory;

/// 캡처 발생 원인
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CaptureOrigin {
    /// 자동: 구도 점수가 임계값을 넘음
    Auto {
        /// 평가된 점수
        score: f32,
        /// 당시 프로필 임계값
        threshold: f32,
    },
    /// 운영자 수동 요청
    Manual,
}

impl CaptureOrigin {
    pub fn is_auto(&self) -> bool {
        matches!(self, CaptureOrigin::Auto { .. })
    }
}

/// 캡처 이벤트 (프레임 포함)
#[derive(Debug, Clone)]
pub struct CaptureEvent {
    /// 이벤트 ID
    pub id: Uuid,
    /// 캡처 대상 프레임
    pub frame: Frame,
    /// 발생 원인
    pub origin: CaptureOrigin,
    /// 당시 피사체
    pub subject: SubjectCategory,
    /// 당시 모드
    pub mode: CaptureMode,
    /// 캡처 시각
    pub captured_at: DateTime<Utc>,
}

impl CaptureEvent {
    /// 현재 시각으로 새 이벤트 생성
    pub fn new(
        frame: Frame,
        origin: CaptureOrigin,
        subject: SubjectCategory,
        mode: CaptureMode,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame,
            origin,
            subject,
            mode,
            captured_at: Utc::now(),
        }
    }

    /// 저장 파일 이름 (`goldshot_<unix_millis>.jpg`)
    pub fn file_name(&self) -> String {
        format!("goldshot_{}.jpg", self.captured_at.timestamp_millis())
    }

    /// 픽셀을 제외한 메타데이터
    pub fn metadata(&self) -> CaptureMetadata {
        CaptureMetadata {
            id: self.id,
            origin: self.origin,
            subject: self.subject,
            mode: self.mode,
            captured_at: self.captured_at,
            resolution: self.frame.resolution(),
        }
    }
}

/// 캡처 메타데이터 (로그/사이드카 파일용)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureMetadata {
    pub id: Uuid,
    pub origin: CaptureOrigin,
    pub subject: SubjectCategory,
    pub mode: CaptureMode,
    pub captured_at: DateTime<Utc>,
    /// 원본 해상도 (width, height)
    pub resolution: (u32, u32),
}
