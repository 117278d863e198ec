//! GOLDSHOT 핵심 에러 타입.
//!
//! 어댑터 crate는 자체 에러 타입에서 `#[from] CoreError`로 래핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
///
/// 프레임 미수신은 에러가 아니다 (`FrameSource`가 `None` 반환).
/// 여기에는 설정/입력 파싱/I/O 등 실제 실패만 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패 — {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 잘못된 인자 (운영자 입력 파싱 실패)
    #[error("잘못된 인자: {0}")]
    InvalidArguments(String),

    /// 프레임 버퍼 크기 불일치
    #[error("프레임 버퍼 크기 불일치: expected={expected}, actual={actual}")]
    FrameSize {
        /// width * height * 4
        expected: usize,
        /// 실제 버퍼 길이
        actual: usize,
    },

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
