//! 비전 어댑터 에러.

use goldshot_core::error::CoreError;
use thiserror::Error;

/// 비전 레이어 에러
#[derive(Debug, Error)]
pub enum VisionError {
    /// 코어 에러 래핑
    #[error(transparent)]
    Core(#[from] CoreError),

    /// 이미지 디코딩/인코딩 실패
    #[error("이미지 처리 실패: {0}")]
    Image(#[from] image::ImageError),

    /// 파일 I/O 실패
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 저장 대기열이 가득 참 (캡처는 버려진다)
    #[error("캡처 저장 대기열 가득 참: {0}건")]
    QueueFull(usize),

    /// 저장 작업자가 종료됨
    #[error("캡처 저장 작업자 종료됨")]
    WriterClosed,
}
