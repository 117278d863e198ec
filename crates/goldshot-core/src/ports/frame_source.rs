//! 프레임 소스 포트.
//!
//! 구현: `goldshot-vision` crate (정지 이미지, 합성 프레임)

use crate::models::frame::Frame;

/// 현재 비디오 프레임 공급자
pub trait FrameSource: Send + Sync {
    /// 현재 프레임 반환.
    ///
    /// 영상이 아직 없거나 일시적으로 끊긴 경우 `None`. 이는 에러가 아니며
    /// 스케줄러는 해당 틱을 조용히 건너뛴다. 500ms 주기로 호출될 수 있으므로
    /// 가벼워야 한다.
    fn current_frame(&self) -> Option<Frame>;
}
