//! 구도 점수 포트.
//!
//! 구현: `goldshot-vision` crate (휴리스틱 점수기). 실제 비전 모델로 교체 가능.

use crate::models::frame::Frame;
use crate::models::score::CompositionScore;
use crate::models::subject::SubjectCategory;

/// 구도 평가기
///
/// 스케줄러는 반환값이 [0, 1] 범위이고 "높을수록 좋다"는 것만 가정한다.
pub trait CompositionScorer: Send + Sync {
    /// 프레임의 구도 점수 계산. 프레임이나 공유 상태를 변경하지 않는다.
    fn score(&self, frame: &Frame, subject: SubjectCategory) -> CompositionScore;
}
