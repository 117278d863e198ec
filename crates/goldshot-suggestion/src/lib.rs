//! # goldshot-suggestion
//!
//! 촬영 힌트 파이프라인.
//! 피사체별 힌트 풀, 수동 촬영 후 피드백 문구, 결합 모드 안내 문구를 정의하고
//! 힌트 순환/피드백 표시 타이머를 관리한다.

pub mod hints;
pub mod rotator;
