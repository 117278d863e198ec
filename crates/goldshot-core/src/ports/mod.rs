//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 어댑터 crate가 이 trait들을 구현하며,
//! `goldshot-app`에서 `Arc<dyn T>`로 와이어링한다.
//!
//! 스케줄러는 단일 제어 루프에서 동기적으로 호출하므로
//! 모든 포트는 동기 메서드만 갖는다. 느린 작업(인코딩/저장)은
//! 어댑터 내부에서 별도 태스크로 넘긴다.

pub mod frame_source;
pub mod scorer;
pub mod sink;
