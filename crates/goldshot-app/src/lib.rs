//! # goldshot-app
//!
//! 캡처 결정 스케줄러와 그 구동 계층.
//! 상태 머신, 비동기 구동기, 내부 이벤트 버스, 라이프사이클, 콘솔 표면.

pub mod console;
pub mod event_bus;
pub mod lifecycle;
pub mod runner;
pub mod scheduler;
