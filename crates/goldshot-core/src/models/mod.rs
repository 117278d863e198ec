//! GOLDSHOT 도메인 모델.
//!
//! 스케줄러와 어댑터가 공유하는 데이터 구조체를 정의한다.

pub mod capture;
pub mod frame;
pub mod mode;
pub mod score;
pub mod subject;
