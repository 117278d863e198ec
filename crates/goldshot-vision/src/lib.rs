//! # goldshot-vision
//!
//! 프레임 분석 및 캡처 어댑터 크레이트.
//! 황금 분할 구도 휴리스틱 점수, 정지 이미지/합성 프레임 소스,
//! JPEG 파일 저장 싱크를 제공한다.

pub mod error;
pub mod geometry;
pub mod scorer;
pub mod sink;
pub mod source;

pub use error::VisionError;
