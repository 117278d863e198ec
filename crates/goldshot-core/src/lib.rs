//! # goldshot-core
//!
//! GOLDSHOT 도메인 모델, 포트(trait) 정의, 피사체 프로필, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (피사체, 모드, 프레임, 캡처 이벤트)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스
//! - [`profile`]: 피사체별 샘플링/임계값/힌트 정책 테이블
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
pub mod profile;
