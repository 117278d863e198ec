//! 출력 포트: 캡처 싱크, 힌트 싱크.
//!
//! 구현: `goldshot-vision` crate (JPEG 파일 저장), `goldshot-app` (콘솔 힌트)

use crate::models::capture::CaptureEvent;

/// 캡처 요청 수신자
pub trait CaptureSink: Send + Sync {
    /// 자동/수동 캡처 모두 호출된다.
    ///
    /// fire-and-forget: 인코딩과 저장은 구현체가 별도로 수행하며
    /// 스케줄러는 완료를 기다리지 않는다.
    fn on_capture_requested(&self, event: CaptureEvent);
}

/// 힌트 표시 수신자
pub trait HintSink: Send + Sync {
    /// 표시 문구가 바뀔 때마다 호출 (힌트 순환, 촬영 피드백, 모드 안내)
    fn on_hint_changed(&self, text: &str);
}
