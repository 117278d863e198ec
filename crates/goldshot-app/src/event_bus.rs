//! 스케줄러 상태 변화 알림.
//!
//! 구동기는 명령이나 타이머를 처리할 때마다 전후 [`SchedulerSnapshot`]을 비교해
//! [`AppEvent`]로 바꾸고 broadcast로 내보낸다. 바이너리는 이를 받아
//! 촬영 알림을 출력하고 상태 전이를 로그로 남긴다.
//! 구독자가 느려 용량을 넘기면 오래된 이벤트부터 버려진다 (`RecvError::Lagged`).

use goldshot_core::models::mode::CaptureMode;
use goldshot_core::models::subject::SubjectCategory;
use tokio::sync::broadcast;
use tracing::debug;

use crate::scheduler::{SchedulerPhase, SchedulerSnapshot};

/// 스냅샷 차이에서 나온 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// 세션 시작
    SessionStarted {
        mode: CaptureMode,
        subject: SubjectCategory,
    },
    /// 세션 종료
    SessionStopped,
    /// 캡처 상태 전이
    PhaseChanged {
        from: SchedulerPhase,
        to: SchedulerPhase,
    },
    ModeChanged(CaptureMode),
    SubjectChanged(SubjectCategory),
    /// 캡처 발생 (자동/수동 누적 수)
    CapturesUpdated { auto: u64, manual: u64 },
}

impl AppEvent {
    /// 두 스냅샷 사이의 변화를 이벤트로 변환.
    ///
    /// 세션이 새로 시작되면 모드/피사체 변경 대신 `SessionStarted` 하나로 묶는다.
    pub fn diff(before: &SchedulerSnapshot, after: &SchedulerSnapshot) -> Vec<AppEvent> {
        let mut events = Vec::new();

        if before.session_active && !after.session_active {
            events.push(AppEvent::SessionStopped);
        }
        if after.session_active && !before.session_active {
            events.push(AppEvent::SessionStarted {
                mode: after.mode,
                subject: after.subject,
            });
        } else {
            if before.mode != after.mode {
                events.push(AppEvent::ModeChanged(after.mode));
            }
            if before.subject != after.subject {
                events.push(AppEvent::SubjectChanged(after.subject));
            }
        }
        if before.phase != after.phase {
            events.push(AppEvent::PhaseChanged {
                from: before.phase,
                to: after.phase,
            });
        }
        if before.stats.auto_captures != after.stats.auto_captures
            || before.stats.manual_captures != after.stats.manual_captures
        {
            events.push(AppEvent::CapturesUpdated {
                auto: after.stats.auto_captures,
                manual: after.stats.manual_captures,
            });
        }

        events
    }
}

/// 기본 이벤트 버퍼 (느린 구독자가 놓치기 전까지 쌓을 수)
pub const DEFAULT_EVENT_CAPACITY: usize = 128;

/// 스케줄러 이벤트 broadcast 채널. 구독자가 없으면 발행은 버려진다.
pub struct EventBus {
    tx: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: AppEvent) {
        debug!("스케줄러 이벤트: {:?}", event);
        let _ = self.tx.send(event);
    }

    /// 구독 이후 발행된 이벤트만 받는다
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
