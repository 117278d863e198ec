//! 스케줄러 비동기 구동기.
//!
//! 하나의 tokio 태스크가 [`CaptureScheduler`]를 단독 소유한다.
//! 명령 채널, 다음 마감 시각까지의 `sleep_until`, 종료 watch 채널을
//! `select!`로 기다리며 깨어날 때마다 `advance(now)`를 호출한다.

use goldshot_core::models::mode::CaptureMode;
use goldshot_core::models::subject::SubjectCategory;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::event_bus::{AppEvent, EventBus};
use crate::scheduler::{CaptureScheduler, SchedulerSnapshot};

/// 구동기 에러
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("스케줄러 태스크가 종료됨")]
    Closed,
}

/// 운영자 명령
#[derive(Debug)]
pub enum SchedulerCommand {
    StartSession {
        mode: CaptureMode,
        subject: SubjectCategory,
    },
    StopSession,
    SetSubject(SubjectCategory),
    SetMode(CaptureMode),
    /// 수동 촬영: 실제 캡처 여부를 응답
    ManualCapture(oneshot::Sender<bool>),
    Snapshot(oneshot::Sender<SchedulerSnapshot>),
}

/// 구동 중인 스케줄러에 명령을 보내는 핸들
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<SchedulerCommand>,
}

impl SchedulerHandle {
    async fn send(&self, command: SchedulerCommand) -> Result<(), RunnerError> {
        self.tx.send(command).await.map_err(|_| RunnerError::Closed)
    }

    pub async fn start_session(
        &self,
        mode: CaptureMode,
        subject: SubjectCategory,
    ) -> Result<(), RunnerError> {
        self.send(SchedulerCommand::StartSession { mode, subject })
            .await
    }

    pub async fn stop_session(&self) -> Result<(), RunnerError> {
        self.send(SchedulerCommand::StopSession).await
    }

    pub async fn set_subject(&self, subject: SubjectCategory) -> Result<(), RunnerError> {
        self.send(SchedulerCommand::SetSubject(subject)).await
    }

    pub async fn set_mode(&self, mode: CaptureMode) -> Result<(), RunnerError> {
        self.send(SchedulerCommand::SetMode(mode)).await
    }

    /// 수동 촬영 요청. 세션/프레임이 없으면 `Ok(false)`.
    pub async fn manual_capture(&self) -> Result<bool, RunnerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SchedulerCommand::ManualCapture(reply_tx)).await?;
        reply_rx.await.map_err(|_| RunnerError::Closed)
    }

    pub async fn snapshot(&self) -> Result<SchedulerSnapshot, RunnerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(SchedulerCommand::Snapshot(reply_tx)).await?;
        reply_rx.await.map_err(|_| RunnerError::Closed)
    }
}

/// 스케줄러 구동기
pub struct SchedulerRunner {
    scheduler: CaptureScheduler,
    rx: mpsc::Receiver<SchedulerCommand>,
    events: Option<Arc<EventBus>>,
}

/// 구동기와 핸들 쌍 생성
pub fn channel(scheduler: CaptureScheduler, capacity: usize) -> (SchedulerRunner, SchedulerHandle) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        SchedulerRunner {
            scheduler,
            rx,
            events: None,
        },
        SchedulerHandle { tx },
    )
}

impl SchedulerRunner {
    /// 상태 변화 이벤트 발행 대상 설정
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// 종료 신호 또는 모든 핸들이 닫힐 때까지 구동.
    /// 종료 시 세션을 정리하고 최종 스냅샷을 반환한다.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> SchedulerSnapshot {
        info!("캡처 스케줄러 구동 시작");

        loop {
            if *shutdown_rx.borrow() {
                info!("캡처 스케줄러 종료 신호 수신");
                break;
            }
            let deadline = self.scheduler.next_deadline();
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        debug!("종료 채널 닫힘");
                        break;
                    }
                }
                command = self.rx.recv() => match command {
                    Some(command) => self.apply(command),
                    None => {
                        debug!("명령 채널 닫힘");
                        break;
                    }
                },
                _ = sleep_until_deadline(deadline) => {
                    self.tracked(|scheduler| scheduler.advance(Instant::now()));
                }
            }
        }

        self.tracked(|scheduler| scheduler.stop_session());
        info!("캡처 스케줄러 구동 종료");
        self.scheduler.snapshot()
    }

    fn apply(&mut self, command: SchedulerCommand) {
        let now = Instant::now();
        match command {
            SchedulerCommand::StartSession { mode, subject } => {
                self.tracked(|s| s.start_session(mode, subject, now));
            }
            SchedulerCommand::StopSession => self.tracked(|s| s.stop_session()),
            SchedulerCommand::SetSubject(subject) => self.tracked(|s| s.set_subject(subject, now)),
            SchedulerCommand::SetMode(mode) => self.tracked(|s| s.set_mode(mode, now)),
            SchedulerCommand::ManualCapture(reply) => {
                let mut captured = false;
                self.tracked(|s| captured = s.manual_capture_requested(now));
                let _ = reply.send(captured);
            }
            SchedulerCommand::Snapshot(reply) => {
                let _ = reply.send(self.scheduler.snapshot());
            }
        }
    }

    /// 연산 전후 스냅샷을 비교해 변화 이벤트 발행
    fn tracked(&mut self, op: impl FnOnce(&mut CaptureScheduler)) {
        let Some(events) = self.events.clone() else {
            op(&mut self.scheduler);
            return;
        };
        let before = self.scheduler.snapshot();
        op(&mut self.scheduler);
        let after = self.scheduler.snapshot();
        for event in AppEvent::diff(&before, &after) {
            events.publish(event);
        }
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
