//! 통합 테스트 공용 도우미.
//!
//! 기록용 싱크와 구동기 하네스.

#![allow(dead_code)]

use goldshot_app::lifecycle::{LifecycleManager, ShutdownReason};
use goldshot_app::runner::{self, SchedulerHandle};
use goldshot_app::scheduler::{
    CaptureScheduler, SchedulerPorts, SchedulerSettings, SchedulerSnapshot,
};
use goldshot_core::models::capture::CaptureEvent;
use goldshot_core::models::frame::Frame;
use goldshot_core::ports::sink::{CaptureSink, HintSink};
use goldshot_vision::scorer::FixedScorer;
use goldshot_vision::source::StillImageSource;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// 캡처 이벤트를 (발생 시각, 이벤트)로 기록
#[derive(Default)]
pub struct RecordingCaptureSink {
    events: Mutex<Vec<(Instant, CaptureEvent)>>,
}

impl RecordingCaptureSink {
    pub fn count(&self) -> usize {
        self.events.lock().len()
    }

    pub fn times(&self) -> Vec<Instant> {
        self.events.lock().iter().map(|(t, _)| *t).collect()
    }

    pub fn last(&self) -> Option<CaptureEvent> {
        self.events.lock().last().map(|(_, e)| e.clone())
    }
}

impl CaptureSink for RecordingCaptureSink {
    fn on_capture_requested(&self, event: CaptureEvent) {
        self.events.lock().push((Instant::now(), event));
    }
}

/// 힌트 변경을 (발생 시각, 문구)로 기록
#[derive(Default)]
pub struct RecordingHintSink {
    hints: Mutex<Vec<(Instant, String)>>,
}

impl RecordingHintSink {
    pub fn count(&self) -> usize {
        self.hints.lock().len()
    }

    pub fn texts(&self) -> Vec<String> {
        self.hints.lock().iter().map(|(_, h)| h.clone()).collect()
    }

    pub fn last(&self) -> Option<String> {
        self.hints.lock().last().map(|(_, h)| h.clone())
    }
}

impl HintSink for RecordingHintSink {
    fn on_hint_changed(&self, text: &str) {
        self.hints.lock().push((Instant::now(), text.to_string()));
    }
}

pub fn gray_frame() -> Frame {
    Frame::filled(16, 9, [128, 128, 128, 255])
}

/// 구동 중인 스케줄러 하네스
pub struct Harness {
    pub handle: SchedulerHandle,
    pub lifecycle: LifecycleManager,
    pub source: Arc<StillImageSource>,
    pub scorer: Arc<FixedScorer>,
    pub captures: Arc<RecordingCaptureSink>,
    pub hints: Arc<RecordingHintSink>,
    pub task: JoinHandle<SchedulerSnapshot>,
}

impl Harness {
    /// 고정 점수 스케줄러를 구동한다
    pub fn spawn(score: f32) -> Self {
        let source = Arc::new(StillImageSource::from_frame(gray_frame()));
        let scorer = Arc::new(FixedScorer::new(score));
        let captures = Arc::new(RecordingCaptureSink::default());
        let hints = Arc::new(RecordingHintSink::default());

        let settings = SchedulerSettings {
            hint_seed: Some(42),
            ..SchedulerSettings::default()
        };
        let scheduler = CaptureScheduler::new(
            settings,
            SchedulerPorts {
                frame_source: source.clone(),
                scorer: scorer.clone(),
                capture_sink: captures.clone(),
                hint_sink: hints.clone(),
            },
        );

        let lifecycle = LifecycleManager::new();
        let (runner, handle) = runner::channel(scheduler, 16);
        let task = tokio::spawn(runner.run(lifecycle.subscribe()));

        Self {
            handle,
            lifecycle,
            source,
            scorer,
            captures,
            hints,
            task,
        }
    }

    /// 종료 신호 후 최종 스냅샷
    pub async fn shutdown(self) -> SchedulerSnapshot {
        self.lifecycle.shutdown(ShutdownReason::Quit);
        self.task.await.unwrap()
    }
}
