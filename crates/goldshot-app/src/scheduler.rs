//! 캡처 결정 스케줄러.
//!
//! Idle / Sampling / Debouncing 3상태 머신과 힌트 순환기를 소유한다.
//! 모든 연산은 명시적 `now`를 받아 동기적으로 끝나며, 타이머는
//! 마감 시각 슬롯으로만 존재한다. 캡처 타이머는 샘플링과 쿨다운을
//! 한 슬롯(`CaptureTimer`)에 담으므로 둘이 동시에 걸릴 수 없다.
//! 비동기 구동은 [`crate::runner`]가 담당한다.

use goldshot_core::config::AppConfig;
use goldshot_core::models::capture::{CaptureEvent, CaptureOrigin};
use goldshot_core::models::frame::Frame;
use goldshot_core::models::mode::CaptureMode;
use goldshot_core::models::subject::SubjectCategory;
use goldshot_core::ports::frame_source::FrameSource;
use goldshot_core::ports::scorer::CompositionScorer;
use goldshot_core::ports::sink::{CaptureSink, HintSink};
use goldshot_core::profile::{profile_for, SubjectProfile};
use goldshot_suggestion::hints::COMBINED_MODE_MESSAGE;
use goldshot_suggestion::rotator::HintRotator;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, trace};

/// 캡처 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerPhase {
    /// 캡처 타이머 없음
    Idle,
    /// 프로필 주기마다 프레임 평가
    Sampling,
    /// 자동 캡처 직후 쿨다운
    Debouncing,
}

/// 캡처 타이머 슬롯
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureTimer {
    Off,
    Sampling { next_tick: Instant, interval: Duration },
    Debounce { until: Instant },
}

impl CaptureTimer {
    fn phase(&self) -> SchedulerPhase {
        match self {
            CaptureTimer::Off => SchedulerPhase::Idle,
            CaptureTimer::Sampling { .. } => SchedulerPhase::Sampling,
            CaptureTimer::Debounce { .. } => SchedulerPhase::Debouncing,
        }
    }

    fn deadline(&self) -> Option<Instant> {
        match *self {
            CaptureTimer::Off => None,
            CaptureTimer::Sampling { next_tick, .. } => Some(next_tick),
            CaptureTimer::Debounce { until } => Some(until),
        }
    }
}

/// 스케줄러 설정
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// 자동 캡처 후 쿨다운
    pub debounce: Duration,
    /// 수동 촬영 피드백 표시 시간
    pub feedback_display: Duration,
    /// 힌트 선택 RNG 시드
    pub hint_seed: Option<u64>,
}

impl SchedulerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            debounce: config.debounce(),
            feedback_display: config.feedback_display(),
            hint_seed: config.scoring.seed,
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default_config())
    }
}

/// 외부 협력자 묶음
#[derive(Clone)]
pub struct SchedulerPorts {
    pub frame_source: Arc<dyn FrameSource>,
    pub scorer: Arc<dyn CompositionScorer>,
    pub capture_sink: Arc<dyn CaptureSink>,
    pub hint_sink: Arc<dyn HintSink>,
}

/// 누적 통계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    /// 평가 틱 수 (프레임 없음 포함)
    pub ticks: u64,
    /// 프레임이 없어 건너뛴 틱 수
    pub skipped_ticks: u64,
    pub auto_captures: u64,
    pub manual_captures: u64,
}

/// 상태 스냅샷 (상태 출력/테스트용)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerSnapshot {
    pub session_active: bool,
    pub mode: CaptureMode,
    pub subject: SubjectCategory,
    pub phase: SchedulerPhase,
    pub hint: Option<String>,
    pub stats: SchedulerStats,
}

/// 캡처 결정 스케줄러
pub struct CaptureScheduler {
    settings: SchedulerSettings,
    ports: SchedulerPorts,
    mode: CaptureMode,
    subject: SubjectCategory,
    session_active: bool,
    timer: CaptureTimer,
    hints: HintRotator,
    stats: SchedulerStats,
}

impl CaptureScheduler {
    /// 새 스케줄러 (세션 비활성, Idle)
    pub fn new(settings: SchedulerSettings, ports: SchedulerPorts) -> Self {
        let hints = HintRotator::new(settings.feedback_display, settings.hint_seed);
        Self {
            settings,
            ports,
            mode: CaptureMode::default(),
            subject: SubjectCategory::default(),
            session_active: false,
            timer: CaptureTimer::Off,
            hints,
            stats: SchedulerStats::default(),
        }
    }

    // ============================================================
    // 조회
    // ============================================================

    pub fn phase(&self) -> SchedulerPhase {
        self.timer.phase()
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn subject(&self) -> SubjectCategory {
        self.subject
    }

    pub fn is_session_active(&self) -> bool {
        self.session_active
    }

    pub fn is_sampling(&self) -> bool {
        self.phase() == SchedulerPhase::Sampling
    }

    pub fn is_debouncing(&self) -> bool {
        self.phase() == SchedulerPhase::Debouncing
    }

    /// 현재 걸린 샘플링 타이머 주기
    pub fn sampling_interval(&self) -> Option<Duration> {
        match self.timer {
            CaptureTimer::Sampling { interval, .. } => Some(interval),
            _ => None,
        }
    }

    /// 다음 샘플링 틱 시각
    pub fn next_sampling_tick(&self) -> Option<Instant> {
        match self.timer {
            CaptureTimer::Sampling { next_tick, .. } => Some(next_tick),
            _ => None,
        }
    }

    /// 쿨다운 종료 시각
    pub fn debounce_until(&self) -> Option<Instant> {
        match self.timer {
            CaptureTimer::Debounce { until } => Some(until),
            _ => None,
        }
    }

    /// 현재 표시 중인 힌트/안내 문구
    pub fn current_hint(&self) -> Option<&str> {
        self.hints.current()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            session_active: self.session_active,
            mode: self.mode,
            subject: self.subject,
            phase: self.phase(),
            hint: self.current_hint().map(str::to_string),
            stats: self.stats,
        }
    }

    /// 가장 이른 타이머 마감 시각 (캡처/힌트/피드백)
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.timer.deadline(), self.hints.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ============================================================
    // 운영자 연산
    // ============================================================

    /// 세션 시작. 남아 있는 타이머는 모두 버리고 새로 시작한다.
    pub fn start_session(&mut self, mode: CaptureMode, subject: SubjectCategory, now: Instant) {
        if self.session_active {
            debug!("진행 중인 세션 정리 후 재시작");
        }
        self.timer = CaptureTimer::Off;
        self.hints.stop();

        self.mode = mode;
        self.subject = subject;
        self.session_active = true;
        info!(
            "세션 시작: 모드={}, 피사체={} ({})",
            mode,
            subject.label(),
            self.profile().camera_preset
        );

        if mode.samples_frames() {
            self.enter_sampling(now);
        }
        self.refresh_hint_for_mode(now);
    }

    /// 세션 종료. 모든 타이머 취소. 여러 번 호출해도 안전.
    pub fn stop_session(&mut self) {
        if !self.session_active && self.timer == CaptureTimer::Off {
            return;
        }
        self.timer = CaptureTimer::Off;
        self.hints.stop();
        self.session_active = false;
        info!("세션 종료");
    }

    /// 피사체 변경. 샘플링 중이면 새 주기로 타이머를 즉시 다시 건다.
    pub fn set_subject(&mut self, subject: SubjectCategory, now: Instant) {
        if subject == self.subject {
            return;
        }
        self.subject = subject;
        let profile = self.profile();
        info!(
            "피사체 변경: {}, 카메라 프리셋: {} (주기 {}ms, 임계값 {:.2})",
            subject.label(),
            profile.camera_preset,
            profile.sampling_interval_ms,
            profile.score_threshold
        );

        if !self.session_active {
            return;
        }
        if self.is_sampling() {
            self.enter_sampling(now);
        }
        let change = self.hints.change_subject(subject, now);
        self.publish_hint(change);
    }

    /// 모드 변경. Manual은 캡처 타이머를 모두 취소하고,
    /// Auto/Combined는 Idle이면 샘플링을 시작한다 (쿨다운 중이면 유지).
    pub fn set_mode(&mut self, mode: CaptureMode, now: Instant) {
        if mode == self.mode {
            return;
        }
        let previous = self.mode;
        self.mode = mode;
        info!("모드 변경: {} → {}", previous, mode);

        if !self.session_active {
            return;
        }
        match mode {
            CaptureMode::Manual => {
                if self.timer != CaptureTimer::Off {
                    debug!("{:?} 타이머 취소", self.phase());
                }
                self.timer = CaptureTimer::Off;
            }
            CaptureMode::Auto | CaptureMode::Combined => {
                if self.timer == CaptureTimer::Off {
                    self.enter_sampling(now);
                }
            }
        }
        self.refresh_hint_for_mode(now);
    }

    /// 수동 촬영. 캡처 상태 머신에는 영향이 없다.
    ///
    /// 세션이 없거나 프레임이 없으면 `false`.
    pub fn manual_capture_requested(&mut self, now: Instant) -> bool {
        if !self.session_active {
            debug!("세션 없음, 수동 촬영 무시");
            return false;
        }
        let Some(frame) = self.ports.frame_source.current_frame() else {
            debug!("프레임 없음, 수동 촬영 무시");
            return false;
        };

        info!("수동 촬영");
        self.emit_capture(frame, CaptureOrigin::Manual);
        self.stats.manual_captures += 1;

        if self.mode == CaptureMode::Manual {
            let feedback = self.hints.show_feedback(now);
            self.publish_hint(Some(feedback));
        }
        true
    }

    /// `now`까지 만기된 타이머를 마감 시각 순서로 처리
    pub fn advance(&mut self, now: Instant) {
        if !self.session_active {
            return;
        }
        loop {
            let capture_due = self.timer.deadline().filter(|d| *d <= now);
            let hint_due = self.hints.next_deadline().filter(|d| *d <= now);
            match (capture_due, hint_due) {
                (None, None) => break,
                (Some(capture), Some(hint)) if hint < capture => self.fire_hints(now),
                (Some(_), _) => self.fire_capture_timer(now),
                (None, Some(_)) => self.fire_hints(now),
            }
        }
    }

    // ============================================================
    // 내부
    // ============================================================

    fn profile(&self) -> &'static SubjectProfile {
        profile_for(self.subject)
    }

    fn enter_sampling(&mut self, now: Instant) {
        let interval = self.profile().sampling_interval();
        self.timer = CaptureTimer::Sampling {
            next_tick: now + interval,
            interval,
        };
        debug!("샘플링 시작: {}ms 주기", interval.as_millis());
    }

    fn refresh_hint_for_mode(&mut self, now: Instant) {
        let change = match self.mode {
            CaptureMode::Combined => self.hints.show_fixed(COMBINED_MODE_MESSAGE),
            CaptureMode::Manual | CaptureMode::Auto => self.hints.ensure_rotating(self.subject, now),
        };
        self.publish_hint(change);
    }

    fn fire_hints(&mut self, now: Instant) {
        let change = self.hints.fire_due(self.subject, now);
        self.publish_hint(change);
    }

    fn fire_capture_timer(&mut self, now: Instant) {
        match self.timer {
            CaptureTimer::Off => {}
            CaptureTimer::Sampling {
                next_tick,
                interval,
            } => {
                self.timer = CaptureTimer::Sampling {
                    next_tick: skip_missed(next_tick + interval, interval, now),
                    interval,
                };
                self.evaluate(now);
            }
            CaptureTimer::Debounce { until } => {
                if self.mode.samples_frames() {
                    let interval = self.profile().sampling_interval();
                    debug!("쿨다운 종료, 샘플링 재개");
                    self.timer = CaptureTimer::Sampling {
                        next_tick: skip_missed(until + interval, interval, now),
                        interval,
                    };
                } else {
                    debug!("쿨다운 종료, Idle");
                    self.timer = CaptureTimer::Off;
                }
            }
        }
    }

    /// 평가-결정 한 단계 (샘플링 틱).
    /// 쿨다운은 틱 예정 시각이 아니라 실제 캡처 시각 `now`부터 잰다.
    fn evaluate(&mut self, now: Instant) {
        self.stats.ticks += 1;
        let Some(frame) = self.ports.frame_source.current_frame() else {
            self.stats.skipped_ticks += 1;
            trace!("프레임 없음, 틱 건너뜀");
            return;
        };

        let threshold = self.profile().score_threshold;
        let score = self.ports.scorer.score(&frame, self.subject);
        if !score.clears(threshold) {
            debug!("구도 점수 {} < 임계값 {:.2}", score, threshold);
            return;
        }

        info!("자동 캡처: 구도 점수 {} >= 임계값 {:.2}", score, threshold);
        self.emit_capture(
            frame,
            CaptureOrigin::Auto {
                score: score.value(),
                threshold,
            },
        );
        self.stats.auto_captures += 1;
        self.timer = CaptureTimer::Debounce {
            until: now + self.settings.debounce,
        };
    }

    fn emit_capture(&self, frame: Frame, origin: CaptureOrigin) {
        let event = CaptureEvent::new(frame, origin, self.subject, self.mode);
        self.ports.capture_sink.on_capture_requested(event);
    }

    fn publish_hint(&self, change: Option<String>) {
        if let Some(text) = change {
            self.ports.hint_sink.on_hint_changed(&text);
        }
    }
}

/// 늦게 처리된 경우 이미 지난 틱을 건너뛴다 (밀린 틱 몰아서 실행 방지)
fn skip_missed(mut deadline: Instant, interval: Duration, now: Instant) -> Instant {
    while deadline <= now {
        deadline += interval;
    }
    deadline
}
