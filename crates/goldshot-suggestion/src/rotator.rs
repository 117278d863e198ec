//! 힌트 순환기.
//!
//! 캡처 상태 머신과 독립적인 표시 상태 머신.
//! 순환 타이머와 피드백 타이머는 각각 하나의 마감 시각 슬롯이며,
//! 재시작은 슬롯 덮어쓰기, 취소는 슬롯 비우기다.
//! 피드백이 표시되는 동안 순환은 멈춘다.

use goldshot_core::models::subject::SubjectCategory;
use goldshot_core::profile::profile_for;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::hints::{hint_pool, FEEDBACK_MESSAGES};

/// 현재 표시 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintDisplay {
    /// 표시 없음 (세션 종료)
    Off,
    /// 피사체 힌트 순환 중
    Rotating,
    /// 고정 문구 (결합 모드)
    Fixed,
    /// 촬영 피드백 표시 중 (순환 일시정지)
    Feedback,
}

/// 힌트 순환기
pub struct HintRotator {
    rng: StdRng,
    feedback_window: Duration,
    display: HintDisplay,
    current: Option<String>,
    rotation_deadline: Option<Instant>,
    feedback_deadline: Option<Instant>,
}

impl HintRotator {
    /// 새 순환기. `seed`가 있으면 힌트 선택이 재현 가능.
    pub fn new(feedback_window: Duration, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng,
            feedback_window,
            display: HintDisplay::Off,
            current: None,
            rotation_deadline: None,
            feedback_deadline: None,
        }
    }

    pub fn display(&self) -> HintDisplay {
        self.display
    }

    /// 현재 표시 문구
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn rotation_deadline(&self) -> Option<Instant> {
        self.rotation_deadline
    }

    pub fn feedback_deadline(&self) -> Option<Instant> {
        self.feedback_deadline
    }

    /// 가장 이른 마감 시각
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.rotation_deadline, self.feedback_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// 순환 시작: 즉시 힌트 하나를 표시하고 다음 순환을 예약
    pub fn start_rotation(&mut self, subject: SubjectCategory, now: Instant) -> String {
        self.display = HintDisplay::Rotating;
        self.feedback_deadline = None;
        self.rotation_deadline = Some(now + profile_for(subject).hint_rotation());
        let hint = self.pick_hint(subject);
        self.show(hint)
    }

    /// 순환 중이 아니면(고정/꺼짐) 순환 시작. 피드백 중이면 피드백 종료 후 재개되므로 그대로 둔다.
    pub fn ensure_rotating(&mut self, subject: SubjectCategory, now: Instant) -> Option<String> {
        match self.display {
            HintDisplay::Off | HintDisplay::Fixed => Some(self.start_rotation(subject, now)),
            HintDisplay::Rotating | HintDisplay::Feedback => None,
        }
    }

    /// 고정 문구 표시, 순환/피드백 중단
    pub fn show_fixed(&mut self, text: &str) -> Option<String> {
        self.display = HintDisplay::Fixed;
        self.rotation_deadline = None;
        self.feedback_deadline = None;
        if self.current.as_deref() == Some(text) {
            return None;
        }
        Some(self.show(text.to_string()))
    }

    /// 촬영 피드백 표시: 순환을 멈추고 피드백 창이 끝나면 재개
    pub fn show_feedback(&mut self, now: Instant) -> String {
        let message = FEEDBACK_MESSAGES[self.rng.random_range(0..FEEDBACK_MESSAGES.len())];
        self.display = HintDisplay::Feedback;
        self.rotation_deadline = None;
        self.feedback_deadline = Some(now + self.feedback_window);
        self.show(message.to_string())
    }

    /// 피사체 변경: 순환 중이면 새 풀에서 즉시 다시 뽑는다
    pub fn change_subject(&mut self, subject: SubjectCategory, now: Instant) -> Option<String> {
        match self.display {
            HintDisplay::Rotating => Some(self.start_rotation(subject, now)),
            _ => None,
        }
    }

    /// 모든 타이머 취소, 표시 제거
    pub fn stop(&mut self) {
        self.display = HintDisplay::Off;
        self.current = None;
        self.rotation_deadline = None;
        self.feedback_deadline = None;
    }

    /// 만기된 타이머 처리. 표시 문구가 바뀌면 반환.
    pub fn fire_due(&mut self, subject: SubjectCategory, now: Instant) -> Option<String> {
        if let Some(deadline) = self.feedback_deadline {
            if deadline <= now {
                debug!("피드백 표시 종료, 힌트 순환 재개");
                self.display = HintDisplay::Rotating;
                self.feedback_deadline = None;
                let period = profile_for(subject).hint_rotation();
                self.rotation_deadline = Some(Self::advance_past(deadline + period, period, now));
                let hint = self.pick_hint(subject);
                return Some(self.show(hint));
            }
        }

        if let Some(deadline) = self.rotation_deadline {
            if deadline <= now {
                let period = profile_for(subject).hint_rotation();
                self.rotation_deadline = Some(Self::advance_past(deadline, period, now));
                let hint = self.pick_hint(subject);
                return Some(self.show(hint));
            }
        }

        None
    }

    /// 늦게 깨어난 경우 밀린 주기를 건너뛴다
    fn advance_past(mut deadline: Instant, period: Duration, now: Instant) -> Instant {
        while deadline <= now {
            deadline += period;
        }
        deadline
    }

    fn pick_hint(&mut self, subject: SubjectCategory) -> String {
        let pool = hint_pool(subject);
        pool[self.rng.random_range(0..pool.len())].to_string()
    }

    fn show(&mut self, text: String) -> String {
        self.current = Some(text.clone());
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::COMBINED_MODE_MESSAGE;

    const FEEDBACK: Duration = Duration::from_millis(3_000);
    const ROTATION: Duration = Duration::from_millis(8_000);

    fn rotator() -> HintRotator {
        HintRotator::new(FEEDBACK, Some(3))
    }

    #[test]
    fn rotation_shows_hint_immediately_and_schedules_next() {
        let mut r = rotator();
        let t0 = Instant::now();
        let hint = r.start_rotation(SubjectCategory::Landscape, t0);

        assert!(hint_pool(SubjectCategory::Landscape).contains(&hint.as_str()));
        assert_eq!(r.display(), HintDisplay::Rotating);
        assert_eq!(r.rotation_deadline(), Some(t0 + ROTATION));
        assert_eq!(r.next_deadline(), Some(t0 + ROTATION));
    }

    #[test]
    fn fires_only_when_due() {
        let mut r = rotator();
        let t0 = Instant::now();
        r.start_rotation(SubjectCategory::People, t0);

        assert!(r.fire_due(SubjectCategory::People, t0 + ROTATION - Duration::from_millis(1)).is_none());
        let next = r.fire_due(SubjectCategory::People, t0 + ROTATION).unwrap();
        assert!(hint_pool(SubjectCategory::People).contains(&next.as_str()));
        assert_eq!(r.rotation_deadline(), Some(t0 + ROTATION * 2));
    }

    #[test]
    fn feedback_pauses_rotation_then_resumes() {
        let mut r = rotator();
        let t0 = Instant::now();
        r.start_rotation(SubjectCategory::Landscape, t0);

        let t1 = t0 + Duration::from_millis(1_000);
        let feedback = r.show_feedback(t1);
        assert!(FEEDBACK_MESSAGES.contains(&feedback.as_str()));
        assert_eq!(r.display(), HintDisplay::Feedback);
        assert!(r.rotation_deadline().is_none());
        assert_eq!(r.next_deadline(), Some(t1 + FEEDBACK));

        // 피드백 창 내에서는 아무 변화 없음 (원래 순환 시각 포함)
        assert!(r.fire_due(SubjectCategory::Landscape, t1 + FEEDBACK - Duration::from_millis(1)).is_none());

        let resumed = r.fire_due(SubjectCategory::Landscape, t1 + FEEDBACK).unwrap();
        assert!(hint_pool(SubjectCategory::Landscape).contains(&resumed.as_str()));
        assert_eq!(r.display(), HintDisplay::Rotating);
        assert_eq!(r.rotation_deadline(), Some(t1 + FEEDBACK + ROTATION));
    }

    #[test]
    fn fixed_message_suspends_rotation() {
        let mut r = rotator();
        let t0 = Instant::now();
        r.start_rotation(SubjectCategory::Animal, t0);

        assert_eq!(r.show_fixed(COMBINED_MODE_MESSAGE).as_deref(), Some(COMBINED_MODE_MESSAGE));
        assert_eq!(r.next_deadline(), None);
        assert!(r.fire_due(SubjectCategory::Animal, t0 + ROTATION * 3).is_none());
        // 같은 문구 재표시는 변경 아님
        assert!(r.show_fixed(COMBINED_MODE_MESSAGE).is_none());
    }

    #[test]
    fn ensure_rotating_restarts_from_fixed_only() {
        let mut r = rotator();
        let t0 = Instant::now();
        r.show_fixed(COMBINED_MODE_MESSAGE);
        assert!(r.ensure_rotating(SubjectCategory::Object, t0).is_some());
        assert!(r.ensure_rotating(SubjectCategory::Object, t0).is_none());

        r.show_feedback(t0);
        assert!(r.ensure_rotating(SubjectCategory::Object, t0).is_none());
        assert_eq!(r.display(), HintDisplay::Feedback);
    }

    #[test]
    fn subject_change_redraws_from_new_pool() {
        let mut r = rotator();
        let t0 = Instant::now();
        r.start_rotation(SubjectCategory::Landscape, t0);

        let t1 = t0 + Duration::from_millis(2_000);
        let hint = r.change_subject(SubjectCategory::Animal, t1).unwrap();
        assert!(hint_pool(SubjectCategory::Animal).contains(&hint.as_str()));
        assert_eq!(r.rotation_deadline(), Some(t1 + ROTATION));
    }

    #[test]
    fn late_wakeup_skips_missed_periods() {
        let mut r = rotator();
        let t0 = Instant::now();
        r.start_rotation(SubjectCategory::Object, t0);

        let late = t0 + ROTATION * 3 + Duration::from_millis(500);
        assert!(r.fire_due(SubjectCategory::Object, late).is_some());
        assert_eq!(r.rotation_deadline(), Some(t0 + ROTATION * 4));
    }

    #[test]
    fn stop_clears_everything() {
        let mut r = rotator();
        let t0 = Instant::now();
        r.start_rotation(SubjectCategory::Landscape, t0);
        r.show_feedback(t0);
        r.stop();

        assert_eq!(r.display(), HintDisplay::Off);
        assert!(r.current().is_none());
        assert!(r.next_deadline().is_none());
        assert!(r.fire_due(SubjectCategory::Landscape, t0 + ROTATION * 10).is_none());
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let t0 = Instant::now();
        let mut a = HintRotator::new(FEEDBACK, Some(11));
        let mut b = HintRotator::new(FEEDBACK, Some(11));
        for i in 0..6 {
            let now = t0 + ROTATION * i;
            assert_eq!(
                a.start_rotation(SubjectCategory::People, now),
                b.start_rotation(SubjectCategory::People, now)
            );
        }
    }
}
