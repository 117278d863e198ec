//! 힌트/피드백 문구.

use goldshot_core::models::subject::SubjectCategory;
use goldshot_core::profile::profile_for;

/// 수동 촬영 직후 표시하는 칭찬 문구
pub const FEEDBACK_MESSAGES: [&str; 4] = [
    "완벽한 구도예요!",
    "멋진 각도예요!",
    "황금 비율 포착 성공!",
    "빛과 구도 모두 훌륭해요!",
];

/// 결합 모드 고정 안내
pub const COMBINED_MODE_MESSAGE: &str =
    "수동 촬영 시 힌트가 표시되고, 자동 촬영은 최적의 순간에 찍습니다";

/// 피사체별 힌트 풀
pub fn hint_pool(subject: SubjectCategory) -> &'static [&'static str] {
    profile_for(subject).hints
}
