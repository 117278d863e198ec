//! 피사체 프로필 레지스트리.
//!
//! 피사체 카테고리 → {샘플링 주기, 점수 임계값, 힌트 풀, 힌트 순환 주기}.
//! 빠르게 움직이는 피사체(동물, 인물)는 짧은 주기와 낮은 임계값,
//! 정적인 피사체(풍경, 사물)는 긴 주기와 엄격한 임계값을 쓴다.

use std::time::Duration;

use crate::models::subject::SubjectCategory;

/// 피사체별 정책 (정적, 런타임 읽기 전용)
#[derive(Debug, PartialEq)]
pub struct SubjectProfile {
    /// 대상 카테고리
    pub category: SubjectCategory,
    /// 샘플링 주기 (밀리초, 양수)
    pub sampling_interval_ms: u64,
    /// 자동 캡처 임계값 (0.0 ~ 1.0)
    pub score_threshold: f32,
    /// 촬영 힌트 (순서 유지)
    pub hints: &'static [&'static str],
    /// 힌트 순환 주기 (밀리초, 양수)
    pub hint_rotation_ms: u64,
    /// 카메라 파라미터 설명 (피사체 전환 시 로그)
    pub camera_preset: &'static str,
}

impl SubjectProfile {
    pub fn sampling_interval(&self) -> Duration {
        Duration::from_millis(self.sampling_interval_ms)
    }

    pub fn hint_rotation(&self) -> Duration {
        Duration::from_millis(self.hint_rotation_ms)
    }
}

/// 공통 힌트 순환 주기
const HINT_ROTATION_MS: u64 = 8_000;

static LANDSCAPE: SubjectProfile = SubjectProfile {
    category: SubjectCategory::Landscape,
    sampling_interval_ms: 1_500,
    score_threshold: 0.70,
    hints: &[
        "지평선을 아래쪽 황금 분할선 근처에 두고, 화면 중앙은 피하세요",
        "유도선을 활용해 화면의 깊이감을 살리세요",
        "전경, 중경, 후경의 층을 의식하세요",
        "일출/일몰의 골든 아워에 촬영해 보세요",
        "삼분할 구도로 하늘과 땅을 3:2 또는 2:1 비율로 나누세요",
    ],
    hint_rotation_ms: HINT_ROTATION_MS,
    camera_preset: "큰 피사계 심도, 광각",
};

static PEOPLE: SubjectProfile = SubjectProfile {
    category: SubjectCategory::People,
    sampling_interval_ms: 800,
    score_threshold: 0.65,
    hints: &[
        "눈을 위쪽 황금 분할선 근처에 두세요",
        "캐치라이트로 눈빛을 살리세요",
        "큰 조리개로 배경을 흐려 주체를 강조하세요",
        "방해 요소가 없는 단순한 배경을 고르세요",
        "상반신이나 7분 신 구도가 더 안정적입니다",
    ],
    hint_rotation_ms: HINT_ROTATION_MS,
    camera_preset: "얕은 피사계 심도, 배경 흐림",
};

static ANIMAL: SubjectProfile = SubjectProfile {
    category: SubjectCategory::Animal,
    sampling_interval_ms: 500,
    score_threshold: 0.50,
    hints: &[
        "가장 자연스러운 순간을 기다리고, 움직이지 말아 놀라게 하지 마세요",
        "동물의 눈을 황금 분할점에 두세요",
        "연속 초점으로 움직이는 동물을 추적하세요",
        "동물과 배경의 대비가 뚜렷한 장면을 고르세요",
        "인내심을 갖고 자연스러운 행동을 포착하세요",
    ],
    hint_rotation_ms: HINT_ROTATION_MS,
    camera_preset: "고속 연사, 빠른 초점",
};

static OBJECT: SubjectProfile = SubjectProfile {
    category: SubjectCategory::Object,
    sampling_interval_ms: 1_500,
    score_threshold: 0.60,
    hints: &[
        "45도 측광으로 질감을 살리세요",
        "배경과 물체의 색 대비를 활용하세요",
        "단순한 배경으로 주체를 돋보이게 하세요",
        "부감, 앙각, 수평 등 다양한 각도를 시도하세요",
        "소품이나 주변 환경으로 이야기를 더하세요",
    ],
    hint_rotation_ms: HINT_ROTATION_MS,
    camera_preset: "접사, 높은 디테일",
};

/// 카테고리별 프로필 조회 (전 카테고리에 대해 정의됨)
pub fn profile_for(category: SubjectCategory) -> &'static SubjectProfile {
    match category {
        SubjectCategory::Landscape => &LANDSCAPE,
        SubjectCategory::People => &PEOPLE,
        SubjectCategory::Animal => &ANIMAL,
        SubjectCategory::Object => &OBJECT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table() {
        let expected = [
            (SubjectCategory::Landscape, 1_500, 0.70),
            (SubjectCategory::People, 800, 0.65),
            (SubjectCategory::Animal, 500, 0.50),
            (SubjectCategory::Object, 1_500, 0.60),
        ];
        for (category, interval, threshold) in expected {
            let profile = profile_for(category);
            assert_eq!(profile.category, category);
            assert_eq!(profile.sampling_interval_ms, interval);
            assert_eq!(profile.score_threshold, threshold);
        }
    }

    #[test]
    fn every_profile_is_well_formed() {
        for category in SubjectCategory::ALL {
            let profile = profile_for(category);
            assert!((0.0..=1.0).contains(&profile.score_threshold));
            assert!(profile.sampling_interval_ms > 0);
            assert!(profile.hint_rotation_ms > 0);
            assert!(!profile.hints.is_empty());
            assert!(!profile.camera_preset.is_empty());
        }
    }

    #[test]
    fn moving_subjects_sample_faster() {
        let animal = profile_for(SubjectCategory::Animal);
        let people = profile_for(SubjectCategory::People);
        let landscape = profile_for(SubjectCategory::Landscape);
        assert!(animal.sampling_interval() < people.sampling_interval());
        assert!(people.sampling_interval() < landscape.sampling_interval());
        assert!(animal.score_threshold < landscape.score_threshold);
    }
}
