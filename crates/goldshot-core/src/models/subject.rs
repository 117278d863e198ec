//! 피사체 카테고리 모델.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// 촬영 피사체 카테고리: 샘플링 주기/임계값/힌트 풀을 결정한다
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectCategory {
    /// 풍경: 정적, 엄격한 기준
    #[default]
    Landscape,
    /// 인물
    People,
    /// 동물: 빠르게 움직임, 느슨한 기준
    Animal,
    /// 사물
    Object,
}

impl SubjectCategory {
    /// 전체 카테고리 (정책 테이블 순서)
    pub const ALL: [SubjectCategory; 4] = [
        SubjectCategory::Landscape,
        SubjectCategory::People,
        SubjectCategory::Animal,
        SubjectCategory::Object,
    ];

    /// 직렬화/CLI 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectCategory::Landscape => "landscape",
            SubjectCategory::People => "people",
            SubjectCategory::Animal => "animal",
            SubjectCategory::Object => "object",
        }
    }

    /// 표시용 라벨
    pub fn label(&self) -> &'static str {
        match self {
            SubjectCategory::Landscape => "풍경",
            SubjectCategory::People => "인물",
            SubjectCategory::Animal => "동물",
            SubjectCategory::Object => "사물",
        }
    }
}

impl fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectCategory {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "landscape" => Ok(SubjectCategory::Landscape),
            "people" => Ok(SubjectCategory::People),
            "animal" => Ok(SubjectCategory::Animal),
            "object" => Ok(SubjectCategory::Object),
            other => Err(CoreError::InvalidArguments(format!(
                "알 수 없는 피사체: {other} (landscape|people|animal|object)"
            ))),
        }
    }
}
