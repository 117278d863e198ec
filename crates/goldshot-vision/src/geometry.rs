//! 황금 분할 가이드라인 기하.
//!
//! 화면을 0.382 / 0.618 지점에서 가로, 세로로 나누는 네 개의 선과
//! 그 교차점(파워 포인트)을 계산한다. 오버레이 그리기와 점수 계산에 쓴다.

/// 황금비 (짧은 쪽 비율의 보수)
pub const GOLDEN_RATIO: f32 = 0.618;

/// 정규화 좌표(0.0 ~ 1.0)의 두 분할선 위치
pub const GOLDEN_LINES: [f32; 2] = [1.0 - GOLDEN_RATIO, GOLDEN_RATIO];

/// 픽셀 좌표 가이드라인
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideLines {
    /// 세로선 x 좌표 (왼쪽, 오른쪽)
    pub vertical: [u32; 2],
    /// 가로선 y 좌표 (위, 아래)
    pub horizontal: [u32; 2],
}

impl GuideLines {
    /// 해상도에 맞는 가이드라인 (소수점 버림)
    pub fn for_size(width: u32, height: u32) -> Self {
        let at = |len: u32, t: f32| (len as f32 * t).floor() as u32;
        Self {
            vertical: [at(width, GOLDEN_LINES[0]), at(width, GOLDEN_LINES[1])],
            horizontal: [at(height, GOLDEN_LINES[0]), at(height, GOLDEN_LINES[1])],
        }
    }

    /// 네 교차점 (x, y)
    pub fn power_points(&self) -> [(u32, u32); 4] {
        let [x1, x2] = self.vertical;
        let [y1, y2] = self.horizontal;
        [(x1, y1), (x2, y1), (x1, y2), (x2, y2)]
    }
}

/// 가장 가까운 분할선까지의 정규화 거리
pub fn distance_to_nearest_line(t: f32) -> f32 {
    GOLDEN_LINES
        .iter()
        .map(|line| (t - line).abs())
        .fold(f32::MAX, f32::min)
}

/// 분할선 근접 가중치: 선 위 1.0, `band` 거리 이상 0.0 (삼각형)
pub fn line_weight(t: f32, band: f32) -> f32 {
    (1.0 - distance_to_nearest_line(t) / band).max(0.0)
}
