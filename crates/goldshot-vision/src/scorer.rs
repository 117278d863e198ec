//! 구도 점수기.
//!
//! `CompositionScorer` 포트 구현. 프레임 다운스케일 → 휘도 분석 →
//! 가중 합산 → [0, 1] 클램프.
//!
//! 점수 = 0.4 × 프레이밍 + 0.3 × 노출 + 0.3 × 피사체 보정 + 지터
//!
//! - 프레이밍: 화면 대비(엣지) 에너지가 황금 분할선 근처에 몰린 정도
//! - 노출: 평균 휘도가 중간 회색에 가까운 정도
//! - 피사체 보정: 인물은 얼굴 위치 추정, 풍경은 지평선 위치 추정, 그 외 0
//! - 지터: 선택적 무작위 가산점 (기본 0)

use goldshot_core::config::ScoringConfig;
use goldshot_core::models::frame::Frame;
use goldshot_core::models::score::CompositionScore;
use goldshot_core::models::subject::SubjectCategory;
use goldshot_core::ports::scorer::CompositionScorer;
use image::{DynamicImage, GrayImage, RgbaImage};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::geometry::{distance_to_nearest_line, line_weight, GOLDEN_LINES};

/// 분석용 다운스케일 최대 변 길이 (픽셀)
const ANALYSIS_MAX_DIM: u32 = 64;
/// 프레이밍 가중치 대역 (정규화 거리)
const LINE_BAND: f32 = 0.1;
/// 지평선으로 인정할 최소 행 평균 휘도 차
const MIN_HORIZON_STEP: f32 = 8.0;
/// 돌출 픽셀로 인정할 평균 대비 최소 휘도 차
const MIN_SALIENCE: f32 = 32.0;
/// 얼굴/지평선 위치 허용 거리
const FACE_TOLERANCE: f32 = 0.25;
const HORIZON_TOLERANCE: f32 = 0.15;

/// 점수 요소별 가중치
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub framing: f32,
    pub exposure: f32,
    pub subject: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            framing: 0.4,
            exposure: 0.3,
            subject: 0.3,
        }
    }
}

/// 프레임 분석 결과 (각 요소 0.0 ~ 1.0)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameAnalysis {
    pub framing: f32,
    pub exposure: f32,
    /// 인물용: 돌출 영역 중심이 위쪽 파워 포인트에 가까운 정도
    pub face_position: f32,
    /// 풍경용: 가장 강한 가로 경계가 분할선에 가까운 정도
    pub horizon_position: f32,
}

impl FrameAnalysis {
    /// 피사체별 보정값
    pub fn subject_adjustment(&self, subject: SubjectCategory) -> f32 {
        match subject {
            SubjectCategory::People => self.face_position,
            SubjectCategory::Landscape => self.horizon_position,
            SubjectCategory::Animal | SubjectCategory::Object => 0.0,
        }
    }
}

/// 황금 분할 휴리스틱 점수기
pub struct HeuristicScorer {
    weights: ScoringWeights,
    /// 무작위 가산점 최대치
    jitter: f32,
    rng: Mutex<StdRng>,
}

impl HeuristicScorer {
    /// 지터 없는 결정적 점수기
    pub fn new() -> Self {
        Self::with_jitter(0.0, None)
    }

    /// 지터 포함 점수기. `seed`가 있으면 재현 가능.
    pub fn with_jitter(jitter: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            weights: ScoringWeights::default(),
            jitter: jitter.max(0.0),
            rng: Mutex::new(rng),
        }
    }

    /// 설정에서 생성
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::with_jitter(config.jitter, config.seed)
    }

    /// 프레임 분석 (지터/가중치 미적용)
    pub fn analyze(&self, frame: &Frame) -> FrameAnalysis {
        match downscale_luma(frame) {
            Some(luma) => analyze_luma(&luma),
            None => FrameAnalysis::default(),
        }
    }

    fn jitter_sample(&self) -> f32 {
        if self.jitter <= 0.0 {
            return 0.0;
        }
        self.rng.lock().random::<f32>() * self.jitter
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositionScorer for HeuristicScorer {
    fn score(&self, frame: &Frame, subject: SubjectCategory) -> CompositionScore {
        if frame.is_empty() {
            return CompositionScore::MIN;
        }
        let analysis = self.analyze(frame);
        let raw = self.weights.framing * analysis.framing
            + self.weights.exposure * analysis.exposure
            + self.weights.subject * analysis.subject_adjustment(subject)
            + self.jitter_sample();
        let score = CompositionScore::new(raw);
        trace!(
            "구도 분석 {:?}: {:?} → raw {:.3}, score {}",
            subject,
            analysis,
            raw,
            score
        );
        score
    }
}

/// 고정 점수기: 테스트/데모용, 실행 중 점수 변경 가능
pub struct FixedScorer {
    score: Mutex<CompositionScore>,
}

impl FixedScorer {
    pub fn new(score: f32) -> Self {
        Self {
            score: Mutex::new(CompositionScore::new(score)),
        }
    }

    /// 이후 평가에 쓸 점수 변경
    pub fn set(&self, score: f32) {
        *self.score.lock() = CompositionScore::new(score);
        debug!("고정 점수 변경: {:.2}", score);
    }
}

impl CompositionScorer for FixedScorer {
    fn score(&self, _frame: &Frame, _subject: SubjectCategory) -> CompositionScore {
        *self.score.lock()
    }
}

// ============================================================
// 휘도 분석
// ============================================================

/// 프레임 → 분석용 소형 휘도 이미지
fn downscale_luma(frame: &Frame) -> Option<GrayImage> {
    if frame.is_empty() {
        return None;
    }
    let (w, h) = frame.resolution();
    let rgba = RgbaImage::from_raw(w, h, frame.as_rgba().to_vec())?;
    let rgba = if w > ANALYSIS_MAX_DIM || h > ANALYSIS_MAX_DIM {
        let scale = ANALYSIS_MAX_DIM as f32 / w.max(h) as f32;
        let tw = ((w as f32 * scale).round() as u32).max(1);
        let th = ((h as f32 * scale).round() as u32).max(1);
        image::imageops::thumbnail(&rgba, tw, th)
    } else {
        rgba
    };
    Some(DynamicImage::ImageRgba8(rgba).to_luma8())
}

fn analyze_luma(luma: &GrayImage) -> FrameAnalysis {
    let (w, h) = luma.dimensions();
    let at = |x: u32, y: u32| luma.get_pixel(x, y).0[0] as f32;

    let count = (w * h) as f32;
    let mean = luma.pixels().map(|p| p.0[0] as f32).sum::<f32>() / count;

    FrameAnalysis {
        framing: framing_factor(w, h, &at),
        exposure: exposure_factor(mean),
        face_position: face_position_estimate(w, h, mean, &at),
        horizon_position: horizon_position_estimate(w, h, &at),
    }
}

/// 엣지 에너지의 분할선 집중도.
///
/// 균일 분포면 0.5, 분할선 대역에 두 배 이상 몰리면 1.0, 엣지가 없으면 0.0.
fn framing_factor(w: u32, h: u32, at: &impl Fn(u32, u32) -> f32) -> f32 {
    let weight_at = |tx: f32, ty: f32| line_weight(tx, LINE_BAND).max(line_weight(ty, LINE_BAND));

    let mut energy = 0.0f32;
    let mut weighted_energy = 0.0f32;
    let mut weight_sum = 0.0f32;
    let mut samples = 0u32;

    for y in 0..h {
        for x in 0..w {
            let here = at(x, y);
            if x + 1 < w {
                // 세로 경계 (x와 x+1 사이)
                let g = (at(x + 1, y) - here).abs();
                let wgt = weight_at((x + 1) as f32 / w as f32, (y as f32 + 0.5) / h as f32);
                energy += g;
                weighted_energy += g * wgt;
                weight_sum += wgt;
                samples += 1;
            }
            if y + 1 < h {
                // 가로 경계 (y와 y+1 사이)
                let g = (at(x, y + 1) - here).abs();
                let wgt = weight_at((x as f32 + 0.5) / w as f32, (y + 1) as f32 / h as f32);
                energy += g;
                weighted_energy += g * wgt;
                weight_sum += wgt;
                samples += 1;
            }
        }
    }

    if energy <= f32::EPSILON || weight_sum <= f32::EPSILON || samples == 0 {
        return 0.0;
    }
    let mean_weight = weight_sum / samples as f32;
    let concentration = (weighted_energy / energy) / mean_weight;
    (concentration * 0.5).clamp(0.0, 1.0)
}

/// 평균 휘도가 중간 회색(127.5)에 가까울수록 1.0
fn exposure_factor(mean: f32) -> f32 {
    let normalized = mean / 255.0;
    (1.0 - (normalized - 0.5).abs() * 2.0).clamp(0.0, 1.0)
}

/// 돌출 영역 무게중심이 위쪽 파워 포인트 (0.382|0.618, 0.382)에 가까운 정도
fn face_position_estimate(w: u32, h: u32, mean: f32, at: &impl Fn(u32, u32) -> f32) -> f32 {
    let mut mass = 0.0f32;
    let mut sum_x = 0.0f32;
    let mut sum_y = 0.0f32;
    for y in 0..h {
        for x in 0..w {
            let salience = (at(x, y) - mean).abs();
            if salience > MIN_SALIENCE {
                mass += salience;
                sum_x += salience * (x as f32 + 0.5) / w as f32;
                sum_y += salience * (y as f32 + 0.5) / h as f32;
            }
        }
    }
    if mass <= f32::EPSILON {
        return 0.0;
    }
    let (cx, cy) = (sum_x / mass, sum_y / mass);
    let upper = GOLDEN_LINES[0];
    let distance = GOLDEN_LINES
        .iter()
        .map(|&px| ((cx - px).powi(2) + (cy - upper).powi(2)).sqrt())
        .fold(f32::MAX, f32::min);
    (1.0 - distance / FACE_TOLERANCE).clamp(0.0, 1.0)
}

/// 가장 강한 가로 경계(행 평균 휘도 변화)가 가로 분할선에 가까운 정도
fn horizon_position_estimate(w: u32, h: u32, at: &impl Fn(u32, u32) -> f32) -> f32 {
    if h < 2 {
        return 0.0;
    }
    let row_means: Vec<f32> = (0..h)
        .map(|y| (0..w).map(|x| at(x, y)).sum::<f32>() / w as f32)
        .collect();

    let (best_row, best_step) = row_means
        .windows(2)
        .enumerate()
        .map(|(y, pair)| (y, (pair[1] - pair[0]).abs()))
        .fold((0usize, 0.0f32), |best, cur| if cur.1 > best.1 { cur } else { best });

    if best_step < MIN_HORIZON_STEP {
        return 0.0;
    }
    let t = (best_row + 1) as f32 / h as f32;
    (1.0 - distance_to_nearest_line(t) / HORIZON_TOLERANCE).clamp(0.0, 1.0)
}
