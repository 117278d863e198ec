//! 프레임 소스 어댑터.
//!
//! - [`StillImageSource`]: 이미지 파일 한 장을 계속 공급 (가용성 토글 가능)
//! - [`SyntheticSource`]: 지평선이 위아래로 흔들리는 합성 풍경 (데모용)

use goldshot_core::models::frame::Frame;
use goldshot_core::ports::frame_source::FrameSource;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::{debug, info};

use crate::error::VisionError;

/// 정지 이미지 프레임 소스
pub struct StillImageSource {
    frame: Frame,
    available: AtomicBool,
}

impl StillImageSource {
    /// 이미지 파일 로드 (PNG/JPEG 등 `image` crate 지원 포맷)
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let path = path.as_ref();
        let rgba = image::open(path)?.to_rgba8();
        let (w, h) = rgba.dimensions();
        let frame = Frame::new(w, h, rgba.into_raw())?;
        info!("정지 이미지 소스 로드: {} ({}x{})", path.display(), w, h);
        Ok(Self::from_frame(frame))
    }

    /// 메모리 프레임으로 생성
    pub fn from_frame(frame: Frame) -> Self {
        Self {
            frame,
            available: AtomicBool::new(true),
        }
    }

    /// 가용성 설정 (false면 영상 끊김 상태를 흉내 낸다)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        debug!("프레임 소스 가용성: {}", available);
    }
}

impl FrameSource for StillImageSource {
    fn current_frame(&self) -> Option<Frame> {
        if !self.available.load(Ordering::SeqCst) {
            return None;
        }
        Some(self.frame.clone())
    }
}

/// 합성 풍경 프레임 소스.
///
/// 호출마다 지평선 위치가 삼각파로 화면의 35% ~ 75% 사이를 오간다.
/// 지평선이 분할선을 지날 때 풍경 점수가 올라가므로 자동 캡처 데모에 쓴다.
pub struct SyntheticSource {
    width: u32,
    height: u32,
    /// 한 주기당 호출 수
    period: u64,
    calls: AtomicU64,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, period: u64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(2),
            period: period.max(2),
            calls: AtomicU64::new(0),
        }
    }

    /// n번째 호출의 지평선 위치 (정규화)
    fn horizon_at(&self, call: u64) -> f32 {
        let phase = (call % self.period) as f32 / self.period as f32;
        let tri = if phase < 0.5 { phase * 2.0 } else { 2.0 - phase * 2.0 };
        0.35 + 0.40 * tri
    }

    fn render(&self, horizon: f32) -> Frame {
        let sky_rows = (self.height as f32 * horizon).round() as u32;
        let mut pixels = Vec::with_capacity((self.width * self.height * 4) as usize);
        for y in 0..self.height {
            let rgba = if y < sky_rows {
                [150, 190, 235, 255]
            } else {
                [70, 95, 50, 255]
            };
            for _ in 0..self.width {
                pixels.extend_from_slice(&rgba);
            }
        }
        match Frame::new(self.width, self.height, pixels) {
            Ok(frame) => frame,
            Err(_) => Frame::filled(self.width, self.height, [0, 0, 0, 255]),
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(320, 180, 24)
    }
}

impl FrameSource for SyntheticSource {
    fn current_frame(&self) -> Option<Frame> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        Some(self.render(self.horizon_at(call)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    #[test]
    fn still_source_toggles_availability() {
        let source = StillImageSource::from_frame(Frame::filled(4, 4, [1, 2, 3, 255]));
        assert!(source.current_frame().is_some());
        source.set_available(false);
        assert!(source.current_frame().is_none());
        source.set_available(true);
        assert_eq!(source.current_frame().unwrap().resolution(), (4, 4));
    }

    #[test]
    fn still_source_loads_png() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scene.png");
        RgbaImage::from_pixel(8, 6, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let source = StillImageSource::open(&path).unwrap();
        let frame = source.current_frame().unwrap();
        assert_eq!(frame.resolution(), (8, 6));
        assert_eq!(frame.pixel(0, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn still_source_missing_file_is_error() {
        assert!(StillImageSource::open("/nonexistent/scene.png").is_err());
    }

    #[test]
    fn synthetic_horizon_sweeps_range() {
        let source = SyntheticSource::new(16, 10, 8);
        let positions: Vec<f32> = (0..8).map(|i| source.horizon_at(i)).collect();
        assert!((positions[0] - 0.35).abs() < 1e-6);
        assert!((positions[4] - 0.75).abs() < 1e-6);
        assert!(positions.iter().all(|p| (0.35..=0.75).contains(p)));
    }

    #[test]
    fn synthetic_frames_have_requested_size() {
        let source = SyntheticSource::new(32, 18, 4);
        for _ in 0..5 {
            assert_eq!(source.current_frame().unwrap().resolution(), (32, 18));
        }
    }
}
