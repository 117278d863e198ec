//! JPEG 파일 캡처 싱크.
//!
//! `CaptureSink` 포트 구현. 스케줄러는 이벤트를 채널에 넣기만 하고,
//! 별도 tokio 태스크가 JPEG 인코딩 후 `goldshot_<unix_millis>.jpg`로 저장한다.
//! 대기열이 가득 차면 새 캡처는 버리고 경고를 남긴다.

use goldshot_core::error::CoreError;
use goldshot_core::models::capture::CaptureEvent;
use goldshot_core::models::frame::Frame;
use goldshot_core::ports::sink::CaptureSink;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::VisionError;

/// 저장 대기열 용량 (인코딩 대기 중인 캡처 수)
pub const WRITER_QUEUE_CAPACITY: usize = 16;

/// 프레임 → JPEG 바이트 (알파 채널 제거)
pub fn encode_jpeg(frame: &Frame, quality: u8) -> Result<Vec<u8>, VisionError> {
    let (w, h) = frame.resolution();
    let rgba = RgbaImage::from_raw(w, h, frame.as_rgba().to_vec()).ok_or(CoreError::FrameSize {
        expected: w as usize * h as usize * 4,
        actual: frame.as_rgba().len(),
    })?;
    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder.encode_image(&rgb)?;
    Ok(buf)
}

/// 캡처 한 건을 디렉토리에 저장하고 경로 반환.
///
/// 같은 밀리초에 여러 장이면 `_1`, `_2` 접미사를 붙인다.
pub fn write_capture(dir: &Path, event: &CaptureEvent, quality: u8) -> Result<PathBuf, VisionError> {
    let bytes = encode_jpeg(&event.frame, quality)?;
    let path = unique_path(dir, &event.file_name());
    fs::write(&path, bytes)?;
    Ok(path)
}

fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }
    let stem = file_name.trim_end_matches(".jpg");
    (1u32..)
        .map(|n| dir.join(format!("{stem}_{n}.jpg")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// JPEG 파일 저장 싱크
#[derive(Clone)]
pub struct JpegFileSink {
    tx: mpsc::Sender<CaptureEvent>,
}

impl JpegFileSink {
    /// 저장 디렉토리를 만들고 작업자 태스크를 띄운다. tokio 런타임 안에서 호출해야 한다.
    ///
    /// 반환된 `JoinHandle`은 모든 `JpegFileSink` 복제본이 drop되면 종료된다.
    pub fn spawn(dir: PathBuf, quality: u8) -> Result<(Self, JoinHandle<()>), VisionError> {
        fs::create_dir_all(&dir)?;
        info!("캡처 저장 경로: {} (JPEG 품질 {})", dir.display(), quality);

        let (tx, rx) = mpsc::channel(WRITER_QUEUE_CAPACITY);
        let handle = tokio::spawn(writer_loop(rx, dir, quality));
        Ok((Self { tx }, handle))
    }

    /// 이벤트 전달 (대기하지 않음). 대기열이 가득 찼거나 작업자가 종료됐으면 에러.
    pub fn submit(&self, event: CaptureEvent) -> Result<(), VisionError> {
        self.tx.try_send(event).map_err(|e| match e {
            TrySendError::Full(_) => VisionError::QueueFull(WRITER_QUEUE_CAPACITY),
            TrySendError::Closed(_) => VisionError::WriterClosed,
        })
    }
}

impl CaptureSink for JpegFileSink {
    fn on_capture_requested(&self, event: CaptureEvent) {
        let id = event.id;
        match self.submit(event) {
            Ok(()) => {}
            Err(VisionError::QueueFull(capacity)) => {
                warn!("저장 대기열 가득 참 ({capacity}건), 캡처 버림: {id}");
            }
            Err(e) => warn!("캡처 전달 실패: {e}"),
        }
    }
}

async fn writer_loop(mut rx: mpsc::Receiver<CaptureEvent>, dir: PathBuf, quality: u8) {
    while let Some(event) = rx.recv().await {
        let dir = dir.clone();
        let id = event.id;
        let result =
            tokio::task::spawn_blocking(move || write_capture(&dir, &event, quality).map(|p| (p, event)))
                .await;

        match result {
            Ok(Ok((path, event))) => {
                let origin = if event.origin.is_auto() { "자동" } else { "수동" };
                info!("{origin} 캡처 저장: {}", path.display());
                match serde_json::to_string(&event.metadata()) {
                    Ok(meta) => debug!("캡처 메타데이터: {meta}"),
                    Err(e) => debug!("메타데이터 직렬화 실패: {e}"),
                }
            }
            Ok(Err(e)) => warn!("캡처 저장 실패 ({id}): {e}"),
            Err(e) => warn!("캡처 저장 태스크 실패 ({id}): {e}"),
        }
    }
    debug!("캡처 저장 작업자 종료");
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use goldshot_core::models::capture::CaptureOrigin;
    use goldshot_core::models::mode::CaptureMode;
    use goldshot_core::models::subject::SubjectCategory;
    use std::time::Duration;
    use tempfile::TempDir;

    fn make_event() -> CaptureEvent {
        CaptureEvent::new(
            Frame::filled(32, 24, [200, 120, 40, 255]),
            CaptureOrigin::Manual,
            SubjectCategory::Object,
            CaptureMode::Manual,
        )
    }

    #[test]
    fn encodes_valid_jpeg() {
        let bytes = encode_jpeg(&Frame::filled(16, 16, [10, 200, 30, 128]), 90).unwrap();
        // SOI 마커
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn write_capture_avoids_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let event = make_event();

        let first = write_capture(temp_dir.path(), &event, 90).unwrap();
        let second = write_capture(temp_dir.path(), &event, 90).unwrap();

        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
        assert!(first
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("goldshot_"));
    }

    #[tokio::test]
    async fn sink_writes_in_background() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("captures");
        let (sink, handle) = JpegFileSink::spawn(dir.clone(), 85).unwrap();

        sink.on_capture_requested(make_event());
        drop(sink);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        let files: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn submit_after_writer_stops_fails() {
        let temp_dir = TempDir::new().unwrap();
        let (sink, handle) = JpegFileSink::spawn(temp_dir.path().to_path_buf(), 85).unwrap();
        handle.abort();
        let _ = handle.await;

        assert_matches!(sink.submit(make_event()), Err(VisionError::WriterClosed));
    }

    #[tokio::test]
    async fn full_queue_drops_capture_instead_of_growing() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("captures");
        let (sink, handle) = JpegFileSink::spawn(dir.clone(), 85).unwrap();

        // current_thread 런타임: 양보 전까지 작업자가 대기열을 비우지 않는다
        for _ in 0..WRITER_QUEUE_CAPACITY {
            sink.submit(make_event()).unwrap();
        }
        assert_matches!(
            sink.submit(make_event()),
            Err(VisionError::QueueFull(WRITER_QUEUE_CAPACITY))
        );
        // 포트 경로는 경고만 남기고 패닉하지 않는다
        sink.on_capture_requested(make_event());

        drop(sink);
        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .unwrap()
            .unwrap();

        let files: Vec<_> = fs::read_dir(&dir).unwrap().collect();
        assert_eq!(files.len(), WRITER_QUEUE_CAPACITY);
    }
}
