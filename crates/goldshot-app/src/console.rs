//! 콘솔 운영자 표면.
//!
//! 힌트를 터미널에 출력하는 `HintSink`, 표준 입력 명령 파서,
//! `status` 명령의 가이드라인 요약.

use goldshot_core::error::CoreError;
use goldshot_core::models::mode::CaptureMode;
use goldshot_core::models::subject::SubjectCategory;
use goldshot_core::ports::sink::HintSink;
use goldshot_vision::geometry::GuideLines;
use tracing::info;

/// 힌트를 표준 출력에 표시
#[derive(Debug, Default)]
pub struct ConsoleHintSink;

impl HintSink for ConsoleHintSink {
    fn on_hint_changed(&self, text: &str) {
        info!("힌트 변경: {text}");
        println!("💡 {text}");
    }
}

/// 표준 입력 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Subject(SubjectCategory),
    Mode(CaptureMode),
    Capture,
    Start,
    Stop,
    Status,
    Quit,
}

impl ConsoleCommand {
    /// 한 줄 파싱. 빈 줄은 `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CoreError> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Ok(None);
        };
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(CoreError::InvalidArguments(format!("인자가 너무 많음: {line}")));
        }

        let command = match (verb.to_ascii_lowercase().as_str(), arg) {
            ("subject", Some(name)) => ConsoleCommand::Subject(name.parse()?),
            ("mode", Some(name)) => ConsoleCommand::Mode(name.parse()?),
            ("subject" | "mode", None) => {
                return Err(CoreError::InvalidArguments(format!("{verb}: 이름이 필요함")));
            }
            ("capture" | "shot", None) => ConsoleCommand::Capture,
            ("start", None) => ConsoleCommand::Start,
            ("stop", None) => ConsoleCommand::Stop,
            ("status", None) => ConsoleCommand::Status,
            ("quit" | "exit", None) => ConsoleCommand::Quit,
            _ => {
                return Err(CoreError::InvalidArguments(format!("알 수 없는 명령: {line}")));
            }
        };
        Ok(Some(command))
    }
}

/// 명령 도움말
pub const HELP: &str = "명령: subject <landscape|people|animal|object>, mode <manual|auto|combined>, capture, start, stop, status, quit";

/// 해상도에 맞는 황금 분할선과 파워 포인트 한 줄 요약
pub fn describe_guides(width: u32, height: u32) -> String {
    let guides = GuideLines::for_size(width, height);
    let points = guides
        .power_points()
        .iter()
        .map(|(x, y)| format!("({x}, {y})"))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "📐 가이드 {width}x{height}: 세로 x={:?}, 가로 y={:?}, 파워 포인트 {points}",
        guides.vertical, guides.horizontal
    )
}
