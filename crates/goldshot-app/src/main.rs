//! # goldshot
//!
//! GOLDSHOT 바이너리 진입점.
//! 설정 로드, 어댑터 와이어링, 스케줄러 구동, 콘솔 명령 처리.

use anyhow::{Context, Result};
use clap::Parser;
use goldshot_app::console::{describe_guides, ConsoleCommand, ConsoleHintSink, HELP};
use goldshot_app::event_bus::{AppEvent, EventBus};
use goldshot_app::lifecycle::{LifecycleManager, ShutdownReason};
use goldshot_app::runner::{self, SchedulerHandle};
use goldshot_app::scheduler::{CaptureScheduler, SchedulerPorts, SchedulerSettings};
use goldshot_core::config::AppConfig;
use goldshot_core::config_manager::ConfigManager;
use goldshot_core::models::mode::CaptureMode;
use goldshot_core::models::subject::SubjectCategory;
use goldshot_core::ports::frame_source::FrameSource;
use goldshot_vision::scorer::HeuristicScorer;
use goldshot_vision::sink::JpegFileSink;
use goldshot_vision::source::{StillImageSource, SyntheticSource};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// 명령 채널 용량
const COMMAND_CAPACITY: usize = 32;

/// GOLDSHOT 촬영 보조기
///
/// 황금 비율 구도를 평가해 최적의 순간에 자동 촬영한다.
#[derive(Parser, Debug)]
#[command(name = "goldshot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 피사체 (landscape, people, animal, object)
    #[arg(long, short = 's')]
    subject: Option<SubjectCategory>,

    /// 촬영 모드 (manual, auto, combined)
    #[arg(long, short = 'm')]
    mode: Option<CaptureMode>,

    /// 프레임 소스로 쓸 정지 이미지 (없으면 합성 프레임)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// 캡처 저장 디렉토리
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// 지정 시간(초) 후 자동 종료
    #[arg(long)]
    duration_secs: Option<u64>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 점수 지터 (0.0 ~ 1.0)
    #[arg(long)]
    jitter: Option<f32>,

    /// RNG 시드 (재현 가능한 힌트/지터)
    #[arg(long)]
    seed: Option<u64>,
}

/// 설정 로드 (명시 경로는 실패 시 에러, 기본 경로는 실패 시 기본값)
fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            let manager = ConfigManager::with_path(path.clone())
                .with_context(|| format!("설정 로드 실패: {}", path.display()))?;
            Ok(manager.get())
        }
        None => match ConfigManager::new() {
            Ok(manager) => {
                debug!("설정 파일: {}", manager.config_path().display());
                Ok(manager.get())
            }
            Err(e) => {
                warn!("설정 파일 사용 불가, 기본값 사용: {e}");
                Ok(AppConfig::default_config())
            }
        },
    }
}

/// CLI 인자로 설정 오버라이드
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(subject) = args.subject {
        config.capture.default_subject = subject;
    }
    if let Some(mode) = args.mode {
        config.capture.default_mode = mode;
    }
    if let Some(jitter) = args.jitter {
        config.scoring.jitter = jitter;
    }
    if args.seed.is_some() {
        config.scoring.seed = args.seed;
    }
    if let Some(ref dir) = args.output_dir {
        config.output.directory = Some(dir.clone());
    }
}

/// 캡처 저장 경로 결정 (CLI/설정 → 플랫폼 기본 → 현재 디렉토리)
fn resolve_output_dir(config: &AppConfig) -> PathBuf {
    config
        .output
        .directory
        .clone()
        .or_else(|| ConfigManager::captures_dir().ok())
        .unwrap_or_else(|| PathBuf::from("./captures"))
}

fn print_banner(config: &AppConfig, output_dir: &std::path::Path) {
    println!();
    println!("╔══════════════════════════════════════════════╗");
    println!("║   GOLDSHOT — 황금 비율 촬영 보조기            ║");
    println!("╚══════════════════════════════════════════════╝");
    println!(
        "📷 모드: {} | 피사체: {} | 저장: {}",
        config.capture.default_mode,
        config.capture.default_subject.label(),
        output_dir.display()
    );
    println!("⌨️  {HELP}");
    println!();
}

/// 표준 입력 리더 (전용 스레드, 블로킹 읽기)
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// 표준 입력 명령 루프
async fn console_loop(
    handle: SchedulerHandle,
    lifecycle: Arc<LifecycleManager>,
    frame_source: Arc<dyn FrameSource>,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> Result<()> {
    while let Some(line) = lines.recv().await {
        let command = match ConsoleCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("⚠️  {e}");
                println!("{HELP}");
                continue;
            }
        };

        match command {
            ConsoleCommand::Subject(subject) => handle.set_subject(subject).await?,
            ConsoleCommand::Mode(mode) => handle.set_mode(mode).await?,
            ConsoleCommand::Capture => {
                if !handle.manual_capture().await? {
                    println!("⚠️  촬영 불가 (세션 없음 또는 프레임 없음)");
                }
            }
            ConsoleCommand::Start => {
                let snapshot = handle.snapshot().await?;
                handle.start_session(snapshot.mode, snapshot.subject).await?;
            }
            ConsoleCommand::Stop => handle.stop_session().await?,
            ConsoleCommand::Status => {
                let snapshot = handle.snapshot().await?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                match frame_source.current_frame() {
                    Some(frame) => {
                        let (width, height) = frame.resolution();
                        println!("{}", describe_guides(width, height));
                    }
                    None => println!("📐 프레임 없음"),
                }
            }
            ConsoleCommand::Quit => {
                lifecycle.shutdown(ShutdownReason::Quit);
                return Ok(());
            }
        }
    }

    // EOF (파이프 입력 등): 종료는 시그널/지정 시간에 맡긴다
    debug!("표준 입력 종료");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "goldshot={},goldshot_app={},goldshot_core={},goldshot_vision={},goldshot_suggestion={}",
        args.log_level, args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    info!("GOLDSHOT 시작");

    // 설정 로드 + CLI 오버라이드
    let mut config = load_config(args.config.as_ref())?;
    apply_overrides(&mut config, &args);
    config.validate().context("설정 검증 실패")?;

    let output_dir = resolve_output_dir(&config);
    print_banner(&config, &output_dir);

    // ── 어댑터 생성 (DI 와이어링) ──

    // 1. 프레임 소스
    let frame_source: Arc<dyn FrameSource> = match args.input {
        Some(ref path) => {
            info!("정지 이미지 소스: {}", path.display());
            Arc::new(
                StillImageSource::open(path)
                    .with_context(|| format!("이미지 열기 실패: {}", path.display()))?,
            )
        }
        None => {
            info!("합성 프레임 소스 사용");
            Arc::new(SyntheticSource::default())
        }
    };

    // 2. 구도 점수기
    let scorer = Arc::new(HeuristicScorer::from_config(&config.scoring));

    // 3. 캡처 저장 (백그라운드 writer)
    let (capture_sink, writer_task) =
        JpegFileSink::spawn(output_dir.clone(), config.output.jpeg_quality)
            .context("캡처 저장소 초기화 실패")?;

    // 4. 스케줄러 + 구동기
    let scheduler = CaptureScheduler::new(
        SchedulerSettings::from_config(&config),
        SchedulerPorts {
            frame_source: frame_source.clone(),
            scorer,
            capture_sink: Arc::new(capture_sink),
            hint_sink: Arc::new(ConsoleHintSink),
        },
    );

    let lifecycle = Arc::new(LifecycleManager::new());
    let event_bus = Arc::new(EventBus::default());
    let (scheduler_runner, handle) = runner::channel(scheduler, COMMAND_CAPACITY);
    let scheduler_task = tokio::spawn(
        scheduler_runner
            .with_event_bus(event_bus.clone())
            .run(lifecycle.subscribe()),
    );

    // 5. 이벤트 로깅
    let mut events = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("이벤트 {skipped}건 놓침");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match event {
                AppEvent::CapturesUpdated { auto, manual } => {
                    println!("📸 촬영! (자동 {auto}장, 수동 {manual}장)");
                }
                AppEvent::PhaseChanged { from, to } => debug!("상태 전이: {from:?} → {to:?}"),
                other => info!("{other:?}"),
            }
        }
    });

    handle
        .start_session(config.capture.default_mode, config.capture.default_subject)
        .await?;

    // 6. 콘솔 명령
    {
        let handle = handle.clone();
        let lifecycle = lifecycle.clone();
        let lines = spawn_stdin_reader();
        tokio::spawn(async move {
            if let Err(e) = console_loop(handle, lifecycle, frame_source, lines).await {
                warn!("콘솔 입력 처리 종료: {e}");
            }
        });
    }

    // 7. 종료 대기: 시그널 / quit / 지정 시간
    let deadline = async {
        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::select! {
        _ = lifecycle.wait_for_signal() => {}
        _ = lifecycle.wait_for_shutdown() => {}
        _ = deadline => lifecycle.shutdown(ShutdownReason::Deadline),
    }

    let summary = scheduler_task.await.context("스케줄러 태스크 실패")?;
    drop(handle);

    // writer는 모든 송신자가 사라지면 남은 캡처를 저장하고 끝난다
    if let Err(e) = writer_task.await {
        warn!("캡처 writer 종료 실패: {e}");
    }

    if let Some(reason) = lifecycle.reason() {
        debug!("종료 사유: {reason}");
    }
    println!();
    println!(
        "✅ 종료 — 자동 촬영 {}장, 수동 촬영 {}장, 평가 {}회",
        summary.stats.auto_captures, summary.stats.manual_captures, summary.stats.ticks
    );
    info!("GOLDSHOT 종료");
    Ok(())
}
