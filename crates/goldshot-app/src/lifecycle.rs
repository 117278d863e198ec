//! 앱 종료 경로.
//!
//! GOLDSHOT 세션은 다음 중 먼저 오는 것으로 끝난다.
//! - 콘솔 `quit` (또는 `exit`) 명령
//! - `--duration-secs` 지정 시간 경과
//! - OS 시그널 (unix는 SIGINT/SIGTERM, 그 외 Ctrl+C)
//!
//! 어느 경로든 [`LifecycleManager::shutdown`]이 watch 값을 `true`로 바꾸면
//! 스케줄러 구동기가 세션을 멈추고 최종 스냅샷을 돌려준다.
//! 처음 들어온 종료 사유만 기록된다.

use std::fmt;
use std::sync::OnceLock;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// OS 시그널
    Signal,
    /// 콘솔 `quit`
    Quit,
    /// `--duration-secs` 경과
    Deadline,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShutdownReason::Signal => "시그널 수신",
            ShutdownReason::Quit => "quit 명령",
            ShutdownReason::Deadline => "지정 시간 경과",
        };
        f.write_str(text)
    }
}

/// 종료 신호 소유자. 스케줄러 구동기와 main이 같은 인스턴스를 공유한다.
pub struct LifecycleManager {
    shutdown_tx: watch::Sender<bool>,
    reason: OnceLock<ShutdownReason>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx,
            reason: OnceLock::new(),
        }
    }

    /// 구동기에 넘길 종료 수신기
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    /// 기록된 종료 사유 (아직 종료 전이면 `None`)
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.get().copied()
    }

    /// 종료 시작. 두 번째 이후 호출은 사유만 로그로 남기고 무시한다.
    pub fn shutdown(&self, reason: ShutdownReason) {
        if self.reason.set(reason).is_err() {
            debug!("이미 종료 중, 무시: {reason}");
            return;
        }
        info!("종료 시작: {reason}");
        // 수신자가 없어도 값은 갱신된다
        self.shutdown_tx.send_replace(true);
    }

    /// `quit` 같은 다른 경로가 종료를 시작할 때까지 대기
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.subscribe();
        // 송신자가 self에 있으므로 Err는 발생하지 않는다
        let _ = rx.wait_for(|stop| *stop).await;
    }

    /// OS 시그널을 기다렸다가 종료 시작.
    /// 핸들러 등록에 실패하면 영원히 대기한다 (다른 경로로만 종료).
    pub async fn wait_for_signal(&self) {
        if let Err(e) = Self::recv_signal().await {
            warn!("시그널 핸들러 등록 실패: {e}");
            std::future::pending::<()>().await;
        }
        self.shutdown(ShutdownReason::Signal);
    }

    #[cfg(unix)]
    async fn recv_signal() -> std::io::Result<()> {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => debug!("SIGINT"),
            _ = sigterm.recv() => debug!("SIGTERM"),
        }
        Ok(())
    }

    #[cfg(not(unix))]
    async fn recv_signal() -> std::io::Result<()> {
        tokio::signal::ctrl_c().await?;
        debug!("Ctrl+C");
        Ok(())
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn starts_running() {
        let lm = LifecycleManager::new();
        let rx = lm.subscribe();
        assert!(!*rx.borrow());
        assert!(!lm.is_shutting_down());
        assert_eq!(lm.reason(), None);
    }

    #[test]
    fn first_reason_wins() {
        let lm = LifecycleManager::new();
        let rx = lm.subscribe();
        lm.shutdown(ShutdownReason::Quit);
        lm.shutdown(ShutdownReason::Deadline);
        assert!(*rx.borrow());
        assert_eq!(lm.reason(), Some(ShutdownReason::Quit));
    }

    #[test]
    fn shutdown_without_subscribers_is_visible_later() {
        let lm = LifecycleManager::new();
        lm.shutdown(ShutdownReason::Deadline);
        assert!(lm.is_shutting_down());
        assert!(*lm.subscribe().borrow());
    }

    #[tokio::test]
    async fn wait_for_shutdown_returns_after_quit() {
        let lm = Arc::new(LifecycleManager::new());
        let waiter = {
            let lm = lm.clone();
            tokio::spawn(async move { lm.wait_for_shutdown().await })
        };
        lm.shutdown(ShutdownReason::Quit);
        waiter.await.unwrap();
    }
}
