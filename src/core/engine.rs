use crate::core::{LaunchOutcome, LaunchSequence, Terminal};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct LaunchEngine<S: LaunchSequence, T: Terminal> {
    sequence: S,
    terminal: T,
    pause_on_exit: bool,
    monitor: SystemMonitor,
}

impl<S: LaunchSequence, T: Terminal> LaunchEngine<S, T> {
    pub fn new(sequence: S, terminal: T, pause_on_exit: bool) -> Self {
        Self::new_with_monitoring(sequence, terminal, pause_on_exit, false)
    }

    pub fn new_with_monitoring(
        sequence: S,
        terminal: T,
        pause_on_exit: bool,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            sequence,
            terminal,
            pause_on_exit,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// 依序執行各階段，無論成敗最後都暫停終端機
    pub async fn run(&self) -> Result<LaunchOutcome> {
        let result = self.run_stages().await;

        match &result {
            Ok(outcome) if outcome.success() => {
                tracing::info!("Entry point exited normally after {:?}", outcome.duration);
            }
            Ok(outcome) => {
                tracing::warn!(
                    "Entry point exited with code {:?} after {:?}",
                    outcome.exit_code,
                    outcome.duration
                );
            }
            Err(e) => {
                tracing::error!("Launch sequence failed: {}", e);
            }
        }

        self.monitor.log_final_stats();

        // 無論哪一階段失敗，結束前都要讓使用者看得到輸出
        if self.pause_on_exit {
            if let Err(e) = self.terminal.hold_open().await {
                tracing::warn!("Failed to hold terminal open: {}", e);
            }
        }

        result
    }

    async fn run_stages(&self) -> Result<LaunchOutcome> {
        println!("Starting launch sequence...");

        // Prepare
        println!("Preparing project directory...");
        let project_dir = self.sequence.prepare().await?;
        println!("Project directory: {}", project_dir.display());
        self.monitor.log_stats("Prepare");

        // Activate
        println!("Activating environment...");
        let environment = self.sequence.activate(&project_dir).await?;
        println!("Activated environment: {}", environment.name);
        self.monitor.log_stats("Activate");

        // Invoke
        println!("Invoking entry point...");
        let outcome = self.sequence.invoke(&project_dir, environment).await?;
        self.monitor.log_stats("Invoke");

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ActivatedEnvironment;
    use crate::utils::error::LauncherError;
    use async_trait::async_trait;
    use chrono::Local;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Copy, PartialEq)]
    enum FailAt {
        Nowhere,
        Prepare,
        Activate,
        Invoke,
    }

    struct MockSequence {
        fail_at: FailAt,
        exit_code: i32,
        prepare_calls: Arc<AtomicUsize>,
        activate_calls: Arc<AtomicUsize>,
        invoke_calls: Arc<AtomicUsize>,
    }

    impl MockSequence {
        fn new(fail_at: FailAt) -> Self {
            Self {
                fail_at,
                exit_code: 0,
                prepare_calls: Arc::new(AtomicUsize::new(0)),
                activate_calls: Arc::new(AtomicUsize::new(0)),
                invoke_calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn with_exit_code(exit_code: i32) -> Self {
            Self {
                exit_code,
                ..Self::new(FailAt::Nowhere)
            }
        }
    }

    #[async_trait]
    impl LaunchSequence for MockSequence {
        async fn prepare(&self) -> Result<PathBuf> {
            self.prepare_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == FailAt::Prepare {
                return Err(LauncherError::ProjectDirNotFoundError {
                    path: "/missing".to_string(),
                });
            }
            Ok(PathBuf::from("/project"))
        }

        async fn activate(&self, _project_dir: &Path) -> Result<ActivatedEnvironment> {
            self.activate_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == FailAt::Activate {
                return Err(LauncherError::EnvironmentNotFoundError {
                    name: "whisper".to_string(),
                    searched: "/opt/conda/envs/whisper".to_string(),
                });
            }
            Ok(ActivatedEnvironment {
                name: "whisper".to_string(),
                prefix: PathBuf::from("/opt/conda/envs/whisper"),
                path_prepend: vec![],
                vars: HashMap::new(),
            })
        }

        async fn invoke(
            &self,
            _project_dir: &Path,
            _environment: ActivatedEnvironment,
        ) -> Result<LaunchOutcome> {
            self.invoke_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == FailAt::Invoke {
                return Err(LauncherError::SpawnError {
                    program: "python".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            Ok(LaunchOutcome {
                exit_code: Some(self.exit_code),
                started_at: Local::now(),
                duration: Duration::from_millis(5),
            })
        }
    }

    struct CountingTerminal {
        holds: Arc<AtomicUsize>,
    }

    impl CountingTerminal {
        fn new() -> Self {
            Self {
                holds: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Terminal for CountingTerminal {
        async fn hold_open(&self) -> Result<()> {
            self.holds.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_successful_run_executes_every_stage_once_and_pauses() {
        let sequence = MockSequence::new(FailAt::Nowhere);
        let prepare = sequence.prepare_calls.clone();
        let activate = sequence.activate_calls.clone();
        let invoke = sequence.invoke_calls.clone();

        let terminal = CountingTerminal::new();
        let holds = terminal.holds.clone();

        let engine = LaunchEngine::new(sequence, terminal, true);
        let outcome = engine.run().await.unwrap();

        assert!(outcome.success());
        assert_eq!(prepare.load(Ordering::SeqCst), 1);
        assert_eq!(activate.load(Ordering::SeqCst), 1);
        assert_eq!(invoke.load(Ordering::SeqCst), 1);
        assert_eq!(holds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prepare_failure_skips_later_stages_but_still_pauses() {
        let sequence = MockSequence::new(FailAt::Prepare);
        let activate = sequence.activate_calls.clone();
        let invoke = sequence.invoke_calls.clone();

        let terminal = CountingTerminal::new();
        let holds = terminal.holds.clone();

        let engine = LaunchEngine::new(sequence, terminal, true);
        let result = engine.run().await;

        assert!(matches!(
            result,
            Err(LauncherError::ProjectDirNotFoundError { .. })
        ));
        assert_eq!(activate.load(Ordering::SeqCst), 0);
        assert_eq!(invoke.load(Ordering::SeqCst), 0);
        assert_eq!(holds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_activation_failure_skips_invoke_but_still_pauses() {
        let sequence = MockSequence::new(FailAt::Activate);
        let invoke = sequence.invoke_calls.clone();

        let terminal = CountingTerminal::new();
        let holds = terminal.holds.clone();

        let engine = LaunchEngine::new(sequence, terminal, true);
        let result = engine.run().await;

        assert!(matches!(
            result,
            Err(LauncherError::EnvironmentNotFoundError { .. })
        ));
        assert_eq!(invoke.load(Ordering::SeqCst), 0);
        assert_eq!(holds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spawn_failure_still_pauses() {
        let sequence = MockSequence::new(FailAt::Invoke);
        let terminal = CountingTerminal::new();
        let holds = terminal.holds.clone();

        let engine = LaunchEngine::new(sequence, terminal, true);
        let result = engine.run().await;

        assert!(matches!(result, Err(LauncherError::SpawnError { .. })));
        assert_eq!(holds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_nonzero_child_exit_is_not_an_error() {
        let sequence = MockSequence::with_exit_code(3);
        let terminal = CountingTerminal::new();
        let holds = terminal.holds.clone();

        let engine = LaunchEngine::new(sequence, terminal, true);
        let outcome = engine.run().await.unwrap();

        assert_eq!(outcome.exit_code, Some(3));
        assert!(!outcome.success());
        assert_eq!(holds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pause_disabled_skips_hold() {
        let sequence = MockSequence::new(FailAt::Nowhere);
        let terminal = CountingTerminal::new();
        let holds = terminal.holds.clone();

        let engine = LaunchEngine::new(sequence, terminal, false);
        engine.run().await.unwrap();

        assert_eq!(holds.load(Ordering::SeqCst), 0);
    }
}
