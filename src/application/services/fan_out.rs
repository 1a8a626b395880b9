use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::common::result::async_helpers::with_timeout;
use crate::domain::entities::{Configuration, Repository};

/// リポジトリ単位で実行される処理
///
/// サブコマンドの引数はハンドラ自身が保持する。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryHandler: Send + Sync {
    /// 1つのリポジトリに対して処理を実行
    async fn handle(&self, config: &Configuration, repository: &Repository)
        -> anyhow::Result<()>;
}

/// 実行状況の通知先
pub trait ExecutionReporter: Send + Sync {
    /// ハンドラ呼び出しの直前
    fn repository_started(&self, repository: &Repository);

    /// `verbose` のときだけ、開始直後にリポジトリの詳細を通知
    fn repository_details(&self, _repository: &Repository) {}

    /// ハンドラが成功した
    fn repository_succeeded(&self, repository: &Repository);

    /// ハンドラが失敗した（タイムアウトを含む）
    fn repository_failed(&self, repository: &Repository, error: &anyhow::Error);
}

/// 何も出力しないレポーター
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ExecutionReporter for SilentReporter {
    fn repository_started(&self, _repository: &Repository) {}
    fn repository_succeeded(&self, _repository: &Repository) {}
    fn repository_failed(&self, _repository: &Repository, _error: &anyhow::Error) {}
}

/// 設定された全リポジトリに対してハンドラを順番に実行する
///
/// 1つのリポジトリでの失敗は報告された上で握りつぶされ、次のリポジトリに進む。
/// ロールバックやリトライは行わない。
pub struct FanOutExecutor {
    reporter: Arc<dyn ExecutionReporter>,
}

impl FanOutExecutor {
    /// 新しいFanOutExecutorを作成
    pub fn new(reporter: Arc<dyn ExecutionReporter>) -> Self {
        Self { reporter }
    }

    /// 宣言順に全リポジトリでハンドラを実行
    pub async fn run_for_all(&self, handler: &dyn RepositoryHandler, config: &Configuration) {
        if config.repositories.is_empty() {
            debug!("No repositories configured");
            return;
        }

        for repository in &config.repositories {
            self.reporter.repository_started(repository);
            if config.verbose {
                self.reporter.repository_details(repository);
            }

            let outcome = with_timeout(
                async { Ok(handler.handle(config, repository).await) },
                config.timeout,
            )
            .await
            .unwrap_or_else(|timeout| Err(anyhow::Error::new(timeout)));

            match outcome {
                Ok(()) => {
                    debug!("Repository '{}' finished", repository.name);
                    self.reporter.repository_succeeded(repository);
                }
                Err(error) => {
                    debug!("Repository '{}' failed: {:#}", repository.name, error);
                    self.reporter.repository_failed(repository, &error);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::time::Duration;

    /// 通知内容を記録するレポーター
    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ExecutionReporter for RecordingReporter {
        fn repository_started(&self, repository: &Repository) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start {}", repository.name));
        }

        fn repository_details(&self, repository: &Repository) {
            self.events
                .lock()
                .unwrap()
                .push(format!("details {}", repository.name));
        }

        fn repository_succeeded(&self, repository: &Repository) {
            self.events
                .lock()
                .unwrap()
                .push(format!("ok {}", repository.name));
        }

        fn repository_failed(&self, repository: &Repository, error: &anyhow::Error) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error {}: {}", repository.name, error));
        }
    }

    fn config_with(names: &[&str]) -> Configuration {
        names.iter().fold(Configuration::new("/c"), |config, name| {
            config.with_repository(Repository::new(*name, format!("/work/{}", name)))
        })
    }

    #[tokio::test]
    async fn test_handler_called_once_per_repository_in_order() {
        let config = config_with(&["a", "b", "c"]);
        let mut handler = MockRepositoryHandler::new();
        let mut sequence = Sequence::new();

        for name in ["a", "b", "c"] {
            handler
                .expect_handle()
                .withf(move |_, repository| repository.name == name)
                .times(1)
                .in_sequence(&mut sequence)
                .returning(|_, _| Ok(()));
        }

        let executor = FanOutExecutor::new(Arc::new(SilentReporter));
        executor.run_for_all(&handler, &config).await;
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let config = config_with(&["a", "b", "c"]);
        let mut handler = MockRepositoryHandler::new();
        handler
            .expect_handle()
            .times(3)
            .returning(|_, _| Err(anyhow::anyhow!("boom")));

        let reporter = Arc::new(RecordingReporter::default());
        let executor = FanOutExecutor::new(reporter.clone());
        executor.run_for_all(&handler, &config).await;

        let failures = reporter
            .events()
            .into_iter()
            .filter(|event| event.starts_with("error"))
            .count();
        assert_eq!(failures, 3);
    }

    #[tokio::test]
    async fn test_empty_repository_list_invokes_nothing() {
        let config = Configuration::new("/c");
        let mut handler = MockRepositoryHandler::new();
        handler.expect_handle().times(0);

        let reporter = Arc::new(RecordingReporter::default());
        let executor = FanOutExecutor::new(reporter.clone());
        executor.run_for_all(&handler, &config).await;

        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_failure_on_second_of_three_repositories() {
        let config = config_with(&["r1", "r2", "r3"]);
        let mut handler = MockRepositoryHandler::new();
        handler.expect_handle().times(3).returning(|_, repository| {
            if repository.name == "r2" {
                Err(anyhow::anyhow!("push rejected"))
            } else {
                Ok(())
            }
        });

        let reporter = Arc::new(RecordingReporter::default());
        let executor = FanOutExecutor::new(reporter.clone());
        executor.run_for_all(&handler, &config).await;

        assert_eq!(
            reporter.events(),
            vec![
                "start r1",
                "ok r1",
                "start r2",
                "error r2: push rejected",
                "start r3",
                "ok r3",
            ]
        );
    }

    #[tokio::test]
    async fn test_details_reported_only_when_verbose() {
        let mut handler = MockRepositoryHandler::new();
        handler.expect_handle().times(2).returning(|_, _| Ok(()));

        let quiet = Arc::new(RecordingReporter::default());
        FanOutExecutor::new(quiet.clone())
            .run_for_all(&handler, &config_with(&["a"]))
            .await;
        assert_eq!(quiet.events(), vec!["start a", "ok a"]);

        let verbose = Arc::new(RecordingReporter::default());
        FanOutExecutor::new(verbose.clone())
            .run_for_all(&handler, &config_with(&["a"]).with_verbose(true))
            .await;
        assert_eq!(verbose.events(), vec!["start a", "details a", "ok a"]);
    }

    struct SlowHandler;

    #[async_trait]
    impl RepositoryHandler for SlowHandler {
        async fn handle(&self, _config: &Configuration, repository: &Repository) -> anyhow::Result<()> {
            if repository.name == "slow" {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_reported_as_failure() {
        let config = config_with(&["slow", "fast"]).with_timeout(Duration::from_secs(1));

        let reporter = Arc::new(RecordingReporter::default());
        let executor = FanOutExecutor::new(reporter.clone());
        executor.run_for_all(&SlowHandler, &config).await;

        assert_eq!(
            reporter.events(),
            vec![
                "start slow",
                "error slow: Operation timed out after 1 seconds",
                "start fast",
                "ok fast",
            ]
        );
    }
}
