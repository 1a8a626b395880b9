use crate::common::error::JuError;

/// juプロジェクト全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use ju::common::result::JuResult;
/// use ju::common::error::JuError;
///
/// fn example_function() -> JuResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> JuResult<()> {
///     Err(JuError::internal_error("Something went wrong"))
/// }
///
/// assert!(example_function().is_ok());
/// assert!(example_with_error().is_err());
/// ```
pub type JuResult<T> = Result<T, JuError>;

/// Resultのエラー変換ヘルパー
pub trait ResultExt<T, E> {
    /// ファイルシステムエラーとしてJuResultに変換
    ///
    /// # Examples
    ///
    /// ```
    /// use ju::common::result::{JuResult, ResultExt};
    ///
    /// let result: Result<String, std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::NotFound, "file not found"
    /// ));
    /// let ju_result: JuResult<String> = result.with_filesystem_error("Failed to read", None);
    /// assert!(ju_result.is_err());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> JuResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> JuResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| JuError::filesystem_error_with_source(message, path, e.into()))
    }
}

/// async関数用のヘルパー
pub mod async_helpers {
    use super::{JuError, JuResult};
    use std::future::Future;
    use std::time::Duration;

    /// タイムアウト付きasync実行
    ///
    /// タイムアウトが`None`の場合はそのまま完了まで待つ。
    pub async fn with_timeout<F, T>(f: F, timeout: Option<Duration>) -> JuResult<T>
    where
        F: Future<Output = JuResult<T>>,
    {
        let Some(duration) = timeout else {
            return f.await;
        };

        match tokio::time::timeout(duration, f).await {
            Ok(result) => result,
            Err(_) => Err(JuError::timeout(duration.as_secs())),
        }
    }
}
