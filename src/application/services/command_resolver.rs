use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// コマンド解決のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// 前方一致するコマンドが無い
    #[error("No such command '{0}'")]
    CommandNotFound(String),

    /// 複数のコマンドが前方一致した（候補はソート済み）
    #[error("Too many matches: {}", .candidates.join(", "))]
    AmbiguousCommand {
        token: String,
        candidates: Vec<String>,
    },

    /// エイリアスの参照先が登録されていない
    #[error("Could not load command '{name}': {reason}")]
    CommandLoadError { name: String, reason: String },
}

/// 登録済みコマンドの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Branch,
    Clone,
    Commit,
    Config,
    Diff,
    Done,
    Push,
    Status,
    Update,
}

impl CommandKind {
    /// 呼び出し名
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Branch => "branch",
            CommandKind::Clone => "clone",
            CommandKind::Commit => "commit",
            CommandKind::Config => "config",
            CommandKind::Diff => "diff",
            CommandKind::Done => "done",
            CommandKind::Push => "push",
            CommandKind::Status => "status",
            CommandKind::Update => "update",
        }
    }

    /// ヘルプに表示する短い説明
    pub fn about(&self) -> &'static str {
        match self {
            CommandKind::Branch => "Set or show the branch name",
            CommandKind::Clone => "Clone the configured repositories",
            CommandKind::Commit => "Commit outstanding changes",
            CommandKind::Config => "Show or edit the config file",
            CommandKind::Diff => "Show changes in the working copies",
            CommandKind::Done => "Commit, push and move the issue to review",
            CommandKind::Push => "Push changes to the remote",
            CommandKind::Status => "Show changed files",
            CommandKind::Update => "Update working copies to a branch",
        }
    }

    /// 設定された全リポジトリに対して実行されるか
    pub fn is_repository_scoped(&self) -> bool {
        !matches!(self, CommandKind::Config)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 静的なコマンド一覧
///
/// 実行時のファイル探索は行わず、ビルド時に確定したコマンドのみを扱う。
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: Vec<CommandKind>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommandRegistry {
    /// 組み込みコマンドのレジストリを作成
    pub fn builtin() -> Self {
        Self::new(vec![
            CommandKind::Branch,
            CommandKind::Clone,
            CommandKind::Commit,
            CommandKind::Config,
            CommandKind::Diff,
            CommandKind::Done,
            CommandKind::Push,
            CommandKind::Status,
            CommandKind::Update,
        ])
    }

    /// 任意のコマンド集合からレジストリを作成
    pub fn new(mut commands: Vec<CommandKind>) -> Self {
        commands.sort_by_key(|kind| kind.name());
        commands.dedup();
        Self { commands }
    }

    /// 登録済みコマンド（名前順）
    pub fn commands(&self) -> &[CommandKind] {
        &self.commands
    }

    /// 登録済みコマンド名（名前順）
    pub fn names(&self) -> Vec<&'static str> {
        self.commands.iter().map(|kind| kind.name()).collect()
    }

    /// 完全一致でコマンドを取得
    pub fn get(&self, name: &str) -> Option<CommandKind> {
        self.commands.iter().copied().find(|kind| kind.name() == name)
    }

    /// 呼び出し名からコマンドを解決
    pub fn resolve(
        &self,
        token: &str,
        aliases: &HashMap<String, String>,
    ) -> Result<CommandKind, ResolveError> {
        let name = resolve_name(token, self.names(), aliases)?;
        self.get(&name)
            .ok_or_else(|| ResolveError::CommandNotFound(name.clone()))
    }
}

/// 呼び出し名を実際のコマンド名に解決する
///
/// 1. `token`がエイリアスのキーに完全一致すれば、その参照先をコマンド名として
///    そのまま引く（エイリアスの再解決や前方一致は行わない）。
/// 2. それ以外は大文字小文字を区別せず前方一致するコマンドを探す。
///    0件なら`CommandNotFound`、2件以上なら`AmbiguousCommand`。
///
/// 毎回評価される純粋関数で、キャッシュは持たない。
pub fn resolve_name<'a, I>(
    token: &str,
    available: I,
    aliases: &HashMap<String, String>,
) -> Result<String, ResolveError>
where
    I: IntoIterator<Item = &'a str>,
{
    let available: Vec<&str> = available.into_iter().collect();

    if let Some(target) = aliases.get(token) {
        debug!("Alias '{}' -> '{}'", token, target);
        return if available.contains(&target.as_str()) {
            Ok(target.clone())
        } else {
            Err(ResolveError::CommandLoadError {
                name: target.clone(),
                reason: format!("alias '{}' points to an unknown command", token),
            })
        };
    }

    let needle = token.to_lowercase();
    let mut matches: Vec<String> = available
        .iter()
        .filter(|name| name.to_lowercase().starts_with(&needle))
        .map(|name| name.to_string())
        .collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => Err(ResolveError::CommandNotFound(token.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(ResolveError::AmbiguousCommand {
            token: token.to_string(),
            candidates: matches,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn aliases(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_alias_resolves_to_target() {
        let result = resolve_name("st", ["status", "start"], &aliases(&[("st", "status")]));
        assert_eq!(result, Ok("status".to_string()));
    }

    #[test]
    fn test_alias_takes_precedence_over_prefix() {
        // "sta" は status と start の両方に前方一致するが、エイリアスが優先される
        let result = resolve_name("sta", ["status", "start"], &aliases(&[("sta", "start")]));
        assert_eq!(result, Ok("start".to_string()));

        // エイリアスが登録済みコマンド名を上書きする
        let result = resolve_name("status", ["status", "start"], &aliases(&[("status", "start")]));
        assert_eq!(result, Ok("start".to_string()));
    }

    #[test]
    fn test_alias_target_is_not_abbreviated_or_chained() {
        let result = resolve_name("s", ["status"], &aliases(&[("s", "stat")]));
        assert!(matches!(result, Err(ResolveError::CommandLoadError { name, .. }) if name == "stat"));

        let chained = aliases(&[("a", "b"), ("b", "status")]);
        let result = resolve_name("a", ["status"], &chained);
        assert!(matches!(result, Err(ResolveError::CommandLoadError { name, .. }) if name == "b"));
    }

    #[test]
    fn test_alias_keys_are_case_sensitive() {
        // "ST" はエイリアスに一致しないので前方一致にフォールバックする
        let result = resolve_name("ST", ["status", "start"], &aliases(&[("st", "status")]));
        assert_eq!(
            result,
            Err(ResolveError::AmbiguousCommand {
                token: "ST".to_string(),
                candidates: vec!["start".to_string(), "status".to_string()],
            })
        );
    }

    #[test]
    fn test_unique_prefix_resolves() {
        let available = ["branch", "commit", "diff", "push", "status"];
        assert_eq!(resolve_name("di", available, &HashMap::new()), Ok("diff".to_string()));
        assert_eq!(resolve_name("STAT", available, &HashMap::new()), Ok("status".to_string()));
        assert_eq!(resolve_name("push", available, &HashMap::new()), Ok("push".to_string()));
    }

    #[test]
    fn test_every_unique_prefix_of_every_command_resolves() {
        let registry = CommandRegistry::builtin();
        let names = registry.names();

        for name in &names {
            for end in 1..=name.len() {
                let prefix = &name[..end];
                let matching = names.iter().filter(|n| n.starts_with(prefix)).count();
                let result = resolve_name(prefix, names.iter().copied(), &HashMap::new());
                if matching == 1 {
                    assert_eq!(result, Ok(name.to_string()), "prefix {}", prefix);
                } else {
                    assert!(
                        matches!(result, Err(ResolveError::AmbiguousCommand { .. })),
                        "prefix {}",
                        prefix
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_match_is_command_not_found() {
        let result = resolve_name("frob", ["status", "diff"], &HashMap::new());
        assert_eq!(result, Err(ResolveError::CommandNotFound("frob".to_string())));

        let result = resolve_name("x", Vec::<&str>::new(), &HashMap::new());
        assert_eq!(result, Err(ResolveError::CommandNotFound("x".to_string())));
    }

    #[test]
    fn test_multiple_matches_are_ambiguous_and_sorted() {
        let result = resolve_name("st", ["status", "start"], &HashMap::new());
        match result {
            Err(error @ ResolveError::AmbiguousCommand { .. }) => {
                assert_eq!(error.to_string(), "Too many matches: start, status");
                if let ResolveError::AmbiguousCommand { candidates, .. } = error {
                    assert_eq!(candidates, vec!["start", "status"]);
                }
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_token_matches_everything() {
        let result = resolve_name("", ["b", "a"], &HashMap::new());
        assert!(matches!(
            result,
            Err(ResolveError::AmbiguousCommand { candidates, .. }) if candidates == vec!["a", "b"]
        ));
    }

    #[test]
    fn test_registry_contents() {
        let registry = CommandRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec![
                "branch", "clone", "commit", "config", "diff", "done", "push", "status", "update"
            ]
        );
        assert_eq!(registry.get("diff"), Some(CommandKind::Diff));
        assert_eq!(registry.get("dif"), None);
        assert!(!CommandKind::Config.is_repository_scoped());
        assert!(CommandKind::Status.is_repository_scoped());
    }

    #[test]
    fn test_registry_resolve() {
        let registry = CommandRegistry::builtin();
        let aliases = aliases(&[("ci", "commit"), ("br", "branches")]);

        assert_eq!(registry.resolve("ci", &aliases), Ok(CommandKind::Commit));
        assert_eq!(registry.resolve("st", &aliases), Ok(CommandKind::Status));
        assert_eq!(registry.resolve("u", &aliases), Ok(CommandKind::Update));
        assert!(matches!(
            registry.resolve("co", &aliases),
            Err(ResolveError::AmbiguousCommand { candidates, .. })
                if candidates == vec!["commit", "config"]
        ));
        assert!(matches!(
            registry.resolve("d", &aliases),
            Err(ResolveError::AmbiguousCommand { candidates, .. })
                if candidates == vec!["diff", "done"]
        ));
        assert!(matches!(
            registry.resolve("br", &aliases),
            Err(ResolveError::CommandLoadError { .. })
        ));
        assert!(matches!(
            registry.resolve("zz", &aliases),
            Err(ResolveError::CommandNotFound(_))
        ));
    }
}
