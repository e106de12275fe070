//! End-to-end message synthesis: status, classification, title, diffs,
//! explanation and composition.

use std::fmt;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::commit::diff::FileDiff;
use crate::commit::message::{CommitMessage, compose_message};
use crate::commit::prompt::build_explanation_prompt;
use crate::commit::rank::rank_significant;
use crate::commit::status::{ChangeSet, classify_status};
use crate::commit::title::compose_title;
use crate::config::{Config, Credential};
use crate::error::GenerationError;
use crate::git::VersionControl;
use crate::llm::TextGenerator;

/// Something the host should tell the user about a composed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// No API credential; the fixed default message was used.
    MissingCredential,
    /// The explanation could not be generated; the body fell back.
    ExplanationUnavailable(String),
    /// The status report could not be read; the fixed default message was used.
    PipelineFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingCredential => f.write_str(
                "No API credential configured; using the default commit message. \
                 Set COMMITSMITH_API_KEY or GEMINI_API_KEY for generated messages.",
            ),
            Notice::ExplanationUnavailable(reason) => {
                write!(f, "Explanation unavailable, using fallback body: {reason}")
            }
            Notice::PipelineFailed(reason) => {
                write!(f, "Could not analyze changes, using the default commit message: {reason}")
            }
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug)]
pub enum Outcome {
    /// The working tree has nothing to commit.
    NoChanges,
    Composed {
        message: CommitMessage,
        changes: ChangeSet,
        notice: Option<Notice>,
    },
}

/// Synthesize a commit message for the current state of `vcs`.
///
/// Never fails: every collaborator error degrades into a fallback message
/// plus a [`Notice`]. The generator call is bounded by `config.timeout`.
pub async fn generate_commit_message<V, G>(vcs: &V, generator: &G, config: &Config) -> Outcome
where
    V: VersionControl + ?Sized,
    G: TextGenerator + ?Sized,
{
    let report = match vcs.status().await {
        Ok(report) => report,
        Err(e) => {
            warn!("Status query failed: {e}");
            return Outcome::Composed {
                message: CommitMessage::fallback(),
                changes: ChangeSet::default(),
                notice: Some(Notice::PipelineFailed(e.to_string())),
            };
        }
    };

    let changes = classify_status(&report);
    if changes.is_empty() {
        debug!("No classifiable changes in status report");
        return Outcome::NoChanges;
    }
    debug!(
        "Classified {} added, {} modified, {} deleted",
        changes.added().len(),
        changes.modified().len(),
        changes.deleted().len()
    );

    if config.credential == Credential::Absent {
        debug!("No credential; skipping diff collection and generation");
        return Outcome::Composed {
            message: CommitMessage::fallback(),
            changes,
            notice: Some(Notice::MissingCredential),
        };
    }

    let ranked = rank_significant(&changes.flatten());
    let title = compose_title(&changes, &ranked);

    let diffs = collect_diffs(vcs, changes.modified()).await;
    let prompt = build_explanation_prompt(&diffs, &changes);

    let explanation = match timeout(config.timeout, generator.generate(&prompt)).await {
        Ok(result) => result,
        Err(_) => Err(GenerationError::Timeout(config.timeout.as_secs())),
    };
    let notice = explanation
        .as_ref()
        .err()
        .map(|e| Notice::ExplanationUnavailable(e.to_string()));

    let message = compose_message(&title, explanation, &diffs, config.mode);
    Outcome::Composed {
        message,
        changes,
        notice,
    }
}

/// Fetch each path's diff in order. Failures become placeholders.
async fn collect_diffs<V>(vcs: &V, paths: &[String]) -> Vec<FileDiff>
where
    V: VersionControl + ?Sized,
{
    let mut diffs = Vec::with_capacity(paths.len());
    for path in paths {
        match vcs.diff(path).await {
            Ok(text) => diffs.push(FileDiff::available(path.as_str(), text)),
            Err(e) => {
                warn!("Diff unavailable for {path}: {e}");
                diffs.push(FileDiff::unavailable(path.as_str()));
            }
        }
    }
    diffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::commit::message::{APOLOGY_BODY, ComposeMode};
    use crate::error::GitError;
    use crate::git::executor::MockVersionControl;
    use crate::llm::generator::MockTextGenerator;

    fn config_with_key() -> Config {
        Config {
            credential: Credential::Present("key".to_string()),
            ..Config::default()
        }
    }

    fn vcs_with_status(report: &'static str) -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        vcs.expect_status().returning(move || Ok(report.to_string()));
        vcs
    }

    #[tokio::test]
    async fn test_mixed_changes_compose_title_and_body() {
        let mut vcs = vcs_with_status("M  src/app.py\nA  README.md");
        vcs.expect_diff()
            .withf(|path| path == "src/app.py")
            .times(1)
            .returning(|_| Ok("+print('hi')\n".to_string()));

        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt| prompt.contains("File: src/app.py") && prompt.contains("- added: README.md"))
            .times(1)
            .returning(|_| Ok("Greets the user on startup.".to_string()));

        let outcome = generate_commit_message(&vcs, &generator, &config_with_key()).await;
        let Outcome::Composed { message, changes, notice } = outcome else {
            panic!("Expected a composed message");
        };
        assert_eq!(message.short_message(), "✨ Enhancement: ✨ README.md, 📝 app.py");
        assert_eq!(message.detailed_message(), "Greets the user on startup.");
        assert_eq!(changes.len(), 2);
        assert!(notice.is_none());
    }

    #[tokio::test]
    async fn test_clean_tree_is_no_changes() {
        let vcs = vcs_with_status("");
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let outcome = generate_commit_message(&vcs, &generator, &config_with_key()).await;
        assert!(matches!(outcome, Outcome::NoChanges));
    }

    #[tokio::test]
    async fn test_missing_credential_skips_diffs_and_generation() {
        let mut vcs = vcs_with_status("D  old.txt");
        vcs.expect_diff().never();
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let outcome = generate_commit_message(&vcs, &generator, &Config::default()).await;
        let Outcome::Composed { message, notice, .. } = outcome else {
            panic!("Expected a composed message");
        };
        assert_eq!(message, CommitMessage::fallback());
        assert_eq!(notice, Some(Notice::MissingCredential));
    }

    #[tokio::test]
    async fn test_status_failure_uses_default_message() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_status().returning(|| {
            Err(GitError::NonZeroExit {
                operation: "status".to_string(),
                code: 128,
                stderr: "fatal: not a git repository".to_string(),
            })
        });
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let outcome = generate_commit_message(&vcs, &generator, &config_with_key()).await;
        let Outcome::Composed { message, notice, .. } = outcome else {
            panic!("Expected a composed message");
        };
        assert_eq!(message, CommitMessage::fallback());
        assert!(matches!(notice, Some(Notice::PipelineFailed(reason)) if reason.contains("not a git repository")));
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_title() {
        let mut vcs = vcs_with_status("M  src/main.rs");
        vcs.expect_diff().returning(|_| Ok("-old\n+new\n".to_string()));
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_| Err(GenerationError::EmptyResponse));

        let outcome = generate_commit_message(&vcs, &generator, &config_with_key()).await;
        let Outcome::Composed { message, notice, .. } = outcome else {
            panic!("Expected a composed message");
        };
        assert_eq!(message.short_message(), "🔧 Update: 📝 main.rs");
        assert_eq!(message.detailed_message(), APOLOGY_BODY);
        assert!(matches!(notice, Some(Notice::ExplanationUnavailable(_))));
    }

    #[tokio::test]
    async fn test_diff_failure_becomes_placeholder() {
        let mut vcs = vcs_with_status("M  a.rs\nM  b.rs");
        vcs.expect_diff().withf(|path| path == "a.rs").returning(|_| {
            Err(GitError::Timeout {
                operation: "diff".to_string(),
                secs: 60,
            })
        });
        vcs.expect_diff()
            .withf(|path| path == "b.rs")
            .returning(|_| Ok("+fn b() {}\n".to_string()));
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().returning(|_| Ok("Adds b.".to_string()));

        let config = Config {
            mode: ComposeMode::Evidence,
            ..config_with_key()
        };
        let outcome = generate_commit_message(&vcs, &generator, &config).await;
        let Outcome::Composed { message, notice, .. } = outcome else {
            panic!("Expected a composed message");
        };
        let body = message.detailed_message();
        assert!(body.starts_with("Adds b.\n\n"));
        assert!(body.contains("a.rs:\n```diff\ndiff unavailable\n```"));
        assert!(body.contains("b.rs (+1/-0):\n```diff\n+fn b() {}\n```"));
        assert!(body.find("a.rs:").unwrap() < body.find("b.rs (").unwrap());
        assert!(notice.is_none());
    }

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_timeout_falls_back() {
        let mut vcs = vcs_with_status("A  notes.md");
        vcs.expect_diff().never();

        let config = Config {
            timeout: Duration::from_secs(5),
            ..config_with_key()
        };
        let outcome = generate_commit_message(&vcs, &SlowGenerator, &config).await;
        let Outcome::Composed { message, notice, .. } = outcome else {
            panic!("Expected a composed message");
        };
        assert_eq!(message.short_message(), "✨ Update: ✨ notes.md");
        assert_eq!(message.detailed_message(), APOLOGY_BODY);
        assert!(matches!(notice, Some(Notice::ExplanationUnavailable(reason)) if reason.contains("5 seconds")));
    }
}
