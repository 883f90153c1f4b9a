//! Repository and commit resolution.
//!
//! Triggered builds name their mirrored repository `<site>_<owner>_<repo>`.
//! Manually submitted builds carry the repository in their own clone and
//! checkout steps, found by position (see [`StepLayout`]).

use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

use crate::build::types::{Build, BuildSource, BuildStep};
use crate::error::ResolutionError;

/// Positions of the clone and checkout steps in a manually submitted build.
///
/// This is a contract with the build config that produces those steps. A
/// change there needs a new layout here, not a looser parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepLayout {
    pub clone_step_index: usize,
    pub checkout_step_index: usize,
    /// Argument of the clone step holding the `git@` URL.
    pub url_arg_index: usize,
    /// Argument of the checkout step holding the commit SHA. Unless this is
    /// 0, the checkout step's first argument must be `checkout`.
    pub sha_arg_index: usize,
}

impl StepLayout {
    pub const V1: StepLayout = StepLayout {
        clone_step_index: 4,
        checkout_step_index: 5,
        url_arg_index: 1,
        sha_arg_index: 1,
    };

    const CHECKOUT_COMMAND: &'static str = "checkout";
}

impl Default for StepLayout {
    fn default() -> Self {
        Self::V1
    }
}

/// Repository identity and commit for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRepo {
    pub site: String,
    pub user: String,
    pub name: String,
    pub commit_sha: String,
}

impl ResolvedRepo {
    /// Every field is non-empty, owner and repo are single URL path
    /// segments, and the commit is a hex SHA.
    fn validated(self) -> Result<Self, ResolutionError> {
        for (field, value) in [
            ("site", &self.site),
            ("owner", &self.user),
            ("repo", &self.name),
            ("commit SHA", &self.commit_sha),
        ] {
            if value.is_empty() {
                return Err(ResolutionError::EmptySegment { field });
            }
        }

        for (field, value) in [("owner", &self.user), ("repo", &self.name)] {
            if !is_valid_repo_segment(value) {
                return Err(ResolutionError::InvalidSegment {
                    field,
                    value: value.clone(),
                });
            }
        }
        if !is_valid_commit_sha(&self.commit_sha) {
            return Err(ResolutionError::InvalidSegment {
                field: "commit SHA",
                value: self.commit_sha.clone(),
            });
        }

        Ok(self)
    }
}

/// GitHub owner and repository names: ASCII alphanumerics, `-`, `_` and `.`,
/// excluding `.` and `..`.
pub fn is_valid_repo_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Full or abbreviated hex commit SHA.
pub fn is_valid_commit_sha(value: &str) -> bool {
    !value.is_empty() && value.len() <= 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

fn repo_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*)_(.*)_(.*)$").expect("valid repo name regex"))
}

fn clone_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^git@(.+)\.com:(.+)/([^/]+)\.git$").expect("valid clone URL regex")
    })
}

/// Resolve the repository and commit a build was run against.
pub fn resolve(build: &Build, layout: &StepLayout) -> Result<ResolvedRepo, ResolutionError> {
    match build.build_source() {
        BuildSource::Structured { repo_name } => {
            let repo_name = repo_name.ok_or(ResolutionError::MissingRepoName)?;
            let (site, user, name) = parse_repo_name(repo_name)?;
            let commit_sha = build
                .resolved_commit_sha()
                .ok_or(ResolutionError::MissingCommitSha)?;

            ResolvedRepo {
                site,
                user,
                name,
                commit_sha: commit_sha.to_string(),
            }
            .validated()
        }
        BuildSource::Positional { steps } => resolve_from_steps(steps, layout),
    }
}

/// Split a mirrored repository name into site, owner and repo.
///
/// Matching is greedy from the left, so `github_acme_my_repo` yields site
/// `github_acme`. Such names are ambiguous and get a warning.
pub fn parse_repo_name(repo_name: &str) -> Result<(String, String, String), ResolutionError> {
    let caps = repo_name_regex()
        .captures(repo_name)
        .ok_or_else(|| ResolutionError::MalformedRepoName(repo_name.to_string()))?;

    if repo_name.matches('_').count() > 2 {
        warn!(
            "Ambiguous repoName {}: more than two underscores, using site {:?}",
            repo_name, &caps[1]
        );
    }

    Ok((caps[1].to_string(), caps[2].to_string(), caps[3].to_string()))
}

/// Split a `git@<site>.com:<owner>/<repo>.git` URL into site, owner and repo.
pub fn parse_clone_url(url: &str) -> Result<(String, String, String), ResolutionError> {
    let caps = clone_url_regex()
        .captures(url)
        .ok_or_else(|| ResolutionError::UnrecognizedCloneUrl(url.to_string()))?;

    Ok((caps[1].to_string(), caps[2].to_string(), caps[3].to_string()))
}

fn step_arg<'a>(
    steps: &'a [BuildStep],
    step: usize,
    arg: usize,
) -> Result<&'a str, ResolutionError> {
    steps
        .get(step)
        .ok_or(ResolutionError::MissingStep(step))?
        .args
        .get(arg)
        .map(String::as_str)
        .ok_or(ResolutionError::MissingArgument { step, arg })
}

fn resolve_from_steps(
    steps: &[BuildStep],
    layout: &StepLayout,
) -> Result<ResolvedRepo, ResolutionError> {
    let url = step_arg(steps, layout.clone_step_index, layout.url_arg_index)?;
    let commit_sha = step_arg(steps, layout.checkout_step_index, layout.sha_arg_index)?;

    if let Some(command) = steps[layout.checkout_step_index].args.first() {
        if layout.sha_arg_index > 0 && command != StepLayout::CHECKOUT_COMMAND {
            return Err(ResolutionError::LayoutMismatch {
                step: layout.checkout_step_index,
                expected: StepLayout::CHECKOUT_COMMAND.to_string(),
                found: command.clone(),
            });
        }
    }

    let (site, user, name) = parse_clone_url(url)?;

    ResolvedRepo {
        site,
        user,
        name,
        commit_sha: commit_sha.to_string(),
    }
    .validated()
}
