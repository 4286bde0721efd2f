//! Backend implementation over the `git` binary.
//!
//! Every capability shells out to git plumbing. Queries capture output;
//! mutating replay operations inherit the terminal so git's own progress and
//! conflict messages reach the operator unfiltered.

use crate::backend::{Backend, CommitWalk};
use crate::error::{Error, Result};
use crate::types::{Commit, Identity, LogLine, ReplayStatus};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::debug;

/// Field separator within one commit record (ASCII unit separator).
const FIELD_SEP: char = '\u{1f}';

/// Record separator between commits (ASCII record separator).
const RECORD_SEP: u8 = 0x1e;

/// `git log` format producing one machine-parseable record per commit:
/// id, parents, author name, author email, author date, full message.
const COMMIT_FORMAT: &str = "%H%x1f%P%x1f%an%x1f%ae%x1f%aI%x1f%B%x1e";

/// A [`Backend`] that drives the `git` binary found on `$PATH`.
pub struct GitBackend {
    work_dir: PathBuf,
}

impl GitBackend {
    /// Open the repository containing `path`.
    ///
    /// Resolves the work tree root via `git rev-parse --show-toplevel`; all
    /// subsequent commands run from there.
    pub fn discover(path: &Path) -> Result<Self> {
        let output = Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(path)
            .output()?;

        if !output.status.success() {
            return Err(Error::Backend(format!(
                "not a git repository: {}",
                path.display()
            )));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Self {
            work_dir: PathBuf::from(root),
        })
    }

    /// Root of the work tree this backend operates on.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run git with captured output. Fails only on spawn errors; callers
    /// inspect the exit status themselves.
    fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        debug!(?args, "running git");
        Ok(Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .output()?)
    }

    /// Run git and require success, returning trimmed stdout.
    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
        } else {
            Err(Error::Backend(format!(
                "`git {}` failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    /// Run a mutating git command with inherited stdio, mapping the exit
    /// status to a [`ReplayStatus`].
    fn run_replay(&self, args: &[&str]) -> Result<ReplayStatus> {
        debug!(?args, "running git (replay)");
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.work_dir)
            .status()?;

        if status.success() {
            Ok(ReplayStatus::Applied)
        } else {
            Ok(ReplayStatus::Conflict(status.code().unwrap_or(1)))
        }
    }

    /// Collect every value of a multi-valued config key. A missing key is an
    /// empty set, not an error.
    fn config_values(&self, key: &str) -> Result<BTreeSet<String>> {
        let output = self.run(&["config", "--get-all", key])?;
        if !output.status.success() {
            return Ok(BTreeSet::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }

    /// Path of a file inside the git directory (handles worktrees).
    fn git_path(&self, name: &str) -> Result<PathBuf> {
        let rel = self.run_checked(&["rev-parse", "--git-path", name])?;
        let path = PathBuf::from(&rel);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.work_dir.join(path))
        }
    }
}

/// Parse one `COMMIT_FORMAT` record (without its record separator).
fn parse_commit_record(record: &str) -> Result<Commit> {
    let mut fields = record.splitn(6, FIELD_SEP);
    let mut next = |name: &str| {
        fields
            .next()
            .ok_or_else(|| Error::Backend(format!("malformed commit record: missing {name}")))
    };

    let id = next("id")?.trim().to_string();
    let parents: Vec<String> = next("parents")?
        .split_whitespace()
        .map(String::from)
        .collect();
    let author_name = next("author name")?.to_string();
    let author_email = next("author email")?.to_string();
    let authored_at = DateTime::parse_from_rfc3339(next("author date")?.trim())
        .map_err(|e| Error::Backend(format!("unparseable author date: {e}")))?
        .with_timezone(&Utc);
    let message = next("message")?.trim_end_matches('\n').to_string();
    let summary = message.lines().next().unwrap_or_default().to_string();

    Ok(Commit {
        id,
        author_name,
        author_email,
        authored_at,
        parents,
        summary,
        message,
    })
}

/// Streaming iterator over a `git log` child process.
///
/// Records are read on demand, so a caller that stops consuming early never
/// pays for the rest of the history. Dropping the walk reaps the child.
struct GitWalk {
    child: Child,
    reader: BufReader<ChildStdout>,
    done: bool,
}

impl GitWalk {
    fn spawn(work_dir: &Path, range: &str) -> Result<Self> {
        let format_arg = format!("--format={COMMIT_FORMAT}");
        let args = ["log", "--topo-order", format_arg.as_str(), range];
        debug!(?args, "spawning git walk");
        let mut child = Command::new("git")
            .args(args)
            .current_dir(work_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Internal("git log stdout not captured".to_string()))?;

        Ok(Self {
            child,
            reader: BufReader::new(stdout),
            done: false,
        })
    }
}

impl Iterator for GitWalk {
    type Item = Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = Vec::new();
        match self.reader.read_until(RECORD_SEP, &mut buf) {
            Ok(0) => self.finish(),
            Ok(_) => {
                if buf.last() == Some(&RECORD_SEP) {
                    buf.pop();
                }
                let record = String::from_utf8_lossy(&buf);
                let record = record.trim_matches('\n');
                if record.is_empty() {
                    // Trailing newline after the last record.
                    return self.finish();
                }
                Some(parse_commit_record(record))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl GitWalk {
    /// End of stream: reap the child and surface a walk-level failure (e.g.
    /// an unknown ref) that only shows up in the exit status.
    fn finish(&mut self) -> Option<Result<Commit>> {
        if self.done {
            return None;
        }
        self.done = true;
        match self.child.wait() {
            Ok(status) if status.success() => None,
            Ok(status) => Some(Err(Error::Backend(format!(
                "git log exited with status {status}"
            )))),
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl Drop for GitWalk {
    fn drop(&mut self) {
        if !self.done {
            // Abandoned early: stop the child instead of draining history.
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

impl Backend for GitBackend {
    fn resolve_ref(&self, name: &str) -> Result<Commit> {
        let output = self.run(&["rev-parse", "--verify", "--quiet", &format!("{name}^{{commit}}")])?;
        if !output.status.success() {
            return Err(Error::InvalidRef(name.to_string()));
        }
        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();

        let record = self.run_checked(&[
            "log",
            "-1",
            &format!("--format={COMMIT_FORMAT}"),
            &id,
            "--",
        ])?;
        parse_commit_record(record.trim_end_matches(RECORD_SEP as char).trim_matches('\n'))
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        let output = self.run(&["merge-base", a, b])?;
        if output.status.success() {
            Ok(Some(
                String::from_utf8_lossy(&output.stdout).trim().to_string(),
            ))
        } else if output.status.code() == Some(1) {
            // Exit 1 means "no common ancestor"; anything else is a failure.
            Ok(None)
        } else {
            Err(Error::Backend(format!(
                "git merge-base failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }

    fn walk_ancestors(&self, start: &str, stop_before: Option<&str>) -> Result<CommitWalk<'_>> {
        let range = stop_before.map_or_else(
            || start.to_string(),
            |base| format!("{base}..{start}"),
        );
        Ok(Box::new(GitWalk::spawn(&self.work_dir, &range)?))
    }

    fn identity(&self) -> Result<Identity> {
        Ok(Identity {
            names: self.config_values("user.name")?,
            emails: self.config_values("user.email")?,
        })
    }

    fn log_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<Vec<LogLine>> {
        let range = format!("{from_exclusive}..{to_inclusive}");
        let text = self.run_checked(&["log", "--topo-order", "--format=%H%x1f%s", &range])?;
        text.lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                let (id, subject) = line.split_once(FIELD_SEP).ok_or_else(|| {
                    Error::Backend(format!("malformed log line: {line:?}"))
                })?;
                Ok(LogLine {
                    id: id.to_string(),
                    subject: subject.to_string(),
                })
            })
            .collect()
    }

    fn diff_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<String> {
        self.run_checked(&["diff", from_exclusive, to_inclusive])
    }

    fn graph_range(&self, from_exclusive: &str, to_inclusive: &str) -> Result<String> {
        let range = format!("{from_exclusive}..{to_inclusive}");
        self.run_checked(&["log", "--graph", "--oneline", &range])
    }

    fn apply_single_parent(&self, commit_id: &str, commit_directly: bool) -> Result<ReplayStatus> {
        let mut args = vec!["cherry-pick", "-x"];
        if !commit_directly {
            args.push("--no-commit");
        }
        args.push(commit_id);
        self.run_replay(&args)
    }

    fn apply_with_mainline(
        &self,
        commit_id: &str,
        mainline: usize,
        commit_directly: bool,
    ) -> Result<ReplayStatus> {
        let mainline = mainline.to_string();
        let mut args = vec!["cherry-pick", "-x", "-m", mainline.as_str()];
        if !commit_directly {
            args.push("--no-commit");
        }
        args.push(commit_id);
        self.run_replay(&args)
    }

    fn read_head_message(&self) -> Result<String> {
        self.run_checked(&["log", "-1", "--format=%B", "HEAD"])
    }

    fn amend_head_message(&self, message: &str) -> Result<()> {
        debug!("amending HEAD message");
        let mut child = Command::new("git")
            .args(["commit", "--amend", "-F", "-"])
            .current_dir(&self.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        child
            .stdin
            .take()
            .ok_or_else(|| Error::Internal("git commit stdin not captured".to_string()))?
            .write_all(message.as_bytes())?;

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Backend(format!(
                "git commit --amend failed: {}",
                stderr.trim()
            )))
        }
    }

    fn append_pending_merge_message(&self, text: &str) -> Result<()> {
        let path = self.git_path("MERGE_MSG")?;
        debug!(path = %path.display(), "appending to pending merge message");
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}
