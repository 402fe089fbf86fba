//! Producers of recursive directory diffs

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Captured result of one directory comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit status; 0 means the trees are identical.
    pub status: i32,
}

impl DiffOutput {
    /// Whether the comparison found nothing at all.
    pub fn is_identical(&self) -> bool {
        self.status == 0 && self.stdout.is_empty()
    }
}

/// Produces `diff -urN <local> <upstream>` output for two directories.
pub trait DiffRunner {
    fn diff(&self, local: &Path, upstream: &Path) -> Result<DiffOutput>;
}

/// Runs the system `diff` executable.
///
/// Output is decoded lossily; the process runs to completion without a
/// timeout.
#[derive(Debug, Clone)]
pub struct SystemDiff {
    program: String,
}

impl Default for SystemDiff {
    fn default() -> Self {
        Self {
            program: "diff".to_string(),
        }
    }
}

impl SystemDiff {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DiffRunner for SystemDiff {
    fn diff(&self, local: &Path, upstream: &Path) -> Result<DiffOutput> {
        let output = Command::new(&self.program)
            .arg("-urN")
            .arg(local)
            .arg(upstream)
            .output()
            .map_err(|source| Error::DiffSpawn {
                program: self.program.clone(),
                source,
            })?;

        let status = output.status.code().unwrap_or(-1);
        tracing::debug!(
            local = %local.display(),
            upstream = %upstream.display(),
            status,
            "diff finished"
        );

        Ok(DiffOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status,
        })
    }
}

/// Compares directories in-process.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDiff;

impl DiffRunner for BuiltinDiff {
    fn diff(&self, local: &Path, upstream: &Path) -> Result<DiffOutput> {
        let diff = corepkgs_patch::diff_directories(local, upstream)?;
        Ok(DiffOutput {
            status: i32::from(diff.has_differences),
            stdout: diff.output,
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corepkgs_test_utils::TreeFixture;

    #[test]
    fn test_builtin_identical() {
        let fixture = TreeFixture::new()
            .with_local("x/a.nix", "same")
            .with_upstream("x/a.nix", "same");
        let out = BuiltinDiff
            .diff(&fixture.local().join("x"), &fixture.upstream().join("x"))
            .unwrap();
        assert!(out.is_identical());
    }

    #[test]
    fn test_builtin_reports_status_one() {
        let fixture = TreeFixture::new()
            .with_local("x/a.nix", "old\n")
            .with_upstream("x/a.nix", "new\n");
        let out = BuiltinDiff
            .diff(&fixture.local().join("x"), &fixture.upstream().join("x"))
            .unwrap();
        assert_eq!(out.status, 1);
        assert!(out.stdout.contains("-old\n+new\n"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let fixture = TreeFixture::new();
        let err = SystemDiff::new("corepkgs-no-such-diff")
            .diff(&fixture.local(), &fixture.upstream())
            .unwrap_err();
        assert!(matches!(err, Error::DiffSpawn { .. }));
    }
}
