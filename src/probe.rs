// src/probe.rs

//! Process existence probing against the kernel process table.
//!
//! The probe is a point-in-time snapshot: the answer was true at some instant
//! during the call, nothing more. Per-PID read failures (a process exiting
//! mid-scan, permission denied) are treated as "no match for this PID", never
//! as errors.

use std::path::PathBuf;

use tracing::debug;

const PATH_PROC: &str = "/proc";

/// Answers "does a process whose command line contains this fragment exist?".
///
/// Implemented by [`ProcTableProbe`] in production; tests substitute scripted
/// probes.
pub trait ProcessProbe: Send {
    fn exists(&self, fragment: &str) -> bool;
}

/// Probe that scans the proc filesystem for numeric PID entries and
/// substring-matches the raw `cmdline` bytes of each one.
pub struct ProcTableProbe {
    root: PathBuf,
}

impl ProcTableProbe {
    pub fn new() -> Self {
        Self::with_root(PATH_PROC)
    }

    /// Probe rooted at an arbitrary directory (tests use a fabricated tree).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ProcTableProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for ProcTableProbe {
    fn exists(&self, fragment: &str) -> bool {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(root = ?self.root, error = %err, "process table unavailable");
                return false;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            // The PID may have exited between read_dir and here; an
            // unreadable entry is simply no match.
            match std::fs::read(entry.path().join("cmdline")) {
                Ok(cmdline) if contains_bytes(&cmdline, fragment.as_bytes()) => return true,
                _ => {}
            }
        }

        false
    }
}

/// Byte-level substring search. `cmdline` is NUL-separated raw bytes with no
/// UTF-8 guarantee, so the match happens on bytes, not strings.
fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fake_proc(entries: &[(&str, &[u8])]) -> tempfile::TempDir {
        let dir = tempdir().expect("tempdir");
        for (pid, cmdline) in entries {
            let pid_dir = dir.path().join(pid);
            fs::create_dir(&pid_dir).expect("pid dir");
            fs::write(pid_dir.join("cmdline"), cmdline).expect("cmdline");
        }
        dir
    }

    #[test]
    fn finds_fragment_in_cmdline_bytes() {
        let dir = fake_proc(&[
            ("1", b"/sbin/init\0"),
            ("612", b"/usr/sbin/sshd\0-D\0"),
        ]);
        let probe = ProcTableProbe::with_root(dir.path());
        assert!(probe.exists("sshd"));
        assert!(probe.exists("/usr/sbin/sshd"));
    }

    #[test]
    fn no_match_returns_false() {
        let dir = fake_proc(&[("1", b"/sbin/init\0")]);
        let probe = ProcTableProbe::with_root(dir.path());
        assert!(!probe.exists("sshd"));
    }

    #[test]
    fn non_numeric_entries_are_ignored() {
        let dir = fake_proc(&[("self", b"/usr/sbin/sshd\0"), ("1a2", b"/usr/sbin/sshd\0")]);
        let probe = ProcTableProbe::with_root(dir.path());
        assert!(!probe.exists("sshd"));
    }

    #[test]
    fn entry_without_cmdline_is_skipped() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("42")).expect("pid dir");
        let probe = ProcTableProbe::with_root(dir.path());
        assert!(!probe.exists("anything"));
    }

    #[test]
    fn missing_proc_root_reads_as_no_processes() {
        let probe = ProcTableProbe::with_root("/definitely/not/a/proc/root");
        assert!(!probe.exists("init"));
    }

    #[test]
    fn contains_bytes_edge_cases() {
        assert!(contains_bytes(b"abc", b""));
        assert!(contains_bytes(b"abc", b"abc"));
        assert!(!contains_bytes(b"ab", b"abc"));
        assert!(contains_bytes(b"xxabcxx", b"abc"));
    }
}
