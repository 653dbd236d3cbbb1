//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries
//! (domain → application → infra/commands/output) are maintained.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Read a file and strip comment lines to avoid false positives.
fn read_non_comment_lines(path: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| {
            let trimmed = l.trim();
            !trimmed.starts_with("//") && !trimmed.starts_with("/*") && !trimmed.starts_with('*')
        })
        .map(String::from)
        .collect()
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

fn src_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

fn relative(file: &Path) -> String {
    file.strip_prefix(env!("CARGO_MANIFEST_DIR"))
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Non-test, non-comment lines of every file under `dir` containing any of
/// `needles`.
fn find_in_dir(dir: &Path, needles: &[&str]) -> Vec<String> {
    let mut violations = Vec::new();
    for file in collect_rs_files(dir) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        let rel = relative(&file);
        let mut tracker = CfgTestTracker::new();
        for (i, line) in content.lines().enumerate() {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            if in_test || trimmed.starts_with("//") {
                continue;
            }
            for needle in needles {
                if line.contains(needle) {
                    violations.push(format!("{rel}:{}: `{needle}`: {trimmed}", i + 1));
                }
            }
        }
    }
    violations
}

// ── Domain purity ─────────────────────────────────────────────────────────────

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let violations = find_in_dir(
        &src_dir().join("domain"),
        &[
            "crate::infra",
            "crate::commands",
            "crate::application",
            "crate::output",
            "tokio::",
            "ureq::",
            "std::fs",
            "std::process",
            "std::net",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay free of I/O and outer layers:\n{}",
        violations.join("\n")
    );
}

// ── Application layer depends on ports only ───────────────────────────────────

#[test]
fn application_does_not_import_infra_commands_or_output() {
    let violations = find_in_dir(
        &src_dir().join("application"),
        &["crate::infra", "crate::commands", "crate::output", "crate::app"],
    );
    assert!(
        violations.is_empty(),
        "application/ must only depend on domain/ and its own ports:\n{}",
        violations.join("\n")
    );
}

// ── Process runners are built in one place ────────────────────────────────────

#[test]
fn no_tokio_command_runner_construction_outside_infra() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir()) {
        let rel = relative(&file);
        if rel.contains("/infra/") || rel.ends_with("app.rs") {
            continue;
        }
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            if line.contains("TokioCommandRunner::") {
                violations.push(format!("{rel}:{}: {line}", i + 1));
            }
        }
    }
    assert!(
        violations.is_empty(),
        "Construct TokioCommandRunner through AppContext, not in handlers:\n{}",
        violations.join("\n")
    );
}

// ── Trait bounds over concrete types ──────────────────────────────────────────

#[test]
fn no_concrete_clients_in_service_signatures() {
    let concrete_types = [
        "TokioCommandRunner",
        "HostShell<",
        "GitLabClient",
        "RedmineClient",
        "JenkinsClient",
        "FileConfigStore",
    ];
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir().join("application").join("services")) {
        let rel = relative(&file);
        for (i, line) in read_non_comment_lines(&file).iter().enumerate() {
            if !line.contains("fn ") {
                continue;
            }
            for concrete in &concrete_types {
                if line.contains(concrete) {
                    violations.push(format!(
                        "{rel}:{}: concrete type `{concrete}` in function signature: {line}",
                        i + 1
                    ));
                }
            }
        }
    }
    assert!(
        violations.is_empty(),
        "Services must take trait bounds, not concrete infra types:\n{}",
        violations.join("\n")
    );
}

// ── Infra stays below presentation ────────────────────────────────────────────

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = find_in_dir(
        &src_dir().join("infra"),
        &["crate::commands", "crate::output"],
    );
    assert!(
        violations.is_empty(),
        "infra/ must not import from commands/ or output/:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_and_services_have_no_print_macros_outside_tests() {
    let mut violations = find_in_dir(&src_dir().join("infra"), &["println!", "eprintln!"]);
    violations.extend(find_in_dir(
        &src_dir().join("application"),
        &["println!", "eprintln!"],
    ));
    assert!(
        violations.is_empty(),
        "Report through ProgressReporter or tracing, not print macros:\n{}",
        violations.join("\n")
    );
}

// ── Command handlers accept unified AppContext ────────────────────────────────

#[test]
fn command_handlers_accept_app_context() {
    let mut violations = Vec::new();
    for file in collect_rs_files(&src_dir().join("commands")) {
        let Ok(content) = std::fs::read_to_string(&file) else {
            continue;
        };
        if !content.contains("pub async fn run") && !content.contains("pub fn run") {
            continue;
        }
        if !content.contains("app: &AppContext") {
            violations.push(relative(&file));
        }
    }
    assert!(
        violations.is_empty(),
        "Command handlers must receive `app: &AppContext`:\n{}",
        violations.join("\n")
    );
}
