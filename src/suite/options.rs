/// The fixed table of test options and the tool command templates.
///
/// Every option runs `<python> -m pytest` with a preset argument bundle.
/// Options are addressable two ways: by interactive digit key ("1".."6")
/// and by named CLI token ("all", "unit", ...). Both resolve to the same
/// entry.
use std::path::Path;

use crate::process::CommandLine;

/// Name of the external test tool, used in diagnostics.
pub const TEST_TOOL: &str = "pytest";

/// Default manifest installed when the test tool is missing.
pub const DEFAULT_REQUIREMENTS: &str = "tests/requirements-test.txt";

/// A static preset before it is bound to an interpreter.
struct Preset {
    key: &'static str,
    token: &'static str,
    description: &'static str,
    pytest_args: &'static [&'static str],
}

const PRESETS: [Preset; 6] = [
    Preset {
        key: "1",
        token: "all",
        description: "Run all tests",
        pytest_args: &["tests/", "-v"],
    },
    Preset {
        key: "2",
        token: "unit",
        description: "Run unit tests only",
        pytest_args: &["tests/test_rag_pipeline.py", "tests/test_api.py", "-v"],
    },
    Preset {
        key: "3",
        token: "integration",
        description: "Run integration tests only",
        pytest_args: &["tests/test_integration.py", "-v"],
    },
    Preset {
        key: "4",
        token: "retrieval",
        description: "Run document retrieval tests",
        pytest_args: &["tests/test_document_retrieval.py", "-v"],
    },
    Preset {
        key: "5",
        token: "coverage",
        description: "Run tests with coverage",
        pytest_args: &[
            "tests/",
            "--cov=api",
            "--cov=rag",
            "--cov-report=term-missing",
            "-v",
        ],
    },
    Preset {
        key: "6",
        token: "quick",
        description: "Run quick tests (no slow tests)",
        pytest_args: &["tests/", "-v", "-m", "not slow"],
    },
];

/// One selectable test run. Immutable once the table is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOption {
    /// Interactive menu key ("1".."6").
    pub key: &'static str,
    /// Named CLI token ("all", "unit", ...).
    pub token: &'static str,
    /// Human-readable label.
    pub description: &'static str,
    /// The full invocation.
    pub command: CommandLine,
}

/// The option set for one run, in menu order.
#[derive(Debug, Clone)]
pub struct OptionTable {
    options: Vec<TestOption>,
}

impl OptionTable {
    /// Bind every preset to the given Python interpreter.
    #[must_use]
    pub fn new(python: &str) -> Self {
        let options = PRESETS
            .iter()
            .map(|p| TestOption {
                key: p.key,
                token: p.token,
                description: p.description,
                command: pytest(python).args(p.pytest_args.iter().copied()),
            })
            .collect();
        Self { options }
    }

    /// Options in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &TestOption> {
        self.options.iter()
    }

    /// Look up by interactive key.
    #[must_use]
    pub fn by_key(&self, key: &str) -> Option<&TestOption> {
        self.options.iter().find(|o| o.key == key)
    }

    /// Look up by CLI token (exact, case-sensitive).
    #[must_use]
    pub fn by_token(&self, token: &str) -> Option<&TestOption> {
        self.options.iter().find(|o| o.token == token)
    }

    /// The accepted CLI tokens, in menu order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.options.iter().map(|o| o.token)
    }

    /// Key range shown in the prompt, e.g. "1-6".
    #[must_use]
    pub fn key_range(&self) -> String {
        match (self.options.first(), self.options.last()) {
            (Some(first), Some(last)) => format!("{}-{}", first.key, last.key),
            _ => String::new(),
        }
    }
}

/// Token list for the usage line: `all|unit|...`.
#[must_use]
pub fn token_alternatives() -> String {
    PRESETS.iter().map(|p| p.token).collect::<Vec<_>>().join("|")
}

/// `<python> -m pytest`.
#[must_use]
pub fn pytest(python: &str) -> CommandLine {
    CommandLine::new(python).args(["-m", TEST_TOOL])
}

/// Availability probe: `<python> -m pytest --version`.
#[must_use]
pub fn pytest_probe(python: &str) -> CommandLine {
    pytest(python).arg("--version")
}

/// Remediation: `<python> -m pip install -r <requirements>`.
#[must_use]
pub fn requirements_install(python: &str, requirements: &Path) -> CommandLine {
    CommandLine::new(python)
        .args(["-m", "pip", "install", "-r"])
        .arg(requirements.display().to_string())
}
