/// The command dispatcher: tool availability check, selection, execution.
///
/// All subprocess work goes through a [`ProcessRunner`], one blocking call
/// at a time. Two writers are threaded through a run:
///
/// - `out` receives the result of the selected option (banners and captured
///   streams, or the JSON report).
/// - `console` receives everything else: the menu, prompts, the usage line
///   and remediation progress. In human mode both are stdout.
use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::cli::output::{
    usage_line, write_json, write_menu, write_options, write_outcome, write_run_header,
};
use crate::cli::{OutputCtx, OutputFormat};
use crate::process::{Captured, CommandLine, ProcessError, ProcessRunner};
use crate::suite::options::{TEST_TOOL, pytest_probe, requirements_install};
use crate::suite::{
    OptionTable, Resolved, RunError, Selection, SelectionMode, TestOption, resolve_selection,
};
use crate::types::{ExecReport, OptionOutput};

/// Settings that shape a run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Interpreter used for pytest and pip.
    pub python: String,
    /// Manifest installed when the probe fails.
    pub requirements: PathBuf,
    /// Skip the availability probe entirely.
    pub skip_tool_check: bool,
    /// Resolve and print, never spawn.
    pub dry_run: bool,
}

/// Resolves a selection and runs its command.
pub struct Dispatcher<R> {
    runner: R,
    table: OptionTable,
    settings: Settings,
    ctx: OutputCtx,
}

impl<R: ProcessRunner> Dispatcher<R> {
    #[must_use]
    pub fn new(runner: R, settings: Settings, ctx: OutputCtx) -> Self {
        let table = OptionTable::new(&settings.python);
        Self {
            runner,
            table,
            settings,
            ctx,
        }
    }

    /// Full run: tool check, selection, execution.
    ///
    /// `suite` is the first positional argument; `None` shows the menu and
    /// reads one line from `input`.
    ///
    /// # Errors
    ///
    /// - `RunError::ToolUnavailable` if pytest cannot be made available.
    /// - `RunError::InvalidSelection` for an unknown menu choice or suite.
    /// - `RunError::CommandFailed` if the selected command exits non-zero.
    /// - `RunError::Io` if reading input or writing output fails.
    pub fn run(
        &self,
        suite: Option<&str>,
        input: &mut impl BufRead,
        out: &mut impl Write,
        console: &mut impl Write,
    ) -> Result<(), RunError> {
        if !self.settings.skip_tool_check && !self.settings.dry_run {
            self.check_tool_available(console)?;
        }

        let selection = match suite {
            Some(token) => Selection::Argument(token.to_owned()),
            None => Selection::Interactive(self.prompt(input, console)?),
        };
        debug!(?selection, "resolving selection");

        let option = match resolve_selection(&self.table, &selection) {
            Ok(Resolved::Run(option)) => option,
            Ok(Resolved::Quit) => {
                writeln!(console, "Exiting...")?;
                return Ok(());
            }
            Err(err) => {
                if let RunError::InvalidSelection { mode, .. } = &err {
                    match mode {
                        SelectionMode::Interactive => writeln!(console, "Invalid choice!")?,
                        SelectionMode::Argument => writeln!(console, "{}", usage_line())?,
                    }
                }
                return Err(err);
            }
        };

        if self.settings.dry_run {
            write_options(out, &[OptionOutput::from(option)], &self.ctx)?;
            return Ok(());
        }

        if self.execute(option, out)? {
            Ok(())
        } else {
            Err(RunError::CommandFailed {
                token: option.token,
            })
        }
    }

    /// Make sure pytest can be invoked, installing requirements once if not.
    ///
    /// After a successful install the probe runs a second time; the run is
    /// only allowed to continue if that probe passes.
    ///
    /// # Errors
    ///
    /// Returns `RunError::ToolUnavailable` if the install fails or the
    /// second probe still fails. `RunError::Io` on write failure.
    pub fn check_tool_available(&self, console: &mut impl Write) -> Result<(), RunError> {
        let probe = pytest_probe(&self.settings.python);
        if self.probe(&probe) {
            return Ok(());
        }

        writeln!(
            console,
            "❌ {TEST_TOOL} not found. Installing test requirements..."
        )?;
        let install = requirements_install(&self.settings.python, &self.settings.requirements);
        info!(command = %install, "installing test requirements");
        let outcome = self.run_with_banner("Installing test dependencies", &install, console)?;

        if !succeeded(&outcome) {
            writeln!(console, "Failed to install test dependencies")?;
            warn!(command = %install, "remediation failed");
            return Err(RunError::ToolUnavailable {
                tool: TEST_TOOL.to_owned(),
                reason: format!(
                    "installing {} failed",
                    self.settings.requirements.display()
                ),
            });
        }

        if self.probe(&probe) {
            info!("{TEST_TOOL} available after installing requirements");
            Ok(())
        } else {
            warn!(command = %probe, "probe still failing after remediation");
            Err(RunError::ToolUnavailable {
                tool: TEST_TOOL.to_owned(),
                reason: format!(
                    "still not runnable after installing {}",
                    self.settings.requirements.display()
                ),
            })
        }
    }

    /// Run one option and report it. True iff the child exited zero.
    ///
    /// A child that cannot be spawned, or dies without an exit code, is a
    /// `false` outcome rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Io` only if writing the report fails.
    pub fn execute(&self, option: &TestOption, out: &mut impl Write) -> Result<bool, RunError> {
        let outcome = match self.ctx.format {
            OutputFormat::Human => {
                self.run_with_banner(option.description, &option.command, out)?
            }
            OutputFormat::Json => {
                let outcome = self.runner.run(&option.command);
                write_json(out, &ExecReport::new(option, &outcome))?;
                outcome
            }
        };
        Ok(succeeded(&outcome))
    }

    fn run_with_banner(
        &self,
        description: &str,
        command: &CommandLine,
        out: &mut impl Write,
    ) -> Result<Result<Captured, ProcessError>, RunError> {
        write_run_header(out, description, command)?;
        let outcome = self.runner.run(command);
        if let Err(err) = &outcome {
            warn!(error = %err, "could not launch command");
        }
        write_outcome(out, &outcome)?;
        Ok(outcome)
    }

    fn probe(&self, probe: &CommandLine) -> bool {
        match self.runner.run(probe) {
            Ok(captured) if captured.success() => {
                debug!(version = captured.stdout.trim(), "{TEST_TOOL} is available");
                true
            }
            Ok(captured) => {
                debug!(code = ?captured.code, "{TEST_TOOL} probe exited non-zero");
                false
            }
            Err(err) => {
                debug!(error = %err, "{TEST_TOOL} probe could not be launched");
                false
            }
        }
    }

    fn prompt(
        &self,
        input: &mut impl BufRead,
        console: &mut impl Write,
    ) -> Result<String, RunError> {
        write_menu(console, &self.table)?;
        let mut line = Vec::new();
        input.read_until(b'\n', &mut line)?;
        // Non-UTF-8 bytes decode to U+FFFD and then fail key lookup.
        Ok(String::from_utf8_lossy(&line).into_owned())
    }
}

fn succeeded(outcome: &Result<Captured, ProcessError>) -> bool {
    outcome.as_ref().is_ok_and(Captured::success)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::io::{self, Cursor};
    use std::time::Duration;

    use super::*;

    /// Records every command and replays scripted outcomes (default: exit 0).
    #[derive(Default)]
    struct FakeRunner {
        calls: RefCell<Vec<CommandLine>>,
        script: RefCell<VecDeque<Result<Captured, ProcessError>>>,
    }

    impl FakeRunner {
        fn scripted(codes: &[Option<i32>]) -> Self {
            let runner = Self::default();
            for code in codes {
                runner.push_exit(*code);
            }
            runner
        }

        fn push_exit(&self, code: Option<i32>) {
            self.script.borrow_mut().push_back(Ok(Captured {
                code,
                stdout: String::new(),
                stderr: String::new(),
                elapsed: Duration::from_millis(5),
            }));
        }

        fn push_spawn_error(&self) {
            self.script.borrow_mut().push_back(Err(ProcessError::Spawn {
                program: "python3".to_owned(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }));
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().iter().map(ToString::to_string).collect()
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, cmd: &CommandLine) -> Result<Captured, ProcessError> {
            self.calls.borrow_mut().push(cmd.clone());
            self.script.borrow_mut().pop_front().unwrap_or_else(|| {
                Ok(Captured {
                    code: Some(0),
                    stdout: "ok".to_owned(),
                    stderr: String::new(),
                    elapsed: Duration::ZERO,
                })
            })
        }
    }

    fn settings() -> Settings {
        Settings {
            python: "python3".to_owned(),
            requirements: PathBuf::from("tests/requirements-test.txt"),
            skip_tool_check: false,
            dry_run: false,
        }
    }

    fn human() -> OutputCtx {
        OutputCtx::new(OutputFormat::Human, false, false)
    }

    struct Transcript {
        result: Result<(), RunError>,
        out: String,
        console: String,
    }

    fn drive(
        runner: &FakeRunner,
        settings: Settings,
        ctx: OutputCtx,
        suite: Option<&str>,
        stdin: &str,
    ) -> Transcript {
        let dispatcher = Dispatcher::new(runner, settings, ctx);
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut out = Vec::new();
        let mut console = Vec::new();
        let result = dispatcher.run(suite, &mut input, &mut out, &mut console);
        Transcript {
            result,
            out: String::from_utf8(out).unwrap(),
            console: String::from_utf8(console).unwrap(),
        }
    }

    fn exit_code(result: &Result<(), RunError>) -> i32 {
        result.as_ref().map_or_else(RunError::exit_code, |_| 0)
    }

    const PROBE: &str = "python3 -m pytest --version";
    const INSTALL: &str = "python3 -m pip install -r tests/requirements-test.txt";

    #[test]
    fn test_coverage_argument_succeeds() {
        let runner = FakeRunner::default();
        let t = drive(&runner, settings(), human(), Some("coverage"), "");
        assert_eq!(exit_code(&t.result), 0);
        assert_eq!(
            runner.calls(),
            vec![
                PROBE.to_owned(),
                "python3 -m pytest tests/ --cov=api --cov=rag --cov-report=term-missing -v"
                    .to_owned(),
            ]
        );
        assert!(t.out.contains("Running: Run tests with coverage"));
        assert!(t.out.contains("STDOUT:\nok\n"));
        assert!(t.out.contains("✅ Success!"));
    }

    #[test]
    fn test_bogus_argument_prints_usage() {
        let runner = FakeRunner::default();
        let t = drive(&runner, settings(), human(), Some("bogus"), "");
        assert_eq!(exit_code(&t.result), 1);
        assert!(t.console.contains(&usage_line()));
        assert_eq!(runner.calls(), vec![PROBE.to_owned()]);
    }

    #[test]
    fn test_quit_runs_no_option() {
        for input in ["q\n", "Q\n"] {
            let runner = FakeRunner::default();
            let t = drive(&runner, settings(), human(), None, input);
            assert_eq!(exit_code(&t.result), 0);
            assert!(t.console.contains("Exiting..."));
            assert_eq!(runner.calls(), vec![PROBE.to_owned()]);
        }
    }

    #[test]
    fn test_quit_with_probe_skipped_spawns_nothing() {
        let runner = FakeRunner::default();
        let mut s = settings();
        s.skip_tool_check = true;
        let t = drive(&runner, s, human(), None, "q\n");
        assert_eq!(exit_code(&t.result), 0);
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_invalid_menu_choice_runs_no_option() {
        for input in ["7\n", "x\n", "\n", ""] {
            let runner = FakeRunner::default();
            let t = drive(&runner, settings(), human(), None, input);
            assert_eq!(exit_code(&t.result), 1, "input {input:?}");
            assert!(t.console.contains("Invalid choice!"));
            assert_eq!(runner.calls(), vec![PROBE.to_owned()]);
        }
    }

    #[test]
    fn test_non_utf8_menu_choice_is_invalid_choice() {
        let runner = FakeRunner::default();
        let dispatcher = Dispatcher::new(&runner, settings(), human());
        let mut input = Cursor::new(vec![b'1', 0xff, 0xfe, b'\n']);
        let mut out = Vec::new();
        let mut console = Vec::new();
        let result = dispatcher.run(None, &mut input, &mut out, &mut console);
        assert!(matches!(
            result,
            Err(RunError::InvalidSelection {
                mode: SelectionMode::Interactive,
                ..
            })
        ));
        assert_eq!(exit_code(&result), 1);
        assert!(String::from_utf8(console).unwrap().contains("Invalid choice!"));
        assert_eq!(runner.calls(), vec![PROBE.to_owned()]);
    }

    #[test]
    fn test_menu_choice_runs_option() {
        let runner = FakeRunner::default();
        let t = drive(&runner, settings(), human(), None, "3\n");
        assert_eq!(exit_code(&t.result), 0);
        assert!(t.console.contains("Available test options:"));
        assert_eq!(
            runner.calls().last().map(String::as_str),
            Some("python3 -m pytest tests/test_integration.py -v")
        );
    }

    #[test]
    fn test_failing_command_exits_one() {
        for code in [1, 2, 127] {
            let runner = FakeRunner::scripted(&[Some(0), Some(code)]);
            let t = drive(&runner, settings(), human(), Some("unit"), "");
            assert_eq!(exit_code(&t.result), 1);
            assert!(matches!(
                t.result,
                Err(RunError::CommandFailed { token: "unit" })
            ));
            assert!(t.out.contains(&format!("❌ Failed with return code: {code}")));
        }
    }

    #[test]
    fn test_json_failing_command_exits_one() {
        let runner = FakeRunner::scripted(&[Some(0), Some(4)]);
        let ctx = OutputCtx::new(OutputFormat::Json, false, false);
        let t = drive(&runner, settings(), ctx, Some("integration"), "");
        assert!(matches!(
            t.result,
            Err(RunError::CommandFailed {
                token: "integration"
            })
        ));
        let value: serde_json::Value = serde_json::from_str(&t.out).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["exit_code"], 4);
    }

    #[test]
    fn test_execute_reports_status() {
        let table = OptionTable::new("python3");
        let option = table.by_token("all").unwrap();
        let cases = [
            (Some(0), true),
            (Some(1), false),
            (Some(2), false),
            (Some(127), false),
            (None, false),
        ];
        for (code, expected) in cases {
            let runner = FakeRunner::scripted(&[code]);
            let dispatcher = Dispatcher::new(&runner, settings(), human());
            let mut out = Vec::new();
            assert_eq!(dispatcher.execute(option, &mut out).unwrap(), expected, "{code:?}");
        }
    }

    #[test]
    fn test_execute_spawn_failure_is_false() {
        let runner = FakeRunner::default();
        runner.push_spawn_error();
        let dispatcher = Dispatcher::new(&runner, settings(), human());
        let table = OptionTable::new("python3");
        let option = table.by_token("quick").unwrap();
        let mut out = Vec::new();
        assert!(!dispatcher.execute(option, &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().contains("failed to launch"));
    }

    #[test]
    fn test_failed_remediation_aborts_before_selection() {
        let runner = FakeRunner::scripted(&[Some(1), Some(1)]);
        let t = drive(&runner, settings(), human(), None, "1\n");
        assert!(matches!(t.result, Err(RunError::ToolUnavailable { .. })));
        assert_eq!(exit_code(&t.result), 1);
        assert_eq!(runner.calls(), vec![PROBE.to_owned(), INSTALL.to_owned()]);
        assert!(t.console.contains("Failed to install test dependencies"));
        assert!(!t.console.contains("Available test options:"));
    }

    #[test]
    fn test_missing_interpreter_aborts() {
        let runner = FakeRunner::default();
        runner.push_spawn_error();
        runner.push_spawn_error();
        let t = drive(&runner, settings(), human(), Some("all"), "");
        assert!(matches!(t.result, Err(RunError::ToolUnavailable { .. })));
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_successful_remediation_rechecks() {
        let runner = FakeRunner::scripted(&[Some(1), Some(0), Some(0), Some(0)]);
        let t = drive(&runner, settings(), human(), Some("all"), "");
        assert_eq!(exit_code(&t.result), 0);
        assert_eq!(
            runner.calls(),
            vec![
                PROBE.to_owned(),
                INSTALL.to_owned(),
                PROBE.to_owned(),
                "python3 -m pytest tests/ -v".to_owned(),
            ]
        );
        assert!(t.console.contains("Running: Installing test dependencies"));
    }

    #[test]
    fn test_probe_still_failing_after_install_is_fatal() {
        let runner = FakeRunner::scripted(&[Some(1), Some(0), Some(1)]);
        let t = drive(&runner, settings(), human(), Some("all"), "");
        assert!(matches!(t.result, Err(RunError::ToolUnavailable { .. })));
        assert_eq!(runner.calls().len(), 3);
    }

    #[test]
    fn test_dry_run_spawns_nothing() {
        let runner = FakeRunner::default();
        let mut s = settings();
        s.dry_run = true;
        let t = drive(&runner, s, human(), Some("retrieval"), "");
        assert_eq!(exit_code(&t.result), 0);
        assert!(runner.calls().is_empty());
        assert!(t.out.contains("tests/test_document_retrieval.py"));
    }

    #[test]
    fn test_json_report() {
        let runner = FakeRunner::default();
        let ctx = OutputCtx::new(OutputFormat::Human, true, false);
        let t = drive(&runner, settings(), ctx, Some("quick"), "");
        assert_eq!(exit_code(&t.result), 0);
        let value: serde_json::Value = serde_json::from_str(&t.out).unwrap();
        assert_eq!(value["token"], "quick");
        assert_eq!(value["success"], true);
        assert_eq!(value["stdout"], "ok");
        assert!(!t.out.contains("Running:"));
    }
}
