use std::collections::VecDeque;
use std::fmt;

use super::{parse, Command, LineError};
use crate::engine::{Outcome, StructureEngine};

/// Result of a whole script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptReport {
    /// Every line ran.
    Success,
    /// Lines that failed, in line order.
    Failed(Vec<LineError>),
}

impl ScriptReport {
    /// Whether every line ran.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ScriptReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("OK"),
            Self::Failed(errors) => {
                let lines: Vec<String> =
                    errors.iter().map(ToString::to_string).collect();
                f.write_str(&lines.join("\n"))
            }
        }
    }
}

/// Feeds script commands to an engine, one at a time.
///
/// In animated use, call [`tick`](Self::tick) instead of ticking the engine
/// directly: the next command starts as soon as the previous one settles.
#[derive(Debug, Default)]
pub struct ScriptRunner {
    queue: VecDeque<Command>,
    errors: Vec<LineError>,
    outcomes: Vec<(usize, Outcome)>,
    /// Line of the command currently animating.
    current: Option<usize>,
}

impl ScriptRunner {
    /// Empty runner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` for `engine`'s structure and queue the result. Parse
    /// errors are kept for the report.
    pub fn load(&mut self, text: &str, engine: &StructureEngine) {
        for parsed in parse(text, engine.kind()) {
            match parsed {
                Ok(command) => self.enqueue(command),
                Err(error) => self.errors.push(error),
            }
        }
    }

    /// Queue one command.
    pub fn enqueue(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Whether nothing is queued or animating.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.queue.is_empty() && self.current.is_none()
    }

    /// Outcomes of the commands that finished, with their lines.
    #[must_use]
    pub fn outcomes(&self) -> &[(usize, Outcome)] {
        &self.outcomes
    }

    /// Run every queued command to completion now, finishing animations
    /// synchronously.
    pub fn run_immediate(&mut self, engine: &mut StructureEngine) {
        if let Some(line) = self.current.take() {
            let outcome = engine.finish().or_else(|| engine.last_outcome());
            self.settle(line, outcome);
        }
        while let Some(command) = self.queue.pop_front() {
            let line = command.line;
            match engine.start(command.request) {
                Ok(Some(outcome)) => self.outcomes.push((line, outcome)),
                Ok(None) => {
                    let outcome = engine.finish();
                    self.settle(line, outcome);
                }
                Err(err) => self.fail(line, err.to_string()),
            }
        }
    }

    /// Tick `engine` by `dt` seconds and start the next command once it is
    /// idle. Returns whether work remains.
    pub fn tick(&mut self, engine: &mut StructureEngine, dt: f32) -> bool {
        engine.tick(dt);
        if let Some(line) = self.current {
            if engine.is_animating() {
                return true;
            }
            self.current = None;
            self.settle(line, engine.last_outcome());
        }
        while let Some(command) = self.queue.pop_front() {
            let line = command.line;
            match engine.start(command.request) {
                Ok(Some(outcome)) => self.outcomes.push((line, outcome)),
                Ok(None) => {
                    self.current = Some(line);
                    break;
                }
                Err(err) => self.fail(line, err.to_string()),
            }
        }
        !self.is_done()
    }

    /// Summary of every failed line so far.
    #[must_use]
    pub fn report(&self) -> ScriptReport {
        if self.errors.is_empty() {
            return ScriptReport::Success;
        }
        let mut errors = self.errors.clone();
        errors.sort_by_key(|e| e.line);
        ScriptReport::Failed(errors)
    }

    fn settle(&mut self, line: usize, outcome: Option<Outcome>) {
        match outcome {
            Some(outcome) => self.outcomes.push((line, outcome)),
            None => self.fail(line, "operation was cancelled".to_owned()),
        }
    }

    fn fail(&mut self, line: usize, message: String) {
        log::debug!("script line {line} failed: {message}");
        self.errors.push(LineError { line, message });
    }
}

/// Run `text` against `engine` synchronously and report.
pub fn run_script(engine: &mut StructureEngine, text: &str) -> ScriptReport {
    let mut runner = ScriptRunner::new();
    runner.load(text, engine);
    runner.run_immediate(engine);
    runner.report()
}
