//! Nested step instrumentation
//!
//! An [`EventLogger`] records hierarchical units of work. Entering a step
//! emits a `begin` record; dropping the returned [`StepGuard`] emits the
//! matching `end` record with the measured duration. Steps nest, and every
//! record carries the breadcrumb of active step numbers:
//!
//! ```text
//! begin 0:00:00 [1] Build house...
//! begin 0:00:02 [1, 2] lay foundation 20 ft deep...
//! end   0:00:03 [1, 2] lay foundation 20 ft deep at 65 degrees.
//! end   0:00:35 [1] Build house.
//! ```

use super::{
    clock::{Clock, SystemClock, Timestamp},
    error::{LoggerError, Result},
    log_context::{FieldValue, LogContext},
    log_entry::{Elapsed, LogRecord, StepPhase},
    log_level::LogLevel,
    logger::Logger,
    step::{StepFrame, StepStack},
    template::render,
    timestamp::format_duration,
};
use chrono::Duration;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

/// Step-aware front end over a [`Logger`]
///
/// Holds the ambient context attached to every record, the injected clock,
/// and the stack of active steps. The step stack uses interior mutability, so
/// an `EventLogger` is not `Sync`: give each thread or call chain its own
/// instance (they may share one `Logger`).
///
/// # Example
///
/// ```
/// use rust_event_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Arc::new(Logger::new());
/// let events = EventLogger::new(
///     logger,
///     LogContext::new().with_field("run", "2024-06-01"),
///     Arc::new(SteppingClock::default()),
/// );
///
/// {
///     let mut step = events.step("load {table}", LogContext::new().with_field("table", "patients"));
///     step.append(": {rows} rows");
///     step.set_arg("rows", 1200);
/// }
/// assert!(events.breadcrumb().is_empty());
/// ```
pub struct EventLogger {
    name: String,
    context: LogContext,
    clock: Arc<dyn Clock>,
    logger: Arc<Logger>,
    steps: RefCell<StepStack>,
}

impl EventLogger {
    pub fn new(logger: Arc<Logger>, context: LogContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: "events".to_string(),
            context,
            clock,
            logger,
            steps: RefCell::new(StepStack::new()),
        }
    }

    /// Event logger reading wall-clock time
    pub fn with_system_clock(logger: Arc<Logger>, context: LogContext) -> Self {
        Self::new(logger, context, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Sequence numbers of the active steps, innermost last
    pub fn breadcrumb(&self) -> Vec<u64> {
        self.steps.borrow().breadcrumb()
    }

    pub fn depth(&self) -> usize {
        self.steps.borrow().depth()
    }

    /// Render `template` with `args` and route it at `level`
    pub fn log(&self, level: LogLevel, template: &str, args: &LogContext) {
        if !self.logger.is_enabled(level) {
            return;
        }
        let record = LogRecord::new(level, render(template, args), self.clock.now())
            .with_context(self.context.clone())
            .with_breadcrumb(self.breadcrumb());
        self.logger.dispatch(record);
    }

    #[inline]
    pub fn trace(&self, template: &str, args: &LogContext) {
        self.log(LogLevel::Trace, template, args);
    }

    #[inline]
    pub fn debug(&self, template: &str, args: &LogContext) {
        self.log(LogLevel::Debug, template, args);
    }

    #[inline]
    pub fn info(&self, template: &str, args: &LogContext) {
        self.log(LogLevel::Info, template, args);
    }

    #[inline]
    pub fn warn(&self, template: &str, args: &LogContext) {
        self.log(LogLevel::Warn, template, args);
    }

    #[inline]
    pub fn error(&self, template: &str, args: &LogContext) {
        self.log(LogLevel::Error, template, args);
    }

    #[inline]
    pub fn fatal(&self, template: &str, args: &LogContext) {
        self.log(LogLevel::Fatal, template, args);
    }

    /// Enter a step; the `end` record is emitted when the guard drops
    pub fn step(&self, template: impl Into<String>, args: LogContext) -> StepGuard<'_> {
        self.step_with_extra(template, args, LogContext::new())
    }

    /// Enter a step whose records also carry `extra` fields
    pub fn step_with_extra(
        &self,
        template: impl Into<String>,
        args: LogContext,
        extra: LogContext,
    ) -> StepGuard<'_> {
        let template = template.into();
        let checkpoint = self.clock.now();

        let (frame, breadcrumb, since_outermost) = {
            let mut steps = self.steps.borrow_mut();
            let frame = steps.push(checkpoint);
            let outermost_start = steps.outermost().map_or(checkpoint, |f| f.started_at);
            (frame, steps.breadcrumb(), checkpoint - outermost_start)
        };

        let message = format!(
            "{} {:?} {}...",
            format_duration(&since_outermost),
            breadcrumb,
            render(&template, &args)
        );
        self.emit_step(
            LogLevel::Info,
            message,
            checkpoint,
            breadcrumb,
            StepPhase::Begin,
            Elapsed::started(checkpoint),
            &extra,
        );

        StepGuard {
            events: self,
            frame,
            template,
            fragments: Vec::new(),
            args,
            extra,
            failed: false,
            unwinding_at_entry: std::thread::panicking(),
        }
    }

    /// Run `work` inside a step
    ///
    /// An `Err` from `work` makes the `end` record an error-level record and
    /// is returned unchanged.
    ///
    /// ```
    /// use rust_event_logger::prelude::*;
    /// use std::sync::Arc;
    ///
    /// let events = EventLogger::with_system_clock(Arc::new(Logger::new()), LogContext::new());
    /// let result: std::result::Result<u32, String> =
    ///     events.run_step("parse {file}", fields!(file = "codes.xls"), |_| Err("bad sheet".into()));
    /// assert_eq!(result, Err("bad sheet".to_string()));
    /// ```
    pub fn run_step<T, E, F>(
        &self,
        template: impl Into<String>,
        args: LogContext,
        work: F,
    ) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut StepGuard<'_>) -> std::result::Result<T, E>,
    {
        let mut guard = self.step(template, args);
        let result = work(&mut guard);
        if result.is_err() {
            guard.mark_failed();
        }
        result
    }

    /// Time since `reference`, or since the innermost active step started
    pub fn elapsed(&self, reference: Option<Timestamp>) -> Result<Elapsed> {
        let start = match reference {
            Some(start) => start,
            None => self
                .steps
                .borrow()
                .innermost()
                .map(|f| f.started_at)
                .ok_or(LoggerError::NoActiveStep)?,
        };
        let now = self.clock.now();
        Ok(Elapsed::measured(start, now - start))
    }

    /// Estimated completion time of the outermost active step
    ///
    /// Extrapolates linearly: with `t0` the outermost step's start,
    /// returns `t0 + (now - t0) * 100 / percent_complete`.
    pub fn eta(&self, percent_complete: f64) -> Result<Timestamp> {
        if !percent_complete.is_finite() || percent_complete <= 0.0 {
            return Err(LoggerError::invalid_progress(percent_complete));
        }

        let t0 = self
            .steps
            .borrow()
            .outermost()
            .map(|f| f.started_at)
            .ok_or(LoggerError::NoActiveStep)?;
        let elapsed = self.clock.now() - t0;

        let elapsed_micros = elapsed
            .num_microseconds()
            .ok_or_else(|| LoggerError::other("elapsed time too large to extrapolate"))?;
        let projected = (elapsed_micros as f64 * (100.0 / percent_complete)).round();
        if !projected.is_finite() || projected.abs() >= i64::MAX as f64 {
            return Err(LoggerError::invalid_progress(percent_complete));
        }

        t0.checked_add_signed(Duration::microseconds(projected as i64))
            .ok_or_else(|| LoggerError::invalid_progress(percent_complete))
    }

    fn finish_step(&self, guard: &StepGuard<'_>) {
        let now = self.clock.now();
        let duration = now - guard.frame.started_at;

        let breadcrumb = {
            let mut steps = self.steps.borrow_mut();
            let breadcrumb = steps.breadcrumb();
            steps.pop(guard.frame.sequence);
            breadcrumb
        };

        // a step entered during unwinding (e.g. in a Drop) is not failed by that panic
        let panicked_inside = std::thread::panicking() && !guard.unwinding_at_entry;
        let level = if guard.failed || panicked_inside {
            LogLevel::Error
        } else {
            LogLevel::Info
        };

        let mut template = guard.template.clone();
        for fragment in &guard.fragments {
            template.push_str(fragment);
        }
        let message = format!(
            "{} {:?} {}.",
            format_duration(&duration),
            breadcrumb,
            render(&template, &guard.args)
        );
        self.emit_step(
            level,
            message,
            now,
            breadcrumb,
            StepPhase::End,
            Elapsed::measured(guard.frame.started_at, duration),
            &guard.extra,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_step(
        &self,
        level: LogLevel,
        message: String,
        timestamp: Timestamp,
        breadcrumb: Vec<u64>,
        phase: StepPhase,
        elapsed: Elapsed,
        extra: &LogContext,
    ) {
        if !self.logger.is_enabled(level) {
            return;
        }
        let record = LogRecord::new(level, message, timestamp)
            .with_context(self.context.clone())
            .with_breadcrumb(breadcrumb)
            .with_phase(phase)
            .with_elapsed(elapsed)
            .with_extra(extra.clone());
        self.logger.dispatch(record);
    }
}

impl fmt::Debug for EventLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLogger")
            .field("name", &self.name)
            .field("context", &self.context)
            .field("breadcrumb", &self.breadcrumb())
            .finish()
    }
}

/// Scope of one active step
///
/// Dropping the guard emits the step's `end` record and pops its frame, on
/// every exit path. The record is error-level when the guard was marked
/// failed or a panic raised while the step was active is unwinding through
/// it; the panic itself keeps propagating.
#[must_use = "the step ends as soon as the guard is dropped"]
pub struct StepGuard<'a> {
    events: &'a EventLogger,
    frame: StepFrame,
    template: String,
    fragments: Vec<String>,
    args: LogContext,
    extra: LogContext,
    failed: bool,
    unwinding_at_entry: bool,
}

impl StepGuard<'_> {
    pub fn sequence(&self) -> u64 {
        self.frame.sequence
    }

    pub fn started_at(&self) -> Timestamp {
        self.frame.started_at
    }

    /// Append a template fragment to the completion message
    pub fn append(&mut self, fragment: impl Into<String>) -> &mut Self {
        self.fragments.push(fragment.into());
        self
    }

    /// Set an argument used when rendering the completion message
    pub fn set_arg(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> &mut Self {
        self.args.add_field(key, value);
        self
    }

    pub fn args_mut(&mut self) -> &mut LogContext {
        &mut self.args
    }

    pub fn extra_mut(&mut self) -> &mut LogContext {
        &mut self.extra
    }

    /// Make the completion record error-level
    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }
}

impl Drop for StepGuard<'_> {
    fn drop(&mut self) {
        let events = self.events;
        events.finish_step(self);
    }
}
