use super::*;
use std::collections::VecDeque;

/// Opt-in in-memory trace of events, timers and observer batches. Lines are
/// mirrored to `tracing` at TRACE level.
#[derive(Debug, Clone)]
pub(crate) struct Trace {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) observer: bool,
    logs: VecDeque<String>,
    log_limit: usize,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            observer: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

impl Trace {
    pub(crate) fn event_line(&mut self, line: String) {
        if self.events {
            self.line(line);
        }
    }

    pub(crate) fn timer_line(&mut self, line: String) {
        if self.timers {
            self.line(line);
        }
    }

    pub(crate) fn observer_line(&mut self, line: String) {
        if self.observer {
            self.line(line);
        }
    }

    fn line(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        tracing::trace!(target: "resume_page::trace", "{line}");
        while self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        self.logs.drain(..).collect()
    }

    pub(crate) fn set_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.log_limit = max_entries;
        if self.logs.len() > max_entries {
            let excess = self.logs.len() - max_entries;
            self.logs.drain(..excess);
        }
        Ok(())
    }
}

/// Document plus the browser-side state the page behaviour touches.
#[derive(Debug, Clone)]
pub(crate) struct Page {
    pub(crate) dom: Dom,
    pub(crate) title: String,
    pub(crate) viewport: Viewport,
    pub(crate) timers: TimerQueue,
    pub(crate) console: Console,
    pub(crate) trace: Trace,
    // Set by `scrollTo` calls made from listeners; applied once the current
    // dispatch finishes.
    pending_scroll: Option<f64>,
}

impl Page {
    pub(crate) fn new(dom: Dom, title: String, viewport: Viewport) -> Self {
        Self {
            dom,
            title,
            viewport,
            timers: TimerQueue::new(),
            console: Console::default(),
            trace: Trace::default(),
            pending_scroll: None,
        }
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.timers.now_ms()
    }

    pub(crate) fn document_height(&self) -> f64 {
        self.dom.content_height().max(self.viewport.height)
    }

    pub(crate) fn max_scroll(&self) -> f64 {
        self.viewport.max_scroll(self.document_height())
    }

    pub(crate) fn request_scroll(&mut self, y: f64) {
        self.pending_scroll = Some(y);
    }

    pub(crate) fn take_pending_scroll(&mut self) -> Option<f64> {
        self.pending_scroll.take()
    }

    pub(crate) fn log(&mut self, level: ConsoleLevel, format: &str, styles: &[&str]) {
        let now = self.now_ms();
        self.console.log(level, format, styles, now);
    }

    pub(crate) fn schedule_timeout(&mut self, task: Task, delay_ms: i64) -> i64 {
        let scheduled = self.timers.schedule_timeout(task, delay_ms);
        self.trace.timer_line(format!(
            "[timer] schedule timeout id={} task={} due_at={} delay_ms={}",
            scheduled.id,
            scheduled.task.label(),
            scheduled.due_at,
            delay_ms.max(0)
        ));
        scheduled.id
    }

    pub(crate) fn schedule_interval(&mut self, task: Task, interval_ms: i64) -> i64 {
        let scheduled = self.timers.schedule_interval(task, interval_ms);
        self.trace.timer_line(format!(
            "[timer] schedule interval id={} task={} due_at={} interval_ms={}",
            scheduled.id,
            scheduled.task.label(),
            scheduled.due_at,
            interval_ms.max(0)
        ));
        scheduled.id
    }
}
