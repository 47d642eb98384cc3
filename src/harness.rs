use super::*;
use crate::dom::truncate_chars;
use crate::geometry::format_number;
use std::path::Path;

const STACK_SIZE: usize = 32 * 1024 * 1024;

/// A loaded page with its behaviour installed, driven on a fake clock.
#[derive(Debug)]
pub struct Harness {
    page: Page,
    controller: PageController,
    listeners: ListenerStore,
    timer_step_limit: usize,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, SiteConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: SiteConfig) -> Result<Self> {
        Self::from_html_with_layout(html, config, &[])
    }

    /// Parses the page, places every element matching a `layout` selector,
    /// installs the page behaviour, delivers the initial intersection batch
    /// and dispatches `load` on the window.
    pub fn from_html_with_layout(
        html: &str,
        config: SiteConfig,
        layout: &[(&str, Rect)],
    ) -> Result<Self> {
        config.validate()?;
        let mut parsed = stacker::grow(STACK_SIZE, || parse_html(html))?;
        for (selector, rect) in layout {
            for node in parsed.dom.query_selector_all(selector)? {
                parsed.dom.set_layout(node, *rect)?;
            }
        }
        let viewport = Viewport::new(config.viewport.width, config.viewport.height);
        let mut page = Page::new(parsed.dom, parsed.title, viewport);
        let mut listeners = ListenerStore::default();
        let controller = PageController::install(&mut page, &mut listeners, config)?;

        let mut harness = Self {
            page,
            controller,
            listeners,
            timer_step_limit: 10_000,
        };
        harness.check_intersections();
        harness.dispatch_target(EventTarget::Window, "load", None);
        harness.apply_pending_scroll();
        Ok(harness)
    }

    pub fn from_file(path: impl AsRef<Path>, config: SiteConfig) -> Result<Self> {
        let path = path.as_ref();
        let html = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), bytes = html.len(), "loading page");
        Self::from_html_with_config(&html, config)
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.page.trace.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.page.trace.take()
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.page.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.page.trace.timers = enabled;
    }

    pub fn set_trace_observer(&mut self, enabled: bool) {
        self.page.trace.observer = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        self.page.trace.set_limit(max_entries)
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.page.title
    }

    pub fn scroll_y(&self) -> f64 {
        self.page.viewport.scroll_y
    }

    pub fn max_scroll(&self) -> f64 {
        self.page.max_scroll()
    }

    /// Scrolls the window to `y`, clamped to the scrollable range, and
    /// dispatches `scroll`. A scroll to the current offset dispatches nothing.
    pub fn scroll_to(&mut self, y: f64) -> Result<()> {
        stacker::grow(STACK_SIZE, || {
            self.scroll_window(y);
            self.apply_pending_scroll();
        });
        Ok(())
    }

    pub fn scroll_by(&mut self, delta: f64) -> Result<()> {
        let y = self.page.viewport.scroll_y + delta;
        self.scroll_to(y)
    }

    /// Clicks the centre of the first element matching `selector`.
    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let rect = self
            .page
            .dom
            .bounding_client_rect(target, self.page.viewport.scroll_y)?;
        let (x, y) = (rect.left + rect.width / 2.0, rect.top + rect.height / 2.0);
        self.click_node(target, x, y);
        Ok(())
    }

    /// Clicks the first element matching `selector` at viewport coordinates.
    pub fn click_at(&mut self, selector: &str, client_x: f64, client_y: f64) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target, client_x, client_y);
        Ok(())
    }

    fn click_node(&mut self, target: NodeId, client_x: f64, client_y: f64) {
        stacker::grow(STACK_SIZE, || {
            self.dispatch_target(
                EventTarget::Node(target),
                "click",
                Some((client_x, client_y)),
            );
            self.apply_pending_scroll();
        });
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        self.dispatch(selector, "mouseenter")
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        self.dispatch(selector, "mouseleave")
    }

    /// Dispatches `event_type` at the first element matching `selector`.
    pub fn dispatch(&mut self, selector: &str, event_type: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        stacker::grow(STACK_SIZE, || {
            self.dispatch_target(EventTarget::Node(target), event_type, None);
            self.apply_pending_scroll();
        });
        Ok(())
    }

    /// Places every element matching `selector` at `rect` (document
    /// coordinates) and re-runs viewport observation. A shorter document
    /// clamps the scroll offset without dispatching `scroll`.
    pub fn set_layout(&mut self, selector: &str, rect: Rect) -> Result<()> {
        let targets = self.page.dom.query_selector_all(selector)?;
        if targets.is_empty() {
            return Err(Error::SelectorNotFound(selector.to_string()));
        }
        for target in targets {
            self.page.dom.set_layout(target, rect)?;
        }
        self.clamp_scroll();
        self.check_intersections();
        Ok(())
    }

    pub fn layout(&self, selector: &str) -> Result<Rect> {
        let target = self.select_one(selector)?;
        self.page.dom.layout(target)
    }

    /// Resizes the viewport; the scroll offset is clamped to the new range
    /// without dispatching `scroll`.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::Runtime(format!(
                "viewport must be non-empty, got {}x{}",
                format_number(width),
                format_number(height)
            )));
        }
        self.page.viewport.width = width;
        self.page.viewport.height = height;
        self.clamp_scroll();
        self.check_intersections();
        Ok(())
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = self.page.max_scroll();
        self.page.viewport.scroll_y = self.page.viewport.scroll_y.clamp(0.0, max_scroll);
    }

    fn scroll_window(&mut self, y: f64) {
        let y = if y.is_finite() { y } else { 0.0 };
        let clamped = y.clamp(0.0, self.page.max_scroll());
        if clamped == self.page.viewport.scroll_y {
            return;
        }
        self.page.viewport.scroll_y = clamped;
        self.dispatch_target(EventTarget::Window, "scroll", None);
        self.check_intersections();
    }

    fn apply_pending_scroll(&mut self) {
        // Scroll listeners never request a scroll, so this settles after one
        // round.
        while let Some(y) = self.page.take_pending_scroll() {
            self.scroll_window(y);
        }
    }

    fn check_intersections(&mut self) {
        self.controller.check_intersections(&mut self.page);
    }

    fn dispatch_target(
        &mut self,
        target: EventTarget,
        event_type: &str,
        client: Option<(f64, f64)>,
    ) -> EventState {
        let mut event = EventState::new(event_type, target);
        if let Some((x, y)) = client {
            event = event.at(x, y);
        }

        let mut path = vec![target];
        if let EventTarget::Node(node) = target {
            if events::bubbles(event_type) {
                let mut cursor = self.page.dom.parent(node);
                while let Some(parent) = cursor {
                    path.push(EventTarget::Node(parent));
                    cursor = self.page.dom.parent(parent);
                }
            }
        }

        let mut invoked = 0usize;
        for current in path {
            event.current_target = current;
            for handler in self.listeners.get(current, event_type) {
                invoked += 1;
                if let Err(err) = self.controller.handle(&mut self.page, handler, &mut event) {
                    let now = self.page.now_ms();
                    self.page.console.page_error(&err, event_type, now);
                }
            }
        }

        let target_label = self.target_label(event.target);
        let current_label = self.target_label(event.current_target);
        self.page.trace.event_line(format!(
            "[event] done {} target={} current={} listeners={} default_prevented={}",
            event.event_type, target_label, current_label, invoked, event.default_prevented
        ));
        event
    }

    fn target_label(&self, target: EventTarget) -> String {
        match target {
            EventTarget::Window => "window".into(),
            EventTarget::Node(node) => self.page.dom.node_label(node),
        }
    }

    pub fn now_ms(&self) -> i64 {
        self.page.now_ms()
    }

    pub fn clear_timer(&mut self, timer_id: i64) -> bool {
        let cleared = self.page.timers.clear(timer_id) > 0;
        self.page
            .trace
            .timer_line(format!("[timer] clear id={timer_id} existed={cleared}"));
        cleared
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.page.timers.clear_all();
        self.page
            .trace
            .timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.page.timers.pending()
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.page.now_ms();
        let to = from.saturating_add(delta_ms);
        let ran = self.run_timers_until(to)?;
        self.page.trace.timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={to} ran_due={ran}"
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let from = self.page.now_ms();
        if target_ms < from {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={from})"
            )));
        }
        let ran = self.run_timers_until(target_ms)?;
        self.page.trace.timer_line(format!(
            "[timer] advance_to from={from} to={target_ms} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs everything due up to `target_ms`, each at its own due time, then
    /// leaves the clock at `target_ms`.
    fn run_timers_until(&mut self, target_ms: i64) -> Result<usize> {
        let ran = self.run_timer_queue(Some(target_ms), true)?;
        self.page.timers.set_now(target_ms);
        Ok(ran)
    }

    /// Runs every pending timer, moving the clock forward as needed. Fails
    /// when the step limit is hit, e.g. on a live interval.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.page.now_ms();
        let ran = self.run_timer_queue(None, true)?;
        self.page.trace.timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.page.now_ms()
        ));
        Ok(())
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.page.timers.pop_next(None, true) else {
            self.page.trace.timer_line("[timer] run_next none".into());
            return Ok(false);
        };
        self.execute_timer_task(task);
        Ok(true)
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let now = self.page.now_ms();
        let ran = self.run_timer_queue(Some(now), false)?;
        self.page
            .trace
            .timer_line(format!("[timer] run_due now_ms={now} ran={ran}"));
        Ok(ran)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while self.page.timers.has_next(due_limit) {
            steps += 1;
            if steps > self.timer_step_limit {
                return Err(self.timer_step_limit_error(steps, due_limit));
            }
            let Some(task) = self.page.timers.pop_next(due_limit, advance_clock) else {
                break;
            };
            self.execute_timer_task(task);
        }
        Ok(steps)
    }

    fn timer_step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        Error::Runtime(format!(
            "flush exceeded max task steps (possible uncleared setInterval): limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}, next_task={}",
            self.timer_step_limit,
            self.page.now_ms(),
            self.page.timers.len(),
            self.page.timers.describe_next(due_limit)
        ))
    }

    fn execute_timer_task(&mut self, task: timers::ScheduledTask) {
        let interval_desc = task
            .interval_ms
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        self.page.trace.timer_line(format!(
            "[timer] run id={} task={} due_at={} interval_ms={} now_ms={}",
            task.id,
            task.task.label(),
            task.due_at,
            interval_desc,
            self.page.now_ms()
        ));

        let result = stacker::grow(STACK_SIZE, || {
            self.controller.run_task(&mut self.page, &task.task)
        });
        if let Err(err) = result {
            let now = self.page.now_ms();
            self.page.console.page_error(&err, task.task.label(), now);
        }

        if let Some(requeued) = self.page.timers.requeue(task) {
            self.page.trace.timer_line(format!(
                "[timer] requeue id={} due_at={} interval_ms={}",
                requeued.id,
                requeued.due_at,
                requeued.interval_ms.unwrap_or(0)
            ));
        }
    }

    pub fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.page.dom.query_selector(selector)?.is_some())
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.page.dom.query_selector_all(selector)?.len())
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.page.dom.text_content(target))
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.page.dom.attr(target, name))
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.page.dom.class_contains(target, class_name)
    }

    /// Inline style property, camelCase or kebab-case; empty when unset.
    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.page.dom.style_get(target, property)
    }

    /// Whether the element matching `selector` still waits for its reveal.
    pub fn is_reveal_pending(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.controller.is_observing(target))
    }

    /// Fragment of the first nav link currently marked active.
    pub fn active_nav_target(&self) -> Result<Option<String>> {
        let active = self.page.dom.query_selector(".nav-link.active")?;
        Ok(active.and_then(|link| self.page.dom.attr(link, "href")))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.page.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.page.dom.class_contains(target, class_name)?;
        if actual != expected {
            let describe = |present: bool| {
                if present {
                    format!("class {class_name}")
                } else {
                    format!("no class {class_name}")
                }
            };
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: describe(expected),
                actual: describe(actual),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.page.dom.style_get(target, property)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected}"),
                actual: format!("{property}: {actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.page.dom.dump_node(target))
    }

    pub fn console_messages(&self) -> &[ConsoleMessage] {
        self.page.console.messages()
    }

    pub fn console_errors(&self) -> Vec<&ConsoleMessage> {
        self.page.console.errors()
    }

    pub fn page_errors(&self) -> &[PageError] {
        self.page.console.page_errors()
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.page
            .dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.page.dom.dump_node(node_id), 200)
    }
}
