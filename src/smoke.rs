use super::*;
use std::path::Path;

/// Elements the page must render.
pub const REQUIRED_SELECTORS: [&str; 5] = [".hero", "#about", "#skills", "#contact", ".nav-toggle"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementCheck {
    pub selector: String,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmokeReport {
    pub title: String,
    pub checks: Vec<ElementCheck>,
    pub nav_link_count: usize,
    pub skill_tag_count: usize,
    pub console_errors: Vec<String>,
    pub page_errors: Vec<String>,
    /// Fake time at which the checks ran
    pub finished_at_ms: i64,
}

impl SmokeReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.exists)
            && self.console_errors.is_empty()
            && self.page_errors.is_empty()
    }

    /// Human-readable reasons the report did not pass.
    pub fn failures(&self) -> Vec<String> {
        let mut failures = self
            .checks
            .iter()
            .filter(|check| !check.exists)
            .map(|check| format!("missing element {}", check.selector))
            .collect::<Vec<_>>();
        failures.extend(
            self.console_errors
                .iter()
                .map(|message| format!("console error: {message}")),
        );
        failures.extend(
            self.page_errors
                .iter()
                .map(|message| format!("page error: {message}")),
        );
        failures
    }

    pub fn log(&self) {
        tracing::info!("page title: {}", self.title);
        for check in &self.checks {
            tracing::info!("{} exists: {}", check.selector, check.exists);
        }
        tracing::info!("navigation links count: {}", self.nav_link_count);
        tracing::info!("skill tags count: {}", self.skill_tag_count);
        if self.console_errors.is_empty() && self.page_errors.is_empty() {
            tracing::info!("no console errors found");
        }
        for (index, message) in self.console_errors.iter().enumerate() {
            tracing::warn!("console error {}: {message}", index + 1);
        }
        for (index, message) in self.page_errors.iter().enumerate() {
            tracing::warn!("page error {}: {message}", index + 1);
        }
        if self.passed() {
            tracing::info!("all checks passed");
        } else {
            tracing::warn!(failures = self.failures().len(), "smoke test failed");
        }
    }
}

/// Loads a page, lets its start-up animations run, then inspects it.
#[derive(Debug, Clone, Default)]
pub struct SmokeTest {
    config: SiteConfig,
}

impl SmokeTest {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<SmokeReport> {
        let harness = Harness::from_file(path, self.config.clone())?;
        self.inspect(harness)
    }

    pub fn run_html(&self, html: &str) -> Result<SmokeReport> {
        let harness = Harness::from_html_with_config(html, self.config.clone())?;
        self.inspect(harness)
    }

    fn inspect(&self, mut harness: Harness) -> Result<SmokeReport> {
        tracing::info!("page loaded");
        harness.advance_time(self.config.smoke.wait_ms)?;
        for y in &self.config.smoke.scroll_steps {
            harness.scroll_to(*y)?;
        }

        let checks = REQUIRED_SELECTORS
            .iter()
            .map(|selector| {
                Ok(ElementCheck {
                    selector: (*selector).to_string(),
                    exists: harness.exists(selector)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SmokeReport {
            title: harness.title().to_string(),
            checks,
            nav_link_count: harness.count(".nav-link")?,
            skill_tag_count: harness.count(".skill-tag")?,
            console_errors: harness
                .console_errors()
                .into_iter()
                .map(|message| message.text.clone())
                .collect(),
            page_errors: harness
                .page_errors()
                .iter()
                .map(ToString::to_string)
                .collect(),
            finished_at_ms: harness.now_ms(),
        })
    }
}
