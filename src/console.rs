use super::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Error,
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Log => "log",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub text: String,
    /// Inline `%c` styles, kept apart from the text
    pub styles: Vec<String>,
    pub at_ms: i64,
}

/// Failure raised by a page listener or timer that nothing caught.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageError {
    pub message: String,
    /// Event type or timer task that was running
    pub source: String,
    pub at_ms: i64,
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (in {} at {}ms)", self.message, self.source, self.at_ms)
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Console {
    messages: Vec<ConsoleMessage>,
    page_errors: Vec<PageError>,
}

impl Console {
    /// Records a message; `%c` directives consume the trailing style arguments.
    pub(crate) fn log(&mut self, level: ConsoleLevel, format: &str, styles: &[&str], at_ms: i64) {
        let text = format.replace("%c", "");
        let used = format.matches("%c").count().min(styles.len());
        let styles = styles[..used].iter().map(|s| (*s).to_string()).collect();
        match level {
            ConsoleLevel::Error => tracing::warn!(target: "resume_page::console", "{text}"),
            _ => tracing::debug!(target: "resume_page::console", level = %level, "{text}"),
        }
        self.messages.push(ConsoleMessage {
            level,
            text,
            styles,
            at_ms,
        });
    }

    /// Uncaught errors also surface as console errors, like in a browser.
    pub(crate) fn page_error(&mut self, error: &Error, source: &str, at_ms: i64) {
        let message = error.to_string();
        self.log(ConsoleLevel::Error, &format!("Uncaught {message}"), &[], at_ms);
        self.page_errors.push(PageError {
            message,
            source: source.to_string(),
            at_ms,
        });
    }

    pub(crate) fn messages(&self) -> &[ConsoleMessage] {
        &self.messages
    }

    pub(crate) fn errors(&self) -> Vec<&ConsoleMessage> {
        self.messages
            .iter()
            .filter(|message| message.level == ConsoleLevel::Error)
            .collect()
    }

    pub(crate) fn page_errors(&self) -> &[PageError] {
        &self.page_errors
    }
}
