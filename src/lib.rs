//! Headless runtime for a single-page resume site.
//!
//! The page markup is parsed into an in-memory document, the page behaviour
//! (navigation, scroll effects, reveal animations, typing, ripples) is
//! installed as a [`Harness`]-owned controller, and events are driven with a
//! fake clock so every effect can be asserted deterministically.

use std::collections::{HashMap, HashSet};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("page runtime error: {0}")]
    Runtime(String),
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

mod config;
mod console;
mod controller;
mod dom;
mod events;
mod geometry;
mod harness;
mod highlight;
mod html;
mod observer;
mod page;
mod reveal;
mod selector;
mod smoke;
mod timers;

pub use config::{EffectsConfig, NavConfig, RevealConfig, SiteConfig, SmokeConfig, ViewportConfig};
pub use console::{ConsoleLevel, ConsoleMessage, PageError};
pub use geometry::{Rect, RootMargin};
pub use harness::Harness;
pub use highlight::{ScrollHighlighter, SectionExtent};
pub use reveal::stagger_delay;
pub use smoke::{ElementCheck, REQUIRED_SELECTORS, SmokeReport, SmokeTest};
pub use timers::PendingTimer;

use console::Console;
use controller::PageController;
use dom::{Dom, NodeId};
use events::{EventState, EventTarget, Handler, ListenerStore};
use geometry::Viewport;
use html::parse_html;
use observer::{IntersectionEntry, IntersectionObserver};
use page::Page;
use reveal::RevealAnimator;
use selector::parse_selector_groups;
use timers::{Task, TimerQueue};
