use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventTarget {
    Window,
    Node(NodeId),
}

/// Page listeners. Each variant is one `addEventListener` callback of the
/// page behaviour, run by [`PageController::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    ToggleNav,
    CloseNav,
    NavbarScroll,
    HighlightNav,
    SmoothScroll,
    SkillHover { enter: bool },
    QualityHover { enter: bool },
    ButtonTransition,
    Ripple,
    Parallax,
    Progress,
    MarkLoaded,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<EventTarget, HashMap<String, Vec<Handler>>>,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, target: EventTarget, event: &str, handler: Handler) {
        self.map
            .entry(target)
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    pub(crate) fn get(&self, target: EventTarget, event: &str) -> Vec<Handler> {
        self.map
            .get(&target)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }
}

/// Events that bubble from a node target through its ancestors.
pub(crate) fn bubbles(event_type: &str) -> bool {
    !matches!(event_type, "mouseenter" | "mouseleave" | "scroll" | "load")
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: EventTarget,
    pub(crate) current_target: EventTarget,
    pub(crate) default_prevented: bool,
    pub(crate) client_x: f64,
    pub(crate) client_y: f64,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: EventTarget) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
            client_x: 0.0,
            client_y: 0.0,
        }
    }

    pub(crate) fn at(mut self, client_x: f64, client_y: f64) -> Self {
        self.client_x = client_x;
        self.client_y = client_y;
        self
    }

    pub(crate) fn current_node(&self) -> Result<NodeId> {
        match self.current_target {
            EventTarget::Node(node) => Ok(node),
            EventTarget::Window => Err(Error::Runtime(format!(
                "{} listener expects an element target",
                self.event_type
            ))),
        }
    }
}
