use super::*;
use crate::geometry::{format_number, format_px};
use unicode_normalization::UnicodeNormalization;

const ACTIVE_CLASS: &str = "active";
const LOADED_CLASS: &str = "loaded";
const RIPPLE_KEYFRAMES: &str = "
    @keyframes ripple {
        to {
            transform: scale(4);
            opacity: 0;
        }
    }
";
const RIPPLE_CSS: &str = "position: absolute; background: rgba(56, 189, 248, 0.3); \
    border-radius: 50%; transform: scale(0); animation: ripple 0.6s linear; \
    pointer-events: none;";
const PROGRESS_BAR_CSS: &str = "position: fixed; top: 0; left: 0; height: 3px; \
    background: linear-gradient(90deg, #38bdf8, #818cf8); z-index: 1001; \
    transition: width 0.1s ease;";
const NAVBAR_SOLID_BACKGROUND: &str = "rgba(15, 23, 42, 0.95)";
const NAVBAR_SOLID_SHADOW: &str = "0 4px 20px rgba(0, 0, 0, 0.3)";
const NAVBAR_CLEAR_BACKGROUND: &str = "rgba(15, 23, 42, 0.9)";
const BUTTON_TRANSITION: &str = "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)";

#[derive(Debug, Clone)]
struct TypingState {
    target: NodeId,
    chars: Vec<char>,
    next: usize,
}

/// Page behaviour bound to one document. Element lists are captured once at
/// install; geometry and attributes are re-read on every callback.
#[derive(Debug, Clone)]
pub(crate) struct PageController {
    config: SiteConfig,
    nav_toggle: Option<NodeId>,
    nav_menu: Option<NodeId>,
    navbar: Option<NodeId>,
    nav_links: Vec<NodeId>,
    sections: Vec<NodeId>,
    highlighter: ScrollHighlighter,
    reveal: RevealAnimator,
    role_items: Vec<NodeId>,
    current_role: usize,
    typing: Option<TypingState>,
    orbs: Vec<NodeId>,
    progress_bar: Option<NodeId>,
    body: Option<NodeId>,
}

impl PageController {
    pub(crate) fn install(
        page: &mut Page,
        listeners: &mut ListenerStore,
        config: SiteConfig,
    ) -> Result<Self> {
        let dom = &page.dom;
        let observer =
            IntersectionObserver::new(config.reveal.threshold, config.root_margin()?);
        let mut controller = Self {
            nav_toggle: dom.query_selector(".nav-toggle")?,
            nav_menu: dom.query_selector(".nav-menu")?,
            navbar: dom.query_selector(".navbar")?,
            nav_links: dom.query_selector_all(".nav-link")?,
            sections: dom.query_selector_all("section[id]")?,
            highlighter: ScrollHighlighter::new(config.nav.highlight_lookahead),
            reveal: RevealAnimator::new(observer, config.reveal.stagger_ms),
            role_items: dom.query_selector_all(".role-item")?,
            current_role: 0,
            typing: None,
            orbs: dom.query_selector_all(".gradient-orb")?,
            progress_bar: None,
            body: dom.first_by_tag("body"),
            config,
        };

        controller.install_navigation(page, listeners)?;
        controller.install_reveal(page)?;
        controller.install_smooth_scroll(page, listeners)?;
        controller.install_role_rotation(page);
        controller.install_hover_effects(page, listeners)?;
        controller.install_ripple(page, listeners)?;
        if !controller.orbs.is_empty() {
            listeners.add(EventTarget::Window, "scroll", Handler::Parallax);
        }
        controller.install_typing(page)?;
        for button in page.dom.query_selector_all(".btn")? {
            listeners.add(EventTarget::Node(button), "mouseenter", Handler::ButtonTransition);
        }
        controller.install_floating_cards(page)?;
        controller.install_progress_bar(page, listeners)?;
        listeners.add(EventTarget::Window, "load", Handler::MarkLoaded);

        page.log(
            ConsoleLevel::Log,
            "%c\u{1f44b} Welcome to the resume",
            &["color: #38bdf8; font-size: 20px; font-weight: bold;"],
        );
        page.log(
            ConsoleLevel::Log,
            "%cBuilt with HTML, CSS & JavaScript",
            &["color: #818cf8; font-size: 14px;"],
        );

        tracing::debug!(
            nav_links = controller.nav_links.len(),
            sections = controller.sections.len(),
            animated = controller.reveal.observed_count(),
            roles = controller.role_items.len(),
            "page behaviour installed"
        );
        Ok(controller)
    }

    fn install_navigation(&mut self, page: &Page, listeners: &mut ListenerStore) -> Result<()> {
        match (self.nav_toggle, self.nav_menu) {
            (Some(toggle), Some(_)) => {
                listeners.add(EventTarget::Node(toggle), "click", Handler::ToggleNav);
            }
            _ => tracing::debug!("nav toggle or menu missing, mobile navigation disabled"),
        }
        for link in &self.nav_links {
            listeners.add(EventTarget::Node(*link), "click", Handler::CloseNav);
        }
        if self.navbar.is_some() {
            listeners.add(EventTarget::Window, "scroll", Handler::NavbarScroll);
        }
        listeners.add(EventTarget::Window, "scroll", Handler::HighlightNav);
        tracing::trace!(title = %page.title, "navigation listeners registered");
        Ok(())
    }

    fn install_reveal(&mut self, page: &Page) -> Result<()> {
        let targets = page.dom.query_selector_all("[data-animate]")?;
        self.reveal.register(&targets);
        Ok(())
    }

    fn install_smooth_scroll(&self, page: &Page, listeners: &mut ListenerStore) -> Result<()> {
        for anchor in page.dom.query_selector_all(r##"a[href^="#"]"##)? {
            listeners.add(EventTarget::Node(anchor), "click", Handler::SmoothScroll);
        }
        Ok(())
    }

    fn install_role_rotation(&self, page: &mut Page) {
        if self.role_items.is_empty() {
            tracing::debug!("no role items, role rotation disabled");
            return;
        }
        page.schedule_timeout(Task::StartRoleRotation, self.config.effects.role_start_ms);
    }

    fn install_hover_effects(&self, page: &Page, listeners: &mut ListenerStore) -> Result<()> {
        for tag in page.dom.query_selector_all(".skill-tag")? {
            let target = EventTarget::Node(tag);
            listeners.add(target, "mouseenter", Handler::SkillHover { enter: true });
            listeners.add(target, "mouseleave", Handler::SkillHover { enter: false });
        }
        for item in page.dom.query_selector_all(".quality-item")? {
            let target = EventTarget::Node(item);
            listeners.add(target, "mouseenter", Handler::QualityHover { enter: true });
            listeners.add(target, "mouseleave", Handler::QualityHover { enter: false });
        }
        Ok(())
    }

    fn install_ripple(&self, page: &mut Page, listeners: &mut ListenerStore) -> Result<()> {
        for card in page.dom.query_selector_all(".contact-card")? {
            listeners.add(EventTarget::Node(card), "click", Handler::Ripple);
        }

        let style = page.dom.create_detached_element("style");
        page.dom.set_text_content(style, RIPPLE_KEYFRAMES)?;
        let parent = page
            .dom
            .first_by_tag("head")
            .or(self.body)
            .unwrap_or(page.dom.root);
        page.dom.append_child(parent, style)
    }

    fn install_typing(&mut self, page: &mut Page) -> Result<()> {
        let Some(target) = page.dom.query_selector(".hero-description")? else {
            tracing::debug!("no hero description, typing effect disabled");
            return Ok(());
        };
        let chars = page.dom.text_content(target).nfc().collect::<Vec<_>>();
        page.dom.set_text_content(target, "")?;
        page.dom.style_set(target, "opacity", "1")?;
        self.typing = Some(TypingState {
            target,
            chars,
            next: 0,
        });
        page.schedule_timeout(Task::TypeNextChar, self.config.effects.typing_start_ms);
        Ok(())
    }

    fn install_floating_cards(&self, page: &mut Page) -> Result<()> {
        let step = self.config.effects.floating_card_step_s;
        for (index, card) in page.dom.query_selector_all(".floating-card")?.into_iter().enumerate()
        {
            let delay = format!("{}s", format_number(index as f64 * step));
            page.dom.style_set(card, "animationDelay", &delay)?;
        }
        Ok(())
    }

    fn install_progress_bar(&mut self, page: &mut Page, listeners: &mut ListenerStore) -> Result<()> {
        let bar = page.dom.create_detached_element("div");
        page.dom.set_attr(bar, "class", "scroll-progress")?;
        page.dom.set_css_text(bar, PROGRESS_BAR_CSS)?;
        let parent = self.body.unwrap_or(page.dom.root);
        page.dom.append_child(parent, bar)?;
        self.progress_bar = Some(bar);
        listeners.add(EventTarget::Window, "scroll", Handler::Progress);
        Ok(())
    }

    pub(crate) fn handle(
        &mut self,
        page: &mut Page,
        handler: Handler,
        event: &mut EventState,
    ) -> Result<()> {
        match handler {
            Handler::ToggleNav => {
                if let (Some(toggle), Some(menu)) = (self.nav_toggle, self.nav_menu) {
                    page.dom.class_toggle(toggle, ACTIVE_CLASS)?;
                    page.dom.class_toggle(menu, ACTIVE_CLASS)?;
                }
                Ok(())
            }
            Handler::CloseNav => {
                for node in [self.nav_toggle, self.nav_menu].into_iter().flatten() {
                    page.dom.class_remove(node, ACTIVE_CLASS)?;
                }
                Ok(())
            }
            Handler::NavbarScroll => self.update_navbar(page),
            Handler::HighlightNav => {
                let offset = page.viewport.scroll_y;
                let active =
                    self.highlighter
                        .apply(&mut page.dom, &self.sections, &self.nav_links, offset)?;
                page.trace.event_line(format!(
                    "[event] highlight scroll_y={} active={}",
                    format_number(offset),
                    active.as_deref().unwrap_or("none")
                ));
                Ok(())
            }
            Handler::SmoothScroll => self.smooth_scroll(page, event),
            Handler::SkillHover { enter } => {
                let transform = if enter { "scale(1.05)" } else { "scale(1)" };
                page.dom.style_set(event.current_node()?, "transform", transform)
            }
            Handler::QualityHover { enter } => {
                let background = if enter {
                    "rgba(56, 189, 248, 0.1)"
                } else {
                    "rgba(30, 41, 59, 0.8)"
                };
                page.dom.style_set(event.current_node()?, "background", background)
            }
            Handler::ButtonTransition => {
                page.dom.style_set(event.current_node()?, "transition", BUTTON_TRANSITION)
            }
            Handler::Ripple => self.ripple(page, event),
            Handler::Parallax => {
                let scroll_y = page.viewport.scroll_y;
                let factor = self.config.effects.parallax_factor;
                for (index, orb) in self.orbs.iter().enumerate() {
                    let speed = factor * (index + 1) as f64;
                    let transform = format!("translateY({})", format_px(scroll_y * speed));
                    page.dom.style_set(*orb, "transform", &transform)?;
                }
                Ok(())
            }
            Handler::Progress => self.update_progress(page),
            Handler::MarkLoaded => match self.body {
                Some(body) => page.dom.class_add(body, LOADED_CLASS),
                None => Ok(()),
            },
        }
    }

    fn update_navbar(&self, page: &mut Page) -> Result<()> {
        let Some(navbar) = self.navbar else {
            return Ok(());
        };
        if page.viewport.scroll_y > self.config.nav.navbar_scroll_threshold {
            page.dom.style_set(navbar, "background", NAVBAR_SOLID_BACKGROUND)?;
            page.dom.style_set(navbar, "boxShadow", NAVBAR_SOLID_SHADOW)
        } else {
            page.dom.style_set(navbar, "background", NAVBAR_CLEAR_BACKGROUND)?;
            page.dom.style_set(navbar, "boxShadow", "none")
        }
    }

    fn smooth_scroll(&self, page: &mut Page, event: &mut EventState) -> Result<()> {
        event.default_prevented = true;
        let anchor = event.current_node()?;
        let href = page.dom.attr(anchor, "href").unwrap_or_default();
        let Some(target) = page.dom.query_selector(&href)? else {
            return Ok(());
        };
        let scroll_y = page.viewport.scroll_y;
        let element_position = page.dom.bounding_client_rect(target, scroll_y)?.top;
        let offset_position = element_position + scroll_y - self.config.nav.header_offset;
        page.request_scroll(offset_position);
        Ok(())
    }

    fn ripple(&self, page: &mut Page, event: &EventState) -> Result<()> {
        let card = event.current_node()?;
        let rect = page.dom.bounding_client_rect(card, page.viewport.scroll_y)?;
        let size = rect.width.max(rect.height);

        let ripple = page.dom.create_detached_element("span");
        page.dom.set_attr(ripple, "class", "ripple")?;
        page.dom.set_css_text(ripple, RIPPLE_CSS)?;
        page.dom.style_set(ripple, "width", &format_px(size))?;
        page.dom.style_set(ripple, "height", &format_px(size))?;
        let left = event.client_x - rect.left - size / 2.0;
        let top = event.client_y - rect.top - size / 2.0;
        page.dom.style_set(ripple, "left", &format_px(left))?;
        page.dom.style_set(ripple, "top", &format_px(top))?;

        page.dom.style_set(card, "position", "relative")?;
        page.dom.style_set(card, "overflow", "hidden")?;
        page.dom.append_child(card, ripple)?;

        page.schedule_timeout(Task::RemoveNode(ripple), self.config.effects.ripple_ms);
        Ok(())
    }

    fn update_progress(&self, page: &mut Page) -> Result<()> {
        let Some(bar) = self.progress_bar else {
            return Ok(());
        };
        let scrollable = page.document_height() - page.viewport.height;
        let progress = if scrollable > 0.0 {
            page.viewport.scroll_y / scrollable * 100.0
        } else {
            0.0
        };
        page.dom
            .style_set(bar, "width", &format!("{}%", format_number(progress)))
    }

    /// Runs one observer check and schedules the reveals of its batch.
    pub(crate) fn check_intersections(&mut self, page: &mut Page) -> usize {
        let entries = self.reveal.check(&page.dom, &page.viewport);
        if entries.is_empty() {
            return 0;
        }
        for entry in &entries {
            let label = page.dom.node_label(entry.target);
            page.trace.observer_line(format!(
                "[observer] entry target={} intersecting={} ratio={}",
                label,
                entry.is_intersecting,
                format_number(entry.ratio)
            ));
        }
        let planned = self.reveal.plan_batch(&entries);
        page.trace.observer_line(format!(
            "[observer] batch entries={} intersecting={} scroll_y={}",
            entries.len(),
            planned.len(),
            format_number(page.viewport.scroll_y)
        ));
        for (target, delay) in &planned {
            page.schedule_timeout(Task::Reveal(*target), *delay);
        }
        planned.len()
    }

    pub(crate) fn is_observing(&self, target: NodeId) -> bool {
        self.reveal.is_observing(target)
    }

    pub(crate) fn run_task(&mut self, page: &mut Page, task: &Task) -> Result<()> {
        match task {
            Task::Reveal(target) => {
                reveal::reveal(&mut page.dom, *target)?;
                Ok(())
            }
            Task::StartRoleRotation => {
                self.animate_roles(page)?;
                page.schedule_interval(Task::RotateRole, self.config.effects.role_interval_ms);
                Ok(())
            }
            Task::RotateRole => self.animate_roles(page),
            Task::TypeNextChar => self.type_next_char(page),
            Task::RemoveNode(node) => page.dom.remove_node(*node),
        }
    }

    fn animate_roles(&mut self, page: &mut Page) -> Result<()> {
        if self.role_items.is_empty() {
            return Ok(());
        }
        for item in &self.role_items {
            page.dom.style_set(*item, "opacity", "0")?;
            page.dom.style_set(*item, "transform", "translateY(20px)")?;
        }
        let current = self.role_items[self.current_role % self.role_items.len()];
        page.dom.style_set(current, "opacity", "1")?;
        page.dom.style_set(current, "transform", "translateY(0)")?;
        self.current_role = (self.current_role + 1) % self.role_items.len();
        Ok(())
    }

    fn type_next_char(&mut self, page: &mut Page) -> Result<()> {
        let Some(typing) = self.typing.as_mut() else {
            return Ok(());
        };
        let Some(ch) = typing.chars.get(typing.next).copied() else {
            return Ok(());
        };
        let mut text = page.dom.text_content(typing.target);
        text.push(ch);
        page.dom.set_text_content(typing.target, &text)?;
        typing.next += 1;
        if typing.next < typing.chars.len() {
            page.schedule_timeout(Task::TypeNextChar, self.config.effects.typing_step_ms);
        }
        Ok(())
    }
}
