use super::*;

#[test]
fn nav_toggle_opens_and_link_click_closes_menu() -> Result<()> {
    let mut h = loaded_page()?;
    h.click(".nav-toggle")?;
    h.assert_class(".nav-toggle", "active", true)?;
    h.assert_class(".nav-menu", "active", true)?;

    h.click(".nav-toggle")?;
    h.assert_class(".nav-menu", "active", false)?;

    h.click(".nav-toggle")?;
    h.click(r##".nav-link[href="#about"]"##)?;
    h.assert_class(".nav-toggle", "active", false)?;
    h.assert_class(".nav-menu", "active", false)?;
    Ok(())
}

#[test]
fn anchor_click_scrolls_below_fixed_header() -> Result<()> {
    let mut h = loaded_page()?;
    h.click(r##".nav-link[href="#skills"]"##)?;
    assert_eq!(h.scroll_y(), 720.0);
    assert_eq!(h.active_nav_target()?.as_deref(), Some("#skills"));

    // Relative to the current offset, so a second click is stable.
    h.click(r##".nav-link[href="#skills"]"##)?;
    assert_eq!(h.scroll_y(), 720.0);

    h.click("#cta")?;
    assert_eq!(h.scroll_y(), 1020.0);
    assert_eq!(h.active_nav_target()?.as_deref(), Some("#contact"));
    assert!(h.page_errors().is_empty());
    Ok(())
}

#[test]
fn anchor_to_missing_section_does_nothing() -> Result<()> {
    let html = r##"<a id="go" href="#nowhere">go</a><section id="a"></section>"##;
    let mut h = Harness::from_html_with_layout(
        html,
        SiteConfig::default(),
        &[("#a", Rect::block(0.0, 3000.0, 1280.0))],
    )?;
    h.scroll_to(300.0)?;
    h.click("#go")?;
    assert_eq!(h.scroll_y(), 300.0);
    assert!(h.page_errors().is_empty());
    Ok(())
}

#[test]
fn bare_fragment_link_raises_page_error() -> Result<()> {
    let mut h = loaded_page()?;
    h.click("#logo")?;
    let errors = h.page_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].source, "click");
    assert!(errors[0].message.contains("unsupported selector"));

    let console_errors = h.console_errors();
    assert_eq!(console_errors.len(), 1);
    assert!(console_errors[0].text.starts_with("Uncaught "));
    assert_eq!(h.scroll_y(), 0.0);
    Ok(())
}

#[test]
fn roles_rotate_on_interval() -> Result<()> {
    let mut h = loaded_page()?;
    h.advance_time(1199)?;
    h.assert_style("#role-1", "opacity", "")?;

    h.advance_time(1)?;
    h.assert_style("#role-1", "opacity", "1")?;
    h.assert_style("#role-1", "transform", "translateY(0)")?;
    h.assert_style("#role-2", "opacity", "0")?;
    h.assert_style("#role-2", "transform", "translateY(20px)")?;

    h.advance_time_to(4200)?;
    h.assert_style("#role-1", "opacity", "0")?;
    h.assert_style("#role-2", "opacity", "1")?;

    h.advance_time_to(7200)?;
    h.assert_style("#role-1", "opacity", "1")?;
    h.assert_style("#role-2", "opacity", "0")?;
    Ok(())
}

#[test]
fn typing_effect_writes_one_character_per_tick() -> Result<()> {
    let mut h = loaded_page()?;
    h.assert_text(".hero-description", "")?;

    h.advance_time_to(1500)?;
    h.assert_text(".hero-description", "C")?;
    h.advance_time_to(1530)?;
    h.assert_text(".hero-description", "Ca")?;

    // The combining accent is composed before typing starts.
    h.advance_time_to(1590)?;
    h.assert_text(".hero-description", "Caf\u{e9}")?;
    assert!(
        h.pending_timers()
            .iter()
            .all(|timer| timer.label != "type_char")
    );
    Ok(())
}

#[test]
fn skill_tag_scales_on_hover() -> Result<()> {
    let mut h = loaded_page()?;
    h.hover("#tag-rust")?;
    h.assert_style("#tag-rust", "transform", "scale(1.05)")?;
    h.unhover("#tag-rust")?;
    h.assert_style("#tag-rust", "transform", "scale(1)")?;
    Ok(())
}

#[test]
fn hover_does_not_bubble_to_ancestors() -> Result<()> {
    let html = r#"<div class="skill-tag" id="outer"><span class="skill-tag" id="inner">x</span></div>"#;
    let mut h = Harness::from_html(html)?;
    h.hover("#inner")?;
    h.assert_style("#inner", "transform", "scale(1.05)")?;
    h.assert_style("#outer", "transform", "")?;
    Ok(())
}

#[test]
fn quality_item_background_follows_hover() -> Result<()> {
    let mut h = loaded_page()?;
    h.hover("#quality-1")?;
    h.assert_style("#quality-1", "background", "rgba(56, 189, 248, 0.1)")?;
    h.unhover("#quality-1")?;
    h.assert_style("#quality-1", "background", "rgba(30, 41, 59, 0.8)")?;
    Ok(())
}

#[test]
fn button_gets_transition_on_hover() -> Result<()> {
    let mut h = loaded_page()?;
    h.hover("#cta")?;
    h.assert_style("#cta", "transition", "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)")?;
    Ok(())
}

#[test]
fn floating_cards_get_staggered_animation_delay() -> Result<()> {
    let h = loaded_page()?;
    h.assert_style("#fc-1", "animationDelay", "0s")?;
    h.assert_style("#fc-2", "animation-delay", "0.5s")?;
    h.assert_style("#fc-3", "animation-delay", "1s")?;
    Ok(())
}

#[test]
fn contact_card_click_adds_temporary_ripple() -> Result<()> {
    let mut h = loaded_page()?;
    h.click_at("#card-email", 250.0, 1300.0)?;

    assert_eq!(h.count("#card-email > span.ripple")?, 1);
    h.assert_style("span.ripple", "width", "300px")?;
    h.assert_style("span.ripple", "height", "300px")?;
    h.assert_style("span.ripple", "left", "0px")?;
    h.assert_style("span.ripple", "top", "-50px")?;
    h.assert_style("span.ripple", "position", "absolute")?;
    h.assert_style("span.ripple", "animation", "ripple 0.6s linear")?;
    h.assert_style("#card-email", "position", "relative")?;
    h.assert_style("#card-email", "overflow", "hidden")?;
    h.assert_text("#card-email", "Email")?;

    h.advance_time(599)?;
    assert!(h.exists("span.ripple")?);
    h.advance_time(1)?;
    assert!(!h.exists("span.ripple")?);
    Ok(())
}

#[test]
fn ripple_uses_viewport_relative_card_position() -> Result<()> {
    let mut h = loaded_page()?;
    h.scroll_to(1000.0)?;
    // The card now starts 200px below the top of the viewport.
    h.click_at("#card-email", 100.0, 200.0)?;
    h.assert_style("span.ripple", "left", "-150px")?;
    h.assert_style("span.ripple", "top", "-150px")?;

    h.click("#card-email")?;
    assert_eq!(h.count("span.ripple")?, 2);
    Ok(())
}

#[test]
fn failing_listener_does_not_stop_bubbling() -> Result<()> {
    let html = r##"<div class="contact-card" id="card"><a href="#" id="broken">top</a></div>"##;
    let mut h = Harness::from_html(html)?;
    h.click("#broken")?;
    assert_eq!(h.page_errors().len(), 1);
    assert_eq!(h.count("#card > span.ripple")?, 1);
    Ok(())
}
