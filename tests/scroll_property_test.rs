use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};
use resume_page::{Harness, Rect, ScrollHighlighter, SectionExtent, SiteConfig};

const SCROLL_PROPTEST_REGRESSION_FILE: &str = "tests/proptest-regressions/scroll_property_test.txt";
const DEFAULT_SCROLL_PROPTEST_CASES: u32 = 64;
const FOOTER_TOP: f64 = 5000.0;

fn env_proptest_cases(var_name: &str, default_cases: u32) -> u32 {
    std::env::var(var_name)
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default_cases)
}

fn scroll_proptest_cases() -> u32 {
    std::env::var("RESUME_PAGE_SCROLL_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or_else(|| {
            env_proptest_cases("RESUME_PAGE_PROPTEST_CASES", DEFAULT_SCROLL_PROPTEST_CASES)
        })
}

fn fail(err: resume_page::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

/// `(top, height)` pairs for up to six sections, overlaps allowed.
fn section_layout_strategy() -> BoxedStrategy<Vec<(f64, f64)>> {
    vec((0u16..4500, 1u16..900), 1..=6)
        .prop_map(|sections| {
            sections
                .into_iter()
                .map(|(top, height)| (f64::from(top), f64::from(height)))
                .collect()
        })
        .boxed()
}

fn sections_page(sections: &[(f64, f64)]) -> String {
    let links = (0..sections.len())
        .map(|index| format!(r##"<a class="nav-link" href="#s{index}">{index}</a>"##))
        .collect::<String>();
    let bodies = (0..sections.len())
        .map(|index| format!(r#"<section id="s{index}"></section>"#))
        .collect::<String>();
    format!(r#"<nav class="navbar">{links}</nav>{bodies}<footer id="end"></footer>"#)
}

fn load_sections(sections: &[(f64, f64)]) -> resume_page::Result<Harness> {
    let selectors = (0..sections.len())
        .map(|index| format!("#s{index}"))
        .collect::<Vec<_>>();
    let mut layout = selectors
        .iter()
        .zip(sections)
        .map(|(selector, (top, height))| (selector.as_str(), Rect::block(*top, *height, 1280.0)))
        .collect::<Vec<_>>();
    layout.push(("#end", Rect::block(FOOTER_TOP, 100.0, 1280.0)));
    Harness::from_html_with_layout(&sections_page(sections), SiteConfig::default(), &layout)
}

fn assert_single_active_link(sections: &[(f64, f64)], offsets: &[f64]) -> TestCaseResult {
    let mut harness = load_sections(sections).map_err(fail)?;
    let extents = sections
        .iter()
        .enumerate()
        .map(|(index, (top, height))| SectionExtent::new(format!("s{index}"), *top, *height))
        .collect::<Vec<_>>();
    let highlighter = ScrollHighlighter::default();

    for (step, offset) in offsets.iter().enumerate() {
        harness.scroll_to(*offset).map_err(fail)?;
        let active_links = harness.count(".nav-link.active").map_err(fail)?;
        prop_assert!(
            active_links <= 1,
            "{active_links} active links after step {step}: offsets={offsets:?}"
        );

        let expected = highlighter
            .active_section(harness.scroll_y(), &extents)
            .map(SectionExtent::fragment);
        let actual = harness.active_nav_target().map_err(fail)?;
        prop_assert_eq!(
            actual,
            expected,
            "scroll_y={} sections={:?}",
            harness.scroll_y(),
            sections
        );
    }
    Ok(())
}

const REVEAL_BLOCKS: usize = 8;

fn reveal_page() -> String {
    let blocks = (0..REVEAL_BLOCKS)
        .map(|index| format!(r#"<div id="b{index}" data-animate></div>"#))
        .collect::<String>();
    format!(r#"<main>{blocks}</main><footer id="end"></footer>"#)
}

fn assert_reveal_is_monotonic(offsets: &[f64], waits: &[i64]) -> TestCaseResult {
    let selectors = (0..REVEAL_BLOCKS)
        .map(|index| format!("#b{index}"))
        .collect::<Vec<_>>();
    // Blocks sit 600px apart, the first inside the initial viewport.
    let mut layout = selectors
        .iter()
        .enumerate()
        .map(|(index, selector)| {
            let top = 100.0 + index as f64 * 600.0;
            (selector.as_str(), Rect::block(top, 200.0, 600.0))
        })
        .collect::<Vec<_>>();
    layout.push(("#end", Rect::block(FOOTER_TOP, 100.0, 1280.0)));
    let mut harness =
        Harness::from_html_with_layout(&reveal_page(), SiteConfig::default(), &layout)
            .map_err(fail)?;

    let mut revealed = vec![false; REVEAL_BLOCKS];
    for (step, (offset, wait)) in offsets.iter().zip(waits).enumerate() {
        harness.scroll_to(*offset).map_err(fail)?;
        harness.advance_time(*wait).map_err(fail)?;
        for (index, selector) in selectors.iter().enumerate() {
            let visible = harness.has_class(selector, "visible").map_err(fail)?;
            prop_assert!(
                visible || !revealed[index],
                "{selector} lost visible at step {step}: offsets={offsets:?}"
            );
            if visible {
                prop_assert!(
                    !harness.is_reveal_pending(selector).map_err(fail)?,
                    "{selector} still observed after reveal"
                );
            }
            revealed[index] = visible;
        }
    }
    prop_assert!(harness.page_errors().is_empty());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: scroll_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(SCROLL_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn at_most_one_nav_link_tracks_active_section(
        sections in section_layout_strategy(),
        offsets in vec(1.0f64..4300.0, 1..=12),
    ) {
        assert_single_active_link(&sections, &offsets)?;
    }

    #[test]
    fn revealed_elements_stay_revealed(
        offsets in vec(0.0f64..4400.0, 1..=16),
        waits in vec(0i64..400, 16),
    ) {
        assert_reveal_is_monotonic(&offsets, &waits)?;
    }
}
