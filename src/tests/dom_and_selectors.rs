use super::*;

fn parse(html: &str) -> Result<Dom> {
    Ok(parse_html(html)?.dom)
}

fn ids(dom: &Dom, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| dom.attr(*node, "id").unwrap_or_default())
        .collect()
}

#[test]
fn parser_builds_tree_and_title() -> Result<()> {
    let parsed = parse_html(
        "<!DOCTYPE html><html><head><title> A &amp; B </title></head>\
         <body><!-- note --><p id='p'>x &lt; y<br>z</p></body></html>",
    )?;
    assert_eq!(parsed.title, "A & B");
    let p = parsed.dom.by_id("p").ok_or(Error::SelectorNotFound("#p".into()))?;
    assert_eq!(parsed.dom.text_content(p), "x < yz");
    assert_eq!(parsed.dom.tag_name(p), Some("p"));
    Ok(())
}

#[test]
fn parser_keeps_script_bodies_as_text() -> Result<()> {
    let dom = parse("<div id='a'></div><script>if (a < b) { run('</div>'); }</script>")?;
    let script = dom
        .query_selector("script")?
        .ok_or(Error::SelectorNotFound("script".into()))?;
    assert_eq!(dom.text_content(script), "if (a < b) { run('</div>'); }");
    Ok(())
}

#[test]
fn parser_tolerates_stray_markup() -> Result<()> {
    let dom = parse("<div id='a'>1 < 2</span></div><p id='b' hidden>ok</p>")?;
    let a = dom.by_id("a").ok_or(Error::SelectorNotFound("#a".into()))?;
    assert_eq!(dom.text_content(a), "1 < 2");
    let b = dom.by_id("b").ok_or(Error::SelectorNotFound("#b".into()))?;
    assert_eq!(dom.attr(b, "hidden"), Some(String::new()));
    Ok(())
}

#[test]
fn parser_rejects_unclosed_comment() {
    assert!(matches!(
        parse_html("<p>a</p><!-- never closed"),
        Err(Error::HtmlParse(_))
    ));
}

#[test]
fn selectors_used_by_the_page_match() -> Result<()> {
    let dom = parse(
        r##"<nav class="navbar">
             <a id="l1" class="nav-link active" href="#about"></a>
             <a id="l2" class="nav-link" href="#skills"></a>
             <a id="ext" href="https://example.com"></a>
           </nav>
           <section id="about"><div id="d1" data-animate></div></section>
           <section><div id="d2" data-animate="fade"></div></section>"##,
    )?;

    assert_eq!(ids(&dom, &dom.query_selector_all(".nav-link")?), ["l1", "l2"]);
    assert_eq!(ids(&dom, &dom.query_selector_all(r##"a[href^="#"]"##)?), ["l1", "l2"]);
    assert_eq!(ids(&dom, &dom.query_selector_all("section[id]")?), ["about"]);
    assert_eq!(ids(&dom, &dom.query_selector_all("[data-animate]")?), ["d1", "d2"]);
    assert_eq!(ids(&dom, &dom.query_selector_all(".nav-link.active")?), ["l1"]);
    assert_eq!(
        ids(&dom, &dom.query_selector_all(r##"a[href="#skills"]"##)?),
        ["l2"]
    );
    Ok(())
}

#[test]
fn combinators_and_groups_match() -> Result<()> {
    let dom = parse(
        "<ul id='list'><li id='a'></li><li id='b'><span id='s'></span></li><li id='c'></li></ul>",
    )?;
    assert_eq!(ids(&dom, &dom.query_selector_all("ul > li")?), ["a", "b", "c"]);
    assert_eq!(ids(&dom, &dom.query_selector_all("ul span")?), ["s"]);
    assert_eq!(ids(&dom, &dom.query_selector_all("#a + li")?), ["b"]);
    assert_eq!(ids(&dom, &dom.query_selector_all("#a ~ li")?), ["b", "c"]);
    assert_eq!(ids(&dom, &dom.query_selector_all("#c, #a")?), ["a", "c"]);
    assert!(dom.query_selector_all("ul > span")?.is_empty());
    Ok(())
}

#[test]
fn bare_fragment_is_unsupported() -> Result<()> {
    let dom = parse("<p></p>")?;
    for selector in ["#", "", "> p", "p >", "a[href"] {
        assert!(
            matches!(
                dom.query_selector(selector),
                Err(Error::UnsupportedSelector(_))
            ),
            "{selector:?} should be unsupported"
        );
    }
    Ok(())
}

#[test]
fn class_list_operations() -> Result<()> {
    let mut dom = parse("<div id='d' class='a  b'></div>")?;
    let d = dom.by_id("d").ok_or(Error::SelectorNotFound("#d".into()))?;
    dom.class_add(d, "c")?;
    dom.class_add(d, "a")?;
    assert_eq!(dom.attr(d, "class").as_deref(), Some("a b c"));
    assert!(!dom.class_toggle(d, "b")?);
    assert!(dom.class_toggle(d, "b")?);
    dom.class_remove(d, "a")?;
    assert!(!dom.class_contains(d, "a")?);
    assert_eq!(dom.attr(d, "class").as_deref(), Some("c b"));
    Ok(())
}

#[test]
fn inline_style_uses_css_property_names() -> Result<()> {
    let mut dom = parse("<div id='d' style='color: red'></div>")?;
    let d = dom.by_id("d").ok_or(Error::SelectorNotFound("#d".into()))?;
    dom.style_set(d, "boxShadow", "none")?;
    dom.style_set(d, "color", "blue")?;
    assert_eq!(dom.attr(d, "style").as_deref(), Some("color: blue; box-shadow: none;"));
    assert_eq!(dom.style_get(d, "box-shadow")?, "none");
    dom.style_set(d, "color", "")?;
    assert_eq!(dom.style_get(d, "color")?, "");

    dom.set_css_text(d, "\n  position: absolute;\n  top: 0;\n")?;
    assert_eq!(dom.attr(d, "style").as_deref(), Some("position: absolute; top: 0;"));
    Ok(())
}

#[test]
fn removed_nodes_leave_queries_and_id_index() -> Result<()> {
    let mut dom = parse("<div id='outer'><span id='inner' class='x'></span></div>")?;
    let inner = dom.by_id("inner").ok_or(Error::SelectorNotFound("#inner".into()))?;
    dom.remove_node(inner)?;
    assert!(!dom.is_connected(inner));
    assert_eq!(dom.by_id("inner"), None);
    assert!(dom.query_selector_all(".x")?.is_empty());
    // Removing twice is harmless.
    dom.remove_node(inner)?;
    Ok(())
}

#[test]
fn append_child_rejects_cycles() -> Result<()> {
    let mut dom = parse("<div id='outer'><div id='inner'></div></div>")?;
    let outer = dom.by_id("outer").ok_or(Error::SelectorNotFound("#outer".into()))?;
    let inner = dom.by_id("inner").ok_or(Error::SelectorNotFound("#inner".into()))?;
    assert!(matches!(dom.append_child(inner, outer), Err(Error::Runtime(_))));

    let span = dom.create_detached_element("SPAN");
    dom.set_attr(span, "id", "late")?;
    assert_eq!(dom.by_id("late"), None);
    dom.append_child(inner, span)?;
    assert_eq!(dom.by_id("late"), Some(span));
    assert_eq!(dom.tag_name(span), Some("span"));
    Ok(())
}

#[test]
fn text_content_replaces_children() -> Result<()> {
    let mut dom = parse("<p id='p'><b id='b'>bold</b> tail</p>")?;
    let p = dom.by_id("p").ok_or(Error::SelectorNotFound("#p".into()))?;
    dom.set_text_content(p, "plain")?;
    assert_eq!(dom.text_content(p), "plain");
    assert_eq!(dom.by_id("b"), None);
    assert_eq!(dom.dump_node(p), "<p id=\"p\">plain</p>");
    Ok(())
}

#[test]
fn content_height_tracks_lowest_element() -> Result<()> {
    let mut dom = parse("<div id='a'></div><div id='b'></div>")?;
    assert_eq!(dom.content_height(), 0.0);
    let a = dom.by_id("a").ok_or(Error::SelectorNotFound("#a".into()))?;
    let b = dom.by_id("b").ok_or(Error::SelectorNotFound("#b".into()))?;
    dom.set_layout(a, Rect::block(0.0, 300.0, 100.0))?;
    dom.set_layout(b, Rect::block(200.0, 50.0, 100.0))?;
    assert_eq!(dom.content_height(), 300.0);
    assert_eq!(dom.bounding_client_rect(b, 150.0)?.top, 50.0);
    Ok(())
}
