// File: ./src/scrape/text.rs
use scraper::{ElementRef, Node};

/// Elements whose text content is never visible page text.
const INVISIBLE: &[&str] = &["script", "style", "noscript", "template"];

fn is_invisible(element: &scraper::node::Element) -> bool {
    INVISIBLE.contains(&element.name())
}

/// Every non-empty, trimmed text node under `root`, in document order.
///
/// Order matters: the date line and the description marker are found by
/// single-pass scans over this list.
pub fn text_fragments(root: ElementRef<'_>) -> Vec<String> {
    let mut fragments = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .take_while(|a| a.id() != root.id())
            .filter_map(|a| a.value().as_element())
            .any(is_invisible);
        if hidden || is_invisible(root.value()) {
            continue;
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            fragments.push(trimmed.to_string());
        }
    }
    fragments
}

/// Visible text of an element collapsed onto one line.
pub fn inline_text(element: ElementRef<'_>) -> String {
    text_fragments(element).join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, sel: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(sel).unwrap()).next().unwrap()
    }

    #[test]
    fn test_fragments_keep_document_order() {
        let doc = Html::parse_fragment(
            "<div><h2><a href='/e/1'> Show A </a></h2>\n  <p>Saturday</p>\n\n<p><b>Tickets</b> $20</p></div>",
        );
        assert_eq!(
            text_fragments(first(&doc, "div")),
            vec!["Show A", "Saturday", "Tickets", "$20"]
        );
    }

    #[test]
    fn test_script_and_style_are_skipped() {
        let doc = Html::parse_fragment(
            "<div><style>.x{}</style><p>Body</p><script>var a = 1;</script></div>",
        );
        assert_eq!(text_fragments(first(&doc, "div")), vec!["Body"]);
    }

    #[test]
    fn test_entities_and_nbsp_are_trimmed() {
        let doc = Html::parse_fragment("<div><p>&nbsp;Rock &amp; Roll&nbsp;</p><p>&nbsp;</p></div>");
        assert_eq!(text_fragments(first(&doc, "div")), vec!["Rock & Roll"]);
    }

    #[test]
    fn test_inline_text_joins_nested_markup() {
        let doc = Html::parse_fragment("<h2><a href='/e/1'>Show <em>A</em></a></h2>");
        assert_eq!(inline_text(first(&doc, "a")), "Show A");
    }
}
