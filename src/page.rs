use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

// Tags that end a visual line in rendered text. Inline markup (links,
// spans) inside a paragraph does not.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "dl", "dt", "dd", "table", "tr", "h1", "h2", "h3", "h4", "h5",
    "h6",
];

/// Parsed snapshot of a loaded card page.
///
/// Taken once the wiki's async main column has rendered. Field extraction
/// runs against this snapshot, never against the live session.
pub struct CardPage {
    dom: Html,
}

impl CardPage {
    pub fn parse(source: &str) -> Self {
        Self {
            dom: Html::parse_document(source),
        }
    }

    /// Text of the first element matching `locator`, shaped like rendered
    /// text: `<br>` and block boundaries become newlines, inline elements
    /// flow into the surrounding line. Lines are trimmed and blank lines
    /// dropped. Returns None when nothing matches or the selector is
    /// invalid.
    pub fn element_text(&self, locator: &str) -> Option<String> {
        let selector = Selector::parse(locator).ok()?;
        let element = self.dom.select(&selector).next()?;

        let mut raw = String::new();
        collect_text(*element, &mut raw);

        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();
        Some(lines.join("\n"))
    }
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.name() == "br" => out.push('\n'),
            Node::Element(el) => {
                let block = BLOCK_TAGS.contains(&el.name());
                if block {
                    end_line(out);
                }
                collect_text(child, out);
                if block {
                    end_line(out);
                }
            }
            _ => {}
        }
    }
}

fn end_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
