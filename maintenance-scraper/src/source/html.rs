use scraper::{ElementRef, Html, Node, Selector};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Select the first element matching `selector` and return its inner HTML
/// with every attribute removed, trimmed.
pub fn extract_article(document: &str, selector: &str) -> Result<String, String> {
    let selector =
        Selector::parse(selector).map_err(|e| format!("invalid selector {:?}: {}", selector, e))?;

    let document = Html::parse_document(document);
    let article = document
        .select(&selector)
        .next()
        .ok_or_else(|| "failed to find article element".to_string())?;

    let mut out = String::new();
    write_children(article, &mut out);
    Ok(out.trim().to_string())
}

fn write_children(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => escape_text(text, out),
            Node::Element(el) => {
                let name = el.name();
                out.push('<');
                out.push_str(name);
                out.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    continue;
                }

                if let Some(child_el) = ElementRef::wrap(child) {
                    write_children(child_el, out);
                }

                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            // Comments, doctypes and processing instructions carry nothing for the model
            _ => {}
        }
    }
}

/// Same escape set as the HTML renderer the status page was scraped with;
/// non-breaking spaces stay raw.
fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(ch),
        }
    }
}
