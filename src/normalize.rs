//! Markup Normalizer: flattens one answer fragment into plain text.
//!
//! The rewrite runs over the parsed node tree rather than doing sequential
//! string substitution, so nested and reordered tags come out the same way:
//!
//! * `<p>…</p>` — tags removed, each closing paragraph becomes one newline.
//! * `<ul>…</ul>` — opening tag becomes a newline, closing tag removed.
//! * `<li>…</li>` — opening tag becomes `\n\t+ ` (bullet), closing removed.
//! * `<br>` — newline.
//!
//! Everything else passes through verbatim, entities included. Known
//! limitation: constructs outside this rule set (`<ol>`, `<table>`, inline
//! emphasis, anchors) remain as residual markup in the output; downstream
//! consumers see them as-is rather than silently losing content.

use ego_tree::NodeRef;
use scraper::{Html, Node};

use crate::types::HarvestError;

/// Tags that never carry a closing tag.
const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Normalizes an HTML fragment holding one answer's raw content.
///
/// Fails with [`HarvestError::Markup`] when the fragment parser reports
/// errors instead of returning partial text. Idempotent on its own output.
pub fn normalize(fragment_html: &str) -> Result<String, HarvestError> {
    let fragment = Html::parse_fragment(fragment_html);
    if !fragment.errors.is_empty() {
        return Err(HarvestError::Markup(format!(
            "unparsable fragment: {}",
            fragment.errors.join("; ")
        )));
    }

    let mut out = String::new();
    for child in fragment.root_element().children() {
        render(child, &mut out);
    }
    Ok(out)
}

fn render(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&text.text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&comment.comment);
            out.push_str("-->");
        }
        Node::Element(element) => match element.name() {
            "p" => {
                render_children(node, out);
                out.push('\n');
            }
            "ul" => {
                out.push('\n');
                render_children(node, out);
            }
            "li" => {
                out.push_str("\n\t+ ");
                render_children(node, out);
            }
            "br" => out.push('\n'),
            name => {
                out.push('<');
                out.push_str(name);
                for (attr, value) in element.attrs() {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&value.replace('"', "&quot;"));
                    out.push('"');
                }
                out.push('>');
                if !VOID_TAGS.contains(&name) {
                    render_children(node, out);
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        },
        _ => {}
    }
}

fn render_children(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        render(child, out);
    }
}
