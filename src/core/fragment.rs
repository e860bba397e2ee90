//! View fragment parsing and extraction.
//!
//! A fetched fragment is parsed into a throwaway document, the view root and
//! the footer content are cut out of it and serialized back to markup, and
//! the document is dropped. Nothing survives across navigations.

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::config::{FOOTER_MARKER_ATTR, STRIPPED_TAGS, VIEW_ROOT_ATTR, VIEW_ROOT_TAG};
use crate::core::error::ExtractError;
use crate::models::ViewPath;

/// Markup extracted from one fragment, ready to be spliced into the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedView {
    /// Outer markup of the view root (or of the synthesized wrapper).
    pub view_html: String,
    /// Footer content, when the fragment marks one.
    pub footer: Option<ViewFooter>,
}

/// View-specific footer content copied into the shell's footer slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFooter {
    pub inner_html: String,
    /// Value of the footer element's `class` attribute (may be empty).
    pub class: String,
}

/// Parse a fragment and extract its view root and footer content.
///
/// The footer is read before it is stripped from the view root, so a footer
/// nested inside `main[data-view]` still reaches the footer slot. Without a
/// view root, the body is wrapped in `<main data-view="{stem}">` minus
/// navigation, script and style elements.
pub fn extract_view(html: &str, path: &ViewPath) -> Result<ExtractedView, ExtractError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);

    let footer = match find_first(&dom.document, &is_footer_marker) {
        Some(node) => Some(ViewFooter {
            inner_html: serialize_node(&node, TraversalScope::ChildrenOnly(None), path)?,
            class: attr(&node, "class").unwrap_or_default(),
        }),
        None => None,
    };

    let view_html = match find_first(&dom.document, &is_view_root) {
        Some(root) => {
            strip_descendants(&root, &is_footer_marker);
            serialize_node(&root, TraversalScope::IncludeNode, path)?
        }
        None => {
            let body = find_first(&dom.document, &|node| is_element(node, "body"))
                .ok_or_else(|| ExtractError::MissingBody(path.to_string()))?;
            strip_descendants(&body, &|node| is_footer_marker(node) || is_stripped(node));
            let inner = serialize_node(&body, TraversalScope::ChildrenOnly(None), path)?;
            format!(
                "<{tag} {attr}=\"{name}\">{inner}</{tag}>",
                tag = VIEW_ROOT_TAG,
                attr = VIEW_ROOT_ATTR,
                name = escape_attr(path.stem()),
            )
        }
    };

    Ok(ExtractedView { view_html, footer })
}

// =============================================================================
// Tree helpers
// =============================================================================

fn element_name(node: &Handle) -> Option<&str> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn is_element(node: &Handle, tag: &str) -> bool {
    element_name(node) == Some(tag)
}

fn attr(node: &Handle, attr_name: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr_name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn has_attr(node: &Handle, attr_name: &str) -> bool {
    match node.data {
        NodeData::Element { ref attrs, .. } => {
            attrs.borrow().iter().any(|a| &*a.name.local == attr_name)
        }
        _ => false,
    }
}

fn is_view_root(node: &Handle) -> bool {
    is_element(node, VIEW_ROOT_TAG) && has_attr(node, VIEW_ROOT_ATTR)
}

fn is_footer_marker(node: &Handle) -> bool {
    has_attr(node, FOOTER_MARKER_ATTR)
}

fn is_stripped(node: &Handle) -> bool {
    match element_name(node) {
        Some("link") => attr(node, "rel").is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet")),
        Some(tag) => STRIPPED_TAGS.contains(&tag),
        None => false,
    }
}

/// First node in document order matching `pred`.
fn find_first(node: &Handle, pred: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if pred(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_first(child, pred) {
            return Some(found);
        }
    }
    None
}

/// Remove every descendant matching `pred`, together with its subtree.
fn strip_descendants(node: &Handle, pred: &dyn Fn(&Handle) -> bool) {
    node.children.borrow_mut().retain(|child| !pred(child));
    for child in node.children.borrow().iter() {
        strip_descendants(child, pred);
    }
}

fn serialize_node(
    node: &Handle,
    scope: TraversalScope,
    path: &ViewPath,
) -> Result<String, ExtractError> {
    let mut out = Vec::new();
    let handle = SerializableHandle::from(node.clone());
    let opts = SerializeOpts {
        traversal_scope: scope,
        ..Default::default()
    };
    serialize(&mut out, &handle, opts).map_err(|_| ExtractError::Serialize(path.to_string()))?;
    String::from_utf8(out).map_err(|_| ExtractError::Serialize(path.to_string()))
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(name: &str) -> ViewPath {
        ViewPath::normalize(Some(name))
    }

    #[test]
    fn test_view_root_with_nested_footer() {
        let html = r#"<!doctype html><html><head><title>About</title></head><body>
            <header><nav><a href="index.html">home</a></nav></header>
            <main data-view="about">
                <h1>About</h1>
                <div data-view-footer class="footer footer--about"><p>Based in Lyon</p></div>
            </main>
        </body></html>"#;

        let view = extract_view(html, &path("about.html")).unwrap();

        assert!(view.view_html.starts_with("<main data-view=\"about\">"));
        assert!(view.view_html.contains("<h1>About</h1>"));
        assert!(!view.view_html.contains("data-view-footer"));
        assert!(!view.view_html.contains("Based in Lyon"));
        assert!(!view.view_html.contains("<header>"));

        let footer = view.footer.unwrap();
        assert_eq!(footer.inner_html, "<p>Based in Lyon</p>");
        assert_eq!(footer.class, "footer footer--about");
    }

    #[test]
    fn test_footer_outside_view_root() {
        let html = r#"<main data-view="cv"><p>cv</p></main>
            <footer data-view-footer><span>2024</span></footer>"#;

        let view = extract_view(html, &path("cv.html")).unwrap();

        assert_eq!(view.view_html, "<main data-view=\"cv\"><p>cv</p></main>");
        let footer = view.footer.unwrap();
        assert_eq!(footer.inner_html, "<span>2024</span>");
        assert_eq!(footer.class, "");
    }

    #[test]
    fn test_synthesized_wrapper_strips_chrome() {
        let html = r#"<html><head><link rel="stylesheet" href="head.css"></head><body>
            <header>site header</header>
            <nav>menu</nav>
            <link rel="stylesheet" href="body.css">
            <link rel="preload" href="font.woff2">
            <style>p { color: red }</style>
            <script>console.log("boot")</script>
            <section><p>Projects</p><script>inner()</script></section>
            <div data-view-footer>footer text</div>
        </body></html>"#;

        let view = extract_view(html, &path("projects.html")).unwrap();

        assert!(view.view_html.starts_with("<main data-view=\"projects\">"));
        assert!(view.view_html.ends_with("</main>"));
        assert!(view.view_html.contains("<section><p>Projects</p></section>"));
        assert!(view.view_html.contains("rel=\"preload\""));
        for gone in ["<header", "<nav", "<style", "<script", "body.css", "footer text"] {
            assert!(!view.view_html.contains(gone), "{gone} leaked into the view");
        }
        assert_eq!(view.footer.unwrap().inner_html, "footer text");
    }

    #[test]
    fn test_wrapper_of_bare_text_fragment() {
        let view = extract_view("just text", &path("Notes.HTML")).unwrap();
        assert_eq!(view.view_html, "<main data-view=\"Notes\">just text</main>");
        assert_eq!(view.footer, None);
    }

    #[test]
    fn test_first_view_root_wins() {
        let html = r#"<main><p>no marker</p></main>
            <main data-view="one">1</main><main data-view="two">2</main>"#;
        let view = extract_view(html, &path("x.html")).unwrap();
        assert_eq!(view.view_html, "<main data-view=\"one\">1</main>");
    }
}
