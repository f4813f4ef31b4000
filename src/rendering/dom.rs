//! Mutable HTML tree used as the host document.
//!
//! Wraps a scraper [`Html`] and edits its node tree in place, so parsing and
//! serialization both go through html5ever. A `NodeId` stays valid for the
//! lifetime of the document; detached nodes become unreachable from the root
//! and are skipped by queries and serialization.

use ego_tree::{NodeMut, NodeRef};
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{CaseSensitivity, ElementRef, Html, Node, Selector, StrTendril};

pub use ego_tree::NodeId;

/// Error from a structural document mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node {0:?} does not belong to this document")]
    UnknownNode(NodeId),

    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),

    #[error("Node {0:?} is detached from the document")]
    Detached(NodeId),
}

/// HTML document that render operations can edit
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a complete HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// The document node every other node hangs from
    pub fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    fn node(&self, id: NodeId) -> Result<NodeRef<'_, Node>, DomError> {
        self.html.tree.get(id).ok_or(DomError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<NodeMut<'_, Node>, DomError> {
        self.html.tree.get_mut(id).ok_or(DomError::UnknownNode(id))
    }

    /// Elements reachable from the root that match `selector`, in document order
    pub fn select(&self, selector: &Selector) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| selector.matches(element))
            .map(|element| element.id())
            .collect()
    }

    /// Parse markup as a body fragment and move its nodes into this tree.
    ///
    /// The returned nodes are orphans until the caller attaches them.
    fn graft(&mut self, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        let root = self.html.tree.extend_tree(fragment.tree).id();

        // fragment root -> <html> -> parsed nodes
        self.html
            .tree
            .get(root)
            .and_then(|root| root.children().find(|child| child.value().is_element()))
            .map(|holder| holder.children().map(|child| child.id()).collect::<Vec<_>>())
            .unwrap_or_default()
    }

    /// Unlink a node (and its subtree) from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Remove every child of a node
    pub fn clear_children(&mut self, id: NodeId) -> Result<(), DomError> {
        let children: Vec<NodeId> = self.node(id)?.children().map(|child| child.id()).collect();
        for child in children {
            self.detach(child);
        }
        Ok(())
    }

    /// Replace the content of a node with a single text node
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.clear_children(id)?;
        if !text.is_empty() {
            self.node_mut(id)?.append(Node::Text(Text {
                text: StrTendril::from_slice(text),
            }));
        }
        Ok(())
    }

    /// Replace the content of a node with parsed markup
    pub fn set_html(&mut self, id: NodeId, markup: &str) -> Result<Vec<NodeId>, DomError> {
        self.clear_children(id)?;
        self.append_html(id, markup)
    }

    /// Parse markup and append the resulting nodes to `parent`
    pub fn append_html(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>, DomError> {
        self.node(parent)?;
        let nodes = self.graft(markup);
        let mut parent = self.node_mut(parent)?;
        for node in &nodes {
            parent.append_id(*node);
        }
        Ok(nodes)
    }

    /// Parse markup and insert the resulting nodes right before `reference`
    pub fn insert_html_before(
        &mut self,
        reference: NodeId,
        markup: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        if self.node(reference)?.parent().is_none() {
            return Err(DomError::Detached(reference));
        }
        let nodes = self.graft(markup);
        let mut reference = self.node_mut(reference)?;
        for node in &nodes {
            reference.insert_id_before(*node);
        }
        Ok(nodes)
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        self.html.tree.get(id)?.value().as_element()
    }

    /// Tag name of an element node
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    /// Attribute value of an element node
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    /// Set (or overwrite) an attribute on an element node
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.edit_attrs(id, |attrs| {
            let value = StrTendril::from_slice(value);
            match attrs.iter_mut().find(|attr| is_plain(&attr.name, name)) {
                Some(attr) => attr.value = value,
                None => attrs.push(Attribute {
                    name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
                    value,
                }),
            }
        })
    }

    /// Remove an attribute, returning whether it was present
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        if self.attr(id, name).is_none() {
            return false;
        }
        self.edit_attrs(id, |attrs| attrs.retain(|attr| !is_plain(&attr.name, name)))
            .is_ok()
    }

    /// Rebuild an element with edited attributes, so scraper's id and class
    /// caches always match the attribute list
    fn edit_attrs(
        &mut self,
        id: NodeId,
        edit: impl FnOnce(&mut Vec<Attribute>),
    ) -> Result<(), DomError> {
        let mut node = self.node_mut(id)?;
        let Node::Element(element) = node.value() else {
            return Err(DomError::NotAnElement(id));
        };

        let mut attrs: Vec<Attribute> = element
            .attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        edit(&mut attrs);

        *element = Element::new(element.name.clone(), attrs);
        Ok(())
    }

    /// Whether an element carries `class` in its class list
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .is_some_and(|element| element.has_class(class, CaseSensitivity::CaseSensitive))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.html.tree.get(id)?.parent().map(|parent| parent.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id)
            .map(|node| node.children().map(|child| child.id()).collect::<Vec<_>>())
            .unwrap_or_default()
    }

    /// Element descendants of `id` in document order (excluding `id`)
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id)
            .map(|node| {
                node.descendants()
                    .skip(1)
                    .filter(|descendant| descendant.value().is_element())
                    .map(|descendant| descendant.id())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }

    /// First element with the given tag name, in document order
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.descendant_elements(self.root())
            .into_iter()
            .find(|id| self.tag_name(*id) == Some(tag))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.html
            .tree
            .get(id)
            .map(|node| {
                node.descendants()
                    .filter_map(|descendant| descendant.value().as_text())
                    .map(|text| &**text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Serialize the document back to HTML
    pub fn to_html(&self) -> String {
        self.html.html()
    }
}

/// Attribute name without a namespace prefix (so `href` never matches `xlink:href`)
fn is_plain(name: &QualName, local: &str) -> bool {
    name.prefix.is_none() && &*name.local == local
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!DOCTYPE html><html><head><title>Placeholder</title></head><body><div id="list"><p class="item first">One</p><p class="item">Two</p></div><br></body></html>"#;

    fn list(document: &Document) -> NodeId {
        document.find_element("div").unwrap()
    }

    #[test]
    fn test_parse_and_serialize_round_trips_simple_page() {
        let document = Document::parse(PAGE);
        assert_eq!(document.to_html(), PAGE);
    }

    #[test]
    fn test_foreign_attributes_and_template_contents_survive() {
        let source = r##"<!DOCTYPE html><html><head></head><body><svg><use xlink:href="#icon-github"></use></svg><template><p>t</p></template><a class="x" href="/" data-k="v">link</a></body></html>"##;
        let mut document = Document::parse(source);
        let link = document.find_element("a").unwrap();
        document.set_attr(link, "href", "/home").unwrap();

        let html = document.to_html();
        assert!(html.contains(r##"<use xlink:href="#icon-github"></use>"##));
        assert!(html.contains("<template><p>t</p></template>"));
        assert!(html.contains(r#"<a class="x" href="/home" data-k="v">link</a>"#));
    }

    #[test]
    fn test_set_text_escapes_markup() {
        let mut document = Document::parse(PAGE);
        let title = document.find_element("title").unwrap();

        document.set_text(title, "Tom & <Jerry>").unwrap();

        assert_eq!(document.text_content(title), "Tom & <Jerry>");
        assert!(document
            .to_html()
            .contains("<title>Tom &amp; &lt;Jerry&gt;</title>"));
    }

    #[test]
    fn test_set_html_parses_fragment() {
        let mut document = Document::parse(PAGE);
        let list = list(&document);

        let nodes = document
            .set_html(list, "<strong>Bold</strong> text<br>")
            .unwrap();

        assert_eq!(nodes.len(), 3);
        assert_eq!(document.children(list), nodes);
        assert!(document
            .to_html()
            .contains(r#"<div id="list"><strong>Bold</strong> text<br></div>"#));
    }

    #[test]
    fn test_insert_html_before_keeps_order() {
        let mut document = Document::parse(PAGE);
        let list = list(&document);
        let second = document.children(list)[1];

        document.insert_html_before(second, "<p>A</p>").unwrap();
        document.insert_html_before(second, "<p>B</p>").unwrap();

        let texts: Vec<String> = document
            .children(list)
            .iter()
            .map(|id| document.text_content(*id))
            .collect();
        assert_eq!(texts, vec!["One", "A", "B", "Two"]);
    }

    #[test]
    fn test_insert_before_detached_node_fails() {
        let mut document = Document::parse(PAGE);
        let list = list(&document);
        let first = document.children(list)[0];
        document.detach(first);

        let result = document.insert_html_before(first, "<p>x</p>");
        assert_eq!(result, Err(DomError::Detached(first)));
    }

    #[test]
    fn test_clear_children_and_detach() {
        let mut document = Document::parse(PAGE);
        let list = list(&document);
        let first = document.children(list)[0];

        document.detach(first);
        assert_eq!(document.children(list).len(), 1);
        assert_eq!(document.parent(first), None);

        document.clear_children(list).unwrap();
        assert!(document.children(list).is_empty());
        assert!(document.to_html().contains(r#"<div id="list"></div>"#));
    }

    #[test]
    fn test_detached_nodes_are_not_selected() {
        let mut document = Document::parse(PAGE);
        let selector = Selector::parse(".item").unwrap();
        let items = document.select(&selector);
        assert_eq!(items.len(), 2);

        document.detach(items[0]);
        assert_eq!(document.select(&selector), vec![items[1]]);
    }

    #[test]
    fn test_attributes_and_classes() {
        let mut document = Document::parse(PAGE);
        let first = document.find_element("p").unwrap();

        assert!(document.has_class(first, "item"));
        assert!(document.has_class(first, "first"));
        assert!(!document.has_class(first, "ite"));

        document.set_attr(first, "href", "a\"b").unwrap();
        assert_eq!(document.attr(first, "href"), Some("a\"b"));
        assert!(document.to_html().contains(r#"href="a&quot;b""#));

        assert!(document.remove_attr(first, "href"));
        assert!(!document.remove_attr(first, "href"));
        assert_eq!(document.attr(first, "href"), None);
    }

    #[test]
    fn test_class_changes_are_seen_by_queries() {
        let mut document = Document::parse(PAGE);
        let first = document.find_element("p").unwrap();

        document.set_attr(first, "class", "card").unwrap();

        assert!(document.has_class(first, "card"));
        assert!(!document.has_class(first, "item"));
        let selector = Selector::parse(".card").unwrap();
        assert_eq!(document.select(&selector), vec![first]);
    }

    #[test]
    fn test_set_attr_on_text_node_fails() {
        let mut document = Document::parse(PAGE);
        let first = document.find_element("p").unwrap();
        let text = document.children(first)[0];

        assert_eq!(
            document.set_attr(text, "class", "x"),
            Err(DomError::NotAnElement(text))
        );
    }

    #[test]
    fn test_script_content_is_not_escaped() {
        let source =
            "<!DOCTYPE html><html><head><script>if (a < b && c) {}</script></head><body></body></html>";
        let document = Document::parse(source);
        assert_eq!(document.to_html(), source);
    }

    #[test]
    fn test_descendant_elements_in_document_order() {
        let document = Document::parse(PAGE);
        let tags: Vec<&str> = document
            .descendant_elements(document.root())
            .into_iter()
            .filter_map(|id| document.tag_name(id))
            .collect();
        assert_eq!(tags, vec!["html", "head", "title", "body", "div", "p", "p", "br"]);
    }
}
