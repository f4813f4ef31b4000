use std::collections::BTreeMap;

use super::anchors::{AnchorMap, AnchorSpec};
use super::dom::{Document, NodeId};
use crate::error::LoadFailure;

/// Host document plus its resolved anchors.
///
/// This is the explicit handle every render operation works on.
#[derive(Debug, Clone)]
pub struct Page {
    pub document: Document,
    pub anchors: AnchorMap,
}

impl Page {
    /// Parse a template and resolve the given anchors
    pub fn parse(source: &str, specs: &BTreeMap<String, AnchorSpec>) -> Result<Self, LoadFailure> {
        let document = Document::parse(source);
        let anchors = AnchorMap::resolve(&document, specs)?;
        Ok(Self { document, anchors })
    }

    /// Node for a named anchor
    pub fn anchor(&self, name: &str) -> Result<NodeId, LoadFailure> {
        self.anchors.get(name)
    }

    fn body(&self) -> Result<NodeId, LoadFailure> {
        self.document
            .find_element("body")
            .ok_or_else(|| LoadFailure::Html("template has no <body>".to_string()))
    }

    /// Append markup to the end of `<body>` (used for the dev reload hook)
    pub fn append_to_body(&mut self, markup: &str) -> Result<(), LoadFailure> {
        let body = self.body()?;
        self.document.append_html(body, markup)?;
        Ok(())
    }

    /// Put an inline `<script id=..>` at the end of `<body>`, replacing any
    /// earlier script with the same id
    pub fn replace_body_script(&mut self, id: &str, code: &str) -> Result<(), LoadFailure> {
        let body = self.body()?;
        let existing: Vec<NodeId> = self
            .document
            .descendant_elements(body)
            .into_iter()
            .filter(|node| {
                self.document.tag_name(*node) == Some("script")
                    && self.document.attr(*node, "id") == Some(id)
            })
            .collect();
        for node in existing {
            self.document.detach(node);
        }
        self.document
            .append_html(body, &format!("<script id=\"{id}\">{code}</script>"))?;
        Ok(())
    }

    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}
