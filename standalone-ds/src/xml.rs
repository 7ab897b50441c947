//! A small owned tree for navigating `standalone.xml` by element name.
//!
//! Attributes and child elements are both addressed by key, so
//! `<datasource jndi-name="java:/X"><security>..</security></datasource>`
//! exposes `jndi-name` and `security` the same way. Lookups return `Option`
//! and never panic; callers decide what a missing node means.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Namespace of the `server` root this tool was written against.
pub const SERVER_NAMESPACE: &str = "urn:jboss:domain:1.7";

/// Key under which mixed text content is stored.
pub const TEXT_KEY: &str = "#text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Leaf(String),
    Element(BTreeMap<String, XmlNode>),
    List(Vec<XmlNode>),
}

impl XmlNode {
    /// Child by key. Lists answer for their first item.
    pub fn get(&self, key: &str) -> Option<&XmlNode> {
        match self.first() {
            XmlNode::Element(children) => children.get(key),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Text of a leaf, or the `#text` of an element carrying attributes.
    pub fn as_text(&self) -> Option<&str> {
        match self.first() {
            XmlNode::Leaf(text) => Some(text),
            XmlNode::Element(children) => match children.get(TEXT_KEY) {
                Some(XmlNode::Leaf(text)) => Some(text),
                _ => None,
            },
            XmlNode::List(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&BTreeMap<String, XmlNode>> {
        match self.first() {
            XmlNode::Element(children) => Some(children),
            _ => None,
        }
    }

    /// First item of a list; any other node is its own first item.
    pub fn first(&self) -> &XmlNode {
        match self {
            XmlNode::List(items) => items.first().unwrap_or(self),
            other => other,
        }
    }

    /// Items of a list, or the node itself as a single item.
    pub fn items(&self) -> &[XmlNode] {
        match self {
            XmlNode::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    pub fn from_element(element: roxmltree::Node<'_, '_>) -> XmlNode {
        let mut children: BTreeMap<String, XmlNode> = element
            .attributes()
            .map(|a| (a.name().to_string(), XmlNode::Leaf(a.value().to_string())))
            .collect();

        let mut seen_elements: BTreeMap<String, Vec<XmlNode>> = BTreeMap::new();
        let mut order: Vec<String> = Vec::new();
        let mut text = String::new();
        for child in element.children() {
            if child.is_element() {
                let name = child.tag_name().name().to_string();
                if !seen_elements.contains_key(&name) {
                    order.push(name.clone());
                }
                seen_elements
                    .entry(name)
                    .or_default()
                    .push(XmlNode::from_element(child));
            } else if child.is_text() {
                text.push_str(child.text().unwrap_or_default());
            }
        }
        // Whitespace-only content counts as empty; real text is kept verbatim.
        if text.trim().is_empty() {
            text.clear();
        }

        if children.is_empty() && seen_elements.is_empty() {
            return XmlNode::Leaf(text);
        }

        for name in order {
            let Some(mut nodes) = seen_elements.remove(&name) else {
                continue;
            };
            let node = if nodes.len() == 1 {
                nodes.remove(0)
            } else {
                XmlNode::List(nodes)
            };
            children.insert(name, node);
        }
        if !text.is_empty() {
            children.insert(TEXT_KEY.to_string(), XmlNode::Leaf(text));
        }
        XmlNode::Element(children)
    }
}

/// String value of `key` under `node`, or `""` when absent.
pub fn text_of(node: &XmlNode, key: &str) -> String {
    node.get(key)
        .and_then(XmlNode::as_text)
        .unwrap_or_default()
        .to_string()
}

/// The parts of a `<server>` document this tool reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Server {
    /// One node per element inside `<profile>`, in document order.
    pub profile: Vec<XmlNode>,
}

impl Server {
    pub fn parse(text: &str) -> std::result::Result<Server, roxmltree::Error> {
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();
        let tag = root.tag_name();
        if tag.name() != "server" || tag.namespace() != Some(SERVER_NAMESPACE) {
            tracing::debug!(
                root = tag.name(),
                namespace = tag.namespace().unwrap_or_default(),
                "unexpected root element, reading it as <server>"
            );
        }

        let profile = root
            .children()
            .find(|n| n.is_element() && n.tag_name().name() == "profile")
            .map(|wrapper| {
                wrapper
                    .children()
                    .filter(roxmltree::Node::is_element)
                    .map(XmlNode::from_element)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Server { profile })
    }

    /// Reads `path` into memory and parses it. The file is closed before
    /// parsing starts. Only UTF-8 documents are supported; anything else is
    /// reported as [`Error::Encoding`].
    pub fn load(path: &Path) -> Result<Server> {
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8(bytes).map_err(|source| Error::Encoding {
            path: path.to_path_buf(),
            source,
        })?;
        Server::parse(&text).map_err(|source| Error::Xml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First profile entry that has `key`.
    pub fn subsystem(&self, key: &str) -> Option<&XmlNode> {
        self.profile.iter().find(|s| s.contains_key(key))
    }
}
