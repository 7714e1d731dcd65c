use crate::types::Color;

/// Generational handle to a node in a [`Document`](super::Document).
///
/// A handle outlives its node: once the slot is freed (or reused) every
/// accessor reports the node as gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Identifies one highlighting pass. Strictly increasing per scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(u64);

impl PassId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Marker carried by every highlight element this crate's users create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightMark {
    pub pass: PassId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineStyle {
    pub background: Color,
    pub foreground: Color,
}

/// Tags whose content must never be rewritten.
const FORBIDDEN_TAGS: [&str; 8] = [
    "script", "style", "noscript", "template", "textarea", "input", "select", "option",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    style: Option<InlineStyle>,
    mark: Option<HighlightMark>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            style: None,
            mark: None,
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_style(mut self, style: InlineStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_mark(mut self, mark: HighlightMark) -> Self {
        self.mark = Some(mark);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    pub fn style(&self) -> Option<InlineStyle> {
        self.style
    }

    pub fn mark(&self) -> Option<HighlightMark> {
        self.mark
    }

    pub fn is_highlight(&self) -> bool {
        self.mark.is_some()
    }

    /// Non-visual containers, form controls and editable surfaces.
    pub fn is_forbidden(&self) -> bool {
        if FORBIDDEN_TAGS.contains(&self.tag.as_str()) {
            return true;
        }
        self.attribute("contenteditable")
            .is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
}

impl NodeKind {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeKind::Element(_) => None,
            NodeKind::Text(text) => Some(text),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) kind: NodeKind,
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) generation: u32,
    pub(crate) node: Option<Node>,
}
