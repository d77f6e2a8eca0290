//! A minimal renderable-node model and the rendering-shape normalizer.
//!
//! The matcher and provider hand their consumers a rendering function; the
//! function may produce zero, one or many nodes, and downstream rendering
//! wants exactly one root. [wrap_nodes] normalizes that shape while staying
//! transparent when the consumer already produced a single element.

/// One node of rendered output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A concrete element with a tag name and children.
    Element { tag: String, children: Vec<Node> },
    /// A text node.
    Text(String),
    /// A comment node. Never rendered as visible content.
    Comment(String),
}

impl Node {
    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Node {
        Node::Element {
            tag: tag.into(),
            children,
        }
    }

    pub fn text(content: impl Into<String>) -> Node {
        Node::Text(content.into())
    }

    pub fn comment(content: impl Into<String>) -> Node {
        Node::Comment(content.into())
    }

    /// Whether this node is a concrete element, as opposed to a text or
    /// comment node.
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element { .. })
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// The concatenated text of this subtree, in document order. Comments
    /// contribute nothing. Hydration checks compare this between a non-live
    /// render and the first live render.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(content) => content.clone(),
            Node::Comment(_) => String::new(),
            Node::Element { children, .. } => {
                children.iter().map(Node::text_content).collect()
            }
        }
    }
}

/// Normalize the zero-or-more nodes produced by a rendering function into a
/// single renderable unit.
///
/// - no nodes: `None`, never an error;
/// - exactly one concrete element: that node, unwrapped;
/// - anything else (several nodes, or a single text/comment node): all of
///   them wrapped in an element of `wrapper_tag`.
pub fn wrap_nodes(nodes: Vec<Node>, wrapper_tag: &str) -> Option<Node> {
    if nodes.is_empty() {
        return None;
    }
    if nodes.len() == 1 && nodes[0].is_element() {
        return nodes.into_iter().next();
    }
    Some(Node::element(wrapper_tag, nodes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_nodes_normalize_to_nothing() {
        assert_eq!(wrap_nodes(Vec::new(), "span"), None);
    }

    #[test]
    fn single_element_passes_through_unwrapped() {
        let node = Node::element("div", vec![Node::text("hi")]);
        assert_eq!(wrap_nodes(vec![node.clone()], "span"), Some(node));
    }

    #[test]
    fn single_non_element_gets_wrapped() {
        let wrapped = wrap_nodes(vec![Node::text("hi")], "span").unwrap();
        assert_eq!(wrapped.tag(), Some("span"));
        assert_eq!(wrapped, Node::element("span", vec![Node::text("hi")]));

        let wrapped = wrap_nodes(vec![Node::comment("x")], "div").unwrap();
        assert_eq!(wrapped.tag(), Some("div"));
    }

    #[test]
    fn multiple_nodes_get_wrapped() {
        let nodes = vec![
            Node::element("p", Vec::new()),
            Node::element("p", Vec::new()),
        ];
        let wrapped = wrap_nodes(nodes.clone(), "section").unwrap();
        assert_eq!(wrapped, Node::element("section", nodes));
    }

    #[test]
    fn text_content_skips_comments() {
        let node = Node::element(
            "div",
            vec![
                Node::text("is"),
                Node::comment("ignored"),
                Node::element("b", vec![Node::text("Mobile")]),
            ],
        );
        assert_eq!(node.text_content(), "isMobile");
    }
}
