use std::fmt::Write;

pub type NodeId = usize;

/// What the render engine draws onto. The root group carries the view transform.
pub trait DrawSurface {
    fn root(&self) -> NodeId;
    /// Remove every node below the root. Root attributes are kept.
    fn clear(&mut self);
    fn create_group(&mut self, parent: NodeId) -> NodeId;
    fn create_path(&mut self, parent: NodeId, d: &str) -> NodeId;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
    /// Move a node to the end of its parent's children, i.e. on top.
    fn raise(&mut self, node: NodeId);
    fn set_size(&mut self, width: f64, height: f64);
    /// Nodes below the root.
    fn node_count(&self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Group,
    Path,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    attrs: Vec<(String, String)>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// In-memory SVG tree.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    background: Option<String>,
    nodes: Vec<Node>,
}

const ROOT: NodeId = 0;

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        let mut root = Node::new(NodeKind::Group, None);
        root.attrs.push(("class".into(), "map-root".into()));
        Self {
            width,
            height,
            background: None,
            nodes: vec![root],
        }
    }

    pub fn set_background(&mut self, color: Option<String>) {
        self.background = color;
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="travels-map">"#,
            w = self.width,
            h = self.height
        );
        if let Some(bg) = &self.background {
            let _ = write!(out, r#"<rect width="100%" height="100%" fill="{}"/>"#, escape(bg));
        }
        self.write_node(ROOT, &mut out);
        out.push_str("</svg>\n");
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        let tag = match node.kind {
            NodeKind::Group => "g",
            NodeKind::Path => "path",
        };
        out.push('<');
        out.push_str(tag);
        for (k, v) in &node.attrs {
            let _ = write!(out, r#" {k}="{}""#, escape(v));
        }
        if node.children.is_empty() && node.kind == NodeKind::Path {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for &child in &node.children {
            self.write_node(child, out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

impl DrawSurface for SvgSurface {
    fn root(&self) -> NodeId {
        ROOT
    }

    fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT].children.clear();
    }

    fn create_group(&mut self, parent: NodeId) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(NodeKind::Group, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    fn create_path(&mut self, parent: NodeId, d: &str) -> NodeId {
        let id = self.nodes.len();
        let mut node = Node::new(NodeKind::Path, Some(parent));
        node.attrs.push(("d".into(), d.to_string()));
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(node) else {
            return;
        };
        match node.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => node.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn raise(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        let siblings = &mut self.nodes[parent].children;
        if let Some(pos) = siblings.iter().position(|&c| c == node) {
            siblings.remove(pos);
            siblings.push(node);
        }
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

/// Escape text for use in XML attributes and element content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
