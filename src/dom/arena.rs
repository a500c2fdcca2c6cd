//! Arena-based DOM for HTML documents.
//!
//! This module provides an arena-allocated DOM tree that html5ever can
//! parse into and that the retrofit engine can mutate in place. The
//! arena layout enables fast traversal and selector matching; structural
//! mutations are recorded in a journal that the page runtime drains to
//! drive observer notifications.

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted id for fast matching.
        id: Option<String>,
        /// Pre-extracted classes for fast matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment (ignored but needed for TreeSink).
    Comment(String),
    /// Document type declaration.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Build a qualified element name in the HTML namespace.
pub fn qname(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

/// Build a qualified attribute name (attributes carry no namespace).
pub fn attr_name(local: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(local))
}

/// Arena-based DOM tree.
///
/// All nodes are stored in a contiguous vector for cache-friendly
/// traversal. Parent/child/sibling links use indices into this vector.
/// Detached nodes stay allocated; connectivity is decided by walking
/// parent links up to the document node.
pub struct Document {
    /// All nodes in the arena.
    nodes: Vec<Node>,
    /// Document root ID.
    document: NodeId,
    /// Parents touched by structural mutations since the last drain.
    journal: Vec<NodeId>,
    /// Bumped once per structural mutation.
    revision: u64,
}

impl Document {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
            journal: Vec::new(),
            revision: 0,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    /// Allocate a new node in the arena.
    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        // Pre-extract id and class for fast CSS matching
        let mut id = None;
        let mut classes = Vec::new();

        for attr in &attrs {
            if attr.name.local.as_ref() == "id" {
                id = Some(attr.value.clone());
            } else if attr.name.local.as_ref() == "class" {
                classes = attr
                    .value
                    .split_whitespace()
                    .map(|s| s.to_string())
                    .collect();
            }
        }

        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            id,
            classes,
        }))
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    fn record_mutation(&mut self, parent: NodeId) {
        if parent.is_some() {
            self.revision += 1;
            self.journal.push(parent);
        }
    }

    /// Drain the structural mutation journal.
    pub fn take_mutations(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.journal)
    }

    /// Count of structural mutations performed so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Append a detached child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if last_child.is_some() {
            if let Some(last_node) = self.get_mut(last_child) {
                last_node.next_sibling = child;
            }
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }

        self.record_mutation(parent);
    }

    /// Insert a detached node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let parent = self.get(sibling).map(|n| n.parent).unwrap_or(NodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }

        self.record_mutation(parent);
    }

    /// Detach a node from its parent. The node and its subtree stay
    /// allocated and can be re-appended elsewhere.
    pub fn remove(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if parent.is_none() {
            return;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }

        self.record_mutation(parent);
    }

    /// Replace `old` with `new` at the same position among its siblings.
    /// `old` is detached afterwards; `new` is detached from any previous
    /// parent first.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        if self.get(new).map(|n| n.parent.is_some()).unwrap_or(false) {
            self.remove(new);
        }
        self.insert_before(old, new);
        self.remove(old);
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);

        // Try to append to existing text node
        if let Some(last) = self.get_mut(last_child) {
            if let NodeData::Text(ref mut existing) = last.data {
                existing.push_str(text);
                return;
            }
        }

        // Create new text node
        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Get the number of nodes ever allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self.get(parent).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over element children of a node.
    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&c| self.is_element(c))
    }

    /// Iterate over all nodes strictly below `root` in document order.
    pub fn descendants(&self, root: NodeId) -> DescendantsIter<'_> {
        let mut stack = Vec::new();
        let mut children: Vec<_> = self.children(root).collect();
        children.reverse();
        stack.extend(children);
        DescendantsIter { dom: self, stack }
    }

    /// Find the first node matching a predicate (DFS from the document root).
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    return Some(id);
                }
                // Push children in reverse order for left-to-right traversal
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        None
    }

    /// Find element by tag name (first match in document order).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| {
            if let NodeData::Element { name, .. } = &node.data {
                name.local.as_ref() == tag
            } else {
                false
            }
        })
    }

    /// Whether the node's parent chain reaches the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(node) = self.get(current) {
            if matches!(node.data, NodeData::Document) {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Whether `id` is `root` or lies anywhere below it.
    pub fn subtree_contains(&self, root: NodeId, id: NodeId) -> bool {
        let mut current = id;
        while current.is_some() {
            if current == root {
                return true;
            }
            current = self.get(current).map(|n| n.parent).unwrap_or(NodeId::NONE);
        }
        false
    }

    /// Deep-copy all children of `src_parent` in `src` under `dst_parent`
    /// in this document, preserving order.
    pub fn import_children(&mut self, src: &Document, src_parent: NodeId, dst_parent: NodeId) {
        let children: Vec<_> = src.children(src_parent).collect();
        for child in children {
            let Some(node) = src.get(child) else { continue };
            let copy = match &node.data {
                NodeData::Element { name, attrs, .. } => {
                    self.create_element(name.clone(), attrs.clone())
                }
                NodeData::Text(s) => self.create_text(s.clone()),
                NodeData::Comment(s) => self.create_comment(s.clone()),
                // Doctype and nested documents have no place below an element
                _ => continue,
            };
            self.append(dst_parent, copy);
            self.import_children(src, child, copy);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a Document,
    current: NodeId,
}

impl<'a> Iterator for ChildrenIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Depth-first iterator over a subtree, excluding its root.
pub struct DescendantsIter<'a> {
    dom: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantsIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let mut children: Vec<_> = self.dom.children(id).collect();
        children.reverse();
        self.stack.extend(children);
        Some(id)
    }
}

/// Convenience methods for element nodes.
impl Document {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Get the full attribute list of an element.
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        static EMPTY: &[Attribute] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Set an attribute, replacing any existing value. The id and class
    /// caches are kept in sync.
    pub fn set_attr(&mut self, id: NodeId, attr: &str, value: &str) {
        if let Some(node) = self.get_mut(id) {
            if let NodeData::Element {
                attrs,
                id: elem_id,
                classes,
                ..
            } = &mut node.data
            {
                match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr) {
                    Some(existing) => existing.value = value.to_string(),
                    None => attrs.push(Attribute {
                        name: attr_name(attr),
                        value: value.to_string(),
                    }),
                }
                if attr == "id" {
                    *elem_id = Some(value.to_string());
                } else if attr == "class" {
                    *classes = value.split_whitespace().map(|s| s.to_string()).collect();
                }
            }
        }
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, attr: &str) {
        if let Some(node) = self.get_mut(id) {
            if let NodeData::Element {
                attrs,
                id: elem_id,
                classes,
                ..
            } = &mut node.data
            {
                attrs.retain(|a| a.name.local.as_ref() != attr);
                if attr == "id" {
                    *elem_id = None;
                } else if attr == "class" {
                    classes.clear();
                }
            }
        }
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Whether an element carries the given class.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Add a class to an element (no-op when already present).
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.get_mut(id) {
            if let NodeData::Element { attrs, classes, .. } = &mut node.data {
                if classes.iter().any(|c| c == class) {
                    return;
                }
                classes.push(class.to_string());
                let joined = classes.join(" ");
                match attrs.iter_mut().find(|a| a.name.local.as_ref() == "class") {
                    Some(existing) => existing.value = joined,
                    None => attrs.push(Attribute {
                        name: attr_name("class"),
                        value: joined,
                    }),
                }
            }
        }
    }

    /// Remove a class from an element (no-op when absent). The class
    /// attribute stays present, possibly empty, as the DOM classList
    /// API behaves.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.get_mut(id) {
            if let NodeData::Element { attrs, classes, .. } = &mut node.data {
                let before = classes.len();
                classes.retain(|c| c != class);
                if classes.len() == before {
                    return;
                }
                let joined = classes.join(" ");
                if let Some(existing) = attrs.iter_mut().find(|a| a.name.local.as_ref() == "class")
                {
                    existing.value = joined;
                }
            }
        }
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of every text node at or below `id`.
    pub fn subtree_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.text_content(id) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            if let Some(text) = self.text_content(node) {
                out.push_str(text);
            }
        }
        out
    }
}
