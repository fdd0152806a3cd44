//! Host tree arena.
//!
//! Invariants:
//! - Every `NodeId` handed out is unique for the lifetime of the document;
//!   ids of freed nodes are never reallocated.
//! - A node has at most one parent, and appears exactly once in that
//!   parent's child list.
//! - Text leaves never have children.
//! - Only nodes marked foreign may be edited through the `foreign_*` API;
//!   everything else is mutated by the reconciler alone.

use crate::event::Callback;
use crate::stats::MutationStats;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

/// Stable identity of a host node within one [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Reserved sentinel, never allocated.
    pub const INVALID: NodeId = NodeId(0);

    pub fn as_raw(self) -> u32 {
        self.0
    }
}

pub(crate) struct Listener {
    pub(crate) event_type: Arc<str>,
    pub(crate) callbacks: Rc<[Callback]>,
}

pub(crate) enum NodeKind {
    Element {
        tag: Arc<str>,
        attributes: Vec<(Arc<str>, String)>,
        listeners: Vec<Listener>,
    },
    Text {
        text: String,
    },
}

pub(crate) struct NodeRecord {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) foreign: bool,
    pub(crate) memo_key: Option<Arc<str>>,
}

impl NodeRecord {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            foreign: false,
            memo_key: None,
        }
    }
}

/// Owner of every host node plus the mutation counters of the current pass.
pub struct Document {
    nodes: HashMap<NodeId, NodeRecord>,
    next_id: u32,
    root: Option<NodeId>,
    stats: MutationStats,
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 1,
            root: None,
            stats: MutationStats::default(),
        }
    }

    /// Root produced by the last [`Document::render`] call.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(&id).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(&id).map(|n| &n.kind),
            Some(NodeKind::Text { .. })
        )
    }

    pub fn is_foreign(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.foreign)
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(&id)?.kind {
            NodeKind::Element { tag, .. } => Some(&**tag),
            NodeKind::Text { .. } => None,
        }
    }

    /// Literal content of a text leaf.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes.get(&id)?.kind {
            NodeKind::Text { text } => Some(text.as_str()),
            NodeKind::Element { .. } => None,
        }
    }

    /// Concatenated text of every leaf under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        fn walk(doc: &Document, id: NodeId, out: &mut String) {
            let Some(node) = doc.nodes.get(&id) else {
                return;
            };
            match &node.kind {
                NodeKind::Text { text } => out.push_str(text),
                NodeKind::Element { .. } => {
                    for child in &node.children {
                        walk(doc, *child, out);
                    }
                }
            }
        }
        let mut out = String::new();
        walk(self, id, &mut out);
        out
    }

    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self, id: NodeId) -> &[(Arc<str>, String)] {
        match self.nodes.get(&id).map(|n| &n.kind) {
            Some(NodeKind::Element { attributes, .. }) => attributes,
            _ => &[],
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn memo_key(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).and_then(|n| n.memo_key.as_deref())
    }

    /// Whether a dispatcher for `event_type` is installed on `id`.
    pub fn has_listener(&self, id: NodeId, event_type: &str) -> bool {
        self.listener(id, event_type).is_some()
    }

    /// Number of callbacks currently stored behind the dispatcher for `event_type`.
    pub fn callback_count(&self, id: NodeId, event_type: &str) -> usize {
        self.listener(id, event_type)
            .map(|l| l.callbacks.len())
            .unwrap_or(0)
    }

    pub(crate) fn listener(&self, id: NodeId, event_type: &str) -> Option<&Listener> {
        match self.nodes.get(&id).map(|n| &n.kind) {
            Some(NodeKind::Element { listeners, .. }) => {
                listeners.iter().find(|l| &*l.event_type == event_type)
            }
            _ => None,
        }
    }

    pub fn stats(&self) -> &MutationStats {
        &self.stats
    }

    /// Returns the counters accumulated since the last call and resets them.
    pub fn take_stats(&mut self) -> MutationStats {
        std::mem::take(&mut self.stats)
    }

    // Foreign producer API.

    /// Creates a detached element owned by code outside the reconciler.
    pub fn create_foreign(&mut self, tag: &str) -> NodeId {
        let id = self.create_element(Arc::from(tag));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.foreign = true;
        }
        id
    }

    /// Flags an existing element as foreign. Returns false for text leaves
    /// and unknown ids.
    pub fn mark_foreign(&mut self, id: NodeId) -> bool {
        match self.nodes.get_mut(&id) {
            Some(node) if matches!(node.kind, NodeKind::Element { .. }) => {
                node.foreign = true;
                true
            }
            _ => false,
        }
    }

    pub fn set_foreign_attribute(&mut self, id: NodeId, key: &str, value: &str) -> bool {
        if !self.is_foreign(id) {
            return false;
        }
        match self.nodes.get_mut(&id).map(|n| &mut n.kind) {
            Some(NodeKind::Element { attributes, .. }) => {
                match attributes.iter_mut().find(|(k, _)| &**k == key) {
                    Some((_, v)) => *v = value.to_string(),
                    None => attributes.push((Arc::from(key), value.to_string())),
                }
                true
            }
            _ => false,
        }
    }

    /// Replaces the content of a foreign element with a single text leaf.
    pub fn set_foreign_text(&mut self, id: NodeId, text: &str) -> bool {
        if !self.is_foreign(id) {
            return false;
        }
        let old = match self.nodes.get_mut(&id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return false,
        };
        for child in old {
            if let Some(record) = self.nodes.get_mut(&child) {
                record.parent = None;
            }
            self.discard(child);
        }
        let leaf = self.create_text(text);
        self.attach(id, leaf);
        true
    }

    /// Frees a detached node that is no longer referenced by any producer.
    pub fn release(&mut self, id: NodeId) {
        if self.parent(id).is_none() && Some(id) != self.root {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.foreign = false;
            }
            self.discard(id);
        }
    }

    /// Reconciles `descriptor` against the previous root and keeps the result
    /// as the new root. A replaced previous root is freed.
    pub fn render(&mut self, descriptor: crate::Descriptor) -> NodeId {
        let prev = self.root;
        let next = descriptor.apply(self, prev);
        if let Some(prev) = prev {
            if prev != next {
                log::debug!(target: "dom.render", "root replaced {prev:?} -> {next:?}");
                self.discard(prev);
            }
        }
        self.root = Some(next);
        next
    }

    // Reconciler mutation API.

    fn alloc(&mut self, record: NodeRecord) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.nodes.insert(id, record);
        id
    }

    pub(crate) fn create_element(&mut self, tag: Arc<str>) -> NodeId {
        self.stats.elements_created += 1;
        self.alloc(NodeRecord::new(NodeKind::Element {
            tag,
            attributes: Vec::new(),
            listeners: Vec::new(),
        }))
    }

    pub(crate) fn create_text(&mut self, text: &str) -> NodeId {
        self.stats.texts_created += 1;
        self.alloc(NodeRecord::new(NodeKind::Text {
            text: text.to_string(),
        }))
    }

    /// Element whose tag matches and that the reconciler may reuse.
    pub(crate) fn is_reusable_element(&self, id: NodeId, tag: &str) -> bool {
        match self.nodes.get(&id) {
            Some(node) if !node.foreign => {
                matches!(&node.kind, NodeKind::Element { tag: t, .. } if &**t == tag)
            }
            _ => false,
        }
    }

    pub(crate) fn set_attribute(&mut self, id: NodeId, key: &Arc<str>, value: &str) {
        if let Some(NodeKind::Element { attributes, .. }) = self.nodes.get_mut(&id).map(|n| &mut n.kind)
        {
            match attributes.iter_mut().find(|(k, _)| k == key) {
                Some((_, v)) => {
                    v.clear();
                    v.push_str(value);
                }
                None => attributes.push((Arc::clone(key), value.to_string())),
            }
            self.stats.attributes_set += 1;
        }
    }

    /// Drops every attribute for which `keep` returns false.
    pub(crate) fn retain_attributes(&mut self, id: NodeId, mut keep: impl FnMut(&str) -> bool) {
        if let Some(NodeKind::Element { attributes, .. }) = self.nodes.get_mut(&id).map(|n| &mut n.kind)
        {
            let before = attributes.len();
            attributes.retain(|(k, _)| keep(k));
            self.stats.attributes_removed += (before - attributes.len()) as u64;
        }
    }

    pub(crate) fn retain_listeners(&mut self, id: NodeId, mut keep: impl FnMut(&str) -> bool) {
        if let Some(NodeKind::Element { listeners, .. }) = self.nodes.get_mut(&id).map(|n| &mut n.kind)
        {
            let before = listeners.len();
            listeners.retain(|l| keep(&l.event_type));
            self.stats.dispatchers_removed += (before - listeners.len()) as u64;
        }
    }

    /// Stores `callbacks` behind the dispatcher for `event_type`, installing
    /// the dispatcher the first time the type shows up on this node.
    pub(crate) fn store_callbacks(
        &mut self,
        id: NodeId,
        event_type: &Arc<str>,
        callbacks: Rc<[Callback]>,
    ) {
        if let Some(NodeKind::Element { listeners, .. }) = self.nodes.get_mut(&id).map(|n| &mut n.kind)
        {
            match listeners.iter_mut().find(|l| &l.event_type == event_type) {
                Some(listener) => {
                    listener.callbacks = callbacks;
                    self.stats.callbacks_swapped += 1;
                }
                None => {
                    listeners.push(Listener {
                        event_type: Arc::clone(event_type),
                        callbacks,
                    });
                    self.stats.dispatchers_installed += 1;
                }
            }
        }
    }

    pub(crate) fn set_memo_key(&mut self, id: NodeId, key: &Arc<str>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.memo_key.as_ref() != Some(key) {
                node.memo_key = Some(Arc::clone(key));
                self.stats.memo_keys_recorded += 1;
            }
        }
    }

    /// Forgets the memo key of a node whose content is being rewritten.
    pub(crate) fn clear_memo_key(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.memo_key = None;
        }
    }

    /// Removes children from the end until at most `len` remain.
    pub(crate) fn truncate_children(&mut self, id: NodeId, len: usize) {
        let removed = match self.nodes.get_mut(&id) {
            Some(node) if node.children.len() > len => node.children.split_off(len),
            _ => return,
        };
        for child in removed.into_iter().rev() {
            if let Some(record) = self.nodes.get_mut(&child) {
                record.parent = None;
            }
            self.stats.children_removed += 1;
            self.discard(child);
        }
    }

    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.take_for_move(child, parent);
        self.attach(parent, child);
        self.stats.children_appended += 1;
    }

    /// Puts `next` in the slot currently held by `prev`, then frees `prev`
    /// unless it is foreign.
    pub(crate) fn replace_child(&mut self, parent: NodeId, prev: NodeId, next: NodeId) {
        self.take_for_move(next, parent);
        let Some(slot) = self
            .nodes
            .get(&parent)
            .and_then(|p| p.children.iter().position(|c| *c == prev))
        else {
            log::warn!(target: "dom.reconcile", "replace target {prev:?} is not a child of {parent:?}; appending");
            self.attach(parent, next);
            self.stats.children_appended += 1;
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children[slot] = next;
        }
        if let Some(record) = self.nodes.get_mut(&next) {
            record.parent = Some(parent);
        }
        if let Some(record) = self.nodes.get_mut(&prev) {
            record.parent = None;
        }
        self.stats.children_replaced += 1;
        self.discard(prev);
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    /// Takes an attached node out of its current parent before it is placed
    /// under `to`. The vacated slot holds an empty leaf, so the old parent
    /// keeps the child count it was reconciled to. Memo keys from the old
    /// parent up are dropped when the node leaves for another parent.
    fn take_for_move(&mut self, id: NodeId, to: NodeId) {
        let Some(from) = self.nodes.get_mut(&id).and_then(|n| n.parent.take()) else {
            return;
        };
        let slot = self
            .nodes
            .get(&from)
            .and_then(|p| p.children.iter().position(|c| *c == id));
        if let Some(slot) = slot {
            let leaf = self.create_text("");
            if let Some(p) = self.nodes.get_mut(&from) {
                p.children[slot] = leaf;
            }
            if let Some(record) = self.nodes.get_mut(&leaf) {
                record.parent = Some(from);
            }
        }
        if from != to {
            log::warn!(target: "dom.reconcile", "{id:?} moved from {from:?} to {to:?}; old slot left empty");
            self.forget_memo_keys_upward(from);
        }
    }

    fn forget_memo_keys_upward(&mut self, mut id: NodeId) {
        while let Some(node) = self.nodes.get_mut(&id) {
            node.memo_key = None;
            match node.parent {
                Some(parent) => id = parent,
                None => break,
            }
        }
    }

    /// Frees a detached subtree. Foreign nodes inside it are only detached,
    /// their producer still owns them.
    fn discard(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if node.foreign || node.parent.is_some() {
            return;
        }
        if let Some(node) = self.nodes.remove(&id) {
            self.stats.nodes_freed += 1;
            for child in node.children {
                if let Some(record) = self.nodes.get_mut(&child) {
                    record.parent = None;
                }
                self.discard(child);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}
