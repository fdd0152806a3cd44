//! Declarative node descriptors.
//!
//! `tag(name, children)` partitions a heterogeneous child list in one pass:
//! attribute contributions are merged (same key ⇒ space-joined, in order),
//! handler contributions accumulate per event type, empty children are
//! dropped and fragments are flattened in place. What remains is the
//! positional content list the reconciler diffs against.

use crate::document::{Document, NodeId};
use crate::error::BuildError;
use crate::event::{Callback, Event};
use crate::thunk::Thunk;
use std::rc::Rc;
use std::sync::Arc;

/// Attribute contribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attr {
    pub key: Arc<str>,
    pub value: String,
}

/// Handler contribution.
#[derive(Clone)]
pub struct Handler {
    pub event_type: Arc<str>,
    pub callback: Callback,
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

/// A host node that passed the foreign-marker check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForeignRef(NodeId);

impl ForeignRef {
    pub fn id(self) -> NodeId {
        self.0
    }
}

/// Builder input: anything that can appear in a `tag` child list.
pub enum Child {
    Empty,
    Text(String),
    Descriptor(Descriptor),
    Foreign(ForeignRef),
    Attr(Attr),
    Handler(Handler),
    Fragment(Vec<Child>),
}

impl Child {
    /// Accepts a pre-built host node as content. The node must be a live
    /// element carrying the foreign marker.
    pub fn node(doc: &Document, id: NodeId) -> Result<Child, BuildError> {
        if !doc.is_live(id) {
            return Err(BuildError::UnknownNode(id));
        }
        if doc.is_text(id) {
            return Err(BuildError::InvalidChild(id));
        }
        if !doc.is_foreign(id) {
            return Err(BuildError::UnmarkedForeign(id));
        }
        Ok(Child::Foreign(ForeignRef(id)))
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(text)
    }
}

impl From<&String> for Child {
    fn from(text: &String) -> Self {
        Child::Text(text.clone())
    }
}

impl From<Descriptor> for Child {
    fn from(descriptor: Descriptor) -> Self {
        Child::Descriptor(descriptor)
    }
}

impl From<ForeignRef> for Child {
    fn from(node: ForeignRef) -> Self {
        Child::Foreign(node)
    }
}

impl From<Attr> for Child {
    fn from(attr: Attr) -> Self {
        Child::Attr(attr)
    }
}

impl From<Handler> for Child {
    fn from(handler: Handler) -> Self {
        Child::Handler(handler)
    }
}

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        value.map_or(Child::Empty, Into::into)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(values: Vec<T>) -> Self {
        Child::Fragment(values.into_iter().map(Into::into).collect())
    }
}

/// Positional content slot of an element.
pub(crate) enum Content {
    Text(String),
    Descriptor(Descriptor),
    Foreign(NodeId),
}

/// Element description closed over at construction time.
pub struct Element {
    pub(crate) tag: Arc<str>,
    pub(crate) attributes: Vec<(Arc<str>, String)>,
    pub(crate) handlers: Vec<(Arc<str>, Vec<Callback>)>,
    pub(crate) content: Vec<Content>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| &**k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn content_len(&self) -> usize {
        self.content.len()
    }

    pub fn handler_count(&self, event_type: &str) -> usize {
        self.handlers
            .iter()
            .find(|(t, _)| &**t == event_type)
            .map(|(_, list)| list.len())
            .unwrap_or(0)
    }
}

/// A pure transformation from an optional previous host node to a node.
///
/// Applying a descriptor consumes it; it is evaluated exactly once, against
/// exactly one previous node. When nothing had to change, `apply` returns
/// the very `NodeId` it was given.
pub enum Descriptor {
    Element(Element),
    Thunk(Thunk),
}

impl Descriptor {
    pub fn apply(self, doc: &mut Document, prev: Option<NodeId>) -> NodeId {
        match self {
            Descriptor::Element(element) => element.apply(doc, prev),
            Descriptor::Thunk(thunk) => thunk.apply(doc, prev),
        }
    }
}

#[derive(Default)]
struct Partition {
    attributes: Vec<(Arc<str>, String)>,
    handlers: Vec<(Arc<str>, Vec<Callback>)>,
    content: Vec<Content>,
    repeated_foreign: Option<NodeId>,
}

impl Partition {
    fn push(&mut self, child: Child) {
        match child {
            Child::Empty => {}
            Child::Text(text) => {
                if !text.is_empty() {
                    self.content.push(Content::Text(text));
                }
            }
            Child::Descriptor(descriptor) => self.content.push(Content::Descriptor(descriptor)),
            Child::Foreign(ForeignRef(id)) => {
                let seen = self
                    .content
                    .iter()
                    .any(|slot| matches!(slot, Content::Foreign(other) if *other == id));
                if seen {
                    self.repeated_foreign.get_or_insert(id);
                }
                self.content.push(Content::Foreign(id));
            }
            Child::Attr(Attr { key, value }) => {
                if key.is_empty() {
                    return;
                }
                match self.attributes.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, existing)) => {
                        existing.push(' ');
                        existing.push_str(&value);
                    }
                    None => self.attributes.push((key, value)),
                }
            }
            Child::Handler(Handler {
                event_type,
                callback,
            }) => {
                if event_type.is_empty() {
                    return;
                }
                match self.handlers.iter_mut().find(|(t, _)| *t == event_type) {
                    Some((_, list)) => list.push(callback),
                    None => self.handlers.push((event_type, vec![callback])),
                }
            }
            Child::Fragment(children) => {
                for child in children {
                    self.push(child);
                }
            }
        }
    }

    fn into_element(self, name: &str) -> Element {
        Element {
            tag: Arc::from(name),
            attributes: self.attributes,
            handlers: self.handlers,
            content: self.content,
        }
    }
}

fn partition(children: Vec<Child>) -> Partition {
    let mut partition = Partition::default();
    for child in children {
        partition.push(child);
    }
    partition
}

/// Infallible form used by the macros. A foreign node listed twice keeps
/// only its last slot; earlier slots render as empty leaves.
pub fn tag(name: &str, children: Vec<Child>) -> Descriptor {
    Descriptor::Element(partition(children).into_element(name))
}

/// Like [`tag`], but rejects a foreign node listed more than once.
pub fn try_tag(name: &str, children: Vec<Child>) -> Result<Descriptor, BuildError> {
    let partition = partition(children);
    if let Some(id) = partition.repeated_foreign {
        return Err(BuildError::RepeatedForeign(id));
    }
    Ok(Descriptor::Element(partition.into_element(name)))
}

pub fn attr(key: &str, value: impl Into<String>) -> Attr {
    Attr {
        key: Arc::from(key),
        value: value.into(),
    }
}

pub fn cls(value: impl Into<String>) -> Attr {
    attr("class", value)
}

pub fn id(value: impl Into<String>) -> Attr {
    attr("id", value)
}

pub fn style(value: impl Into<String>) -> Attr {
    attr("style", value)
}

pub fn on(event_type: &str, callback: impl Fn(&mut Event) + 'static) -> Handler {
    Handler {
        event_type: Arc::from(event_type),
        callback: Rc::new(callback),
    }
}

pub fn click(callback: impl Fn(&mut Event) + 'static) -> Handler {
    on("click", callback)
}

pub fn mousedown(callback: impl Fn(&mut Event) + 'static) -> Handler {
    on("mousedown", callback)
}

pub fn mousemove(callback: impl Fn(&mut Event) + 'static) -> Handler {
    on("mousemove", callback)
}

pub fn mouseup(callback: impl Fn(&mut Event) + 'static) -> Handler {
    on("mouseup", callback)
}

pub fn mouseover(callback: impl Fn(&mut Event) + 'static) -> Handler {
    on("mouseover", callback)
}

pub fn mousewheel(callback: impl Fn(&mut Event) + 'static) -> Handler {
    on("mousewheel", callback)
}

/// `el!("div", child, ...)` is `tag("div", vec![child.into(), ...])`.
#[macro_export]
macro_rules! el {
    ($name:expr $(, $child:expr)* $(,)?) => {
        $crate::tag($name, vec![$($crate::Child::from($child)),*])
    };
}

#[macro_export]
macro_rules! div {
    ($($child:expr),* $(,)?) => { $crate::el!("div" $(, $child)*) };
}

#[macro_export]
macro_rules! pre {
    ($($child:expr),* $(,)?) => { $crate::el!("pre" $(, $child)*) };
}

#[macro_export]
macro_rules! span {
    ($($child:expr),* $(,)?) => { $crate::el!("span" $(, $child)*) };
}

#[macro_export]
macro_rules! code {
    ($($child:expr),* $(,)?) => { $crate::el!("code" $(, $child)*) };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn element(descriptor: Descriptor) -> Element {
        match descriptor {
            Descriptor::Element(element) => element,
            Descriptor::Thunk(_) => panic!("expected element descriptor"),
        }
    }

    #[test]
    fn same_key_attributes_concatenate_in_order() {
        let e = element(crate::div![cls("a"), id("x"), cls("b")]);
        assert_eq!(e.attribute("class"), Some("a b"));
        assert_eq!(e.attribute("id"), Some("x"));
        assert_eq!(e.content_len(), 0);
    }

    #[test]
    fn handlers_accumulate_per_type() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&seen), Rc::clone(&seen));
        let e = element(crate::div![
            click(move |_| a.borrow_mut().push(1)),
            mousedown(|_| {}),
            click(move |_| b.borrow_mut().push(2)),
        ]);
        assert_eq!(e.handler_count("click"), 2);
        assert_eq!(e.handler_count("mousedown"), 1);
    }

    #[test]
    fn empty_children_are_dropped_and_order_kept() {
        let nothing: Option<Descriptor> = None;
        let e = element(crate::div![
            "a",
            nothing,
            "",
            Child::Empty,
            crate::span!["b"],
            vec!["c", "d"],
        ]);
        assert_eq!(e.content_len(), 4);
        assert!(matches!(&e.content[0], Content::Text(t) if t == "a"));
        assert!(matches!(&e.content[1], Content::Descriptor(_)));
        assert!(matches!(&e.content[3], Content::Text(t) if t == "d"));
    }

    #[test]
    fn empty_keys_are_ignored() {
        let e = element(crate::div![attr("", "x"), on("", |_| {})]);
        assert!(e.attributes.is_empty());
        assert!(e.handlers.is_empty());
    }

    #[test]
    fn unmarked_host_nodes_are_rejected() {
        let mut doc = Document::new();
        let owned = doc.create_element(Arc::from("div"));
        assert!(matches!(
            Child::node(&doc, owned),
            Err(BuildError::UnmarkedForeign(id)) if id == owned
        ));
        let text = doc.create_text("t");
        assert!(matches!(Child::node(&doc, text), Err(BuildError::InvalidChild(_))));
        assert!(matches!(
            Child::node(&doc, NodeId(999)),
            Err(BuildError::UnknownNode(_))
        ));
        let foreign = doc.create_foreign("canvas");
        assert!(matches!(Child::node(&doc, foreign), Ok(Child::Foreign(_))));
    }

    #[test]
    fn foreign_node_listed_twice_is_rejected_by_try_tag() {
        let mut doc = Document::new();
        let img = doc.create_foreign("img");
        let children = || {
            vec![
                Child::from("x"),
                Child::node(&doc, img).expect("foreign"),
                Child::node(&doc, img).expect("foreign"),
            ]
        };
        assert!(matches!(
            try_tag("div", children()),
            Err(BuildError::RepeatedForeign(id)) if id == img
        ));
        assert_eq!(element(tag("div", children())).content_len(), 3);

        let once = vec![Child::from("x"), Child::node(&doc, img).expect("foreign")];
        assert!(try_tag("div", once).is_ok());
    }
}
