//! Positional reconciliation of an element descriptor against a previous node.
//!
//! Contract:
//! - A previous node that cannot be reused (absent, stale, text, other tag,
//!   foreign) is left untouched and a fresh element is created.
//! - A reused node only receives the writes needed to match the descriptor.
//!   Reconciling the same description twice performs no host mutation on
//!   the second pass.
//! - Children are matched by position. Keyed skipping only happens through
//!   [`crate::thunk`].
//! - After the pass the node has exactly as many children as the descriptor
//!   has content slots.

use crate::builder::{Content, Element};
use crate::document::{Document, NodeId};
use std::rc::Rc;

impl Element {
    pub(crate) fn apply(self, doc: &mut Document, prev: Option<NodeId>) -> NodeId {
        let Element {
            tag,
            attributes,
            handlers,
            content,
        } = self;

        let node = match prev {
            Some(prev) if doc.is_reusable_element(prev, &tag) => prev,
            _ => {
                let node = doc.create_element(tag);
                log::trace!(target: "dom.reconcile", "create {node:?} (previous {prev:?} not reusable)");
                node
            }
        };
        // A keyed thunk re-records its key after this returns.
        doc.clear_memo_key(node);

        // Attributes: an empty value counts as absent.
        doc.retain_attributes(node, |key| {
            attributes
                .iter()
                .any(|(k, v)| &**k == key && !v.is_empty())
        });
        for (key, value) in &attributes {
            if value.is_empty() {
                continue;
            }
            if doc.attribute(node, key) != Some(value.as_str()) {
                doc.set_attribute(node, key, value);
            }
        }

        // Handlers: the dispatcher stays, the callback list is swapped.
        doc.retain_listeners(node, |event_type| {
            handlers.iter().any(|(t, _)| &**t == event_type)
        });
        for (event_type, callbacks) in handlers {
            doc.store_callbacks(node, &event_type, Rc::from(callbacks));
        }

        // Children.
        let len = content.len();
        doc.truncate_children(node, len);
        for (index, slot) in content.into_iter().enumerate() {
            match doc.children(node).get(index).copied() {
                Some(prev_child) => {
                    let next = resolve(doc, slot, Some(prev_child));
                    if next != prev_child {
                        log::trace!(target: "dom.reconcile", "{node:?}[{index}] {prev_child:?} -> {next:?}");
                        doc.replace_child(node, prev_child, next);
                    }
                }
                None => {
                    let next = resolve(doc, slot, None);
                    doc.append_child(node, next);
                }
            }
        }
        debug_assert_eq!(doc.children(node).len(), len, "child count must match content");

        node
    }
}

fn resolve(doc: &mut Document, slot: Content, prev: Option<NodeId>) -> NodeId {
    match slot {
        Content::Descriptor(descriptor) => descriptor.apply(doc, prev),
        Content::Text(text) => match prev {
            Some(prev) if !doc.is_foreign(prev) && doc.text(prev) == Some(text.as_str()) => prev,
            _ => doc.create_text(&text),
        },
        Content::Foreign(id) => {
            if doc.is_live(id) {
                id
            } else {
                log::warn!(target: "dom.reconcile", "foreign node {id:?} was released; rendering an empty leaf");
                doc.create_text("")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn initial_paint() {
        let mut doc = Document::new();
        let node = div![cls("boo"), "hello"].apply(&mut doc, None);
        assert_eq!(doc.tag(node), Some("div"));
        assert_eq!(doc.attribute(node, "class"), Some("boo"));
        let children = doc.children(node);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.text(children[0]), Some("hello"));
    }

    #[test]
    fn style_swap_keeps_text_leaf() {
        let mut doc = Document::new();
        let first = div![cls("boo"), "hello"].apply(&mut doc, None);
        let text = doc.children(first)[0];
        doc.take_stats();

        let second = div![style("background: black"), "hello"].apply(&mut doc, Some(first));
        assert_eq!(second, first);
        assert_eq!(doc.children(second), &[text]);
        assert_eq!(doc.attribute(second, "class"), None);
        assert_eq!(doc.attribute(second, "style"), Some("background: black"));
        let stats = doc.take_stats();
        assert_eq!(stats.attributes_set, 1);
        assert_eq!(stats.attributes_removed, 1);
        assert_eq!(stats.mutations(), 2);
    }

    #[test]
    fn tag_change_forces_rebuild() {
        let mut doc = Document::new();
        let h1 = el!("h1", "heh").apply(&mut doc, None);
        let h2 = el!("h2", "heh").apply(&mut doc, Some(h1));
        assert_ne!(h1, h2);
        assert_eq!(doc.tag(h2), Some("h2"));
        assert_eq!(doc.tag(h1), Some("h1"));
        assert_eq!(doc.text_content(h1), "heh");
    }

    #[test]
    fn growing_children_appends_only() {
        let mut doc = Document::new();
        let node = span![el!("h2", "a"), el!("h3", "b")].apply(&mut doc, None);
        let before = doc.children(node).to_vec();
        doc.take_stats();

        let node = span![el!("h2", "a"), "zoo", el!("h3", "b")].apply(&mut doc, Some(node));
        let after = doc.children(node);
        assert_eq!(after.len(), 3);
        assert_eq!(after[0], before[0]);
        assert_eq!(doc.text(after[1]), Some("zoo"));
        assert_eq!(doc.tag(after[2]), Some("h3"));
        let stats = doc.take_stats();
        assert_eq!(stats.children_appended, 1);
    }

    #[test]
    fn shrinking_children_trims_from_end() {
        let mut doc = Document::new();
        let node = div!["a", "b", "c"].apply(&mut doc, None);
        let first = doc.children(node)[0];
        let dropped = doc.children(node)[2];
        doc.take_stats();

        let node = div!["a", "b"].apply(&mut doc, Some(node));
        assert_eq!(doc.children(node).len(), 2);
        assert_eq!(doc.children(node)[0], first);
        assert!(!doc.is_live(dropped));
        assert_eq!(doc.take_stats().children_removed, 1);
    }

    #[test]
    fn empty_attribute_value_removes() {
        let mut doc = Document::new();
        let node = div![id("x")].apply(&mut doc, None);
        let node = div![id("")].apply(&mut doc, Some(node));
        assert_eq!(doc.attribute(node, "id"), None);
        assert!(doc.attributes(node).is_empty());
    }

    #[test]
    fn dispatcher_is_installed_once_and_sees_current_callbacks() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut doc = Document::new();

        let first = Rc::clone(&seen);
        let node = div![click(move |_| first.borrow_mut().push("first"))].apply(&mut doc, None);
        assert_eq!(doc.take_stats().dispatchers_installed, 1);

        let second = Rc::clone(&seen);
        let node = div![click(move |_| second.borrow_mut().push("second"))].apply(&mut doc, Some(node));
        let stats = doc.take_stats();
        assert_eq!(stats.dispatchers_installed, 0);
        assert_eq!(stats.callbacks_swapped, 1);
        assert!(stats.is_quiet());

        doc.dispatch(node, &mut Event::new("click"));
        assert_eq!(*seen.borrow(), vec!["second"]);

        let node = div![].apply(&mut doc, Some(node));
        assert!(!doc.has_listener(node, "click"));
        assert_eq!(doc.take_stats().dispatchers_removed, 1);
    }

    #[test]
    fn foreign_previous_is_never_reused() {
        let mut doc = Document::new();
        let foreign = doc.create_foreign("div");
        let node = div!["x"].apply(&mut doc, Some(foreign));
        assert_ne!(node, foreign);
        assert!(doc.children(foreign).is_empty());
    }

    #[test]
    fn foreign_child_is_used_as_is_and_survives_removal() {
        let mut doc = Document::new();
        let img = doc.create_foreign("img");
        doc.set_foreign_attribute(img, "src", "data:,");
        let child = Child::node(&doc, img).expect("foreign child");
        let node = div!["caption", child].apply(&mut doc, None);
        assert_eq!(doc.children(node)[1], img);
        assert_eq!(doc.parent(img), Some(node));

        let node = div!["caption", "gone"].apply(&mut doc, Some(node));
        assert!(doc.is_live(img));
        assert_eq!(doc.parent(img), None);
        assert_eq!(doc.text(doc.children(node)[1]), Some("gone"));
        assert_eq!(doc.attribute(img, "src"), Some("data:,"));
    }

    #[test]
    fn released_foreign_child_keeps_child_count() {
        let mut doc = Document::new();
        let canvas = doc.create_foreign("canvas");
        let child = Child::node(&doc, canvas).expect("foreign child");
        doc.release(canvas);
        let node = div![child, "after"].apply(&mut doc, None);
        assert_eq!(doc.children(node).len(), 2);
    }
}
