//! Keyed memoization of whole subtrees.
//!
//! The key is serialized once at construction. When the previous node is a
//! live element carrying the same recorded key, it is returned untouched and
//! the subtree below it is never visited.

use crate::builder::Descriptor;
use crate::document::{Document, NodeId};
use crate::error::BuildError;
use serde::Serialize;
use std::sync::Arc;

pub struct Thunk {
    key: Arc<str>,
    create: Box<dyn FnOnce() -> Descriptor>,
}

impl Thunk {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn apply(self, doc: &mut Document, prev: Option<NodeId>) -> NodeId {
        if let Some(prev) = prev {
            if doc.is_element(prev)
                && !doc.is_foreign(prev)
                && doc.memo_key(prev) == Some(&*self.key)
            {
                log::trace!(target: "dom.thunk", "skip {prev:?} key={}", self.key);
                return prev;
            }
        }
        let node = (self.create)().apply(doc, prev);
        doc.set_memo_key(node, &self.key);
        node
    }
}

pub fn thunk<K>(key: &K, create: impl FnOnce() -> Descriptor + 'static) -> Result<Descriptor, BuildError>
where
    K: Serialize + ?Sized,
{
    let key = serde_json::to_string(key)?;
    Ok(Descriptor::Thunk(Thunk {
        key: Arc::from(key),
        create: Box::new(create),
    }))
}
