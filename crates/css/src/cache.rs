use crate::normalize::{is_nested, normalize, scope};
use dom::{Attr, BuildError, Child, Descriptor, cls, tag, thunk};
use std::collections::HashMap;
use std::rc::Rc;

pub const DEFAULT_PREFIX: &str = "c";

/// Deduplicating generator of CSS classes.
///
/// Every distinct key gets exactly one class name for the lifetime of the
/// cache (until [`ClassCache::clear`]), and the rule text for that name is
/// appended to the shared sheet once.
#[derive(Debug)]
pub struct ClassCache {
    prefix: String,
    generated: HashMap<String, String>,
    next_ordinal: u64,
    sheet: String,
    rules: Vec<Rc<str>>,
    epoch: u64,
}

impl Default for ClassCache {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl ClassCache {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            generated: HashMap::new(),
            next_ordinal: 0,
            sheet: String::new(),
            rules: Vec::new(),
            epoch: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Class attribute for `key`. `compute` runs only the first time the key
    /// is seen; its result is normalized and becomes the class's rule.
    pub fn generate_class(&mut self, key: &str, compute: impl FnOnce() -> String) -> Attr {
        if let Some(name) = self.generated.get(key) {
            return cls(name.as_str());
        }
        let name = self.commit(key, &compute());
        cls(name)
    }

    /// Like [`ClassCache::generate_class`], but a failing `compute` leaves
    /// the cache exactly as it was.
    pub fn try_generate_class<E>(
        &mut self,
        key: &str,
        compute: impl FnOnce() -> Result<String, E>,
    ) -> Result<Attr, E> {
        if let Some(name) = self.generated.get(key) {
            return Ok(cls(name.as_str()));
        }
        let text = compute()?;
        Ok(cls(self.commit(key, &text)))
    }

    /// Class whose key is its own rule text.
    pub fn css(&mut self, text: &str) -> Attr {
        self.generate_class(text, || text.to_string())
    }

    pub fn class_name(&self, key: &str) -> Option<&str> {
        self.generated.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.generated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generated.is_empty()
    }

    pub fn sheet(&self) -> &str {
        &self.sheet
    }

    /// Number of `clear` calls so far. Anything memoized on class names
    /// should include it in its key.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Forgets every generated class and empties the sheet. Ordinals keep
    /// counting, so names handed out before the reset are never reissued.
    pub fn clear(&mut self) {
        log::debug!(target: "css.cache", "clear {} classes", self.generated.len());
        self.generated.clear();
        self.sheet.clear();
        self.rules.clear();
        self.epoch += 1;
    }

    /// `<style>` element holding the sheet, one text child per rule.
    ///
    /// Keyed on the sheet's generation, so an unchanged sheet costs nothing
    /// to reconcile and a grown one only appends the new rules.
    pub fn sheet_descriptor(&self) -> Result<Descriptor, BuildError> {
        let rules = self.rules.clone();
        thunk(&(self.epoch, rules.len()), move || {
            let children = rules.iter().map(|rule| Child::from(rule.to_string())).collect();
            tag("style", children)
        })
    }

    fn commit(&mut self, key: &str, text: &str) -> String {
        let name = format!("{}{}", self.prefix, self.next_ordinal);
        self.next_ordinal += 1;

        let text = normalize(text);
        let rule = if is_nested(&text) {
            let mut rule = scope(&text, &name);
            rule.push('\n');
            rule
        } else {
            format!(".{name} {{{text}}}\n")
        };
        log::debug!(target: "css.cache", "generate {name}: {}", rule.trim_end());

        self.sheet.push_str(&rule);
        self.rules.push(Rc::from(rule));
        self.generated.insert(key.to_string(), name.clone());
        name
    }
}
