use crate::document::{Document, NodeId};

fn push_escaped(out: &mut String, s: &str, attribute: bool) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

impl Document {
    /// HTML text of `id` and its subtree. Unknown ids yield an empty string.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.text(id) {
            // Raw text elements keep their content verbatim.
            let raw = self
                .parent(id)
                .and_then(|p| self.tag(p))
                .is_some_and(|t| t.eq_ignore_ascii_case("style") || t.eq_ignore_ascii_case("script"));
            if raw {
                out.push_str(text);
            } else {
                push_escaped(out, text, false);
            }
            return;
        }
        let Some(tag) = self.tag(id) else {
            return;
        };
        out.push('<');
        out.push_str(tag);
        for (key, value) in self.attributes(id) {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            push_escaped(out, value, true);
            out.push('"');
        }
        out.push('>');
        for child in self.children(id) {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}
