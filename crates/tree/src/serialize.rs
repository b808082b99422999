//! Compact and indented JSON writers.
use crate::node::{Content, Document, Node};
use crate::scalar::Scalar;
use std::fmt;

impl<'a> Node<'a> {
    /// Compact JSON text: keys quoted, `,` and `:` delimiters, no whitespace.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        write_compact(*self, &mut out);
        out
    }

    /// Indented JSON text using `indent` spaces per level.
    pub fn to_pretty_json(&self, indent: usize) -> String {
        let mut out = String::new();
        write_pretty(*self, indent, 0, &mut out);
        out
    }
}

impl Document {
    pub fn to_json(&self) -> String {
        self.root().to_json()
    }

    pub fn to_pretty_json(&self, indent: usize) -> String {
        self.root().to_pretty_json(indent)
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

pub(crate) fn escape_into(text: &str, out: &mut String) {
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c < '\u{20}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_scalar(value: &Scalar, out: &mut String) {
    match value {
        Scalar::String(s) => escape_into(s, out),
        other => out.push_str(&other.to_string()),
    }
}

fn write_compact(node: Node<'_>, out: &mut String) {
    match &node.data().content {
        Content::Value(value) => write_scalar(value, out),
        Content::Array(_) => {
            out.push('[');
            for (i, child) in node.children().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_compact(child, out);
            }
            out.push(']');
        }
        Content::Object(_) => {
            out.push('{');
            for (i, (name, child)) in node.fields().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                escape_into(name, out);
                out.push(':');
                write_compact(child, out);
            }
            out.push('}');
        }
    }
}

fn newline(indent: usize, level: usize, out: &mut String) {
    out.push('\n');
    out.extend(std::iter::repeat_n(' ', indent * level));
}

fn write_pretty(node: Node<'_>, indent: usize, level: usize, out: &mut String) {
    match &node.data().content {
        Content::Value(value) => write_scalar(value, out),
        Content::Array(elements) if elements.is_empty() => out.push_str("[]"),
        Content::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Content::Array(_) => {
            out.push('[');
            for (i, child) in node.children().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(indent, level + 1, out);
                write_pretty(child, indent, level + 1, out);
            }
            newline(indent, level, out);
            out.push(']');
        }
        Content::Object(_) => {
            out.push('{');
            for (i, (name, child)) in node.fields().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(indent, level + 1, out);
                escape_into(name, out);
                out.push_str(": ");
                write_pretty(child, indent, level + 1, out);
            }
            newline(indent, level, out);
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::node::Document;

    #[test]
    fn test_compact_output_escapes_strings() {
        let mut doc = Document::object();
        let root = doc.root_id();
        let v = doc.create_value("say \"hi\"\n\\\u{01}");
        doc.insert_field(root, "quote\"key", v).unwrap();
        assert_eq!(
            doc.to_json(),
            r#"{"quote\"key":"say \"hi\"\n\\\u0001"}"#
        );
    }

    #[test]
    fn test_pretty_output() {
        let mut doc = Document::object();
        let root = doc.root_id();
        let list = doc.create_array();
        let one = doc.create_value(1);
        doc.push_element(list, one).unwrap();
        let empty = doc.create_object();
        doc.push_element(list, empty).unwrap();
        doc.insert_field(root, "list", list).unwrap();
        let flag = doc.create_value(false);
        doc.insert_field(root, "flag", flag).unwrap();

        let expected = "{\n  \"list\": [\n    1,\n    {}\n  ],\n  \"flag\": false\n}";
        assert_eq!(doc.to_pretty_json(2), expected);
        assert_eq!(Document::array().to_pretty_json(4), "[]");
    }

    #[test]
    fn test_real_values_keep_fraction() {
        let doc = Document::value(3.0f32);
        assert_eq!(doc.to_json(), "3.0");
    }
}
