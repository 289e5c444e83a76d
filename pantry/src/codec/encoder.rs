use crate::collection::{Document, DocumentId};
use crate::common::Value;

/// Encodes a document as single-line JSON, fields in document order.
///
/// ```rust
/// use pantry::codec::encode;
/// use pantry::doc;
///
/// let text = encode(&doc! { name: "Tiramisu", price: 8.99, available: true });
/// assert_eq!(text, r#"{"name":"Tiramisu","price":8.99,"available":true}"#);
/// ```
pub fn encode(document: &Document) -> String {
    let mut out = String::new();
    write_document(&mut out, document);
    out
}

/// Encodes a single value the way it appears inside a document.
pub fn encode_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Encodes a whole collection as one JSON object keyed by document ID.
///
/// Entries are written in iteration order.
pub fn encode_collection<'a, I>(documents: I) -> String
where
    I: IntoIterator<Item = (&'a DocumentId, &'a Document)>,
{
    let mut out = String::from("{");
    for (index, (id, document)) in documents.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        write_string(&mut out, id.as_str());
        out.push(':');
        write_document(&mut out, document);
    }
    out.push('}');
    out
}

fn write_document(out: &mut String, document: &Document) {
    out.push('{');
    for (index, (key, value)) in document.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push(':');
        write_value(out, value);
    }
    out.push('}');
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
        Value::I64(v) => out.push_str(&v.to_string()),
        Value::F64(v) => write_float(out, *v),
        Value::String(v) => write_string(out, v),
        Value::Document(v) => write_document(out, v),
    }
}

// a float always carries a decimal point so that it decodes as a float again
fn write_float(out: &mut String, value: f64) {
    if !value.is_finite() {
        log::warn!("Non-finite number {} cannot be represented, writing null", value);
        out.push_str("null");
        return;
    }

    let text = value.to_string();
    out.push_str(&text);
    if !text.contains('.') {
        out.push_str(".0");
    }
}

fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
