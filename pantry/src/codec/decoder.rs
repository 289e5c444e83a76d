use crate::codec::scanner::{split_key_value, split_top_level};
use crate::collection::{Document, DocumentId};
use crate::common::Value;
use indexmap::IndexMap;

/// The documents of one collection file, in file order.
pub type CollectionSnapshot = IndexMap<DocumentId, Document>;

/// Decodes a document from the single-line JSON the encoder writes.
///
/// Decoding never fails. Text that is not brace-delimited yields an empty
/// document, and a field without a top-level colon is skipped. Values are
/// recognized in this order:
///
/// 1. `null`, `true`, `false`
/// 2. a quoted string, with escapes resolved
/// 3. a nested `{...}` document
/// 4. a number: a float if it contains `.`, otherwise an integer
/// 5. anything else is kept as the raw text
///
/// ```rust
/// use pantry::codec::decode;
/// use pantry::common::Value;
///
/// let doc = decode(r#"{"name":"Tiramisu","price":8.99,"qty":2}"#);
/// assert_eq!(doc.get("price"), Some(&Value::F64(8.99)));
/// assert_eq!(doc.get("qty"), Some(&Value::I64(2)));
/// ```
pub fn decode(text: &str) -> Document {
    match strip_braces(text) {
        Some(body) => decode_fields(body),
        None => {
            if !text.trim().is_empty() {
                log::warn!("Document is not enclosed in braces: {}", text);
            }
            Document::new()
        }
    }
}

/// Decodes a collection file keyed by document ID.
///
/// Empty input is an empty collection. Entries whose document is empty or
/// malformed are skipped; a repeated ID keeps the last document.
pub fn decode_collection(text: &str) -> CollectionSnapshot {
    let mut snapshot = CollectionSnapshot::new();
    let body = match strip_braces(text) {
        Some(body) => body,
        None => {
            if !text.trim().is_empty() {
                log::warn!("Collection data is not enclosed in braces, ignoring it");
            }
            return snapshot;
        }
    };

    for entry in split_top_level(body, ',') {
        let Some((key, value)) = split_key_value(entry) else {
            log::warn!("Skipping collection entry without key: {}", entry);
            continue;
        };

        let id = decode_key(key);
        if id.is_empty() {
            log::warn!("Skipping collection entry with empty id: {}", entry);
            continue;
        }

        let document = decode(value);
        if document.is_empty() {
            log::warn!("Skipping empty or malformed document with id {}", id);
            continue;
        }
        snapshot.insert(DocumentId::from(id), document);
    }
    snapshot
}

fn decode_fields(body: &str) -> Document {
    split_top_level(body, ',')
        .into_iter()
        .filter_map(|field| match split_key_value(field) {
            Some((key, value)) => {
                let key = decode_key(key);
                if key.is_empty() {
                    log::warn!("Skipping field with empty key: {}", field);
                    None
                } else {
                    Some((key, decode_value(value)))
                }
            }
            None => {
                log::warn!("Skipping field without value: {}", field);
                None
            }
        })
        .collect()
}

fn decode_key(raw: &str) -> String {
    match strip_quotes(raw) {
        Some(inner) => unescape(inner),
        None => raw.trim().to_string(),
    }
}

fn decode_value(raw: &str) -> Value {
    let raw = raw.trim();
    match raw {
        "null" => return Value::Null,
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Some(inner) = strip_quotes(raw) {
        return Value::String(unescape(inner));
    }

    if strip_braces(raw).is_some() {
        return Value::Document(decode(raw));
    }

    if raw.contains('.') {
        if let Ok(number) = raw.parse::<f64>() {
            return Value::F64(number);
        }
    } else if let Ok(number) = raw.parse::<i64>() {
        return Value::I64(number);
    }

    // arrays and anything else unrecognized survive as raw text
    Value::String(raw.to_string())
}

fn strip_braces(text: &str) -> Option<&str> {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('{') && text.ends_with('}') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        Some(&text[1..text.len() - 1])
    } else {
        None
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) if hex.len() == 4 => {
                        out.push(decoded);
                        for _ in 0..4 {
                            chars.next();
                        }
                    }
                    _ => out.push_str("\\u"),
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{encode, encode_collection};
    use crate::doc;

    #[test]
    fn decodes_scalars() {
        let doc = decode(r#"{"a":null,"b":true,"c":false,"d":-7,"e":1.25,"f":"x"}"#);
        assert_eq!(doc.get("a"), Some(&Value::Null));
        assert_eq!(doc.get("b"), Some(&Value::Bool(true)));
        assert_eq!(doc.get("c"), Some(&Value::Bool(false)));
        assert_eq!(doc.get("d"), Some(&Value::I64(-7)));
        assert_eq!(doc.get("e"), Some(&Value::F64(1.25)));
        assert_eq!(doc.get("f"), Some(&Value::from("x")));
    }

    #[test]
    fn tolerates_whitespace() {
        let doc = decode("  { \"a\" : 1 , \"b\" :\t\"two\" }  ");
        assert_eq!(doc, doc! { a: 1, b: "two" });
    }

    #[test]
    fn keeps_field_order() {
        let doc = decode(r#"{"z":1,"a":2,"m":3}"#);
        let keys: Vec<&String> = doc.keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn unescapes_strings() {
        let doc = decode(r#"{"s":"a\"b\\c\nd\re\tf\/g\u00e9"}"#);
        assert_eq!(doc.get("s"), Some(&Value::from("a\"b\\c\nd\re\tf/gé")));
    }

    #[test]
    fn unknown_escapes_are_kept() {
        let doc = decode(r#"{"s":"a\qb\u12"}"#);
        assert_eq!(doc.get("s"), Some(&Value::from("a\\qb\\u12")));
    }

    #[test]
    fn decodes_nested_document() {
        let doc = decode(r#"{"customer":{"name":"Ann","address":{"city":"Rome"}},"n":1}"#);
        let expected = doc! {
            customer: { name: "Ann", address: { city: "Rome" } },
            n: 1,
        };
        assert_eq!(doc, expected);
    }

    #[test]
    fn arrays_fall_back_to_raw_text() {
        let doc = decode(r#"{"tags":["hot","veg"],"n":1}"#);
        assert_eq!(doc.get("tags"), Some(&Value::from(r#"["hot","veg"]"#)));
        assert_eq!(doc.get("n"), Some(&Value::I64(1)));
    }

    #[test]
    fn unparseable_numbers_become_strings() {
        let doc = decode(r#"{"a":1.2.3,"b":12abc,"c":99999999999999999999}"#);
        assert_eq!(doc.get("a"), Some(&Value::from("1.2.3")));
        assert_eq!(doc.get("b"), Some(&Value::from("12abc")));
        assert_eq!(doc.get("c"), Some(&Value::from("99999999999999999999")));
    }

    #[test]
    fn malformed_input_yields_empty_document() {
        assert!(decode("").is_empty());
        assert!(decode("not json").is_empty());
        assert!(decode("{").is_empty());
        assert!(decode("{}").is_empty());
    }

    #[test]
    fn skips_fields_without_colon() {
        let doc = decode(r#"{"a":1,"broken","b":2}"#);
        assert_eq!(doc, doc! { a: 1, b: 2 });
    }

    #[test]
    fn round_trips_tricky_strings() {
        let original = doc! {
            "key:with,chars": "value, with: {braces} and [brackets]",
            quote: "she said \"ok\"",
            slash: "C:\\temp\\",
            lines: "one\ntwo\r\n\tthree",
            empty: "",
            unicode: "Crème Brûlée",
        };
        assert_eq!(decode(&encode(&original)), original);
    }

    #[test]
    fn round_trips_numbers() {
        let original = doc! {
            min: (i64::MIN),
            max: (i64::MAX),
            whole: 2.0,
            price: 16.99,
            tiny: 0.000001,
        };
        let decoded = decode(&encode(&original));
        assert_eq!(decoded, original);
        assert!(decoded.get("whole").unwrap().is_decimal());
    }

    #[test]
    fn decodes_collection() {
        let a = doc! { id: 1, name: "a" };
        let b = doc! { id: "x", name: "b" };
        let first = DocumentId::from(1u64);
        let second = DocumentId::from("x");
        let text = encode_collection(vec![(&first, &a), (&second, &b)]);

        let snapshot = decode_collection(&text);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("1"), Some(&a));
        assert_eq!(snapshot.get("x"), Some(&b));
    }

    #[test]
    fn collection_skips_bad_entries() {
        let text = r#"{"1":{"id":1},"2":{},"3":"oops","4":{"id":4},"":{"id":5}}"#;
        let snapshot = decode_collection(text);
        let ids: Vec<&str> = snapshot.keys().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn empty_or_garbage_collection() {
        assert!(decode_collection("").is_empty());
        assert!(decode_collection("   \n").is_empty());
        assert!(decode_collection("{}").is_empty());
        assert!(decode_collection("[1,2,3]").is_empty());
    }
}
