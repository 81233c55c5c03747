//! Rendering result items as Alfred's feedback XML
//!
//! ```text
//! <?xml version="1.0"?><items><item uid=".." arg=".." valid="yes"><arg>..</arg>
//! <title>..</title><subtitle>..</subtitle><icon type="fileicon">..</icon></item></items>
//! ```
//!
//! Known fields are rendered through [`FIELD_RULES`], in table order. Any other
//! field becomes a child element named after the key, after the known ones;
//! such keys must be valid XML names. Characters XML 1.0 cannot carry are
//! dropped, and whitespace inside attributes is written as character references.

use crate::error::{Error, Result};

/// How one field of an item is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Attribute on `<item>`
    Attribute,
    /// Attribute on `<item>` and a child element with the same text
    AttributeAndElement,
    /// Child element
    Element,
    /// Attribute on `<item>`, only for one of the listed values
    AttributeIfOneOf(&'static [&'static str]),
    /// Child element; a matching prefix is stripped and becomes its `type` attribute
    PrefixedElement(&'static [(&'static str, &'static str)]),
}

/// Rendering rule per known field, in emission order
pub const FIELD_RULES: &[(&str, Rule)] = &[
    ("uid", Rule::Attribute),
    ("arg", Rule::AttributeAndElement),
    ("title", Rule::Element),
    ("subtitle", Rule::Element),
    (
        "icon",
        Rule::PrefixedElement(&[("fileicon:", "fileicon"), ("filetype:", "filetype")]),
    ),
    ("valid", Rule::AttributeIfOneOf(&["yes", "no"])),
    ("autocomplete", Rule::Attribute),
    ("type", Rule::Attribute),
];

const DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// Render items, each given as (field, value) pairs, into a feedback document
pub fn render<S: AsRef<str>>(items: &[Vec<(S, S)>]) -> Result<String> {
    if items.is_empty() {
        return Err(Error::NoResults);
    }

    let mut out = String::from(DECLARATION);
    out.push_str("<items>");
    for fields in items {
        render_item(&mut out, fields)?;
    }
    out.push_str("</items>");
    Ok(out)
}

fn render_item<S: AsRef<str>>(out: &mut String, fields: &[(S, S)]) -> Result<()> {
    let lookup = |name: &str| {
        fields
            .iter()
            .find(|(key, _)| key.as_ref() == name)
            .map(|(_, value)| value.as_ref())
    };

    let mut attrs = String::new();
    let mut children = String::new();

    for &(name, rule) in FIELD_RULES {
        let Some(value) = lookup(name) else {
            continue;
        };

        match rule {
            Rule::Attribute => push_attr(&mut attrs, name, value),
            Rule::AttributeAndElement => {
                push_attr(&mut attrs, name, value);
                push_element(&mut children, name, "", value);
            }
            Rule::Element => push_element(&mut children, name, "", value),
            Rule::AttributeIfOneOf(allowed) => {
                if allowed.contains(&value) {
                    push_attr(&mut attrs, name, value);
                }
            }
            Rule::PrefixedElement(prefixes) => {
                let prefixed = prefixes.iter().find_map(|&(prefix, kind)| {
                    value.strip_prefix(prefix).map(|rest| (kind, rest))
                });

                match prefixed {
                    Some((kind, rest)) => {
                        let mut icon_attrs = String::new();
                        push_attr(&mut icon_attrs, "type", kind);
                        push_element(&mut children, name, &icon_attrs, rest);
                    }
                    None => push_element(&mut children, name, "", value),
                }
            }
        }
    }

    for (key, value) in fields {
        let key = key.as_ref();
        if FIELD_RULES.iter().any(|(name, _)| *name == key) {
            continue;
        }
        if !is_name(key) {
            return Err(Error::InvalidResults(format!(
                "'{}' is not a valid element name",
                key
            )));
        }
        push_element(&mut children, key, "", value.as_ref());
    }

    out.push_str("<item");
    out.push_str(&attrs);
    out.push('>');
    out.push_str(&children);
    out.push_str("</item>");
    Ok(())
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value, true));
    out.push('"');
}

fn push_element(out: &mut String, name: &str, attrs: &str, text: &str) {
    out.push('<');
    out.push_str(name);
    out.push_str(attrs);
    out.push('>');
    out.push_str(&escape(text, false));
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Escape markup characters for element text or, with `attribute`, an attribute value
///
/// Attribute values keep tabs and line breaks as character references so
/// they survive attribute-value normalization. A carriage return is always
/// referenced, otherwise line-end normalization turns it into a newline.
pub fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|c| is_xml_char(*c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\r' => escaped.push_str("&#13;"),
            '"' if attribute => escaped.push_str("&quot;"),
            '\n' if attribute => escaped.push_str("&#10;"),
            '\t' if attribute => escaped.push_str("&#9;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The `Char` production of XML 1.0
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// The `Name` production of XML 1.0
pub fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}
