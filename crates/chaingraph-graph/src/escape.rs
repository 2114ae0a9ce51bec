//! Escaping for values and identifiers embedded in Cypher text.
//!
//! Values are normally bound as parameters and never pass through here.
//! [`QueryMode::Inline`](crate::QueryMode::Inline) renders them as literals
//! instead, and that path relies on [`escape_quotes`].
//!
//! Known limitation: only the single quote is escaped. Backslashes, braces and
//! colons inside a value keep their meaning in the query language, so inline
//! rendering is not injection-safe for arbitrary input.

use chaingraph_core::PropertyValue;

/// Prefix every `'` with a backslash. All other characters are unchanged.
pub fn escape_quotes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escape a value for literal embedding. Only strings are transformed.
pub fn sanitize(value: &PropertyValue) -> PropertyValue {
    match value {
        PropertyValue::String(s) => PropertyValue::String(escape_quotes(s)),
        other => other.clone(),
    }
}

/// Render a value as a Cypher literal.
pub fn literal(value: &PropertyValue) -> String {
    match sanitize(value) {
        PropertyValue::String(s) => format!("'{s}'"),
        PropertyValue::Integer(i) => i.to_string(),
        // Debug keeps the fractional part, so 1.0 stays a float.
        PropertyValue::Float(x) => format!("{x:?}"),
        PropertyValue::Boolean(b) => b.to_string(),
    }
}

/// Wrap a label, relationship type or property name in backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_every_quote() {
        assert_eq!(escape_quotes("O'Reilly"), "O\\'Reilly");
        assert_eq!(escape_quotes("''"), "\\'\\'");
        assert_eq!(escape_quotes("a'b'c"), "a\\'b\\'c");
    }

    #[test]
    fn leaves_other_characters_alone() {
        let s = "华为{name:\"x\"}\\n";
        assert_eq!(escape_quotes(s), s);
        assert_eq!(escape_quotes(""), "");
    }

    #[test]
    fn sanitize_only_touches_strings() {
        assert_eq!(
            sanitize(&PropertyValue::from("it's")),
            PropertyValue::from("it\\'s")
        );
        assert_eq!(sanitize(&PropertyValue::Integer(3)), PropertyValue::Integer(3));
        assert_eq!(sanitize(&PropertyValue::Float(0.5)), PropertyValue::Float(0.5));
        assert_eq!(
            sanitize(&PropertyValue::Boolean(true)),
            PropertyValue::Boolean(true)
        );
    }

    #[test]
    fn literals() {
        assert_eq!(literal(&PropertyValue::from("it's")), "'it\\'s'");
        assert_eq!(literal(&PropertyValue::Integer(-4)), "-4");
        assert_eq!(literal(&PropertyValue::Float(1.0)), "1.0");
        assert_eq!(literal(&PropertyValue::Boolean(false)), "false");
    }

    #[test]
    fn identifiers_are_backquoted() {
        assert_eq!(quote_identifier("company"), "`company`");
        assert_eq!(quote_identifier("所属行业"), "`所属行业`");
        assert_eq!(quote_identifier("a`b"), "`a``b`");
    }
}
