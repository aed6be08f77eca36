//! Typed attribute values from raw literal text.

use agx_core::{Attribute, AttributeValue};

use crate::parser_types::AttributeDecl;

/// Coerce a raw literal into a typed value.
///
/// Rules, in order:
///
/// 1. `true` / `false` become booleans.
/// 2. Text wrapped in matching double or single quotes becomes the inner
///    text, verbatim. It is not coerced again, so `"8080"` stays a string.
/// 3. Text that parses as a finite number becomes a number.
/// 4. Anything else stays a string, unchanged.
///
/// # Example
///
/// ```
/// # use agx_core::AttributeValue;
/// # use agx_parser::coerce_value;
/// assert_eq!(coerce_value("8080"), AttributeValue::Number(8080.0));
/// assert_eq!(coerce_value("\"8080\""), AttributeValue::String("8080".into()));
/// assert_eq!(coerce_value("true"), AttributeValue::Boolean(true));
/// assert_eq!(coerce_value("web-server"), AttributeValue::String("web-server".into()));
/// ```
pub fn coerce_value(raw: &str) -> AttributeValue {
    match raw {
        "true" => return AttributeValue::Boolean(true),
        "false" => return AttributeValue::Boolean(false),
        _ => {}
    }

    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return AttributeValue::String(inner.to_string());
        }
    }

    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => AttributeValue::Number(number),
        _ => AttributeValue::String(raw.to_string()),
    }
}

/// Build typed attributes from raw declarations, keeping order and
/// duplicates.
pub(crate) fn build_attributes(decls: &[AttributeDecl<'_>]) -> Vec<Attribute> {
    decls
        .iter()
        .map(|decl| Attribute::new(*decl.name.inner(), coerce_value(decl.value.inner())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::{Span, Spanned};

    #[test]
    fn test_booleans() {
        assert_eq!(coerce_value("true"), AttributeValue::Boolean(true));
        assert_eq!(coerce_value("false"), AttributeValue::Boolean(false));
        assert_eq!(coerce_value("True"), AttributeValue::String("True".into()));
    }

    #[test]
    fn test_quoted_text_is_not_coerced_again() {
        assert_eq!(coerce_value("\"8080\""), AttributeValue::String("8080".into()));
        assert_eq!(coerce_value("'true'"), AttributeValue::String("true".into()));
        assert_eq!(coerce_value("\"\""), AttributeValue::String(String::new()));
    }

    #[test]
    fn test_mismatched_quotes_stay_verbatim() {
        assert_eq!(coerce_value("\"abc'"), AttributeValue::String("\"abc'".into()));
        assert_eq!(coerce_value("\""), AttributeValue::String("\"".into()));
    }

    #[test]
    fn test_escapes_are_kept_verbatim() {
        assert_eq!(
            coerce_value(r#""say \"hi\"""#),
            AttributeValue::String(r#"say \"hi\""#.into())
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(coerce_value("8080"), AttributeValue::Number(8080.0));
        assert_eq!(coerce_value("-2.5"), AttributeValue::Number(-2.5));
        assert_eq!(coerce_value("1e3"), AttributeValue::Number(1000.0));
    }

    #[test]
    fn test_non_finite_numbers_stay_strings() {
        assert_eq!(coerce_value("inf"), AttributeValue::String("inf".into()));
        assert_eq!(coerce_value("NaN"), AttributeValue::String("NaN".into()));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            coerce_value("web-server"),
            AttributeValue::String("web-server".into())
        );
        assert_eq!(coerce_value("Local"), AttributeValue::String("Local".into()));
    }

    #[test]
    fn test_build_attributes_keeps_duplicates_in_order() {
        let decls = vec![
            AttributeDecl {
                name: Spanned::new("Port", Span::new(0..4)),
                value: Spanned::new("80", Span::new(7..9)),
            },
            AttributeDecl {
                name: Spanned::new("Port", Span::new(11..15)),
                value: Spanned::new("'443'", Span::new(18..23)),
            },
        ];

        let attrs = build_attributes(&decls);

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].value(), &AttributeValue::Number(80.0));
        assert_eq!(attrs[1].value(), &AttributeValue::String("443".into()));
        assert_eq!(
            agx_core::attribute::find_attribute(&attrs, "Port"),
            Some(&AttributeValue::Number(80.0))
        );
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn integer_text_coerces_to_number(n in any::<i64>()) {
            prop_assert_eq!(coerce_value(&n.to_string()), AttributeValue::Number(n as f64));
        }

        #[test]
        fn quoted_text_stays_string(text in "[^\"\\n]{0,24}") {
            let raw = format!("\"{text}\"");
            prop_assert_eq!(coerce_value(&raw), AttributeValue::String(text));
        }
    }
}
