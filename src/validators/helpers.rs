//! Lexical checks shared by the validator passes
//!
//! Language tags, IRIs, code points, decimal ranges, timestamps and the format style
//! vocabulary.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use url::Url;

/// BCP-47 language tag (RFC 5646 `langtag`, private use and grandfathered forms)
static BCP47: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^(?:
            (?:
                (?:[A-Za-z]{2,3}(?:-[A-Za-z]{3}){0,3}|[A-Za-z]{4}|[A-Za-z]{5,8})
                (?:-[A-Za-z]{4})?
                (?:-(?:[A-Za-z]{2}|[0-9]{3}))?
                (?:-(?:[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*
                (?:-[0-9A-WY-Za-wy-z](?:-[A-Za-z0-9]{2,8})+)*
                (?:-[Xx](?:-[A-Za-z0-9]{1,8})+)?
            )
            |[Xx](?:-[A-Za-z0-9]{1,8})+
            |[Ii]-[A-Za-z]{2,8}
            |en-GB-oed
            |sgn-[A-Za-z]{2}-[A-Za-z]{2,3}
        )$",
    )
    .expect("static regex")
});

static BASE: Lazy<Option<Url>> = Lazy::new(|| Url::parse("http://xliff.invalid/").ok());

/// Whether a value is a well-formed BCP-47 language tag
pub fn is_bcp47(tag: &str) -> bool {
    BCP47.is_match(tag)
}

/// Whether a value is an absolute IRI or a relative reference
pub fn is_iri(value: &str) -> bool {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || "<>\"{}|\\^`".contains(c)) {
        return false;
    }
    if Url::parse(value).is_ok() {
        return true;
    }
    match BASE.as_ref() {
        Some(base) => base.join(value).is_ok(),
        None => false,
    }
}

/// Whether a code point is a legal XML 1.0 `Char`
pub fn is_xml_char(cp: u32) -> bool {
    matches!(cp,
        0x9 | 0xA | 0xD
        | 0x20..=0xD7FF
        | 0xE000..=0xFFFD
        | 0x10000..=0x10FFFF)
}

/// Check a `cp/@hex` value
///
/// The value must be hexadecimal, at most `10FFFF`, and name a code point that
/// cannot appear literally in XML 1.0 (otherwise it must be written as text).
pub fn check_code_point(hex: &str) -> Result<u32, String> {
    if hex.is_empty() || hex.len() > 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("'{}' is not a hexadecimal code point", hex));
    }
    let cp = u32::from_str_radix(hex, 16).map_err(|e| e.to_string())?;
    if cp > 0x10FFFF {
        return Err(format!("U+{:X} is beyond the Unicode range", cp));
    }
    if is_xml_char(cp) {
        return Err(format!(
            "U+{:04X} is a valid XML character and must not be escaped with <cp>",
            cp
        ));
    }
    Ok(cp)
}

/// Parse an `xs:decimal` lexical value (no exponent, no special values)
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim()).ok()
}

/// Parse a decimal and check it lies within `min..=max`
pub fn in_decimal_range(value: &str, min: i64, max: i64) -> bool {
    parse_decimal(value)
        .map(|v| v >= Decimal::from(min) && v <= Decimal::from(max))
        .unwrap_or(false)
}

/// Check an `xs:dateTime` value, with or without a timezone
pub fn is_date_time(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
        || NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}

/// Parse an unsigned integer and check it lies within `min..=max`
pub fn in_integer_range(value: &str, min: u64, max: u64) -> bool {
    value
        .parse::<u64>()
        .map(|v| v >= min && v <= max)
        .unwrap_or(false)
}

/// HTML element names allowed in `fs:fs`
pub const FORMAT_STYLE_ELEMENTS: &[&str] = &[
    "a", "b", "bdo", "big", "blockquote", "body", "br", "button", "caption", "center", "cite",
    "code", "col", "colgroup", "dd", "del", "div", "dl", "dt", "em", "embed", "fieldset",
    "font", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr",
    "html", "i", "iframe", "img", "input", "ins", "kbd", "label", "legend", "li", "link",
    "map", "menu", "meta", "noframes", "noscript", "object", "ol", "optgroup", "option", "p",
    "param", "pre", "q", "s", "samp", "select", "small", "span", "strike", "strong", "sub",
    "sup", "table", "tbody", "td", "textarea", "tfoot", "th", "thead", "title", "tr", "tt",
    "u", "ul",
];

/// Check an `fs:subFs` value: `name,value` pairs separated by backslashes
pub fn is_sub_fs(value: &str) -> bool {
    !value.is_empty()
        && value.split('\\').all(|pair| match pair.split_once(',') {
            Some((name, _)) => !name.is_empty() && !name.contains(char::is_whitespace),
            None => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcp47() {
        for tag in ["en", "en-US", "zh-Hant-TW", "de-CH-1901", "x-private", "i-klingon", "es-419"] {
            assert!(is_bcp47(tag), "{}", tag);
        }
        for tag in ["", "e", "en_US", "toolonglanguage", "en--US", "-en"] {
            assert!(!is_bcp47(tag), "{}", tag);
        }
    }

    #[test]
    fn test_iri() {
        assert!(is_iri("http://example.com/a.xlf"));
        assert!(is_iri("skeleton.skl"));
        assert!(is_iri("../shared/file.xml#f=f1"));
        assert!(!is_iri("has space.xml"));
        assert!(!is_iri(""));
    }

    #[test]
    fn test_code_point() {
        assert_eq!(check_code_point("1"), Ok(1));
        assert_eq!(check_code_point("FFFE"), Ok(0xFFFE));
        assert_eq!(check_code_point("d800"), Ok(0xD800));
        assert!(check_code_point("41").is_err());
        assert!(check_code_point("9").is_err());
        assert!(check_code_point("110000").is_err());
        assert!(check_code_point("zz").is_err());
        assert!(check_code_point("").is_err());
    }

    #[test]
    fn test_ranges() {
        assert!(in_decimal_range("99.5", 0, 100));
        assert!(in_decimal_range("100.00", 0, 100));
        assert!(!in_decimal_range("100.1", 0, 100));
        assert!(!in_decimal_range("-0.5", 0, 100));
        assert!(!in_decimal_range("high", 0, 100));
        assert!(in_integer_range("10", 1, 10));
        assert!(!in_integer_range("0", 1, 10));
    }

    #[test]
    fn test_date_time() {
        assert!(is_date_time("2024-03-01T10:15:00Z"));
        assert!(is_date_time("2024-03-01T10:15:00.250+02:00"));
        assert!(is_date_time("2024-03-01T10:15:00"));
        assert!(!is_date_time("2024-03-01"));
        assert!(!is_date_time("yesterday"));
    }

    #[test]
    fn test_sub_fs() {
        assert!(is_sub_fs("href,http://example.com"));
        assert!(is_sub_fs("src,a.png\\alt,Logo"));
        assert!(!is_sub_fs("href"));
        assert!(!is_sub_fs(""));
    }
}
