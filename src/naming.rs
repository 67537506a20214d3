//! # Naming Module
//!
//! Turns arbitrary schema, property, parameter and operation names from an
//! OpenAPI document into identifiers that are valid, collision-free C#.
//!
//! Every function here is pure and total: any input string, including the
//! empty string, produces a usable identifier.
//!
//! ```rust
//! use dotnet_sdkgen::naming::{identifier, pascal_identifier};
//!
//! assert_eq!(pascal_identifier("APIClient"), "ApiClient");
//! assert_eq!(pascal_identifier("get_payment_methods"), "GetPaymentMethods");
//! assert_eq!(identifier("class"), "classValue");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"[^0-9A-Za-z]+").expect("static pattern compiles")
});

/// C# keywords that cannot be used as bare identifiers.
const RESERVED: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const PLACEHOLDER: &str = "Value";
const RESERVED_SUFFIX: &str = "Value";

/// Target casing for [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Casing {
    /// `PascalCase`, for type and member names
    Pascal,
    /// `camelCase`, for arguments
    Camel,
}

/// Normalize `raw` into a keyword-safe identifier with the requested casing.
pub fn normalize(raw: &str, casing: Casing) -> String {
    let name = match casing {
        Casing::Pascal => pascal_case(raw),
        Casing::Camel => camel_case(raw),
    };
    ensure_not_reserved(name)
}

/// Convert any string into `PascalCase` without the keyword check.
pub fn pascal_case(input: &str) -> String {
    let words = split_into_words(input);
    let mut out = String::with_capacity(input.len());
    for word in words.iter().filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    sanitize_leading_character(out)
}

/// Convert any string into `camelCase` without the keyword check.
pub fn camel_case(input: &str) -> String {
    let pascal = pascal_case(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => PLACEHOLDER.to_lowercase(),
    }
}

/// `camelCase` identifier safe for arguments.
pub fn identifier(input: &str) -> String {
    normalize(input, Casing::Camel)
}

/// `PascalCase` identifier safe for public members and type names.
pub fn pascal_identifier(input: &str) -> String {
    normalize(input, Casing::Pascal)
}

/// Returns `true` when `name` is a C# keyword (compared case-insensitively).
pub fn is_reserved(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RESERVED.contains(&lower.as_str())
}

fn ensure_not_reserved(name: String) -> String {
    if is_reserved(&name) {
        return format!("{name}{RESERVED_SUFFIX}");
    }
    sanitize_leading_character(name)
}

fn sanitize_leading_character(input: String) -> String {
    match input.chars().next() {
        None => PLACEHOLDER.to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{input}"),
        Some(_) => input,
    }
}

fn split_into_words(input: &str) -> Vec<String> {
    NON_ALPHANUMERIC
        .split(input)
        .filter(|field| !field.is_empty())
        .flat_map(split_camel)
        .collect()
}

fn split_camel(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= 1 {
        return vec![word.to_string()];
    }
    let mut parts = Vec::new();
    let mut start = 0;
    for i in 1..chars.len() {
        let next = chars.get(i + 1).copied();
        if should_split(chars[i - 1], chars[i], next) {
            parts.push(chars[start..i].iter().collect());
            start = i;
        }
    }
    parts.push(chars[start..].iter().collect());
    parts
}

fn should_split(prev: char, curr: char, next: Option<char>) -> bool {
    if curr.is_ascii_digit() && !prev.is_ascii_digit() {
        return true;
    }
    if curr.is_uppercase() && !prev.is_uppercase() {
        return true;
    }
    curr.is_uppercase() && prev.is_uppercase() && next.is_some_and(char::is_lowercase)
}

/// Collapse whitespace and line breaks so text fits in a single-line doc comment.
pub fn sanitize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Single-line text safe inside a C# XML doc comment.
pub fn doc_text(value: &str) -> String {
    sanitize_text(value)
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape `value` for use inside a C# regular string literal (without quotes).
pub fn csharp_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}
