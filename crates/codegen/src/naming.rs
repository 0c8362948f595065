//! Identifier conversion for generated Rust.

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try",
    "type", "unsafe", "use", "where", "while", "yield",
];

/// Split on `_`, `-`, `.` and lower-to-upper case changes.
fn words(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let chars: Vec<char> = s.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !cur.is_empty() {
                out.push(std::mem::take(&mut cur));
            }
            continue;
        }
        let boundary = c.is_uppercase()
            && i > 0
            && (chars[i - 1].is_lowercase()
                || chars[i - 1].is_ascii_digit()
                || (chars[i - 1].is_uppercase()
                    && chars.get(i + 1).is_some_and(|n| n.is_lowercase())));
        if boundary && !cur.is_empty() {
            out.push(std::mem::take(&mut cur));
        }
        cur.push(c);
    }
    if !cur.is_empty() {
        out.push(cur);
    }
    out
}

/// `myUnion` -> `MyUnion`, `SUBTRACT` -> `Subtract`.
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::new();
    for w in words(s) {
        let mut chars = w.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    if out == "Self" {
        out.push('_');
    }
    escape_leading_digit(out)
}

/// `getStruct` -> `get_struct`.
pub fn to_snake_case(s: &str) -> String {
    let joined = words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_");
    escape_keyword(escape_leading_digit(joined))
}

/// `someConst` -> `SOME_CONST`.
pub fn to_screaming_snake_case(s: &str) -> String {
    let joined = words(s)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_");
    escape_leading_digit(joined)
}

fn escape_leading_digit(s: String) -> String {
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", s)
    } else {
        s
    }
}

fn escape_keyword(s: String) -> String {
    match s.as_str() {
        // not allowed as raw identifiers
        "self" | "super" | "crate" => format!("{}_", s),
        w if RUST_KEYWORDS.contains(&w) => format!("r#{}", s),
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pascal() {
        assert_eq!(to_pascal_case("myUnion"), "MyUnion");
        assert_eq!(to_pascal_case("SUBTRACT"), "Subtract");
        assert_eq!(to_pascal_case("ServiceNAME"), "ServiceName");
        assert_eq!(to_pascal_case("HTTPServer"), "HttpServer");
        assert_eq!(to_pascal_case("int_64"), "Int64");
        assert_eq!(to_pascal_case("self"), "Self_");
    }

    #[test]
    fn snake() {
        assert_eq!(to_snake_case("getStruct"), "get_struct");
        assert_eq!(to_snake_case("int64"), "int64");
        assert_eq!(to_snake_case("type"), "r#type");
        assert_eq!(to_snake_case("self"), "self_");
        assert_eq!(to_snake_case("2fa"), "_2fa");
    }

    #[test]
    fn screaming() {
        assert_eq!(to_screaming_snake_case("M1"), "M1");
        assert_eq!(to_screaming_snake_case("defaultTimeout"), "DEFAULT_TIMEOUT");
    }
}
