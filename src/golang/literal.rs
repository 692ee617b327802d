//! Go string literal quoting.

/// Decode an interpreted (`"..."`) or raw (`` `...` ``) string literal.
pub fn unquote(literal: &str) -> Result<String, String> {
    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        // Carriage returns are discarded from raw literals.
        return Ok(literal[1..literal.len() - 1].replace('\r', ""));
    }
    if literal.len() < 2 || !literal.starts_with('"') || !literal.ends_with('"') {
        return Err(format!("not a string literal: {}", literal));
    }

    let body = &literal[1..literal.len() - 1];
    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let esc = chars.next().ok_or("trailing backslash in string literal")?;
        match esc {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            '\\' => out.push(b'\\'),
            '"' => out.push(b'"'),
            'x' => out.push(take_digits(&mut chars, 2, 16)? as u8),
            '0'..='7' => {
                let rest = take_digits(&mut chars, 2, 8)?;
                let value = (esc as u32 - '0' as u32) * 64 + rest;
                if value > 0xff {
                    return Err(format!("octal escape value {} > 255", value));
                }
                out.push(value as u8);
            }
            'u' | 'U' => {
                let width = if esc == 'u' { 4 } else { 8 };
                let code = take_digits(&mut chars, width, 16)?;
                let c = char::from_u32(code)
                    .ok_or_else(|| format!("escape sequence is invalid Unicode code point U+{:X}", code))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
            other => return Err(format!("unknown escape sequence \\{}", other)),
        }
    }

    String::from_utf8(out).map_err(|_| "string literal is not valid UTF-8".to_string())
}

fn take_digits(chars: &mut std::str::Chars<'_>, count: usize, radix: u32) -> Result<u32, String> {
    let mut value = 0u32;
    for _ in 0..count {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(radix))
            .ok_or("invalid escape sequence in string literal")?;
        value = value * radix + digit;
    }
    Ok(value)
}

/// Encode `value` as an interpreted Go string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                out.push_str(&format!("\\x{:02x}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_plain_path() {
        assert_eq!(unquote("\"github.com/acme/lib\"").unwrap(), "github.com/acme/lib");
    }

    #[test]
    fn test_unquote_raw_literal() {
        assert_eq!(unquote("`github.com/acme/lib`").unwrap(), "github.com/acme/lib");
        assert_eq!(unquote("`a\r\nb`").unwrap(), "a\nb");
    }

    #[test]
    fn test_unquote_escapes() {
        assert_eq!(unquote(r#""a\"b\\c""#).unwrap(), "a\"b\\c");
        assert_eq!(unquote(r#""\x41\101é\U0001F600""#).unwrap(), "AAé😀");
    }

    #[test]
    fn test_unquote_rejects_bad_escape() {
        assert!(unquote(r#""\q""#).is_err());
        assert!(unquote(r#""\xZZ""#).is_err());
        assert!(unquote(r#""\777""#).is_err());
        assert!(unquote("fmt").is_err());
    }

    #[test]
    fn test_quote_escapes_specials() {
        assert_eq!(quote("myproj/vendor/lib"), "\"myproj/vendor/lib\"");
        assert_eq!(quote("a\"b\\c\n"), r#""a\"b\\c\n""#);
        assert_eq!(quote("\u{1}"), r#""\x01""#);
    }

    #[test]
    fn test_quote_then_unquote_is_stable() {
        let tricky = "path/with \"quotes\" and \\ and é";
        assert_eq!(unquote(&quote(tricky)).unwrap(), tricky);
    }
}
