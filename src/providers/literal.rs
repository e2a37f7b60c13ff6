// literal.rs - Typed literal parsing for configuration values

use super::traits::{ConfigMap, ConfigValue};

/// Parse a complete value as a typed literal.
///
/// Accepts quoted strings, integers (decimal, `0x`, `0o` and `0b`), floats,
/// booleans, lists `[..]`, tuples `(..)` and tables `{key: value}`. A bare
/// `None` yields `Ok(None)`, meaning the key carries no value. Anything
/// after the literal other than whitespace or a `#` comment is rejected.
pub fn parse_literal(text: &str) -> Result<Option<ConfigValue>, String> {
    let mut parser = LiteralParser::new(text);
    parser.skip_ws();
    if parser.at_end_or_comment() {
        return Ok(Some(ConfigValue::String(String::new())));
    }

    let start = parser.pos;
    if parser.name() == "None" {
        parser.skip_ws();
        if parser.at_end_or_comment() {
            return Ok(None);
        }
    }
    parser.pos = start;

    let value = parser.value()?;
    parser.skip_ws();
    if !parser.at_end_or_comment() {
        return Err(format!(
            "unexpected '{}' at column {}",
            parser.peek().unwrap_or(' '),
            parser.pos + 1
        ));
    }
    Ok(Some(value))
}

/// Strip an inline `#` comment that sits outside any quoted string.
pub fn strip_comment(text: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => quote = Some(c),
                '#' => return &text[..idx],
                _ => {}
            },
        }
    }
    text
}

/// Remove one pair of matching surrounding quotes, if present.
pub fn unquote(text: &str) -> &str {
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        if (first == b'"' || first == b'\'') && bytes[bytes.len() - 1] == first {
            return &text[1..text.len() - 1];
        }
    }
    text
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn at_end_or_comment(&self) -> bool {
        matches!(self.peek(), None | Some('#'))
    }

    fn value(&mut self) -> Result<ConfigValue, String> {
        self.skip_ws();
        match self.peek() {
            None => Err("unexpected end of value".to_string()),
            Some('"') | Some('\'') => self.string().map(ConfigValue::String),
            Some('[') => self.sequence('[', ']'),
            Some('(') => self.sequence('(', ')'),
            Some('{') => self.table(),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => self.word(),
            Some(c) => Err(format!("unexpected '{}' at column {}", c, self.pos + 1)),
        }
    }

    fn string(&mut self) -> Result<String, String> {
        let start = self.pos;
        let quote = self.bump().unwrap_or('"');
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(format!("unterminated string starting at column {}", start + 1)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some(c) => out.push(c),
                    None => {
                        return Err(format!("unterminated string starting at column {}", start + 1))
                    }
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Result<ConfigValue, String> {
        let start = self.pos;
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(format!("unbalanced '{}' at column {}", open, start + 1)),
                Some(c) if c == close => {
                    self.bump();
                    return Ok(ConfigValue::List(items));
                }
                _ => {}
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(c) if c == close => return Ok(ConfigValue::List(items)),
                None => return Err(format!("unbalanced '{}' at column {}", open, start + 1)),
                Some(c) => {
                    return Err(format!("expected ',' or '{}' but found '{}' at column {}", close, c, self.pos))
                }
            }
        }
    }

    fn table(&mut self) -> Result<ConfigValue, String> {
        let start = self.pos;
        self.bump();
        let mut table = ConfigMap::new();
        loop {
            self.skip_ws();
            match self.peek() {
                None => return Err(format!("unbalanced '{{' at column {}", start + 1)),
                Some('}') => {
                    self.bump();
                    return Ok(ConfigValue::Table(table));
                }
                _ => {}
            }
            let key = match self.value()? {
                ConfigValue::String(s) => s,
                ConfigValue::Integer(i) => i.to_string(),
                ConfigValue::Boolean(b) => b.to_string(),
                other => return Err(format!("unsupported table key '{}'", other)),
            };
            self.skip_ws();
            if self.bump() != Some(':') {
                return Err(format!("expected ':' after table key at column {}", self.pos));
            }
            let value = self.value()?;
            table.insert(key, value);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(ConfigValue::Table(table)),
                None => return Err(format!("unbalanced '{{' at column {}", start + 1)),
                Some(c) => return Err(format!("expected ',' or '}}' but found '{}' at column {}", c, self.pos)),
            }
        }
    }

    fn number(&mut self) -> Result<ConfigValue, String> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(c) if c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_')
        ) {
            // A sign only belongs to the number at the start or after an exponent.
            if matches!(self.peek(), Some('+') | Some('-'))
                && self.pos != start
                && !matches!(self.chars.get(self.pos - 1), Some('e') | Some('E'))
            {
                break;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().filter(|c| **c != '_').collect();
        if let Some(val) = radix_integer(&text) {
            return val
                .map(ConfigValue::Integer)
                .map_err(|_| format!("invalid number '{}' at column {}", text, start + 1));
        }
        if let Ok(val) = text.parse::<i64>() {
            return Ok(ConfigValue::Integer(val));
        }
        text.parse::<f64>()
            .map(ConfigValue::Float)
            .map_err(|_| format!("invalid number '{}' at column {}", text, start + 1))
    }

    fn name(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn word(&mut self) -> Result<ConfigValue, String> {
        let start = self.pos;
        let word = self.name();
        match word.as_str() {
            "true" | "True" => Ok(ConfigValue::Boolean(true)),
            "false" | "False" => Ok(ConfigValue::Boolean(false)),
            "None" => Err(format!("None is only allowed as a whole value (column {})", start + 1)),
            _ => Err(format!("unknown name '{}' at column {}", word, start + 1)),
        }
    }
}

/// Parse `0x`, `0o` and `0b` prefixed integers. Returns `None` for any other text.
fn radix_integer(text: &str) -> Option<Result<i64, std::num::ParseIntError>> {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.strip_prefix('+').unwrap_or(text)),
    };
    if unsigned.len() < 2 || !unsigned.starts_with('0') {
        return None;
    }
    let radix = match &unsigned[1..2] {
        "x" | "X" => 16,
        "o" | "O" => 8,
        "b" | "B" => 2,
        _ => return None,
    };
    Some(i64::from_str_radix(&format!("{}{}", sign, &unsigned[2..]), radix))
}
