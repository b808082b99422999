//! A JSON document parser that writes straight into a [`Document`] arena.
//!
//! Tokens (whitespace, numbers, literals) are recognised with `nom`; the
//! structure is a small recursive-descent driver so that bracket mismatches
//! can be reported against the position that opened them.
use crate::error::{Location, ParseError};
use crate::node::{Content, Document, NodeId};
use crate::scalar::Scalar;
use indexmap::IndexMap;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{opt, recognize, value},
};
use std::io::Read;
use std::path::Path;
use std::str::CharIndices;
use std::str::FromStr;

/// Containers nested deeper than this are rejected.
pub const MAX_NESTING_DEPTH: usize = 512;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

pub fn parse_str(text: &str) -> Result<Document, ParseError> {
    let mut parser = DocumentParser::new(text);
    let rest = ws(text);
    if rest.is_empty() {
        return Err(parser.error("Empty document", rest));
    }
    let (rest, root) = parser.value(rest)?;
    let rest = ws(rest);
    if !rest.is_empty() {
        return Err(parser.error("Unexpected symbol(s) near end of document", rest));
    }
    parser.doc.root = root;
    log::trace!("Parsed document with {} nodes", parser.doc.nodes.len());
    Ok(parser.doc)
}

/// Parses UTF-8 bytes, skipping a leading byte-order mark.
pub fn parse_bytes(bytes: &[u8]) -> Result<Document, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    parse_str(std::str::from_utf8(bytes)?)
}

pub fn parse_reader<R: Read>(mut reader: R) -> Result<Document, ParseError> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    parse_bytes(&buffer)
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Document, ParseError> {
    let path = path.as_ref();
    log::debug!("Loading JSON document from {}", path.display());
    parse_bytes(&std::fs::read(path)?)
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}

// --- Tokens ---

fn ws(input: &str) -> &str {
    multispace0::<&str, nom::error::Error<&str>>(input)
        .map(|(rest, _)| rest)
        .unwrap_or(input)
}

fn number_token(input: &str) -> IResult<&str, &str> {
    recognize((
        opt(char('-')),
        alt((tag("0"), digit1)),
        opt((char('.'), digit1)),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)
}

fn literal_token(input: &str) -> IResult<&str, Scalar> {
    alt((
        value(Scalar::Boolean(true), tag("true")),
        value(Scalar::Boolean(false), tag("false")),
        value(Scalar::Null, tag("null")),
    ))
    .parse(input)
}

fn describe(input: &str) -> String {
    match input.chars().next() {
        Some(c) => format!("'{}'", c),
        None => "end of document".to_string(),
    }
}

// --- Structure ---

struct DocumentParser<'s> {
    source: &'s str,
    doc: Document,
    depth: usize,
}

impl<'s> DocumentParser<'s> {
    fn new(source: &'s str) -> Self {
        DocumentParser {
            source,
            doc: Document::unrooted(),
            depth: 0,
        }
    }

    fn location(&self, at: &str) -> Location {
        let offset = self.source.len() - at.len();
        let consumed = &self.source[..offset];
        let line = consumed.matches('\n').count() + 1;
        let col = match consumed.rfind('\n') {
            Some(pos) => consumed[pos + 1..].chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        Location { line, col }
    }

    fn error(&self, message: impl Into<String>, at: &str) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            location: self.location(at),
        }
    }

    fn unclosed(&self, bracket: char, opened: &str, at: &str) -> ParseError {
        let opened = self.location(opened);
        self.error(format!("Unclosed '{}' opened at {}", bracket, opened), at)
    }

    fn enter(&mut self, at: &str) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(self.error(
                format!("Maximum nesting depth of {} exceeded", MAX_NESTING_DEPTH),
                at,
            ));
        }
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, name: Option<String>, child: NodeId) {
        let data = &mut self.doc.nodes[child.0];
        data.parent = Some(parent);
        data.name = name.clone();
        match (&mut self.doc.nodes[parent.0].content, name) {
            (Content::Object(fields), Some(name)) => {
                if let Some(previous) = fields.insert(name, child) {
                    // Duplicate key: the later member wins, at the earlier position.
                    let old = &mut self.doc.nodes[previous.0];
                    old.parent = None;
                    old.name = None;
                }
            }
            (Content::Array(elements), None) => elements.push(child),
            _ => {}
        }
    }

    /// Parses one value. `input` must start at a non-whitespace character.
    fn value(&mut self, input: &'s str) -> Result<(&'s str, NodeId), ParseError> {
        match input.chars().next() {
            Some('{') => self.object(input),
            Some('[') => self.array(input),
            Some('"') => {
                let (rest, text) = self.string(input)?;
                Ok((rest, self.doc.alloc(Content::Value(Scalar::String(text)))))
            }
            Some('-' | '0'..='9') => self.number(input),
            Some(_) => match literal_token(input) {
                Ok((rest, scalar)) => Ok((rest, self.doc.alloc(Content::Value(scalar)))),
                Err(_) => Err(self.error(format!("Unexpected symbol {}", describe(input)), input)),
            },
            None => Err(self.error("Unexpected end of document", input)),
        }
    }

    fn number(&mut self, input: &'s str) -> Result<(&'s str, NodeId), ParseError> {
        let Ok((rest, token)) = number_token(input) else {
            return Err(self.error(format!("Unexpected symbol {}", describe(input)), input));
        };
        let scalar = if token.contains(['.', 'e', 'E']) {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Scalar::from_real)
        } else {
            Scalar::parse_integer(token)
        };
        match scalar {
            Some(scalar) => Ok((rest, self.doc.alloc(Content::Value(scalar)))),
            None => Err(self.error(format!("Number out of range: {}", token), input)),
        }
    }

    fn object(&mut self, open: &'s str) -> Result<(&'s str, NodeId), ParseError> {
        self.enter(open)?;
        let id = self.doc.alloc(Content::Object(IndexMap::new()));
        let mut rest = ws(&open[1..]);
        if let Some(after) = rest.strip_prefix('}') {
            self.depth -= 1;
            return Ok((after, id));
        }
        loop {
            match rest.chars().next() {
                Some('"') => {}
                Some(']') => return Err(self.error("'{' closed by ']'", rest)),
                None => return Err(self.unclosed('{', open, rest)),
                Some(_) => {
                    return Err(self.error(
                        format!("Expected a field name but found {}", describe(rest)),
                        rest,
                    ));
                }
            }
            let (after_key, name) = self.string(rest)?;
            rest = ws(after_key);
            match rest.strip_prefix(':') {
                Some(after) => rest = ws(after),
                None if rest.is_empty() => return Err(self.unclosed('{', open, rest)),
                None => {
                    return Err(self.error(
                        format!("Expected ':' after field name but found {}", describe(rest)),
                        rest,
                    ));
                }
            }
            if rest.is_empty() {
                return Err(self.unclosed('{', open, rest));
            }
            let (after_value, child) = self.value(rest)?;
            self.attach(id, Some(name), child);
            rest = ws(after_value);
            match rest.chars().next() {
                Some(',') => rest = ws(&rest[1..]),
                Some('}') => {
                    self.depth -= 1;
                    return Ok((&rest[1..], id));
                }
                Some(']') => return Err(self.error("'{' closed by ']'", rest)),
                None => return Err(self.unclosed('{', open, rest)),
                Some(_) => {
                    return Err(self.error(
                        format!("Expected ',' or '}}' but found {}", describe(rest)),
                        rest,
                    ));
                }
            }
        }
    }

    fn array(&mut self, open: &'s str) -> Result<(&'s str, NodeId), ParseError> {
        self.enter(open)?;
        let id = self.doc.alloc(Content::Array(Vec::new()));
        let mut rest = ws(&open[1..]);
        if let Some(after) = rest.strip_prefix(']') {
            self.depth -= 1;
            return Ok((after, id));
        }
        loop {
            match rest.chars().next() {
                Some('}') => return Err(self.error("'[' closed by '}'", rest)),
                None => return Err(self.unclosed('[', open, rest)),
                Some(_) => {}
            }
            let (after_value, child) = self.value(rest)?;
            self.attach(id, None, child);
            rest = ws(after_value);
            match rest.chars().next() {
                Some(',') => rest = ws(&rest[1..]),
                Some(']') => {
                    self.depth -= 1;
                    return Ok((&rest[1..], id));
                }
                Some('}') => return Err(self.error("'[' closed by '}'", rest)),
                None => return Err(self.unclosed('[', open, rest)),
                Some(_) => {
                    return Err(self.error(
                        format!("Expected ',' or ']' but found {}", describe(rest)),
                        rest,
                    ));
                }
            }
        }
    }

    /// Parses a quoted string starting at `input`, decoding escapes.
    fn string(&self, input: &'s str) -> Result<(&'s str, String), ParseError> {
        let body = &input[1..];
        let mut text = String::new();
        let mut chars = body.char_indices();
        while let Some((pos, c)) = chars.next() {
            match c {
                '"' => return Ok((&body[pos + 1..], text)),
                '\\' => {
                    let at = &body[pos..];
                    let decoded = match chars.next().map(|(_, e)| e) {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{08}',
                        Some('f') => '\u{0C}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.unicode_escape(&mut chars, at)?,
                        Some(other) => {
                            return Err(
                                self.error(format!("Invalid escape sequence '\\{}'", other), at)
                            );
                        }
                        None => break,
                    };
                    text.push(decoded);
                }
                c if c < '\u{20}' => {
                    return Err(self.error("Unescaped control character in string", &body[pos..]));
                }
                c => text.push(c),
            }
        }
        Err(self.error("Unterminated string", input))
    }

    fn unicode_escape(&self, chars: &mut CharIndices<'_>, at: &str) -> Result<char, ParseError> {
        let invalid = || self.error("Invalid unicode escape", at);
        let high = hex4(chars).ok_or_else(invalid)?;
        let code = match high {
            0xD800..=0xDBFF => {
                let has_pair = matches!(chars.next(), Some((_, '\\')))
                    && matches!(chars.next(), Some((_, 'u')));
                let low = has_pair.then(|| hex4(chars)).flatten().ok_or_else(invalid)?;
                if !(0xDC00..=0xDFFF).contains(&low) {
                    return Err(invalid());
                }
                0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
            }
            0xDC00..=0xDFFF => return Err(invalid()),
            code => code,
        };
        char::from_u32(code).ok_or_else(invalid)
    }
}

fn hex4(chars: &mut CharIndices<'_>) -> Option<u32> {
    let mut code = 0;
    for _ in 0..4 {
        let (_, c) = chars.next()?;
        code = code * 16 + c.to_digit(16)?;
    }
    Some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeType;

    fn syntax_message(text: &str) -> (String, Location) {
        match parse_str(text) {
            Err(ParseError::Syntax { message, location }) => (message, location),
            other => panic!("Expected a syntax error for {:?}, got {:?}", text, other),
        }
    }

    #[test]
    fn test_parse_nested_document() {
        let doc = parse_str(r#" { "a": [1, 2.5, "x", true, null], "b": {} } "#).unwrap();
        let root = doc.root();
        assert_eq!(root.node_type(), NodeType::Object);
        let a = root.child_by_name("a").unwrap();
        assert_eq!(a.child_count(), 5);
        assert_eq!(a.child_at(0).unwrap().scalar(), Some(&Scalar::Integer(1)));
        assert_eq!(a.child_at(1).unwrap().scalar(), Some(&Scalar::Float(2.5)));
        assert_eq!(a.child_at(3).unwrap().scalar(), Some(&Scalar::Boolean(true)));
        assert_eq!(a.child_at(4).unwrap().scalar(), Some(&Scalar::Null));
        assert_eq!(doc.to_json(), r#"{"a":[1,2.5,"x",true,null],"b":{}}"#);
    }

    #[test]
    fn test_number_tagging() {
        assert_eq!(parse_str("2147483647").unwrap().root().scalar(), Some(&Scalar::Integer(i32::MAX)));
        assert_eq!(parse_str("2147483648").unwrap().root().scalar(), Some(&Scalar::Long(2147483648)));
        assert!(parse_str("-1e400").is_err());
        assert_eq!(parse_str("1e300").unwrap().root().scalar(), Some(&Scalar::Double(1e300)));
        let (message, _) = syntax_message("99999999999999999999");
        assert!(message.starts_with("Number out of range"));
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        let doc = parse_str(r#""a\"b\\c\/d\né😀""#).unwrap();
        assert_eq!(
            doc.root().scalar(),
            Some(&Scalar::String("a\"b\\c/d\né😀".to_string()))
        );
        let pair = parse_str(r#""\ud83d\ude00\u00e9""#).unwrap();
        assert_eq!(pair.root().to_text(), "😀é");
    }

    #[test]
    fn test_invalid_strings() {
        assert_eq!(syntax_message(r#""\q""#).0, "Invalid escape sequence '\\q'");
        assert_eq!(syntax_message(r#""\ud83d""#).0, "Invalid unicode escape");
        assert_eq!(syntax_message("\"abc").0, "Unterminated string");
        assert_eq!(syntax_message("\"a\u{01}\"").0, "Unescaped control character in string");
    }

    #[test]
    fn test_mismatched_and_unclosed_brackets() {
        assert_eq!(syntax_message(r#"{"a": 1]"#).0, "'{' closed by ']'");
        assert_eq!(syntax_message("[1, 2}").0, "'[' closed by '}'");
        let (message, location) = syntax_message("{\n  \"a\": [1,\n");
        assert_eq!(message, "Unclosed '[' opened at line 2, column 8");
        assert_eq!(location, Location { line: 3, col: 1 });
    }

    #[test]
    fn test_trailing_and_unexpected_symbols() {
        assert_eq!(
            syntax_message("{} x").0,
            "Unexpected symbol(s) near end of document"
        );
        assert_eq!(syntax_message("[1,]").0, "Unexpected symbol ']'");
        assert_eq!(syntax_message("nul").0, "Unexpected symbol 'n'");
        assert_eq!(syntax_message("   ").0, "Empty document");
        let (message, location) = syntax_message("{\"a\" 1}");
        assert_eq!(message, "Expected ':' after field name but found '1'");
        assert_eq!(location, Location { line: 1, col: 6 });
    }

    #[test]
    fn test_duplicate_keys_keep_first_position() {
        let doc = parse_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(doc.to_json(), r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = "[".repeat(MAX_NESTING_DEPTH + 1);
        let (message, _) = syntax_message(&deep);
        assert!(message.starts_with("Maximum nesting depth"));
        let ok = format!("{}{}", "[".repeat(10), "]".repeat(10));
        assert!(parse_str(&ok).is_ok());
    }

    #[test]
    fn test_parse_bytes_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(br#"{"k":"v"}"#);
        let doc = parse_bytes(&bytes).unwrap();
        assert_eq!(doc.to_json(), r#"{"k":"v"}"#);
        assert!(matches!(parse_bytes(&[0xFF, 0xFE]), Err(ParseError::Utf8(_))));
    }

    #[test]
    fn test_parse_reader_and_from_str() {
        let doc = parse_reader(std::io::Cursor::new("[true]")).unwrap();
        assert_eq!(doc, "[ true ]".parse::<Document>().unwrap());
        assert!(matches!(
            parse_file("/definitely/not/here.json"),
            Err(ParseError::Io(_))
        ));
    }
}
