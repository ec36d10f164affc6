//! Simplified HTML tokenizer
//!
//! Produces start/end tags, text, comments, doctypes and CDATA sections from
//! a `&str`. Text and comment payloads borrow from the input unless a
//! character reference had to be decoded.
//!
//! Known limitations:
//! - No parse-error reporting; malformed markup degrades to text or a bogus
//!   comment the way browsers do, without the full state machine.
//! - The tree builder drives the text mode (raw text, RCDATA, plaintext) by
//!   calling [`Tokenizer::set_mode`] after it inserts the element.

use super::entities::decode_entities;
use crate::tag::TagCode;
use memchr::memchr;
use smallvec::SmallVec;
use std::borrow::Cow;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";
const DOCTYPE_START: &[u8] = b"<!doctype";
const CDATA_START: &str = "<![CDATA[";
const CDATA_END: &str = "]]>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawAttr {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Doctype(String),
    StartTag {
        name: String,
        attrs: SmallVec<[RawAttr; 4]>,
        self_closing: bool,
    },
    EndTag(String),
    Text(Cow<'a, str>),
    Comment(Cow<'a, str>),
    Cdata(&'a str),
}

/// How character data is read until the next matching end tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextMode {
    Data,
    /// Verbatim until `</tag`
    RawText(TagCode),
    /// References decoded, no markup, until `</tag`
    RcData(TagCode),
    /// Everything up to EOF is text
    PlainText,
}

impl TextMode {
    /// Mode an element switches the tokenizer into once it is opened
    pub fn for_element(code: TagCode) -> TextMode {
        if code == TagCode::Plaintext {
            TextMode::PlainText
        } else if code.is_raw_text() {
            TextMode::RawText(code)
        } else if code.is_rcdata() {
            TextMode::RcData(code)
        } else {
            TextMode::Data
        }
    }
}

pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    mode: TextMode,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            mode: TextMode::Data,
        }
    }

    pub fn set_mode(&mut self, mode: TextMode) {
        self.mode = mode;
    }

    fn data(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;

        if bytes[start] != b'<' {
            let end = memchr(b'<', &bytes[start..]).map_or(bytes.len(), |rel| start + rel);
            self.pos = end;
            return Some(Token::Text(decode_entities(&input[start..end])));
        }

        let rest = &input[start..];
        if rest.starts_with(COMMENT_START) {
            return Some(self.comment());
        }
        if starts_with_ignore_ascii_case(rest.as_bytes(), DOCTYPE_START) {
            return Some(self.doctype());
        }
        if rest.starts_with(CDATA_START) {
            let body = start + CDATA_START.len();
            let (end, next) = match input[body..].find(CDATA_END) {
                Some(rel) => (body + rel, body + rel + CDATA_END.len()),
                None => (input.len(), input.len()),
            };
            self.pos = next;
            return Some(Token::Cdata(&input[body..end]));
        }

        match bytes.get(start + 1) {
            Some(b'!') => Some(self.bogus_comment(start + 2)),
            Some(b'?') => Some(self.bogus_comment(start + 1)),
            Some(b'/') => self.end_tag(),
            Some(b) if b.is_ascii_alphabetic() => Some(self.start_tag()),
            _ => {
                self.pos = start + 1;
                Some(Token::Text(Cow::Borrowed("<")))
            }
        }
    }

    fn comment(&mut self) -> Token<'a> {
        let input = self.input;
        let body = self.pos + COMMENT_START.len();
        let tail = &input[body..];

        // `<!-->` and `<!--->` close immediately
        if tail.starts_with('>') {
            self.pos = body + 1;
            return Token::Comment(Cow::Borrowed(""));
        }
        if tail.starts_with("->") {
            self.pos = body + 2;
            return Token::Comment(Cow::Borrowed(""));
        }

        match tail.find(COMMENT_END) {
            Some(rel) => {
                self.pos = body + rel + COMMENT_END.len();
                Token::Comment(Cow::Borrowed(&tail[..rel]))
            }
            None => {
                self.pos = input.len();
                Token::Comment(Cow::Borrowed(tail))
            }
        }
    }

    fn doctype(&mut self) -> Token<'a> {
        let input = self.input;
        let body = self.pos + DOCTYPE_START.len();
        let end = memchr(b'>', &input.as_bytes()[body..]).map_or(input.len(), |rel| body + rel);
        self.pos = (end + 1).min(input.len());

        let name = input[body..end]
            .split_ascii_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        Token::Doctype(name)
    }

    fn bogus_comment(&mut self, from: usize) -> Token<'a> {
        let input = self.input;
        let end = memchr(b'>', &input.as_bytes()[from..]).map_or(input.len(), |rel| from + rel);
        self.pos = (end + 1).min(input.len());
        Token::Comment(Cow::Borrowed(&input[from..end]))
    }

    fn end_tag(&mut self) -> Option<Token<'a>> {
        let input = self.input;
        let bytes = input.as_bytes();
        let after = self.pos + 2;

        match bytes.get(after) {
            None => {
                self.pos = input.len();
                Some(Token::Text(Cow::Borrowed("</")))
            }
            // `</>` is dropped entirely
            Some(b'>') => {
                self.pos = after + 1;
                None
            }
            Some(b) if b.is_ascii_alphabetic() => {
                let name_end = self.scan_name(after);
                let name = input[after..name_end].to_ascii_lowercase();
                // Attributes on end tags are ignored.
                let end = memchr(b'>', &bytes[name_end..]).map_or(input.len(), |rel| name_end + rel);
                self.pos = (end + 1).min(input.len());
                Some(Token::EndTag(name))
            }
            Some(_) => Some(self.bogus_comment(after)),
        }
    }

    fn start_tag(&mut self) -> Token<'a> {
        let name_start = self.pos + 1;
        let name_end = self.scan_name(name_start);
        let name = self.input[name_start..name_end].to_ascii_lowercase();
        self.pos = name_end;

        let bytes = self.input.as_bytes();
        let mut attrs: SmallVec<[RawAttr; 4]> = SmallVec::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            match bytes.get(self.pos) {
                None => break,
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b'/') => {
                    self.pos += 1;
                    if bytes.get(self.pos) == Some(&b'>') {
                        self_closing = true;
                        self.pos += 1;
                        break;
                    }
                }
                Some(_) => {
                    let attr = self.attribute();
                    // First occurrence wins
                    if !attrs.iter().any(|a| a.name == attr.name) {
                        attrs.push(attr);
                    }
                }
            }
        }

        Token::StartTag {
            name,
            attrs,
            self_closing,
        }
    }

    fn attribute(&mut self) -> RawAttr {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;

        // The first byte always belongs to the name, even a stray `=`.
        let mut i = start + 1;
        while i < bytes.len() && !matches!(bytes[i], b'/' | b'>' | b'=') && !is_space(bytes[i]) {
            i += 1;
        }
        let name = input[start..i].to_ascii_lowercase();
        self.pos = i;

        self.skip_whitespace();
        let value = if bytes.get(self.pos) == Some(&b'=') {
            self.pos += 1;
            self.skip_whitespace();
            self.attribute_value()
        } else {
            String::new()
        };

        RawAttr { name, value }
    }

    fn attribute_value(&mut self) -> String {
        let input = self.input;
        let bytes = input.as_bytes();

        match bytes.get(self.pos) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let from = self.pos + 1;
                let end = memchr(quote, &bytes[from..]).map_or(bytes.len(), |rel| from + rel);
                self.pos = (end + 1).min(bytes.len());
                decode_entities(&input[from..end]).into_owned()
            }
            Some(b'>') | None => String::new(),
            Some(_) => {
                let from = self.pos;
                let mut i = from;
                while i < bytes.len() && bytes[i] != b'>' && !is_space(bytes[i]) {
                    i += 1;
                }
                self.pos = i;
                decode_entities(&input[from..i]).into_owned()
            }
        }
    }

    fn raw_text(&mut self, code: TagCode, decode: bool) -> Option<Token<'a>> {
        let input = self.input;
        let start = self.pos;
        self.mode = TextMode::Data;

        let end = find_close_tag(&input[start..], code.as_str()).map_or(input.len(), |rel| start + rel);
        self.pos = end;
        if end == start {
            return None;
        }

        let text = &input[start..end];
        Some(Token::Text(if decode {
            decode_entities(text)
        } else {
            Cow::Borrowed(text)
        }))
    }

    fn scan_name(&self, from: usize) -> usize {
        let bytes = self.input.as_bytes();
        let mut i = from;
        while i < bytes.len() && !matches!(bytes[i], b'/' | b'>') && !is_space(bytes[i]) {
            i += 1;
        }
        i
    }

    fn skip_whitespace(&mut self) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && is_space(bytes[self.pos]) {
            self.pos += 1;
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.input.len() {
                return None;
            }
            let token = match self.mode {
                TextMode::Data => self.data(),
                TextMode::RawText(code) => self.raw_text(code, false),
                TextMode::RcData(code) => self.raw_text(code, true),
                TextMode::PlainText => {
                    let text = &self.input[self.pos..];
                    self.pos = self.input.len();
                    Some(Token::Text(Cow::Borrowed(text)))
                }
            };
            if token.is_some() {
                return token;
            }
        }
    }
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0c)
}

fn starts_with_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()].eq_ignore_ascii_case(needle)
}

/// Offset of the `</name` that ends a raw-text run
///
/// Only `<` is searched for, which never appears inside a UTF-8 continuation
/// byte, so the returned offset is a char boundary.
fn find_close_tag(haystack: &str, name: &str) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let name = name.as_bytes();
    let mut i = 0;
    while let Some(rel) = memchr(b'<', &bytes[i..]) {
        i += rel;
        let name_at = i + 2;
        let after = name_at + name.len();
        if bytes.get(i + 1) == Some(&b'/')
            && after < bytes.len()
            && bytes[name_at..after].eq_ignore_ascii_case(name)
            && (is_space(bytes[after]) || matches!(bytes[after], b'/' | b'>'))
        {
            return Some(i);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Tokenizer::new(input).collect()
    }

    fn start(name: &str, attrs: &[(&str, &str)], self_closing: bool) -> Token<'static> {
        Token::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(n, v)| RawAttr {
                    name: n.to_string(),
                    value: v.to_string(),
                })
                .collect(),
            self_closing,
        }
    }

    fn text(s: &str) -> Token<'_> {
        Token::Text(Cow::Borrowed(s))
    }

    #[test]
    fn test_tags_and_text() {
        assert_eq!(
            tokens("<P>Hello</P>"),
            vec![start("p", &[], false), text("Hello"), Token::EndTag("p".into())]
        );
    }

    #[test]
    fn test_attribute_forms() {
        assert_eq!(
            tokens(r#"<a HREF="x y" data-q='1' flag n=bare>"#),
            vec![start(
                "a",
                &[("href", "x y"), ("data-q", "1"), ("flag", ""), ("n", "bare")],
                false
            )]
        );
    }

    #[test]
    fn test_duplicate_attributes_keep_first() {
        assert_eq!(
            tokens(r#"<i a="1" A="2">"#),
            vec![start("i", &[("a", "1")], false)]
        );
    }

    #[test]
    fn test_self_closing_and_decoded_values() {
        assert_eq!(
            tokens(r#"<br/><img alt="a &amp; b"/>"#),
            vec![
                start("br", &[], true),
                start("img", &[("alt", "a & b")], true)
            ]
        );
    }

    #[test]
    fn test_comments_and_doctype() {
        assert_eq!(
            tokens("<!DOCTYPE Html PUBLIC><!-- x --><!--><!--->"),
            vec![
                Token::Doctype("html".into()),
                Token::Comment(Cow::Borrowed(" x ")),
                Token::Comment(Cow::Borrowed("")),
                Token::Comment(Cow::Borrowed("")),
            ]
        );
    }

    #[test]
    fn test_bogus_comments() {
        assert_eq!(
            tokens("<?xml v?><!x></ y>"),
            vec![
                Token::Comment(Cow::Borrowed("?xml v?")),
                Token::Comment(Cow::Borrowed("x")),
                Token::Comment(Cow::Borrowed(" y")),
            ]
        );
    }

    #[test]
    fn test_cdata_section() {
        assert_eq!(tokens("<![CDATA[a<b]]>"), vec![Token::Cdata("a<b")]);
    }

    #[test]
    fn test_stray_angle_brackets_are_text() {
        let joined: String = tokens("a < b </")
            .into_iter()
            .map(|t| match t {
                Token::Text(s) => s.into_owned(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(joined, "a < b </");
        assert!(tokens("</>").is_empty());
    }

    #[test]
    fn test_raw_text_mode() {
        let mut tok = Tokenizer::new("<script>if (a<b) x = '</p>';</SCRIPT >");
        assert_eq!(tok.next(), Some(start("script", &[], false)));
        tok.set_mode(TextMode::for_element(TagCode::Script));
        assert_eq!(tok.next(), Some(text("if (a<b) x = '</p>';")));
        assert_eq!(tok.next(), Some(Token::EndTag("script".into())));
        assert_eq!(tok.next(), None);
    }

    #[test]
    fn test_rcdata_decodes_references() {
        let mut tok = Tokenizer::new("<title>&lt;b&gt;</title>");
        tok.next();
        tok.set_mode(TextMode::for_element(TagCode::Title));
        assert_eq!(tok.next(), Some(Token::Text(Cow::Owned("<b>".into()))));
        assert_eq!(tok.next(), Some(Token::EndTag("title".into())));
    }

    #[test]
    fn test_plaintext_runs_to_eof() {
        let mut tok = Tokenizer::new("<b>x</b>");
        tok.set_mode(TextMode::PlainText);
        assert_eq!(tok.next(), Some(text("<b>x</b>")));
        assert_eq!(tok.next(), None);
    }

    #[test]
    fn test_multibyte_text_and_names() {
        assert_eq!(
            tokens("<x-ü é=\"ö\">ß"),
            vec![start("x-ü", &[("é", "ö")], false), text("ß")]
        );
    }
}
