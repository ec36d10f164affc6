//! HTML parser - entry point for building trees from source text
//!
//! This handles:
//! - Parse options (mode, thread and queue sizing, fragment context)
//! - Option validation with numeric status codes
//! - Document and fragment parsing through the tree builder
//!
//! The builder is synchronous. Threaded modes and queue sizes are accepted
//! and validated so callers can pass the same options record everywhere,
//! but every mode produces the same tree.

mod builder;
mod entities;
mod tokenizer;

use crate::error::{DomError, Result};
use crate::tag::TagCode;
use crate::tree::Tree;
use crate::types::{FragmentContext, Namespace};
use builder::TreeBuilder;
use serde::{Deserialize, Serialize};

/// Parser scheduling mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    #[default]
    Default,
    /// Single-threaded
    Single,
    AllInOne,
    Separately,
    /// No background token queue
    NoQueue,
}

/// Status codes carried by [`DomError::ParserFailure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ParseStatus {
    Ok = 0x0000,
    InvalidThreadCount = 0x0101,
    InvalidFragmentContext = 0x0102,
    InvalidEncoding = 0x0103,
}

impl ParseStatus {
    pub fn code(self) -> u32 {
        self as u32
    }

    fn fail(self, message: impl Into<String>) -> DomError {
        DomError::ParserFailure {
            status: self.code(),
            message: message.into(),
        }
    }
}

/// Configuration for a parse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub mode: ParseMode,
    pub thread_count: usize,
    pub queue_size: usize,
    pub fragment_context: Option<FragmentContext>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            mode: ParseMode::Default,
            thread_count: 1,
            queue_size: 0,
            fragment_context: None,
        }
    }
}

impl ParseOptions {
    /// Load options from JSON; missing fields take their defaults
    ///
    /// ```json
    /// { "mode": "single", "fragment_context": { "tag": "Td" } }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default options for parsing a fragment in `tag`/`ns` context
    pub fn fragment(tag: TagCode, ns: Namespace) -> Self {
        Self {
            fragment_context: Some(FragmentContext::new(tag, ns)),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_threads(mut self, thread_count: usize, queue_size: usize) -> Self {
        self.thread_count = thread_count;
        self.queue_size = queue_size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.mode != ParseMode::Single && self.thread_count == 0 {
            return Err(ParseStatus::InvalidThreadCount.fail(format!(
                "{:?} mode needs at least one thread",
                self.mode
            )));
        }
        if let Some(context) = self.fragment_context {
            if !context.tag.is_element() {
                return Err(ParseStatus::InvalidFragmentContext.fail(format!(
                    "fragment context {:?} is not an element",
                    context.tag
                )));
            }
        }
        Ok(())
    }
}

/// HTML parser holding one options record
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    options: ParseOptions,
}

impl HtmlParser {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse `html` into a document, or a fragment when the options carry
    /// a fragment context
    pub fn parse(&self, html: &str) -> Result<Tree> {
        self.options.validate()?;
        if self.options.mode != ParseMode::Default || self.options.thread_count > 1 {
            tracing::debug!(
                "[Parser] {:?} mode ({} threads, queue {}) runs synchronously",
                self.options.mode,
                self.options.thread_count,
                self.options.queue_size
            );
        }

        tracing::debug!("[Parser] parsing {} bytes", html.len());
        let builder = match self.options.fragment_context {
            Some(context) => TreeBuilder::fragment(html, context),
            None => TreeBuilder::document(html),
        };
        let tree = builder.build()?;
        tracing::debug!("[Parser] built {} nodes", tree.len());
        Ok(tree)
    }

    /// Parse UTF-8 bytes; no encoding sniffing
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Tree> {
        let html = std::str::from_utf8(bytes).map_err(|e| {
            ParseStatus::InvalidEncoding.fail(format!("input is not UTF-8: {e}"))
        })?;
        self.parse(html)
    }
}

/// Parse a full document with default options
pub fn parse(html: &str) -> Result<Tree> {
    HtmlParser::new().parse(html)
}

pub fn parse_bytes(bytes: &[u8]) -> Result<Tree> {
    HtmlParser::new().parse_bytes(bytes)
}

pub fn parse_with_options(html: &str, options: &ParseOptions) -> Result<Tree> {
    HtmlParser::with_options(options.clone()).parse(html)
}

/// Parse `html` as the children of a `tag`/`ns` context element
pub fn parse_fragment(html: &str, tag: TagCode, ns: Namespace) -> Result<Tree> {
    HtmlParser::with_options(ParseOptions::fragment(tag, ns)).parse(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeKind;

    #[test]
    fn test_parse_document() {
        let tree = parse("<p>hi").unwrap();
        assert_eq!(tree.root().kind(), NodeKind::Document);
        assert!(!tree.is_fragment());
        assert_eq!(tree.body().unwrap().inner_text(), "hi");
    }

    #[test]
    fn test_parse_fragment_root() {
        let tree = parse_fragment("<td>x</td>", TagCode::Tr, Namespace::Html).unwrap();
        assert_eq!(tree.root().kind(), NodeKind::DocumentFragment);
        assert_eq!(
            tree.fragment_context(),
            Some(FragmentContext::new(TagCode::Tr, Namespace::Html))
        );
        assert_eq!(tree.root().first_child().unwrap().tag_code(), TagCode::Td);
    }

    #[test]
    fn test_options_from_json() {
        let options = ParseOptions::from_json(
            r#"{"mode": "no_queue", "thread_count": 2, "fragment_context": {"tag": "Div"}}"#,
        )
        .unwrap();
        assert_eq!(options.mode, ParseMode::NoQueue);
        assert_eq!(options.thread_count, 2);
        assert_eq!(options.queue_size, 0);
        assert_eq!(
            options.fragment_context,
            Some(FragmentContext::new(TagCode::Div, Namespace::Html))
        );
    }

    #[test]
    fn test_options_from_bad_json() {
        let err = ParseOptions::from_json(r#"{"mode": "turbo"}"#).unwrap_err();
        assert!(matches!(err, DomError::InvalidOptions(_)));
    }

    #[test]
    fn test_zero_threads_rejected_unless_single() {
        let options = ParseOptions::default().with_threads(0, 0);
        let err = parse_with_options("<p>", &options).unwrap_err();
        assert!(matches!(
            err,
            DomError::ParserFailure { status, .. } if status == ParseStatus::InvalidThreadCount.code()
        ));

        let single = options.with_mode(ParseMode::Single);
        assert!(parse_with_options("<p>", &single).is_ok());
    }

    #[test]
    fn test_sentinel_context_rejected() {
        let err = parse_fragment("x", TagCode::Text, Namespace::Html).unwrap_err();
        assert!(matches!(
            err,
            DomError::ParserFailure { status, .. } if status == ParseStatus::InvalidFragmentContext.code()
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = parse_bytes(&[b'<', b'p', b'>', 0xff]).unwrap_err();
        assert!(matches!(
            err,
            DomError::ParserFailure { status, .. } if status == ParseStatus::InvalidEncoding.code()
        ));
        assert!(parse_bytes("<p>ü</p>".as_bytes()).is_ok());
    }

    #[test]
    fn test_modes_build_identical_trees() {
        let html = "<ul><li>a<li>b</ul>";
        let expected = parse(html).unwrap().serialize();
        for mode in [
            ParseMode::Single,
            ParseMode::AllInOne,
            ParseMode::Separately,
            ParseMode::NoQueue,
        ] {
            let options = ParseOptions::default().with_mode(mode).with_threads(4, 64);
            assert_eq!(parse_with_options(html, &options).unwrap().serialize(), expected);
        }
    }
}
