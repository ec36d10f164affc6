//! Well-known tag codes
//!
//! Every recognised HTML element gets a variant so that tag comparisons and
//! void-element checks are a single integer compare. Unrecognised element
//! names map to [`TagCode::Undefined`] and keep their spelling in the string
//! arena.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::OnceLock;

macro_rules! tag_codes {
    ($($variant:ident => $name:literal,)*) => {
        /// Enumerated tag identity
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum TagCode {
            /// Unknown element name, or a Document / DocumentFragment root
            Undefined,
            Text,
            Comment,
            Cdata,
            ProcessingInstruction,
            Doctype,
            $($variant,)*
        }

        const ELEMENT_TAGS: &[(&str, TagCode)] = &[$(($name, TagCode::$variant),)*];

        impl TagCode {
            /// Canonical lowercase name
            pub fn as_str(self) -> &'static str {
                match self {
                    TagCode::Undefined => "",
                    TagCode::Text => "#text",
                    TagCode::Comment => "#comment",
                    TagCode::Cdata => "#cdata-section",
                    TagCode::ProcessingInstruction => "#processing-instruction",
                    TagCode::Doctype => "!DOCTYPE",
                    $(TagCode::$variant => $name,)*
                }
            }
        }
    };
}

tag_codes! {
    A => "a",
    Abbr => "abbr",
    Acronym => "acronym",
    Address => "address",
    AnnotationXml => "annotation-xml",
    Applet => "applet",
    Area => "area",
    Article => "article",
    Aside => "aside",
    Audio => "audio",
    B => "b",
    Base => "base",
    Basefont => "basefont",
    Bdi => "bdi",
    Bdo => "bdo",
    Bgsound => "bgsound",
    Big => "big",
    Blink => "blink",
    Blockquote => "blockquote",
    Body => "body",
    Br => "br",
    Button => "button",
    Canvas => "canvas",
    Caption => "caption",
    Center => "center",
    Cite => "cite",
    Code => "code",
    Col => "col",
    Colgroup => "colgroup",
    Data => "data",
    Datalist => "datalist",
    Dd => "dd",
    Del => "del",
    Desc => "desc",
    Details => "details",
    Dfn => "dfn",
    Dialog => "dialog",
    Dir => "dir",
    Div => "div",
    Dl => "dl",
    Dt => "dt",
    Em => "em",
    Embed => "embed",
    Fieldset => "fieldset",
    Figcaption => "figcaption",
    Figure => "figure",
    Font => "font",
    Footer => "footer",
    ForeignObject => "foreignobject",
    Form => "form",
    Frame => "frame",
    Frameset => "frameset",
    H1 => "h1",
    H2 => "h2",
    H3 => "h3",
    H4 => "h4",
    H5 => "h5",
    H6 => "h6",
    Head => "head",
    Header => "header",
    Hgroup => "hgroup",
    Hr => "hr",
    Html => "html",
    I => "i",
    Iframe => "iframe",
    Image => "image",
    Img => "img",
    Input => "input",
    Ins => "ins",
    Kbd => "kbd",
    Keygen => "keygen",
    Label => "label",
    Legend => "legend",
    Li => "li",
    Link => "link",
    Listing => "listing",
    Main => "main",
    Map => "map",
    Mark => "mark",
    Marquee => "marquee",
    Math => "math",
    Menu => "menu",
    Meta => "meta",
    Meter => "meter",
    Mi => "mi",
    Mn => "mn",
    Mo => "mo",
    Ms => "ms",
    Mtext => "mtext",
    Nav => "nav",
    Nobr => "nobr",
    Noembed => "noembed",
    Noframes => "noframes",
    Noscript => "noscript",
    Object => "object",
    Ol => "ol",
    Optgroup => "optgroup",
    Option => "option",
    Output => "output",
    P => "p",
    Param => "param",
    Picture => "picture",
    Plaintext => "plaintext",
    Pre => "pre",
    Progress => "progress",
    Q => "q",
    Rb => "rb",
    Rp => "rp",
    Rt => "rt",
    Rtc => "rtc",
    Ruby => "ruby",
    S => "s",
    Samp => "samp",
    Script => "script",
    Search => "search",
    Section => "section",
    Select => "select",
    Slot => "slot",
    Small => "small",
    Source => "source",
    Span => "span",
    Strike => "strike",
    Strong => "strong",
    Style => "style",
    Sub => "sub",
    Summary => "summary",
    Sup => "sup",
    Svg => "svg",
    Table => "table",
    Tbody => "tbody",
    Td => "td",
    Template => "template",
    Textarea => "textarea",
    Tfoot => "tfoot",
    Th => "th",
    Thead => "thead",
    Time => "time",
    Title => "title",
    Tr => "tr",
    Track => "track",
    Tt => "tt",
    U => "u",
    Ul => "ul",
    Var => "var",
    Video => "video",
    Wbr => "wbr",
    Xmp => "xmp",
}

fn lookup_table() -> &'static AHashMap<&'static str, TagCode> {
    static TABLE: OnceLock<AHashMap<&'static str, TagCode>> = OnceLock::new();
    TABLE.get_or_init(|| ELEMENT_TAGS.iter().copied().collect())
}

impl TagCode {
    /// Look up an element name, ignoring ASCII case
    ///
    /// Returns `Undefined` for names outside the HTML element set.
    pub fn from_name(name: &str) -> TagCode {
        let key: Cow<'_, str> = if name.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(name.to_ascii_lowercase())
        } else {
            Cow::Borrowed(name)
        };
        lookup_table()
            .get(key.as_ref())
            .copied()
            .unwrap_or(TagCode::Undefined)
    }

    /// True for codes that name an actual element (not a sentinel)
    pub fn is_element(self) -> bool {
        !matches!(
            self,
            TagCode::Undefined
                | TagCode::Text
                | TagCode::Comment
                | TagCode::Cdata
                | TagCode::ProcessingInstruction
                | TagCode::Doctype
        )
    }

    /// Void elements never have children and never get a closing tag
    pub fn is_void(self) -> bool {
        matches!(
            self,
            TagCode::Area
                | TagCode::Base
                | TagCode::Br
                | TagCode::Col
                | TagCode::Embed
                | TagCode::Hr
                | TagCode::Img
                | TagCode::Input
                | TagCode::Link
                | TagCode::Meta
                | TagCode::Param
                | TagCode::Source
                | TagCode::Track
                | TagCode::Wbr
        )
    }

    /// Elements whose text children are emitted verbatim
    pub fn is_raw_text(self) -> bool {
        matches!(
            self,
            TagCode::Script
                | TagCode::Style
                | TagCode::Xmp
                | TagCode::Iframe
                | TagCode::Noembed
                | TagCode::Noframes
                | TagCode::Plaintext
        )
    }

    /// Elements whose text is escapable but which never contain markup
    pub fn is_rcdata(self) -> bool {
        matches!(self, TagCode::Title | TagCode::Textarea)
    }

    pub fn is_heading(self) -> bool {
        matches!(
            self,
            TagCode::H1 | TagCode::H2 | TagCode::H3 | TagCode::H4 | TagCode::H5 | TagCode::H6
        )
    }
}

impl std::fmt::Display for TagCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
