//! Tree builder: tokens in, [`Tree`] out
//!
//! A pragmatic subset of the HTML tree construction rules. Every node is
//! created and linked through the public mutator API, so the structural
//! invariants hold at every step of a parse.
//!
//! Known limitations:
//! - No foster parenting, no adoption agency, no implicit `tbody`.
//! - After `</body>` content keeps going into the body.

use super::tokenizer::{RawAttr, TextMode, Token, Tokenizer};
use crate::error::Result;
use crate::tag::TagCode;
use crate::tree::Tree;
use crate::types::{FragmentContext, Namespace, NodeId, NodeKind};
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertionMode {
    BeforeHead,
    InHead,
    AfterHead,
    InBody,
}

/// Which elements stop an "is X in scope" search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Default,
    ListItem,
    Button,
    Table,
}

const SPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0c'];

/// Lowercase SVG element names and their camelCase spelling
const SVG_TAG_NAMES: &[(&str, &str)] = &[
    ("altglyph", "altGlyph"),
    ("animatecolor", "animateColor"),
    ("animatemotion", "animateMotion"),
    ("animatetransform", "animateTransform"),
    ("clippath", "clipPath"),
    ("feblend", "feBlend"),
    ("fecolormatrix", "feColorMatrix"),
    ("fecomposite", "feComposite"),
    ("fedropshadow", "feDropShadow"),
    ("feflood", "feFlood"),
    ("fegaussianblur", "feGaussianBlur"),
    ("feimage", "feImage"),
    ("femerge", "feMerge"),
    ("femergenode", "feMergeNode"),
    ("feoffset", "feOffset"),
    ("foreignobject", "foreignObject"),
    ("lineargradient", "linearGradient"),
    ("radialgradient", "radialGradient"),
    ("textpath", "textPath"),
];

const SVG_ATTRIBUTE_NAMES: &[(&str, &str)] = &[
    ("attributename", "attributeName"),
    ("basefrequency", "baseFrequency"),
    ("clippathunits", "clipPathUnits"),
    ("gradienttransform", "gradientTransform"),
    ("gradientunits", "gradientUnits"),
    ("markerheight", "markerHeight"),
    ("markerwidth", "markerWidth"),
    ("patterntransform", "patternTransform"),
    ("patternunits", "patternUnits"),
    ("preserveaspectratio", "preserveAspectRatio"),
    ("refx", "refX"),
    ("refy", "refY"),
    ("repeatcount", "repeatCount"),
    ("stddeviation", "stdDeviation"),
    ("textlength", "textLength"),
    ("viewbox", "viewBox"),
];

fn svg_name<'n>(table: &[(&str, &'static str)], name: &'n str) -> &'n str {
    table
        .iter()
        .find(|(lower, _)| *lower == name)
        .map_or(name, |&(_, adjusted)| adjusted)
}

/// Split `xlink:href`-style names into (namespace, local name)
fn foreign_attribute(name: &str) -> (Namespace, &str) {
    if name == "xmlns" {
        return (Namespace::Xmlns, name);
    }
    if let Some(local) = name.strip_prefix("xmlns:") {
        return (Namespace::Xmlns, local);
    }
    if let Some(local) = name.strip_prefix("xlink:") {
        return (Namespace::Xlink, local);
    }
    if let Some(local) = name.strip_prefix("xml:") {
        return (Namespace::Xml, local);
    }
    (Namespace::Html, name)
}

fn is_head_content(code: TagCode) -> bool {
    matches!(
        code,
        TagCode::Base
            | TagCode::Basefont
            | TagCode::Bgsound
            | TagCode::Link
            | TagCode::Meta
            | TagCode::Noframes
            | TagCode::Noscript
            | TagCode::Script
            | TagCode::Style
            | TagCode::Template
            | TagCode::Title
    )
}

fn closes_p(code: TagCode) -> bool {
    code.is_heading()
        || matches!(
            code,
            TagCode::Address
                | TagCode::Article
                | TagCode::Aside
                | TagCode::Blockquote
                | TagCode::Center
                | TagCode::Dd
                | TagCode::Details
                | TagCode::Dialog
                | TagCode::Dir
                | TagCode::Div
                | TagCode::Dl
                | TagCode::Dt
                | TagCode::Fieldset
                | TagCode::Figcaption
                | TagCode::Figure
                | TagCode::Footer
                | TagCode::Form
                | TagCode::Header
                | TagCode::Hgroup
                | TagCode::Hr
                | TagCode::Li
                | TagCode::Listing
                | TagCode::Main
                | TagCode::Menu
                | TagCode::Nav
                | TagCode::Ol
                | TagCode::P
                | TagCode::Plaintext
                | TagCode::Pre
                | TagCode::Search
                | TagCode::Section
                | TagCode::Summary
                | TagCode::Table
                | TagCode::Ul
                | TagCode::Xmp
        )
}

/// HTML start tags that end foreign content when seen inside `svg`/`math`
fn breaks_out_of_foreign(code: TagCode, attrs: &[RawAttr]) -> bool {
    code.is_heading()
        || matches!(
            code,
            TagCode::B
                | TagCode::Big
                | TagCode::Blockquote
                | TagCode::Body
                | TagCode::Br
                | TagCode::Center
                | TagCode::Code
                | TagCode::Dd
                | TagCode::Div
                | TagCode::Dl
                | TagCode::Dt
                | TagCode::Em
                | TagCode::Embed
                | TagCode::Head
                | TagCode::Hr
                | TagCode::I
                | TagCode::Img
                | TagCode::Li
                | TagCode::Listing
                | TagCode::Menu
                | TagCode::Meta
                | TagCode::Nobr
                | TagCode::Ol
                | TagCode::P
                | TagCode::Pre
                | TagCode::Ruby
                | TagCode::S
                | TagCode::Small
                | TagCode::Span
                | TagCode::Strong
                | TagCode::Strike
                | TagCode::Sub
                | TagCode::Sup
                | TagCode::Table
                | TagCode::Tt
                | TagCode::U
                | TagCode::Ul
                | TagCode::Var
        )
        || (code == TagCode::Font
            && attrs
                .iter()
                .any(|a| matches!(a.name.as_str(), "color" | "face" | "size")))
}

pub(crate) struct TreeBuilder<'a> {
    tree: Tree,
    tokenizer: Tokenizer<'a>,
    open: SmallVec<[NodeId; 32]>,
    /// Open HTML `p` elements, so "p in button scope" is usually O(1)
    open_p: usize,
    mode: InsertionMode,
    html: Option<NodeId>,
    head: Option<NodeId>,
    body: Option<NodeId>,
    seen_doctype: bool,
    /// Namespace of the implicit context node (the root)
    context_ns: Namespace,
}

impl<'a> TreeBuilder<'a> {
    pub fn document(input: &'a str) -> Self {
        Self::with_tree(Tree::new_document(), Tokenizer::new(input), Namespace::Html)
    }

    pub fn fragment(input: &'a str, context: FragmentContext) -> Self {
        let mut tokenizer = Tokenizer::new(input);
        if context.namespace == Namespace::Html {
            tokenizer.set_mode(TextMode::for_element(context.tag));
        }
        let mut builder = Self::with_tree(
            Tree::new_fragment(context.tag, context.namespace),
            tokenizer,
            context.namespace,
        );
        builder.mode = InsertionMode::InBody;
        builder
    }

    fn with_tree(tree: Tree, tokenizer: Tokenizer<'a>, context_ns: Namespace) -> Self {
        Self {
            tree,
            tokenizer,
            open: SmallVec::new(),
            open_p: 0,
            mode: InsertionMode::BeforeHead,
            html: None,
            head: None,
            body: None,
            seen_doctype: false,
            context_ns,
        }
    }

    pub fn build(mut self) -> Result<Tree> {
        while let Some(token) = self.tokenizer.next() {
            self.process(token)?;
        }
        if !self.tree.is_fragment() {
            self.ensure_body()?;
        }
        Ok(self.tree)
    }

    fn process(&mut self, token: Token<'_>) -> Result<()> {
        match token {
            Token::Doctype(name) => self.doctype(&name),
            Token::Comment(text) => {
                let parent = self.comment_parent();
                let comment = self.tree.create_comment(&text)?;
                self.tree.append_child(parent, comment)
            }
            Token::Cdata(text) => {
                let parent = self.current();
                let node = if self.in_foreign_content() {
                    self.tree.create_cdata(text)?
                } else {
                    self.tree.create_comment(&format!("[CDATA[{text}]]"))?
                };
                self.tree.append_child(parent, node)
            }
            Token::Text(text) => self.text(&text),
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => self.start_tag(&name, &attrs, self_closing),
            Token::EndTag(name) => self.end_tag(&name),
        }
    }

    // ---- stack -------------------------------------------------------------

    fn current(&self) -> NodeId {
        self.open
            .last()
            .copied()
            .unwrap_or_else(|| self.tree.root_id())
    }

    fn push(&mut self, id: NodeId) {
        if self.is_html(id, TagCode::P) {
            self.open_p += 1;
        }
        self.open.push(id);
    }

    /// Pop everything from `index` upwards
    fn pop_to(&mut self, index: usize) {
        while self.open.len() > index {
            if let Some(id) = self.open.pop() {
                if self.is_html(id, TagCode::P) {
                    self.open_p -= 1;
                }
            }
        }
    }

    fn is_html(&self, id: NodeId, code: TagCode) -> bool {
        let data = self.tree.data(id);
        data.ns == Namespace::Html && data.tag_code == code
    }

    fn current_namespace(&self) -> Namespace {
        self.open
            .last()
            .map_or(self.context_ns, |&id| self.tree.data(id).ns)
    }

    fn is_integration_point(&self, id: NodeId) -> bool {
        let data = self.tree.data(id);
        match data.ns {
            Namespace::Svg => matches!(
                data.tag_code,
                TagCode::ForeignObject | TagCode::Desc | TagCode::Title
            ),
            Namespace::MathMl => matches!(
                data.tag_code,
                TagCode::Mi | TagCode::Mo | TagCode::Mn | TagCode::Ms | TagCode::Mtext
            ),
            _ => false,
        }
    }

    fn in_foreign_content(&self) -> bool {
        match self.open.last() {
            Some(&id) => self.tree.data(id).ns.is_foreign() && !self.is_integration_point(id),
            None => self.context_ns.is_foreign(),
        }
    }

    fn is_scope_boundary(&self, id: NodeId, scope: Scope) -> bool {
        let data = self.tree.data(id);
        if data.ns != Namespace::Html {
            return scope != Scope::Table && self.is_integration_point(id);
        }
        let code = data.tag_code;
        match scope {
            Scope::Table => matches!(code, TagCode::Html | TagCode::Table | TagCode::Template),
            _ => {
                matches!(
                    code,
                    TagCode::Applet
                        | TagCode::Caption
                        | TagCode::Html
                        | TagCode::Table
                        | TagCode::Td
                        | TagCode::Th
                        | TagCode::Marquee
                        | TagCode::Object
                        | TagCode::Template
                ) || (scope == Scope::ListItem && matches!(code, TagCode::Ol | TagCode::Ul))
                    || (scope == Scope::Button && code == TagCode::Button)
            }
        }
    }

    /// Stack index of the topmost HTML element in `targets`, if in scope
    fn in_scope(&self, targets: &[TagCode], scope: Scope) -> Option<usize> {
        if targets == [TagCode::P] && self.open_p == 0 {
            return None;
        }
        for (index, &id) in self.open.iter().enumerate().rev() {
            let data = self.tree.data(id);
            if data.ns == Namespace::Html && targets.contains(&data.tag_code) {
                return Some(index);
            }
            if self.is_scope_boundary(id, scope) {
                return None;
            }
        }
        None
    }

    fn close_in_scope(&mut self, targets: &[TagCode], scope: Scope) -> bool {
        match self.in_scope(targets, scope) {
            Some(index) => {
                self.pop_to(index);
                true
            }
            None => false,
        }
    }

    /// Implied end for `li`, `dd` and `dt`: close the nearest matching item
    /// unless a special element sits in between
    fn close_list_item(&mut self, targets: &[TagCode]) {
        for index in (0..self.open.len()).rev() {
            let id = self.open[index];
            let data = self.tree.data(id);
            if data.ns == Namespace::Html && targets.contains(&data.tag_code) {
                self.pop_to(index);
                return;
            }
            let passable = data.ns == Namespace::Html
                && matches!(data.tag_code, TagCode::Address | TagCode::Div | TagCode::P);
            if !passable && self.is_special(id) {
                return;
            }
        }
    }

    fn is_special(&self, id: NodeId) -> bool {
        let data = self.tree.data(id);
        if data.ns != Namespace::Html {
            return self.is_integration_point(id);
        }
        let code = data.tag_code;
        closes_p(code)
            || is_head_content(code)
            || matches!(
                code,
                TagCode::Applet
                    | TagCode::Area
                    | TagCode::Body
                    | TagCode::Br
                    | TagCode::Button
                    | TagCode::Caption
                    | TagCode::Col
                    | TagCode::Colgroup
                    | TagCode::Embed
                    | TagCode::Frame
                    | TagCode::Frameset
                    | TagCode::Head
                    | TagCode::Html
                    | TagCode::Iframe
                    | TagCode::Img
                    | TagCode::Input
                    | TagCode::Keygen
                    | TagCode::Marquee
                    | TagCode::Noembed
                    | TagCode::Object
                    | TagCode::Param
                    | TagCode::Select
                    | TagCode::Source
                    | TagCode::Tbody
                    | TagCode::Td
                    | TagCode::Textarea
                    | TagCode::Tfoot
                    | TagCode::Th
                    | TagCode::Thead
                    | TagCode::Tr
                    | TagCode::Track
                    | TagCode::Wbr
            )
    }

    // ---- document skeleton -------------------------------------------------

    fn ensure_html(&mut self) -> Result<NodeId> {
        if let Some(html) = self.html {
            return Ok(html);
        }
        let html = self.tree.create_element("html")?;
        self.tree.append_child(self.tree.root_id(), html)?;
        self.push(html);
        self.html = Some(html);
        Ok(html)
    }

    fn ensure_head(&mut self) -> Result<NodeId> {
        if let Some(head) = self.head {
            return Ok(head);
        }
        let html = self.ensure_html()?;
        let head = self.tree.create_element("head")?;
        self.tree.append_child(html, head)?;
        self.push(head);
        self.head = Some(head);
        self.mode = InsertionMode::InHead;
        Ok(head)
    }

    fn close_head(&mut self) {
        if let Some(head) = self.head {
            if let Some(index) = self.open.iter().rposition(|&id| id == head) {
                self.pop_to(index);
            }
            self.mode = InsertionMode::AfterHead;
        }
    }

    fn ensure_body(&mut self) -> Result<NodeId> {
        if let Some(body) = self.body {
            return Ok(body);
        }
        self.ensure_head()?;
        self.close_head();
        let html = self.ensure_html()?;
        let body = self.tree.create_element("body")?;
        self.tree.append_child(html, body)?;
        self.push(body);
        self.body = Some(body);
        self.mode = InsertionMode::InBody;
        Ok(body)
    }

    fn is_skeleton(&self, id: NodeId) -> bool {
        Some(id) == self.html || Some(id) == self.head || Some(id) == self.body
    }

    // ---- tokens ------------------------------------------------------------

    fn doctype(&mut self, name: &str) -> Result<()> {
        if self.tree.is_fragment() || self.seen_doctype || self.html.is_some() {
            tracing::debug!("[Parser] ignoring misplaced doctype {:?}", name);
            return Ok(());
        }
        self.seen_doctype = true;
        let doctype = self.tree.create_doctype(name)?;
        self.tree.append_child(self.tree.root_id(), doctype)
    }

    fn comment_parent(&self) -> NodeId {
        if self.tree.is_fragment() || self.html.is_some() {
            self.current()
        } else {
            self.tree.root_id()
        }
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let current = self.current();
        let document_level = !self.tree.is_fragment()
            && self.mode != InsertionMode::InBody
            && (current == self.tree.root_id() || Some(current) == self.html || Some(current) == self.head);
        if !document_level {
            self.tree.append_text(current, text)?;
            return Ok(());
        }

        // Before the body: leading whitespace stays where it is (dropped
        // before `head`), anything else starts the body.
        let rest = text.trim_start_matches(SPACE);
        let leading = &text[..text.len() - rest.len()];
        if !leading.is_empty() && self.mode != InsertionMode::BeforeHead {
            self.tree.append_text(current, leading)?;
        }
        if rest.is_empty() {
            return Ok(());
        }
        let body = self.ensure_body()?;
        self.tree.append_text(body, rest)?;
        Ok(())
    }

    fn start_tag(&mut self, name: &str, attrs: &[RawAttr], self_closing: bool) -> Result<()> {
        if self.tree.is_fragment() {
            return self.body_start_tag(name, attrs, self_closing);
        }

        let code = TagCode::from_name(name);
        let foreign = self.in_foreign_content();
        match code {
            TagCode::Html if !foreign => {
                let html = self.ensure_html()?;
                return self.merge_attributes(html, attrs);
            }
            TagCode::Head if !foreign => {
                if self.head.is_none() {
                    let head = self.ensure_head()?;
                    self.add_attributes(head, attrs, Namespace::Html)?;
                }
                return Ok(());
            }
            TagCode::Body if !foreign => {
                let body = self.ensure_body()?;
                return self.merge_attributes(body, attrs);
            }
            _ => {}
        }

        if self.mode != InsertionMode::InBody {
            if is_head_content(code) {
                let head = self.ensure_head()?;
                let element = self.insert_element(head, name, attrs, Namespace::Html)?;
                if !code.is_void() {
                    self.push(element);
                    self.tokenizer.set_mode(TextMode::for_element(code));
                }
                return Ok(());
            }
            self.ensure_body()?;
        }
        self.body_start_tag(name, attrs, self_closing)
    }

    fn body_start_tag(&mut self, name: &str, attrs: &[RawAttr], self_closing: bool) -> Result<()> {
        let code = TagCode::from_name(name);

        if self.in_foreign_content() {
            if !breaks_out_of_foreign(code, attrs) {
                let ns = self.current_namespace();
                return self.foreign_element(name, attrs, ns, self_closing);
            }
            while !self.open.is_empty() && self.in_foreign_content() {
                self.pop_to(self.open.len() - 1);
            }
        }

        match code {
            TagCode::Html | TagCode::Head | TagCode::Body => return Ok(()),
            TagCode::Svg => return self.foreign_element(name, attrs, Namespace::Svg, self_closing),
            TagCode::Math => {
                return self.foreign_element(name, attrs, Namespace::MathMl, self_closing)
            }
            TagCode::Li => self.close_list_item(&[TagCode::Li]),
            TagCode::Dd | TagCode::Dt => self.close_list_item(&[TagCode::Dd, TagCode::Dt]),
            _ => {}
        }

        if closes_p(code) {
            self.close_in_scope(&[TagCode::P], Scope::Button);
        }

        let current = self.current();
        match code {
            c if c.is_heading() => {
                let data = self.tree.data(current);
                if data.ns == Namespace::Html && data.tag_code.is_heading() {
                    self.pop_to(self.open.len() - 1);
                }
            }
            TagCode::Option => {
                if self.is_html(current, TagCode::Option) {
                    self.pop_to(self.open.len() - 1);
                }
            }
            TagCode::Optgroup => {
                if self.is_html(current, TagCode::Option) {
                    self.pop_to(self.open.len() - 1);
                }
                if self.is_html(self.current(), TagCode::Optgroup) {
                    self.pop_to(self.open.len() - 1);
                }
            }
            TagCode::Td | TagCode::Th => {
                self.close_in_scope(&[TagCode::Td, TagCode::Th], Scope::Table);
            }
            TagCode::Tr => {
                self.close_in_scope(&[TagCode::Td, TagCode::Th], Scope::Table);
                self.close_in_scope(&[TagCode::Tr], Scope::Table);
            }
            TagCode::Thead | TagCode::Tbody | TagCode::Tfoot => {
                self.close_in_scope(&[TagCode::Td, TagCode::Th], Scope::Table);
                self.close_in_scope(&[TagCode::Tr], Scope::Table);
                self.close_in_scope(&[TagCode::Thead, TagCode::Tbody, TagCode::Tfoot], Scope::Table);
            }
            // Nested anchors are not allowed; the open one ends here.
            TagCode::A => {
                self.close_in_scope(&[TagCode::A], Scope::Default);
            }
            _ => {}
        }

        let parent = self.current();
        let element = self.insert_element(parent, name, attrs, Namespace::Html)?;
        if !code.is_void() {
            self.push(element);
            self.tokenizer.set_mode(TextMode::for_element(code));
        }
        Ok(())
    }

    fn foreign_element(
        &mut self,
        name: &str,
        attrs: &[RawAttr],
        ns: Namespace,
        self_closing: bool,
    ) -> Result<()> {
        let name = if ns == Namespace::Svg {
            svg_name(SVG_TAG_NAMES, name)
        } else {
            name
        };
        let parent = self.current();
        let element = self.insert_element(parent, name, attrs, ns)?;
        if !self_closing {
            self.push(element);
        }
        Ok(())
    }

    fn end_tag(&mut self, name: &str) -> Result<()> {
        let code = TagCode::from_name(name);

        if !self.tree.is_fragment() && self.mode != InsertionMode::InBody {
            match code {
                TagCode::Head => self.close_head(),
                TagCode::Html | TagCode::Body | TagCode::Br => {}
                _ => self.close_named(name),
            }
            return Ok(());
        }

        match code {
            TagCode::Html | TagCode::Body => {}
            TagCode::Br => {
                let parent = self.current();
                self.insert_element(parent, "br", &[], Namespace::Html)?;
            }
            // `</p>` with no open p makes an empty one.
            TagCode::P => {
                if !self.close_in_scope(&[TagCode::P], Scope::Button) {
                    let parent = self.current();
                    self.insert_element(parent, "p", &[], Namespace::Html)?;
                }
            }
            TagCode::Li => {
                self.close_in_scope(&[TagCode::Li], Scope::ListItem);
            }
            TagCode::Dd | TagCode::Dt => {
                self.close_in_scope(&[code], Scope::Default);
            }
            c if c.is_heading() => {
                self.close_in_scope(
                    &[
                        TagCode::H1,
                        TagCode::H2,
                        TagCode::H3,
                        TagCode::H4,
                        TagCode::H5,
                        TagCode::H6,
                    ],
                    Scope::Default,
                );
            }
            TagCode::Table
            | TagCode::Caption
            | TagCode::Thead
            | TagCode::Tbody
            | TagCode::Tfoot
            | TagCode::Tr
            | TagCode::Td
            | TagCode::Th => {
                self.close_in_scope(&[code], Scope::Table);
            }
            _ => self.close_named(name),
        }
        Ok(())
    }

    /// Pop through the nearest open element called `name`, never past a
    /// scope boundary or the html/head/body skeleton
    fn close_named(&mut self, name: &str) {
        for index in (0..self.open.len()).rev() {
            let id = self.open[index];
            if self.is_skeleton(id) {
                return;
            }
            if self.tree.data(id).kind == NodeKind::Element
                && self
                    .tree
                    .resolve(self.tree.data(id).tag)
                    .eq_ignore_ascii_case(name)
            {
                self.pop_to(index);
                return;
            }
            if self.is_scope_boundary(id, Scope::Default) {
                return;
            }
        }
    }

    // ---- element creation ----------------------------------------------------

    fn insert_element(
        &mut self,
        parent: NodeId,
        name: &str,
        attrs: &[RawAttr],
        ns: Namespace,
    ) -> Result<NodeId> {
        let element = self.tree.create_element_ns(name, ns)?;
        self.add_attributes(element, attrs, ns)?;
        self.tree.append_child(parent, element)?;
        Ok(element)
    }

    fn add_attributes(&mut self, element: NodeId, attrs: &[RawAttr], ns: Namespace) -> Result<()> {
        for attr in attrs {
            let (attr_ns, key) = if ns.is_foreign() {
                let (attr_ns, local) = foreign_attribute(&attr.name);
                let local = if ns == Namespace::Svg && attr_ns == Namespace::Html {
                    svg_name(SVG_ATTRIBUTE_NAMES, local)
                } else {
                    local
                };
                (attr_ns, local)
            } else {
                (Namespace::Html, attr.name.as_str())
            };
            self.tree.add_attribute(element, key, &attr.value, attr_ns)?;
        }
        Ok(())
    }

    /// Copy attributes the element does not carry yet (`<html>`/`<body>`
    /// repeated later in the input)
    fn merge_attributes(&mut self, element: NodeId, attrs: &[RawAttr]) -> Result<()> {
        for attr in attrs {
            let present = self
                .tree
                .node(element)
                .is_some_and(|node| node.has_attribute(&attr.name));
            if !present {
                self.tree
                    .add_attribute(element, &attr.name, &attr.value, Namespace::Html)?;
            }
        }
        Ok(())
    }
}
