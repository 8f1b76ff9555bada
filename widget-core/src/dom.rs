//! Minimal element tree standing in for the page's weather container.
//!
//! The widget only ever creates flat, text-bearing elements, so this is a
//! small owned tree rather than a general DOM: no parent links, no events.

use std::fmt::Write as _;

const VOID_TAGS: &[&str] = &["br", "img"];
const CAPITALIZE_STYLE: &str = "text-transform: capitalize";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Text of this element and all descendants, in document order.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone().unwrap_or_default();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Text as displayed, with the element's `text-transform` applied.
    pub fn rendered_text(&self) -> String {
        let text = self.text_content();
        let capitalize = self
            .attr("style")
            .is_some_and(|s| s.contains(CAPITALIZE_STYLE));

        if capitalize { capitalize_words(&text) } else { text }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value, true));
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        if let Some(text) = &self.text {
            out.push_str(&escape(text, false));
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Uppercase the first letter of every whitespace-separated word.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            at_word_start = false;
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }

    out
}

fn escape(s: &str, in_attr: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// The container the render engine draws into.
///
/// Renderers must `clear` before appending; nothing else mutates a target.
pub trait RenderTarget: Send {
    fn clear(&mut self);
    fn append(&mut self, element: Element);
    fn children(&self) -> &[Element];
}

/// In-memory render target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    id: String,
    children: Vec<Element>,
}

impl Container {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// The container as a `<section>` element holding the current children.
    pub fn to_html(&self) -> String {
        let section = self
            .children
            .iter()
            .cloned()
            .fold(Element::new("section").with_attr("id", self.id.as_str()), Element::with_child);
        section.to_html()
    }

    /// Plain-text rendering for terminals.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for child in &self.children {
            match child.tag() {
                "br" => lines.push(String::new()),
                "img" => lines.push(format!("[icon] {}", child.attr("src").unwrap_or_default())),
                "a" => lines.push(format!(
                    "{} <{}>",
                    child.rendered_text(),
                    child.attr("href").unwrap_or_default()
                )),
                _ => lines.push(child.rendered_text()),
            }
        }
        lines.join("\n")
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new("weather")
    }
}

impl RenderTarget for Container {
    fn clear(&mut self) {
        self.children.clear();
    }

    fn append(&mut self, element: Element) {
        self.children.push(element);
    }

    fn children(&self) -> &[Element] {
        &self.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_concatenates_descendants() {
        let el = Element::new("p")
            .with_text("a")
            .with_child(Element::new("span").with_text("b"))
            .with_child(Element::new("em").with_child(Element::new("b").with_text("c")));
        assert_eq!(el.text_content(), "abc");
    }

    #[test]
    fn with_attr_replaces_existing_value() {
        let el = Element::new("a").with_attr("href", "x").with_attr("href", "y");
        assert_eq!(el.attr("href"), Some("y"));
        assert_eq!(el.to_html(), r#"<a href="y"></a>"#);
    }

    #[test]
    fn capitalize_style_affects_rendered_text_only() {
        let el = Element::new("p")
            .with_text("clear sky")
            .with_attr("style", "text-transform: capitalize");
        assert_eq!(el.text_content(), "clear sky");
        assert_eq!(el.rendered_text(), "Clear Sky");
    }

    #[test]
    fn capitalize_words_keeps_spacing() {
        assert_eq!(capitalize_words("light  rain\tshowers"), "Light  Rain\tShowers");
        assert_eq!(capitalize_words("überall"), "Überall");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn html_escapes_text_and_attributes() {
        let el = Element::new("a")
            .with_attr("href", "https://x/?a=1&b=\"2\"")
            .with_text("<b> & co");
        assert_eq!(
            el.to_html(),
            r#"<a href="https://x/?a=1&amp;b=&quot;2&quot;">&lt;b&gt; &amp; co</a>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        assert_eq!(Element::new("br").to_html(), "<br>");
        assert_eq!(Element::new("img").with_attr("src", "i.png").to_html(), r#"<img src="i.png">"#);
    }

    #[test]
    fn container_clear_removes_everything() {
        let mut c = Container::default();
        c.append(Element::new("h2").with_text("one"));
        c.append(Element::new("br"));
        assert_eq!(c.children().len(), 2);

        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.to_html(), r#"<section id="weather"></section>"#);
    }

    #[test]
    fn container_text_lists_children_in_order() {
        let mut c = Container::new("w");
        c.append(Element::new("h2").with_text("Place"));
        c.append(Element::new("a").with_attr("href", "https://m").with_text("Map"));
        c.append(Element::new("img").with_attr("src", "https://i"));
        c.append(Element::new("br"));
        c.append(Element::new("p").with_text("done"));

        assert_eq!(c.to_text(), "Place\nMap <https://m>\n[icon] https://i\n\ndone");
    }
}
