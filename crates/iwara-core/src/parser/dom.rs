//! Typed queries over a parsed page
//!
//! Extractors never walk the raw tree themselves. They go through [`Page`] and
//! the [`ElementExt`] methods, which return `Option`s for lookups that may
//! legitimately miss and a [`IwaraError::MissingField`] for the ones that
//! must not.

use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::error::{IwaraError, Result};

/// Compiles a CSS selector
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| IwaraError::ParseError(format!("Invalid selector `{}`: {:?}", css, e)))
}

/// Collapses runs of whitespace into single spaces and trims
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads the digits out of a label such as " 12 comments ", 0 when there are none
pub(crate) fn digits(text: &str) -> u32 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// First `YYYY-MM-DD[ HH:MM]` timestamp in a text, empty when there is none
pub(crate) fn extract_date(text: &str) -> String {
    Regex::new(r"\d{4}-\d{2}-\d{2}(?:\s+\d{1,2}:\d{2})?")
        .ok()
        .and_then(|re| re.find(text).map(|m| normalize_whitespace(m.as_str())))
        .unwrap_or_default()
}

/// A fetched HTML document
pub(crate) struct Page {
    document: Html,
}

impl Page {
    pub(crate) fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    pub(crate) fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    /// Text of `<title>`, empty when absent
    pub(crate) fn title(&self) -> Result<String> {
        self.root().text_of("title")
    }

    /// Inner HTML of `<head>`, where the site keeps its inline settings script
    pub(crate) fn head_html(&self) -> Result<String> {
        Ok(self
            .root()
            .find("head")?
            .map(|head| head.inner_html())
            .unwrap_or_default())
    }
}

/// Capability queries on an element
pub(crate) trait ElementExt<'a> {
    /// First descendant matching `css`
    fn find(&self, css: &str) -> Result<Option<ElementRef<'a>>>;

    /// All descendants matching `css`, in document order
    fn find_all(&self, css: &str) -> Result<Vec<ElementRef<'a>>>;

    fn exists(&self, css: &str) -> Result<bool> {
        Ok(self.find(css)?.is_some())
    }

    /// First descendant matching `css`, or a missing-field error naming `field`
    fn require(&self, css: &str, field: &str) -> Result<ElementRef<'a>> {
        self.find(css)?.ok_or_else(|| IwaraError::missing(field))
    }

    /// Normalized text of the first match, empty when nothing matches
    fn text_of(&self, css: &str) -> Result<String> {
        Ok(self.find(css)?.map(|e| e.clean_text()).unwrap_or_default())
    }

    /// Attribute of the first match that carries it
    fn attr_of(&self, css: &str, attr: &str) -> Result<Option<String>> {
        Ok(self
            .find_all(css)?
            .into_iter()
            .find_map(|e| e.value().attr(attr).map(str::to_string)))
    }

    /// All text below the element with whitespace collapsed
    fn clean_text(&self) -> String;

    /// Text of the element's direct text children only
    fn own_text(&self) -> String;

    /// Text with `<br>`/block breaks kept as newlines and links kept as markup
    fn plain_text(&self) -> String;

    /// Direct child elements in document order
    fn element_children(&self) -> Vec<ElementRef<'a>>;

    /// Next sibling that is an element
    fn next_element(&self) -> Option<ElementRef<'a>>;

    /// Raw `class` attribute, empty when absent
    fn class_attr(&self) -> &'a str;

    fn has_class_name(&self, class: &str) -> bool;
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn find(&self, css: &str) -> Result<Option<ElementRef<'a>>> {
        let selector = selector(css)?;
        Ok(self.select(&selector).next())
    }

    fn find_all(&self, css: &str) -> Result<Vec<ElementRef<'a>>> {
        let selector = selector(css)?;
        Ok(self.select(&selector).collect())
    }

    fn clean_text(&self) -> String {
        normalize_whitespace(&self.text().collect::<String>())
    }

    fn own_text(&self) -> String {
        let text: String = self
            .children()
            .filter_map(|child| child.value().as_text().map(|t| t.to_string()))
            .collect();
        normalize_whitespace(&text)
    }

    fn plain_text(&self) -> String {
        let mut raw = String::new();
        render_plain(*self, &mut raw);

        let mut lines: Vec<String> = Vec::new();
        for line in raw.lines().map(normalize_whitespace) {
            if line.is_empty() && lines.last().is_none_or(|l| l.is_empty()) {
                continue;
            }
            lines.push(line);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines.join("\n")
    }

    fn element_children(&self) -> Vec<ElementRef<'a>> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn next_element(&self) -> Option<ElementRef<'a>> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn class_attr(&self) -> &'a str {
        self.value().attr("class").unwrap_or("")
    }

    fn has_class_name(&self, class: &str) -> bool {
        self.class_attr().split_whitespace().any(|c| c == class)
    }
}

fn render_plain(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.replace('\n', " ")),
            Node::Element(el) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                match el.name() {
                    "br" => out.push('\n'),
                    "a" => {
                        let href = el.attr("href").unwrap_or("");
                        out.push_str(&format!(
                            "<a href=\"{}\">{}</a>",
                            href,
                            child_ref.clean_text()
                        ));
                    }
                    "p" | "div" | "li" | "blockquote" => {
                        out.push('\n');
                        render_plain(child_ref, out);
                        out.push('\n');
                    }
                    "script" | "style" => {}
                    _ => render_plain(child_ref, out),
                }
            }
            _ => {}
        }
    }
}
