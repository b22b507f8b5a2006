use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;

/// One child step of a structural path: an element name, optionally with an
/// exact `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub tag: &'static str,
    pub class: Option<&'static str>,
}

impl Step {
    pub const fn child(tag: &'static str) -> Self {
        Self { tag, class: None }
    }

    pub const fn with_class(tag: &'static str, class: &'static str) -> Self {
        Self {
            tag,
            class: Some(class),
        }
    }

    fn matches(&self, element: &ElementRef) -> bool {
        let value = element.value();
        value.name() == self.tag
            && self
                .class
                .map_or(true, |class| value.attr("class") == Some(class))
    }
}

/// Renders a path for error messages, e.g. `div/div/p[@class="x"]`.
pub fn describe(path: &[Step]) -> String {
    path.iter()
        .map(|step| match step.class {
            Some(class) => format!("{}[@class=\"{}\"]", step.tag, class),
            None => step.tag.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Every element reached by following `path` from `root`, in document order.
pub fn descend<'a>(root: ElementRef<'a>, path: &[Step]) -> Vec<ElementRef<'a>> {
    let mut frontier = vec![root];
    for step in path {
        frontier = frontier
            .into_iter()
            .flat_map(|element| element.children().filter_map(ElementRef::wrap))
            .filter(|element| step.matches(element))
            .collect();
    }
    frontier
}

/// The `index`-th (zero based) element at `path`, or a `MissingNode` error.
pub fn nth<'a>(
    root: ElementRef<'a>,
    path: &[Step],
    index: usize,
    field: &'static str,
) -> Result<ElementRef<'a>, ParseError> {
    descend(root, path)
        .into_iter()
        .nth(index)
        .ok_or_else(|| ParseError::MissingNode {
            field,
            path: format!("({})[{}]", describe(path), index + 1),
        })
}

pub fn first<'a>(
    root: ElementRef<'a>,
    path: &[Step],
    field: &'static str,
) -> Result<ElementRef<'a>, ParseError> {
    nth(root, path, 0, field)
}

/// Text nodes that are direct children of `element`.
pub fn own_text<'a>(element: ElementRef<'a>) -> Vec<&'a str> {
    element
        .children()
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .collect()
}

/// Text before the element's first child element, if any.
pub fn leading_text<'a>(element: ElementRef<'a>, field: &'static str) -> Result<&'a str, ParseError> {
    element
        .children()
        .next()
        .and_then(|node| node.value().as_text().map(|text| &**text))
        .ok_or_else(|| ParseError::MissingNode {
            field,
            path: format!("{}/text()", element.value().name()),
        })
}

/// Concatenated text of the element and all of its descendants.
pub fn full_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

pub fn selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::InvalidSelector(css.to_string()))
}

/// First element anywhere in the document matching `css`.
pub fn select_first<'a>(
    document: &'a Html,
    css: &str,
    field: &'static str,
) -> Result<ElementRef<'a>, ParseError> {
    let selector = selector(css)?;
    document
        .select(&selector)
        .next()
        .ok_or_else(|| ParseError::MissingNode {
            field,
            path: css.to_string(),
        })
}
