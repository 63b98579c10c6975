use super::source::read_source;
use crate::errors::{AppError, AppResult};
use crate::models::ParseMode;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::path::Path;
use tracing::{debug, error, info};

/// An element of a parsed XML document.
///
/// `text` holds the character data that appears before the first child element,
/// with entity and character references resolved. It is `None` only when the
/// element has no character data at all; whitespace is kept as written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub tag: String,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Returns all descendants named `tag`, in document order. The element
    /// itself is not considered.
    pub fn find_all(&self, tag: &str) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect_matching(tag, &mut out);
        }
        out
    }

    /// First direct child named `tag`.
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.tag == tag)
    }

    fn collect_matching<'a>(&'a self, tag: &str, out: &mut Vec<&'a XmlElement>) {
        if self.tag == tag {
            out.push(self);
        }
        for child in &self.children {
            child.collect_matching(tag, out);
        }
    }
}

/// Element whose end tag has not been read yet.
struct OpenElement {
    tag: String,
    text: String,
    children: Vec<XmlElement>,
}

impl OpenElement {
    fn new(tag: String) -> Self {
        Self {
            tag,
            text: String::new(),
            children: Vec::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        // Text after the first child is tail text and is not kept.
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }

    fn close(self) -> XmlElement {
        let text = if self.text.is_empty() {
            None
        } else {
            Some(self.text)
        };
        XmlElement {
            tag: self.tag,
            text,
            children: self.children,
        }
    }
}

fn decode_name(name: &[u8]) -> Result<String, String> {
    std::str::from_utf8(name)
        .map(str::to_string)
        .map_err(|e| format!("invalid tag name: {e}"))
}

fn attach(stack: &mut [OpenElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [OpenElement], text: &str) -> Result<(), String> {
    match stack.last_mut() {
        Some(open) => {
            open.push_text(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err("text outside the document element".to_string()),
    }
}

/// Builds the element tree, returning a human-readable reason on failure.
fn parse_xml_document(content: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{e} (at byte {})", reader.error_position()))?;

        match event {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err("junk after document element".to_string());
                }
                stack.push(OpenElement::new(decode_name(e.name().as_ref())?));
            }
            Event::Empty(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err("junk after document element".to_string());
                }
                let element = OpenElement::new(decode_name(e.name().as_ref())?).close();
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
                attach(&mut stack, &mut root, open.close());
            }
            Event::Text(e) => {
                let text = e
                    .decode()
                    .map_err(|e| format!("Failed to decode XML text: {e}"))?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| format!("Failed to decode CDATA: {e}"))?;
                push_text(&mut stack, &text)?;
            }
            Event::GeneralRef(e) => {
                let resolved = match e.resolve_char_ref().map_err(|e| e.to_string())? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = e
                            .decode()
                            .map_err(|e| format!("Failed to decode entity: {e}"))?;
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| format!("undefined entity &{name};"))?
                            .to_string()
                    }
                };
                push_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.tag));
    }

    root.ok_or_else(|| "no element found".to_string())
}

/// Parses XML text held in memory and returns the document element.
pub fn parse_xml_str(content: &str) -> AppResult<XmlElement> {
    parse_xml_document(content.trim_start_matches('\u{feff}').trim()).map_err(|reason| {
        AppError::MalformedInput {
            path: "<string>".to_string(),
            reason,
        }
    })
}

/// Loads an XML document from disk and returns its root element.
///
/// # Errors
///
/// `NotFound`, `EmptyInput` or `MalformedInput`; each is logged at error level.
pub fn load_xml_file(path: impl AsRef<Path>) -> AppResult<XmlElement> {
    let path = path.as_ref();
    let content = read_source(path, "XML")?;

    let root = parse_xml_document(&content).map_err(|reason| {
        error!(path = %path.display(), error = %reason, "Failed to parse XML file");
        AppError::MalformedInput {
            path: path.display().to_string(),
            reason,
        }
    })?;

    debug!(path = %path.display(), root = %root.tag, "Loaded XML file");
    Ok(root)
}

/// Safe variant of [`load_xml_file`]: failures are logged and yield `None`.
pub fn load_xml_file_safe(path: impl AsRef<Path>) -> Option<XmlElement> {
    load_xml_file(path).ok()
}

/// Loads every path in order, skipping failures in safe mode.
pub fn load_multiple_xml<P: AsRef<Path>>(
    paths: &[P],
    mode: ParseMode,
) -> AppResult<Vec<XmlElement>> {
    let mut roots = Vec::with_capacity(paths.len());

    for path in paths {
        match mode {
            ParseMode::Strict => roots.push(load_xml_file(path)?),
            ParseMode::Safe => {
                if let Some(root) = load_xml_file_safe(path) {
                    roots.push(root);
                }
            }
        }
    }

    info!(
        requested = paths.len(),
        loaded = roots.len(),
        "Loaded XML files"
    );
    Ok(roots)
}
