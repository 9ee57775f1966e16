//! # Árvore XML
//!
//! Árvore mínima construída a partir dos eventos do `quick-xml`. Ao contrário
//! do construtor HTML5, nada é reestruturado: `<body>` e `<head>` aninhados
//! (TEI) ficam onde estão e `<x/>` fecha o elemento na hora.
//!
//! Os elementos ficam num vetor em ordem de documento; o índice é a
//! identidade do nó.

use std::sync::OnceLock;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use crate::error::Result;

#[derive(Debug, Clone)]
enum Child {
    Element(usize),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    name: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<Child>,
}

/// Documento XML já lido.
#[derive(Debug, Clone, Default)]
pub struct XmlDocument {
    elements: Vec<ElementData>,
}

impl XmlDocument {
    /// Lê o documento inteiro. Tags desbalanceadas são erro.
    pub fn parse(source: &str) -> Result<Self> {
        let mut reader = Reader::from_str(source);
        let mut elements: Vec<ElementData> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let index = push_element(&mut elements, &start, open.last().copied())?;
                    open.push(index);
                }
                Event::Empty(start) => {
                    push_element(&mut elements, &start, open.last().copied())?;
                }
                Event::End(_) => {
                    open.pop();
                }
                Event::Text(text) => {
                    if let Some(&parent) = open.last() {
                        let text = text.unescape().map_err(quick_xml::Error::from)?;
                        elements[parent].children.push(Child::Text(text.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(&parent) = open.last() {
                        let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        elements[parent].children.push(Child::Text(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { elements })
    }

    /// Primeiro elemento de topo do documento.
    pub fn root_element(&self) -> Option<XmlElement<'_>> {
        (!self.elements.is_empty()).then(|| XmlElement { doc: self, index: 0 })
    }

    /// Todos os elementos em ordem de documento.
    pub fn elements(&self) -> impl Iterator<Item = XmlElement<'_>> {
        (0..self.elements.len()).map(move |index| XmlElement { doc: self, index })
    }
}

fn push_element(
    elements: &mut Vec<ElementData>,
    start: &BytesStart<'_>,
    parent: Option<usize>,
) -> Result<usize> {
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(quick_xml::Error::from)?;
        attributes.push((key, value.into_owned()));
    }

    let index = elements.len();
    elements.push(ElementData {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        attributes,
        parent,
        children: Vec::new(),
    });
    if let Some(parent) = parent {
        elements[parent].children.push(Child::Element(index));
    }
    Ok(index)
}

/// Referência a um elemento de um [`XmlDocument`].
#[derive(Debug, Clone, Copy)]
pub struct XmlElement<'a> {
    doc: &'a XmlDocument,
    index: usize,
}

impl PartialEq for XmlElement<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.index == other.index
    }
}

impl Eq for XmlElement<'_> {}

impl<'a> XmlElement<'a> {
    fn data(&self) -> &'a ElementData {
        &self.doc.elements[self.index]
    }

    /// Nome qualificado, como escrito no documento (ex: `String`, `tei:p`).
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Valor do atributo, comparando o nome sem diferenciar maiúsculas.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn parent(&self) -> Option<XmlElement<'a>> {
        self.data().parent.map(|index| XmlElement { doc: self.doc, index })
    }

    /// Texto de todos os descendentes, concatenado em ordem de documento.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.data().children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(index) => XmlElement { doc: self.doc, index: *index }.push_text(out),
            }
        }
    }
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[\p{L}_][\p{L}\p{N}_.\-:]*$").expect("padrão de nome XML válido")
    })
}

/// Nome de tag ou de atributo aceito numa consulta XML.
pub fn is_valid_name(name: &str) -> bool {
    name_pattern().is_match(name)
}

/// `*` casa com qualquer elemento; do contrário compara o nome qualificado
/// ou só a parte local, sem diferenciar maiúsculas.
pub fn name_matches(name: &str, step: &str) -> bool {
    if step == "*" || name.eq_ignore_ascii_case(step) {
        return true;
    }
    match name.rsplit_once(':') {
        Some((_, local)) => local.eq_ignore_ascii_case(step),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_closing_element_has_no_children() {
        let doc = XmlDocument::parse("<root><note/><content>Hello</content></root>").unwrap();
        let names: Vec<&str> = doc.elements().map(|e| e.name()).collect();
        assert_eq!(names, vec!["root", "note", "content"]);

        let note = doc.elements().nth(1).unwrap();
        assert_eq!(note.text(), "");
        assert_eq!(note.parent(), doc.root_element());
    }

    #[test]
    fn test_text_concatenates_descendants() {
        let doc = XmlDocument::parse("<p>Ana <b>de</b> Souza<![CDATA[!]]></p>").unwrap();
        assert_eq!(doc.root_element().unwrap().text(), "Ana de Souza!");
    }

    #[test]
    fn test_entities_are_unescaped() {
        let doc = XmlDocument::parse(r#"<w form="a &amp; b">x &lt; y</w>"#).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(root.attr("FORM"), Some("a & b"));
        assert_eq!(root.text(), "x < y");
    }

    #[test]
    fn test_mismatched_tags_are_rejected() {
        assert!(XmlDocument::parse("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_empty_document_has_no_root() {
        assert!(XmlDocument::parse("").unwrap().root_element().is_none());
    }

    #[test]
    fn test_name_matching() {
        assert!(name_matches("String", "string"));
        assert!(name_matches("tei:body", "body"));
        assert!(name_matches("anything", "*"));
        assert!(!name_matches("bodyx", "body"));
        assert!(is_valid_name("TextBlock"));
        assert!(is_valid_name("tei:p"));
        assert!(!is_valid_name("@"));
        assert!(!is_valid_name("!"));
    }
}
