//! # Execução de Consultas sobre XML/HTML
//!
//! Dois tipos de documento, cada um com o parser adequado:
//!
//! - **XML** (ALTO, TEI, I-CAB, ...): árvore do [`crate::xml`], lida pelo
//!   `quick-xml` sem reestruturação. A consulta é avaliada aqui mesmo, com a
//!   semântica do combinador de descendente.
//! - **HTML**: árvore e motor de seletores do crate `scraper` (html5ever +
//!   selectors).
//!
//! Nos dois casos, nomes de tag e de atributo são comparados sem diferenciar
//! maiúsculas, como o `html.parser` do BeautifulSoup fazia.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};
use crate::route::QuerySpec;
use crate::xml::{is_valid_name, name_matches, XmlDocument, XmlElement};

/// Qual parser usar para um arquivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Xml,
    Html,
}

impl MarkupKind {
    /// `.html`/`.htm` são HTML; qualquer outra extensão é lida como XML
    /// (inclusive os `.txt` do I-CAB).
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.');
        if extension.eq_ignore_ascii_case("html") || extension.eq_ignore_ascii_case("htm") {
            MarkupKind::Html
        } else {
            MarkupKind::Xml
        }
    }
}

/// Documento já lido.
#[derive(Debug, Clone)]
pub enum Document {
    Xml(XmlDocument),
    Html(Html),
}

/// Faz o parse do documento. XML malformado é erro; HTML é sempre aceito.
pub fn parse_markup(source: &str, kind: MarkupKind) -> Result<Document> {
    match kind {
        MarkupKind::Xml => Ok(Document::Xml(XmlDocument::parse(source)?)),
        MarkupKind::Html => Ok(Document::Html(Html::parse_document(source))),
    }
}

/// Um elemento selecionado.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Xml(XmlElement<'a>),
    Html(ElementRef<'a>),
}

impl<'a> Node<'a> {
    pub fn name(&self) -> &'a str {
        match *self {
            Node::Xml(element) => element.name(),
            Node::Html(element) => element.value().name(),
        }
    }

    /// Valor do atributo; o nome é comparado sem diferenciar maiúsculas.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        match *self {
            Node::Xml(element) => element.attr(name),
            Node::Html(element) => element
                .value()
                .attrs()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value),
        }
    }

    /// Texto de todos os descendentes.
    pub fn text(&self) -> String {
        match *self {
            Node::Xml(element) => element.text(),
            Node::Html(element) => element.text().collect(),
        }
    }
}

/// Seleciona, em ordem de documento, os nós que casam com a consulta.
///
/// Com `anchored_at_root`, a tag raiz omitida precisa ser a do documento;
/// se não for, nada é selecionado. Uma consulta inválida vira
/// [`Error::QuerySyntax`] com mensagem genérica.
pub fn select<'a>(document: &'a Document, query: &QuerySpec) -> Result<Vec<Node<'a>>> {
    match document {
        Document::Xml(xml) => select_xml(xml, query),
        Document::Html(html) => select_html(html, query),
    }
}

fn syntax_error(query: &QuerySpec) -> Error {
    Error::QuerySyntax {
        route: query.route.clone(),
    }
}

fn select_html<'a>(html: &'a Html, query: &QuerySpec) -> Result<Vec<Node<'a>>> {
    let selector = Selector::parse(&query.selector()).map_err(|_| syntax_error(query))?;

    if !query.anchored_at_root {
        return Ok(html.select(&selector).map(Node::Html).collect());
    }

    let root = html.root_element();
    let root_matches = query
        .root_tag
        .as_deref()
        .is_some_and(|tag| root.value().name().eq_ignore_ascii_case(tag));
    if !root_matches {
        return Ok(Vec::new());
    }
    Ok(root
        .select(&selector)
        .filter(|element| *element != root)
        .map(Node::Html)
        .collect())
}

fn select_xml<'a>(xml: &'a XmlDocument, query: &QuerySpec) -> Result<Vec<Node<'a>>> {
    let steps: Vec<&str> = query.path.split(' ').collect();
    let steps_valid = steps.iter().all(|step| *step == "*" || is_valid_name(step));
    let attribute_valid = query.attribute.as_deref().map_or(true, is_valid_name);
    if !steps_valid || !attribute_valid {
        return Err(syntax_error(query));
    }

    let scope = if query.anchored_at_root {
        let root = xml.root_element();
        match (root, query.root_tag.as_deref()) {
            (Some(root), Some(tag)) if name_matches(root.name(), tag) => Some(root),
            _ => return Ok(Vec::new()),
        }
    } else {
        None
    };

    Ok(xml
        .elements()
        .filter(|element| matches_path(*element, &steps, scope))
        .filter(|element| match query.attribute.as_deref() {
            Some(attr) => element.attr(attr).is_some(),
            None => true,
        })
        .map(Node::Xml)
        .collect())
}

/// O último passo casa com o próprio elemento; os anteriores, em ordem, com
/// ancestrais a qualquer distância. `scope` (a raiz já consumida) não conta
/// como ancestral nem pode ser selecionado.
fn matches_path(element: XmlElement<'_>, steps: &[&str], scope: Option<XmlElement<'_>>) -> bool {
    let Some((last, rest)) = steps.split_last() else {
        return false;
    };
    if Some(element) == scope || !name_matches(element.name(), last) {
        return false;
    }

    let mut pending = rest.iter().rev().peekable();
    let mut ancestor = element.parent();
    while let Some(step) = pending.peek() {
        match ancestor {
            Some(current) if Some(current) != scope => {
                if name_matches(current.name(), step) {
                    pending.next();
                }
                ancestor = current.parent();
            }
            _ => return false,
        }
    }
    true
}

/// Junta o conteúdo dos nós com um espaço simples.
///
/// - Com `attribute`: o valor do atributo em cada nó; ausência é erro.
/// - Sem `attribute`: o texto de todos os descendentes do nó.
///
/// Nenhum nó resulta em string vazia.
pub fn extract(nodes: &[Node<'_>], attribute: Option<&str>) -> Result<String> {
    let mut parts = Vec::with_capacity(nodes.len());

    for node in nodes {
        match attribute {
            Some(attr) => {
                let value = node.attr(attr).ok_or_else(|| Error::MissingAttribute {
                    element: node.name().to_string(),
                    attribute: attr.to_string(),
                })?;
                parts.push(value.to_string());
            }
            None => parts.push(node.text()),
        }
    }

    Ok(parts.join(" "))
}

/// Seleciona e extrai em um passo.
pub fn collect_text(document: &Document, query: &QuerySpec) -> Result<String> {
    let nodes = select(document, query)?;
    extract(&nodes, query.attribute.as_deref())
}
