//! # Compilador de Rotas
//!
//! Uma *rota* é uma mini-linguagem para apontar onde está o conteúdo textual
//! dentro de um documento XML/HTML:
//!
//! | Rota                               | Seletor compilado                   | Atributo  |
//! |------------------------------------|-------------------------------------|-----------|
//! | `contentnode`                      | `contentnode`                       | —         |
//! | `root#child#contentnode[content]`  | `root child contentnode[content]`   | `content` |
//! | `parent#*#text`                    | `parent * text`                     | —         |
//!
//! - `#` separa os elementos; nenhum elemento pode ser vazio.
//! - `*` é um curinga para um nível intermediário com qualquer tag.
//! - `[attr]` só é permitido no último elemento: o conteúdo passa a ser o
//!   valor do atributo em vez do texto do nó.
//!
//! A compilação é pura (string → consulta) e não toca na árvore.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Separador entre elementos de uma rota.
pub const SEGMENT_SEPARATOR: char = '#';

fn last_segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<name>[^\[\]]+)(?:\[(?P<attr>[^\[\]]+)\])?$")
            .expect("padrão de segmento válido")
    })
}

/// Uma rota validada: nomes dos elementos em ordem e o atributo opcional do último.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Texto original, mantido para mensagens de erro.
    pub source: String,
    /// Nomes de tag sem o marcador de atributo (podem ser `*`).
    pub segments: Vec<String>,
    /// Atributo de onde extrair o conteúdo, se houver.
    pub attribute: Option<String>,
}

impl Route {
    /// Valida e decompõe uma rota.
    ///
    /// Falha com [`Error::InvalidRoute`] se algum elemento for vazio, se um
    /// elemento que não é o último tiver `[`, ou se o atributo estiver malformado.
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(SEGMENT_SEPARATOR).collect();
        let last_index = parts.len() - 1;

        let mut segments = Vec::with_capacity(parts.len());
        let mut attribute = None;

        for (index, part) in parts.iter().enumerate() {
            if part.is_empty() {
                return Err(Error::invalid_route(input, "não pode conter elementos vazios."));
            }

            if index < last_index {
                if part.contains('[') || part.contains(']') {
                    return Err(Error::invalid_route(
                        input,
                        "só pode conter um atributo no último elemento.",
                    ));
                }
                segments.push(part.to_string());
                continue;
            }

            let caps = last_segment_pattern()
                .captures(part)
                .ok_or_else(|| Error::invalid_route(input, "contém um atributo malformado."))?;
            segments.push(caps["name"].to_string());
            attribute = caps.name("attr").map(|m| m.as_str().to_string());
        }

        Ok(Self {
            source: input.to_string(),
            segments,
            attribute,
        })
    }

    /// Compila a rota em uma consulta estrutural.
    ///
    /// Se `root_tag` for informado e a rota tiver mais de um elemento começando
    /// pela tag raiz, esse primeiro elemento é descartado e a consulta fica
    /// marcada como `anchored_at_root`, guardando a tag omitida para ser
    /// conferida contra a raiz do documento.
    pub fn compile(&self, root_tag: Option<&str>) -> QuerySpec {
        let skip_root = match root_tag {
            Some(root) => self.segments.len() > 1 && self.segments[0] == root,
            None => false,
        };

        let names = if skip_root {
            &self.segments[1..]
        } else {
            &self.segments[..]
        };

        QuerySpec {
            path: names.join(" "),
            attribute: self.attribute.clone(),
            anchored_at_root: skip_root,
            root_tag: skip_root.then(|| self.segments[0].clone()),
            route: self.source.clone(),
        }
    }
}

/// Consulta compilada, pronta para ser executada sobre um documento.
///
/// A igualdade compara só a consulta; `route` fica de fora.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Nomes de tag unidos pelo combinador de descendente (espaço).
    pub path: String,
    /// Atributo a extrair no lugar do texto.
    pub attribute: Option<String>,
    /// O primeiro elemento da rota era a tag raiz e foi omitido.
    pub anchored_at_root: bool,
    /// A tag omitida, quando `anchored_at_root`.
    pub root_tag: Option<String>,
    /// Rota de origem (para mensagens de erro).
    pub route: String,
}

impl PartialEq for QuerySpec {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
            && self.attribute == other.attribute
            && self.anchored_at_root == other.anchored_at_root
            && self.root_tag == other.root_tag
    }
}

impl Eq for QuerySpec {}

impl QuerySpec {
    /// Seletor CSS executável: o caminho, seguido de `[attr]` quando há atributo.
    pub fn selector(&self) -> String {
        match &self.attribute {
            Some(attr) => format!("{}[{}]", self.path, attr),
            None => self.path.clone(),
        }
    }
}

/// Compila uma rota sem dica de tag raiz.
pub fn compile_route(route: &str) -> Result<QuerySpec> {
    Ok(Route::parse(route)?.compile(None))
}

/// Compila uma rota omitindo o primeiro elemento quando ele repete `root_tag`.
pub fn compile_route_anchored(route: &str, root_tag: &str) -> Result<QuerySpec> {
    Ok(Route::parse(route)?.compile(Some(root_tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invalid(route: &str) {
        match compile_route(route) {
            Err(Error::InvalidRoute { route: r, .. }) => assert_eq!(r, route),
            other => panic!("esperava InvalidRoute para '{}', obteve {:?}", route, other),
        }
    }

    #[test]
    fn test_compile_with_attribute() {
        let query = compile_route("root#child#contentnode[content]").unwrap();
        assert_eq!(query.path, "root child contentnode");
        assert_eq!(query.attribute.as_deref(), Some("content"));
        assert_eq!(query.selector(), "root child contentnode[content]");
        assert!(!query.anchored_at_root);
    }

    #[test]
    fn test_compile_without_attribute() {
        let query = compile_route("root#child#contentnode").unwrap();
        assert_eq!(query.selector(), "root child contentnode");
        assert_eq!(query.attribute, None);
    }

    #[test]
    fn test_compile_single_tag() {
        let query = compile_route("contentnode").unwrap();
        assert_eq!(query.selector(), "contentnode");
    }

    #[test]
    fn test_wildcard_is_preserved() {
        let query = compile_route("child#*#contentnode").unwrap();
        assert_eq!(query.path, "child * contentnode");
    }

    #[test]
    fn test_root_skip_matches_shorter_route() {
        let anchored = compile_route_anchored("root#child#node", "root").unwrap();
        let plain = compile_route("child#node").unwrap();
        assert!(anchored.anchored_at_root);
        assert_eq!(anchored.root_tag.as_deref(), Some("root"));
        assert_eq!(
            QuerySpec {
                anchored_at_root: false,
                root_tag: None,
                ..anchored
            },
            plain
        );
    }

    #[test]
    fn test_root_skip_keeps_single_segment() {
        let query = compile_route_anchored("root", "root").unwrap();
        assert_eq!(query.path, "root");
        assert!(!query.anchored_at_root);
        assert_eq!(query.root_tag, None);
    }

    #[test]
    fn test_root_skip_ignores_other_first_segment() {
        let query = compile_route_anchored("child#node", "root").unwrap();
        assert_eq!(query.path, "child node");
        assert!(!query.anchored_at_root);
    }

    #[test]
    fn test_attribute_only_changes_attribute_field() {
        let with_attr = compile_route("root#child#node[attr]").unwrap();
        let without = compile_route("root#child#node").unwrap();
        assert_eq!(with_attr.attribute.as_deref(), Some("attr"));
        assert_ne!(with_attr, without);
        assert_eq!(
            QuerySpec {
                attribute: None,
                ..with_attr
            },
            without
        );
    }

    #[test]
    fn test_empty_segments_are_rejected() {
        for route in ["", "root##node", "#root", "root#", "##"] {
            assert_invalid(route);
        }
    }

    #[test]
    fn test_attribute_outside_last_segment_is_rejected() {
        for route in ["root[id]#node", "root#child[x]#node[y]", "a]#b"] {
            assert_invalid(route);
        }
    }

    #[test]
    fn test_malformed_attribute_is_rejected() {
        for route in ["node[", "node[]", "node[attr", "node[attr]x", "[attr]"] {
            assert_invalid(route);
        }
    }

    #[test]
    fn test_invalid_route_message_names_input() {
        let err = compile_route("a##b").unwrap_err();
        assert!(err.to_string().contains("'a##b'"));
        assert!(err.is_route_error());
    }
}
