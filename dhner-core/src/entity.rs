//! # Entidades vindas do serviço de NER
//!
//! O serviço multi-NER devolve, para cada texto, uma lista de entidades como:
//!
//! ```json
//! { "type": "LOCATION", "pos": 22, "ne": "Entity", "left_context": "with one", ... }
//! ```
//!
//! Só `type`, `ne` (forma de superfície) e `pos` (posição) interessam aqui;
//! os demais campos são ignorados. `pos` é a posição **1-based** do primeiro
//! caractere da entidade no texto.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tipo de entidade reportado pelo serviço.
///
/// Qualquer string desconhecida vira [`EntityType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Location,
    Person,
    Organization,
    Other,
}

impl EntityType {
    /// Nome usado pelo serviço de NER (ex: "LOCATION").
    pub fn name(&self) -> &'static str {
        match self {
            EntityType::Location => "LOCATION",
            EntityType::Person => "PERSON",
            EntityType::Organization => "ORGANIZATION",
            EntityType::Other => "OTHER",
        }
    }

    pub fn from_name(s: &str) -> Self {
        match s {
            "LOCATION" => EntityType::Location,
            "PERSON" => EntityType::Person,
            "ORGANIZATION" => EntityType::Organization,
            _ => EntityType::Other,
        }
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        EntityType::from_name(&s)
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.name().to_string()
    }
}

/// Uma entidade nomeada com sua posição no texto de origem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Forma de superfície (pode ter várias palavras).
    #[serde(rename = "ne", alias = "text")]
    pub text: String,
    /// Posição 1-based do primeiro caractere.
    #[serde(rename = "pos", alias = "offset")]
    pub offset: usize,
}

impl Entity {
    pub fn new(entity_type: EntityType, text: impl Into<String>, offset: usize) -> Self {
        Self {
            entity_type,
            text: text.into(),
            offset,
        }
    }

    /// Intervalo `[início, fim)` em caracteres (0-based) coberto pela entidade.
    pub fn char_range(&self) -> (usize, usize) {
        let start = self.offset.saturating_sub(1);
        (start, start + self.text.chars().count())
    }
}

#[derive(Deserialize)]
struct EntitySection {
    entities: Vec<Entity>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NerOutput {
    Plain(Vec<Entity>),
    Response { text: EntitySection },
}

/// Lê as entidades de um JSON do serviço de NER.
///
/// Aceita tanto uma lista simples quanto a resposta completa do serviço
/// (`{ "text": { "entities": [...] } }`). As entidades são ordenadas por posição.
pub fn parse_entities(json: &str) -> Result<Vec<Entity>> {
    let mut entities = match serde_json::from_str::<NerOutput>(json)? {
        NerOutput::Plain(entities) => entities,
        NerOutput::Response { text } => text.entities,
    };
    entities.sort_by_key(|e| e.offset);
    Ok(entities)
}
