//! # Conversão de Entidades para Tags BIO
//!
//! Recebe o texto bruto e as entidades (tipo, forma de superfície e posição)
//! e produz uma tag BIO por token, alinhada à tokenização por espaços.
//!
//! ## Categorias
//!
//! | Código | Tipo no serviço NER | Exemplos                 |
//! |--------|---------------------|--------------------------|
//! | LOC    | LOCATION            | Amsterdam, Italië        |
//! | PER    | PERSON              | Rembrandt van Rijn       |
//! | ORG    | ORGANIZATION        | Rijksmuseum              |
//! | OTH    | qualquer outro      | Tweede Wereldoorlog      |
//!
//! ## Esquema BIO
//!
//! - `B-TAG`: primeiro token de uma entidade
//! - `I-TAG`: tokens subsequentes da mesma entidade
//! - `O`: fora de qualquer entidade
//!
//! ## Algoritmo
//!
//! Cada token e cada entidade ocupam um intervalo de caracteres. As entidades
//! são consumidas em ordem: um token que intersecta o intervalo da entidade
//! corrente recebe `B-` (se for o primeiro) ou `I-`; quando o token alcança o
//! fim do intervalo, passa-se à próxima entidade.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityType};
use crate::tokenizer::tokenize;

/// Código de três letras usado nas tags BIO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityCategory {
    Loc,
    Per,
    Org,
    Oth,
}

impl EntityCategory {
    /// Nome da categoria como string (para serialização e relatórios)
    pub fn name(&self) -> &'static str {
        match self {
            EntityCategory::Loc => "LOC",
            EntityCategory::Per => "PER",
            EntityCategory::Org => "ORG",
            EntityCategory::Oth => "OTH",
        }
    }

    /// Cor CSS para highlight no HTML exportado
    pub fn color(&self) -> &'static str {
        match self {
            EntityCategory::Per => "#3b82f6",
            EntityCategory::Org => "#10b981",
            EntityCategory::Loc => "#f59e0b",
            EntityCategory::Oth => "#8b5cf6",
        }
    }

    /// Tenta parsear a partir de string (ex: "PER" → Some(Per)).
    ///
    /// Aceita também "OTHER", usado em arquivos `.bio` antigos.
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "LOC" => Some(EntityCategory::Loc),
            "PER" => Some(EntityCategory::Per),
            "ORG" => Some(EntityCategory::Org),
            "OTH" | "OTHER" => Some(EntityCategory::Oth),
            _ => None,
        }
    }
}

impl From<EntityType> for EntityCategory {
    fn from(t: EntityType) -> Self {
        match t {
            EntityType::Location => EntityCategory::Loc,
            EntityType::Person => EntityCategory::Per,
            EntityType::Organization => EntityCategory::Org,
            EntityType::Other => EntityCategory::Oth,
        }
    }
}

/// Tag BIO aplicada a um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: início de uma entidade. Ex: **TWO** (B-LOC) WORDS.
    Begin(EntityCategory),
    /// **Inside**: continuação de uma entidade. Ex: TWO **WORDS** (I-LOC).
    Inside(EntityCategory),
    /// **Outside**: o token não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Representação textual da tag (ex: "B-PER", "I-ORG", "O")
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(cat) => format!("B-{}", cat.name()),
            Tag::Inside(cat) => format!("I-{}", cat.name()),
            Tag::Outside => "O".to_string(),
        }
    }

    /// Retorna a categoria desta tag (se for B- ou I-)
    pub fn category(&self) -> Option<EntityCategory> {
        match self {
            Tag::Begin(c) | Tag::Inside(c) => Some(*c),
            Tag::Outside => None,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-PER" → Begin(Per))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(Tag::Outside);
        }
        let (prefix, code) = s.split_once('-')?;
        let cat = EntityCategory::from_code(code)?;
        match prefix {
            "B" => Some(Tag::Begin(cat)),
            "I" => Some(Tag::Inside(cat)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Um token com sua tag BIO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BioToken {
    pub token: String,
    pub tag: Tag,
}

/// Formato de linha dos arquivos `.bio`: `"<token> <tag>"`.
impl std::fmt::Display for BioToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.token, self.tag)
    }
}

/// Converte texto + entidades ordenadas em uma sequência de tokens BIO.
///
/// Entidades sobrepostas ou cuja forma de superfície não está na posição
/// indicada produzem tags indefinidas (não há validação).
pub fn tag(text: &str, entities: &[Entity]) -> Vec<BioToken> {
    let ranges: Vec<(usize, usize, EntityCategory)> = entities
        .iter()
        .map(|e| {
            let (start, end) = e.char_range();
            (start, end, EntityCategory::from(e.entity_type))
        })
        .collect();

    let mut current = 0;
    let mut inside = false;
    let mut tagged = Vec::new();

    for token in tokenize(text) {
        // Pula entidades que terminaram antes deste token
        while current < ranges.len() && ranges[current].1 <= token.start {
            current += 1;
            inside = false;
        }

        let tag = match ranges.get(current) {
            Some(&(start, end, cat)) if token.start < end && token.end > start => {
                let tag = if inside { Tag::Inside(cat) } else { Tag::Begin(cat) };
                inside = true;
                if token.end >= end {
                    current += 1;
                    inside = false;
                }
                tag
            }
            _ => Tag::Outside,
        };

        tagged.push(BioToken {
            token: token.text,
            tag,
        });
    }

    tagged
}

/// Serializa tokens BIO no formato de arquivo `.bio` (uma linha por token).
pub fn to_bio_lines(tokens: &[BioToken]) -> String {
    let mut out = String::new();
    for token in tokens {
        out.push_str(&token.to_string());
        out.push('\n');
    }
    out
}
