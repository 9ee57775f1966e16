//! # dhner-core — Texto, Entidades e Tags BIO para Corpora Históricos
//!
//! Núcleo de um pipeline de humanidades digitais que trabalha arquivo a
//! arquivo sobre um diretório:
//!
//! 1.  **Extração de texto** ([`route`], [`markup`]): uma *rota* como
//!     `root#child#contentnode[content]` é compilada em um seletor e
//!     executada sobre o XML ([`xml`]) ou HTML de entrada, produzindo texto puro.
//! 2.  **Entidades** ([`entity`]): leitura da saída do serviço de NER
//!     (tipo, forma de superfície e posição de cada entidade).
//! 3.  **Conversão BIO** ([`tagger`]): entidades → uma tag por token
//!     ([`tokenizer`] divide o texto por espaços).
//! 4.  **Exportação** ([`html`]): texto com as entidades destacadas.
//! 5.  **Avaliação** ([`report`]): rótulos preditos vs. Golden Standard.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use dhner_core::{compile_route, tag, Entity, EntityType};
//!
//! let query = compile_route("root#child#contentnode[content]").unwrap();
//! assert_eq!(query.selector(), "root child contentnode[content]");
//!
//! let entities = [Entity::new(EntityType::Location, "Entity", 22)];
//! let bio = tag("Simple line with one Entity", &entities);
//! assert_eq!(bio[4].to_string(), "Entity B-LOC");
//! ```

pub mod entity;
pub mod error;
pub mod html;
pub mod markup;
pub mod report;
pub mod route;
pub mod tagger;
pub mod tokenizer;
pub mod xml;

pub use entity::{parse_entities, Entity, EntityType};
pub use error::{Error, Result};
pub use markup::{collect_text, extract, parse_markup, select, Document, MarkupKind, Node};
pub use route::{compile_route, compile_route_anchored, QuerySpec, Route};
pub use tagger::{tag, BioToken, EntityCategory, Tag};
pub use tokenizer::Token;
