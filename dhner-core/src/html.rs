//! # Exportação HTML
//!
//! Gera uma página com o texto original e as entidades destacadas, uma cor
//! por categoria, seguida de uma tabela com todas as entidades.

use askama::Template;

use crate::entity::Entity;
use crate::error::Result;
use crate::tagger::EntityCategory;

/// Trecho contínuo do texto: comum (`label` vazio) ou uma entidade.
struct Fragment {
    text: String,
    label: &'static str,
    color: &'static str,
}

struct EntityRow {
    offset: usize,
    entity_type: &'static str,
    text: String,
}

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate<'a> {
    title: &'a str,
    fragments: Vec<Fragment>,
    rows: Vec<EntityRow>,
}

/// Renderiza o texto com as entidades destacadas.
///
/// Quebras de linha viram espaços. Entidades fora do texto ou que se
/// sobrepõem a uma anterior não são destacadas (continuam na tabela).
pub fn render_annotated(title: &str, text: &str, entities: &[Entity]) -> Result<String> {
    let template = ResultsTemplate {
        title,
        fragments: split_fragments(text, entities),
        rows: entities
            .iter()
            .map(|e| EntityRow {
                offset: e.offset,
                entity_type: e.entity_type.name(),
                text: e.text.clone(),
            })
            .collect(),
    };
    Ok(template.render()?)
}

fn split_fragments(text: &str, entities: &[Entity]) -> Vec<Fragment> {
    let chars: Vec<char> = text
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    let slice = |start: usize, end: usize| chars[start..end].iter().collect::<String>();

    let mut fragments = Vec::new();
    let mut cursor = 0;

    for entity in entities {
        let (start, end) = entity.char_range();
        if start < cursor || end > chars.len() || start == end {
            continue;
        }
        if start > cursor {
            fragments.push(Fragment {
                text: slice(cursor, start),
                label: "",
                color: "",
            });
        }
        let category = EntityCategory::from(entity.entity_type);
        fragments.push(Fragment {
            text: slice(start, end),
            label: category.name(),
            color: category.color(),
        });
        cursor = end;
    }

    if cursor < chars.len() {
        fragments.push(Fragment {
            text: slice(cursor, chars.len()),
            label: "",
            color: "",
        });
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;

    #[test]
    fn test_split_fragments() {
        let entities = [
            Entity::new(EntityType::Location, "Entity", 22),
            Entity::new(EntityType::Person, "ANOTHER ONE", 47),
        ];
        let text = "Simple line with one Entity in the middle and ANOTHER ONE much further on.";
        let fragments = split_fragments(text, &entities);
        let texts: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Simple line with one ",
                "Entity",
                " in the middle and ",
                "ANOTHER ONE",
                " much further on.",
            ]
        );
        assert_eq!(fragments[1].label, "LOC");
        assert_eq!(fragments[3].label, "PER");
    }

    #[test]
    fn test_out_of_range_entity_is_skipped() {
        let entities = [Entity::new(EntityType::Location, "Nowhere", 40)];
        let fragments = split_fragments("short\ntext", &entities);
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].text, "short text");
    }

    #[test]
    fn test_render_escapes_and_highlights() {
        let entities = [Entity::new(EntityType::Organization, "Rijksmuseum", 5)];
        let html = render_annotated("demo", "<b> Rijksmuseum", &entities).unwrap();
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("Rijksmuseum<sup>ORG</sup></mark>"));
        assert!(html.contains("<td>ORGANIZATION</td>"));
    }
}
