//! # Erros do dhner-core
//!
//! Todos os erros são locais e fatais: indicam uma rota mal especificada,
//! um arquivo de entrada inconsistente ou uma falha de E/S. Nenhum é repetido.

/// Alias de `Result` usado em todo o crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A rota não respeita a gramática `tag#tag#tag[attr]`.
    #[error("route_to_content '{route}' {reason}")]
    InvalidRoute { route: String, reason: String },

    /// O motor de seletores rejeitou a consulta compilada.
    ///
    /// A mensagem é propositalmente genérica: o texto de erro da biblioteca
    /// de seletores não é exposto ao usuário.
    #[error("A rota '{route}' contém sintaxe inválida. Revise-a e tente novamente.")]
    QuerySyntax { route: String },

    /// Um nó selecionado não possui o atributo pedido pela rota.
    #[error("O elemento <{element}> não possui o atributo '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    /// Arquivos gold e predito com quantidades diferentes de tokens.
    #[error("Quantidade de rótulos diferente: gold={gold}, predito={pred}")]
    LabelCountMismatch { gold: usize, pred: usize },

    #[error("Erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro ao renderizar template: {0}")]
    Template(#[from] askama::Error),
}

impl Error {
    pub(crate) fn invalid_route(route: &str, reason: impl Into<String>) -> Self {
        Error::InvalidRoute {
            route: route.to_string(),
            reason: reason.into(),
        }
    }

    /// Erros de configuração de rota (devem interromper toda a execução).
    pub fn is_route_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidRoute { .. } | Error::QuerySyntax { .. } | Error::MissingAttribute { .. }
        )
    }
}
