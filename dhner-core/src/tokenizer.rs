//! # Tokenizador por Espaços
//!
//! Divide o texto em tokens separados por espaço em branco, sem remover
//! pontuação nem normalizar nada: `"on."` continua sendo um token.
//! É a mesma segmentação usada nos arquivos `.bio`.
//!
//! Cada token guarda sua posição original em **caracteres** (não bytes),
//! pois as posições das entidades vindas do serviço de NER são contadas
//! em caracteres.

use serde::{Deserialize, Serialize};

/// Um token extraído do texto original.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Amsterdam", "on.").
    pub text: String,
    /// Índice de caractere inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de caractere final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Tokeniza um texto por espaços em branco.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current_text = String::new();
    let mut current_start = 0;

    for (char_pos, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            flush_token(&mut tokens, &mut current_text, current_start, char_pos);
        } else {
            if current_text.is_empty() {
                current_start = char_pos;
            }
            current_text.push(ch);
        }
    }

    let end = current_start + current_text.chars().count();
    flush_token(&mut tokens, &mut current_text, current_start, end);

    tokens
}

/// Fecha o token acumulado e adiciona à lista (se não vazio)
fn flush_token(tokens: &mut Vec<Token>, text: &mut String, start: usize, end: usize) {
    if !text.is_empty() {
        tokens.push(Token {
            text: text.clone(),
            start,
            end,
            index: tokens.len(),
        });
        text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("Simple line with one Entity");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Simple", "line", "with", "one", "Entity"]);
        assert_eq!((tokens[4].start, tokens[4].end), (21, 27));
        assert_eq!(tokens[4].index, 4);
    }

    #[test]
    fn test_punctuation_is_kept() {
        let tokens = tokenize("much further on.");
        assert_eq!(tokens[2].text, "on.");
    }

    #[test]
    fn test_multiple_whitespace_and_newlines() {
        let tokens = tokenize("  a \n\t b  ");
        assert_eq!(tokens.len(), 2);
        assert_eq!((tokens[0].start, tokens[0].end), (2, 3));
        assert_eq!((tokens[1].start, tokens[1].end), (7, 8));
    }

    #[test]
    fn test_offsets_count_characters() {
        let tokens = tokenize("Itália é bela");
        assert_eq!((tokens[1].start, tokens[1].end), (7, 8));
        assert_eq!((tokens[2].start, tokens[2].end), (9, 13));
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }
}
