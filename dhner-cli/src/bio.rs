//! Subcomando `bio`: texto + entidades do serviço de NER → arquivos `.bio` (e `.html`).
//!
//! Para cada `<nome><ext>` do diretório espera-se um `<nome>.json` ao lado,
//! com a saída do serviço de NER para aquele texto.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use dhner_core::html::render_annotated;
use dhner_core::tagger::to_bio_lines;
use dhner_core::{parse_entities, tag};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::files::{collect_files, renamed, stem};

pub struct BioOptions {
    pub root_dir: PathBuf,
    pub extension: String,
    pub output_dir: PathBuf,
    pub html: bool,
}

/// Retorna quantos textos foram convertidos.
pub fn run(opts: &BioOptions) -> anyhow::Result<usize> {
    let files = collect_files(&opts.root_dir, &opts.extension)
        .with_context(|| format!("Não foi possível ler '{}'", opts.root_dir.display()))?;

    let converted = files
        .par_iter()
        .map(|path| convert_file(path, opts))
        .collect::<anyhow::Result<Vec<bool>>>()?;

    Ok(converted.into_iter().filter(|c| *c).count())
}

fn convert_file(path: &Path, opts: &BioOptions) -> anyhow::Result<bool> {
    let json_path = path.with_file_name(renamed(path, &opts.extension, ".json"));
    if !json_path.exists() {
        warn!("Sem entidades para '{}' (esperava '{}')", path.display(), json_path.display());
        return Ok(false);
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Erro ao ler '{}'", path.display()))?;
    let json = fs::read_to_string(&json_path)
        .with_context(|| format!("Erro ao ler '{}'", json_path.display()))?;
    let entities = parse_entities(&json)
        .with_context(|| format!("Entidades inválidas em '{}'", json_path.display()))?;

    let bio = tag(&text, &entities);
    let bio_path = opts.output_dir.join(renamed(path, &opts.extension, ".bio"));
    fs::write(&bio_path, to_bio_lines(&bio))
        .with_context(|| format!("Não foi possível escrever '{}'", bio_path.display()))?;

    if opts.html {
        let title = stem(path, &opts.extension);
        let page = render_annotated(&title, &text, &entities)?;
        let html_path = opts.output_dir.join(format!("{}.html", title));
        fs::write(&html_path, page)
            .with_context(|| format!("Não foi possível escrever '{}'", html_path.display()))?;
    }

    info!("'{}': {} tokens, {} entidades", path.display(), bio.len(), entities.len());
    Ok(true)
}
