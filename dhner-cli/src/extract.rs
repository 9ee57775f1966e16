//! Subcomando `extract`: XML/HTML → texto puro, seguindo uma rota.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use dhner_core::{collect_text, parse_markup, MarkupKind, QuerySpec, Route};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::files::{collect_files, renamed};

pub struct ExtractOptions {
    pub root_dir: PathBuf,
    pub extension: String,
    pub output_dir: PathBuf,
    pub route: Route,
    pub root_tag: Option<String>,
}

/// Processa todos os arquivos do diretório. Arquivos já extraídos são pulados.
///
/// Retorna quantos arquivos foram escritos.
pub fn run(opts: &ExtractOptions) -> anyhow::Result<usize> {
    let query = opts.route.compile(opts.root_tag.as_deref());
    let kind = MarkupKind::from_extension(&opts.extension);
    debug!(
        "Rota '{}' compilada para '{}' ({:?})",
        opts.route.source,
        query.selector(),
        kind
    );

    let files = collect_files(&opts.root_dir, &opts.extension)
        .with_context(|| format!("Não foi possível ler '{}'", opts.root_dir.display()))?;

    let written = files
        .par_iter()
        .map(|path| extract_file(path, opts, &query, kind))
        .collect::<anyhow::Result<Vec<bool>>>()?;

    Ok(written.into_iter().filter(|w| *w).count())
}

fn extract_file(
    path: &Path,
    opts: &ExtractOptions,
    query: &QuerySpec,
    kind: MarkupKind,
) -> anyhow::Result<bool> {
    let target = opts.output_dir.join(renamed(path, &opts.extension, ".txt"));
    if target.exists() {
        debug!("'{}' já existe, pulando", target.display());
        return Ok(false);
    }

    info!("Processando '{}'", path.display());
    let source = fs::read_to_string(path)
        .with_context(|| format!("Erro ao ler '{}'", path.display()))?;

    let document = parse_markup(&source, kind)
        .with_context(|| format!("Erro ao interpretar '{}'", path.display()))?;
    let text = collect_text(&document, query).with_context(|| {
        format!("Arquivo '{}', rota '{}'", path.display(), query.route)
    })?;

    fs::write(&target, text)
        .with_context(|| format!("Não foi possível escrever '{}'", target.display()))?;
    Ok(true)
}
