//! Subcomando `evaluate`: compara `.bio` preditos com o Golden Standard.
//!
//! Os arquivos preditos e os do Golden Standard precisam ter o mesmo nome.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use dhner_core::report::{average_reports, extract_labels, render_summary, ClassificationReport};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::files::list_files;

pub const BIO_EXTENSION: &str = ".bio";

pub struct EvaluateOptions {
    pub gold_dir: PathBuf,
    pub pred_dir: PathBuf,
}

/// Calcula um relatório por par de arquivos encontrado.
pub fn evaluate_dirs(opts: &EvaluateOptions) -> anyhow::Result<Vec<ClassificationReport>> {
    let predicted = list_files(&opts.pred_dir, BIO_EXTENSION)
        .with_context(|| format!("Não foi possível ler '{}'", opts.pred_dir.display()))?;

    let pairs: Vec<(PathBuf, PathBuf)> = predicted
        .into_iter()
        .filter_map(|pred| {
            let gold = opts.gold_dir.join(pred.file_name()?);
            if gold.exists() {
                Some((gold, pred))
            } else {
                debug!("Sem Golden Standard para '{}'", pred.display());
                None
            }
        })
        .collect();

    pairs
        .par_iter()
        .map(|(gold, pred)| evaluate_file(gold, pred))
        .collect()
}

fn evaluate_file(gold: &Path, pred: &Path) -> anyhow::Result<ClassificationReport> {
    let read = |path: &Path| {
        fs::read_to_string(path).with_context(|| format!("Erro ao ler '{}'", path.display()))
    };
    let gold_labels = extract_labels(&read(gold)?);
    let pred_labels = extract_labels(&read(pred)?);

    ClassificationReport::compute(&gold_labels, &pred_labels)
        .with_context(|| format!("Avaliando '{}'", pred.display()))
}

/// Avalia os diretórios e devolve a tabela de médias por rótulo.
pub fn run(opts: &EvaluateOptions) -> anyhow::Result<String> {
    let reports = evaluate_dirs(opts)?;
    if reports.is_empty() {
        warn!(
            "Nenhum par de arquivos '{}' encontrado entre '{}' e '{}'",
            BIO_EXTENSION,
            opts.pred_dir.display(),
            opts.gold_dir.display()
        );
    }
    Ok(render_summary(&average_reports(&reports)))
}
