//! # dhner — linha de comando do pipeline
//!
//! ```bash
//! # Texto puro a partir de XML, pegando o atributo CONTENT de cada <String>
//! dhner extract --dir corpus/ --ext xml --out txt/ --route-to-content 'string[content]'
//!
//! # Texto + saída do serviço de NER (.json) → .bio e .html
//! dhner bio --dir txt/ --out bio/ --html
//!
//! # Avaliação contra o Golden Standard
//! dhner evaluate --gold-dir gold/ --pred-dir bio/
//! ```
//!
//! Verbosidade controlada por `RUST_LOG` (padrão `info`).

mod bio;
mod evaluate;
mod extract;
mod files;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dhner_core::Route;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::files::{existing_dir, normalize_extension};

#[derive(Parser)]
#[command(name = "dhner")]
#[command(version)]
#[command(about = "Extrai texto de corpora XML/HTML, gera arquivos BIO e avalia predições")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extrai o conteúdo textual de arquivos XML ou HTML para arquivos .txt
    Extract {
        /// Diretório raiz dos arquivos de entrada (percorrido recursivamente)
        #[arg(long = "dir", value_parser = existing_dir)]
        root_dir: PathBuf,

        /// Extensão dos arquivos a incluir
        #[arg(long = "ext", default_value = ".xml", value_parser = parse_extension)]
        extension: String,

        /// Diretório de saída (precisa existir)
        #[arg(long = "out", value_parser = existing_dir)]
        output_dir: PathBuf,

        /// Rota até o nó com o conteúdo, ex: 'parent#*#text' ou 'tag[atributo]'.
        /// O atributo só é permitido no último elemento; elementos vazios não.
        #[arg(long = "route-to-content", alias = "route", value_parser = parse_route)]
        route: Route,

        /// Tag raiz dos documentos; se a rota começar por ela, o elemento é omitido
        #[arg(long)]
        root_tag: Option<String>,
    },

    /// Converte textos e entidades (.json do serviço de NER) em arquivos .bio
    Bio {
        /// Diretório com os textos e os .json de mesmo nome
        #[arg(long = "dir", value_parser = existing_dir)]
        root_dir: PathBuf,

        /// Extensão dos arquivos de texto
        #[arg(long = "ext", default_value = ".txt", value_parser = parse_extension)]
        extension: String,

        /// Diretório de saída (precisa existir)
        #[arg(long = "out", value_parser = existing_dir)]
        output_dir: PathBuf,

        /// Também gera uma versão .html com as entidades destacadas
        #[arg(long)]
        html: bool,
    },

    /// Avalia rótulos BIO preditos contra um Golden Standard (arquivos .bio de mesmo nome)
    Evaluate {
        /// Diretório do Golden Standard
        #[arg(long, value_parser = existing_dir)]
        gold_dir: PathBuf,

        /// Diretório das entidades preditas
        #[arg(long, value_parser = existing_dir)]
        pred_dir: PathBuf,
    },
}

fn parse_extension(input: &str) -> Result<String, String> {
    Ok(normalize_extension(input))
}

fn parse_route(input: &str) -> Result<Route, String> {
    Route::parse(input).map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Extract {
            root_dir,
            extension,
            output_dir,
            route,
            root_tag,
        } => {
            let opts = extract::ExtractOptions {
                root_dir,
                extension,
                output_dir,
                route,
                root_tag,
            };
            let written = extract::run(&opts)?;
            info!("{} arquivo(s) extraído(s)", written);
        }
        Commands::Bio {
            root_dir,
            extension,
            output_dir,
            html,
        } => {
            let opts = bio::BioOptions {
                root_dir,
                extension,
                output_dir,
                html,
            };
            let converted = bio::run(&opts)?;
            info!("{} arquivo(s) convertido(s) para BIO", converted);
        }
        Commands::Evaluate { gold_dir, pred_dir } => {
            let summary = evaluate::run(&evaluate::EvaluateOptions { gold_dir, pred_dir })?;
            println!("{}", summary);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_invalid_route_rejected_at_parse_time() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let result = Cli::try_parse_from([
            "dhner", "extract", "--dir", dir, "--out", dir, "--route-to-content", "a##b",
        ]);
        let err = result.err().unwrap();
        assert!(err.to_string().contains("elementos vazios"));
    }

    #[test]
    fn test_extension_is_normalized() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "dhner", "extract", "--dir", dir, "--ext", "html", "--out", dir, "--route", "p",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract { extension, route, .. } => {
                assert_eq!(extension, ".html");
                assert_eq!(route.segments, vec!["p".to_string()]);
            }
            _ => panic!("esperava o subcomando extract"),
        }
    }
}
