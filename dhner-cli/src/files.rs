//! Utilitários de sistema de arquivos compartilhados pelos subcomandos.

use std::path::{Path, PathBuf};

use anyhow::Context;

/// Garante que a extensão começa com `.` (ex: "xml" → ".xml").
pub fn normalize_extension(input: &str) -> String {
    if input.starts_with('.') {
        input.to_string()
    } else {
        format!(".{}", input)
    }
}

/// Validador do clap: o caminho precisa ser um diretório existente.
pub fn existing_dir(input: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(input);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("O caminho '{}' não é um diretório", input))
    }
}

/// Arquivos que casam com `<dir>/<subpath>*<extension>`, ordenados por caminho.
fn glob_files(dir: &Path, subpath: &str, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    let dir = dir
        .to_str()
        .with_context(|| format!("Caminho não é UTF-8: '{}'", dir.display()))?;
    let pattern = format!(
        "{}/{}*{}",
        glob::Pattern::escape(dir.trim_end_matches('/')),
        subpath,
        glob::Pattern::escape(extension)
    );

    let mut found = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Lista recursivamente os arquivos terminados em `extension`, ordenados por caminho.
pub fn collect_files(root: &Path, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    glob_files(root, "**/", extension)
}

/// Como [`collect_files`], mas sem descer em subdiretórios.
pub fn list_files(dir: &Path, extension: &str) -> anyhow::Result<Vec<PathBuf>> {
    glob_files(dir, "", extension)
}

/// Nome do arquivo sem a extensão de entrada (ex: "doc.xml", ".xml" → "doc").
pub fn stem(path: &Path, extension: &str) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(extension) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

/// Troca a extensão de entrada por `new_extension` (ex: "doc.xml" → "doc.txt").
pub fn renamed(path: &Path, extension: &str, new_extension: &str) -> String {
    format!("{}{}", stem(path, extension), new_extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("xml"), ".xml");
        assert_eq!(normalize_extension(".bio"), ".bio");
    }

    #[test]
    fn test_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(existing_dir(tmp.path().to_str().unwrap()).is_ok());
        let missing = tmp.path().join("missing");
        assert!(existing_dir(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_collect_files_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("one.xml"), "").unwrap();
        fs::write(nested.join("two.xml"), "").unwrap();
        fs::write(nested.join("skip.txt"), "").unwrap();

        let files = collect_files(tmp.path(), ".xml").unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().unwrap() == "xml"));

        let flat = list_files(tmp.path(), ".xml").unwrap();
        assert_eq!(flat, vec![tmp.path().join("one.xml")]);
    }

    #[test]
    fn test_glob_metacharacters_in_path_are_literal() {
        let tmp = tempfile::tempdir().unwrap();
        let odd = tmp.path().join("corpus [1]");
        fs::create_dir_all(odd.join("sub")).unwrap();
        fs::write(odd.join("sub").join("page.xml"), "").unwrap();

        let files = collect_files(&odd, ".xml").unwrap();
        assert_eq!(files, vec![odd.join("sub").join("page.xml")]);
    }

    #[test]
    fn test_renamed() {
        let path = Path::new("/corpus/page.01.xml");
        assert_eq!(stem(path, ".xml"), "page.01");
        assert_eq!(renamed(path, ".xml", ".txt"), "page.01.txt");
    }
}
