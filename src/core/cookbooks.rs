//! Cookbook catalogue and PDF loading

use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cookbook {
    pub id: &'static str,
    pub file_name: &'static str,
}

pub const CATALOGUE: [Cookbook; 3] = [
    Cookbook {
        id: "executive-physique",
        file_name: "execute-physique.pdf",
    },
    Cookbook {
        id: "lo-carb-hi-results",
        file_name: "lo-carb-hi-results.pdf",
    },
    Cookbook {
        id: "vegan-exec",
        file_name: "vegan-exec.pdf",
    },
];

#[derive(Debug, Error)]
pub enum CookbookError {
    #[error("Cookbook not found")]
    UnknownCookbook,

    #[error("File not found")]
    MissingFile,

    #[error("Download failed: {0}")]
    Read(#[source] std::io::Error),
}

#[derive(Debug)]
pub struct CookbookFile {
    /// Name offered to the browser in `Content-Disposition`.
    pub download_name: String,
    pub bytes: Vec<u8>,
}

pub fn find(id: &str) -> Option<&'static Cookbook> {
    CATALOGUE.iter().find(|cookbook| cookbook.id == id)
}

impl Cookbook {
    /// `lo-carb-hi-results.pdf` becomes `lo carb hi results - ExecFit.pdf`.
    pub fn download_name(&self) -> String {
        let name = self.file_name.replace('-', " ");
        match name.strip_suffix(".pdf") {
            Some(stem) => format!("{stem} - ExecFit.pdf"),
            None => name,
        }
    }
}

pub async fn load(dir: &Path, id: &str) -> Result<CookbookFile, CookbookError> {
    let cookbook = find(id).ok_or(CookbookError::UnknownCookbook)?;

    let bytes = tokio::fs::read(dir.join(cookbook.file_name))
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => CookbookError::MissingFile,
            _ => CookbookError::Read(e),
        })?;

    Ok(CookbookFile {
        download_name: cookbook.download_name(),
        bytes,
    })
}
