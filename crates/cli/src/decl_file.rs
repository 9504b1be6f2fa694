use anyhow::{Context, Result, bail};
use argbind::decl::ParserDecl;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DECL_NAME: &str = "argbind.json";

#[derive(Debug, Clone)]
pub struct LoadedDecl {
    pub path: PathBuf,
    pub decl: ParserDecl,
}

impl LoadedDecl {
    /// argv[0] handed to the declared parser.
    pub fn program_name(&self) -> String {
        if let Some(name) = &self.decl.name {
            return name.clone();
        }
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "argbind".to_string())
    }
}

pub fn load_decl(decl_path: &Path) -> Result<LoadedDecl> {
    let path = if decl_path.is_absolute() {
        decl_path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        cwd.join(decl_path)
    };

    if !path.exists() {
        bail!("declaration not found: {}", path.display());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read declaration: {}", path.display()))?;
    let decl: ParserDecl = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse declaration JSON: {}", path.display()))?;

    tracing::debug!(path = %path.display(), args = decl.args.len(), "loaded declaration");
    Ok(LoadedDecl { path, decl })
}
