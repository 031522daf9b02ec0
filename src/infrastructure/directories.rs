use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: Option<PathBuf>,
    /// Only present when raw result pages are being saved.
    pub debug_dir: Option<PathBuf>,
}

pub fn ensure_directories(cfg: &DirectoryConfig, debug: bool) -> Result<ResolvedPaths> {
    let logs_dir = cfg.logs_dir.as_deref().map(ensure_dir).transpose()?;

    let debug_dir = if debug {
        let dir = ensure_dir(&cfg.debug_dir)?;
        let check_file = dir.join(".write-test");
        fs::write(&check_file, b"ok")
            .with_context(|| format!("debug directory {} is not writable", dir.display()))?;
        fs::remove_file(&check_file)?;
        Some(dir)
    } else {
        None
    };

    Ok(ResolvedPaths {
        logs_dir,
        debug_dir,
    })
}

fn ensure_dir(path: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(path);
    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("failed to create directory {}", path))?;
    }
    Ok(dir.canonicalize().unwrap_or(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_dir_is_only_created_when_requested() {
        let root = tempfile::tempdir().unwrap();
        let cfg = DirectoryConfig {
            logs_dir: None,
            debug_dir: root.path().join("pages").to_string_lossy().into_owned(),
        };

        let paths = ensure_directories(&cfg, false).unwrap();
        assert!(paths.debug_dir.is_none());
        assert!(!root.path().join("pages").exists());

        let paths = ensure_directories(&cfg, true).unwrap();
        assert!(paths.debug_dir.unwrap().is_dir());
        assert!(paths.logs_dir.is_none());
    }
}
