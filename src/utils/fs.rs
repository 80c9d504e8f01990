//! 檔案系統輔助函式：整個檔案讀寫、遞迴複製、刪除。

use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 遞迴複製目錄，回傳複製的檔案數
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// 以新的副本取代目的地目錄。`backup` 為真時舊目錄移到 `<dst>.backup`。
pub fn replace_dir(src: &Path, dst: &Path, backup: bool) -> Result<usize> {
    if dst.exists() {
        if backup {
            let backup_path = backup_path_for(dst);
            remove_if_exists(&backup_path)?;
            fs::rename(dst, &backup_path)?;
            tracing::debug!("Moved {} to {}", dst.display(), backup_path.display());
        } else {
            remove_if_exists(dst)?;
        }
    }

    copy_dir_all(src, dst)
}

pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".backup");
    path.with_file_name(name)
}

/// 刪除檔案或目錄；不存在時回傳 false
pub fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path)?;
            Ok(true)
        }
        Ok(_) => {
            fs::remove_file(path)?;
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// 目錄第一層的檔案 (排序後)
pub fn top_level_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// 目錄第一層的子目錄 (排序後)
pub fn top_level_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// 遞迴列出所有檔案 (排序後)
pub fn files_recursive(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// 副檔名比對，`extensions` 形如 ".js"
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.') == ext)
}

pub fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
