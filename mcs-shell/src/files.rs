//! Multipart body assembly for add operations.
//!
//! The add endpoint expects the IPFS multipart shape: every part is named
//! `file`, directories are empty `application/x-directory` parts, symlinks
//! are `application/symlink` parts whose body is the target path, and part
//! filenames are slash-separated paths rooted at the add root.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use tokio::fs;

use mcs_core::error::{McsError, Result};
use mcs_core::{MIME_DIRECTORY, MIME_OCTET_STREAM, MIME_SYMLINK};

/// Wraps raw content as a single unnamed virtual file.
pub(crate) fn single_file_form(data: Vec<u8>) -> Result<Form> {
    Ok(Form::new().part("file", file_part(String::new(), data)?))
}

/// Wraps a symlink target path as a single unnamed virtual link. Only the
/// target string is transmitted; nothing is read from disk.
pub(crate) fn symlink_form(target: &str) -> Result<Form> {
    let part = Part::bytes(target.as_bytes().to_vec())
        .file_name(String::new())
        .mime_str(MIME_SYMLINK)
        .map_err(|e| McsError::Multipart(e.to_string()))?;
    Ok(Form::new().part("file", part))
}

/// Walks `root` breadth-first (parents before children, siblings sorted) and
/// encodes the whole tree, rooted at the directory's base name.
pub(crate) async fn directory_form(root: &Path) -> Result<Form> {
    let root_name = match root.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => ".".to_string(),
    };

    let mut form = Form::new().part("file", directory_part(root_name.clone())?);

    let mut pending: VecDeque<(PathBuf, String)> = VecDeque::new();
    pending.push_back((root.to_path_buf(), root_name));

    while let Some((dir, prefix)) = pending.pop_front() {
        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&dir).await?;
        while let Some(entry) = read_dir.next_entry().await? {
            entries.push(entry.path());
        }
        entries.sort();

        for path in entries {
            let file_name = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            let part_name = format!("{prefix}/{file_name}");
            let meta = fs::symlink_metadata(&path).await?;

            if meta.is_dir() {
                form = form.part("file", directory_part(part_name.clone())?);
                pending.push_back((path, part_name));
            } else if meta.file_type().is_symlink() {
                let target = fs::read_link(&path).await?;
                let target = target.to_string_lossy().into_owned();
                let part = Part::bytes(target.into_bytes())
                    .file_name(part_name)
                    .mime_str(MIME_SYMLINK)
                    .map_err(|e| McsError::Multipart(e.to_string()))?;
                form = form.part("file", part);
            } else {
                let data = fs::read(&path).await?;
                form = form.part("file", file_part(part_name, data)?);
            }
        }
    }

    Ok(form)
}

fn file_part(name: String, data: Vec<u8>) -> Result<Part> {
    Part::bytes(data)
        .file_name(name)
        .mime_str(MIME_OCTET_STREAM)
        .map_err(|e| McsError::Multipart(e.to_string()))
}

fn directory_part(name: String) -> Result<Part> {
    Part::bytes(Vec::new())
        .file_name(name)
        .mime_str(MIME_DIRECTORY)
        .map_err(|e| McsError::Multipart(e.to_string()))
}
