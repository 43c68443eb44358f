//! File and download operations.
//!
//! These run directly on the worker thread - blocking disk and network work
//! has no business on the UI thread, and the dispatch queue is the right
//! place to serialize it. Destructive operations (`delete_files`,
//! `drop_folder`) are confined to the bridge's downloads directory by a
//! lexical containment check; `read_file` may read anywhere but refuses
//! files of 1 MiB or more.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::{Value, json};
use webdock_protocol::Params;

use super::{required_str, success};
use crate::dispatcher::OpContext;
use crate::error::{Error, Result};

const MAX_READ_BYTES: u64 = 1024 * 1024;

/// Distinguishes concurrent downloads that land within the same millisecond.
static DOWNLOAD_SEQ: AtomicU64 = AtomicU64::new(0);

pub(super) fn read_file(params: &Params) -> Result<String> {
    let path = required_str(params, 2, "path")?;

    let metadata = fs::metadata(&path)?;
    if metadata.len() >= MAX_READ_BYTES {
        return Err(Error::FileTooLarge);
    }

    let contents = fs::read_to_string(&path)?;
    Ok(json!({ "contents": contents }).to_string())
}

/// Deletes a batch of files under the downloads directory.
///
/// `param2` is a JSON-string array of `{"path": "..."}` entries, each path
/// relative to the downloads directory. Failures are per-entry; the reply
/// carries both lists.
pub(super) fn delete_files(ctx: &OpContext, params: &Params) -> Result<String> {
    let raw = required_str(params, 2, "entries")?;
    let entries: Vec<Value> =
        serde_json::from_str(&raw).map_err(|_| Error::InvalidParams("entries"))?;

    let mut deleted = Vec::new();
    let mut errors = Vec::new();
    for entry in &entries {
        let Some(path) = entry.get("path").and_then(Value::as_str) else {
            errors.push(json!({ "path": entry, "error": "missing 'path'" }));
            continue;
        };
        match resolve_in(&ctx.downloads_dir, path).and_then(|p| Ok(fs::remove_file(p)?)) {
            Ok(()) => deleted.push(json!(path)),
            Err(e) => errors.push(json!({ "path": path, "error": e.to_string() })),
        }
    }

    Ok(json!({ "success": deleted, "errors": errors }).to_string())
}

pub(super) fn drop_folder(ctx: &OpContext, params: &Params) -> Result<String> {
    let path = required_str(params, 2, "path")?;
    let resolved = resolve_in(&ctx.downloads_dir, &path)?;
    fs::remove_dir_all(resolved)?;
    Ok(success())
}

/// Lists the downloads directory, one absolute path per entry. A missing
/// directory is an empty listing, not an error.
pub(super) fn query_downloads_folder(ctx: &OpContext) -> Result<String> {
    let mut paths = Vec::new();
    match fs::read_dir(&ctx.downloads_dir) {
        Ok(dir) => {
            for entry in dir {
                paths.push(json!(entry?.path().to_string_lossy()));
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(Value::Array(paths).to_string())
}

/// Fetches a zip archive over HTTP and unpacks it into a fresh subdirectory
/// of the downloads directory. Replies with the extracted file paths; the
/// archive itself is removed afterwards.
pub(super) fn download_zip(ctx: &OpContext, params: &Params) -> Result<String> {
    let url = required_str(params, 2, "url")?;

    let response = reqwest::blocking::get(&url).map_err(|e| Error::Download(e.to_string()))?;
    if !response.status().is_success() {
        return Err(Error::Download(format!("status {}", response.status())));
    }
    let body = response
        .bytes()
        .map_err(|e| Error::Download(e.to_string()))?;

    let target = unique_download_dir(&ctx.downloads_dir);
    fs::create_dir_all(&target)?;
    let archive_path = target.join("archive.zip");
    fs::write(&archive_path, &body)?;

    let extracted = extract_zip(&archive_path, &target)?;
    fs::remove_file(&archive_path)?;

    let listing: Vec<Value> = extracted
        .iter()
        .map(|p| json!({ "path": p.to_string_lossy() }))
        .collect();
    Ok(Value::Array(listing).to_string())
}

fn unique_download_dir(base: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let seq = DOWNLOAD_SEQ.fetch_add(1, Ordering::Relaxed);
    base.join(format!("{millis}-{seq}"))
}

fn extract_zip(archive_path: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let mut archive = zip::ZipArchive::new(fs::File::open(archive_path)?)?;

    let mut extracted = Vec::new();
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        // Entries with unsafe names ("../", absolute paths) are skipped.
        let Some(relative) = file.enclosed_name() else {
            tracing::warn!(name = %file.name(), "skipping unsafe zip entry");
            continue;
        };
        let out_path = target.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&out_path)?;
        std::io::copy(&mut file, &mut out)?;
        extracted.push(out_path);
    }
    Ok(extracted)
}

/// Lexically resolves `relative` inside `base`, refusing anything that would
/// land on or outside `base` itself. Purely textual: no symlink traversal,
/// no filesystem access.
fn resolve_in(base: &Path, relative: &str) -> Result<PathBuf> {
    let outside = || Error::PathOutsideDownloads(relative.to_string());

    let mut resolved = base.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() || !resolved.starts_with(base) {
                    return Err(outside());
                }
            }
            Component::RootDir | Component::Prefix(_) => return Err(outside()),
        }
    }
    if resolved == base {
        return Err(outside());
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::frontend::{Frontend, Geometry, PanelInfo};
    use webdock_runtime::main_executor;

    struct NoFrontend;

    impl Frontend for NoFrontend {
        fn panels(&self) -> Vec<PanelInfo> {
            unreachable!()
        }
        fn create_browser_panel(&self, _: &str, _: &str, _: &str) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn set_panel_url(&self, _: &str, _: &str) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn execute_javascript(&self, _: &str, _: &str) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn set_panel_area(&self, _: &str, _: i32, _: i32, _: i32) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn resize_panel(&self, _: &str, _: i32, _: i32) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn set_panel_title(&self, _: &str, _: &str) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn set_panel_visible(&self, _: &str, _: bool) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn destroy_panel(&self, _: &str) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn main_window_geometry(&self) -> Geometry {
            unreachable!()
        }
        fn set_user_input_enabled(&self, _: bool) {}
        fn create_source(
            &self,
            _: &str,
            _: &str,
            _: Value,
            _: Value,
        ) -> std::result::Result<Value, String> {
            unreachable!()
        }
        fn destroy_source(&self, _: &str) -> std::result::Result<(), String> {
            unreachable!()
        }
        fn stream_settings(&self) -> Value {
            unreachable!()
        }
        fn set_stream_settings(&self, _: Value) -> std::result::Result<(), String> {
            unreachable!()
        }
    }

    fn ctx_with_downloads(dir: &Path) -> OpContext {
        let (main, _main_loop) = main_executor();
        OpContext {
            frontend: Arc::new(NoFrontend),
            main,
            downloads_dir: dir.to_path_buf(),
            handoff_timeout: Duration::from_secs(1),
        }
    }

    fn params(raw: &str) -> Params {
        Params::parse(raw).unwrap()
    }

    #[test]
    fn read_file_returns_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        fs::write(&path, "hello bridge").unwrap();

        let raw = format!(r#"{{"param1": 1, "param2": {}}}"#, json!(path.to_str().unwrap()));
        let reply = read_file(&params(&raw)).unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["contents"], "hello bridge");
    }

    #[test]
    fn read_file_refuses_large_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        fs::write(&path, vec![b'x'; MAX_READ_BYTES as usize]).unwrap();

        let raw = format!(r#"{{"param1": 1, "param2": {}}}"#, json!(path.to_str().unwrap()));
        assert!(matches!(
            read_file(&params(&raw)),
            Err(Error::FileTooLarge)
        ));
    }

    #[test]
    fn resolve_in_refuses_escapes() {
        let base = Path::new("/srv/downloads");
        assert!(resolve_in(base, "a/b.txt").is_ok());
        assert!(resolve_in(base, "a/./b.txt").is_ok());
        assert!(resolve_in(base, "a/../b.txt").is_ok());
        assert!(resolve_in(base, "../b.txt").is_err());
        assert!(resolve_in(base, "a/../../b.txt").is_err());
        assert!(resolve_in(base, "/etc/passwd").is_err());
        // Resolving to the base itself is refused too.
        assert!(resolve_in(base, ".").is_err());
        assert!(resolve_in(base, "a/..").is_err());
    }

    #[test]
    fn delete_files_reports_per_entry_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keepable.txt"), "x").unwrap();
        let ctx = ctx_with_downloads(dir.path());

        let entries = json!([
            { "path": "keepable.txt" },
            { "path": "absent.txt" },
            { "path": "../escape.txt" },
        ])
        .to_string();
        let raw = format!(r#"{{"param1": 1, "param2": {}}}"#, json!(entries));

        let reply = delete_files(&ctx, &params(&raw)).unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["success"].as_array().unwrap().len(), 1);
        assert_eq!(value["errors"].as_array().unwrap().len(), 2);
        assert!(!dir.path().join("keepable.txt").exists());
    }

    #[test]
    fn drop_folder_stays_inside_downloads() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/inner")).unwrap();
        let ctx = ctx_with_downloads(dir.path());

        let reply = drop_folder(&ctx, &params(r#"{"param1": 1, "param2": "sub"}"#)).unwrap();
        assert_eq!(reply, success());
        assert!(!dir.path().join("sub").exists());

        assert!(matches!(
            drop_folder(&ctx, &params(r#"{"param1": 1, "param2": ".."}"#)),
            Err(Error::PathOutsideDownloads(_))
        ));
    }

    #[test]
    fn query_downloads_folder_lists_entries() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        let ctx = ctx_with_downloads(dir.path());

        let reply = query_downloads_folder(&ctx).unwrap();
        let value: Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);

        // Missing directory reads as empty.
        let ctx = ctx_with_downloads(&dir.path().join("nope"));
        let reply = query_downloads_folder(&ctx).unwrap();
        assert_eq!(reply, "[]");
    }

    #[test]
    fn extract_zip_unpacks_and_skips_unsafe_entries() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("bundle.zip");

        let file = fs::File::create(&archive_path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("docs/readme.md", options).unwrap();
        writer.write_all(b"contents").unwrap();
        writer.start_file("../evil.txt", options).unwrap();
        writer.write_all(b"nope").unwrap();
        writer.finish().unwrap();

        let target = dir.path().join("out");
        fs::create_dir_all(&target).unwrap();
        let extracted = extract_zip(&archive_path, &target).unwrap();

        assert_eq!(extracted, vec![target.join("docs/readme.md")]);
        assert_eq!(
            fs::read_to_string(target.join("docs/readme.md")).unwrap(),
            "contents"
        );
        assert!(!dir.path().join("evil.txt").exists());
    }
}
