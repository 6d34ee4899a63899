//! Page resolution: maps a page id to `(metadata, payload bytes)`, either
//! from a dynamic generator or from the filesystem.

pub mod dynamic;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{GlobalOverrides, PageId, PageMetadata};
use crate::preamble::PageDataSource;
use crate::registry::Registry;
use crate::session::SessionState;

pub use dynamic::DynamicPageProvider;

/// A resolved page, ready for preamble/header-footer assembly.
pub struct ResolvedPage {
    pub meta: PageMetadata,
    pub payload: Vec<u8>,
    pub basedir: String,
}

/// Loads `.meta`/`.cept`/`a.glob`/`.pal`/`.inc` off the filesystem rooted
/// at `root`, and also implements [`PageDataSource`] for the preamble
/// builder so palette/include loading shares the same root.
pub struct FsDataSource {
    root: PathBuf,
}

impl FsDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsDataSource { root: root.into() }
    }

    fn join(&self, basedir: &str, rest: &str) -> PathBuf {
        self.root.join(basedir).join(rest)
    }
}

impl PageDataSource for FsDataSource {
    fn read_palette(&self, basedir: &str, name: &str) -> Result<String> {
        let path = self.join(basedir, &format!("{name}.pal"));
        fs::read_to_string(&path).map_err(Error::from)
    }

    fn read_include(&self, basedir: &str, name: &str) -> Result<Vec<u8>> {
        let path = self.join(basedir, &format!("{name}.inc"));
        fs::read(&path).map_err(Error::from)
    }
}

/// Resolves `pageid` under `root`, checking dynamic generators first (in
/// the fixed order login -> user-management -> messaging) and falling
/// back to the filesystem. Returns `Ok(None)` for a page the resolver
/// genuinely cannot find (NotFound); any I/O or parse failure beyond that
/// point is a hard [`Error`].
pub fn resolve(
    root: &Path,
    pageid: &PageId,
    registry: &Registry,
    providers: &[&dyn DynamicPageProvider],
    session: &mut SessionState,
) -> Result<Option<ResolvedPage>> {
    let normalized = pageid.normalized();

    let mut basedir = None;
    let mut stem = String::new();
    for prefix in normalized.prefixes() {
        let candidate = root.join(prefix);
        if candidate.is_dir() {
            basedir = Some(format!("{prefix}/"));
            stem = normalized.as_str()[prefix.len()..].to_string();
            break;
        }
    }
    let Some(basedir) = basedir else {
        return Ok(None);
    };

    for provider in providers {
        if provider.matches(&normalized) {
            if let Some((meta_json, payload)) = provider.create_page(&normalized, session) {
                let mut meta = PageMetadata::parse(&meta_json, registry)?;
                overlay_glob(root, &basedir, &mut meta)?;
                return Ok(Some(ResolvedPage {
                    meta,
                    payload,
                    basedir,
                }));
            }
        }
    }

    let dir = root.join(&basedir);
    let meta_path = dir.join(format!("{stem}.meta"));
    if !meta_path.is_file() {
        return Ok(None);
    }
    let meta_json = fs::read_to_string(&meta_path)?;
    let mut meta = PageMetadata::parse(&meta_json, registry)?;

    let cept_path = dir.join(format!("{stem}.cept"));
    let payload = fs::read(&cept_path).map_err(Error::from)?;

    overlay_glob(root, &basedir, &mut meta)?;

    Ok(Some(ResolvedPage {
        meta,
        payload,
        basedir,
    }))
}

fn overlay_glob(root: &Path, basedir: &str, meta: &mut PageMetadata) -> Result<()> {
    let glob_path = root.join(basedir).join("a.glob");
    let glob_json = fs::read_to_string(&glob_path).map_err(|_| {
        Error::MissingArtifact(glob_path.to_string_lossy().into_owned())
    })?;
    let overrides = GlobalOverrides::parse(&glob_json)?;
    meta.apply_overrides(&overrides);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sloggers::null::NullLoggerBuilder;
    use sloggers::Build;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn session() -> SessionState {
        SessionState::new(NullLoggerBuilder {}.build().unwrap(), false)
    }

    #[test]
    fn resolves_through_longest_prefix_directory() {
        let root = TempDir::new().unwrap();
        let page_dir = root.path().join("0");
        fs::create_dir_all(&page_dir).unwrap();
        write(
            &page_dir,
            "a.meta",
            r#"{"publisher_name": "Test", "publisher_color": 1, "links": {}}"#,
        );
        fs::write(page_dir.join("a.cept"), b"hello").unwrap();
        write(&page_dir, "a.glob", "{}");

        let registry = Registry::new();
        let id = PageId::new("0a").unwrap();
        let mut sess = session();
        let resolved = resolve(root.path(), &id, &registry, &[], &mut sess)
            .unwrap()
            .expect("page found");
        assert_eq!(resolved.payload, b"hello");
        assert_eq!(resolved.meta.publisher_name, "Test");
    }

    #[test]
    fn missing_directory_is_not_found() {
        let root = TempDir::new().unwrap();
        let registry = Registry::new();
        let id = PageId::new("5a").unwrap();
        let mut sess = session();
        let resolved = resolve(root.path(), &id, &registry, &[], &mut sess).unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn missing_a_glob_is_a_hard_error_not_notfound() {
        let root = TempDir::new().unwrap();
        let page_dir = root.path().join("0");
        fs::create_dir_all(&page_dir).unwrap();
        write(
            &page_dir,
            "a.meta",
            r#"{"publisher_name": "Test", "publisher_color": 1, "links": {}}"#,
        );
        fs::write(page_dir.join("a.cept"), b"hello").unwrap();

        let registry = Registry::new();
        let id = PageId::new("0a").unwrap();
        let mut sess = session();
        let err = resolve(root.path(), &id, &registry, &[], &mut sess).unwrap_err();
        assert!(matches!(err, Error::MissingArtifact(_)));
    }

    #[test]
    fn glob_overrides_win_over_meta() {
        let root = TempDir::new().unwrap();
        let page_dir = root.path().join("0");
        fs::create_dir_all(&page_dir).unwrap();
        write(
            &page_dir,
            "a.meta",
            r#"{"publisher_name": "Original", "publisher_color": 1, "links": {}}"#,
        );
        fs::write(page_dir.join("a.cept"), b"hello").unwrap();
        write(&page_dir, "a.glob", r#"{"publisher_name": "Overridden"}"#);

        let registry = Registry::new();
        let id = PageId::new("0a").unwrap();
        let mut sess = session();
        let resolved = resolve(root.path(), &id, &registry, &[], &mut sess)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.meta.publisher_name, "Overridden");
    }
}
