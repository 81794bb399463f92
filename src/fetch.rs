//! Content fetching boundary.
//!
//! The engine never touches the network or the filesystem itself; a
//! [`ContentFetcher`] hands it the raw page text and image bytes.

use std::path::{Path, PathBuf};

use tracing::debug;

/// An image referenced by the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub location: String,
    pub bytes: Vec<u8>,
}

/// Raw content of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub html: String,
    pub stylesheets: Vec<String>,
    pub images: Vec<ImageAsset>,
}

impl PageContent {
    /// The largest image, a reasonable stand-in for a hero/background image.
    pub fn largest_image(&self) -> Option<&ImageAsset> {
        self.images
            .iter()
            .rev()
            .max_by_key(|asset| asset.bytes.len())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no HTML, CSS or image files found in {}", .0.display())]
    Empty(PathBuf),
}

/// Anything that can produce page content for a location.
pub trait ContentFetcher {
    fn fetch(&self, location: &str) -> Result<PageContent, FetchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum FileKind {
    Html,
    Css,
    Image,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp", "tif", "tiff"];

fn classify(path: &Path) -> Option<FileKind> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" => Some(FileKind::Html),
        "css" => Some(FileKind::Css),
        e if IMAGE_EXTENSIONS.contains(&e) => Some(FileKind::Image),
        _ => None,
    }
}

/// Reads a saved page snapshot from disk: either a directory holding the
/// page's HTML, CSS and image files, or a single such file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFetcher;

impl LocalFetcher {
    fn read(path: &Path) -> Result<Vec<u8>, FetchError> {
        std::fs::read(path).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn add_file(page: &mut PageContent, path: &Path, kind: FileKind) -> Result<(), FetchError> {
        let bytes = Self::read(path)?;
        match kind {
            FileKind::Html => {
                if !page.html.is_empty() {
                    page.html.push('\n');
                }
                page.html.push_str(&String::from_utf8_lossy(&bytes));
            }
            FileKind::Css => page
                .stylesheets
                .push(String::from_utf8_lossy(&bytes).into_owned()),
            FileKind::Image => page.images.push(ImageAsset {
                location: path.display().to_string(),
                bytes,
            }),
        }
        Ok(())
    }
}

impl ContentFetcher for LocalFetcher {
    fn fetch(&self, location: &str) -> Result<PageContent, FetchError> {
        let root = PathBuf::from(location);
        if !root.exists() {
            return Err(FetchError::NotFound(root));
        }

        let mut files: Vec<(PathBuf, FileKind)> = if root.is_dir() {
            let entries = std::fs::read_dir(&root).map_err(|source| FetchError::Io {
                path: root.clone(),
                source,
            })?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|source| FetchError::Io {
                    path: root.clone(),
                    source,
                })?;
                let path = entry.path();
                if path.is_file() {
                    if let Some(kind) = classify(&path) {
                        files.push((path, kind));
                    }
                }
            }
            files
        } else {
            classify(&root).map(|kind| vec![(root.clone(), kind)]).unwrap_or_default()
        };

        if files.is_empty() {
            return Err(FetchError::Empty(root));
        }
        files.sort();

        let mut page = PageContent::default();
        for (path, kind) in &files {
            Self::add_file(&mut page, path, *kind)?;
        }

        debug!(
            location,
            stylesheets = page.stylesheets.len(),
            images = page.images.len(),
            "fetched local page snapshot"
        );
        Ok(page)
    }
}
