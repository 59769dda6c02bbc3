//! File upload references.
//!
//! Some Ads API upload endpoints refuse multipart parts without a content
//! type, so every upload goes through [`resolve`] before it is sent.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Bytes read from the head of a file when sniffing image signatures.
pub const SNIFF_PREFIX_LEN: usize = 32;

/// Where an upload's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

impl FileContent {
    /// Filename carried by the source itself, if any.
    pub fn inferred_name(&self) -> Option<String> {
        match self {
            FileContent::Bytes(_) => None,
            FileContent::Path(path) => path
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string),
        }
    }

    /// Up to [`SNIFF_PREFIX_LEN`] leading bytes. Unreadable sources yield `None`.
    pub fn prefix(&self) -> Option<Vec<u8>> {
        match self {
            FileContent::Bytes(bytes) => Some(bytes[..bytes.len().min(SNIFF_PREFIX_LEN)].to_vec()),
            FileContent::Path(path) => read_prefix(path),
        }
    }
}

fn read_prefix(path: &Path) -> Option<Vec<u8>> {
    let file = File::open(path).ok()?;
    let mut buf = Vec::with_capacity(SNIFF_PREFIX_LEN);
    file.take(SNIFF_PREFIX_LEN as u64).read_to_end(&mut buf).ok()?;
    Some(buf)
}

/// Raw upload value as supplied by a caller.
///
/// Mirrors the positional `(filename, content, content_type, headers)` form:
/// any trailing member may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: Option<String>,
    pub content: FileContent,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl FileUpload {
    pub fn new(content: FileContent) -> Self {
        Self {
            filename: None,
            content,
            content_type: None,
            headers: Vec::new(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl From<Vec<u8>> for FileUpload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(FileContent::Bytes(bytes))
    }
}

impl From<&[u8]> for FileUpload {
    fn from(bytes: &[u8]) -> Self {
        Self::new(FileContent::Bytes(bytes.to_vec()))
    }
}

impl From<PathBuf> for FileUpload {
    fn from(path: PathBuf) -> Self {
        Self::new(FileContent::Path(path))
    }
}

impl From<&Path> for FileUpload {
    fn from(path: &Path) -> Self {
        Self::new(FileContent::Path(path.to_path_buf()))
    }
}

impl From<FileContent> for FileUpload {
    fn from(content: FileContent) -> Self {
        Self::new(content)
    }
}

impl<N, C> From<(N, C)> for FileUpload
where
    N: Into<String>,
    C: Into<FileContent>,
{
    fn from((filename, content): (N, C)) -> Self {
        Self::new(content.into()).with_filename(filename)
    }
}

impl<N, C, T> From<(N, C, T)> for FileUpload
where
    N: Into<String>,
    C: Into<FileContent>,
    T: Into<String>,
{
    fn from((filename, content, content_type): (N, C, T)) -> Self {
        Self::new(content.into())
            .with_filename(filename)
            .with_content_type(content_type)
    }
}

impl<N, C, T> From<(N, C, T, Vec<(String, String)>)> for FileUpload
where
    N: Into<String>,
    C: Into<FileContent>,
    T: Into<String>,
{
    fn from((filename, content, content_type, headers): (N, C, T, Vec<(String, String)>)) -> Self {
        let mut upload = Self::new(content.into())
            .with_filename(filename)
            .with_content_type(content_type);
        upload.headers = headers;
        upload
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(bytes: Vec<u8>) -> Self {
        FileContent::Bytes(bytes)
    }
}

impl From<&[u8]> for FileContent {
    fn from(bytes: &[u8]) -> Self {
        FileContent::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for FileContent {
    fn from(path: PathBuf) -> Self {
        FileContent::Path(path)
    }
}

/// A resolved upload, ready to become a multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub filename: Option<String>,
    pub content: FileContent,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
}

/// Resolve filename and content type for an upload.
///
/// Filename: explicit, then the name the source carries, then `default_name`.
/// Content type: explicit, then the filename extension, then (only with
/// `detect_image`) the image signature in the first bytes of the content.
pub fn resolve(upload: FileUpload, default_name: Option<&str>, detect_image: bool) -> FileRef {
    let FileUpload {
        filename,
        content,
        content_type,
        headers,
    } = upload;

    let filename = filename
        .filter(|name| !name.is_empty())
        .or_else(|| content.inferred_name())
        .or_else(|| default_name.map(str::to_string));

    let content_type = content_type
        .filter(|ct| !ct.is_empty())
        .or_else(|| filename.as_deref().and_then(mime_from_extension))
        .or_else(|| {
            if detect_image {
                content
                    .prefix()
                    .and_then(|prefix| ImageKind::sniff(&prefix))
                    .map(|kind| kind.mime().to_string())
            } else {
                None
            }
        });

    FileRef {
        filename,
        content,
        content_type,
        headers,
    }
}

fn mime_from_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    mime_guess::from_ext(&ext)
        .first_raw()
        .map(str::to_string)
}

/// Image formats recognised from their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Tiff,
    Bmp,
    Webp,
    Ico,
    Pbm,
    Pgm,
    Ppm,
    Rast,
    Rgb,
    Xbm,
    Exr,
}

impl ImageKind {
    pub fn sniff(h: &[u8]) -> Option<Self> {
        let netpbm = |kind: u8| {
            h.len() >= 3 && h[0] == b'P' && h[1] == kind && matches!(h[2], b' ' | b'\t' | b'\n' | b'\r')
        };

        if h.starts_with(&[0xFF, 0xD8, 0xFF])
            || (h.len() >= 10 && (&h[6..10] == b"JFIF" || &h[6..10] == b"Exif"))
        {
            Some(ImageKind::Jpeg)
        } else if h.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageKind::Png)
        } else if h.starts_with(b"GIF87a") || h.starts_with(b"GIF89a") {
            Some(ImageKind::Gif)
        } else if h.starts_with(b"MM\x00*") || h.starts_with(b"II*\x00") {
            Some(ImageKind::Tiff)
        } else if h.len() >= 12 && h.starts_with(b"RIFF") && &h[8..12] == b"WEBP" {
            Some(ImageKind::Webp)
        } else if h.starts_with(b"BM") {
            Some(ImageKind::Bmp)
        } else if h.starts_with(&[0x00, 0x00, 0x01, 0x00]) {
            Some(ImageKind::Ico)
        } else if netpbm(b'1') || netpbm(b'4') {
            Some(ImageKind::Pbm)
        } else if netpbm(b'2') || netpbm(b'5') {
            Some(ImageKind::Pgm)
        } else if netpbm(b'3') || netpbm(b'6') {
            Some(ImageKind::Ppm)
        } else if h.starts_with(&[0x59, 0xA6, 0x6A, 0x95]) {
            Some(ImageKind::Rast)
        } else if h.starts_with(&[0x01, 0xDA]) {
            Some(ImageKind::Rgb)
        } else if h.starts_with(b"#define ") {
            Some(ImageKind::Xbm)
        } else if h.starts_with(&[0x76, 0x2F, 0x31, 0x01]) {
            Some(ImageKind::Exr)
        } else {
            None
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
            ImageKind::Tiff => "image/tiff",
            ImageKind::Bmp => "image/bmp",
            ImageKind::Webp => "image/webp",
            ImageKind::Ico => "image/vnd.microsoft.icon",
            ImageKind::Pbm => "image/x-portable-bitmap",
            ImageKind::Pgm => "image/x-portable-graymap",
            ImageKind::Ppm => "image/x-portable-pixmap",
            ImageKind::Rast => "image/x-cmu-raster",
            ImageKind::Rgb => "image/x-rgb",
            ImageKind::Xbm => "image/x-xbitmap",
            ImageKind::Exr => "image/x-exr",
        }
    }
}
