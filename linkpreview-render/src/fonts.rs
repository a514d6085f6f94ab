use rusttype::Font;
use std::path::{Path, PathBuf};

const REGULAR_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/System/Library/Fonts/ArialHB.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "C:/Windows/Fonts/arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/ArialHB.ttc",
    "/System/Library/Fonts/Helvetica.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "C:/Windows/Fonts/arialbd.ttf",
];

/// Regular and bold faces used by every layout.
#[derive(Default)]
pub struct FontBook {
    regular: Option<Font<'static>>,
    bold: Option<Font<'static>>,
}

impl FontBook {
    /// Configured paths first, then well-known system locations.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Self {
        let regular = load_first(regular, REGULAR_CANDIDATES);
        let bold = load_first(bold, BOLD_CANDIDATES);
        if regular.is_none() && bold.is_none() {
            tracing::warn!("no TrueType font found; preview text will be skipped");
        }
        Self { regular, bold }
    }

    /// A book without fonts. Layouts still draw shapes and images.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn regular(&self) -> Option<&Font<'static>> {
        self.regular.as_ref().or(self.bold.as_ref())
    }

    pub fn bold(&self) -> Option<&Font<'static>> {
        self.bold.as_ref().or(self.regular.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }
}

fn load_first(configured: Option<&Path>, candidates: &[&str]) -> Option<Font<'static>> {
    configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(candidates.iter().map(PathBuf::from))
        .find_map(|path| read_font(&path))
}

fn read_font(path: &Path) -> Option<Font<'static>> {
    if !path.exists() {
        return None;
    }
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "font unreadable");
            return None;
        }
    };
    let font = Font::try_from_vec(bytes);
    if font.is_none() {
        tracing::debug!(path = %path.display(), "font failed to parse");
    } else {
        tracing::debug!(path = %path.display(), "font loaded");
    }
    font
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_book_has_no_faces() {
        let book = FontBook::empty();
        assert!(book.is_empty());
        assert!(book.regular().is_none());
        assert!(book.bold().is_none());
    }

    #[test]
    fn garbage_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(read_font(&path).is_none());
        assert!(read_font(&dir.path().join("missing.ttf")).is_none());
    }
}
