//! Document loading: extension-routed text extraction.

use std::fs;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, warn};

/// Loader collaborator contract: extracted text, or an empty string on any
/// failure or unsupported type. Never errors outward; the file simply
/// contributes zero chunks.
pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path) -> String;
}

/// Filesystem loader for PDF, plain-text, and HTML documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, path: &Path) -> String {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        debug!(path = %path.display(), "loading document");

        let result = match extension.as_str() {
            "pdf" => load_pdf(path),
            "txt" => load_txt(path),
            "html" | "htm" => load_html(path),
            _ => {
                warn!(path = %path.display(), extension = %extension, "unsupported file type, skipping");
                return String::new();
            }
        };

        match result {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load document");
                String::new()
            }
        }
    }
}

fn load_pdf(path: &Path) -> anyhow::Result<String> {
    Ok(pdf_extract::extract_text(path)?)
}

fn load_txt(path: &Path) -> anyhow::Result<String> {
    Ok(fs::read_to_string(path)?)
}

fn load_html(path: &Path) -> anyhow::Result<String> {
    let raw = fs::read_to_string(path)?;
    Ok(strip_html(&raw))
}

/// Pull the text content out of HTML markup, dropping tags and the bodies of
/// script/style elements. Element texts are newline-joined. Malformed markup
/// stops extraction at the error and keeps what was read so far.
fn strip_html(html: &str) -> String {
    let mut reader = Reader::from_str(html);
    reader.config_mut().check_end_names = false;
    reader.config_mut().trim_text(true);

    let mut parts: Vec<String> = Vec::new();
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if is_non_content_tag(e.name().as_ref()) {
                    skip_depth += 1;
                }
            }
            Ok(Event::End(e)) => {
                if is_non_content_tag(e.name().as_ref()) {
                    skip_depth = skip_depth.saturating_sub(1);
                }
            }
            Ok(Event::Text(t)) if skip_depth == 0 => {
                let text = t
                    .unescape()
                    .map(|s| s.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(t.as_ref()).into_owned());
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    parts.join("\n")
}

fn is_non_content_tag(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"script") || name.eq_ignore_ascii_case(b"style")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_txt() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "guide.txt", "How to file an FIR.");
        assert_eq!(FsLoader.load(&path), "How to file an FIR.");
    }

    #[test]
    fn test_load_html_strips_markup() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "faq.html",
            "<html><head><style>body { color: red; }</style></head>\
             <body><h1>FIR FAQs</h1><p>What is an FIR &amp; who can file one?</p>\
             <script>track();</script></body></html>",
        );
        let text = FsLoader.load(&path);
        assert!(text.contains("FIR FAQs"));
        assert!(text.contains("What is an FIR & who can file one?"));
        assert!(!text.contains("track()"));
        assert!(!text.contains("color: red"));
    }

    #[test]
    fn test_html_text_is_newline_joined() {
        let text = strip_html("<p>first</p><p>second</p>");
        assert_eq!(text, "first\nsecond");
    }

    #[test]
    fn test_unsupported_extension_yields_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "image.png", "not really an image");
        assert_eq!(FsLoader.load(&path), "");
    }

    #[test]
    fn test_missing_file_yields_empty() {
        assert_eq!(FsLoader.load(Path::new("/nonexistent/file.txt")), "");
    }

    #[test]
    fn test_corrupt_pdf_yields_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "broken.pdf", "this is not a pdf");
        assert_eq!(FsLoader.load(&path), "");
    }
}
