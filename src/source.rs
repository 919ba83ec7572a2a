use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Article produced by an external content-extraction service. Only
/// `content` ever reaches the engines; the rest is presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub site_name: Option<String>,
}

/// Extraction failures all collapse to "no text available" as far as
/// the engines are concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractError {
    pub message: String,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no text available: {}", self.message)
    }
}

impl std::error::Error for ExtractError {}

/// Collaborator that turns a URL into readable text. Implemented
/// outside this crate; the app consumes whatever content it returns
/// exactly like pasted or uploaded text.
pub trait ContentExtractor {
    fn extract(&self, url: &str) -> Result<ExtractedArticle, ExtractError>;
}

/// A source is worth loading only if something non-whitespace is in
/// it. Engines never see an invalid source; this check lives with the
/// caller.
pub fn is_valid_source(raw: &str) -> bool {
    !raw.trim().is_empty()
}

/// Read a text file, rejecting whitespace-only content.
pub fn read_text_file(path: &Path) -> io::Result<String> {
    let raw = fs::read_to_string(path)?;
    if !is_valid_source(&raw) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} contains no readable text", path.display()),
        ));
    }
    Ok(raw)
}

/// Whitespace-delimited word count of a text.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn whitespace_only_sources_are_invalid() {
        assert!(!is_valid_source(""));
        assert!(!is_valid_source("   \n\t  "));
        assert!(is_valid_source("one word"));
    }

    #[test]
    fn reading_a_text_file_returns_its_content() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Some loaded text.").unwrap();
        assert_eq!(read_text_file(file.path()).unwrap(), "Some loaded text.");
    }

    #[test]
    fn reading_a_blank_file_fails() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "  \n ").unwrap();
        let err = read_text_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn word_counting() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  spaced   out  "), 2);
        assert_eq!(count_words("Hello, world."), 2);
    }

    struct FixedExtractor;

    impl ContentExtractor for FixedExtractor {
        fn extract(&self, url: &str) -> Result<ExtractedArticle, ExtractError> {
            if url.starts_with("https://") {
                Ok(ExtractedArticle {
                    title: "An Article".into(),
                    content: "Extracted body text.".into(),
                    excerpt: None,
                    site_name: Some("example.com".into()),
                })
            } else {
                Err(ExtractError {
                    message: "unsupported scheme".into(),
                })
            }
        }
    }

    #[test]
    fn extractor_content_is_plain_source_text() {
        let article = FixedExtractor.extract("https://example.com/a").unwrap();
        assert!(is_valid_source(&article.content));
    }

    #[test]
    fn extraction_failure_reads_as_no_text_available() {
        let err = FixedExtractor.extract("ftp://nope").unwrap_err();
        assert!(err.to_string().starts_with("no text available"));
    }
}
