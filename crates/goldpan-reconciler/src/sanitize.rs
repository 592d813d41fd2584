//! Boundary-string sanitization

/// Punctuation an LLM appends to boundary strings that is absent from the page
const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', '!', ';', ':', '?'];

/// File extensions recognized by the filename-spacing fix
///
/// Lowercase; tokens are compared case-insensitively.
const FILE_EXTENSIONS: [&str; 48] = [
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "md", "rtf", "csv", "log", "jpg",
    "jpeg", "png", "gif", "svg", "webp", "bmp", "mp3", "wav", "mp4", "mov", "avi", "mkv", "zip",
    "tar", "gz", "rar", "7z", "json", "xml", "yaml", "yml", "toml", "html", "htm", "css", "js",
    "ts", "c", "h", "cpp", "cs", "java", "py", "rb", "sh",
];

/// Strip hallucinated trailing punctuation and fix filename spacing
///
/// LLMs reliably corrupt the tail of a boundary string in two ways: they
/// append punctuation that does not exist in the page (`"test content..."`),
/// and their tokenizers split filenames at the extension (`"Naur. pdf"`).
/// Both break literal search against the source text.
///
/// - Trailing runs of `. , ! ; : ?` and trailing whitespace are removed,
///   however many are stacked. Interior punctuation is untouched:
///   `"Mr. Smith's test."` becomes `"Mr. Smith's test"`.
/// - A trailing `". "` gap before a whitelisted file extension collapses:
///   `"Naur. pdf"` becomes `"Naur.pdf"`. Tokens not on the whitelist are
///   left alone.
/// - Input that is nothing but punctuation and whitespace sanitizes to `""`.
///
/// Idempotent: sanitizing twice gives the same result as sanitizing once.
pub fn sanitize_end_content(raw: &str) -> String {
    let stripped = raw
        .trim_end_matches(|c: char| c.is_whitespace() || TRAILING_PUNCTUATION.contains(&c));
    collapse_extension_gap(stripped)
}

/// Collapse the whitespace between a trailing "." and a known file extension
fn collapse_extension_gap(text: &str) -> String {
    // Trailing alphanumeric token, if any
    let token_start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphanumeric())
        .last()
        .map(|(i, _)| i);
    let token_start = match token_start {
        Some(i) if i > 0 => i,
        _ => return text.to_string(),
    };
    let token = &text[token_start..];
    if !FILE_EXTENSIONS.contains(&token.to_ascii_lowercase().as_str()) {
        return text.to_string();
    }

    // The token must be separated from a "." by whitespace only
    let head = &text[..token_start];
    let gap_start = head.trim_end_matches(|c: char| c.is_whitespace()).len();
    if gap_start == token_start || !head[..gap_start].ends_with('.') {
        return text.to_string();
    }

    format!("{}{}", &head[..gap_start], token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_trailing_punctuation_runs() {
        assert_eq!(sanitize_end_content("test content..."), "test content");
        assert_eq!(sanitize_end_content("test content."), "test content");
        assert_eq!(sanitize_end_content("done!?;:,."), "done");
    }

    #[test]
    fn test_strips_trailing_whitespace() {
        assert_eq!(sanitize_end_content("test content \t\n"), "test content");
        assert_eq!(sanitize_end_content("test content. \n"), "test content");
    }

    #[test]
    fn test_preserves_interior_punctuation() {
        assert_eq!(sanitize_end_content("Mr. Smith's test."), "Mr. Smith's test");
        assert_eq!(sanitize_end_content("a, b, and c"), "a, b, and c");
    }

    #[test]
    fn test_collapses_filename_gap() {
        assert_eq!(sanitize_end_content("Naur. pdf"), "Naur.pdf");
        assert_eq!(sanitize_end_content("slides. pptx"), "slides.pptx");
        assert_eq!(sanitize_end_content("main. py"), "main.py");
    }

    #[test]
    fn test_collapses_multiple_spaces_before_extension() {
        assert_eq!(sanitize_end_content("Naur.   pdf"), "Naur.pdf");
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(sanitize_end_content("Report. PDF"), "Report.PDF");
    }

    #[test]
    fn test_unknown_token_untouched() {
        assert_eq!(sanitize_end_content("file. xyz"), "file. xyz");
        assert_eq!(sanitize_end_content("etc. so"), "etc. so");
    }

    #[test]
    fn test_no_gap_untouched() {
        assert_eq!(sanitize_end_content("Naur.pdf"), "Naur.pdf");
        assert_eq!(sanitize_end_content("archive tar"), "archive tar");
    }

    #[test]
    fn test_filename_after_punctuation_strip() {
        assert_eq!(sanitize_end_content("Naur. pdf."), "Naur.pdf");
        assert_eq!(sanitize_end_content("Naur. pdf  \n"), "Naur.pdf");
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(sanitize_end_content(""), "");
        assert_eq!(sanitize_end_content("..."), "");
        assert_eq!(sanitize_end_content(" \t\n"), "");
        assert_eq!(sanitize_end_content("?!.,;:"), "");
        assert_eq!(sanitize_end_content("pdf"), "pdf");
    }

    #[test]
    fn test_idempotent_on_known_cases() {
        for input in ["test content...", "Naur. pdf", "Mr. Smith's test.", "", "file. xyz"] {
            let once = sanitize_end_content(input);
            assert_eq!(sanitize_end_content(&once), once, "input: {:?}", input);
        }
    }

    proptest! {
        #[test]
        fn prop_idempotent(input in ".{0,80}") {
            let once = sanitize_end_content(&input);
            prop_assert_eq!(sanitize_end_content(&once), once);
        }

        #[test]
        fn prop_never_ends_with_stripped_punctuation(input in ".{0,80}") {
            let out = sanitize_end_content(&input);
            if let Some(last) = out.chars().last() {
                prop_assert!(!last.is_whitespace());
                // A collapsed extension keeps its dot interior, never trailing
                prop_assert!(!TRAILING_PUNCTUATION.contains(&last));
            }
        }
    }
}
