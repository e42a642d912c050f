//! Reading input documents
//!
//! Word documents (`.docx`) are read paragraph by paragraph from
//! `word/document.xml`. Anything else is read as UTF-8 text, one paragraph
//! per line.

use crate::error::ExtractorError;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use threatlens_domain::Document;

const DOCX_BODY: &str = "word/document.xml";

/// Read an input document.
///
/// Each non-blank line or Word paragraph becomes a trimmed paragraph.
pub fn read_document(path: impl AsRef<Path>) -> Result<Document, ExtractorError> {
    let path = path.as_ref();
    if is_docx(path) {
        return read_docx(path);
    }
    let text = fs::read_to_string(path).map_err(|source| ExtractorError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Document::from_text(&text))
}

fn is_docx(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
}

fn read_docx(path: &Path) -> Result<Document, ExtractorError> {
    let file = File::open(path).map_err(|source| ExtractorError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    let format_error = |message: String| ExtractorError::DocumentFormat {
        path: path.to_path_buf(),
        message,
    };

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| format_error(format!("not a DOCX archive: {}", e)))?;
    let mut body = archive
        .by_name(DOCX_BODY)
        .map_err(|e| format_error(format!("missing {}: {}", DOCX_BODY, e)))?;
    let mut xml = String::new();
    body.read_to_string(&mut xml)
        .map_err(|e| format_error(format!("failed to read {}: {}", DOCX_BODY, e)))?;

    Ok(Document::from_text(&docx_paragraphs(&xml).join("\n")))
}

/// Paragraph texts of a WordprocessingML body, in document order
///
/// Text runs (`w:t`) are concatenated per paragraph (`w:p`); tabs and
/// breaks become `\t` and `\n`.
fn docx_paragraphs(xml: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut rest = xml;

    while let Some(open) = rest.find('<') {
        if in_text {
            current.push_str(&decode_entities(&rest[..open]));
        }
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        let tag = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let self_closing = tag.ends_with('/');
        let name = tag
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or_default();
        match name {
            "w:t" => in_text = !self_closing,
            "/w:t" => in_text = false,
            "w:tab" => current.push('\t'),
            "w:br" | "w:cr" => current.push('\n'),
            "/w:p" => paragraphs.push(std::mem::take(&mut current)),
            _ => {}
        }
    }
    paragraphs
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    #[test]
    fn test_read_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Jan 1 sshd[1]: Failed password").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  Jan 1 kernel: eth0 promiscuous mode  ").unwrap();

        let doc = read_document(file.path()).unwrap();
        assert_eq!(
            doc.paragraphs(),
            ["Jan 1 sshd[1]: Failed password", "Jan 1 kernel: eth0 promiscuous mode"]
        );
    }

    #[test]
    fn test_missing_file_is_source_error() {
        let result = read_document("/definitely/not/here.log");
        assert!(matches!(result, Err(ExtractorError::SourceRead { .. })));
    }

    fn write_docx(path: &Path, body: &str) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(b"<?xml version=\"1.0\"?><Types/>").unwrap();
        zip.start_file(DOCX_BODY, options).unwrap();
        write!(
            zip,
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{}</w:body></w:document>",
            body
        )
        .unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_read_docx_paragraphs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incident.docx");
        write_docx(
            &path,
            "<w:p><w:r><w:t>Jan 1 sshd[1]: </w:t></w:r><w:r><w:t>Failed password</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t xml:space=\"preserve\">   </w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>user=&lt;root&gt; &amp; admin</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t xml:space=\"preserve\">  Jan 2 kernel:</w:t><w:tab/><w:t>eth0 up  </w:t></w:r></w:p>",
        );

        let doc = read_document(&path).unwrap();
        assert_eq!(
            doc.paragraphs(),
            [
                "Jan 1 sshd[1]: Failed password",
                "user=<root> & admin",
                "Jan 2 kernel:\teth0 up"
            ]
        );
    }

    #[test]
    fn test_docx_extension_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("REPORT.DOCX");
        write_docx(&path, "<w:p><w:r><w:t>alert</w:t></w:r></w:p>");

        assert_eq!(read_document(&path).unwrap().paragraphs(), ["alert"]);
    }

    #[test]
    fn test_plain_text_named_docx_is_format_error() {
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        writeln!(file, "not a zip archive").unwrap();

        let result = read_document(file.path());
        assert!(matches!(result, Err(ExtractorError::DocumentFormat { .. })));
    }

    #[test]
    fn test_non_utf8_is_source_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x80]).unwrap();

        let result = read_document(file.path());
        assert!(matches!(result, Err(ExtractorError::SourceRead { .. })));
    }
}
