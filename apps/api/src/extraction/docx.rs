//! DOCX text extraction.
//!
//! A DOCX file is a ZIP archive; the body text lives in `word/document.xml`
//! as `<w:t>` runs grouped into `<w:p>` paragraphs. Runs are concatenated
//! within a paragraph and paragraphs are joined with `\n`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::ExtractionError;

const DOCUMENT_XML: &str = "word/document.xml";

pub(crate) fn extract(path: &Path) -> Result<String, ExtractionError> {
    let file = File::open(path).map_err(|source| ExtractionError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| docx_error(path, format!("not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    let mut entry = archive
        .by_name(DOCUMENT_XML)
        .map_err(|e| docx_error(path, format!("missing {DOCUMENT_XML}: {e}")))?;
    entry
        .read_to_string(&mut xml)
        .map_err(|e| docx_error(path, format!("unreadable {DOCUMENT_XML}: {e}")))?;

    Ok(document_text(&xml))
}

fn docx_error(path: &Path, reason: String) -> ExtractionError {
    ExtractionError::Docx {
        path: path.display().to_string(),
        reason,
    }
}

/// Collects paragraph text from WordprocessingML, one line per `<w:p>`.
fn document_text(xml: &str) -> String {
    let mut paragraphs = Vec::new();
    let mut rest = xml;
    while let Some(end) = rest.find("</w:p>") {
        paragraphs.push(paragraph_text(&rest[..end]));
        rest = &rest[end + "</w:p>".len()..];
    }
    paragraphs.join("\n")
}

/// Concatenates the `<w:t>` runs inside one paragraph segment.
fn paragraph_text(segment: &str) -> String {
    let mut text = String::new();
    let mut rest = segment;

    while let Some(start) = rest.find("<w:t") {
        let after = &rest[start + "<w:t".len()..];

        // `<w:tab/>` and friends share the prefix; a real run continues with
        // `>`, a space, or `/`.
        match after.as_bytes().first() {
            Some(b'>') | Some(b' ') | Some(b'/') => {}
            _ => {
                rest = after;
                continue;
            }
        }

        let Some(gt) = after.find('>') else { break };
        if after[..gt].ends_with('/') {
            // Self-closing empty run.
            rest = &after[gt + 1..];
            continue;
        }

        let body = &after[gt + 1..];
        let Some(end) = body.find("</w:t>") else { break };
        text.push_str(&decode_entities(&body[..end]));
        rest = &body[end + "</w:t>".len()..];
    }

    text
}

fn decode_entities(run: &str) -> String {
    if !run.contains('&') {
        return run.to_string();
    }
    run.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
