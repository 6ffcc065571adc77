use crate::error::IngestError;
use crate::models::{LoadReport, SkippedFile, SourceDocument};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs;
use std::io::Read;
use std::path::Path;
use walkdir::WalkDir;

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "md", "docx"];

/// Sorted eligible filenames directly inside the corpus directory.
pub fn list_documents(corpus_dir: &Path) -> Vec<String> {
    let mut names = Vec::new();

    for entry in WalkDir::new(corpus_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let eligible = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| ext.eq_ignore_ascii_case(supported))
            });

        if eligible {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }

    names.sort_unstable();
    names
}

/// Loads every eligible file, one `SourceDocument` at most per file.
/// Unreadable or unparseable files are skipped with a reason; the batch
/// itself never fails.
pub fn load_documents(corpus_dir: &Path) -> LoadReport {
    let mut report = LoadReport::default();

    for name in list_documents(corpus_dir) {
        let path = corpus_dir.join(&name);
        match load_file(&path, &name) {
            Ok(Some(document)) => report.documents.push(document),
            Ok(None) => {}
            Err(error) => report.skipped.push(SkippedFile {
                name,
                reason: error.to_string(),
            }),
        }
    }

    report
}

fn load_file(path: &Path, name: &str) -> Result<Option<SourceDocument>, IngestError> {
    let is_docx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"));

    let text = if is_docx {
        extract_docx_text(path)?
    } else {
        // Undecodable bytes are replaced rather than failing the file.
        String::from_utf8_lossy(&fs::read(path)?).into_owned()
    };

    if text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(SourceDocument {
        source_id: name.to_string(),
        text,
    }))
}

fn extract_docx_text(path: &Path) -> Result<String, IngestError> {
    let bytes = fs::read(path)?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.as_slice()))
        .map_err(|error| IngestError::DocxParse(error.to_string()))?;

    let mut document_xml = Vec::new();
    archive
        .by_name("word/document.xml")
        .map_err(|error| IngestError::DocxParse(error.to_string()))?
        .read_to_end(&mut document_xml)?;

    collect_paragraph_text(&document_xml)
}

/// Gathers `<w:t>` runs, emitting one line per `<w:p>` paragraph.
fn collect_paragraph_text(xml: &[u8]) -> Result<String, IngestError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(element)) if element.local_name().as_ref() == b"t" => {
                in_text_run = true;
            }
            Ok(Event::Text(text)) if in_text_run => {
                current.push_str(text.unescape().unwrap_or_default().as_ref());
            }
            Ok(Event::End(element)) => match element.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(error) => return Err(IngestError::DocxParse(error.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}
