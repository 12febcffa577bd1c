//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// One input file's contribution to a merge
#[derive(Debug, Clone)]
pub struct MergedFile {
    /// File name of the input (without directory)
    pub name: String,
    /// Number of pages the input contributed
    pub page_count: usize,
}

/// Report describing a completed merge
#[derive(Debug, Clone)]
pub struct MergeReport {
    /// Where the merged PDF was written
    pub output_path: PathBuf,
    /// Per-input breakdown, in merge order
    pub files: Vec<MergedFile>,
}

impl MergeReport {
    /// Total number of pages in the merged output
    pub fn total_pages(&self) -> usize {
        self.files.iter().map(|f| f.page_count).sum()
    }

    /// Human-readable summary listing each input and its page count
    pub fn summary(&self) -> String {
        let output_name = file_name_string(&self.output_path);
        let mut out = format!(
            "Merged {} PDFs into {}:\n\n",
            self.files.len(),
            output_name
        );
        for file in &self.files {
            out.push_str(&format!("{} - {} pages\n", file.name, file.page_count));
        }
        out
    }
}

fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Merge multiple PDF files into a single PDF
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// # Example
///
/// ```no_run
/// use pdf_tools::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("1. first.pdf"),
///         PathBuf::from("2. second.pdf"),
///     ],
///     output_path: PathBuf::from("merged.pdf"),
/// };
///
/// let report = merge_pdfs(&options).expect("Failed to merge");
/// println!("{}", report.summary());
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<MergeReport> {
    merge_pdfs_with_progress(options, |_, _| {})
}

/// Merge multiple PDF files, reporting progress after each input is read.
///
/// The callback receives `(files_processed, total_files)` once per input,
/// in merge order.
pub fn merge_pdfs_with_progress<F>(options: &MergeOptions, mut progress: F) -> Result<MergeReport>
where
    F: FnMut(usize, usize),
{
    if options.input_paths.is_empty() {
        return Err(Error::General("No input files provided".to_string()));
    }

    // Validate all input files exist before touching any of them
    for path in &options.input_paths {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    let total = options.input_paths.len();
    let mut documents: Vec<Document> = Vec::new();
    let mut files: Vec<MergedFile> = Vec::new();

    for (i, path) in options.input_paths.iter().enumerate() {
        let doc = Document::load(path)?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(Error::EmptyPdf(path.clone()));
        }

        files.push(MergedFile {
            name: file_name_string(path),
            page_count,
        });
        documents.push(doc);
        progress(i + 1, total);
    }

    // Define a starting max_id for the merged document
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        // Renumber objects in this document to avoid ID conflicts
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // Collect page IDs in document order
        let pages = doc.get_pages();
        page_ids.extend(pages.into_values());

        objects.extend(doc.objects);
    }

    let mut merged_doc = Document::with_version("1.5");

    // Add all collected objects first, then update max_id to the highest
    // imported ID so new_object_id() won't collide with them
    merged_doc.objects.extend(objects);
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));

    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    // Re-parent every page under the new Pages node
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(ref mut dict)) = merged_doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    merged_doc.compress();
    merged_doc.save(&options.output_path)?;

    Ok(MergeReport {
        output_path: options.output_path.clone(),
        files,
    })
}
