//! PDF splitting into one file per page

use std::path::PathBuf;

use lopdf::{Document, Object, ObjectId};

use crate::error::{Error, Result};

/// Base name used when the caller supplies an empty one
pub const DEFAULT_BASE_NAME: &str = "page";

/// Options for splitting a PDF
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Input PDF file path
    pub input_path: PathBuf,
    /// Directory that receives the per-page files; must already exist
    pub output_dir: PathBuf,
    /// Base name for output files; page i is written as `{base}_{i}.pdf`
    pub base_name: String,
}

/// Report describing a completed split
#[derive(Debug, Clone)]
pub struct SplitReport {
    /// Directory the pages were written to
    pub output_dir: PathBuf,
    /// Files written, in page order
    pub output_paths: Vec<PathBuf>,
}

impl SplitReport {
    /// Number of pages (and files) produced
    pub fn page_count(&self) -> usize {
        self.output_paths.len()
    }

    /// Human-readable summary of the split
    pub fn summary(&self) -> String {
        format!(
            "Split {} pages to: {}",
            self.page_count(),
            self.output_dir.display()
        )
    }
}

/// Resolve the base name, falling back to [`DEFAULT_BASE_NAME`] when the
/// caller's choice is empty or whitespace
fn effective_base_name(base: &str) -> &str {
    if base.trim().is_empty() {
        DEFAULT_BASE_NAME
    } else {
        base
    }
}

/// Split a PDF into single-page files named `{base}_{i}.pdf`, 1-indexed.
///
/// Existing files of the same name are overwritten.
///
/// # Example
///
/// ```no_run
/// use pdf_tools::pdf::{SplitOptions, split_pdf};
/// use std::path::PathBuf;
///
/// let options = SplitOptions {
///     input_path: PathBuf::from("report.pdf"),
///     output_dir: PathBuf::from("pages"),
///     base_name: "report".to_string(),
/// };
///
/// let report = split_pdf(&options).expect("Failed to split");
/// println!("{}", report.summary());
/// ```
pub fn split_pdf(options: &SplitOptions) -> Result<SplitReport> {
    if !options.input_path.exists() {
        return Err(Error::FileNotFound(options.input_path.clone()));
    }
    if !options.output_dir.is_dir() {
        return Err(Error::OutputDirNotFound(options.output_dir.clone()));
    }

    let doc = Document::load(&options.input_path)?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(Error::EmptyPdf(options.input_path.clone()));
    }

    let base = effective_base_name(&options.base_name);
    let mut output_paths = Vec::with_capacity(pages.len());

    for (i, (_page_num, page_id)) in pages.iter().enumerate() {
        // Each output starts as a full copy, then the page tree is cut
        // down to the one page and orphaned objects are pruned
        let mut single = doc.clone();
        keep_single_page(&mut single, *page_id)?;
        single.prune_objects();
        single.compress();

        let path = options.output_dir.join(format!("{}_{}.pdf", base, i + 1));
        single.save(&path)?;
        output_paths.push(path);
    }

    Ok(SplitReport {
        output_dir: options.output_dir.clone(),
        output_paths,
    })
}

/// Rewire the root Pages node so the document contains only `page_id`
fn keep_single_page(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("Document has no catalog".to_string()))?;

    let pages_id = doc
        .get_object(catalog_id)?
        .as_dict()?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("Catalog has no Pages reference".to_string()))?;

    if let Ok(Object::Dictionary(ref mut pages)) = doc.get_object_mut(pages_id) {
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", Object::Integer(1));
    }

    if let Ok(Object::Dictionary(ref mut page)) = doc.get_object_mut(page_id) {
        page.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}
