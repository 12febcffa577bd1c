//! PDF manipulation module

pub mod merge;
pub mod metadata;
pub mod overlay;
pub mod split;
pub mod watermark;

// Re-export commonly used items
pub use merge::{merge_pdfs, merge_pdfs_with_progress, MergeOptions, MergeReport, MergedFile};
pub use metadata::{count_pages, extract_metadata, PdfMetadata};
pub use overlay::{build_overlay, Rgb, WatermarkOptions, LINE_BREAK_TOKEN};
pub use split::{split_pdf, SplitOptions, SplitReport, DEFAULT_BASE_NAME};
pub use watermark::{watermark_pdf, watermarked_output_path};
