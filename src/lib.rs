//! PDF Tools Library
//!
//! A cross-platform library for everyday PDF handling. This library
//! provides functionality to:
//! - Merge multiple PDF files into one
//! - Split a PDF into one file per page
//! - Stamp a diagonal watermark onto every page
//! - Extract metadata (page counts, title, author)
//!
//! # Example
//!
//! ```no_run
//! use pdf_tools::pdf::{MergeOptions, merge_pdfs};
//! use std::path::PathBuf;
//!
//! let options = MergeOptions {
//!     input_paths: vec![
//!         PathBuf::from("1. intro.pdf"),
//!         PathBuf::from("2. advanced.pdf"),
//!     ],
//!     output_path: PathBuf::from("merged.pdf"),
//! };
//!
//! let report = merge_pdfs(&options).expect("Failed to merge PDFs");
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod pdf;

// Re-export commonly used items
pub use error::{Error, Result};
