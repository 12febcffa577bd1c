//! PDF Tools CLI
//!
//! A command-line tool for merging, splitting, and watermarking PDFs.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;

use pdf_tools::config::{load_watermark_text, DEFAULT_CONFIG_FILE};
use pdf_tools::layout::PageDimensions;
use pdf_tools::pdf::{
    extract_metadata, merge_pdfs_with_progress, split_pdf, watermark_pdf,
    watermarked_output_path, MergeOptions, Rgb, SplitOptions, WatermarkOptions,
};
use pdf_tools::Error;

/// PDF Tools - Merge, split, and watermark PDF files
#[derive(Parser)]
#[command(name = "pdf-tools")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Merge PDFs in order
    pdf-tools merge part1.pdf part2.pdf -o combined.pdf

    # Merge numbered PDFs with a glob
    pdf-tools merge \"[0-9]*.pdf\" -o combined.pdf

    # Split into one file per page
    pdf-tools split report.pdf -d pages --base-name report

    # Watermark every page, reading the text from gdpr_watermark.json
    pdf-tools watermark contract.pdf -d out --color \"#c0c0c0\"

    # Watermark and open the result
    pdf-tools watermark contract.pdf -d out --open")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge multiple PDF files into one
    Merge {
        /// Input PDF files (in order). Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PDF file path
        #[arg(short, long)]
        output: PathBuf,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Split a PDF into one file per page
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Directory that receives the per-page files
        #[arg(short = 'd', long)]
        output_dir: PathBuf,

        /// Base name for the output files; page i is written as {base}_{i}.pdf
        #[arg(long, default_value = "page")]
        base_name: String,

        /// Open the output directory afterwards
        #[arg(long)]
        open: bool,
    },

    /// Stamp a diagonal watermark onto every page of a PDF
    Watermark {
        /// Input PDF file
        input: PathBuf,

        /// Directory that receives {input}_watermarked.pdf
        #[arg(short = 'd', long)]
        output_dir: PathBuf,

        /// Watermark text configuration file (JSON with a "watermark_text"
        /// key; use the two-character token \n inside the text for line
        /// breaks)
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Font size in points
        #[arg(long, default_value_t = 10.0)]
        font_size: f32,

        /// Distance between stacked lines in points
        #[arg(long, default_value_t = 22.0)]
        line_height: f32,

        /// Text color as #rrggbb. The default white is invisible against
        /// a white page
        #[arg(long, default_value = "#ffffff")]
        color: String,

        /// Overlay page size: letter or a4
        #[arg(long, default_value = "letter")]
        page_size: String,

        /// Stretch the overlay to each page's size
        #[arg(long)]
        scale_to_page: bool,

        /// Open the output file after creation
        #[arg(long)]
        open: bool,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Merge { inputs, output, open } => cmd_merge(inputs, output, open),
        Commands::Split {
            input,
            output_dir,
            base_name,
            open,
        } => cmd_split(input, output_dir, base_name, open),
        Commands::Watermark {
            input,
            output_dir,
            config,
            font_size,
            line_height,
            color,
            page_size,
            scale_to_page,
            open,
        } => cmd_watermark(
            input,
            output_dir,
            config,
            font_size,
            line_height,
            color,
            page_size,
            scale_to_page,
            open,
        ),
        Commands::Info { input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Expand glob patterns in input paths
fn expand_globs(patterns: Vec<String>) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let entries =
                glob(&pattern).map_err(|e| Error::InvalidGlob(format!("{pattern}: {e}")))?;

            let mut matched = false;
            for entry in entries {
                match entry {
                    Ok(path) => {
                        paths.push(path);
                        matched = true;
                    }
                    Err(e) => eprintln!("Warning: glob error for {}: {}", pattern, e),
                }
            }
            if !matched {
                return Err(Error::NoFilesMatched(pattern).into());
            }
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    // Sort paths for consistent ordering
    paths.sort();

    Ok(paths)
}

/// Open a file or directory with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

/// Merge multiple PDFs into one
fn cmd_merge(inputs: Vec<String>, output: PathBuf, open: bool) -> Result<()> {
    let inputs = expand_globs(inputs)?;

    eprintln!("Merging {} PDF files...", inputs.len());

    let options = MergeOptions {
        input_paths: inputs,
        output_path: output.clone(),
    };

    let report = merge_pdfs_with_progress(&options, |done, total| {
        eprintln!(
            "  [{}/{}] {}",
            done,
            total,
            options.input_paths[done - 1].display()
        );
    })?;

    print!("{}", report.summary());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Split a PDF into one file per page
fn cmd_split(input: PathBuf, output_dir: PathBuf, base_name: String, open: bool) -> Result<()> {
    let options = SplitOptions {
        input_path: input,
        output_dir: output_dir.clone(),
        base_name,
    };

    let report = split_pdf(&options)?;

    println!("{}", report.summary());

    if open {
        open_file(&output_dir)?;
    }

    Ok(())
}

/// Watermark every page of a PDF
#[allow(clippy::too_many_arguments)]
fn cmd_watermark(
    input: PathBuf,
    output_dir: PathBuf,
    config: PathBuf,
    font_size: f32,
    line_height: f32,
    color: String,
    page_size: String,
    scale_to_page: bool,
    open: bool,
) -> Result<()> {
    // Read the watermark text first: a broken config aborts the run
    // before any output exists
    let text = load_watermark_text(&config)?;

    let options = WatermarkOptions {
        text,
        font_size,
        line_height,
        color: Rgb::from_hex(&color)?,
        page_size: page_size.parse::<PageDimensions>()?,
        scale_to_page,
    };

    let output = watermarked_output_path(&input, &output_dir);
    watermark_pdf(&input, &output, &options)
        .with_context(|| format!("Failed to watermark {}", input.display()))?;

    println!("Watermarked file saved as: {}", output.display());

    if open {
        open_file(&output)?;
    }

    Ok(())
}

/// Show information about a PDF
fn cmd_info(input: PathBuf) -> Result<()> {
    let metadata = extract_metadata(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    Ok(())
}
