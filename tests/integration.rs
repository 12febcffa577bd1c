//! Integration tests for the PDF tools library
//!
//! Fixture PDFs are generated in-test: one page per marker string, each
//! page drawing its marker as text so page identity and ordering can be
//! asserted after an operation.

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use tempfile::TempDir;

use pdf_tools::config::load_watermark_text;
use pdf_tools::pdf::{
    count_pages, extract_metadata, merge_pdfs, merge_pdfs_with_progress, split_pdf,
    watermark_pdf, watermarked_output_path, MergeOptions, Rgb, SplitOptions, WatermarkOptions,
};
use pdf_tools::Error;

/// Build a PDF at `path` with one page per marker, US Letter sized
fn write_pdf(path: &Path, page_markers: &[&str]) {
    write_pdf_sized(path, page_markers, [0, 0, 612, 792]);
}

/// Build a PDF at `path` with one page per marker and the given MediaBox
fn write_pdf_sized(path: &Path, page_markers: &[&str], media_box: [i64; 4]) {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]);
    let font_id = doc.add_object(font);

    let mut page_ids = Vec::new();
    for marker in page_markers {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        marker.to_string().into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id =
            doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let resources = Dictionary::from_iter(vec![(
            "Font",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "F1",
                Object::Reference(font_id),
            )])),
        )]);

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(media_box.iter().map(|&v| Object::Integer(v)).collect()),
            ),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Dictionary(resources)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_markers.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc.save(path).expect("Failed to write fixture PDF");
}

/// Decoded content streams of every page, in page order
fn page_contents(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let bytes = doc
                .get_page_content(page_id)
                .expect("Failed to read page content");
            String::from_utf8_lossy(&bytes).into_owned()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Merge

#[test]
fn test_merge_combines_pages_in_input_order() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    write_pdf(&a, &["A1", "A2"]);
    write_pdf(&b, &["B1", "B2", "B3"]);

    let output = dir.path().join("merged.pdf");
    let options = MergeOptions {
        input_paths: vec![a, b],
        output_path: output.clone(),
    };

    merge_pdfs(&options).expect("Failed to merge");

    // Verify output exists with the combined page count
    assert!(output.exists(), "Merged PDF was not created");
    assert_eq!(count_pages(&output).unwrap(), 5);

    let contents = page_contents(&output);
    let expected = ["A1", "A2", "B1", "B2", "B3"];
    assert_eq!(contents.len(), expected.len());
    for (content, marker) in contents.iter().zip(expected) {
        assert!(
            content.contains(&format!("({marker}) Tj")),
            "Expected marker {marker} in page content"
        );
    }

    println!("✓ Merged 5 pages in input order");
}

#[test]
fn test_merge_report_lists_inputs_with_page_counts() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let a = dir.path().join("a.pdf");
    let b = dir.path().join("b.pdf");
    write_pdf(&a, &["A1", "A2"]);
    write_pdf(&b, &["B1", "B2", "B3"]);

    let output = dir.path().join("merged.pdf");
    let options = MergeOptions {
        input_paths: vec![a, b],
        output_path: output,
    };

    let report = merge_pdfs(&options).expect("Failed to merge");

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.files[0].name, "a.pdf");
    assert_eq!(report.files[0].page_count, 2);
    assert_eq!(report.files[1].name, "b.pdf");
    assert_eq!(report.files[1].page_count, 3);
    assert_eq!(report.total_pages(), 5);

    assert_eq!(
        report.summary(),
        "Merged 2 PDFs into merged.pdf:\n\na.pdf - 2 pages\nb.pdf - 3 pages\n"
    );
}

#[test]
fn test_merge_progress_counts_each_file() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let mut input_paths = Vec::new();
    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        let path = dir.path().join(name);
        write_pdf(&path, &[name]);
        input_paths.push(path);
    }

    let options = MergeOptions {
        input_paths,
        output_path: dir.path().join("merged.pdf"),
    };

    let mut seen = Vec::new();
    merge_pdfs_with_progress(&options, |done, total| seen.push((done, total)))
        .expect("Failed to merge");

    assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
}

#[test]
fn test_merge_rejects_zero_page_input() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let empty = dir.path().join("empty.pdf");
    write_pdf(&empty, &[]);

    let options = MergeOptions {
        input_paths: vec![empty],
        output_path: dir.path().join("merged.pdf"),
    };

    let result = merge_pdfs(&options);
    assert!(matches!(result.unwrap_err(), Error::EmptyPdf(_)));
}

// ---------------------------------------------------------------------------
// Split

#[test]
fn test_split_writes_one_file_per_page() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1", "P2", "P3"]);

    let out_dir = dir.path().join("pages");
    fs::create_dir(&out_dir).unwrap();

    let options = SplitOptions {
        input_path: input,
        output_dir: out_dir.clone(),
        base_name: "report".to_string(),
    };

    let report = split_pdf(&options).expect("Failed to split");
    assert_eq!(report.page_count(), 3);

    for (i, marker) in ["P1", "P2", "P3"].iter().enumerate() {
        let path = out_dir.join(format!("report_{}.pdf", i + 1));
        assert!(path.exists(), "Missing output file {}", path.display());
        assert_eq!(count_pages(&path).unwrap(), 1);

        let contents = page_contents(&path);
        assert!(
            contents[0].contains(&format!("({marker}) Tj")),
            "Page {} should carry marker {marker}",
            i + 1
        );
    }
    assert!(!out_dir.join("report_4.pdf").exists());

    println!("✓ Split 3 pages into 3 single-page files");
}

#[test]
fn test_split_defaults_base_name_to_page() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1", "P2"]);

    let options = SplitOptions {
        input_path: input,
        output_dir: dir.path().to_path_buf(),
        base_name: String::new(),
    };

    split_pdf(&options).expect("Failed to split");

    assert!(dir.path().join("page_1.pdf").exists());
    assert!(dir.path().join("page_2.pdf").exists());
}

#[test]
fn test_split_overwrites_existing_files() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1"]);

    let stale = dir.path().join("page_1.pdf");
    fs::write(&stale, b"stale data").unwrap();

    let options = SplitOptions {
        input_path: input,
        output_dir: dir.path().to_path_buf(),
        base_name: "page".to_string(),
    };

    split_pdf(&options).expect("Failed to split");

    // The stale file was silently replaced with a valid single-page PDF
    assert_eq!(count_pages(&stale).unwrap(), 1);
}

#[test]
fn test_split_requires_existing_output_dir() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1"]);

    let options = SplitOptions {
        input_path: input,
        output_dir: dir.path().join("missing"),
        base_name: "page".to_string(),
    };

    let result = split_pdf(&options);
    assert!(matches!(result.unwrap_err(), Error::OutputDirNotFound(_)));
}

// ---------------------------------------------------------------------------
// Watermark

fn visible_options(text: &str) -> WatermarkOptions {
    WatermarkOptions {
        text: text.to_string(),
        color: Rgb::new(0.8, 0.8, 0.8),
        ..Default::default()
    }
}

#[test]
fn test_watermark_stamps_every_page_over_original_content() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("report.pdf");
    write_pdf(&input, &["P1", "P2"]);

    let output = watermarked_output_path(&input, dir.path());
    assert_eq!(output, dir.path().join("report_watermarked.pdf"));

    watermark_pdf(&input, &output, &visible_options("CONFIDENTIAL"))
        .expect("Failed to watermark");

    assert_eq!(count_pages(&output).unwrap(), 2);

    let contents = page_contents(&output);
    for (content, marker) in contents.iter().zip(["P1", "P2"]) {
        assert!(
            content.contains(&format!("({marker}) Tj")),
            "Original content of {marker} must survive"
        );
        assert!(content.contains("(CONFIDENTIAL) Tj"));

        // Stamp is drawn after (on top of) the original content
        let original_at = content.find(&format!("({marker}) Tj")).unwrap();
        let stamp_at = content.find("(CONFIDENTIAL) Tj").unwrap();
        assert!(original_at < stamp_at);
    }

    println!("✓ Watermark stamped on top of every page");
}

#[test]
fn test_watermark_preserves_page_dimensions() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("a4ish.pdf");
    write_pdf_sized(&input, &["P1"], [0, 0, 595, 842]);

    let output = dir.path().join("out.pdf");
    watermark_pdf(&input, &output, &visible_options("DRAFT")).expect("Failed to watermark");

    let doc = Document::load(&output).unwrap();
    let page_id = doc.get_pages().into_values().next().unwrap();
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();

    let media_box = match page.get(b"MediaBox").unwrap() {
        Object::Array(arr) => arr.clone(),
        other => panic!("MediaBox is not an array: {other:?}"),
    };
    let values: Vec<i64> = media_box.iter().map(|o| o.as_i64().unwrap()).collect();
    assert_eq!(values, vec![0, 0, 595, 842]);
}

#[test]
fn test_watermark_renders_stacked_lines() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1"]);

    let output = dir.path().join("out.pdf");
    // The two-character token, not a newline, separates the lines
    watermark_pdf(&input, &output, &visible_options("TOP\\nBOTTOM"))
        .expect("Failed to watermark");

    let content = &page_contents(&output)[0];
    assert!(content.contains("(TOP) Tj"));
    assert!(content.contains("(BOTTOM) Tj"));
    // Default 22pt line height puts the lines 11pt above and below center
    assert!(content.contains(" 11 Tm"));
    assert!(content.contains(" -11 Tm"));
}

#[test]
fn test_watermark_scales_overlay_when_requested() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("half.pdf");
    // Half of US Letter in both directions, so the scale factors are 0.5
    write_pdf_sized(&input, &["P1"], [0, 0, 306, 396]);

    let scaled = dir.path().join("scaled.pdf");
    let options = WatermarkOptions {
        scale_to_page: true,
        ..visible_options("FIT")
    };
    watermark_pdf(&input, &scaled, &options).expect("Failed to watermark");
    assert!(page_contents(&scaled)[0].contains("0.5 0 0 0.5 0 0 cm"));

    let unscaled = dir.path().join("unscaled.pdf");
    watermark_pdf(&input, &unscaled, &visible_options("FIT")).expect("Failed to watermark");
    assert!(!page_contents(&unscaled)[0].contains("0.5 0 0 0.5 0 0 cm"));
}

#[test]
fn test_watermark_text_from_config_file() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let config = dir.path().join("gdpr_watermark.json");
    // JSON escapes the backslash; the parsed text holds the literal token
    fs::write(&config, r#"{ "watermark_text": "LINE1\\nLINE2" }"#).unwrap();

    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1"]);

    let text = load_watermark_text(&config).expect("Failed to load config");
    let options = WatermarkOptions {
        color: Rgb::new(0.8, 0.8, 0.8),
        text,
        ..Default::default()
    };

    let output = dir.path().join("out.pdf");
    watermark_pdf(&input, &output, &options).expect("Failed to watermark");

    let content = &page_contents(&output)[0];
    assert!(content.contains("(LINE1) Tj"));
    assert!(content.contains("(LINE2) Tj"));
}

#[test]
fn test_watermark_aborts_on_missing_config_before_writing() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1"]);

    let output = watermarked_output_path(&input, dir.path());

    // Loading the text is the first step; when it fails nothing runs
    let result = load_watermark_text(&dir.path().join("missing.json"));
    assert!(matches!(result.unwrap_err(), Error::Config(_)));
    assert!(!output.exists());
}

// ---------------------------------------------------------------------------
// Metadata

#[test]
fn test_extract_metadata_reports_page_count() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("input.pdf");
    write_pdf(&input, &["P1", "P2"]);

    let metadata = extract_metadata(&input).expect("Failed to read metadata");
    assert_eq!(metadata.page_count, 2);
    assert_eq!(metadata.title, None);
    assert_eq!(metadata.author, None);
}

#[test]
fn test_extract_metadata_reads_info_dictionary() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("titled.pdf");
    write_pdf(&input, &["P1"]);

    // Attach an Info dictionary with title and author
    let mut doc = Document::load(&input).unwrap();
    let mut info = Dictionary::new();
    info.set(
        "Title",
        Object::String(b"Quarterly Report".to_vec(), lopdf::StringFormat::Literal),
    );
    info.set(
        "Author",
        Object::String(b"Jane Doe".to_vec(), lopdf::StringFormat::Literal),
    );
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));
    doc.save(&input).unwrap();

    let metadata = extract_metadata(&input).expect("Failed to read metadata");
    assert_eq!(metadata.page_count, 1);
    assert_eq!(metadata.title.as_deref(), Some("Quarterly Report"));
    assert_eq!(metadata.author.as_deref(), Some("Jane Doe"));
}
