//! Watermark overlay page construction
//!
//! Builds a single-page document containing only the watermark text,
//! rotated 45 degrees counterclockwise about the page center. The page is
//! never saved on its own; it is stamped onto each page of a target
//! document by the watermark module.

use lopdf::{Dictionary, Document, Object, Stream};

use crate::error::{Error, Result};
use crate::layout::PageDimensions;

/// Two-character line-break token recognized inside watermark text:
/// a backslash followed by `n`. A native newline is not a separator.
pub const LINE_BREAK_TOKEN: &str = "\\n";

/// Resource name the watermark font is registered under. Deliberately not
/// `F1`, which most generators use for the page's own first font; the
/// overlay's resources are merged into each target page when stamping.
const FONT_RESOURCE_NAME: &str = "Fw1";

/// RGB fill color with components in 0.0..=1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex color (leading `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }

        let channel = |s: &str| -> Result<f32> {
            let value =
                u8::from_str_radix(s, 16).map_err(|_| Error::InvalidColor(hex.to_string()))?;
            Ok(f32::from(value) / 255.0)
        };

        Ok(Self {
            r: channel(&digits[0..2])?,
            g: channel(&digits[2..4])?,
            b: channel(&digits[4..6])?,
        })
    }
}

/// Options for building a watermark overlay
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    /// Text to stamp; [`LINE_BREAK_TOKEN`] marks line breaks
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Vertical distance between stacked lines, in points
    pub line_height: f32,
    /// Fill color of the stamp text. The default is white, which is
    /// invisible against a white page; pass a darker color for a
    /// visible stamp.
    pub color: Rgb,
    /// Size of the overlay page
    pub page_size: PageDimensions,
    /// Stretch the overlay to each target page's MediaBox when stamping.
    /// Off by default; the overlay then keeps its own size regardless of
    /// the target page's.
    pub scale_to_page: bool,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            text: "Confidential".to_string(),
            font_size: 10.0,
            line_height: 22.0,
            color: Rgb::new(1.0, 1.0, 1.0),
            page_size: PageDimensions::letter(),
            scale_to_page: false,
        }
    }
}

/// Split watermark text on the literal `\n` token
fn split_lines(text: &str) -> Vec<&str> {
    text.split(LINE_BREAK_TOKEN).collect()
}

/// Vertical offset of line `i` of `n` along the rotated axis.
///
/// The line block is centered on the rotation point: the first line sits
/// highest and each following line steps down by one line height.
fn line_y_offset(i: usize, n: usize, line_height: f32) -> f32 {
    (n as f32 - 1.0) * line_height / 2.0 - i as f32 * line_height
}

/// Helvetica glyph widths for characters 32-126, in 1/1000ths of the
/// em square (Adobe AFM metrics; Helvetica is a standard base-14 font,
/// so only the metrics are needed, not the font program)
const HELVETICA_WIDTHS: [i64; 95] = [
    278,  // 32 space
    278,  // 33 !
    355,  // 34 "
    556,  // 35 #
    556,  // 36 $
    889,  // 37 %
    667,  // 38 &
    191,  // 39 '
    333,  // 40 (
    333,  // 41 )
    389,  // 42 *
    584,  // 43 +
    278,  // 44 ,
    333,  // 45 -
    278,  // 46 .
    278,  // 47 /
    556,  // 48 0
    556,  // 49 1
    556,  // 50 2
    556,  // 51 3
    556,  // 52 4
    556,  // 53 5
    556,  // 54 6
    556,  // 55 7
    556,  // 56 8
    556,  // 57 9
    278,  // 58 :
    278,  // 59 ;
    584,  // 60 <
    584,  // 61 =
    584,  // 62 >
    556,  // 63 ?
    1015, // 64 @
    667,  // 65 A
    667,  // 66 B
    722,  // 67 C
    722,  // 68 D
    667,  // 69 E
    611,  // 70 F
    778,  // 71 G
    722,  // 72 H
    278,  // 73 I
    500,  // 74 J
    667,  // 75 K
    556,  // 76 L
    833,  // 77 M
    722,  // 78 N
    778,  // 79 O
    667,  // 80 P
    778,  // 81 Q
    722,  // 82 R
    667,  // 83 S
    611,  // 84 T
    722,  // 85 U
    667,  // 86 V
    944,  // 87 W
    667,  // 88 X
    667,  // 89 Y
    611,  // 90 Z
    278,  // 91 [
    278,  // 92 \
    278,  // 93 ]
    469,  // 94 ^
    556,  // 95 _
    333,  // 96 `
    556,  // 97 a
    556,  // 98 b
    500,  // 99 c
    556,  // 100 d
    556,  // 101 e
    278,  // 102 f
    556,  // 103 g
    556,  // 104 h
    222,  // 105 i
    222,  // 106 j
    500,  // 107 k
    222,  // 108 l
    833,  // 109 m
    556,  // 110 n
    556,  // 111 o
    556,  // 112 p
    556,  // 113 q
    333,  // 114 r
    500,  // 115 s
    278,  // 116 t
    556,  // 117 u
    500,  // 118 v
    722,  // 119 w
    500,  // 120 x
    500,  // 121 y
    500,  // 122 z
    334,  // 123 {
    260,  // 124 |
    334,  // 125 }
    584,  // 126 ~
];

fn char_width(c: char) -> i64 {
    let code = c as u32;
    if (32..=126).contains(&code) {
        HELVETICA_WIDTHS[(code - 32) as usize]
    } else {
        // Fallback for characters outside the table (digit width)
        556
    }
}

/// Width of a string in points at the given font size
fn text_width(text: &str, font_size: f32) -> f32 {
    let units: i64 = text.chars().map(char_width).sum();
    units as f32 * font_size / 1000.0
}

/// Escape special characters in PDF strings
fn escape_pdf_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

/// Generate the content stream that draws the rotated watermark text.
///
/// The coordinate system is translated to the page center and rotated 45
/// degrees counterclockwise; each line is then drawn centered on the
/// rotated vertical axis at its stacking offset.
fn generate_watermark_content(options: &WatermarkOptions) -> String {
    let lines = split_lines(&options.text);
    let cx = options.page_size.width.pt() as f32 / 2.0;
    let cy = options.page_size.height.pt() as f32 / 2.0;
    // cos 45 = sin 45 = 1/sqrt(2)
    let rot = std::f32::consts::FRAC_1_SQRT_2;

    let mut content = String::new();
    content.push_str("q\n");
    content.push_str(&format!("{} {} {} {} {} {} cm\n", rot, rot, -rot, rot, cx, cy));
    content.push_str(&format!(
        "{} {} {} rg\n",
        options.color.r, options.color.g, options.color.b
    ));

    for (i, line) in lines.iter().enumerate() {
        let x = -text_width(line, options.font_size) / 2.0;
        let y = line_y_offset(i, lines.len(), options.line_height);

        content.push_str("BT\n");
        content.push_str(&format!("/{} {} Tf\n", FONT_RESOURCE_NAME, options.font_size));
        content.push_str(&format!("1 0 0 1 {} {} Tm\n", x, y));
        content.push_str(&format!("({}) Tj\n", escape_pdf_string(line)));
        content.push_str("ET\n");
    }

    content.push_str("Q\n");
    content
}

/// Helvetica as a simple Type1 font dictionary (one of the 14 standard
/// PDF fonts, so no font program is embedded)
fn helvetica_font() -> Dictionary {
    let mut font = Dictionary::new();
    font.set("Type", Object::Name(b"Font".to_vec()));
    font.set("Subtype", Object::Name(b"Type1".to_vec()));
    font.set("BaseFont", Object::Name(b"Helvetica".to_vec()));
    font
}

/// Build the single-page overlay document holding the rendered watermark
pub fn build_overlay(options: &WatermarkOptions) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(Object::Dictionary(helvetica_font()));

    let mut fonts = Dictionary::new();
    fonts.set(FONT_RESOURCE_NAME, Object::Reference(font_id));
    let mut resources = Dictionary::new();
    resources.set("Font", Object::Dictionary(fonts));

    let content = generate_watermark_content(options);
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    let width = options.page_size.width.pt() as f32;
    let height = options.page_size.height.pt() as f32;

    let page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(width),
                Object::Real(height),
            ]),
        ),
        ("Contents", Object::Reference(content_id)),
        // Resources stay inline on the page so they merge cleanly into
        // target pages when the overlay is stamped
        ("Resources", Object::Dictionary(resources)),
    ]);
    let page_id = doc.add_object(page);

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(1)),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}
