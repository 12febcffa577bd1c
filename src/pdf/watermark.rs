//! Stamping a watermark overlay onto every page of a document

use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::pdf::overlay::{build_overlay, WatermarkOptions};

/// Derive the output path for a watermarked copy of `input_path`:
/// `{output_dir}/{input base name}_watermarked.pdf`
pub fn watermarked_output_path(input_path: &Path, output_dir: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    output_dir.join(format!("{stem}_watermarked.pdf"))
}

/// Stamp the watermark described by `options` onto every page of a PDF.
///
/// The original page content is preserved and the watermark is drawn on
/// top of it; page count and dimensions do not change. The overlay keeps
/// its configured size unless `options.scale_to_page` is set, in which
/// case it is stretched to each page's MediaBox.
///
/// # Example
///
/// ```no_run
/// use pdf_tools::pdf::{WatermarkOptions, watermark_pdf};
/// use std::path::Path;
///
/// let options = WatermarkOptions {
///     text: "Confidential\\nDo not distribute".to_string(),
///     ..Default::default()
/// };
///
/// watermark_pdf(
///     Path::new("report.pdf"),
///     Path::new("report_watermarked.pdf"),
///     &options,
/// ).expect("Failed to watermark");
/// ```
pub fn watermark_pdf(input_path: &Path, output_path: &Path, options: &WatermarkOptions) -> Result<()> {
    if !input_path.exists() {
        return Err(Error::FileNotFound(input_path.to_path_buf()));
    }
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(Error::OutputDirNotFound(parent.to_path_buf()));
        }
    }

    let mut doc = Document::load(input_path)?;
    let pages = doc.get_pages();
    if pages.is_empty() {
        return Err(Error::EmptyPdf(input_path.to_path_buf()));
    }

    // Build the overlay and renumber it past the source's ID space so its
    // objects can be imported without collisions
    let mut overlay = build_overlay(options);
    overlay.renumber_objects_with(doc.max_id + 1);

    let overlay_page_id = overlay
        .get_pages()
        .into_values()
        .next()
        .ok_or_else(|| Error::General("Overlay has no page".to_string()))?;

    let (overlay_content_refs, overlay_resources) = {
        let page = overlay.get_object(overlay_page_id)?.as_dict()?;

        let content_refs = match page.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![Object::Reference(*id)],
            Ok(Object::Array(arr)) => arr.clone(),
            _ => vec![],
        };
        let resources = page
            .get(b"Resources")
            .ok()
            .cloned()
            .unwrap_or_else(|| Object::Dictionary(Dictionary::new()));

        (content_refs, resources)
    };

    // Import the overlay's objects, skipping its document structure; only
    // the content stream and its resources are wanted
    for (id, object) in overlay.objects.iter() {
        match object.type_name().unwrap_or(b"") {
            b"Catalog" | b"Pages" | b"Page" => {}
            _ => {
                doc.objects.insert(*id, object.clone());
            }
        }
    }
    doc.max_id = overlay.max_id;

    // One shared save/restore pair brackets the original content of every
    // page, so unbalanced graphics state in a source page cannot displace
    // the stamp
    let push_state_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let pop_state_id = doc.add_object(Stream::new(Dictionary::new(), b"Q\n".to_vec()));

    let overlay_width = options.page_size.width.pt() as f32;
    let overlay_height = options.page_size.height.pt() as f32;

    for page_id in pages.into_values() {
        let scale_id = if options.scale_to_page {
            scale_stream(&mut doc, page_id, overlay_width, overlay_height)?
        } else {
            None
        };

        let resources = merge_resources(
            resolve_page_resources(&doc, page_id)?,
            &overlay_resources,
        );

        let mut original = original_content_refs(&mut doc, page_id)?;

        let page_obj = doc.get_object_mut(page_id)?;
        if let Object::Dictionary(ref mut page_dict) = page_obj {
            let mut contents: Vec<Object> =
                Vec::with_capacity(original.len() + overlay_content_refs.len() + 4);
            contents.push(Object::Reference(push_state_id));
            contents.append(&mut original);
            contents.push(Object::Reference(pop_state_id));

            if let Some(scale_id) = scale_id {
                contents.push(Object::Reference(scale_id));
            }
            contents.extend(overlay_content_refs.iter().cloned());
            if scale_id.is_some() {
                contents.push(Object::Reference(pop_state_id));
            }

            page_dict.set("Contents", Object::Array(contents));
            page_dict.set("Resources", Object::Dictionary(resources));
        }
    }

    doc.compress();
    doc.save(output_path)?;

    Ok(())
}

/// Collect a page's existing Contents as an array of references. A bare
/// content stream sitting inline in the page dictionary is promoted to
/// its own object first.
fn original_content_refs(doc: &mut Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let existing = {
        let page = doc.get_object(page_id)?.as_dict()?;
        page.get(b"Contents").ok().cloned()
    };

    Ok(match existing {
        Some(Object::Reference(id)) => vec![Object::Reference(id)],
        Some(Object::Array(arr)) => arr,
        Some(other) => {
            let id = doc.add_object(other);
            vec![Object::Reference(id)]
        }
        None => vec![],
    })
}

/// Build the `q ... cm` stream that stretches the overlay to this page's
/// MediaBox. Returns `None` when the page already matches the overlay size.
fn scale_stream(
    doc: &mut Document,
    page_id: ObjectId,
    overlay_width: f32,
    overlay_height: f32,
) -> Result<Option<ObjectId>> {
    let media_box = get_media_box(doc, page_id)?;
    let sx = (media_box[2] - media_box[0]) / overlay_width;
    let sy = (media_box[3] - media_box[1]) / overlay_height;

    if (sx - 1.0).abs() < 0.001 && (sy - 1.0).abs() < 0.001 {
        return Ok(None);
    }

    let content = format!("q\n{sx} 0 0 {sy} 0 0 cm\n");
    let id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
    Ok(Some(id))
}

/// Resolve a page's MediaBox, walking up Parent nodes when the page
/// inherits it. Falls back to US Letter.
fn get_media_box(doc: &Document, page_id: ObjectId) -> Result<[f32; 4]> {
    let page = doc.get_object(page_id)?;
    Ok(media_box_recursive(doc, page, 10))
}

fn media_box_recursive(doc: &Document, obj: &Object, depth: usize) -> [f32; 4] {
    const LETTER: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

    if depth == 0 {
        return LETTER;
    }

    if let Object::Dictionary(dict) = obj {
        if let Ok(media_box_obj) = dict.get(b"MediaBox") {
            let arr = match media_box_obj {
                Object::Array(arr) => Some(arr.clone()),
                Object::Reference(ref_id) => match doc.get_object(*ref_id) {
                    Ok(Object::Array(arr)) => Some(arr.clone()),
                    _ => None,
                },
                _ => None,
            };

            if let Some(arr) = arr {
                let values: Vec<f32> = arr
                    .iter()
                    .filter_map(|o| match o {
                        Object::Integer(i) => Some(*i as f32),
                        Object::Real(r) => Some(*r),
                        _ => None,
                    })
                    .collect();

                if values.len() == 4 {
                    return [values[0], values[1], values[2], values[3]];
                }
            }
        }

        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            if let Ok(parent) = doc.get_object(*parent_id) {
                return media_box_recursive(doc, parent, depth - 1);
            }
        }
    }

    LETTER
}

/// A page's Resources dictionary as an owned copy, dereferenced if stored
/// as an indirect reference. Walks up Parent nodes when the page inherits
/// its resources, so a page that had none of its own still renders after
/// its Resources entry is rewritten.
fn resolve_page_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let page = doc.get_object(page_id)?;
    Ok(resources_recursive(doc, page, 10))
}

fn resources_recursive(doc: &Document, obj: &Object, depth: usize) -> Dictionary {
    if depth == 0 {
        return Dictionary::new();
    }

    if let Object::Dictionary(dict) = obj {
        match dict.get(b"Resources") {
            Ok(Object::Dictionary(resources)) => return resources.clone(),
            Ok(Object::Reference(id)) => {
                if let Ok(Object::Dictionary(resources)) = doc.get_object(*id) {
                    return resources.clone();
                }
            }
            _ => {}
        }

        if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
            if let Ok(parent) = doc.get_object(*parent_id) {
                return resources_recursive(doc, parent, depth - 1);
            }
        }
    }

    Dictionary::new()
}

/// Merge the overlay's resources into a page's. Resource categories
/// present on both sides (Font, XObject, ...) are merged entry by entry;
/// on a name collision the overlay's entry wins.
fn merge_resources(mut base: Dictionary, overlay_resources: &Object) -> Dictionary {
    if let Object::Dictionary(overlay_dict) = overlay_resources {
        for (key, value) in overlay_dict.iter() {
            match (base.get(key).ok().cloned(), value) {
                (Some(Object::Dictionary(mut existing)), Object::Dictionary(incoming)) => {
                    for (subkey, subvalue) in incoming.iter() {
                        existing.set(subkey.clone(), subvalue.clone());
                    }
                    base.set(key.clone(), Object::Dictionary(existing));
                }
                _ => {
                    base.set(key.clone(), value.clone());
                }
            }
        }
    }
    base
}
