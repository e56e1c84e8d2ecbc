//! Output assembly: per-slide PNG files and the combined PDF.
//!
//! ## PDF layout
//!
//! One page per slide. The page size is taken from the *first* image with
//! 1 px = 1 pt, and every image is drawn full-page at the origin with no
//! margin; an image of a different size is scaled to fit the first one's
//! page. Pixels are embedded as Flate-compressed DeviceRGB so the PDF is
//! lossless (alpha is dropped).
//!
//! Decoding and compression are CPU-bound, so [`write_pdf`] runs them in
//! `spawn_blocking` and keeps the tokio workers free.

use crate::error::CarouselError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the assembled PDF inside the output directory.
pub const PDF_FILE_NAME: &str = "carousel.pdf";

/// File name of one slide image, e.g. `slide-03.png`.
pub fn slide_file_name(number: usize) -> String {
    format!("slide-{number:02}.png")
}

/// Write one slide image into `dir`, returning its path.
pub async fn save_slide(dir: &Path, number: usize, bytes: &[u8]) -> Result<PathBuf, CarouselError> {
    let path = dir.join(slide_file_name(number));
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| CarouselError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;
    Ok(path)
}

/// Assemble `images` (in order) into a PDF written atomically to `path`.
pub async fn write_pdf(images: Vec<Vec<u8>>, path: &Path) -> Result<(), CarouselError> {
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let pdf = assemble_pdf(&images)?;
        persist_atomically(&target, &pdf)
    })
    .await
    .map_err(|e| CarouselError::Internal(format!("PDF task panicked: {e}")))??;

    debug!("PDF written: {}", path.display());
    Ok(())
}

/// Build the PDF in memory. Slide numbers in errors are 1-based.
pub fn assemble_pdf(images: &[Vec<u8>]) -> Result<Vec<u8>, CarouselError> {
    if images.is_empty() {
        return Err(CarouselError::PdfAssemblyFailed("no slide images to assemble".into()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(images.len());
    let mut page_size: Option<(u32, u32)> = None;

    for (idx, bytes) in images.iter().enumerate() {
        let slide = idx + 1;
        let rgb = image::load_from_memory(bytes)
            .map_err(|e| CarouselError::ImageDecodeFailed {
                slide,
                detail: e.to_string(),
            })?
            .to_rgb8();

        let (page_w, page_h) = *page_size.get_or_insert(rgb.dimensions());
        debug!(
            "Slide {}: {}x{} px on a {}x{} pt page",
            slide,
            rgb.width(),
            rgb.height(),
            page_w,
            page_h
        );

        let page_id = add_image_page(&mut doc, pages_id, &rgb, page_w, page_h)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| CarouselError::PdfAssemblyFailed(e.to_string()))?;
    Ok(out)
}

/// Add one full-bleed image page and return its object id.
fn add_image_page(
    doc: &mut Document,
    pages_id: ObjectId,
    rgb: &RgbImage,
    page_w: u32,
    page_h: u32,
) -> Result<ObjectId, CarouselError> {
    let pixels = deflate(rgb.as_raw())?;
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => rgb.width() as i64,
            "Height" => rgb.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "FlateDecode",
        },
        pixels,
    ));

    let (w, h) = (page_w as i64, page_h as i64);
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(w),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(h),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content
        .encode()
        .map_err(|e| CarouselError::PdfAssemblyFailed(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(w),
            Object::Integer(h),
        ],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! {
                "Im0" => image_id,
            },
        },
    }))
}

fn deflate(raw: &[u8]) -> Result<Vec<u8>, CarouselError> {
    let failed = |e: std::io::Error| CarouselError::PdfAssemblyFailed(format!("compression: {e}"));
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 4), Compression::default());
    encoder.write_all(raw).map_err(failed)?;
    encoder.finish().map_err(failed)
}

/// Write to a temp file beside `path`, then rename over it.
fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), CarouselError> {
    let write_failed = |source: std::io::Error| CarouselError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(bytes).map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb};
    use std::io::Cursor;

    fn png(w: u32, h: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, Rgb(color));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encode png");
        buf
    }

    fn media_boxes(pdf: &[u8]) -> Vec<Vec<i64>> {
        let doc = Document::load_mem(pdf).expect("valid pdf");
        doc.get_pages()
            .values()
            .map(|id| {
                let page = doc.get_dictionary(*id).unwrap();
                page.get(b"MediaBox")
                    .unwrap()
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|o| o.as_i64().unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn slide_names_are_zero_padded() {
        assert_eq!(slide_file_name(1), "slide-01.png");
        assert_eq!(slide_file_name(12), "slide-12.png");
        assert_eq!(slide_file_name(100), "slide-100.png");
    }

    #[test]
    fn one_page_per_image_sized_from_first() {
        let images = vec![png(40, 30, [10, 10, 15]), png(80, 80, [212, 168, 67])];
        let pdf = assemble_pdf(&images).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.5"));
        assert_eq!(media_boxes(&pdf), vec![vec![0, 0, 40, 30], vec![0, 0, 40, 30]]);
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = assemble_pdf(&[]).unwrap_err();
        assert!(matches!(err, CarouselError::PdfAssemblyFailed(_)));
    }

    #[test]
    fn undecodable_slide_is_reported_by_number() {
        let images = vec![png(4, 4, [0, 0, 0]), b"not an image".to_vec()];
        let err = assemble_pdf(&images).unwrap_err();
        assert!(matches!(err, CarouselError::ImageDecodeFailed { slide: 2, .. }));
    }

    #[tokio::test]
    async fn write_pdf_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PDF_FILE_NAME);
        std::fs::write(&path, b"stale").unwrap();

        write_pdf(vec![png(8, 8, [1, 2, 3])], &path).await.unwrap();

        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));
        assert_eq!(media_boxes(&written), vec![vec![0, 0, 8, 8]]);
    }

    #[tokio::test]
    async fn save_slide_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_slide(dir.path(), 3, b"bytes").await.unwrap();
        assert_eq!(path.file_name().unwrap(), "slide-03.png");
        assert_eq!(std::fs::read(path).unwrap(), b"bytes");
    }
}
