//! Rasterization of SVG documents into encoded JPEG or PNG images.

use std::sync::{Arc, OnceLock};

use log::{debug, trace};

use crate::export::{self, ImageFormat, RenderedImage};

static FONT_DATABASE: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();

/// Installed faces tried, in order, for the generic `serif` family.
const SERIF_FAMILIES: &[&str] = &[
    "Times New Roman",
    "Liberation Serif",
    "Tinos",
    "Nimbus Roman",
    "DejaVu Serif",
    "Noto Serif",
    "FreeSerif",
];

/// Installed faces tried, in order, for the generic `sans-serif` family.
const SANS_SERIF_FAMILIES: &[&str] = &[
    "Arial",
    "Liberation Sans",
    "Arimo",
    "Helvetica",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];

/// Returns the system font database, loading it on first use.
fn font_database() -> Arc<usvg::fontdb::Database> {
    FONT_DATABASE
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            resolve_generic_families(&mut db);
            debug!(faces = db.len(); "Loaded system fonts");
            Arc::new(db)
        })
        .clone()
}

/// Points the generic families at faces that are actually installed.
///
/// fontdb maps `serif` to "Times New Roman" and `sans-serif` to "Arial"
/// whether or not they exist, and usvg drops text it cannot shape.
fn resolve_generic_families(db: &mut usvg::fontdb::Database) {
    if let Some(family) = installed_family(db, SERIF_FAMILIES) {
        debug!(family; "Using serif family");
        db.set_serif_family(family);
    }
    if let Some(family) = installed_family(db, SANS_SERIF_FAMILIES) {
        debug!(family; "Using sans-serif family");
        db.set_sans_serif_family(family);
    }
}

/// Returns the first of `preferred` that is installed, else any installed family.
fn installed_family(db: &usvg::fontdb::Database, preferred: &[&str]) -> Option<String> {
    let families = || db.faces().flat_map(|face| face.families.iter().map(|(name, _)| name));

    preferred
        .iter()
        .find_map(|wanted| families().find(|name| name.eq_ignore_ascii_case(wanted)))
        .or_else(|| families().next())
        .cloned()
}

/// Counts text nodes that survived font resolution.
fn text_node_count(group: &usvg::Group) -> usize {
    group
        .children()
        .iter()
        .map(|node| match node {
            usvg::Node::Text(_) => 1,
            usvg::Node::Group(group) => text_node_count(group),
            _ => 0,
        })
        .sum()
}

/// Turns SVG documents into encoded images.
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    format: ImageFormat,
    jpeg_quality: u8,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(ImageFormat::default(), 90)
    }
}

impl Rasterizer {
    pub fn new(format: ImageFormat, jpeg_quality: u8) -> Self {
        Self {
            format,
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Rasterizes `svg` at its intrinsic size and encodes it.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if the document cannot be parsed or
    /// no pixmap can be allocated, and [`export::Error::Encode`] if encoding
    /// fails.
    pub fn rasterize(&self, svg: &str) -> Result<RenderedImage, export::Error> {
        let pixmap = self.render_pixmap(svg)?;
        let (width, height) = (pixmap.width(), pixmap.height());

        let bytes = match self.format {
            ImageFormat::Png => pixmap
                .encode_png()
                .map_err(|err| export::Error::Encode(Box::new(err)))?,
            ImageFormat::Jpeg => self.encode_jpeg(&pixmap)?,
        };

        debug!(format:% = self.format, width, height, bytes = bytes.len(); "Image encoded");
        Ok(RenderedImage::new(self.format, width, height, bytes))
    }

    fn render_pixmap(&self, svg: &str) -> Result<tiny_skia::Pixmap, export::Error> {
        render_with_fonts(svg, font_database())
    }

    fn encode_jpeg(&self, pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, export::Error> {
        let (width, height) = (pixmap.width(), pixmap.height());

        let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
        for pixel in pixmap.data().chunks_exact(4) {
            rgb.extend_from_slice(&pixel[..3]);
        }

        let mut out = Vec::new();
        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, self.jpeg_quality);
        encoder
            .encode(&rgb, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|err| export::Error::Encode(Box::new(err)))?;
        Ok(out)
    }
}

fn render_with_fonts(
    svg: &str,
    fontdb: Arc<usvg::fontdb::Database>,
) -> Result<tiny_skia::Pixmap, export::Error> {
    let mut opt = usvg::Options::default();
    opt.fontdb = fontdb;

    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|err| export::Error::Render(format!("failed to parse SVG: {err}")))?;

    if svg.contains("<text") && text_node_count(tree.root()) == 0 {
        return Err(export::Error::Render(
            "no installed font could render the diagram text".to_string(),
        ));
    }

    let size = tree.size().to_int_size();
    trace!(width = size.width(), height = size.height(); "Allocating pixmap");
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
        export::Error::Render(format!(
            "failed to allocate a {}x{} pixmap",
            size.width(),
            size.height()
        ))
    })?;

    // JPEG has no alpha channel, so anything the document leaves
    // transparent ends up white.
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30" viewBox="0 0 40 30"><circle cx="20" cy="15" r="10" fill="black"/></svg>"#;

    #[test]
    fn test_png_output() {
        let image = Rasterizer::new(ImageFormat::Png, 90).rasterize(SVG).unwrap();
        assert_eq!((image.width(), image.height()), (40, 30));
        assert_eq!(image.content_type(), "image/png");
        assert!(image.bytes().starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_jpeg_output() {
        let image = Rasterizer::default().rasterize(SVG).unwrap();
        assert_eq!(image.format(), ImageFormat::Jpeg);
        assert_eq!((image.width(), image.height()), (40, 30));
        assert!(image.bytes().starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_output_is_deterministic() {
        let rasterizer = Rasterizer::new(ImageFormat::Png, 90);
        let first = rasterizer.rasterize(SVG).unwrap();
        let second = rasterizer.rasterize(SVG).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_svg() {
        let err = Rasterizer::default().rasterize("<not svg").unwrap_err();
        assert!(matches!(err, export::Error::Render(_)));
    }

    fn text_svg(content: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="300" height="60" viewBox="0 0 300 60"><text x="10" y="40" font-family="Times New Roman, serif" font-size="40">{content}</text></svg>"#
        )
    }

    #[test]
    fn test_text_changes_pixels() {
        let rasterizer = Rasterizer::new(ImageFormat::Png, 90);
        let short = rasterizer.rasterize(&text_svg("A")).unwrap();
        let long = rasterizer.rasterize(&text_svg("WWWWWWWW")).unwrap();
        assert_ne!(short, long);
    }

    #[test]
    fn test_generic_serif_is_installed() {
        let db = font_database();
        let serif = db.family_name(&usvg::fontdb::Family::Serif);
        assert!(db.faces().any(|face| face.families.iter().any(|(name, _)| name.as_str() == serif)));
    }

    #[test]
    fn test_missing_fonts_are_an_error() {
        let empty = Arc::new(usvg::fontdb::Database::new());
        let err = render_with_fonts(&text_svg("C major"), empty).unwrap_err();
        assert!(matches!(err, export::Error::Render(_)));

        let empty = Arc::new(usvg::fontdb::Database::new());
        assert!(render_with_fonts(SVG, empty).is_ok());
    }

    #[test]
    fn test_quality_is_clamped() {
        let rasterizer = Rasterizer::new(ImageFormat::Jpeg, 0);
        assert!(rasterizer.rasterize(SVG).is_ok());
    }
}
