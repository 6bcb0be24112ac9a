use image::{Rgb, RgbImage};

use crate::error::QrError;
use crate::generator::QrCode;

/// Renders the symbol as a standalone SVG document.
///
/// The viewBox spans `size + 2 * border` units and every dark module is a
/// 1x1 rectangle in a single path element.
pub fn to_svg_string(qr: &QrCode, border: i32) -> Result<String, QrError> {
    if border < 0 {
        return Err(QrError::InvalidArgument("border must be non-negative".to_string()));
    }
    let border = i64::from(border);
    let dimension = qr.size() as i64 + 2 * border;

    let mut path = String::new();
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x as i32, y as i32) {
                if !path.is_empty() {
                    path.push(' ');
                }
                path.push_str(&format!(
                    "M{},{}h1v1h-1z",
                    x as i64 + border,
                    y as i64 + border
                ));
            }
        }
    }

    Ok(format!(
        concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" ",
            "viewBox=\"0 0 {dim} {dim}\" stroke=\"none\">\n",
            "<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n",
            "<path d=\"{path}\" fill=\"#000000\"/>\n",
            "</svg>\n"
        ),
        dim = dimension,
        path = path
    ))
}

/// Parses a strict `#RRGGBB` color string.
pub fn parse_hex_color(hex: &str) -> Result<Rgb<u8>, QrError> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or_else(|| QrError::InvalidArgument(format!("color {:?} is not of the form #RRGGBB", hex)))?;
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| QrError::InvalidArgument(format!("color {:?} has a bad channel", hex)))
    };
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

/// Rasterizes the symbol into an RGB image close to the requested edge
/// length in pixels.
///
/// Modules are scaled by the largest integer factor that keeps the image
/// within `pixel_size`; a target too small for one pixel per module is an
/// error. When `finder_highlight` is set, dark modules inside the three 7x7
/// finder patterns take that color instead of `foreground`.
pub fn to_image_buffer(
    qr: &QrCode,
    pixel_size: u32,
    border: u32,
    foreground: Rgb<u8>,
    background: Rgb<u8>,
    finder_highlight: Option<Rgb<u8>>,
) -> Result<RgbImage, QrError> {
    let modules = qr.size() as u32 + 2 * border;
    let scale = pixel_size / modules;
    if scale == 0 {
        return Err(QrError::InvalidArgument(format!(
            "pixel size {} cannot fit {} modules",
            pixel_size, modules
        )));
    }
    let dimension = modules * scale;
    let mut image = RgbImage::from_pixel(dimension, dimension, background);

    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if !qr.get_module(x as i32, y as i32) {
                continue;
            }
            let color = match finder_highlight {
                Some(highlight) if is_in_finder(qr.size(), x, y) => highlight,
                _ => foreground,
            };
            let px = (border + x as u32) * scale;
            let py = (border + y as u32) * scale;
            for dy in 0..scale {
                for dx in 0..scale {
                    image.put_pixel(px + dx, py + dy, color);
                }
            }
        }
    }
    Ok(image)
}

fn is_in_finder(size: usize, x: usize, y: usize) -> bool {
    (x < 7 && y < 7) || (x >= size - 7 && y < 7) || (x < 7 && y >= size - 7)
}
