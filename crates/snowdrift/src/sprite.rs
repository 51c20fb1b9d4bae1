//! XPM sprite-sheet decoding for the sleigh animation frames.
//!
//! Supports the XPM3 subset the bundled pixmaps use: one character per
//! pixel, `c #RRGGBB` color entries, and `None` for transparency. Anything
//! else is a parse error; the simulation core never depends on sprites, so a
//! failed load only costs the decoration.
use std::path::Path;

use crate::error::{Error, Result};

/// One decoded RGBA sprite frame, rows stored top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrame {
    pub width: usize,
    pub height: usize,
    pixels: Vec<[u8; 4]>,
}

impl SpriteFrame {
    /// Pixel at (x, y), y counted from the top row.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixels[y * self.width + x]
    }

    /// Raw RGBA pixels, row-major from the top.
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }
}

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Parse an XPM3 document into a sprite frame.
pub fn parse_xpm(source: &str) -> Result<SpriteFrame> {
    let rows: Vec<&str> = source
        .lines()
        .filter_map(quoted_payload)
        .collect();

    let header = rows
        .first()
        .ok_or_else(|| Error::Sprite("no quoted rows found".into()))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(Error::Sprite(format!("malformed header '{header}'")));
    }
    let width: usize = parse_field(fields[0], "width")?;
    let height: usize = parse_field(fields[1], "height")?;
    let color_count: usize = parse_field(fields[2], "color count")?;
    let chars_per_pixel: usize = parse_field(fields[3], "chars per pixel")?;
    if chars_per_pixel != 1 {
        return Err(Error::Sprite(format!(
            "unsupported chars-per-pixel {chars_per_pixel}; only 1 is supported"
        )));
    }
    if rows.len() < 1 + color_count + height {
        return Err(Error::Sprite(format!(
            "expected {} rows, found {}",
            1 + color_count + height,
            rows.len()
        )));
    }

    let mut palette: Vec<(char, [u8; 4])> = Vec::with_capacity(color_count);
    for entry in &rows[1..1 + color_count] {
        let mut chars = entry.chars();
        let key = chars
            .next()
            .ok_or_else(|| Error::Sprite("empty color entry".into()))?;
        let rest: String = chars.collect();
        let color = parse_color_entry(&rest)?;
        palette.push((key, color));
    }

    let lookup = |key: char| -> [u8; 4] {
        palette
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, c)| *c)
            .unwrap_or(TRANSPARENT)
    };

    let mut pixels = Vec::with_capacity(width * height);
    for row in &rows[1 + color_count..1 + color_count + height] {
        let mut count = 0;
        for key in row.chars().take(width) {
            pixels.push(lookup(key));
            count += 1;
        }
        // Short rows pad out transparent rather than failing the frame.
        for _ in count..width {
            pixels.push(TRANSPARENT);
        }
    }

    Ok(SpriteFrame {
        width,
        height,
        pixels,
    })
}

/// Read and parse an XPM file from disk.
pub fn load_xpm_file(path: impl AsRef<Path>) -> Result<SpriteFrame> {
    let source = std::fs::read_to_string(path)?;
    parse_xpm(&source)
}

/// The text between the first and last double quote of a line, if any.
fn quoted_payload(line: &str) -> Option<&str> {
    let start = line.find('"')?;
    let end = line.rfind('"')?;
    if end <= start {
        return None;
    }
    Some(&line[start + 1..end])
}

fn parse_field(field: &str, name: &str) -> Result<usize> {
    field
        .parse()
        .map_err(|_| Error::Sprite(format!("invalid {name} '{field}'")))
}

/// Parse the remainder of a color entry: `c #RRGGBB`, or `None` for
/// transparency.
fn parse_color_entry(rest: &str) -> Result<[u8; 4]> {
    if rest.to_ascii_lowercase().contains("none") {
        return Ok(TRANSPARENT);
    }
    let hash = rest
        .find('#')
        .ok_or_else(|| Error::Sprite(format!("color entry without #RRGGBB: '{rest}'")))?;
    let hex = rest[hash + 1..].trim();
    if hex.len() < 6 {
        return Err(Error::Sprite(format!("truncated color '{hex}'")));
    }
    let value = u32::from_str_radix(&hex[..6], 16)
        .map_err(|_| Error::Sprite(format!("invalid hex color '{hex}'")))?;
    Ok([
        ((value >> 16) & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        (value & 0xFF) as u8,
        0xFF,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLED: &str = r#####"/* XPM */
static char *sled[] = {
"4 3 3 1",
". c None",
"# c #FF0000",
"o c #00FF80",
"..#.",
"#oo#",
"####"
};"#####;

    #[test]
    fn parses_dimensions_and_pixels() {
        let frame = parse_xpm(SLED).expect("valid xpm");
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 3);
        assert_eq!(frame.pixels().len(), 12);

        assert_eq!(frame.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(frame.pixel(2, 0), [0xFF, 0, 0, 0xFF]);
        assert_eq!(frame.pixel(1, 1), [0, 0xFF, 0x80, 0xFF]);
        assert_eq!(frame.pixel(3, 2), [0xFF, 0, 0, 0xFF]);
    }

    #[test]
    fn unknown_pixel_keys_decode_transparent() {
        let source = r##"
"2 1 1 1",
"# c #112233",
"#?"
"##;
        let frame = parse_xpm(source).expect("valid xpm");
        assert_eq!(frame.pixel(0, 0), [0x11, 0x22, 0x33, 0xFF]);
        assert_eq!(frame.pixel(1, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn short_pixel_rows_pad_transparent() {
        let source = r##"
"3 1 1 1",
"# c #FFFFFF",
"#"
"##;
        let frame = parse_xpm(source).expect("valid xpm");
        assert_eq!(frame.pixel(0, 0), [0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(frame.pixel(1, 0), [0, 0, 0, 0]);
        assert_eq!(frame.pixel(2, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse_xpm("no quotes at all").is_err());
        assert!(parse_xpm("\"1 1\"").is_err());
        assert!(parse_xpm("\"1 1 1 2\",\n\"aa c #FFFFFF\",\n\"aa\"").is_err());
        // Header promises more rows than the document has.
        assert!(parse_xpm("\"2 2 1 1\",\n\"# c #FFFFFF\",\n\"##\"").is_err());
        // Color entry with neither None nor a hex value.
        assert!(parse_xpm("\"1 1 1 1\",\n\"# c red\",\n\"#\"").is_err());
    }
}
