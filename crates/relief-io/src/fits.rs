//! Minimal FITS image reader.
//!
//! Reads 2D image HDUs from FITS files, which is all the pipeline needs.
//! The format is simple enough to parse directly:
//!
//! - the file is a sequence of HDUs (header-data units)
//! - headers are 2880-byte blocks of 80-character cards, terminated by
//!   an `END` card
//! - a card is `KEYWORD = value / comment` with the keyword in bytes
//!   0..8 and the value indicator `"= "` in bytes 8..10
//! - data follow immediately, big-endian, padded to a 2880-byte boundary
//!
//! Sample values are mapped through the standard linear scaling
//! `physical = BZERO + BSCALE * raw`, which is how unsigned 16-bit
//! camera data is conventionally stored in a signed type.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use hashbrown::HashMap;
use ndarray::Array2;
use relief_grid::SampleGrid;
use tracing::{debug, info};

use crate::error::{IoError, IoResult};

/// FITS block size in bytes; headers and data are padded to this.
const BLOCK_SIZE: usize = 2880;

/// Header card size in bytes.
const CARD_SIZE: usize = 80;

/// BITPIX values the FITS standard defines.
const VALID_BITPIX: [i64; 6] = [8, 16, 32, 64, -32, -64];

/// Parsed header cards of one HDU, keyed by keyword.
struct Header {
    cards: HashMap<String, String>,
}

impl Header {
    fn raw(&self, keyword: &str) -> Option<&str> {
        self.cards.get(keyword).map(String::as_str)
    }

    /// String value with the FITS quoting stripped.
    fn string(&self, keyword: &str) -> Option<&str> {
        self.raw(keyword)
            .map(|v| v.trim_matches(|c| c == '\'' || c == ' '))
    }

    fn int(&self, keyword: &str) -> IoResult<i64> {
        let raw = self
            .raw(keyword)
            .ok_or_else(|| IoError::bad_card(keyword, "missing"))?;
        raw.trim()
            .parse()
            .map_err(|_| IoError::bad_card(keyword, format!("not an integer: {raw:?}")))
    }

    fn int_or(&self, keyword: &str, default: i64) -> IoResult<i64> {
        match self.raw(keyword) {
            Some(_) => self.int(keyword),
            None => Ok(default),
        }
    }

    fn float_or(&self, keyword: &str, default: f64) -> IoResult<f64> {
        match self.raw(keyword) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| IoError::bad_card(keyword, format!("not a number: {raw:?}"))),
        }
    }
}

/// Read one header starting at `position`. Returns the header and the
/// number of bytes consumed (a multiple of the block size), or `None`
/// on a clean end of file at the HDU boundary.
fn read_header<R: Read>(reader: &mut R, position: u64) -> IoResult<Option<(Header, u64)>> {
    let mut cards = HashMap::new();
    let mut consumed = 0u64;
    let mut block = [0u8; BLOCK_SIZE];

    loop {
        // The first block of an HDU may be absent (end of file); a
        // partial block or EOF mid-header is an error.
        match read_block(reader, &mut block)? {
            BlockRead::Full => {}
            BlockRead::Eof if consumed == 0 => return Ok(None),
            BlockRead::Eof | BlockRead::Partial => {
                return Err(IoError::UnexpectedEof {
                    position: position + consumed,
                })
            }
        }
        consumed += BLOCK_SIZE as u64;

        for card in block.chunks_exact(CARD_SIZE) {
            let keyword = String::from_utf8_lossy(&card[..8]);
            let keyword = keyword.trim_end();
            if keyword == "END" {
                return Ok(Some((Header { cards }, consumed)));
            }
            if keyword.is_empty() || keyword == "COMMENT" || keyword == "HISTORY" {
                continue;
            }
            if card[8] != b'=' || card[9] != b' ' {
                continue;
            }
            let value = String::from_utf8_lossy(&card[10..]);
            // Strip the inline comment; none of the cards we consume
            // carry a slash inside their value.
            let value = value.split('/').next().unwrap_or("").trim();
            cards.insert(keyword.to_owned(), value.to_owned());
        }
    }
}

enum BlockRead {
    Full,
    Partial,
    Eof,
}

fn read_block<R: Read>(reader: &mut R, block: &mut [u8; BLOCK_SIZE]) -> IoResult<BlockRead> {
    let mut filled = 0;
    while filled < BLOCK_SIZE {
        let n = reader.read(&mut block[filled..])?;
        if n == 0 {
            return Ok(if filled == 0 {
                BlockRead::Eof
            } else {
                BlockRead::Partial
            });
        }
        filled += n;
    }
    Ok(BlockRead::Full)
}

/// Size of an HDU's data unit in bytes, before padding.
fn data_size(header: &Header) -> IoResult<u64> {
    let bitpix = header.int("BITPIX")?;
    let naxis = header.int("NAXIS")?;
    if naxis == 0 {
        return Ok(0);
    }
    let mut pixels = 1u64;
    for n in 1..=naxis {
        let len = header.int(&format!("NAXIS{n}"))?;
        let len = u64::try_from(len)
            .map_err(|_| IoError::bad_card(format!("NAXIS{n}"), format!("negative: {len}")))?;
        pixels = pixels.saturating_mul(len);
    }
    let gcount = header.int_or("GCOUNT", 1)?;
    let pcount = header.int_or("PCOUNT", 0)?;
    let gcount = u64::try_from(gcount.max(0)).unwrap_or(0);
    let pcount = u64::try_from(pcount.max(0)).unwrap_or(0);
    let bytes_per = bitpix.unsigned_abs() / 8;
    Ok(bytes_per * gcount * (pcount + pixels))
}

fn padded(size: u64) -> u64 {
    size.div_ceil(BLOCK_SIZE as u64) * BLOCK_SIZE as u64
}

/// Read the 2D image in the given HDU of a FITS file.
///
/// Returns the samples as a row-major grid with `NAXIS2` rows and
/// `NAXIS1` columns, in file order, with `BZERO`/`BSCALE` scaling
/// applied. All six standard `BITPIX` encodings are supported.
///
/// # Errors
///
/// Distinguishes the failure modes a caller may want to handle
/// separately: a missing file, a file that is not FITS at all, an HDU
/// index past the end of the file ([`IoError::HduOutOfRange`]), an HDU
/// that holds no 2D image ([`IoError::NotTwoDimensional`]), and a file
/// truncated mid-header or mid-data.
///
/// # Example
///
/// ```no_run
/// use relief_io::read_fits_image;
///
/// let grid = read_fits_image("m51.fits", 0).unwrap();
/// println!("{} x {} samples", grid.nrows(), grid.ncols());
/// ```
pub fn read_fits_image<P: AsRef<Path>>(path: P, hdu_index: usize) -> IoResult<SampleGrid> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;
    let mut reader = BufReader::new(file);
    let mut position = 0u64;

    for hdu in 0.. {
        let Some((header, header_bytes)) = read_header(&mut reader, position)? else {
            if hdu == 0 {
                return Err(IoError::not_fits("file is empty"));
            }
            return Err(IoError::HduOutOfRange {
                requested: hdu_index,
                available: hdu,
            });
        };
        position += header_bytes;

        if hdu == 0 {
            match header.string("SIMPLE") {
                Some("T") => {}
                Some(other) => {
                    return Err(IoError::not_fits(format!("SIMPLE = {other}, expected T")))
                }
                None => return Err(IoError::not_fits("missing SIMPLE card")),
            }
        }

        let bitpix = header.int("BITPIX")?;
        if !VALID_BITPIX.contains(&bitpix) {
            return Err(IoError::UnsupportedBitpix(bitpix));
        }

        if hdu == hdu_index {
            if hdu > 0 && header.string("XTENSION") != Some("IMAGE") {
                return Err(IoError::bad_card("XTENSION", "not an image extension"));
            }
            return read_image_data(&mut reader, &header, hdu, bitpix, position);
        }

        // Not the HDU we want; skip its data unit.
        let skip = padded(data_size(&header)?);
        let skip_i64 = i64::try_from(skip)
            .map_err(|_| IoError::bad_card("NAXIS", "data unit too large"))?;
        reader.seek(SeekFrom::Current(skip_i64))?;
        position += skip;
        debug!(hdu, skipped_bytes = skip, "skipping HDU");
    }

    unreachable!("loop returns or errors for every HDU")
}

/// Read and scale the 2D data unit of the selected HDU.
fn read_image_data<R: Read>(
    reader: &mut R,
    header: &Header,
    hdu: usize,
    bitpix: i64,
    position: u64,
) -> IoResult<SampleGrid> {
    let naxis = header.int("NAXIS")?;
    if naxis != 2 {
        return Err(IoError::NotTwoDimensional { hdu, naxis });
    }

    let cols = dimension(header, "NAXIS1")?;
    let rows = dimension(header, "NAXIS2")?;
    let bscale = header.float_or("BSCALE", 1.0)?;
    let bzero = header.float_or("BZERO", 0.0)?;

    #[allow(clippy::cast_possible_truncation)]
    // Truncation: BITPIX is one of six small standard values.
    let bytes_per = (bitpix.unsigned_abs() / 8) as usize;
    // The dimensions come straight from the header; a hostile file must
    // fail cleanly instead of overflowing the size computation.
    let total = rows
        .checked_mul(cols)
        .and_then(|pixels| pixels.checked_mul(bytes_per))
        .ok_or_else(|| IoError::bad_card("NAXIS", "image dimensions overflow"))?;
    let mut buf = vec![0u8; total];
    reader.read_exact(&mut buf).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            IoError::UnexpectedEof { position }
        } else {
            IoError::Io(e)
        }
    })?;

    #[allow(clippy::cast_precision_loss)]
    // Precision: 64-bit integer samples beyond 2^53 lose their low bits;
    // real detectors never produce them.
    let values: Vec<f64> = buf
        .chunks_exact(bytes_per)
        .map(|chunk| {
            let raw = match bitpix {
                8 => f64::from(chunk[0]),
                16 => f64::from(i16::from_be_bytes([chunk[0], chunk[1]])),
                32 => f64::from(i32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
                64 => i64::from_be_bytes([
                    chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
                ]) as f64,
                -32 => f64::from(f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]])),
                _ => f64::from_be_bytes([
                    chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
                ]),
            };
            raw.mul_add(bscale, bzero)
        })
        .collect();

    info!(hdu, rows, cols, bitpix, "FITS image loaded");

    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| IoError::not_fits(format!("inconsistent image shape: {e}")))
}

fn dimension(header: &Header, keyword: &str) -> IoResult<usize> {
    let value = header.int(keyword)?;
    usize::try_from(value)
        .map_err(|_| IoError::bad_card(keyword, format!("negative dimension: {value}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn card(keyword: &str, value: &str) -> Vec<u8> {
        let mut text = format!("{keyword:<8}= {value:>20}");
        text.truncate(CARD_SIZE);
        let mut bytes = text.into_bytes();
        bytes.resize(CARD_SIZE, b' ');
        bytes
    }

    fn header_block(cards: &[(&str, &str)]) -> Vec<u8> {
        let mut block = Vec::new();
        for (k, v) in cards {
            block.extend_from_slice(&card(k, v));
        }
        block.extend_from_slice(&card("END", ""));
        block.resize(BLOCK_SIZE, b' ');
        block
    }

    fn pad_to_block(data: &mut Vec<u8>) {
        let target = data.len().div_ceil(BLOCK_SIZE) * BLOCK_SIZE;
        data.resize(target, 0);
    }

    fn write_temp(bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.fits");
        let mut file = File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        (dir, path)
    }

    fn f32_image(rows: usize, cols: usize, values: &[f32]) -> Vec<u8> {
        let mut bytes = header_block(&[
            ("SIMPLE", "T"),
            ("BITPIX", "-32"),
            ("NAXIS", "2"),
            ("NAXIS1", &cols.to_string()),
            ("NAXIS2", &rows.to_string()),
        ]);
        let mut data: Vec<u8> = values.iter().flat_map(|v| v.to_be_bytes()).collect();
        pad_to_block(&mut data);
        bytes.extend_from_slice(&data);
        bytes
    }

    #[test]
    fn reads_f32_primary_image() {
        let bytes = f32_image(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let (_dir, path) = write_temp(&bytes);

        let grid = read_fits_image(&path, 0).unwrap();
        assert_eq!(grid.dim(), (2, 3));
        assert_eq!(grid[[0, 0]], 1.0);
        assert_eq!(grid[[0, 2]], 3.0);
        assert_eq!(grid[[1, 2]], 6.0);
    }

    #[test]
    fn applies_bzero_bscale_to_i16() {
        // Unsigned 16-bit convention: raw i16 plus BZERO 32768.
        let mut bytes = header_block(&[
            ("SIMPLE", "T"),
            ("BITPIX", "16"),
            ("NAXIS", "2"),
            ("NAXIS1", "1"),
            ("NAXIS2", "2"),
            ("BZERO", "32768.0"),
            ("BSCALE", "1.0"),
        ]);
        let mut data = Vec::new();
        data.extend_from_slice(&(-32768i16).to_be_bytes());
        data.extend_from_slice(&0i16.to_be_bytes());
        pad_to_block(&mut data);
        bytes.extend_from_slice(&data);
        let (_dir, path) = write_temp(&bytes);

        let grid = read_fits_image(&path, 0).unwrap();
        assert_eq!(grid[[0, 0]], 0.0);
        assert_eq!(grid[[1, 0]], 32768.0);
    }

    #[test]
    fn reads_image_extension_past_empty_primary() {
        let mut bytes = header_block(&[("SIMPLE", "T"), ("BITPIX", "8"), ("NAXIS", "0")]);
        bytes.extend_from_slice(&header_block(&[
            ("XTENSION", "'IMAGE   '"),
            ("BITPIX", "-64"),
            ("NAXIS", "2"),
            ("NAXIS1", "2"),
            ("NAXIS2", "2"),
        ]));
        let mut data: Vec<u8> = [1.5f64, 2.5, 3.5, 4.5]
            .iter()
            .flat_map(|v| v.to_be_bytes())
            .collect();
        pad_to_block(&mut data);
        bytes.extend_from_slice(&data);
        let (_dir, path) = write_temp(&bytes);

        let grid = read_fits_image(&path, 1).unwrap();
        assert_eq!(grid.dim(), (2, 2));
        assert_eq!(grid[[1, 1]], 4.5);
    }

    #[test]
    fn hdu_out_of_range_reports_count() {
        let bytes = f32_image(2, 2, &[0.0; 4]);
        let (_dir, path) = write_temp(&bytes);

        let err = read_fits_image(&path, 3).unwrap_err();
        assert!(matches!(
            err,
            IoError::HduOutOfRange {
                requested: 3,
                available: 1
            }
        ));
    }

    #[test]
    fn one_dimensional_hdu_is_rejected() {
        let mut bytes = header_block(&[
            ("SIMPLE", "T"),
            ("BITPIX", "8"),
            ("NAXIS", "1"),
            ("NAXIS1", "4"),
        ]);
        let mut data = vec![0u8; 4];
        pad_to_block(&mut data);
        bytes.extend_from_slice(&data);
        let (_dir, path) = write_temp(&bytes);

        let err = read_fits_image(&path, 0).unwrap_err();
        assert!(matches!(
            err,
            IoError::NotTwoDimensional { hdu: 0, naxis: 1 }
        ));
    }

    #[test]
    fn unsupported_bitpix_is_rejected() {
        let bytes = header_block(&[
            ("SIMPLE", "T"),
            ("BITPIX", "42"),
            ("NAXIS", "2"),
            ("NAXIS1", "1"),
            ("NAXIS2", "1"),
        ]);
        let (_dir, path) = write_temp(&bytes);

        let err = read_fits_image(&path, 0).unwrap_err();
        assert!(matches!(err, IoError::UnsupportedBitpix(42)));
    }

    #[test]
    fn non_fits_file_is_rejected() {
        let bytes = header_block(&[("HELLO", "1")]);
        let (_dir, path) = write_temp(&bytes);

        let err = read_fits_image(&path, 0).unwrap_err();
        assert!(matches!(err, IoError::NotFits { .. }));
    }

    #[test]
    fn truncated_data_is_an_eof_error() {
        let mut bytes = f32_image(2, 2, &[0.0; 4]);
        bytes.truncate(BLOCK_SIZE + 8); // cut inside the data unit
        let (_dir, path) = write_temp(&bytes);

        let err = read_fits_image(&path, 0).unwrap_err();
        assert!(matches!(err, IoError::UnexpectedEof { .. }));
    }

    #[test]
    fn oversized_dimensions_fail_cleanly() {
        // Axis lengths crafted so rows * cols * 8 overflows usize.
        let bytes = header_block(&[
            ("SIMPLE", "T"),
            ("BITPIX", "-64"),
            ("NAXIS", "2"),
            ("NAXIS1", "4294967295"),
            ("NAXIS2", "4294967295"),
        ]);
        let (_dir, path) = write_temp(&bytes);

        let err = read_fits_image(&path, 0).unwrap_err();
        assert!(matches!(err, IoError::BadCard { .. }));
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let err = read_fits_image("no_such_file_12345.fits", 0).unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
