//! Fixture builders shared by the unit tests.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

enum Value {
    Ascii(&'static str),
    Short(u16),
    Long(u32),
    Rational(u32, u32),
}

const EXIF_IFD_POINTER: u16 = 0x8769;

/// A JPEG of the given size without any APP1 block.
pub fn plain_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg).unwrap();
    out.into_inner()
}

/// A PNG of the given size filled with one color.
pub fn solid_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// A JPEG carrying a Canon EOS R5 style EXIF block.
pub fn jpeg_with_exif(width: u32, height: u32) -> Vec<u8> {
    let ifd0 = vec![
        (0x010F, Value::Ascii("Canon")),
        (0x0110, Value::Ascii("Canon EOS R5")),
        (0x0132, Value::Ascii("2023:07:09 20:36:33")),
    ];
    let exif = vec![
        (0x829A, Value::Rational(1, 200)),
        (0x829D, Value::Rational(28, 10)),
        (0x8827, Value::Short(100)),
        (0x920A, Value::Rational(50, 1)),
        (0xA405, Value::Short(75)),
        (0xA434, Value::Ascii("RF50mm F1.8 STM")),
    ];
    splice_app1(&plain_jpeg(width, height), &tiff(ifd0, exif))
}

fn splice_app1(jpeg: &[u8], tiff: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let payload_len = 2 + 6 + tiff.len();
    let mut out = Vec::with_capacity(jpeg.len() + payload_len + 2);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&(payload_len as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Little-endian TIFF with IFD0 followed by an Exif sub-IFD and a shared data area.
fn tiff(mut ifd0: Vec<(u16, Value)>, exif: Vec<(u16, Value)>) -> Vec<u8> {
    let ifd_size = |n: usize| (2 + 12 * n + 4) as u32;
    let ifd0_offset = 8u32;
    let exif_offset = ifd0_offset + ifd_size(ifd0.len() + 1);
    let data_offset = exif_offset + ifd_size(exif.len());

    ifd0.push((EXIF_IFD_POINTER, Value::Long(exif_offset)));
    ifd0.sort_by_key(|(tag, _)| *tag);

    let mut data = Vec::new();
    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&ifd0_offset.to_le_bytes());
    write_ifd(&mut out, &ifd0, &mut data, data_offset);
    write_ifd(&mut out, &exif, &mut data, data_offset);
    assert_eq!(out.len() as u32, data_offset);
    out.extend_from_slice(&data);
    out
}

fn write_ifd(out: &mut Vec<u8>, fields: &[(u16, Value)], data: &mut Vec<u8>, data_offset: u32) {
    out.extend_from_slice(&(fields.len() as u16).to_le_bytes());
    for (tag, value) in fields {
        out.extend_from_slice(&tag.to_le_bytes());
        match value {
            Value::Ascii(text) => {
                let mut bytes = text.as_bytes().to_vec();
                bytes.push(0);
                out.extend_from_slice(&2u16.to_le_bytes());
                out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
                if bytes.len() <= 4 {
                    bytes.resize(4, 0);
                    out.extend_from_slice(&bytes);
                } else {
                    out.extend_from_slice(&(data_offset + data.len() as u32).to_le_bytes());
                    data.extend_from_slice(&bytes);
                    if data.len() % 2 == 1 {
                        data.push(0);
                    }
                }
            }
            Value::Short(v) => {
                out.extend_from_slice(&3u16.to_le_bytes());
                out.extend_from_slice(&1u32.to_le_bytes());
                out.extend_from_slice(&v.to_le_bytes());
                out.extend_from_slice(&[0, 0]);
            }
            Value::Long(v) => {
                out.extend_from_slice(&4u16.to_le_bytes());
                out.extend_from_slice(&1u32.to_le_bytes());
                out.extend_from_slice(&v.to_le_bytes());
            }
            Value::Rational(num, den) => {
                out.extend_from_slice(&5u16.to_le_bytes());
                out.extend_from_slice(&1u32.to_le_bytes());
                out.extend_from_slice(&(data_offset + data.len() as u32).to_le_bytes());
                data.extend_from_slice(&num.to_le_bytes());
                data.extend_from_slice(&den.to_le_bytes());
            }
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
}
