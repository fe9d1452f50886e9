use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_dimensions_and_premul() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let prepared = decode_image(&buf).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_non_images() {
    assert!(decode_image(b"definitely not a jpeg").is_err());
}

#[test]
fn svg_background_is_rasterized_to_cover_the_canvas() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
        <rect width="100" height="100" fill="#336699"/>
    </svg>"##;
    let tree = parse_svg(svg).unwrap();

    let canvas = Canvas {
        width: 108,
        height: 192,
    };
    let img = rasterize_svg_cover(&tree, canvas, 1.0).unwrap();
    // Square art must grow until it covers the taller side.
    assert_eq!(img.height, 192);
    assert_eq!(img.width, 192);

    let mid = ((96 * img.width + 96) * 4) as usize;
    assert_eq!(&img.rgba8_premul[mid..mid + 4], &[0x33, 0x66, 0x99, 0xff]);
}

#[test]
fn svg_parse_errors_surface() {
    assert!(parse_svg(b"<svg").is_err());
}
