use std::io::Cursor;

use super::*;
use crate::text::face::BlockFace;

fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let path = dir.join(name);
    std::fs::write(&path, buf).unwrap();
    path
}

#[test]
fn missing_background_is_a_retryable_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    let sources = AssetSources {
        background: PathBuf::from("nope.jpg"),
        font: FontSource::File {
            path: PathBuf::from("nope.ttf"),
            index: 0,
        },
    };
    let err = PreparedAssets::prepare(&sources, dir.path(), Canvas::STORY, 1.0).unwrap_err();
    assert!(matches!(err, PosterError::AssetLoad(_)), "{err}");
    assert!(err.is_retryable());
    assert!(err.to_string().contains("nope.jpg"));
}

#[test]
fn corrupt_background_is_an_asset_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bg.png"), b"not a png").unwrap();
    let sources = AssetSources {
        background: PathBuf::from("bg.png"),
        font: FontSource::default(),
    };
    let err = PreparedAssets::prepare(&sources, dir.path(), Canvas::STORY, 1.0).unwrap_err();
    assert!(matches!(err, PosterError::AssetLoad(_)), "{err}");
}

#[test]
fn missing_font_fails_after_background_decodes() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "bg.png", 4, 8);
    let sources = AssetSources {
        background: PathBuf::from("bg.png"),
        font: FontSource::File {
            path: PathBuf::from("fonts/missing.ttf"),
            index: 0,
        },
    };
    let err = PreparedAssets::prepare(&sources, dir.path(), Canvas::STORY, 1.0).unwrap_err();
    assert!(matches!(err, PosterError::AssetLoad(_)), "{err}");
    assert!(err.to_string().contains("missing.ttf"));
}

#[test]
fn invalid_font_bytes_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "bg.png", 4, 8);
    std::fs::write(dir.path().join("broken.ttf"), b"\0\0\0\0garbage").unwrap();
    let sources = AssetSources {
        background: PathBuf::from("bg.png"),
        font: FontSource::File {
            path: PathBuf::from("broken.ttf"),
            index: 0,
        },
    };
    let err = PreparedAssets::prepare(&sources, dir.path(), Canvas::STORY, 1.0).unwrap_err();
    assert!(matches!(err, PosterError::AssetLoad(_)), "{err}");
}

#[test]
fn remote_backgrounds_are_rejected() {
    let sources = AssetSources {
        background: PathBuf::from("https://example.com/bg.jpg"),
        font: FontSource::default(),
    };
    let err = PreparedAssets::prepare(&sources, Path::new("."), Canvas::STORY, 1.0).unwrap_err();
    assert!(matches!(err, PosterError::AssetLoad(_)));
}

#[test]
fn from_parts_validates_background_bytes() {
    let face: Arc<dyn FontFace> = Arc::new(BlockFace::default());
    let ok = PreparedAssets::from_parts(PreparedImage::solid(2, 3, [1, 2, 3, 255]), face.clone());
    assert!(ok.is_ok());

    let bad = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 4]),
    };
    assert!(PreparedAssets::from_parts(bad, face).is_err());
}

#[test]
fn font_source_json_shapes() {
    let file: FontSource =
        serde_json::from_value(serde_json::json!({"path": "fonts/a.ttf"})).unwrap();
    assert_eq!(
        file,
        FontSource::File {
            path: PathBuf::from("fonts/a.ttf"),
            index: 0
        }
    );

    let sys: FontSource =
        serde_json::from_value(serde_json::json!({"families": ["Georgia", "serif"]})).unwrap();
    assert_eq!(
        sys,
        FontSource::System {
            families: vec!["Georgia".to_string(), "serif".to_string()]
        }
    );
}
