use super::*;

#[test]
fn default_layout_is_valid() {
    PosterLayout::default().validate().unwrap();
}

#[test]
fn base_size_steps_down_with_row_count() {
    let l = PosterLayout::default();
    let got: Vec<u32> = (0..=9).map(|n| l.base_size_for(n)).collect();
    assert_eq!(got, [104, 104, 104, 104, 104, 104, 96, 90, 84, 84]);
}

#[test]
fn columns_follow_margins() {
    let l = PosterLayout::default();
    let title = l.title_column();
    assert_eq!((title.left, title.right), (200.0, 996.0));
    assert_eq!(title.width(), 796.0);
    let marker = l.marker_column();
    assert_eq!((marker.left, marker.right), (84.0, 172.0));
    assert_eq!(l.list_band(), (620.0, 1700.0));
}

#[test]
fn partial_json_keeps_defaults() {
    let l: PosterLayout =
        serde_json::from_str(r##"{"list_top": 500, "ink": "#fff", "title": {"min_px": 36}}"##)
            .unwrap();
    assert_eq!(l.list_top, 500.0);
    assert_eq!(l.ink, ColorDef::rgb(255, 255, 255));
    assert_eq!(l.title.min_px, 36);
    assert_eq!(l.title.tracking_em, 0.22);
    assert_eq!(l.list_bottom, 220.0);
    assert_eq!(l.marker.style, RankStyle::Roman);
}

#[test]
fn broken_layouts_are_rejected() {
    let mut l = PosterLayout::default();
    l.list_top = 1800.0;
    assert!(l.validate().is_err());

    let mut l = PosterLayout::default();
    l.margin_left = 600.0;
    l.margin_right = 600.0;
    assert!(l.validate().is_err());

    let mut l = PosterLayout::default();
    l.title.line_height = 0.0;
    assert!(l.validate().is_err());

    let mut l = PosterLayout::default();
    l.base_sizes.otherwise_px = 20;
    assert!(matches!(l.validate(), Err(PosterError::Validation(_))));

    let mut l = PosterLayout::default();
    l.row_gap = f32::NAN;
    assert!(l.validate().is_err());
}

#[test]
fn marker_fit_shrinks_to_half() {
    let p = PosterLayout::default().marker_fit();
    assert_eq!((p.min_px, p.max_px), (20, 40));
}
