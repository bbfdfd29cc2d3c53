use image::Rgb;

use super::*;
use crate::render::background::SolidBackground;

/// Deterministic background that encodes the pixel position, so leaks are easy to spot.
struct CoordPattern;

impl BackgroundProvider for CoordPattern {
    fn fill(&mut self, canvas: &mut image::RgbImage) {
        for (x, y, px) in canvas.enumerate_pixels_mut() {
            *px = pattern_at(x, y);
        }
    }
}

fn pattern_at(x: u32, y: u32) -> Rgb<u8> {
    Rgb([x as u8, y as u8, 77])
}

fn solid(index: usize, height: u32, width: u32, rgb: [u8; 3]) -> SourceImage {
    SourceImage::new(
        index,
        format!("img{index}.png"),
        image::RgbImage::from_pixel(width, height, Rgb(rgb)),
    )
}

#[test]
fn scaled_size_follows_height_and_clips_width() {
    let canvas = CanvasSize::new(200, 100);
    assert_eq!(
        scaled_size(100, 100, canvas),
        Some(ScaledSize {
            rows: 200,
            cols: 100
        })
    );
    assert_eq!(
        scaled_size(200, 50, canvas),
        Some(ScaledSize { rows: 200, cols: 50 })
    );
    // Very wide source: width clipped, aspect distorted.
    assert_eq!(
        scaled_size(10, 1000, canvas),
        Some(ScaledSize {
            rows: 200,
            cols: 100
        })
    );
    // floor(), not round(): 7 * 2 / 3 = 4.67.
    assert_eq!(
        scaled_size(3, 2, CanvasSize::new(7, 50)),
        Some(ScaledSize { rows: 7, cols: 4 })
    );
}

#[test]
fn scaled_size_rejects_degenerate_inputs() {
    let canvas = CanvasSize::new(10, 10);
    assert_eq!(scaled_size(10, 0, canvas), None);
    assert_eq!(scaled_size(0, 10, canvas), None);
    // 1 * 1 / 10 floors to zero columns.
    assert_eq!(scaled_size(10, 1, CanvasSize::new(1, 10)), None);
}

#[test]
fn centering_rounds_down() {
    let canvas = CanvasSize::new(200, 100);
    assert_eq!(
        centering_offsets(canvas, ScaledSize { rows: 200, cols: 50 }),
        (25, 0)
    );
    assert_eq!(
        centering_offsets(CanvasSize::new(9, 101), ScaledSize { rows: 6, cols: 20 }),
        (40, 1)
    );
}

#[test]
fn mixed_sizes_scenario() {
    let canvas = CanvasSize::new(200, 100);
    let mut bg = SolidBackground::BLACK;

    let square = composite_frame(&solid(0, 100, 100, [255, 255, 255]), canvas, &mut bg).unwrap();
    assert_eq!(square.frame.size(), canvas);
    assert_eq!(square.stats.scaled, ScaledSize { rows: 200, cols: 100 });
    assert_eq!((square.stats.offset_x, square.stats.offset_y), (0, 0));
    assert_eq!(square.stats.ratio, 1.0);
    // Stretched square covers the whole canvas.
    assert!(square.frame.data.iter().all(|&v| v >= 254));

    let tall = composite_frame(&solid(1, 200, 50, [255, 255, 255]), canvas, &mut bg).unwrap();
    assert_eq!(tall.frame.size(), canvas);
    assert_eq!(tall.stats.scaled, ScaledSize { rows: 200, cols: 50 });
    assert_eq!((tall.stats.offset_x, tall.stats.offset_y), (25, 0));
    assert_eq!(tall.stats.ratio, 4.0);
    for y in 0..200 {
        for x in 0..100 {
            let inside = (25..75).contains(&x);
            let px = tall.frame.pixel(x, y);
            if inside {
                assert_eq!(px, [255, 255, 255], "at ({x}, {y})");
            } else {
                assert_eq!(px, [0, 0, 0], "at ({x}, {y})");
            }
        }
    }
}

#[test]
fn single_pixel_image_fills_the_frame() {
    let canvas = CanvasSize::new(1, 1);
    let out = composite_frame(
        &solid(0, 1, 1, [10, 20, 30]),
        canvas,
        &mut FlatBackground,
    )
    .unwrap();
    assert_eq!(out.frame.data, vec![10, 20, 30]);
}

/// Any background would do here; the image covers everything.
struct FlatBackground;

impl BackgroundProvider for FlatBackground {
    fn fill(&mut self, canvas: &mut image::RgbImage) {
        for px in canvas.pixels_mut() {
            *px = Rgb([123, 45, 67]);
        }
    }
}

#[test]
fn centering_law_with_fixed_pattern_background() {
    let canvas = CanvasSize::new(40, 101);
    let mut src = image::RgbImage::new(20, 40);
    for (x, y, px) in src.enumerate_pixels_mut() {
        *px = Rgb([200, (x * 3) as u8, (y * 5) as u8]);
    }
    let image = SourceImage::new(4, "p.png", src.clone());

    let out = composite_frame(&image, canvas, &mut CoordPattern).unwrap();
    assert_eq!(out.stats.scaled, ScaledSize { rows: 40, cols: 20 });
    assert_eq!((out.stats.offset_x, out.stats.offset_y), (40, 0));
    assert_eq!(out.stats.index, 4);

    for y in 0..canvas.max_height {
        for x in 0..canvas.max_width {
            let got = out.frame.pixel(x, y);
            if (40..60).contains(&x) {
                assert_eq!(got, src.get_pixel(x - 40, y).0, "image at ({x}, {y})");
            } else {
                assert_eq!(got, pattern_at(x, y).0, "background at ({x}, {y})");
            }
        }
    }
}

#[test]
fn frame_always_matches_canvas() {
    let canvas = CanvasSize::new(90, 160);
    let sources = [(10, 10), (90, 160), (45, 20), (90, 10), (3, 500), (1, 1)];
    for (i, (h, w)) in sources.into_iter().enumerate() {
        let out = composite_frame(&solid(i, h, w, [1, 2, 3]), canvas, &mut CoordPattern).unwrap();
        assert_eq!(out.frame.size(), canvas, "source {h}x{w}");
        assert_eq!(out.frame.data.len(), canvas.rgb8_len());
        assert_eq!(out.stats.scaled.rows, canvas.max_height);
        assert!(out.stats.scaled.cols <= canvas.max_width);
    }
}

#[test]
fn fixed_background_is_idempotent() {
    let canvas = CanvasSize::new(64, 64);
    let mut src = image::RgbImage::new(17, 31);
    for (x, y, px) in src.enumerate_pixels_mut() {
        *px = Rgb([(x * 13) as u8, (y * 7) as u8, ((x + y) * 3) as u8]);
    }
    let image = SourceImage::new(0, "g.png", src);

    let a = composite_frame(&image, canvas, &mut SolidBackground::BLACK).unwrap();
    let b = composite_frame(&image, canvas, &mut SolidBackground::BLACK).unwrap();
    assert_eq!(a.frame, b.frame);
    assert_eq!(a.stats, b.stats);
}

#[test]
fn black_background_zeroes_everything_outside_the_image() {
    let canvas = CanvasSize::new(30, 90);
    let out = composite_frame(
        &solid(0, 15, 10, [250, 250, 250]),
        canvas,
        &mut SolidBackground::BLACK,
    )
    .unwrap();
    let (dx, cols) = (out.stats.offset_x, out.stats.scaled.cols);
    assert_eq!((dx, cols), (35, 20));
    for y in 0..30 {
        for x in (0..dx).chain(dx + cols..90) {
            assert_eq!(out.frame.pixel(x, y), [0, 0, 0]);
        }
    }
}

#[test]
fn zero_width_source_is_degenerate_and_named() {
    let image = SourceImage::new(2, "empty.png", image::RgbImage::new(0, 5));
    let err = composite_frame(&image, CanvasSize::new(5, 5), &mut SolidBackground::BLACK)
        .unwrap_err();
    match err {
        StillreelError::DegenerateImage { path, index, .. } => {
            assert_eq!(path, std::path::PathBuf::from("empty.png"));
            assert_eq!(index, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scaled_range_is_reported() {
    let mut src = image::RgbImage::new(2, 2);
    src.put_pixel(0, 0, Rgb([5, 9, 9]));
    src.put_pixel(1, 1, Rgb([9, 240, 9]));
    let out = composite_frame(
        &SourceImage::new(0, "r.png", src),
        CanvasSize::new(2, 2),
        &mut SolidBackground::BLACK,
    )
    .unwrap();
    assert_eq!((out.stats.min_value, out.stats.max_value), (0, 240));
}
