use super::*;

#[test]
fn mode_parsing_accepts_only_known_selectors() {
    assert_eq!("noise".parse::<BackgroundMode>().unwrap(), BackgroundMode::Noise);
    assert_eq!("black".parse::<BackgroundMode>().unwrap(), BackgroundMode::Black);

    for bad in ["white", "Black", "", "noise "] {
        match bad.parse::<BackgroundMode>() {
            Err(StillreelError::UnknownBackgroundMode(v)) => assert_eq!(v, bad),
            other => panic!("unexpected for {bad:?}: {other:?}"),
        }
    }
}

#[test]
fn black_canvas_is_all_zero_and_sized() {
    let mut bg = SolidBackground::BLACK;
    let canvas = bg.canvas(CanvasSize::new(3, 5));
    assert_eq!(canvas.dimensions(), (5, 3));
    assert!(canvas.as_raw().iter().all(|&v| v == 0));
}

#[test]
fn solid_overwrites_previous_contents() {
    let mut canvas = image::RgbImage::from_pixel(2, 2, image::Rgb([9, 9, 9]));
    SolidBackground([1, 2, 3]).fill(&mut canvas);
    assert!(canvas.pixels().all(|p| p.0 == [1, 2, 3]));
}

#[test]
fn noise_is_redrawn_per_frame() {
    let mut bg = NoiseBackground::seeded(7);
    let a = bg.canvas(CanvasSize::new(16, 16));
    let b = bg.canvas(CanvasSize::new(16, 16));
    assert_eq!(a.dimensions(), (16, 16));
    assert_ne!(a.as_raw(), b.as_raw());
}

#[test]
fn seeded_noise_is_reproducible() {
    let a = NoiseBackground::seeded(42).canvas(CanvasSize::new(8, 8));
    let b = NoiseBackground::seeded(42).canvas(CanvasSize::new(8, 8));
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn noise_covers_the_byte_range() {
    let canvas = NoiseBackground::seeded(1).canvas(CanvasSize::new(64, 64));
    let min = canvas.as_raw().iter().copied().min().unwrap();
    let max = canvas.as_raw().iter().copied().max().unwrap();
    assert_eq!(min, 0);
    assert_eq!(max, 255);
}

#[test]
fn provider_for_mode() {
    let mut black = background_for_mode(BackgroundMode::Black, Some(3));
    assert!(black.canvas(CanvasSize::new(2, 2)).as_raw().iter().all(|&v| v == 0));

    let mut a = background_for_mode(BackgroundMode::Noise, Some(3));
    let mut b = background_for_mode(BackgroundMode::Noise, Some(3));
    assert_eq!(
        a.canvas(CanvasSize::new(4, 4)).as_raw(),
        b.canvas(CanvasSize::new(4, 4)).as_raw()
    );
}
