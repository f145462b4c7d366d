use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use tictactoe_vision::{resolve_cells, LineClusterer, LineDetector};

fn lattice_image() -> RgbImage {
    let mut img = RgbImage::from_pixel(320, 320, Rgb([255, 255, 255]));
    for (x, y, px) in img.enumerate_pixels_mut() {
        let (xf, yf) = (x as f32, y as f32);
        let near = |v: f32| [40.0, 120.0, 200.0, 280.0].iter().any(|p| (v - p).abs() <= 1.5);
        if near(yf - 0.035 * xf) || near(xf - 0.052 * yf) {
            *px = Rgb([0, 0, 0]);
        }
    }
    img
}

fn bench_detect(c: &mut Criterion) {
    let img = lattice_image();
    let detector = LineDetector::default();
    c.bench_function("detect_segments_320", |b| {
        b.iter(|| detector.detect_rgb(black_box(&img)))
    });
}

fn bench_cluster_and_resolve(c: &mut Criterion) {
    let img = lattice_image();
    let segments = LineDetector::default().detect_rgb(&img);
    let clusterer = LineClusterer::default();
    c.bench_function("cluster_and_resolve", |b| {
        b.iter(|| {
            clusterer
                .cluster(black_box(&segments))
                .and_then(|lines| resolve_cells(&lines))
        })
    });
}

criterion_group!(benches, bench_detect, bench_cluster_and_resolve);
criterion_main!(benches);
