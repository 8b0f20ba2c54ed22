//! Benchmarks for the retroize filters.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::Rgb;

use retroize::filters::{floyd_steinberg, web_palette};
use retroize::{
    crt_emulate, ditherize_palette, extract_palette, halftone, pixelize, quantize, voronoi_cells,
    Bitmap, CrtParams, HalftoneOptions, QuantizeMethod, QuantizeOptions, VoronoiCellOptions,
};

/// A smooth gradient with some high-frequency texture.
fn photo(width: u32, height: u32) -> Bitmap {
    Bitmap::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width) as u8,
            (y * 255 / height) as u8,
            ((x ^ y) & 0xFF) as u8,
        ])
    })
}

// -- Colour reduction --

fn bench_colour(c: &mut Criterion) {
    let mut group = c.benchmark_group("colour");
    let image = photo(256, 256);
    let web = web_palette();

    group.bench_function("extract_palette", |b| {
        b.iter(|| extract_palette(black_box(&image)).unwrap())
    });

    for method in [QuantizeMethod::MedianCut, QuantizeMethod::MaxCoverage, QuantizeMethod::FastOctree] {
        let options = QuantizeOptions {
            colors: 16,
            method,
            kmeans: 0,
            dither: false,
        };
        group.bench_function(format!("quantize_{}", method), |b| {
            b.iter(|| quantize(black_box(&image), &options))
        });
    }

    let kmeans = QuantizeOptions {
        colors: 16,
        kmeans: 4,
        ..Default::default()
    };
    group.bench_function("quantize_kmeans_dither", |b| {
        b.iter(|| quantize(black_box(&image), &kmeans))
    });

    group.bench_function("floyd_steinberg_web", |b| {
        b.iter(|| floyd_steinberg(black_box(&image), &web))
    });

    group.bench_function("ditherize_palette", |b| {
        b.iter(|| ditherize_palette(black_box(&image)))
    });

    group.finish();
}

// -- Geometry --

fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("effects");
    let image = photo(320, 240);

    group.bench_function("pixelize_4", |b| {
        b.iter(|| pixelize(black_box(&image), 4, true))
    });

    let params = CrtParams::default();
    group.bench_function("crt_emulate", |b| {
        b.iter(|| crt_emulate(black_box(&image), &params).unwrap())
    });

    let options = HalftoneOptions {
        cell_size: 8,
        seed: Some(7),
        ..Default::default()
    };
    group.bench_function("halftone_circle_8", |b| {
        b.iter(|| halftone(black_box(&image), &options).unwrap())
    });

    group.finish();
}

fn bench_voronoi(c: &mut Criterion) {
    let mut group = c.benchmark_group("voronoi");
    group.sample_size(20);

    for size in [1.0_f32, 0.1] {
        let options = VoronoiCellOptions {
            size,
            seed: Some(42),
            ..Default::default()
        };
        group.bench_function(format!("cells_size_{}", size), |b| {
            b.iter(|| voronoi_cells(black_box(&options)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_colour, bench_effects, bench_voronoi);
criterion_main!(benches);
