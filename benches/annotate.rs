use anyhow::Result;
use criterion::{Criterion, criterion_group, criterion_main};
use image::{Rgba, RgbaImage};
use std::hint::black_box;

use clipsight::clipboard::{ClipContent, ClipboardBackend, Target, encode_png};
use clipsight::viewer::ImageViewer;

/// Backend that swallows writes, isolating the stamping cost from the
/// write-back transport
struct NullBackend;

impl ClipboardBackend for NullBackend {
    fn read(&self, _target: Target) -> Result<ClipContent> {
        Ok(ClipContent::default())
    }

    fn write_text(&self, _target: Target, _text: &str) -> Result<()> {
        Ok(())
    }

    fn write_image(&self, _target: Target, _image: &RgbaImage) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Null"
    }
}

fn annotate_drag(c: &mut Criterion) {
    // A 1080p frame, the common region-capture upper bound
    let frame = RgbaImage::from_pixel(1920, 1080, Rgba([40, 40, 40, 255]));
    let backend = NullBackend;

    c.bench_function("annotate_drag_stamp", |b| {
        let mut viewer = ImageViewer::new();
        viewer.open_from_clipboard(Target::Clipboard, frame.clone());
        let mut x = 0u32;
        b.iter(|| {
            x = (x + 7) % 1920;
            viewer
                .annotate(black_box(x), black_box(540), &backend)
                .unwrap();
        });
    });
}

fn write_back_encode(c: &mut Criterion) {
    let frame = RgbaImage::from_pixel(1920, 1080, Rgba([40, 40, 40, 255]));

    c.bench_function("write_back_png_encode", |b| {
        b.iter(|| encode_png(black_box(&frame)).unwrap());
    });
}

criterion_group!(benches, annotate_drag, write_back_encode);
criterion_main!(benches);
