use answer_sheet::config::ImageScanConfig;
use answer_sheet::scanner::{scan_image, scan_text};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{GrayImage, Luma};

fn exam_page(questions: u32) -> String {
    let mut page = String::from("EXAMEN FINAL\nNombre: ____________\n");
    for q in 1..=questions {
        page.push_str(&format!("{}. Pregunta numero {}\n", q, q));
        for (i, label) in ['A', 'B', 'C', 'D', 'E'].iter().enumerate() {
            let mark = if (q as usize + i) % 5 == 0 { " X" } else { "" };
            page.push_str(&format!("{}) opcion {}{}\n", label, i + 1, mark));
        }
    }
    page
}

fn scanned_page() -> GrayImage {
    let mut page = GrayImage::from_pixel(1190, 1684, Luma([245]));
    for band in 0..15u32 {
        let y0 = band * 84 + 30;
        let x0 = (band % 5) * 238 + 100;
        for y in y0..y0 + 20 {
            for x in x0..x0 + 20 {
                page.put_pixel(x, y, Luma([15]));
            }
        }
    }
    page
}

fn bench_text_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_text");
    for questions in [10u32, 50, 200] {
        let page = exam_page(questions);
        group.bench_with_input(BenchmarkId::from_parameter(questions), &page, |b, page| {
            b.iter(|| scan_text(black_box(page)))
        });
    }
    group.finish();
}

fn bench_image_scan(c: &mut Criterion) {
    let page = scanned_page();
    let config = ImageScanConfig::default();
    c.bench_function("scan_image_a4", |b| {
        b.iter(|| scan_image(black_box(&page), &config))
    });
}

criterion_group!(benches, bench_text_scan, bench_image_scan);
criterion_main!(benches);
