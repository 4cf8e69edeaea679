use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use viseg_image::{Image, ImageSize};
use viseg_imgproc::watershed::watershed;

fn bench_watershed(c: &mut Criterion) {
    let mut group = c.benchmark_group("Watershed");

    for (width, height) in [(256, 256), (512, 512), (1024, 1024)].iter() {
        group.throughput(Throughput::Elements((*width * *height) as u64));
        let parameter_string = format!("{width}x{height}");

        let size = ImageSize {
            width: *width,
            height: *height,
        };

        // a ridge along the middle column separating two basins
        let heights_data: Vec<f32> = (0..height * width)
            .map(|idx| {
                let x = idx % width;
                let dist_to_ridge = (x as f32 - *width as f32 / 2.0).abs();
                -dist_to_ridge
            })
            .collect();
        let heights = Image::<f32, 1>::new(size, heights_data).unwrap();

        let mut seeds_data = vec![0u32; height * width];
        seeds_data[height / 2 * width] = 1;
        seeds_data[height / 2 * width + width - 1] = 2;
        let seeds = Image::<u32, 1>::new(size, seeds_data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("two_basins", &parameter_string),
            &(&heights, &seeds),
            |b, i| b.iter(|| std::hint::black_box(watershed(i.0, i.1))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_watershed);
criterion_main!(benches);
