use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use rand::Rng;
use streamvb_simd::{
    read_all_delta_scalar, read_all_scalar, stream, write_all_delta_scalar, write_all_scalar,
    Accelerated,
};

pub fn random_8bit(count: usize) -> Vec<u32> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| rng.gen::<u8>() as u32).collect()
}

pub fn random_any_bit(count: usize) -> Vec<u32> {
    let mut input: Vec<u32> = Vec::with_capacity(count);
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let sz = rng.gen_range(1..5);
        let b = match sz {
            1 => rng.gen::<u8>() as u32,
            2 => rng.gen::<u16>() as u32,
            3 => rng.gen_range(0u32..16777216),
            4 => rng.gen::<u32>(),
            _ => panic!("impossible"),
        };
        input.push(b);
    }
    input
}

pub fn random_sorted(count: usize) -> Vec<u32> {
    let mut rng = rand::thread_rng();
    let mut acc = 0u32;
    (0..count)
        .map(|_| {
            acc = acc.wrapping_add(rng.gen_range(0..1000));
            acc
        })
        .collect()
}

pub fn bench_memcpy(c: &mut Criterion) {
    let mut group = c.benchmark_group("memcpy");
    for power in 10..15 {
        let n = 1 << power;
        let input: Vec<u32> = random_any_bit(n);
        let mut output: Vec<u32> = vec![0; n];
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(format!("n={}k", n / 1024), &input, |b, input| {
            b.iter(|| output.copy_from_slice(input))
        });
    }
    group.finish();
}

pub fn bench_encode(c: &mut Criterion) {
    let kernel = Accelerated::new();
    let mut group = c.benchmark_group("encode");
    for power in 10..15 {
        let n = 1 << power;

        for (bitname, input) in [("8bit", random_8bit(n)), ("any-bit", random_any_bit(n))] {
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(
                format!("scalar/{}/n={}k", bitname, n / 1024),
                &input,
                |b, input| b.iter(|| write_all_scalar(input)),
            );
            if let Some(kernel) = kernel {
                group.bench_with_input(
                    format!("accelerated/{}/n={}k", bitname, n / 1024),
                    &input,
                    |b, input| b.iter(|| stream::write_all_accelerated(kernel, input)),
                );
            }
        }
    }
    group.finish();
}

pub fn bench_decode(c: &mut Criterion) {
    let kernel = Accelerated::new();
    let mut group = c.benchmark_group("decode");
    for power in 10..15 {
        let n = 1 << power;

        for (bitname, input) in [("8bit", random_8bit(n)), ("any-bit", random_any_bit(n))] {
            let bytes = write_all_scalar(&input);
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(
                format!("scalar/{}/n={}k", bitname, n / 1024),
                &bytes,
                |b, bytes| b.iter(|| read_all_scalar(n, bytes)),
            );
            if let Some(kernel) = kernel {
                group.bench_with_input(
                    format!("accelerated/{}/n={}k", bitname, n / 1024),
                    &bytes,
                    |b, bytes| b.iter(|| stream::read_all_accelerated(kernel, n, bytes)),
                );
            }
        }
    }
    group.finish();
}

pub fn bench_delta(c: &mut Criterion) {
    let kernel = Accelerated::new();
    let mut group = c.benchmark_group("delta");
    for power in 10..15 {
        let n = 1 << power;
        let input = random_sorted(n);
        let bytes = write_all_delta_scalar(&input, 0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(format!("encode/scalar/n={}k", n / 1024), &input, |b, input| {
            b.iter(|| write_all_delta_scalar(input, 0))
        });
        group.bench_with_input(format!("decode/scalar/n={}k", n / 1024), &bytes, |b, bytes| {
            b.iter(|| read_all_delta_scalar(n, bytes, 0))
        });
        if let Some(kernel) = kernel {
            group.bench_with_input(
                format!("encode/accelerated/n={}k", n / 1024),
                &input,
                |b, input| b.iter(|| stream::write_all_delta_accelerated(kernel, input, 0)),
            );
            group.bench_with_input(
                format!("decode/accelerated/n={}k", n / 1024),
                &bytes,
                |b, bytes| b.iter(|| stream::read_all_delta_accelerated(kernel, n, bytes, 0)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_memcpy, bench_encode, bench_decode, bench_delta);
criterion_main!(benches);
