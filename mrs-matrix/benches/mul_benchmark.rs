use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mrs_field::Gf16;
use mrs_matrix::RmGf16;
use rand::SeedableRng;

fn fmadd_benchmark(c: &mut Criterion) {
    let mut rng = rand::rngs::StdRng::seed_from_u64(0);
    let v = RmGf16::rand(1024, &mut rng);
    let mut dst = RmGf16::zero(1024);
    let coeff = Gf16::from_u8(7);

    c.bench_function("rmgf16 row fmadd x1024", |b| {
        b.iter(|| {
            for i in 0..v.rnum() {
                dst.row_mut(i).fmaddi_scalar(v.row(i), black_box(coeff));
            }
        })
    });
}

criterion_group!(benches, fmadd_benchmark);
criterion_main!(benches);
