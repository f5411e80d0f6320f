use consensus_rank::traits::Fit;
use consensus_rank::ParamGuard;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;
use rank_ensemble::{PageRank, RankEnsemble};

fn page_rank_bench(c: &mut Criterion) {
    let mut rng = Xoshiro256Plus::seed_from_u64(40);
    let params = PageRank::params().check_unwrap();

    let mut benchmark = c.benchmark_group("similarity_rank");
    for n_samples in [50, 150, 500] {
        let x = Array2::random_using((n_samples, 4), Uniform::new(-1., 1.), &mut rng);
        let y = Array2::random_using((n_samples, 4), Uniform::new(-1., 1.), &mut rng);
        benchmark.bench_with_input(BenchmarkId::from_parameter(n_samples), &n_samples, |b, _| {
            b.iter(|| params.similarity_rank(black_box(&x), black_box(&y)).unwrap())
        });
    }
    benchmark.finish();
}

fn ensemble_bench(c: &mut Criterion) {
    let iris = rank_datasets::iris().unwrap();
    let records = iris.records();

    let mut benchmark = c.benchmark_group("rank_ensemble");
    benchmark.sample_size(10);
    for ensemble_size in [8, 16, 33] {
        benchmark.bench_with_input(
            BenchmarkId::new("iris", ensemble_size),
            &ensemble_size,
            |b, &size| {
                b.iter(|| {
                    RankEnsemble::params()
                        .ensemble_size(black_box(size))
                        .fit(&records)
                        .unwrap()
                })
            },
        );
    }
    benchmark.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = page_rank_bench, ensemble_bench
}
criterion_main!(benches);
