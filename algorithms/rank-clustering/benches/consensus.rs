use consensus_rank::traits::Fit;
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_isaac::Isaac64Rng;
use rank_clustering::{ConsensusKMeans, KMeans, VarianceSplit};
use rank_datasets::generate::blobs;

fn k_means_bench(c: &mut Criterion) {
    let mut rng = Isaac64Rng::seed_from_u64(40);
    let cluster_sizes = vec![(100, 4), (400, 10), (3000, 10)];

    let mut benchmark = c.benchmark_group("m_k_means");
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for (cluster_size, n_clusters) in cluster_sizes {
        let rng = &mut rng;
        let centroids = Array2::random_using((n_clusters, 3), Uniform::new(-30., 30.), rng);
        let records = blobs(cluster_size, &centroids, rng);
        benchmark.bench_function(BenchmarkId::new("m_k_means", cluster_size), |bencher| {
            bencher.iter(|| {
                KMeans::params_with_rng(black_box(n_clusters), black_box(rng.clone()))
                    .max_n_iterations(black_box(1000))
                    .tolerance(black_box(1e-3))
                    .fit(&records)
                    .unwrap()
            });
        });
    }

    benchmark.finish();
}

fn consensus_bench(c: &mut Criterion) {
    let mut rng = Isaac64Rng::seed_from_u64(40);
    let centroids = Array2::random_using((3, 4), Uniform::new(-10., 10.), &mut rng);
    let records = blobs(50, &centroids, &mut rng);

    let mut benchmark = c.benchmark_group("consensus_k_means");
    benchmark.sample_size(10);
    for n_runs in [10, 50, 100] {
        benchmark.bench_with_input(
            BenchmarkId::new("consensus_k_means", n_runs),
            &n_runs,
            |bencher, &n_runs| {
                bencher.iter(|| {
                    ConsensusKMeans::params(3)
                        .n_runs(black_box(n_runs))
                        .fit(&records)
                        .unwrap()
                });
            },
        );
    }

    benchmark.finish();
}

fn variance_split_bench(c: &mut Criterion) {
    let mut rng = Isaac64Rng::seed_from_u64(40);

    let mut benchmark = c.benchmark_group("variance_split");
    for n_samples in [50, 150, 500] {
        let records = Array2::random_using((n_samples, 1), Uniform::new(0., 1.), &mut rng);
        benchmark.bench_function(BenchmarkId::new("variance_split", n_samples), |bencher| {
            bencher.iter(|| VarianceSplit::params().fit(black_box(&records)).unwrap());
        });
    }

    benchmark.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = k_means_bench, consensus_bench, variance_split_bench
}
criterion_main!(benches);
