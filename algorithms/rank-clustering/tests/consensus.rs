use consensus_rank::prelude::*;
use ndarray::{Array1, Array2, Axis};
use rank_clustering::{CoAssociation, ConsensusKMeans, KMeans, VarianceSplit};
use rank_ensemble::RankEnsemble;
use rand_isaac::Isaac64Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

/// Appends `rounds` rank variance features to the iris measures and returns the variance columns
fn augment(iris: &mut Samples<f64>, rounds: usize) -> Array2<f64> {
    let mut columns = Vec::new();
    for round in 0..rounds {
        let variance = RankEnsemble::params()
            .ensemble_size(6)
            .with_rng(Xoshiro256Plus::seed_from_u64(round as u64 + 1))
            .fit(&iris.records())
            .unwrap()
            .into_variance();
        iris.append_feature(variance.view()).unwrap();
        columns.push(variance);
    }

    let views = columns.iter().map(|c| c.view()).collect::<Vec<_>>();
    ndarray::stack(Axis(1), &views).unwrap()
}

#[test]
fn consensus_on_iris_measures_isolates_setosa() {
    let iris = rank_datasets::iris().unwrap();
    let labels = LabelMap::from_samples(&iris);
    let targets = labels.targets(&iris).unwrap();

    let clustering = ConsensusKMeans::params(3)
        .n_runs(30)
        .fit(&iris.records())
        .unwrap();
    let report: EntropyReport<f64> =
        EntropyReport::evaluate(&labels, &targets, clustering.memberships(), 3).unwrap();

    // setosa samples share one cluster which holds nothing else
    let table = report.table().counts();
    let setosa = table.row(0);
    let cluster = setosa.iter().position(|&c| c > 0).unwrap();
    assert_eq!(setosa[cluster], 50);
    assert_eq!(table.column(cluster).sum(), 50);
    assert!(report.label_entropy()[0].abs() < 1e-12);
}

#[test]
fn augmentation_grows_the_features() {
    let mut iris = rank_datasets::iris().unwrap();
    let variances = augment(&mut iris, 2);

    assert_eq!(iris.nfeatures(), 6);
    assert_eq!(variances.dim(), (150, 2));
    assert!(variances.iter().all(|&v| v >= 0. && v.is_finite()));

    let records = iris.records();
    for (round, variance) in variances.columns().into_iter().enumerate() {
        assert_eq!(records.column(4 + round), variance);
    }
}

#[test]
fn consensus_over_variance_columns() {
    let mut iris = rank_datasets::iris().unwrap();
    let labels = LabelMap::from_samples(&iris);
    let targets = labels.targets(&iris).unwrap();
    let variances = augment(&mut iris, 2);

    let clustering = ConsensusKMeans::params(3)
        .n_runs(20)
        .fit(&variances)
        .unwrap();
    iris.assign_clusters(clustering.memberships()).unwrap();

    assert!(iris.iter().all(|s| s.cluster().map_or(false, |c| c < 3)));
    assert_eq!(clustering.outliers().counts().dim(), (3, 2));
    assert!(clustering.outliers().total() <= 150 * 2);

    let report: EntropyReport<f64> =
        EntropyReport::evaluate(&labels, &targets, clustering.memberships(), 3).unwrap();
    assert_eq!(report.table().row_sums(), Array1::from_elem(3, 50));
    assert!(report
        .label_entropy()
        .iter()
        .all(|&h| h >= 0. && h <= report.max_entropy() + 1e-12));
}

#[test]
fn split_ensemble_cross_validation() {
    let mut iris = rank_datasets::iris().unwrap();
    let labels = LabelMap::from_samples(&iris);
    let targets = labels.targets(&iris).unwrap();
    let variances = augment(&mut iris, 3);

    let mut coassociation = CoAssociation::new(150);
    for feature in 0..variances.ncols() {
        let partition = VarianceSplit::params()
            .feature(feature)
            .fit(&variances)
            .unwrap();
        assert!(partition.n_groups() <= 3);
        coassociation.accumulate(partition.memberships()).unwrap();
    }
    assert_eq!(coassociation.n_partitions(), 3);

    let meta = coassociation.to_records::<f64>();
    let model = KMeans::params_with_rng(3, Isaac64Rng::seed_from_u64(1))
        .n_runs(1)
        .fit(&meta)
        .unwrap();
    let memberships = model.predict(&meta);

    let report: EntropyReport<f64> =
        EntropyReport::evaluate(&labels, &targets, &memberships, 3).unwrap();
    assert_eq!(report.table().counts().sum(), 150);
}

#[test]
fn end_to_end_with_default_settings() {
    let iris = rank_datasets::iris().unwrap();
    let labels = LabelMap::from_samples(&iris);
    let targets = labels.targets(&iris).unwrap();

    let variance = RankEnsemble::params()
        .fit(&iris.records())
        .unwrap()
        .into_variance()
        .insert_axis(Axis(1));
    let clustering = ConsensusKMeans::params(3).fit(&variance).unwrap();

    assert_eq!(clustering.coassociation().n_partitions(), 100);
    assert!(clustering.outliers().total() < 150);

    let report: EntropyReport<f64> =
        EntropyReport::evaluate(&labels, &targets, clustering.memberships(), 3).unwrap();
    assert_eq!(report.table().row_sums(), Array1::from_elem(3, 50));
}
