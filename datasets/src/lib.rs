//! `rank-datasets` provides the labeled data used by the consensus-rank experiments.
//!
//! ## The Big Picture
//!
//! `rank-datasets` is a crate in the `consensus-rank` workspace. Every loader returns a
//! [`consensus_rank::Samples`] collection: one [`LabeledSample`] per row with the row number as
//! original index.
//!
//! ## Current State
//!
//! Currently the following datasets are provided:
//!
//! * `["iris"]` : Fisher's iris flower dataset, 150 samples with four measures and three species
//! * `["generate"]` : synthetic Gaussian blobs, one label per blob
//!
//! Arbitrary CSV streams with numeric columns followed by a label column are read with
//! [`from_reader`].
//!
//! ## Using a dataset
//!
//! Enable the corresponding feature in your Cargo.toml:
//! ```ignore
//! rank-datasets = { version = "0.2.0", features = ["iris"] }
//! ```
//! and then load it as
//! ```ignore
//! let iris = rank_datasets::iris()?;
//! let labels = LabelMap::from_samples(&iris);
//! ```

use std::io::Read;

use consensus_rank::{LabeledSample, Samples};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use thiserror::Error;

#[cfg(feature = "generate")]
pub mod generate;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("cannot read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("record {record}: cannot parse {value:?} as a number")]
    Number { record: usize, value: String },
    #[error("record {record} has {found} fields, expected a label and at least one measure")]
    Fields { record: usize, found: usize },
    #[error(transparent)]
    BaseError(#[from] consensus_rank::Error),
}

/// Reads labeled samples from a CSV stream
///
/// Every column but the last is parsed as a number, the last one is the label. All records must
/// have the same number of fields and empty lines are skipped.
pub fn from_reader<R: Read>(reader: R, has_headers: bool) -> Result<Samples<f64>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(b',')
        .from_reader(reader);

    let mut samples = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() < 2 {
            return Err(DatasetError::Fields {
                record: index,
                found: record.len(),
            });
        }

        let (label, measures) = (&record[record.len() - 1], record.iter().take(record.len() - 1));
        let features = measures
            .map(|value| {
                value.trim().parse::<f64>().map_err(|_| DatasetError::Number {
                    record: index,
                    value: value.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        samples.push(LabeledSample::new(features, label.trim(), index));
    }

    Ok(Samples::new(samples)?)
}

/// Reads labeled samples from a gzip compressed CSV stream, see [`from_reader`]
pub fn from_gz_reader<R: Read>(reader: R, has_headers: bool) -> Result<Samples<f64>> {
    from_reader(GzDecoder::new(reader), has_headers)
}

#[cfg(feature = "iris")]
/// Fisher's iris flower dataset
///
/// The measures are sepal length, sepal width, petal length and petal width in centimetres. The
/// labels are `Iris-setosa`, `Iris-versicolor` and `Iris-virginica`, 50 samples each and in
/// that order.
pub fn iris() -> Result<Samples<f64>> {
    let data = include_bytes!("../data/iris.csv.gz");
    from_gz_reader(&data[..], true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use consensus_rank::prelude::Records;
    use ndarray::array;

    #[test]
    fn reads_measures_and_labels() {
        let csv = "1.0,2.5,a\n3,4,b\n\n5.5,-6,a\n";
        let samples = from_reader(csv.as_bytes(), false).unwrap();

        assert_eq!(samples.nsamples(), 3);
        assert_eq!(samples.nfeatures(), 2);
        assert_abs_diff_eq!(
            samples.records(),
            array![[1.0, 2.5], [3., 4.], [5.5, -6.]]
        );
        assert_eq!(samples.labels(), vec!["a", "b", "a"]);
        assert_eq!(
            samples.iter().map(|s| s.index()).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn header_is_skipped() {
        let csv = "x,label\n0.5,a\n";
        let samples = from_reader(csv.as_bytes(), true).unwrap();
        assert_eq!(samples.nsamples(), 1);
        assert_eq!(samples.labels(), vec!["a"]);
    }

    #[test]
    fn bad_number_is_an_error() {
        let csv = "1.0,a\nfoo,b\n";
        let res = from_reader(csv.as_bytes(), false);
        assert!(matches!(
            res,
            Err(DatasetError::Number { record: 1, ref value }) if value == "foo"
        ));
    }

    #[test]
    fn unequal_records_are_an_error() {
        let csv = "1.0,2.0,a\n1.0,b\n";
        let res = from_reader(csv.as_bytes(), false);
        assert!(matches!(res, Err(DatasetError::Csv(_))));
    }

    #[test]
    fn label_only_is_an_error() {
        let res = from_reader("a\nb\n".as_bytes(), false);
        assert!(matches!(
            res,
            Err(DatasetError::Fields {
                record: 0,
                found: 1
            })
        ));
    }

    #[cfg(feature = "iris")]
    #[test]
    fn test_iris() {
        let iris = iris().unwrap();

        assert_eq!(iris.nsamples(), 150);
        assert_eq!(iris.nfeatures(), 4);

        let labels = consensus_rank::LabelMap::from_samples(&iris);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.name(0), Some("Iris-setosa"));
        assert_eq!(labels.name(2), Some("Iris-virginica"));

        let first = iris.iter().next().unwrap();
        assert_abs_diff_eq!(
            ndarray::ArrayView1::from(first.features()),
            array![5.1, 3.5, 1.4, 0.2]
        );
        assert_eq!(first.label(), "Iris-setosa");
    }
}
