mod algorithm;
mod coassociation;
mod errors;
mod hyperparams;
mod outliers;

pub use algorithm::*;
pub use coassociation::CoAssociation;
pub use errors::*;
pub use hyperparams::*;
pub use outliers::OutlierReport;
