mod algorithm;
mod errors;
mod hyperparams;
mod seeding;

pub use algorithm::*;
pub use errors::*;
pub use hyperparams::*;
