//! Summary statistics for the census "Adult" extract and for 3x3 matrices.
//!
//! ```no_run
//! let summary = demostat::demographic_data_analyzer("adult.data.csv", false)?;
//! println!("{}", summary.highest_earning_country);
//!
//! let stats = demostat::calculate(&[0, 1, 2, 3, 4, 5, 6, 7, 8])?;
//! assert_eq!(stats.sum.overall, 36);
//! # Ok::<(), demostat::Error>(())
//! ```

pub mod csv_reader;
pub mod dataset;
pub mod demographics;
pub mod error;
pub mod matrix;
pub mod viewer;

pub use csv_reader::{read_data, DatasetReader, Record, Salary};
pub use dataset::Dataset;
pub use demographics::{demographic_data_analyzer, summarize, DemographicSummary};
pub use error::{Error, Result};
pub use matrix::{calculate, Aggregate, MatrixElement, MatrixStatistics};
