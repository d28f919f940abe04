//! Column, row and overall statistics of a 3x3 matrix.

use std::fmt::Debug;

use ndarray::{Array1, Array2, ArrayView1};
use num_traits::{NumCast, Zero};
use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};

/// Rows (and columns) of the matrix.
pub const SIDE: usize = 3;

/// Trait for the numeric types a matrix can hold.
///
/// `max`, `min` and `sum` stay in the element type, so integer input gives
/// integer results. Mean, variance and standard deviation are always `f64`.
pub trait MatrixElement: Copy + Clone + Debug + PartialOrd + NumCast + Zero + Serialize + 'static {
    /// Addition that reports overflow as `None`
    fn checked_sum(self, other: Self) -> Option<Self>;

    /// Convert self to f64
    fn as_f64(self) -> f64 {
        NumCast::from(self).unwrap_or(f64::NAN)
    }

    /// Whether self is unordered (NaN); never true for integers
    fn is_nan(self) -> bool {
        self.partial_cmp(&self).is_none()
    }
}

macro_rules! impl_matrix_element_int {
    ($($t:ty),*) => {
        $(impl MatrixElement for $t {
            fn checked_sum(self, other: Self) -> Option<Self> {
                self.checked_add(other)
            }
        })*
    };
}

macro_rules! impl_matrix_element_float {
    ($($t:ty),*) => {
        $(impl MatrixElement for $t {
            fn checked_sum(self, other: Self) -> Option<Self> {
                Some(self + other)
            }
        })*
    };
}

impl_matrix_element_int!(i8, i16, i32, i64, u8, u16, u32, u64);
impl_matrix_element_float!(f32, f64);

/// One statistic family: per-column, per-row and overall.
///
/// Serializes as `[columns, rows, overall]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate<T> {
    pub columns: Vec<T>,
    pub rows: Vec<T>,
    pub overall: T,
}

impl<T: Serialize> Serialize for Aggregate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(3)?;
        tuple.serialize_element(&self.columns)?;
        tuple.serialize_element(&self.rows)?;
        tuple.serialize_element(&self.overall)?;
        tuple.end()
    }
}

impl Aggregate<f64> {
    fn map(&self, f: fn(f64) -> f64) -> Self {
        Aggregate {
            columns: self.columns.iter().copied().map(f).collect(),
            rows: self.rows.iter().copied().map(f).collect(),
            overall: f(self.overall),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixStatistics<T> {
    pub mean: Aggregate<f64>,
    /// Population variance (divides by N).
    pub variance: Aggregate<f64>,
    #[serde(rename = "standard deviation")]
    pub standard_deviation: Aggregate<f64>,
    pub max: Aggregate<T>,
    pub min: Aggregate<T>,
    pub sum: Aggregate<T>,
}

impl<T: MatrixElement> MatrixStatistics<T> {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Apply `f` down every column, across every row and over all cells.
fn reduce<A, B, F>(matrix: &Array2<A>, f: F) -> Aggregate<B>
where
    A: Clone,
    F: Fn(ArrayView1<A>) -> B,
{
    let cells: Array1<A> = matrix.iter().cloned().collect();
    Aggregate {
        columns: matrix.columns().into_iter().map(&f).collect(),
        rows: matrix.rows().into_iter().map(&f).collect(),
        overall: f(cells.view()),
    }
}

/// Like `reduce`, but `None` from any lane fails the whole family.
fn try_reduce<A, B, F>(matrix: &Array2<A>, f: F) -> Option<Aggregate<B>>
where
    A: Clone,
    F: Fn(ArrayView1<A>) -> Option<B>,
{
    let cells: Array1<A> = matrix.iter().cloned().collect();
    Some(Aggregate {
        columns: matrix.columns().into_iter().map(&f).collect::<Option<Vec<_>>>()?,
        rows: matrix.rows().into_iter().map(&f).collect::<Option<Vec<_>>>()?,
        overall: f(cells.view())?,
    })
}

fn mean(lane: ArrayView1<f64>) -> f64 {
    lane.sum() / lane.len() as f64
}

fn variance(lane: ArrayView1<f64>) -> f64 {
    let mu = mean(lane.view());
    lane.fold(0.0, |acc, &x| acc + (x - mu) * (x - mu)) / lane.len() as f64
}

/// First NaN in the lane wins, otherwise the value `better` prefers.
fn extreme<T: MatrixElement>(lane: ArrayView1<T>, better: fn(&T, &T) -> bool) -> T {
    let mut best = lane[0];
    for &x in lane.iter() {
        if x.is_nan() {
            return x;
        }
        if better(&x, &best) {
            best = x;
        }
    }
    best
}

fn max<T: MatrixElement>(lane: ArrayView1<T>) -> T {
    extreme(lane, <T as PartialOrd>::gt)
}

fn min<T: MatrixElement>(lane: ArrayView1<T>) -> T {
    extreme(lane, <T as PartialOrd>::lt)
}

fn sum<T: MatrixElement>(lane: ArrayView1<T>) -> Option<T> {
    lane.iter().copied().try_fold(T::zero(), T::checked_sum)
}

/// Reshape nine values row-major into a 3x3 matrix and compute mean,
/// variance, standard deviation, max, min and sum for each column, each row
/// and the whole matrix.
pub fn calculate<T: MatrixElement>(values: &[T]) -> Result<MatrixStatistics<T>> {
    if values.len() != SIDE * SIDE {
        return Err(Error::InvalidInputSize { len: values.len() });
    }
    let matrix = Array2::from_shape_vec((SIDE, SIDE), values.to_vec())
        .map_err(|_| Error::InvalidInputSize { len: values.len() })?;
    let real = matrix.mapv(T::as_f64);

    let var = reduce(&real, variance);
    Ok(MatrixStatistics {
        mean: reduce(&real, mean),
        standard_deviation: var.map(f64::sqrt),
        variance: var,
        max: reduce(&matrix, max::<T>),
        min: reduce(&matrix, min::<T>),
        sum: try_reduce(&matrix, sum::<T>).ok_or(Error::SumOverflow)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sequence_example() {
        let stats = calculate(&[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        assert_eq!(stats.mean.columns, vec![3.0, 4.0, 5.0]);
        assert_eq!(stats.mean.rows, vec![1.0, 4.0, 7.0]);
        assert_eq!(stats.mean.overall, 4.0);

        assert_eq!(stats.sum.columns, vec![9, 12, 15]);
        assert_eq!(stats.sum.rows, vec![3, 12, 21]);
        assert_eq!(stats.sum.overall, 36);

        assert_eq!(stats.max.columns, vec![6, 7, 8]);
        assert_eq!(stats.max.rows, vec![2, 5, 8]);
        assert_eq!(stats.max.overall, 8);

        assert_eq!(stats.min.columns, vec![0, 1, 2]);
        assert_eq!(stats.min.rows, vec![0, 3, 6]);
        assert_eq!(stats.min.overall, 0);
    }

    #[test]
    fn test_population_variance_and_std() {
        let stats = calculate(&[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();

        for v in &stats.variance.columns {
            assert_relative_eq!(*v, 6.0, epsilon = 1e-12);
        }
        for v in &stats.variance.rows {
            assert_relative_eq!(*v, 2.0 / 3.0, epsilon = 1e-12);
        }
        assert_relative_eq!(stats.variance.overall, 60.0 / 9.0, epsilon = 1e-12);

        assert_relative_eq!(stats.standard_deviation.columns[0], 6.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.standard_deviation.rows[1], (2.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stats.standard_deviation.overall, 2.581988897471611, epsilon = 1e-12);
    }

    #[test]
    fn test_float_input() {
        let stats = calculate(&[2.0, 4.0, 6.0, 1.5, 3.5, 5.5, -1.0, 0.0, 1.0]).unwrap();
        assert_relative_eq!(stats.mean.overall, 22.5 / 9.0, epsilon = 1e-12);
        assert_eq!(stats.max.overall, 6.0);
        assert_eq!(stats.min.overall, -1.0);
        assert_eq!(stats.min.columns, vec![-1.0, 0.0, 1.0]);
        assert_relative_eq!(stats.sum.overall, 22.5, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_length_is_rejected() {
        for len in [0usize, 8, 10] {
            let values = vec![1i64; len];
            let err = calculate(&values).unwrap_err();
            assert!(matches!(err, Error::InvalidInputSize { len: l } if l == len));
            assert_eq!(err.to_string(), "List must contain nine numbers.");
        }
    }

    #[test]
    fn test_integer_sum_overflow_is_an_error() {
        let err = calculate(&[100i8; 9]).unwrap_err();
        assert!(matches!(err, Error::SumOverflow));

        let err = calculate(&[i64::MAX / 4; 9]).unwrap_err();
        assert!(matches!(err, Error::SumOverflow));

        let stats = calculate(&[i64::MAX / 9; 9]).unwrap();
        assert_eq!(stats.sum.overall, (i64::MAX / 9) * 9);
    }

    #[test]
    fn test_nan_propagates_wherever_it_sits() {
        let nan = f64::NAN;
        for position in 0..9 {
            let mut values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
            values[position] = nan;
            let stats = calculate(&values).unwrap();

            assert!(stats.max.overall.is_nan());
            assert!(stats.min.overall.is_nan());
            assert!(stats.max.columns[position % 3].is_nan());
            assert!(stats.min.rows[position / 3].is_nan());
            assert!(!stats.max.columns[(position + 1) % 3].is_nan());
            assert!(!stats.min.rows[(position / 3 + 1) % 3].is_nan());
        }
    }

    #[test]
    fn test_integers_are_never_nan() {
        assert!(!5i32.is_nan());
        assert!(MatrixElement::is_nan(f32::NAN));
    }

    #[test]
    fn test_json_layout() {
        let stats = calculate(&[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&stats.to_json().unwrap()).unwrap();

        assert_eq!(value["max"], serde_json::json!([[6, 7, 8], [2, 5, 8], 8]));
        assert_eq!(value["sum"], serde_json::json!([[9, 12, 15], [3, 12, 21], 36]));
        assert_eq!(value["mean"], serde_json::json!([[3.0, 4.0, 5.0], [1.0, 4.0, 7.0], 4.0]));
        assert!(value.get("standard deviation").is_some());
        assert!(value.get("variance").is_some());
    }
}
