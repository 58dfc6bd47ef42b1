use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Pivots smaller than this are treated as zero by Gaussian elimination.
const PIVOT_EPSILON: f64 = 1e-12;

/// Combines two vectors element by element.
///
/// # Errors
/// Returns [`RuntimeError::DimensionMismatch`] when the lengths differ.
pub fn elementwise(operation: &'static str,
                   left: &[f64],
                   right: &[f64],
                   op: impl Fn(f64, f64) -> f64)
                   -> EvalResult<Vec<f64>> {
    if left.len() != right.len() {
        return Err(RuntimeError::DimensionMismatch { operation });
    }
    Ok(left.iter().zip(right).map(|(a, b)| op(*a, *b)).collect())
}

/// Combines two matrices element by element.
///
/// # Errors
/// Returns [`RuntimeError::DimensionMismatch`] when the shapes differ.
pub fn elementwise_matrix(operation: &'static str,
                          left: &[Vec<f64>],
                          right: &[Vec<f64>],
                          op: impl Fn(f64, f64) -> f64)
                          -> EvalResult<Vec<Vec<f64>>> {
    if left.len() != right.len() {
        return Err(RuntimeError::DimensionMismatch { operation });
    }
    left.iter()
        .zip(right)
        .map(|(a, b)| elementwise(operation, a, b, &op))
        .collect()
}

/// Multiplies every element of a matrix by `factor`.
#[must_use]
pub fn scale_matrix(matrix: &[Vec<f64>], factor: f64) -> Vec<Vec<f64>> {
    matrix.iter()
          .map(|row| row.iter().map(|value| value * factor).collect())
          .collect()
}

/// Swaps rows and columns.
///
/// # Example
/// ```
/// use mathtree::interpreter::evaluator::matrix::transpose;
///
/// let matrix = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
/// assert_eq!(transpose(&matrix),
///            vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
/// ```
#[must_use]
pub fn transpose(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let columns = matrix.first().map_or(0, Vec::len);
    (0..columns).map(|column| matrix.iter().map(|row| row[column]).collect())
                .collect()
}

/// Matrix product.
///
/// # Errors
/// Returns [`RuntimeError::DimensionMismatch`] unless the column count of
/// `left` equals the row count of `right`.
pub fn multiply(left: &[Vec<f64>], right: &[Vec<f64>]) -> EvalResult<Vec<Vec<f64>>> {
    let inner = left.first().map_or(0, Vec::len);
    if inner != right.len() {
        return Err(RuntimeError::DimensionMismatch { operation: "*" });
    }
    let columns = right.first().map_or(0, Vec::len);
    Ok(left.iter()
           .map(|row| {
               (0..columns).map(|column| {
                               row.iter()
                                  .zip(right)
                                  .map(|(value, other)| value * other[column])
                                  .sum()
                           })
                           .collect()
           })
           .collect())
}

/// Matrix-vector product, treating the vector as a column.
///
/// # Errors
/// Returns [`RuntimeError::DimensionMismatch`] when the column count of the
/// matrix differs from the vector length.
pub fn multiply_vector(matrix: &[Vec<f64>], vector: &[f64]) -> EvalResult<Vec<f64>> {
    let mismatch = |_: RuntimeError| RuntimeError::DimensionMismatch { operation: "*" };
    matrix.iter().map(|row| dot_product(row, vector).map_err(mismatch)).collect()
}

/// Scalar product of two vectors.
///
/// # Errors
/// Returns [`RuntimeError::DimensionMismatch`] when the lengths differ.
pub fn dot_product(left: &[f64], right: &[f64]) -> EvalResult<f64> {
    Ok(elementwise("dotproduct", left, right, |a, b| a * b)?.into_iter().sum())
}

/// Vector product of two three-dimensional vectors.
///
/// # Errors
/// Returns [`RuntimeError::DimensionMismatch`] unless both vectors have three
/// elements.
pub fn cross_product(left: &[f64], right: &[f64]) -> EvalResult<Vec<f64>> {
    let (&[a1, a2, a3], &[b1, b2, b3]) = (left, right) else {
        return Err(RuntimeError::DimensionMismatch { operation: "crossproduct" });
    };
    Ok(vec![a2.mul_add(b3, -(a3 * b2)),
            a3.mul_add(b1, -(a1 * b3)),
            a1.mul_add(b2, -(a2 * b1))])
}

/// Checks that a matrix is square and returns its size.
fn square_size(operation: &'static str, matrix: &[Vec<f64>]) -> EvalResult<usize> {
    let size = matrix.len();
    if matrix.iter().any(|row| row.len() != size) {
        return Err(RuntimeError::DimensionMismatch { operation });
    }
    Ok(size)
}

/// Determinant by Gaussian elimination with partial pivoting.
///
/// # Errors
/// Returns [`RuntimeError::DimensionMismatch`] for a non-square matrix.
///
/// # Example
/// ```
/// use mathtree::interpreter::evaluator::matrix::determinant;
///
/// let matrix = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
/// assert!((determinant(&matrix).unwrap() + 2.0).abs() < 1e-12);
/// ```
pub fn determinant(matrix: &[Vec<f64>]) -> EvalResult<f64> {
    let size = square_size("det", matrix)?;
    let mut rows = matrix.to_vec();
    let mut result = 1.0;
    for column in 0..size {
        let pivot = pivot_row(&rows, column);
        if rows[pivot][column].abs() < PIVOT_EPSILON {
            return Ok(0.0);
        }
        if pivot != column {
            rows.swap(pivot, column);
            result = -result;
        }
        result *= rows[column][column];
        for row in column + 1..size {
            let factor = rows[row][column] / rows[column][column];
            for k in column..size {
                rows[row][k] -= factor * rows[column][k];
            }
        }
    }
    Ok(result)
}

/// Row at or below `column` with the largest entry in that column.
fn pivot_row(rows: &[Vec<f64>], column: usize) -> usize {
    (column..rows.len()).max_by(|&a, &b| rows[a][column].abs().total_cmp(&rows[b][column].abs()))
                        .unwrap_or(column)
}

/// Inverse by Gauss-Jordan elimination.
///
/// # Errors
/// - [`RuntimeError::DimensionMismatch`] for a non-square matrix.
/// - [`RuntimeError::InvalidArgument`] for a singular matrix.
pub fn inverse(matrix: &[Vec<f64>]) -> EvalResult<Vec<Vec<f64>>> {
    let size = square_size("inverse", matrix)?;
    let mut rows = matrix.to_vec();
    let mut result: Vec<Vec<f64>> =
        (0..size).map(|row| (0..size).map(|column| if row == column { 1.0 } else { 0.0 }).collect())
                 .collect();
    for column in 0..size {
        let pivot = pivot_row(&rows, column);
        if rows[pivot][column].abs() < PIVOT_EPSILON {
            let details = "the matrix is singular".to_string();
            return Err(RuntimeError::InvalidArgument { operation: "inverse",
                                                       details });
        }
        rows.swap(pivot, column);
        result.swap(pivot, column);
        let divisor = rows[column][column];
        for k in 0..size {
            rows[column][k] /= divisor;
            result[column][k] /= divisor;
        }
        for row in 0..size {
            if row == column {
                continue;
            }
            let factor = rows[row][column];
            for k in 0..size {
                rows[row][k] -= factor * rows[column][k];
                result[row][k] -= factor * result[column][k];
            }
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_of_matrix_and_identity() {
        let matrix = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let identity = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(multiply(&matrix, &identity), Ok(matrix));
    }

    #[test]
    fn product_dimension_mismatch() {
        let left = vec![vec![1.0, 2.0, 3.0]];
        let right = vec![vec![1.0, 2.0]];
        assert_eq!(multiply(&left, &right),
                   Err(RuntimeError::DimensionMismatch { operation: "*" }));
    }

    #[test]
    fn inverse_of_diagonal() {
        let matrix = vec![vec![2.0, 0.0], vec![0.0, 4.0]];
        assert_eq!(inverse(&matrix), Ok(vec![vec![0.5, 0.0], vec![0.0, 0.25]]));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let matrix = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        assert!(matches!(inverse(&matrix), Err(RuntimeError::InvalidArgument { .. })));
        assert_eq!(determinant(&matrix), Ok(0.0));
    }

    #[test]
    fn cross_product_of_unit_vectors() {
        assert_eq!(cross_product(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]),
                   Ok(vec![0.0, 0.0, 1.0]));
        assert!(cross_product(&[1.0, 0.0], &[0.0, 1.0]).is_err());
    }
}
