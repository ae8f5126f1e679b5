//! Conversion to and from nalgebra's `DMatrix`

use echelon_core::{Matrix, MatrixError};
use nalgebra::DMatrix;

pub fn to_dmatrix(m: &Matrix) -> DMatrix<f64> {
    DMatrix::from_row_slice(m.rows(), m.columns(), m.entries())
}

/// Copy a `DMatrix` into row-major order. Empty matrices are rejected.
pub fn from_dmatrix(d: &DMatrix<f64>) -> Result<Matrix, MatrixError> {
    let (rows, columns) = d.shape();
    // nalgebra stores column-major; transpose iteration order
    let entries = (0..rows)
        .flat_map(|i| (0..columns).map(move |j| d[(i, j)]))
        .collect();
    Matrix::new(rows, columns, entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_dmatrix_is_row_major() {
        let m = Matrix::from_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let d = to_dmatrix(&m);
        assert_eq!(d.shape(), (2, 3));
        assert_eq!(d[(0, 2)], 3.0);
        assert_eq!(d[(1, 0)], 4.0);
        assert_eq!(from_dmatrix(&d), Ok(m));
    }

    #[test]
    fn test_from_dmatrix_uses_nalgebra_results() {
        let d = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).transpose();
        let m = from_dmatrix(&d).unwrap();
        assert_eq!(m.to_nested(), vec![vec![1.0, 3.0], vec![2.0, 4.0]]);
    }

    #[test]
    fn test_from_empty_dmatrix() {
        let d = DMatrix::<f64>::zeros(0, 3);
        assert_eq!(
            from_dmatrix(&d),
            Err(MatrixError::InvalidShape { rows: 0, columns: 3, len: 0 })
        );
    }
}
