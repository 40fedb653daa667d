//! Dense Hermitian operators.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Largest width for which dense operators are built.
pub const MAX_DENSE_QUBITS: u32 = 16;

/// Maximum element-wise deviation from Hermiticity that is accepted.
const HERMITIAN_TOL: f64 = 1e-9;

/// A dense Hermitian operator on `num_qubits` qubits.
///
/// Row and column indices are basis indices, with qubit `i` as bit `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixOperator {
    matrix: Array2<Complex64>,
    num_qubits: u32,
}

impl MatrixOperator {
    /// Wrap a square Hermitian matrix whose dimension is a power of two.
    pub fn new(matrix: Array2<Complex64>) -> SimResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || rows == 0 || !rows.is_power_of_two() {
            return Err(SimError::InvalidDimension { rows, cols });
        }
        let num_qubits = rows.trailing_zeros();
        if num_qubits > MAX_DENSE_QUBITS {
            return Err(SimError::TooLarge {
                num_qubits,
                max: MAX_DENSE_QUBITS,
            });
        }
        let deviation = hermitian_deviation(&matrix);
        if deviation > HERMITIAN_TOL {
            return Err(SimError::NotHermitian(deviation));
        }
        Ok(Self { matrix, num_qubits })
    }

    /// Build from a row-major element list.
    pub fn from_row_major(num_qubits: u32, data: Vec<Complex64>) -> SimResult<Self> {
        let dim = 1usize << num_qubits;
        if data.len() != dim * dim {
            return Err(SimError::InvalidDimension {
                rows: dim,
                cols: data.len() / dim.max(1),
            });
        }
        let matrix = Array2::from_shape_vec((dim, dim), data)
            .map_err(|_| SimError::InvalidDimension { rows: dim, cols: dim })?;
        Self::new(matrix)
    }

    /// The zero operator.
    pub fn zeros(num_qubits: u32) -> SimResult<Self> {
        check_width(num_qubits)?;
        let dim = 1usize << num_qubits;
        Ok(Self {
            matrix: Array2::zeros((dim, dim)),
            num_qubits,
        })
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Width of the operator.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Dimension `2^num_qubits`.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Elements in row-major order.
    pub fn to_row_major(&self) -> Vec<Complex64> {
        self.matrix.iter().copied().collect()
    }

    /// True if the matrix is `c·I` for some real `c`.
    pub fn is_identity(&self, tol: f64) -> bool {
        let first = self.matrix[[0, 0]];
        self.matrix.indexed_iter().all(|((r, c), v)| {
            if r == c {
                (v - first).norm() < tol
            } else {
                v.norm() < tol
            }
        })
    }

    /// True if every off-diagonal element vanishes.
    pub fn is_diagonal(&self, tol: f64) -> bool {
        self.matrix
            .indexed_iter()
            .all(|((r, c), v)| r == c || v.norm() < tol)
    }

    /// `I ⊗ M`: the same operator on a wider register, acting trivially on
    /// the added high-index qubits.
    pub fn extend(&self, num_qubits: u32) -> SimResult<Self> {
        if num_qubits < self.num_qubits {
            return Err(SimError::CannotShrink {
                from: self.num_qubits,
                to: num_qubits,
            });
        }
        if num_qubits == self.num_qubits {
            return Ok(self.clone());
        }
        check_width(num_qubits)?;
        let inner = self.dim();
        let dim = 1usize << num_qubits;
        let mut matrix = Array2::zeros((dim, dim));
        for high in 0..(dim / inner) {
            let offset = high * inner;
            for ((r, c), v) in self.matrix.indexed_iter() {
                matrix[[offset + r, offset + c]] = *v;
            }
        }
        Ok(Self { matrix, num_qubits })
    }

    /// `⟨ψ|M|ψ⟩` for a state vector of matching dimension.
    pub fn expectation(&self, state: &[Complex64]) -> SimResult<f64> {
        if state.len() != self.dim() {
            return Err(SimError::WidthMismatch {
                expected: self.dim(),
                got: state.len(),
            });
        }
        let mut total = Complex64::new(0.0, 0.0);
        for ((r, c), v) in self.matrix.indexed_iter() {
            if v.norm() > 0.0 {
                total += state[r].conj() * v * state[c];
            }
        }
        Ok(total.re)
    }
}

pub(crate) fn check_width(num_qubits: u32) -> SimResult<()> {
    if num_qubits > MAX_DENSE_QUBITS {
        return Err(SimError::TooLarge {
            num_qubits,
            max: MAX_DENSE_QUBITS,
        });
    }
    Ok(())
}

fn hermitian_deviation(matrix: &Array2<Complex64>) -> f64 {
    matrix
        .indexed_iter()
        .map(|((r, c), v)| (v - matrix[[c, r]].conj()).norm())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_rejects_non_hermitian() {
        let m = array![[c(0.0), c(1.0)], [c(0.0), c(0.0)]];
        assert!(matches!(
            MatrixOperator::new(m),
            Err(SimError::NotHermitian(_))
        ));
    }

    #[test]
    fn test_rejects_bad_dimension() {
        let m = Array2::<Complex64>::zeros((3, 3));
        assert!(matches!(
            MatrixOperator::new(m),
            Err(SimError::InvalidDimension { rows: 3, cols: 3 })
        ));
    }

    #[test]
    fn test_identity_detection() {
        let m = array![[c(2.0), c(0.0)], [c(0.0), c(2.0)]];
        assert!(MatrixOperator::new(m).unwrap().is_identity(1e-10));

        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        assert!(!MatrixOperator::new(x).unwrap().is_identity(1e-10));
    }

    #[test]
    fn test_extend_places_blocks_on_diagonal() {
        let x = MatrixOperator::new(array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]]).unwrap();
        let wide = x.extend(2).unwrap();
        assert_eq!(wide.dim(), 4);
        // X on qubit 0 flips the low bit inside each high block
        assert_eq!(wide.matrix()[[0, 1]], c(1.0));
        assert_eq!(wide.matrix()[[2, 3]], c(1.0));
        assert_eq!(wide.matrix()[[0, 2]], c(0.0));
        assert!(x.extend(0).is_err());
    }

    #[test]
    fn test_expectation() {
        let z = MatrixOperator::new(array![[c(1.0), c(0.0)], [c(0.0), c(-1.0)]]).unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((z.expectation(&[c(s), c(s)]).unwrap()).abs() < 1e-12);
        assert!((z.expectation(&[c(0.0), c(1.0)]).unwrap() + 1.0).abs() < 1e-12);
    }
}
