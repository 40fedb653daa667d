//! Matrix exponential for dense evolution generators.

use ndarray::Array2;
use num_complex::Complex64;

const MAX_TAYLOR_TERMS: usize = 40;

/// `exp(A)` by scaling and squaring with a truncated Taylor series.
///
/// The matrix is scaled so its 1-norm is at most 1/2, the series is summed
/// until the next term is negligible, then the result is squared back.
pub fn expm(a: &Array2<Complex64>) -> Array2<Complex64> {
    let dim = a.nrows();
    let norm = one_norm(a);
    let squarings = if norm > 0.5 {
        (norm / 0.5).log2().ceil() as i32
    } else {
        0
    };
    let scaled = a.mapv(|v| v / 2f64.powi(squarings));

    let mut result = Array2::<Complex64>::eye(dim);
    let mut term = Array2::<Complex64>::eye(dim);
    for k in 1..=MAX_TAYLOR_TERMS {
        term = term.dot(&scaled).mapv_into(|v| v / k as f64);
        result += &term;
        if one_norm(&term) < f64::EPSILON * 1e-2 {
            break;
        }
    }

    for _ in 0..squarings {
        result = result.dot(&result);
    }
    result
}

/// `exp(-i·t·H)` for a Hermitian generator `H`.
pub fn evolution_unitary(generator: &Array2<Complex64>, t: f64) -> Array2<Complex64> {
    let factor = Complex64::new(0.0, -t);
    expm(&generator.mapv(|v| v * factor))
}

fn one_norm(a: &Array2<Complex64>) -> f64 {
    a.columns()
        .into_iter()
        .map(|col| col.iter().map(|v| v.norm()).sum::<f64>())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_expm_zero_is_identity() {
        let z = Array2::<Complex64>::zeros((4, 4));
        let e = expm(&z);
        assert_eq!(e, Array2::eye(4));
    }

    #[test]
    fn test_evolution_of_x() {
        // exp(-i t X) = cos t·I - i sin t·X
        let x = array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]];
        for t in [0.1, 1.0, 3.7, 25.0] {
            let u = evolution_unitary(&x, t);
            assert!(approx_eq(u[[0, 0]], c(t.cos(), 0.0)));
            assert!(approx_eq(u[[0, 1]], c(0.0, -t.sin())));
            assert!(approx_eq(u[[1, 0]], c(0.0, -t.sin())));
            assert!(approx_eq(u[[1, 1]], c(t.cos(), 0.0)));
        }
    }

    #[test]
    fn test_diagonal_generator() {
        let h = array![[c(2.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-0.5, 0.0)]];
        let u = evolution_unitary(&h, 1.3);
        assert!(approx_eq(u[[0, 0]], Complex64::from_polar(1.0, -2.6)));
        assert!(approx_eq(u[[1, 1]], Complex64::from_polar(1.0, 0.65)));
    }
}
