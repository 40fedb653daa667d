//! 2x2 unitary matrices for single-qubit and controlled gates.
//!
//! Most standard gates are a single-qubit unitary applied to the last
//! operand under zero or more controls. [`controlled_unitary`] exposes that
//! view so simulators and analyses need one kernel per shape, not per gate.

use num_complex::Complex64;
use qtg_ir::{ParameterExpression, StandardGate};
use std::f64::consts::PI;

use crate::error::{CompileError, CompileResult};

const EPSILON: f64 = 1e-10;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

#[inline]
fn cis(theta: f64) -> Complex64 {
    Complex64::from_polar(1.0, theta)
}

/// Row-major single-qubit matrix `[[a, b], [c, d]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unitary2x2 {
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    pub fn real(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self::new(a.into(), b.into(), c.into(), d.into())
    }

    /// diag(1, e^{iλ}).
    pub fn p(lambda: f64) -> Self {
        Self::new(ONE, ZERO, ZERO, cis(lambda))
    }

    pub fn identity() -> Self {
        Self::p(0.0)
    }

    pub fn x() -> Self {
        Self::real(0.0, 1.0, 1.0, 0.0)
    }

    pub fn y() -> Self {
        Self::new(ZERO, -Complex64::i(), Complex64::i(), ZERO)
    }

    pub fn z() -> Self {
        Self::p(PI)
    }

    pub fn h() -> Self {
        let r = std::f64::consts::FRAC_1_SQRT_2;
        Self::real(r, r, r, -r)
    }

    pub fn s() -> Self {
        Self::p(PI / 2.0)
    }

    pub fn sdg() -> Self {
        Self::p(-PI / 2.0)
    }

    pub fn t() -> Self {
        Self::p(PI / 4.0)
    }

    pub fn tdg() -> Self {
        Self::p(-PI / 4.0)
    }

    /// Principal square root of X.
    pub fn sx() -> Self {
        let (plus, minus) = (Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5));
        Self::new(plus, minus, minus, plus)
    }

    pub fn sxdg() -> Self {
        Self::sx().dagger()
    }

    /// U(θ, φ, λ); `ry(θ)` is `U(θ, 0, 0)`.
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let (sin, cos) = (theta / 2.0).sin_cos();
        Self::new(
            cos.into(),
            -cis(lambda) * sin,
            cis(phi) * sin,
            cis(phi + lambda) * cos,
        )
    }

    pub fn rx(theta: f64) -> Self {
        let (sin, cos) = (theta / 2.0).sin_cos();
        let off = Complex64::new(0.0, -sin);
        Self::new(cos.into(), off, off, cos.into())
    }

    pub fn ry(theta: f64) -> Self {
        Self::u(theta, 0.0, 0.0)
    }

    pub fn rz(theta: f64) -> Self {
        Self::new(cis(-theta / 2.0), ZERO, ZERO, cis(theta / 2.0))
    }

    /// Matrix product `self · other`.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    pub fn dagger(&self) -> Self {
        let [a, b, c, d] = self.data;
        Self::new(a.conj(), c.conj(), b.conj(), d.conj())
    }

    /// Apply to the column vector (amp0, amp1).
    #[inline]
    pub fn apply(&self, amp0: Complex64, amp1: Complex64) -> (Complex64, Complex64) {
        let [a, b, c, d] = self.data;
        (a * amp0 + b * amp1, c * amp0 + d * amp1)
    }

    /// Identity up to a global phase.
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        b.norm() < EPSILON && c.norm() < EPSILON && (a - d).norm() < EPSILON
    }

    pub fn approx_eq(&self, other: &Self, tol: f64) -> bool {
        self.data
            .iter()
            .zip(&other.data)
            .all(|(a, b)| (a - b).norm() < tol)
    }

    pub fn is_unitary(&self) -> bool {
        self.mul(&self.dagger()).approx_eq(&Self::identity(), EPSILON)
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Unitary2x2::mul(&self, &rhs)
    }
}

fn angle(gate: &StandardGate, param: &ParameterExpression) -> CompileResult<f64> {
    param
        .as_f64()
        .ok_or_else(|| CompileError::UnboundParameter(gate.name().to_string()))
}

/// View a standard gate as `(U, k)`: the single-qubit unitary `U` applied to
/// operand `k` when operands `0..k` are all |1⟩.
///
/// Returns `None` for gates without that shape (swaps, two-qubit
/// rotations). [`StandardGate::MCXVChain`] reports its controls only; the
/// scratch operands after the target are left alone.
pub fn controlled_unitary(gate: &StandardGate) -> CompileResult<Option<(Unitary2x2, usize)>> {
    let view = match gate {
        StandardGate::I => (Unitary2x2::identity(), 0),
        StandardGate::X => (Unitary2x2::x(), 0),
        StandardGate::Y => (Unitary2x2::y(), 0),
        StandardGate::Z => (Unitary2x2::z(), 0),
        StandardGate::H => (Unitary2x2::h(), 0),
        StandardGate::S => (Unitary2x2::s(), 0),
        StandardGate::Sdg => (Unitary2x2::sdg(), 0),
        StandardGate::T => (Unitary2x2::t(), 0),
        StandardGate::Tdg => (Unitary2x2::tdg(), 0),
        StandardGate::SX => (Unitary2x2::sx(), 0),
        StandardGate::SXdg => (Unitary2x2::sxdg(), 0),
        StandardGate::Rx(t) => (Unitary2x2::rx(angle(gate, t)?), 0),
        StandardGate::Ry(t) => (Unitary2x2::ry(angle(gate, t)?), 0),
        StandardGate::Rz(t) => (Unitary2x2::rz(angle(gate, t)?), 0),
        StandardGate::P(l) => (Unitary2x2::p(angle(gate, l)?), 0),
        StandardGate::U(t, p, l) => (
            Unitary2x2::u(angle(gate, t)?, angle(gate, p)?, angle(gate, l)?),
            0,
        ),
        StandardGate::CX => (Unitary2x2::x(), 1),
        StandardGate::CY => (Unitary2x2::y(), 1),
        StandardGate::CZ => (Unitary2x2::z(), 1),
        StandardGate::CH => (Unitary2x2::h(), 1),
        StandardGate::CRx(t) => (Unitary2x2::rx(angle(gate, t)?), 1),
        StandardGate::CRy(t) => (Unitary2x2::ry(angle(gate, t)?), 1),
        StandardGate::CRz(t) => (Unitary2x2::rz(angle(gate, t)?), 1),
        StandardGate::CP(l) => (Unitary2x2::p(angle(gate, l)?), 1),
        StandardGate::CCX => (Unitary2x2::x(), 2),
        StandardGate::MCX(n) | StandardGate::MCXVChain(n) => (Unitary2x2::x(), *n as usize),
        StandardGate::MCP(l, n) => (Unitary2x2::p(angle(gate, l)?), *n as usize),
        StandardGate::Swap
        | StandardGate::CSwap
        | StandardGate::RXX(_)
        | StandardGate::RYY(_)
        | StandardGate::RZZ(_) => return Ok(None),
    };
    Ok(Some(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadamard_squared() {
        let h = Unitary2x2::h();
        assert!((h * h).is_identity());
    }

    #[test]
    fn test_pauli_squared() {
        for p in [Unitary2x2::x(), Unitary2x2::y(), Unitary2x2::z()] {
            assert!((p * p).is_identity());
        }
    }

    #[test]
    fn test_sx_squared_is_x() {
        let sx = Unitary2x2::sx();
        assert!((sx * sx).approx_eq(&Unitary2x2::x(), EPSILON));
        assert!((sx * Unitary2x2::sxdg()).is_identity());
    }

    #[test]
    fn test_rotations_are_unitary() {
        for theta in [0.0, 0.3, PI / 2.0, 2.5] {
            assert!(Unitary2x2::rx(theta).is_unitary());
            assert!(Unitary2x2::ry(theta).is_unitary());
            assert!(Unitary2x2::u(theta, 0.4, -1.1).is_unitary());
        }
    }

    #[test]
    fn test_ry_pi_maps_zero_to_one() {
        let (a0, a1) = Unitary2x2::ry(PI).apply(Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
        assert!(a0.norm() < EPSILON);
        assert!((a1.re - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_controlled_view() {
        let (u, k) = controlled_unitary(&StandardGate::MCXVChain(4)).unwrap().unwrap();
        assert_eq!(k, 4);
        assert!(u.approx_eq(&Unitary2x2::x(), EPSILON));

        let (u, k) = controlled_unitary(&StandardGate::CP(ParameterExpression::pi()))
            .unwrap()
            .unwrap();
        assert_eq!(k, 1);
        assert!(u.approx_eq(&Unitary2x2::z(), EPSILON));

        assert!(controlled_unitary(&StandardGate::Swap).unwrap().is_none());
        assert!(matches!(
            controlled_unitary(&StandardGate::Ry(ParameterExpression::symbol("θ"))),
            Err(CompileError::UnboundParameter(_))
        ));
    }
}
