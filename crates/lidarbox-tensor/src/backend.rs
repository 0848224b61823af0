/// Minimal elementwise algebra the box codecs are written against.
///
/// A lane is a column of `f64` values, one per box. An implementation either
/// computes each operation immediately ([`Eager`]) or records it into a
/// deferred graph ([`crate::graph::Graph`]). A codec body written once over
/// this trait produces identical numbers under both backends.
pub trait Backend {
    /// Backend representation of a lane.
    type Value: Clone;

    /// A lane filled with a constant.
    fn splat(&mut self, value: f64) -> Self::Value;

    /// Elementwise `a + b`.
    fn add(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Elementwise `a - b`.
    fn sub(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Elementwise `a * b`.
    fn mul(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Elementwise `a / b`.
    fn div(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;

    /// Elementwise `a * k` for a scalar `k`.
    fn scale(&mut self, a: &Self::Value, k: f64) -> Self::Value;

    /// Elementwise Euclidean remainder of `a` by a scalar modulus `k`.
    fn rem_euclid(&mut self, a: &Self::Value, k: f64) -> Self::Value;

    /// Elementwise largest integer less than or equal to `a`.
    fn floor(&mut self, a: &Self::Value) -> Self::Value;

    /// Elementwise natural logarithm.
    fn ln(&mut self, a: &Self::Value) -> Self::Value;

    /// Elementwise natural exponential.
    fn exp(&mut self, a: &Self::Value) -> Self::Value;

    /// Elementwise `sqrt(a^2 + b^2)`.
    fn hypot(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value;
}

/// Immediate-evaluation backend. Lanes are plain vectors.
///
/// The lane length is fixed at construction so that constants know how many
/// elements to fill.
#[derive(Debug, Clone, Copy)]
pub struct Eager {
    len: usize,
}

impl Eager {
    /// Backend over lanes of `len` elements.
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

fn zip2(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect()
}

impl Backend for Eager {
    type Value = Vec<f64>;

    fn splat(&mut self, value: f64) -> Self::Value {
        vec![value; self.len]
    }

    fn add(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        zip2(a, b, |x, y| x + y)
    }

    fn sub(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        zip2(a, b, |x, y| x - y)
    }

    fn mul(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        zip2(a, b, |x, y| x * y)
    }

    fn div(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        zip2(a, b, |x, y| x / y)
    }

    fn scale(&mut self, a: &Self::Value, k: f64) -> Self::Value {
        a.iter().map(|&x| x * k).collect()
    }

    fn rem_euclid(&mut self, a: &Self::Value, k: f64) -> Self::Value {
        a.iter().map(|&x| x.rem_euclid(k)).collect()
    }

    fn floor(&mut self, a: &Self::Value) -> Self::Value {
        a.iter().map(|&x| x.floor()).collect()
    }

    fn ln(&mut self, a: &Self::Value) -> Self::Value {
        a.iter().map(|&x| x.ln()).collect()
    }

    fn exp(&mut self, a: &Self::Value) -> Self::Value {
        a.iter().map(|&x| x.exp()).collect()
    }

    fn hypot(&mut self, a: &Self::Value, b: &Self::Value) -> Self::Value {
        zip2(a, b, f64::hypot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_eager_elementwise() {
        let mut backend = Eager::new(3);
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];

        assert_eq!(backend.add(&a, &b), [5.0, 7.0, 9.0]);
        assert_eq!(backend.sub(&b, &a), [3.0, 3.0, 3.0]);
        assert_eq!(backend.mul(&a, &b), [4.0, 10.0, 18.0]);
        assert_eq!(backend.div(&b, &a), [4.0, 2.5, 2.0]);
        assert_eq!(backend.scale(&a, 2.0), [2.0, 4.0, 6.0]);
        assert_eq!(backend.splat(7.0), [7.0, 7.0, 7.0]);
    }

    #[test]
    fn test_eager_unary() {
        let mut backend = Eager::new(2);
        let a = vec![1.0, std::f64::consts::E];

        let logs = backend.ln(&a);
        assert_relative_eq!(logs[0], 0.0);
        assert_relative_eq!(logs[1], 1.0);

        let exps = backend.exp(&logs);
        assert_relative_eq!(exps[0], 1.0);
        assert_relative_eq!(exps[1], std::f64::consts::E);

        let halves = vec![1.5, -0.5];
        assert_eq!(backend.floor(&halves), [1.0, -1.0]);
    }

    #[test]
    fn test_eager_hypot() {
        let mut backend = Eager::new(2);
        let a = vec![3.0, 1.0];
        let b = vec![4.0, 1.0];
        let d = backend.hypot(&a, &b);
        assert_relative_eq!(d[0], 5.0);
        assert_relative_eq!(d[1], std::f64::consts::SQRT_2);
    }

    #[test]
    fn test_eager_rem_euclid_negative() {
        let mut backend = Eager::new(3);
        let a = vec![-1.0, 7.0, -std::f64::consts::FRAC_PI_2];
        let wrapped = backend.rem_euclid(&a, 4.0);
        assert_eq!(wrapped[0], 3.0);
        assert_eq!(wrapped[1], 3.0);
        assert_relative_eq!(wrapped[2], 4.0 - std::f64::consts::FRAC_PI_2);
    }
}
