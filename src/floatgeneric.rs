use num_traits::Float;
use core::marker::PhantomData;
use crate::solver::LinAlg;

/// `num::Float`-generic [`LinAlg`] implementation
///
/// All numeric operations are written in pure Rust.
#[derive(Debug, Clone)]
pub struct FloatGeneric<F>
{
    ph_f: PhantomData<F>,
}

impl<F: Float> LinAlg for FloatGeneric<F>
{
    type F = F;

    fn norm(x: &[F]) -> F
    {
        let mut sum = F::zero();
        for u in x {
            sum = sum + *u * *u;
        }
        sum.sqrt()
    }

    fn inner_prod(x: &[F], y: &[F]) -> F
    {
        assert_eq!(x.len(), y.len());

        let mut sum = F::zero();
        for (u, v) in x.iter().zip(y) {
            sum = sum + *u * *v;
        }
        sum
    }

    fn copy(x: &[F], y: &mut [F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *u;
        }
    }

    fn scale(alpha: F, x: &mut [F])
    {
        for u in x {
            *u = alpha * *u;
        }
    }

    fn add(alpha: F, x: &[F], y: &mut [F])
    {
        assert_eq!(x.len(), y.len());

        for (u, v) in x.iter().zip(y) {
            *v = *v + alpha * *u;
        }
    }

    fn transform_di(alpha: F, mat: &[F], x: &[F], beta: F, y: &mut [F])
    {
        assert_eq!(mat.len(), x.len());
        assert_eq!(mat.len(), y.len());

        for (i, v) in y.iter_mut().enumerate() {
            *v = alpha * mat[i] * x[i] + beta * *v;
        }
    }

    fn divide_di(mat: &[F], x: &mut [F])
    {
        assert_eq!(mat.len(), x.len());

        for (d, u) in mat.iter().zip(x) {
            *u = *u / *d;
        }
    }
}

//

#[test]
fn test_floatgeneric1()
{
    use float_eq::assert_float_eq;

    type L = FloatGeneric<f64>;

    let x = &[3., 4.];
    let y = &mut [1., 1.];

    assert_float_eq!(L::norm(x), 5., abs <= 1e-12);
    assert_float_eq!(L::inner_prod(x, y), 7., abs <= 1e-12);

    L::add(2., x, y);
    assert_float_eq!(y.as_ref(), [7., 9.].as_ref(), abs_all <= 1e-12);

    L::transform_di(1., &[2., 0.5], x, -1., y);
    assert_float_eq!(y.as_ref(), [-1., -7.].as_ref(), abs_all <= 1e-12);

    L::divide_di(&[2., 0.5], y);
    assert_float_eq!(y.as_ref(), [-0.5, -14.].as_ref(), abs_all <= 1e-12);
}
