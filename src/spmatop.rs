use num_traits::{Float, Zero};
use sprs::{CsMat, TriMat};
use crate::solver::{LinAlg, Operator};

//

/// Builds a sparse matrix in CSC format from `(row, col, value)` triplets.
///
/// Duplicated entries are summed.
pub fn from_triplets<F, I>(n_row: usize, n_col: usize, triplets: I) -> CsMat<F>
where F: Float, I: IntoIterator<Item=(usize, usize, F)>
{
    let mut tri = TriMat::new((n_row, n_col));
    for (r, c, v) in triplets {
        tri.add_triplet(r, c, v);
    }
    tri.to_csc()
}

//

/// Sparse matrix operator
///
/// Matrix struct which borrows a [`sprs::CsMat`] and implements [`Operator`].
/// Only the stored entries are visited, so each product costs one pass over the nonzeros.
#[derive(Debug)]
pub struct SpMatOp<'a, L: LinAlg>
{
    mat: &'a CsMat<L::F>,
}

impl<'a, L: LinAlg> SpMatOp<'a, L>
{
    /// Creates an instance
    ///
    /// Returns [`SpMatOp`] instance.
    /// * `mat`: sparse matrix to borrow.
    pub fn new(mat: &'a CsMat<L::F>) -> Self
    {
        SpMatOp {
            mat
        }
    }

    fn op_impl(&self, transpose: bool, alpha: L::F, x: &[L::F], beta: L::F, y: &mut [L::F])
    {
        let (nr, nc) = self.size();
        let (nx, ny) = if !transpose {(nc, nr)} else {(nr, nc)};
        assert_eq!(x.len(), nx);
        assert_eq!(y.len(), ny);

        if beta == L::F::zero() {
            // y may hold garbage on entry
            for v in y.iter_mut() {
                *v = L::F::zero();
            }
        }
        else {
            L::scale(beta, y);
        }

        for (a, (r, c)) in self.mat.iter() {
            if !transpose {
                y[r] = y[r] + alpha * *a * x[c];
            }
            else {
                y[c] = y[c] + alpha * *a * x[r];
            }
        }
    }
}

impl<'a, L: LinAlg> Operator<L> for SpMatOp<'a, L>
{
    fn size(&self) -> (usize, usize)
    {
        (self.mat.rows(), self.mat.cols())
    }

    fn op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut [L::F])
    {
        self.op_impl(false, alpha, x, beta, y);
    }

    fn trans_op(&self, alpha: L::F, x: &[L::F], beta: L::F, y: &mut [L::F])
    {
        self.op_impl(true, alpha, x, beta, y);
    }
}

impl<'a, L: LinAlg> AsRef<CsMat<L::F>> for SpMatOp<'a, L>
{
    fn as_ref(&self) -> &CsMat<L::F>
    {
        self.mat
    }
}

//

#[test]
fn test_spmatop1()
{
    use float_eq::assert_float_eq;
    use crate::FloatGeneric;

    type L = FloatGeneric<f64>;

    // 1 0 2
    // 0 3 0
    let mat = from_triplets(2, 3, [
        (0, 0, 1.),
        (0, 2, 2.),
        (1, 1, 3.),
    ]);
    let m = SpMatOp::<L>::new(&mat);
    assert_eq!(m.size(), (2, 3));

    let y = &mut [1., 1.];
    m.op(1., &[1., 1., 1.], 2., y);
    assert_float_eq!(y.as_ref(), [5., 5.].as_ref(), abs_all <= 1e-12);

    let z = &mut [f64::NAN; 3];
    m.trans_op(-1., &[1., 2.], 0., z);
    assert_float_eq!(z.as_ref(), [-1., -6., -2.].as_ref(), abs_all <= 1e-12);
}
