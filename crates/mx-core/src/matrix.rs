use rand::Rng;

use crate::dtype::DType;
use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::fill::RandomFill;
use crate::layout::{Layout, Order, Strides};
use crate::storage::Storage;

/// A dense matrix: a layout over owned or borrowed element storage.
///
/// Element `(i, j)` lives at `base + layout.offset(i, j)` in the buffer.
/// `Matrix<'static, T>` owns its buffer; views created with
/// [`Matrix::view`] or [`Matrix::sub_matrix`] borrow one for `'a`.
#[derive(Debug)]
pub struct Matrix<'a, T> {
    storage: Storage<'a, T>,
    base: usize,
    layout: Layout,
}

impl<T: Element> Matrix<'static, T> {
    /// Allocate a `rows x cols` matrix with the requested strides.
    ///
    /// The buffer is zero-filled; callers should treat its contents as
    /// unspecified until a fill or GEMM writes it.
    ///
    /// # Errors
    /// `InvalidShape` for strides that alias, `AllocationFailure` if the
    /// buffer cannot be obtained.
    pub fn new(rows: usize, cols: usize, strides: Strides) -> Result<Self> {
        let layout = Layout::new(rows, cols, strides)?;
        let len = layout
            .checked_required_len()
            .ok_or(MatrixError::AllocationFailure {
                dtype: T::DTYPE,
                elements: rows.saturating_mul(cols),
            })?;
        let storage = Storage::allocate(len)?;
        Ok(Matrix {
            storage,
            base: 0,
            layout,
        })
    }

    /// Allocate a densely packed matrix in the given order.
    pub fn with_order(rows: usize, cols: usize, order: Order) -> Result<Self> {
        Matrix::new(rows, cols, Strides::Packed(order))
    }

    /// Take ownership of `data` interpreted through `layout`.
    ///
    /// # Errors
    /// Returns `InvalidShape` if `data` is shorter than the layout requires.
    pub fn from_vec(data: Vec<T>, layout: Layout) -> Result<Self> {
        check_buffer(data.len(), &layout)?;
        Ok(Matrix {
            storage: Storage::Owned(data),
            base: 0,
            layout,
        })
    }

    /// Build a matrix with the given strides from values listed row by row.
    ///
    /// # Errors
    /// `InvalidShape` if `rows * cols` overflows, `ShapeMismatch` if
    /// `values.len() != rows * cols`, plus the errors of [`Matrix::new`].
    pub fn from_row_slice(rows: usize, cols: usize, values: &[T], strides: Strides) -> Result<Self> {
        let numel = rows.checked_mul(cols).ok_or_else(|| {
            MatrixError::InvalidShape(format!("{}x{} overflows usize", rows, cols))
        })?;
        if values.len() != numel {
            return Err(MatrixError::ShapeMismatch {
                expected: (rows, cols),
                got: (values.len(), 1),
            });
        }
        let mut m = Matrix::new(rows, cols, strides)?;
        m.set_each(|i, j| values[i * cols + j]);
        Ok(m)
    }
}

impl<'a, T: Element> Matrix<'a, T> {
    /// Wrap caller storage without copying.
    ///
    /// The view writes through to `buffer`; releasing it frees nothing.
    ///
    /// # Errors
    /// `InvalidShape` for aliasing strides or a buffer shorter than the
    /// layout's highest offset.
    pub fn view(buffer: &'a mut [T], rows: usize, cols: usize, strides: Strides) -> Result<Self> {
        let layout = Layout::new(rows, cols, strides)?;
        check_buffer(buffer.len(), &layout)?;
        Ok(Matrix {
            storage: Storage::View(buffer),
            base: 0,
            layout,
        })
    }

    pub fn rows(&self) -> usize {
        self.layout.rows()
    }

    pub fn cols(&self) -> usize {
        self.layout.cols()
    }

    pub fn row_stride(&self) -> isize {
        self.layout.row_stride()
    }

    pub fn col_stride(&self) -> isize {
        self.layout.col_stride()
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    /// `(rows, cols)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Returns true if this matrix borrows its storage.
    pub fn is_view(&self) -> bool {
        self.storage.is_view()
    }

    /// Buffer starting at element `(0, 0)`.
    pub fn as_slice(&self) -> &[T] {
        &self.storage.as_slice()[self.base..]
    }

    /// Mutable buffer starting at element `(0, 0)`.
    ///
    /// Writes to stride padding are allowed but are not part of the matrix.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.storage.as_mut_slice()[self.base..]
    }

    /// Element at `(i, j)`, or `None` when out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i >= self.rows() || j >= self.cols() {
            return None;
        }
        Some(self.as_slice()[self.layout.offset(i, j)])
    }

    /// Overwrite the element at `(i, j)`.
    ///
    /// # Errors
    /// Returns `PreconditionViolation` when `(i, j)` is out of bounds.
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        if i >= self.rows() || j >= self.cols() {
            return Err(MatrixError::PreconditionViolation(format!(
                "index ({}, {}) out of bounds for {}x{} matrix",
                i,
                j,
                self.rows(),
                self.cols()
            )));
        }
        let offset = self.layout.offset(i, j);
        self.as_mut_slice()[offset] = value;
        Ok(())
    }

    /// Overwrite every element with `value`. Padding is left untouched.
    pub fn fill(&mut self, value: T) {
        self.set_each(|_, _| value);
    }

    /// Overwrite every element with a uniform draw from `[-1, 1]`.
    pub fn fill_random(&mut self) {
        let dist = RandomFill::default();
        self.fill_random_with(&mut dist.rng(), &dist);
    }

    /// Overwrite every element with a draw from `dist` using `rng`.
    pub fn fill_random_with<R: Rng + ?Sized>(&mut self, rng: &mut R, dist: &RandomFill) {
        let (low, high) = (dist.low(), dist.high());
        self.set_each(|_, _| T::sample(&mut *rng, low, high));
    }

    /// Overwrite each element `(i, j)` with `f(i, j)`, visiting every
    /// element exactly once in memory order.
    pub fn set_each<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize) -> T,
    {
        let layout = self.layout;
        let dtype = T::DTYPE;
        tracing::trace!(layout = %layout, %dtype, "set_each");
        let data = self.as_mut_slice();
        for (i, j) in layout.positions() {
            data[layout.offset(i, j)] = f(i, j);
        }
    }

    /// Mutable view of the `rows x cols` window starting at `(i, j)`.
    ///
    /// # Errors
    /// Returns `InvalidShape` if the window does not fit inside `self`.
    pub fn sub_matrix(&mut self, i: usize, j: usize, rows: usize, cols: usize) -> Result<Matrix<'_, T>> {
        let (offset, layout) = self.layout.sub(i, j, rows, cols)?;
        let base = if layout.is_empty() { 0 } else { self.base + offset };
        Ok(Matrix {
            storage: Storage::View(self.storage.as_mut_slice()),
            base,
            layout,
        })
    }

    /// Copy every element into `dest`, which may use any layout.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the dimensions differ.
    pub fn copy_into(&self, dest: &mut Matrix<'_, T>) -> Result<()> {
        if self.dims() != dest.dims() {
            return Err(MatrixError::ShapeMismatch {
                expected: self.dims(),
                got: dest.dims(),
            });
        }
        let src = self.as_slice();
        let layout = self.layout;
        if layout == dest.layout && layout.is_contiguous() {
            let n = layout.numel();
            dest.as_mut_slice()[..n].copy_from_slice(&src[..n]);
            return Ok(());
        }
        dest.set_each(|i, j| src[layout.offset(i, j)]);
        Ok(())
    }

    /// Owned, densely packed copy in the given order.
    pub fn to_packed(&self, order: Order) -> Result<Matrix<'static, T>> {
        let mut out = Matrix::with_order(self.rows(), self.cols(), order)?;
        self.copy_into(&mut out)?;
        Ok(out)
    }

    /// Zero-copy transpose: the same storage with rows and columns exchanged.
    pub fn t(self) -> Matrix<'a, T> {
        Matrix {
            storage: self.storage,
            base: self.base,
            layout: self.layout.transposed(),
        }
    }

    /// Mutable transposed view of this matrix's storage.
    pub fn t_view(&mut self) -> Matrix<'_, T> {
        Matrix {
            storage: Storage::View(self.storage.as_mut_slice()),
            base: self.base,
            layout: self.layout.transposed(),
        }
    }

    /// Owned transpose, packed in the order this matrix is stored in.
    pub fn transpose(&self) -> Result<Matrix<'static, T>> {
        let order = if self.layout.is_row_major() {
            Order::RowMajor
        } else {
            Order::ColMajor
        };
        let mut out = Matrix::with_order(self.cols(), self.rows(), order)?;
        let src = self.as_slice();
        let layout = self.layout;
        out.set_each(|i, j| src[layout.offset(j, i)]);
        Ok(out)
    }

    /// True if both matrices have the same dimensions and every pair of
    /// elements differs by at most `epsilon`. NaN never compares close.
    pub fn approx_eq(&self, other: &Matrix<'_, T>, epsilon: f64) -> bool {
        if self.dims() != other.dims() {
            return false;
        }
        let (a, b) = (self.as_slice(), other.as_slice());
        self.layout.positions().all(|(i, j)| {
            let d = a[self.layout.offset(i, j)].abs_diff(b[other.layout.offset(i, j)]);
            d <= epsilon
        })
    }

    /// Release the matrix, freeing owned storage. Views free nothing.
    pub fn release(self) {
        let view = self.is_view();
        tracing::trace!(layout = %self.layout, view, "release matrix");
    }
}

impl<'a, 'b, T: Element> PartialEq<Matrix<'b, T>> for Matrix<'a, T> {
    /// Logical equality: same dimensions and elements, regardless of layout.
    fn eq(&self, other: &Matrix<'b, T>) -> bool {
        if self.dims() != other.dims() {
            return false;
        }
        let (a, b) = (self.as_slice(), other.as_slice());
        self.layout
            .positions()
            .all(|(i, j)| a[self.layout.offset(i, j)] == b[other.layout.offset(i, j)])
    }
}

fn check_buffer(len: usize, layout: &Layout) -> Result<()> {
    match layout.checked_required_len() {
        Some(required) if required <= len => Ok(()),
        required => Err(MatrixError::InvalidShape(format!(
            "buffer of {} elements too small for layout {} (needs {})",
            len,
            layout,
            required.map_or_else(|| "more than usize::MAX".to_string(), |r| r.to_string())
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pattern(rows: usize, cols: usize, strides: Strides) -> Matrix<'static, f64> {
        let mut m = Matrix::new(rows, cols, strides).unwrap();
        m.set_each(|i, j| (i * cols + j) as f64);
        m
    }

    #[test]
    fn test_new_auto_col_major() {
        let m = Matrix::<f64>::new(4, 5, Strides::Auto).unwrap();
        assert_eq!(m.dims(), (4, 5));
        assert_eq!((m.row_stride(), m.col_stride()), (1, 4));
        assert_eq!(m.dtype(), DType::F64);
        assert!(!m.is_view());
    }

    #[test]
    fn test_new_rejects_aliasing_strides() {
        let err = Matrix::<f32>::new(3, 4, Strides::Explicit { row: 2, col: 1 }).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidShape(_)));
    }

    #[test]
    fn test_new_allocation_failure() {
        let err = Matrix::<f64>::new(usize::MAX / 4, 4, Strides::Auto).unwrap_err();
        assert!(matches!(err, MatrixError::AllocationFailure { .. }));
    }

    #[test]
    fn test_get_set_column_major_buffer() {
        let mut m = Matrix::<f64>::new(10, 4, Strides::Auto).unwrap();
        m.set(2, 2, 7.0).unwrap();
        assert_eq!(m.get(2, 2), Some(7.0));
        assert_eq!(m.as_slice()[2 + 2 * 10], 7.0);
        assert_eq!(m.get(10, 0), None);
        assert!(m.set(0, 4, 1.0).is_err());
    }

    #[test]
    fn test_fill_constant_skips_padding() {
        let mut m = Matrix::<f32>::new(2, 3, Strides::Explicit { row: 4, col: 1 }).unwrap();
        m.fill(1.0);
        assert_eq!(m.as_slice(), &[1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_fill_empty_is_noop() {
        let mut m = Matrix::<f64>::new(0, 3, Strides::Auto).unwrap();
        m.fill(1.0);
        m.fill_random();
        assert!(m.is_empty());
        assert!(m.as_slice().is_empty());
    }

    #[test]
    fn test_fill_random_touches_every_element() {
        let mut m = Matrix::<f64>::new(6, 5, Strides::Explicit { row: 1, col: 8 }).unwrap();
        m.fill(f64::NAN);
        let dist = RandomFill::new(2.0, 3.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        m.fill_random_with(&mut rng, &dist);
        for (i, j) in m.layout().positions() {
            let v = m.get(i, j).unwrap();
            assert!((2.0..=3.0).contains(&v), "({}, {}) = {}", i, j, v);
        }
        // Padding rows 6 and 7 of each column are never written.
        assert_eq!(m.as_slice()[6], 0.0);
    }

    #[test]
    fn test_seeded_fill_reproducible() {
        let dist = RandomFill::default().with_seed(99);
        let mut a = Matrix::<Complex<f32>>::new(3, 3, Strides::Auto).unwrap();
        let mut b = Matrix::<Complex<f32>>::new(3, 3, Strides::Auto).unwrap();
        a.fill_random_with(&mut dist.rng(), &dist);
        b.fill_random_with(&mut dist.rng(), &dist);
        assert_eq!(a, b);
    }

    #[test]
    fn test_view_over_caller_buffer() {
        let mut buf = vec![0.0f64; 6];
        {
            let mut v = Matrix::view(&mut buf, 2, 3, Strides::Packed(Order::RowMajor)).unwrap();
            assert!(v.is_view());
            v.set(1, 0, 5.0).unwrap();
            v.release();
        }
        assert_eq!(buf[3], 5.0);
    }

    #[test]
    fn test_view_buffer_too_small() {
        let mut buf = vec![0.0f32; 5];
        assert!(Matrix::view(&mut buf, 2, 3, Strides::Auto).is_err());
    }

    #[test]
    fn test_sub_matrix_writes_parent() {
        let mut m = Matrix::<f64>::new(10, 4, Strides::Auto).unwrap();
        m.fill(1.0);
        {
            let mut sm = m.sub_matrix(1, 1, 8, 2).unwrap();
            assert_eq!(sm.dims(), (8, 2));
            sm.fill(0.0);
        }
        assert_eq!(m.get(0, 1), Some(1.0));
        assert_eq!(m.get(1, 1), Some(0.0));
        assert_eq!(m.get(8, 2), Some(0.0));
        assert_eq!(m.get(9, 2), Some(1.0));
        assert_eq!(m.get(4, 3), Some(1.0));
        assert_relative_eq!(m.sum(), 40.0 - 16.0);
    }

    #[test]
    fn test_nested_sub_matrix() {
        let mut m = pattern(5, 5, Strides::Packed(Order::RowMajor));
        let mut outer = m.sub_matrix(1, 1, 3, 3).unwrap();
        let inner = outer.sub_matrix(1, 1, 2, 2).unwrap();
        assert_eq!(inner.get(0, 0), Some(12.0));
        assert_eq!(inner.get(1, 1), Some(18.0));
    }

    #[test]
    fn test_copy_into_across_layouts() {
        let src = pattern(3, 4, Strides::Packed(Order::RowMajor));
        let mut dst = Matrix::<f64>::new(3, 4, Strides::Explicit { row: 1, col: 5 }).unwrap();
        src.copy_into(&mut dst).unwrap();
        assert_eq!(src, dst);

        let mut wrong = Matrix::<f64>::new(4, 3, Strides::Auto).unwrap();
        assert!(matches!(
            src.copy_into(&mut wrong),
            Err(MatrixError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_transpose() {
        let m = pattern(2, 3, Strides::Auto);
        let t = m.transpose().unwrap();
        assert_eq!(t.dims(), (3, 2));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(m.get(i, j), t.get(j, i));
            }
        }
    }

    #[test]
    fn test_to_packed_changes_layout_only() {
        let m = pattern(3, 2, Strides::Packed(Order::ColMajor));
        let r = m.to_packed(Order::RowMajor).unwrap();
        assert!(r.layout().is_row_major());
        assert_eq!(r.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(m, r);
    }

    #[test]
    fn test_approx_eq() {
        let a = pattern(2, 2, Strides::Auto);
        let mut b = pattern(2, 2, Strides::Packed(Order::RowMajor));
        b.set(1, 1, 3.0 + 1e-9).unwrap();
        assert!(a.approx_eq(&b, 1e-6));
        assert!(a != b);
        b.set(0, 0, f64::NAN).unwrap();
        assert!(!a.approx_eq(&b, 1e-6));
    }

    #[test]
    fn test_from_row_slice_len_mismatch() {
        let err = Matrix::from_row_slice(2, 2, &[1.0f32, 2.0, 3.0], Strides::Auto).unwrap_err();
        assert!(matches!(err, MatrixError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_from_row_slice_overflow() {
        let err = Matrix::from_row_slice(usize::MAX, 2, &[1.0f64], Strides::Auto).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidShape(_)));
    }

    #[test]
    fn test_new_huge_dimensions() {
        let err = Matrix::<f32>::new(usize::MAX, usize::MAX, Strides::Auto).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidShape(_)));
    }

    #[test]
    fn test_copy_into_same_contiguous_layout() {
        let src = pattern(3, 4, Strides::Auto);
        let mut dst = Matrix::<f64>::new(3, 4, Strides::Auto).unwrap();
        src.copy_into(&mut dst).unwrap();
        assert_eq!(src.as_slice(), dst.as_slice());
    }

    #[test]
    fn test_t_is_zero_copy() {
        let m = pattern(2, 3, Strides::Packed(Order::RowMajor));
        let expected = m.transpose().unwrap();
        let buffer: Vec<f64> = m.as_slice().to_vec();
        let t = m.t();
        assert_eq!(t.dims(), (3, 2));
        assert!(t.layout().is_col_major());
        assert_eq!(t.as_slice(), buffer.as_slice());
        assert_eq!(t, expected);
    }

    #[test]
    fn test_t_view_writes_through() {
        let mut m = pattern(2, 3, Strides::Auto);
        {
            let mut t = m.t_view();
            assert_eq!(t.get(2, 1), Some(5.0));
            t.set(2, 0, -1.0).unwrap();
        }
        assert_eq!(m.get(0, 2), Some(-1.0));
    }

    #[test]
    fn test_t_of_sub_matrix() {
        let mut m = pattern(4, 4, Strides::Auto);
        let t = m.sub_matrix(1, 2, 3, 2).unwrap().t();
        assert_eq!(t.dims(), (2, 3));
        assert_eq!(t.get(0, 0), Some(6.0));
        assert_eq!(t.get(1, 2), Some(15.0));
    }

    #[test]
    fn test_from_vec() {
        let m = Matrix::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], Layout::col_major(2, 2)).unwrap();
        assert_eq!(m.get(0, 1), Some(3.0));
        assert!(Matrix::from_vec(vec![1.0f32], Layout::col_major(2, 2)).is_err());
    }
}
