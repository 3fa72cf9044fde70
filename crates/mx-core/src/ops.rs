//! Element-wise maps, reductions and concatenation.
//!
//! Every traversal here walks columns outermost and rows innermost, so
//! results do not depend on the storage order of the operands.

use crate::element::Element;
use crate::error::{MatrixError, Result};
use crate::layout::Order;
use crate::matrix::Matrix;

impl<T: Element> Matrix<'_, T> {
    fn order(&self) -> Order {
        if self.layout().is_row_major() {
            Order::RowMajor
        } else {
            Order::ColMajor
        }
    }

    fn check_same_dims(&self, other: (usize, usize)) -> Result<()> {
        if self.dims() != other {
            return Err(MatrixError::ShapeMismatch {
                expected: self.dims(),
                got: other,
            });
        }
        Ok(())
    }

    /// Call `f(i, j, value)` for every element.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, T),
    {
        let layout = self.layout();
        let data = self.as_slice();
        for j in 0..self.cols() {
            for i in 0..self.rows() {
                f(i, j, data[layout.offset(i, j)]);
            }
        }
    }

    /// Fold every element into `init` with `f`.
    pub fn reduce<F>(&self, init: T, mut f: F) -> T
    where
        F: FnMut(T, T) -> T,
    {
        let mut acc = init;
        self.for_each(|_, _, v| acc = f(acc, v));
        acc
    }

    /// Sum of all elements.
    pub fn sum(&self) -> T {
        self.reduce(T::zero(), |acc, v| acc + v)
    }

    /// Arithmetic mean of all elements, `None` for an empty matrix.
    pub fn mean(&self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        Some(self.sum() / T::from_real(self.layout().numel() as f64))
    }

    /// Owned matrix of `f` applied to every element, packed in this
    /// matrix's storage order.
    pub fn map<U, F>(&self, mut f: F) -> Result<Matrix<'static, U>>
    where
        U: Element,
        F: FnMut(T) -> U,
    {
        let mut out = Matrix::with_order(self.rows(), self.cols(), self.order())?;
        let (src, layout) = (self.as_slice(), self.layout());
        out.set_each(|i, j| f(src[layout.offset(i, j)]));
        Ok(out)
    }

    /// Replace every element `x` with `f(x)` in place.
    pub fn apply<F>(&mut self, mut f: F)
    where
        F: FnMut(T) -> T,
    {
        let layout = self.layout();
        let data = self.as_mut_slice();
        for (i, j) in layout.positions() {
            let at = layout.offset(i, j);
            data[at] = f(data[at]);
        }
    }

    /// Replace every element `x` with `f(x, y)`, `y` being the element of
    /// `other` at the same position.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the dimensions differ.
    pub fn zip_apply<F>(&mut self, other: &Matrix<'_, T>, mut f: F) -> Result<()>
    where
        F: FnMut(T, T) -> T,
    {
        self.check_same_dims(other.dims())?;
        let layout = self.layout();
        let (rhs, rhs_layout) = (other.as_slice(), other.layout());
        let data = self.as_mut_slice();
        for (i, j) in layout.positions() {
            let at = layout.offset(i, j);
            data[at] = f(data[at], rhs[rhs_layout.offset(i, j)]);
        }
        Ok(())
    }

    /// Owned matrix of `f(x, y)` over matching elements of `self` and `other`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the dimensions differ.
    pub fn zip_map<F>(&self, other: &Matrix<'_, T>, mut f: F) -> Result<Matrix<'static, T>>
    where
        F: FnMut(T, T) -> T,
    {
        self.check_same_dims(other.dims())?;
        let mut out = Matrix::with_order(self.rows(), self.cols(), self.order())?;
        let (lhs, lhs_layout) = (self.as_slice(), self.layout());
        let (rhs, rhs_layout) = (other.as_slice(), other.layout());
        out.set_each(|i, j| f(lhs[lhs_layout.offset(i, j)], rhs[rhs_layout.offset(i, j)]));
        Ok(out)
    }

    /// `self += other`, element by element.
    pub fn add_elementwise(&mut self, other: &Matrix<'_, T>) -> Result<()> {
        self.zip_apply(other, |a, b| a + b)
    }

    /// Fold each row into the matching element of the `rows x 1` matrix `dest`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` unless `dest` is `rows x 1`.
    pub fn reduce_rows_into<F>(&self, dest: &mut Matrix<'_, T>, init: T, mut f: F) -> Result<()>
    where
        F: FnMut(T, T) -> T,
    {
        if dest.dims() != (self.rows(), 1) {
            return Err(MatrixError::ShapeMismatch {
                expected: (self.rows(), 1),
                got: dest.dims(),
            });
        }
        let (src, layout) = (self.as_slice(), self.layout());
        let cols = self.cols();
        dest.set_each(|i, _| (0..cols).fold(init, |acc, j| f(acc, src[layout.offset(i, j)])));
        Ok(())
    }

    /// Owned `rows x 1` matrix of per-row folds.
    pub fn reduce_rows<F>(&self, init: T, f: F) -> Result<Matrix<'static, T>>
    where
        F: FnMut(T, T) -> T,
    {
        let mut out = Matrix::with_order(self.rows(), 1, Order::ColMajor)?;
        self.reduce_rows_into(&mut out, init, f)?;
        Ok(out)
    }

    /// Fold each column into the matching element of the `1 x cols` matrix
    /// `dest`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` unless `dest` is `1 x cols`.
    pub fn reduce_cols_into<F>(&self, dest: &mut Matrix<'_, T>, init: T, mut f: F) -> Result<()>
    where
        F: FnMut(T, T) -> T,
    {
        if dest.dims() != (1, self.cols()) {
            return Err(MatrixError::ShapeMismatch {
                expected: (1, self.cols()),
                got: dest.dims(),
            });
        }
        let (src, layout) = (self.as_slice(), self.layout());
        let rows = self.rows();
        dest.set_each(|_, j| (0..rows).fold(init, |acc, i| f(acc, src[layout.offset(i, j)])));
        Ok(())
    }

    /// Owned `1 x cols` matrix of per-column folds.
    pub fn reduce_cols<F>(&self, init: T, f: F) -> Result<Matrix<'static, T>>
    where
        F: FnMut(T, T) -> T,
    {
        let mut out = Matrix::with_order(1, self.cols(), Order::RowMajor)?;
        self.reduce_cols_into(&mut out, init, f)?;
        Ok(out)
    }

    /// Copy `self` on top of `other` into the leading rows of `dest`.
    ///
    /// `dest` must have the common column count and at least
    /// `self.rows() + other.rows()` rows; any further rows are left alone.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the column counts differ or `dest` is too
    /// short.
    pub fn concat_vertical_into(&self, other: &Matrix<'_, T>, dest: &mut Matrix<'_, T>) -> Result<()> {
        let (rows, cols) = (self.rows() + other.rows(), self.cols());
        if other.cols() != cols || dest.cols() != cols || dest.rows() < rows {
            return Err(MatrixError::ShapeMismatch {
                expected: (rows, cols),
                got: if other.cols() != cols { other.dims() } else { dest.dims() },
            });
        }
        self.copy_into(&mut dest.sub_matrix(0, 0, self.rows(), cols)?)?;
        other.copy_into(&mut dest.sub_matrix(self.rows(), 0, other.rows(), cols)?)
    }

    /// Owned `(m1 + m2) x n` matrix with `self` above `other`.
    pub fn concat_vertical(&self, other: &Matrix<'_, T>) -> Result<Matrix<'static, T>> {
        let mut out = Matrix::with_order(self.rows() + other.rows(), self.cols(), self.order())?;
        self.concat_vertical_into(other, &mut out)?;
        Ok(out)
    }

    /// Copy `self` left of `other` into the leading columns of `dest`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the row counts differ or `dest` is too
    /// narrow.
    pub fn concat_horizontal_into(&self, other: &Matrix<'_, T>, dest: &mut Matrix<'_, T>) -> Result<()> {
        let (rows, cols) = (self.rows(), self.cols() + other.cols());
        if other.rows() != rows || dest.rows() != rows || dest.cols() < cols {
            return Err(MatrixError::ShapeMismatch {
                expected: (rows, cols),
                got: if other.rows() != rows { other.dims() } else { dest.dims() },
            });
        }
        self.copy_into(&mut dest.sub_matrix(0, 0, rows, self.cols())?)?;
        other.copy_into(&mut dest.sub_matrix(0, self.cols(), rows, other.cols())?)
    }

    /// Owned `m x (n1 + n2)` matrix with `self` left of `other`.
    pub fn concat_horizontal(&self, other: &Matrix<'_, T>) -> Result<Matrix<'static, T>> {
        let mut out = Matrix::with_order(self.rows(), self.cols() + other.cols(), self.order())?;
        self.concat_horizontal_into(other, &mut out)?;
        Ok(out)
    }
}
