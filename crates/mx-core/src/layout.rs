use std::fmt;

use crate::error::{MatrixError, Result};

/// Dense packing order used when strides are chosen automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Elements of a row are adjacent (`col_stride == 1`).
    RowMajor,
    /// Elements of a column are adjacent (`row_stride == 1`).
    #[default]
    ColMajor,
}

/// Stride request passed when constructing a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strides {
    /// Dense packing in the default order ([`Order::ColMajor`]).
    Auto,
    /// Dense packing in the given order.
    Packed(Order),
    /// Caller-chosen strides, validated against the non-aliasing rule.
    Explicit { row: isize, col: isize },
}

/// Maps logical `(row, col)` indices to linear buffer offsets.
///
/// `offset(i, j) = i * row_stride + j * col_stride`. Layouts built through
/// [`Layout::new`] never map two in-bounds positions to the same offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Layout {
    rows: usize,
    cols: usize,
    row_stride: isize,
    col_stride: isize,
}

impl Layout {
    /// Build a layout from a stride request.
    ///
    /// # Errors
    /// Returns `InvalidShape` if explicit strides are not positive, or if
    /// neither stride is 1 with the other spanning the orthogonal dimension.
    pub fn new(rows: usize, cols: usize, strides: Strides) -> Result<Self> {
        if rows > isize::MAX as usize || cols > isize::MAX as usize || rows.checked_mul(cols).is_none() {
            return Err(MatrixError::InvalidShape(format!(
                "{}x{} matrix has more elements than fit in usize",
                rows, cols
            )));
        }
        match strides {
            Strides::Auto => Ok(Layout::packed(rows, cols, Order::default())),
            Strides::Packed(order) => Ok(Layout::packed(rows, cols, order)),
            Strides::Explicit { row, col } => Layout::strided(rows, cols, row, col),
        }
    }

    /// Dense layout in the given order.
    pub fn packed(rows: usize, cols: usize, order: Order) -> Self {
        match order {
            Order::RowMajor => Layout {
                rows,
                cols,
                row_stride: cols.max(1) as isize,
                col_stride: 1,
            },
            Order::ColMajor => Layout {
                rows,
                cols,
                row_stride: 1,
                col_stride: rows.max(1) as isize,
            },
        }
    }

    /// Dense row-major layout.
    pub fn row_major(rows: usize, cols: usize) -> Self {
        Layout::packed(rows, cols, Order::RowMajor)
    }

    /// Dense column-major layout.
    pub fn col_major(rows: usize, cols: usize) -> Self {
        Layout::packed(rows, cols, Order::ColMajor)
    }

    /// Layout with explicit strides.
    ///
    /// A stride along a dimension of extent 0 or 1 is never applied, so it
    /// only has to be positive.
    pub fn strided(rows: usize, cols: usize, row_stride: isize, col_stride: isize) -> Result<Self> {
        if row_stride < 1 || col_stride < 1 {
            return Err(MatrixError::InvalidShape(format!(
                "strides must be positive, got rs={} cs={}",
                row_stride, col_stride
            )));
        }

        let row_family = col_stride == 1 && (rows <= 1 || row_stride as usize >= cols);
        let col_family = row_stride == 1 && (cols <= 1 || col_stride as usize >= rows);
        if !row_family && !col_family {
            return Err(MatrixError::InvalidShape(format!(
                "strides rs={} cs={} alias elements of a {}x{} matrix",
                row_stride, col_stride, rows, cols
            )));
        }

        Ok(Layout {
            rows,
            cols,
            row_stride,
            col_stride,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_stride(&self) -> isize {
        self.row_stride
    }

    pub fn col_stride(&self) -> isize {
        self.col_stride
    }

    /// Number of logical elements, saturating at `usize::MAX`.
    ///
    /// Layouts built through [`Layout::new`] never saturate.
    pub fn numel(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Number of logical elements, or `None` if it overflows `usize`.
    pub fn checked_numel(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Linear offset of `(i, j)` relative to the matrix origin.
    #[inline]
    pub fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.rows && j < self.cols);
        i * self.row_stride as usize + j * self.col_stride as usize
    }

    /// Minimum buffer length able to hold every addressable offset, or `None`
    /// if that length does not fit in `usize`.
    pub fn checked_required_len(&self) -> Option<usize> {
        if self.is_empty() {
            return Some(0);
        }
        let last_row = (self.rows - 1).checked_mul(self.row_stride as usize)?;
        let last_col = (self.cols - 1).checked_mul(self.col_stride as usize)?;
        last_row.checked_add(last_col)?.checked_add(1)
    }

    /// Minimum buffer length able to hold every addressable offset.
    ///
    /// # Panics
    /// Panics if the length overflows `usize`; layouts backing a live matrix
    /// never do.
    pub fn required_len(&self) -> usize {
        self.checked_required_len()
            .expect("layout extent overflows usize")
    }

    /// True if consecutive columns of a row are adjacent in memory.
    pub fn is_row_major(&self) -> bool {
        self.col_stride == 1
    }

    /// True if consecutive rows of a column are adjacent in memory.
    pub fn is_col_major(&self) -> bool {
        self.row_stride == 1
    }

    /// True if the layout addresses a gap-free buffer of `numel()` elements.
    pub fn is_contiguous(&self) -> bool {
        self.checked_required_len() == Some(self.numel())
    }

    /// All in-bounds `(row, col)` positions, each exactly once, walking the
    /// unit-stride dimension innermost.
    pub fn positions(self) -> impl Iterator<Item = (usize, usize)> {
        let row_outer = self.is_row_major();
        let (outer, inner) = if row_outer {
            (self.rows, self.cols)
        } else {
            (self.cols, self.rows)
        };
        (0..outer).flat_map(move |o| {
            (0..inner).map(move |n| if row_outer { (o, n) } else { (n, o) })
        })
    }

    /// The same storage viewed with rows and columns exchanged.
    pub fn transposed(&self) -> Layout {
        Layout {
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }

    /// Window of `rows x cols` starting at `(i, j)`.
    ///
    /// Returns the window's origin offset and its layout, which keeps the
    /// parent strides.
    ///
    /// # Errors
    /// Returns `InvalidShape` if the window extends past the parent.
    pub fn sub(&self, i: usize, j: usize, rows: usize, cols: usize) -> Result<(usize, Layout)> {
        let row_end = i.checked_add(rows);
        let col_end = j.checked_add(cols);
        match (row_end, col_end) {
            (Some(re), Some(ce)) if re <= self.rows && ce <= self.cols => {}
            _ => {
                return Err(MatrixError::InvalidShape(format!(
                    "window [{}+{}, {}+{}] exceeds {}x{} matrix",
                    i, rows, j, cols, self.rows, self.cols
                )))
            }
        }

        let layout = Layout {
            rows,
            cols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
        };
        if layout.is_empty() {
            return Ok((0, layout));
        }
        Ok((self.offset(i, j), layout))
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}x{}, rs={}, cs={}]",
            self.rows, self.cols, self.row_stride, self.col_stride
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_strides() {
        let r = Layout::row_major(4, 3);
        assert_eq!((r.row_stride(), r.col_stride()), (3, 1));
        let c = Layout::col_major(4, 3);
        assert_eq!((c.row_stride(), c.col_stride()), (1, 4));
    }

    #[test]
    fn test_auto_is_col_major() {
        let l = Layout::new(4, 5, Strides::Auto).unwrap();
        assert_eq!(l, Layout::col_major(4, 5));
    }

    #[test]
    fn test_offsets_row_and_col_major() {
        let r = Layout::row_major(2, 3);
        assert_eq!(r.offset(1, 2), 5);
        let c = Layout::col_major(2, 3);
        assert_eq!(c.offset(1, 2), 5);
        assert_eq!(c.offset(1, 0), 1);
        assert_eq!(r.offset(1, 0), 3);
    }

    #[test]
    fn test_explicit_padded_strides() {
        let l = Layout::new(3, 2, Strides::Explicit { row: 1, col: 8 }).unwrap();
        assert_eq!(l.required_len(), 11);
        assert!(!l.is_contiguous());
        assert!(l.is_col_major());
    }

    #[test]
    fn test_explicit_aliasing_rejected() {
        // Row-major with rs < cols overlaps consecutive rows.
        assert!(Layout::strided(3, 4, 2, 1).is_err());
        // Neither stride is unit.
        assert!(Layout::strided(3, 4, 4, 2).is_err());
        // Non-positive strides.
        assert!(Layout::strided(3, 4, 0, 1).is_err());
        assert!(Layout::strided(3, 4, -4, 1).is_err());
    }

    #[test]
    fn test_vector_strides() {
        // A single row never applies its row stride.
        assert!(Layout::strided(1, 5, 1, 1).is_ok());
        assert!(Layout::strided(5, 1, 1, 1).is_ok());
        assert!(Layout::strided(5, 1, 1, 7).is_ok());
    }

    #[test]
    fn test_empty_layout() {
        let l = Layout::col_major(0, 3);
        assert!(l.is_empty());
        assert_eq!(l.numel(), 0);
        assert_eq!(l.required_len(), 0);
        assert_eq!(l.col_stride(), 1);
    }

    #[test]
    fn test_positions_follow_memory_order() {
        let r: Vec<_> = Layout::row_major(2, 2).positions().collect();
        assert_eq!(r, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        let c: Vec<_> = Layout::col_major(2, 2).positions().collect();
        assert_eq!(c, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(Layout::col_major(0, 3).positions().count(), 0);
        assert_eq!(Layout::row_major(3, 4).positions().count(), 12);
    }

    #[test]
    fn test_transposed() {
        let l = Layout::row_major(2, 3).transposed();
        assert_eq!((l.rows(), l.cols()), (3, 2));
        assert!(l.is_col_major());
        assert_eq!(l.offset(2, 1), Layout::row_major(2, 3).offset(1, 2));
    }

    #[test]
    fn test_sub_window() {
        let l = Layout::col_major(10, 4);
        let (base, s) = l.sub(1, 1, 8, 2).unwrap();
        assert_eq!(base, 11);
        assert_eq!((s.rows(), s.cols()), (8, 2));
        assert_eq!(s.col_stride(), 10);
        assert!(l.sub(3, 0, 8, 1).is_err());
        assert!(l.sub(0, 4, 1, 1).is_err());
        assert_eq!(l.sub(10, 0, 0, 4).unwrap().0, 0);
    }

    #[test]
    fn test_overflowing_extent() {
        let l = Layout::row_major(usize::MAX / 2, 4);
        assert!(l.checked_required_len().is_none());
    }

    #[test]
    fn test_huge_dimensions_rejected() {
        let err = Layout::new(usize::MAX, 2, Strides::Auto).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidShape(_)));
        assert!(Layout::new(usize::MAX / 4, 8, Strides::Packed(Order::RowMajor)).is_err());
        let l = Layout::row_major(usize::MAX, 2);
        assert_eq!(l.numel(), usize::MAX);
        assert_eq!(l.checked_numel(), None);
    }

    #[test]
    fn test_transposed_stays_valid() {
        let l = Layout::new(3, 4, Strides::Explicit { row: 1, col: 5 }).unwrap();
        let t = l.transposed();
        assert!(Layout::strided(t.rows(), t.cols(), t.row_stride(), t.col_stride()).is_ok());
        assert!(Layout::col_major(3, 4).is_contiguous());
        assert!(!l.is_contiguous());
    }

    #[test]
    fn test_display() {
        assert_eq!(Layout::col_major(4, 5).to_string(), "[4x5, rs=1, cs=4]");
    }
}
