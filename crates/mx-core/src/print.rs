use std::fmt::{self, Write};

use crate::element::Element;
use crate::matrix::Matrix;

/// Fixed-point number format for matrix display: every value is written
/// right-aligned in `width` columns with `precision` fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintFormat {
    pub width: usize,
    pub precision: usize,
}

impl PrintFormat {
    pub fn new(width: usize, precision: usize) -> Self {
        Self { width, precision }
    }
}

impl Default for PrintFormat {
    fn default() -> Self {
        Self::new(5, 2)
    }
}

impl<T: Element> Matrix<'_, T> {
    /// Render the matrix as text, one line per row, preceded by `label` on
    /// its own line when non-empty.
    pub fn format(&self, label: &str, format: PrintFormat) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out, label, format);
        out
    }

    fn write_to<W: Write + ?Sized>(&self, out: &mut W, label: &str, format: PrintFormat) -> fmt::Result {
        if !label.is_empty() {
            writeln!(out, "{}", label)?;
        }
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                if j > 0 {
                    out.write_char(' ')?;
                }
                if let Some(v) = self.get(i, j) {
                    v.write_fixed(out, format.width, format.precision)?;
                }
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

impl<T: Element> fmt::Display for Matrix<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, "", PrintFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Order, Strides};
    use num_complex::Complex;

    #[test]
    fn test_format_with_label() {
        let m = Matrix::from_row_slice(2, 2, &[1.0f64, -2.5, 0.0, 10.0], Strides::Auto).unwrap();
        let text = m.format("m:", PrintFormat::default());
        assert_eq!(text, "m:\n 1.00 -2.50\n 0.00 10.00\n");
    }

    #[test]
    fn test_display_ignores_layout() {
        let values = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
        let r = Matrix::from_row_slice(2, 3, &values, Strides::Packed(Order::RowMajor)).unwrap();
        let c = Matrix::from_row_slice(2, 3, &values, Strides::Explicit { row: 1, col: 4 }).unwrap();
        assert_eq!(r.to_string(), c.to_string());
        assert_eq!(r.to_string().lines().count(), 2);
    }

    #[test]
    fn test_format_precision() {
        let m = Matrix::from_row_slice(1, 1, &[0.125f64], Strides::Auto).unwrap();
        assert_eq!(m.format("", PrintFormat::new(8, 4)), "  0.1250\n");
    }

    #[test]
    fn test_format_complex() {
        let m = Matrix::from_row_slice(1, 1, &[Complex::new(1.0f64, -0.5)], Strides::Auto).unwrap();
        assert_eq!(m.format("", PrintFormat::default()), " 1.00 -0.50i\n");
    }

    #[test]
    fn test_format_empty() {
        let m = Matrix::<f64>::new(0, 3, Strides::Auto).unwrap();
        assert_eq!(m.format("empty", PrintFormat::default()), "empty\n");
    }
}
