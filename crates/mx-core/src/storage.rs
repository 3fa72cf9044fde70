use crate::element::Element;
use crate::error::{MatrixError, Result};

/// Backing buffer of a matrix.
///
/// Owned storage is freed when the matrix is released; a view borrows the
/// caller's buffer for `'a` and frees nothing.
#[derive(Debug)]
pub enum Storage<'a, T> {
    /// Buffer allocated and owned by the matrix.
    Owned(Vec<T>),
    /// Caller-provided buffer.
    View(&'a mut [T]),
}

impl<'a, T: Element> Storage<'a, T> {
    /// Allocate `n` zeroed elements.
    ///
    /// # Errors
    /// Returns `AllocationFailure` if the allocator cannot provide the buffer.
    pub fn allocate(n: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(n)
            .map_err(|_| MatrixError::AllocationFailure {
                dtype: T::DTYPE,
                elements: n,
            })?;
        data.resize(n, T::zero());
        tracing::trace!(elements = n, dtype = %T::DTYPE, "allocated matrix storage");
        Ok(Storage::Owned(data))
    }

    /// Number of elements in the buffer (including stride padding).
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for caller-provided storage.
    pub fn is_view(&self) -> bool {
        matches!(self, Storage::View(_))
    }

    pub fn as_slice(&self) -> &[T] {
        match self {
            Storage::Owned(v) => v.as_slice(),
            Storage::View(s) => s,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Storage::Owned(v) => v.as_mut_slice(),
            Storage::View(s) => s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_zeroed() {
        let s = Storage::<f32>::allocate(5).unwrap();
        assert_eq!(s.len(), 5);
        assert!(!s.is_view());
        assert_eq!(s.as_slice(), &[0.0; 5]);
    }

    #[test]
    fn test_allocate_empty() {
        let s = Storage::<f64>::allocate(0).unwrap();
        assert!(s.is_empty());
    }

    #[test]
    fn test_allocate_failure() {
        let err = Storage::<f64>::allocate(usize::MAX).unwrap_err();
        assert!(matches!(err, MatrixError::AllocationFailure { .. }));
    }

    #[test]
    fn test_view_writes_through() {
        let mut buf = vec![1.0f32, 2.0, 3.0];
        {
            let mut s = Storage::View(buf.as_mut_slice());
            assert!(s.is_view());
            s.as_mut_slice()[0] = 42.0;
        }
        assert_eq!(buf[0], 42.0);
    }
}
