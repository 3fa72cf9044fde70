mod error;
mod handle;
mod types;

pub use error::*;
pub use handle::*;
pub use types::*;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use mx_core::{CpuBackend, DType, DynMatrix, GemmBackend, MatrixError, PrintFormat};

/// Execute a closure that returns an `MxStatus`, catching any panics
/// and converting them into `MxStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> MxStatus + std::panic::UnwindSafe>(f: F) -> MxStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            MxStatus::ErrorInternal
        }
    }
}

fn index(op: &str, i: i64, j: i64) -> Result<(usize, usize), MxStatus> {
    match (usize::try_from(i), usize::try_from(j)) {
        (Ok(i), Ok(j)) => Ok((i, j)),
        _ => Err(fail(
            op,
            MatrixError::PreconditionViolation(format!("negative index ({}, {})", i, j)),
        )),
    }
}

/// Create a matrix object.
///
/// `dtype` is a datatype code: 0 = f32, 1 = c32, 2 = f64, 3 = c64.
/// `row_stride == col_stride == 0` requests automatic (dense) strides.
///
/// On success, writes a heap-allocated `MxObject` pointer into `*obj_out`
/// and returns `MxStatus::Ok`. The caller must later call `mx_obj_free`.
/// Element contents are unspecified until filled.
#[no_mangle]
pub extern "C" fn mx_obj_create(
    dtype: u32,
    rows: i64,
    cols: i64,
    row_stride: i64,
    col_stride: i64,
    obj_out: *mut *mut MxObject,
) -> MxStatus {
    catch_panic(|| {
        if obj_out.is_null() {
            return invalid_argument("mx_obj_create", "obj_out is null");
        }
        let Some(dtype) = DType::from_code(dtype) else {
            return invalid_argument("mx_obj_create", "unknown datatype code");
        };
        let matrix = match DynMatrix::create_with_config(
            dtype,
            rows,
            cols,
            row_stride,
            col_stride,
            config(),
        ) {
            Ok(m) => m,
            Err(e) => return fail("mx_obj_create", e),
        };
        let obj = Box::new(MxObject::new(matrix));
        unsafe {
            *obj_out = Box::into_raw(obj);
        }
        MxStatus::Ok
    })
}

/// Free an object previously created by `mx_obj_create`.
///
/// Passing a null pointer is a no-op.
///
/// # Safety
/// `obj` must be null or a live handle from `mx_obj_create`; it must not be
/// used afterwards.
#[no_mangle]
pub unsafe extern "C" fn mx_obj_free(obj: *mut MxObject) {
    if obj.is_null() {
        return;
    }
    let MxObject { matrix } = *Box::from_raw(obj);
    matrix.release();
}

/// Number of rows, or -1 for a null handle.
///
/// # Safety
/// `obj` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn mx_obj_rows(obj: *const MxObject) -> i64 {
    match obj.as_ref() {
        Some(o) => o.matrix.rows() as i64,
        None => -1,
    }
}

/// Number of columns, or -1 for a null handle.
///
/// # Safety
/// `obj` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn mx_obj_cols(obj: *const MxObject) -> i64 {
    match obj.as_ref() {
        Some(o) => o.matrix.cols() as i64,
        None => -1,
    }
}

/// Datatype code of the object, or -1 for a null handle.
///
/// # Safety
/// `obj` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn mx_obj_dtype(obj: *const MxObject) -> i32 {
    match obj.as_ref() {
        Some(o) => o.matrix.dtype().code() as i32,
        None => -1,
    }
}

/// Set every element of `obj` to `value`.
///
/// # Safety
/// `obj` must be null or a live handle not in use by another thread.
#[no_mangle]
pub unsafe extern "C" fn mx_setm(value: MxScalar, obj: *mut MxObject) -> MxStatus {
    catch_panic(|| {
        let Some(obj) = (unsafe { obj.as_mut() }) else {
            return invalid_argument("mx_setm", "null object");
        };
        let result = value
            .to_scalar(obj.matrix.dtype())
            .and_then(|s| obj.matrix.fill(&s));
        match result {
            Ok(()) => MxStatus::Ok,
            Err(e) => fail("mx_setm", e),
        }
    })
}

/// Fill every element of `obj` with uniform random values in `[-1, 1]`
/// (each real component).
///
/// All calls draw from one process-wide generator, so consecutive fills
/// differ. `MX_RANDOM_SEED` makes the whole sequence reproducible.
///
/// # Safety
/// `obj` must be null or a live handle not in use by another thread.
#[no_mangle]
pub unsafe extern "C" fn mx_randm(obj: *mut MxObject) -> MxStatus {
    catch_panic(|| {
        let Some(obj) = (unsafe { obj.as_mut() }) else {
            return invalid_argument("mx_randm", "null object");
        };
        let dist = config().random;
        with_rng(|rng| obj.matrix.fill_random_with(rng, &dist));
        MxStatus::Ok
    })
}

/// Read element `(i, j)` into `*out`.
///
/// # Safety
/// `obj` must be null or a live handle; `out` must be null or valid for a
/// write of one `MxScalar`.
#[no_mangle]
pub unsafe extern "C" fn mx_get(obj: *const MxObject, i: i64, j: i64, out: *mut MxScalar) -> MxStatus {
    catch_panic(|| {
        let (Some(obj), false) = (unsafe { obj.as_ref() }, out.is_null()) else {
            return invalid_argument("mx_get", "null argument");
        };
        let (i, j) = match index("mx_get", i, j) {
            Ok(ij) => ij,
            Err(status) => return status,
        };
        match obj.matrix.get(i, j) {
            Some(v) => {
                unsafe { *out = MxScalar::from(v) };
                MxStatus::Ok
            }
            None => fail(
                "mx_get",
                MatrixError::PreconditionViolation(format!(
                    "index ({}, {}) out of bounds for {}x{} matrix",
                    i,
                    j,
                    obj.matrix.rows(),
                    obj.matrix.cols()
                )),
            ),
        }
    })
}

/// Overwrite element `(i, j)` with `value`.
///
/// # Safety
/// `obj` must be null or a live handle not in use by another thread.
#[no_mangle]
pub unsafe extern "C" fn mx_set(obj: *mut MxObject, i: i64, j: i64, value: MxScalar) -> MxStatus {
    catch_panic(|| {
        let Some(obj) = (unsafe { obj.as_mut() }) else {
            return invalid_argument("mx_set", "null object");
        };
        let (i, j) = match index("mx_set", i, j) {
            Ok(ij) => ij,
            Err(status) => return status,
        };
        let result = value
            .to_scalar(obj.matrix.dtype())
            .and_then(|s| obj.matrix.set(i, j, &s));
        match result {
            Ok(()) => MxStatus::Ok,
            Err(e) => fail("mx_set", e),
        }
    })
}

/// General matrix multiply-accumulate: `c := beta*c + alpha*a*b`.
///
/// `a` and `b` may be the same handle; `c` must differ from both. On error
/// `c` is left unchanged.
///
/// # Safety
/// All handles must be null or live, and `c` must not be in use by another
/// thread.
#[no_mangle]
pub unsafe extern "C" fn mx_gemm(
    alpha: MxScalar,
    a: *const MxObject,
    b: *const MxObject,
    beta: MxScalar,
    c: *mut MxObject,
) -> MxStatus {
    catch_panic(|| {
        if a.is_null() || b.is_null() || c.is_null() {
            return invalid_argument("mx_gemm", "null object");
        }
        if std::ptr::eq(a, c) || std::ptr::eq(b, c) {
            return fail(
                "mx_gemm",
                MatrixError::PreconditionViolation("output c aliases an input".to_string()),
            );
        }
        let (a, b, c) = unsafe { (&(*a).matrix, &(*b).matrix, &mut (*c).matrix) };

        let dtype = c.dtype();
        let scalars = alpha
            .to_scalar(dtype)
            .and_then(|alpha| Ok((alpha, beta.to_scalar(dtype)?)));
        let result = scalars.and_then(|(alpha, beta)| CpuBackend::new().gemm(&alpha, a, b, &beta, c));
        match result {
            Ok(()) => MxStatus::Ok,
            Err(e) => fail("mx_gemm", e),
        }
    })
}

/// Print `obj` to stdout, preceded by `label` (may be null), with each value
/// formatted in `width` columns and `precision` fractional digits.
///
/// # Safety
/// `label` must be null or a NUL-terminated string; `obj` must be null or a
/// live handle.
#[no_mangle]
pub unsafe extern "C" fn mx_printm(
    label: *const c_char,
    obj: *const MxObject,
    width: u32,
    precision: u32,
) -> MxStatus {
    catch_panic(|| {
        let Some(obj) = (unsafe { obj.as_ref() }) else {
            return invalid_argument("mx_printm", "null object");
        };
        let label = if label.is_null() {
            ""
        } else {
            match unsafe { CStr::from_ptr(label) }.to_str() {
                Ok(s) => s,
                Err(_) => return invalid_argument("mx_printm", "label is not valid UTF-8"),
            }
        };
        let format = PrintFormat::new(width as usize, precision as usize);
        print!("{}", obj.matrix.format(label, format));
        MxStatus::Ok
    })
}

/// Print `obj` to stdout like `mx_printm`, using the configured default
/// format (5 columns, `MX_PRINT_PRECISION` fractional digits, 2 if unset).
///
/// # Safety
/// Same as `mx_printm`.
#[no_mangle]
pub unsafe extern "C" fn mx_print(label: *const c_char, obj: *const MxObject) -> MxStatus {
    let format = config().print;
    mx_printm(label, obj, format.width as u32, format.precision as u32)
}

/// Retrieve the last error message, or null if none.
///
/// The returned string is heap-allocated and must be freed
/// with `mx_free_string`.
#[no_mangle]
pub extern "C" fn mx_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `mx_last_error`.
///
/// # Safety
/// `s` must be null or a pointer returned by `mx_last_error`.
#[no_mangle]
pub unsafe extern "C" fn mx_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
