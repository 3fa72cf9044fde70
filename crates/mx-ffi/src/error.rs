use std::cell::RefCell;
use std::ffi::CString;

use mx_core::MatrixError;

use crate::types::MxStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `mx_last_error`.
pub fn set_last_error(msg: String) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Record a library error and return its status code.
pub fn fail(op: &str, err: MatrixError) -> MxStatus {
    let status = MxStatus::from(&err);
    tracing::warn!(op, ?status, %err, "matrix call failed");
    set_last_error(format!("{}: {}", op, err));
    status
}

/// Record an invalid-argument error (null pointer, unknown code).
pub fn invalid_argument(op: &str, msg: &str) -> MxStatus {
    tracing::warn!(op, msg, "invalid argument");
    set_last_error(format!("{}: {}", op, msg));
    MxStatus::ErrorInvalidArgument
}
