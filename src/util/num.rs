use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest number of elements `iota` and `rho` will build.
pub const MAX_ELEMENTS: usize = 1 << 24;

/// Translates a user-facing index into a zero-based offset.
///
/// The offset is `index - origin` and must lie in `0..len`.
///
/// ## Errors
/// Returns `IndexOutOfRange` carrying the index as written when the offset
/// falls outside the valid range.
///
/// ## Example
/// ```
/// use ravel::util::num::index_offset;
///
/// assert_eq!(index_offset(1, 1, 3, 1).unwrap(), 0);
/// assert_eq!(index_offset(2, 0, 3, 1).unwrap(), 2);
/// assert!(index_offset(0, 1, 3, 1).is_err());
/// assert!(index_offset(4, 1, 3, 1).is_err());
/// ```
pub fn index_offset(index: i64, origin: i64, len: usize, line: usize) -> EvalResult<usize> {
    index.checked_sub(origin)
         .and_then(|offset| usize::try_from(offset).ok())
         .filter(|offset| *offset < len)
         .ok_or_else(|| RuntimeError::IndexOutOfRange { index: index.to_string(),
                                                        len,
                                                        line })
}

/// Converts a count to `usize`, rejecting negative values and counts above
/// [`MAX_ELEMENTS`].
///
/// ## Errors
/// Returns `DomainError` naming `what` when the count is out of range.
///
/// ## Example
/// ```
/// use ravel::util::num::count_from_i64;
///
/// assert_eq!(count_from_i64(5, "iota", 1).unwrap(), 5);
/// assert!(count_from_i64(-1, "iota", 1).is_err());
/// ```
pub fn count_from_i64(value: i64, what: &str, line: usize) -> EvalResult<usize> {
    usize::try_from(value).ok()
                          .filter(|n| *n <= MAX_ELEMENTS)
                          .ok_or_else(|| RuntimeError::DomainError { details: format!("{what} count {value} out of range"),
                                                                     line })
}

/// Converts a `usize` to `i64`.
///
/// ## Errors
/// Returns `DomainError` when the value does not fit.
pub fn usize_to_i64_checked(value: usize, line: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::DomainError { details: format!("{value} is too large"),
                                                                 line })
}
