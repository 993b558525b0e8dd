/// Checked numeric conversions.
///
/// Provides the helpers that turn user-facing integers into offsets and
/// counts without silent wrap-around.
pub mod num;
