/// Dispatch of binary operators.
///
/// Routes structural operators to their own routines and everything else
/// to element-wise evaluation.
pub mod core;

/// Scalar binary operators.
///
/// Numbers go through the numeric tower; chars and strings support
/// comparisons.
pub mod scalar;

/// Array-shaped binary operators.
///
/// Element-wise broadcasting, catenation and reshape.
pub mod array;
