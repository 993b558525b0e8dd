/// Numeric tower kernels.
///
/// Implements promotion between `Int`, `BigInt`, `BigRat` and `BigFloat`
/// and the arithmetic of each rung behind the `Kernel` trait. Integer
/// overflow climbs to big integers, inexact integer division produces
/// rationals, and rationals with denominator 1 fall back to integers.
pub mod number;
/// Matrix storage.
///
/// Defines the `Matrix` type: a shape plus row-major scalar data, with row
/// selection, axis reversal and display.
pub mod matrix;

/// The `Value` enum, value kinds, conversion and formatting.
pub mod core;
