use std::fmt;

/// Default index origin: the first element of a vector is `v[1]`.
pub const DEFAULT_ORIGIN: i64 = 1;
/// Default number of significant digits kept by float results.
pub const DEFAULT_FLOAT_PRECISION: u64 = 32;
/// Largest float precision `)prec` and `--prec` accept.
pub const MAX_FLOAT_PRECISION: u64 = 10_000;
/// Default limit on nested user operator calls.
pub const DEFAULT_MAX_DEPTH: usize = 256;
/// Default limit on how deeply one expression may nest.
pub const DEFAULT_MAX_NESTING: usize = 128;

/// Session configuration read by the parser and evaluator.
///
/// A `Config` is owned by the [`Context`](crate::interpreter::evaluator::core::Context)
/// and can be changed between lines through special commands such as
/// `)origin 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Logical index of the first element (0 or 1).
    pub origin:          i64,
    /// Significant digits kept when rounding float results.
    pub float_precision: u64,
    /// Maximum nesting depth of user operator calls.
    pub max_depth:       usize,
    /// Maximum nesting depth of a parsed expression.
    pub max_nesting:     usize,
    /// Debug toggles.
    pub debug:           DebugFlags,
}

/// Debug toggles flipped with `)debug name`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugFlags {
    /// Emit the tree form of every parsed statement.
    pub parse:  bool,
    /// Emit the buffered token list of every line.
    pub tokens: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { origin:          DEFAULT_ORIGIN,
               float_precision: DEFAULT_FLOAT_PRECISION,
               max_depth:       DEFAULT_MAX_DEPTH,
               max_nesting:     DEFAULT_MAX_NESTING,
               debug:           DebugFlags::default(), }
    }
}

impl DebugFlags {
    /// Names accepted by `)debug`.
    pub const NAMES: &'static [&'static str] = &["parse", "tokens"];

    /// Flips the toggle called `name` and returns its new state.
    ///
    /// Returns `None` when no toggle has that name.
    ///
    /// # Example
    /// ```
    /// use ravel::config::DebugFlags;
    ///
    /// let mut flags = DebugFlags::default();
    /// assert_eq!(flags.toggle("parse"), Some(true));
    /// assert_eq!(flags.toggle("parse"), Some(false));
    /// assert_eq!(flags.toggle("colour"), None);
    /// ```
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let flag = match name {
            "parse" => &mut self.parse,
            "tokens" => &mut self.tokens,
            _ => return None,
        };
        *flag = !*flag;
        Some(*flag)
    }

    /// Reads the toggle called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        match name {
            "parse" => Some(self.parse),
            "tokens" => Some(self.tokens),
            _ => None,
        }
    }
}

impl fmt::Display for DebugFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in Self::NAMES {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            let state = self.get(name).unwrap_or_default();
            write!(f, "{name}={}", u8::from(state))?;
        }
        Ok(())
    }
}
