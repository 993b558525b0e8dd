use std::rc::Rc;

use crate::{
    config::Config,
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// A multi-dimensional array stored row-major.
///
/// The number of elements always equals the product of the shape, and the
/// shape has at least one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Vec<usize>,
    data:  Rc<Vec<Value>>,
}

impl Matrix {
    /// Builds a matrix, checking the element count against the shape.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` when the shape is empty or does not match the
    /// number of elements, and `NonScalarVectorElement` when an element is
    /// not a scalar.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::value::{core::Value, matrix::Matrix};
    ///
    /// let data = (1..=6).map(Value::Int).collect();
    /// let m = Matrix::new(vec![2, 3], data, 1).unwrap();
    ///
    /// assert_eq!(m.shape(), &[2, 3]);
    /// assert!(Matrix::new(vec![2, 2], vec![Value::Int(1)], 1).is_err());
    /// ```
    pub fn new(shape: Vec<usize>, data: Vec<Value>, line: usize) -> EvalResult<Self> {
        let expected = shape.iter().product::<usize>();
        if shape.is_empty() || expected != data.len() {
            return Err(RuntimeError::ShapeMismatch { left: join_shape(&shape),
                                                     right: data.len().to_string(),
                                                     line });
        }
        if let Some(bad) = data.iter().find(|v| !v.is_scalar()) {
            return Err(RuntimeError::NonScalarVectorElement { kind: bad.kind(),
                                                              line });
        }
        Ok(Self { shape,
                  data: Rc::new(data) })
    }

    /// The dimension sizes, outermost first.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The elements in row-major order.
    #[must_use]
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Number of elements in one slice along the first axis.
    #[must_use]
    pub fn row_len(&self) -> usize {
        self.shape[1..].iter().product()
    }

    /// Selects a slice along the first axis by zero-based offset.
    ///
    /// A two-dimensional matrix yields a vector; higher ranks yield a
    /// matrix of one rank less.
    pub fn row(&self, offset: usize, line: usize) -> EvalResult<Value> {
        if self.shape.len() == 1 {
            return Ok(self.data[offset].clone());
        }
        let len = self.row_len();
        let start = offset * len;
        let cells = self.data[start..start + len].to_vec();
        if self.shape.len() <= 2 {
            return Ok(Value::from(cells));
        }
        Ok(Value::Matrix(Self::new(self.shape[1..].to_vec(), cells, line)?))
    }

    /// Reverses the order of the axes.
    ///
    /// For a two-dimensional matrix this swaps rows and columns.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::value::{core::Value, matrix::Matrix};
    ///
    /// let m = Matrix::new(vec![2, 3], (1..=6).map(Value::Int).collect(), 1).unwrap();
    /// let t = m.transpose(1).unwrap();
    ///
    /// assert_eq!(t.shape(), &[3, 2]);
    /// assert_eq!(t.data()[1], Value::Int(4));
    /// ```
    pub fn transpose(&self, line: usize) -> EvalResult<Self> {
        let rank = self.shape.len();
        let new_shape: Vec<usize> = self.shape.iter().rev().copied().collect();
        let strides = strides(&self.shape);

        let mut data = Vec::with_capacity(self.data.len());
        let mut index = vec![0usize; rank];
        for _ in 0..self.data.len() {
            // `index` walks the transposed shape; its reverse addresses the source.
            let offset: usize = index.iter()
                                     .rev()
                                     .zip(&strides)
                                     .map(|(i, stride)| i * stride)
                                     .sum();
            data.push(self.data[offset].clone());

            for axis in (0..rank).rev() {
                index[axis] += 1;
                if index[axis] < new_shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }
        Self::new(new_shape, data, line)
    }

    /// Formats the matrix one row per line with right-aligned columns.
    ///
    /// Ranks above two print each two-dimensional block separated by a
    /// blank line.
    #[must_use]
    pub fn sprint(&self, config: &Config) -> String {
        let cells: Vec<String> = self.data.iter().map(|v| v.sprint(config)).collect();
        let columns = *self.shape.last().unwrap_or(&1);
        if columns == 0 {
            return String::new();
        }
        let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        let block = if self.shape.len() >= 2 { columns * self.shape[self.shape.len() - 2] } else { columns };

        let mut out = String::new();
        for (row_index, row) in cells.chunks(columns).enumerate() {
            if row_index > 0 {
                out.push('\n');
                if block > 0 && (row_index * columns) % block == 0 {
                    out.push('\n');
                }
            }
            let line = row.iter()
                          .map(|c| format!("{c:>width$}"))
                          .collect::<Vec<_>>()
                          .join(" ");
            out.push_str(&line);
        }
        out
    }

    /// Source text that rebuilds the matrix with `rho`.
    #[must_use]
    pub fn canonical(&self) -> String {
        let data = Value::from(self.data.to_vec());
        format!("({} rho {})", join_shape(&self.shape), data.canonical())
    }
}

fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// Formats a shape as space-separated sizes.
#[must_use]
pub fn join_shape(shape: &[usize]) -> String {
    shape.iter().map(ToString::to_string).collect::<Vec<_>>().join(" ")
}
