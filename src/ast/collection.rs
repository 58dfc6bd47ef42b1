use crate::{ast::Expression, error::ExpressionError};

/// An ordered, non-empty list of expressions, written `{a, b, c}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vector {
    elements: Vec<Expression>,
}

impl Vector {
    /// Creates a vector.
    ///
    /// # Errors
    /// Returns [`ExpressionError::EmptyVector`] if `elements` is empty.
    pub fn new(elements: Vec<Expression>) -> Result<Self, ExpressionError> {
        if elements.is_empty() {
            return Err(ExpressionError::EmptyVector);
        }
        Ok(Self { elements })
    }

    /// The elements, in order.
    #[must_use]
    pub fn elements(&self) -> &[Expression] {
        &self.elements
    }

    /// The number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// A rectangular list of rows, written `{{a, b}, {c, d}}`.
///
/// Every row has the same length; a ragged matrix cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix {
    rows: Vec<Vector>,
}

impl Matrix {
    /// Creates a matrix from its rows.
    ///
    /// # Errors
    /// - [`ExpressionError::EmptyMatrix`] if `rows` is empty.
    /// - [`ExpressionError::InvalidMatrix`] if the rows differ in length.
    ///
    /// # Example
    /// ```
    /// use mathtree::{
    ///     ast::{Expression, Matrix, Vector},
    ///     error::ExpressionError,
    /// };
    ///
    /// let row = |n: usize| Vector::new(vec![Expression::number(1.0); n]).unwrap();
    /// assert!(Matrix::new(vec![row(2), row(2)]).is_ok());
    /// assert_eq!(Matrix::new(vec![row(2), row(3)]),
    ///            Err(ExpressionError::InvalidMatrix { row:      1,
    ///                                                 expected: 2,
    ///                                                 found:    3, }));
    /// ```
    pub fn new(rows: Vec<Vector>) -> Result<Self, ExpressionError> {
        let Some(first) = rows.first() else {
            return Err(ExpressionError::EmptyMatrix);
        };
        let expected = first.len();
        if let Some((row, vector)) = rows.iter().enumerate().find(|(_, v)| v.len() != expected) {
            return Err(ExpressionError::InvalidMatrix { row,
                                                        expected,
                                                        found: vector.len() });
        }
        Ok(Self { rows })
    }

    /// The rows, in order.
    #[must_use]
    pub fn rows(&self) -> &[Vector] {
        &self.rows
    }

    /// The number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vector::len)
    }

    /// Every element in row-major order.
    pub fn elements(&self) -> impl Iterator<Item = &Expression> {
        self.rows.iter().flat_map(Vector::elements)
    }
}
