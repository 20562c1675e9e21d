//! Painted field: a rectangular matrix of emoji names.
//!
//! # Responsibility
//! - Own the cell matrix and its dimensions.
//! - Resize without losing paint in the surviving region.
//! - Render the matrix as paste-ready text.
//!
//! # Invariants
//! - `width >= 1` and `height >= 1`.
//! - Every row has exactly `width` cells; there are exactly `height` rows.
//! - Cells hold a dictionary name or `""`; dangling names are tolerated.
//! - Shrinking discards cells; nothing is kept for a later regrow.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How cells created by a resize are filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GrowthPolicy {
    /// New cells take the current background brush.
    #[default]
    Background,
    /// New cells stay unset (`""`).
    Empty,
    /// New rows copy the first row; new columns copy each row's first cell.
    DuplicateFirstRow,
}

impl GrowthPolicy {
    fn column_fill(self, row: &[String], background: &str) -> String {
        match self {
            Self::Background => background.to_string(),
            Self::Empty => String::new(),
            Self::DuplicateFirstRow => row
                .first()
                .cloned()
                .unwrap_or_else(|| background.to_string()),
        }
    }

    fn row_fill(self, rows: &[Vec<String>], width: usize, background: &str) -> Vec<String> {
        match self {
            Self::Background => vec![background.to_string(); width],
            Self::Empty => vec![String::new(); width],
            Self::DuplicateFirstRow => rows
                .first()
                .cloned()
                .unwrap_or_else(|| vec![background.to_string(); width]),
        }
    }
}

/// Field-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Cell address outside the current matrix.
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },
    /// Requested or decoded dimensions violate `width, height >= 1`.
    InvalidDimensions { width: usize, height: usize },
    /// Decoded rows do not all have the same length.
    JaggedRows { row: usize, expected: usize, found: usize },
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds {
                row,
                col,
                width,
                height,
            } => write!(
                f,
                "cell ({row}, {col}) is outside the {width}x{height} field"
            ),
            Self::InvalidDimensions { width, height } => write!(
                f,
                "field dimensions must be at least 1x1, got {width}x{height}"
            ),
            Self::JaggedRows {
                row,
                expected,
                found,
            } => write!(f, "field row {row} has {found} cells, expected {expected}"),
        }
    }
}

impl Error for FieldError {}

/// Rectangular cell matrix, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "Vec<Vec<String>>")]
pub struct Field {
    rows: Vec<Vec<String>>,
}

impl Field {
    /// Creates a `width x height` field with every cell set to `fill`.
    pub fn new(width: usize, height: usize, fill: &str) -> Result<Self, FieldError> {
        ensure_dimensions(width, height)?;
        Ok(Self {
            rows: vec![vec![fill.to_string(); width]; height],
        })
    }

    /// Wraps existing rows after checking the rectangle invariant.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, FieldError> {
        let width = rows.first().map_or(0, Vec::len);
        ensure_dimensions(width, rows.len())?;
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != width)
        {
            return Err(FieldError::JaggedRows {
                row,
                expected: width,
                found: cells.len(),
            });
        }
        Ok(Self { rows })
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Writes `name` into one cell. The name is not checked against any
    /// dictionary.
    pub fn set_cell(&mut self, row: usize, col: usize, name: &str) -> Result<(), FieldError> {
        let (width, height) = (self.width(), self.height());
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(FieldError::OutOfBounds {
                row,
                col,
                width,
                height,
            })?;
        name.clone_into(cell);
        Ok(())
    }

    /// Sets every cell to `name`.
    pub fn fill_all(&mut self, name: &str) {
        for cell in self.rows.iter_mut().flatten() {
            name.clone_into(cell);
        }
    }

    /// Adjusts width and/or height; `None` keeps the current value.
    ///
    /// Columns are adjusted on existing rows first, then rows are added or
    /// dropped at the new width, so the matrix is rectangular on return no
    /// matter which dimensions changed. Returns whether anything changed.
    ///
    /// # Errors
    /// - `InvalidDimensions` for a zero target; the field is left as is.
    pub fn resize(
        &mut self,
        width: Option<usize>,
        height: Option<usize>,
        policy: GrowthPolicy,
        background: &str,
    ) -> Result<bool, FieldError> {
        let target_width = width.unwrap_or_else(|| self.width());
        let target_height = height.unwrap_or_else(|| self.height());
        ensure_dimensions(target_width, target_height)?;

        if target_width == self.width() && target_height == self.height() {
            return Ok(false);
        }

        for row in &mut self.rows {
            if row.len() > target_width {
                row.truncate(target_width);
            } else if row.len() < target_width {
                let fill = policy.column_fill(row, background);
                row.resize(target_width, fill);
            }
        }

        if self.rows.len() > target_height {
            self.rows.truncate(target_height);
        }
        while self.rows.len() < target_height {
            let row = policy.row_fill(&self.rows, target_width, background);
            self.rows.push(row);
        }

        Ok(true)
    }

    /// Concatenates each row's names with no delimiter; every row ends
    /// with `\n`.
    pub fn as_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            for cell in row {
                text.push_str(cell);
            }
            text.push('\n');
        }
        text
    }
}

impl TryFrom<Vec<Vec<String>>> for Field {
    type Error = FieldError;

    fn try_from(value: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        Self::from_rows(value)
    }
}

impl From<Field> for Vec<Vec<String>> {
    fn from(value: Field) -> Self {
        value.rows
    }
}

fn ensure_dimensions(width: usize, height: usize) -> Result<(), FieldError> {
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidDimensions { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Field, FieldError, GrowthPolicy};

    fn rows(field: &Field) -> Vec<Vec<&str>> {
        field
            .rows()
            .iter()
            .map(|row| row.iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn widening_fills_new_columns_with_background() {
        let mut field = Field::new(2, 2, "A").unwrap();
        assert!(field
            .resize(Some(3), None, GrowthPolicy::Background, "B")
            .unwrap());
        assert_eq!(rows(&field), vec![vec!["A", "A", "B"], vec!["A", "A", "B"]]);

        field.resize(None, Some(1), GrowthPolicy::Background, "B").unwrap();
        assert_eq!(rows(&field), vec![vec!["A", "A", "B"]]);
    }

    #[test]
    fn duplicate_first_row_policy_copies_existing_paint() {
        let mut field = Field::new(2, 2, "A").unwrap();
        field.set_cell(0, 1, "C").unwrap();
        field
            .resize(Some(3), Some(3), GrowthPolicy::DuplicateFirstRow, "B")
            .unwrap();
        assert_eq!(
            rows(&field),
            vec![
                vec!["A", "C", "A"],
                vec!["A", "A", "A"],
                vec!["A", "C", "A"],
            ]
        );
    }

    #[test]
    fn empty_policy_leaves_new_cells_unset() {
        let mut field = Field::new(1, 1, "A").unwrap();
        field
            .resize(Some(2), Some(2), GrowthPolicy::Empty, "B")
            .unwrap();
        assert_eq!(rows(&field), vec![vec!["A", ""], vec!["", ""]]);
    }

    #[test]
    fn growing_and_shrinking_together_keeps_rectangle() {
        let mut field = Field::new(4, 2, "A").unwrap();
        field
            .resize(Some(2), Some(5), GrowthPolicy::Background, "B")
            .unwrap();
        assert_eq!(field.width(), 2);
        assert_eq!(field.height(), 5);
        assert!(field.rows().iter().all(|row| row.len() == 2));
        assert_eq!(field.cell(4, 1), Some("B"));
    }

    #[test]
    fn shrink_is_lossy() {
        let mut field = Field::new(2, 1, "A").unwrap();
        field.set_cell(0, 1, "C").unwrap();
        field.resize(Some(1), None, GrowthPolicy::Background, "B").unwrap();
        field.resize(Some(2), None, GrowthPolicy::Background, "B").unwrap();
        assert_eq!(field.cell(0, 1), Some("B"));
    }

    #[test]
    fn zero_dimension_is_rejected_without_change() {
        let mut field = Field::new(2, 2, "A").unwrap();
        let err = field
            .resize(Some(0), None, GrowthPolicy::Background, "B")
            .unwrap_err();
        assert_eq!(err, FieldError::InvalidDimensions { width: 0, height: 2 });
        assert_eq!(field, Field::new(2, 2, "A").unwrap());
    }

    #[test]
    fn same_size_resize_reports_no_change() {
        let mut field = Field::new(2, 2, "A").unwrap();
        assert!(!field
            .resize(Some(2), Some(2), GrowthPolicy::Background, "B")
            .unwrap());
    }

    #[test]
    fn set_cell_rejects_out_of_bounds() {
        let mut field = Field::new(3, 2, "A").unwrap();
        let err = field.set_cell(2, 0, "B").unwrap_err();
        assert_eq!(
            err,
            FieldError::OutOfBounds {
                row: 2,
                col: 0,
                width: 3,
                height: 2
            }
        );
        assert!(field.set_cell(0, 3, "B").is_err());
        field.set_cell(1, 2, ":dangling:").unwrap();
        assert_eq!(field.cell(1, 2), Some(":dangling:"));
    }

    #[test]
    fn as_text_terminates_every_row() {
        let mut field = Field::new(2, 2, ":a:").unwrap();
        field.set_cell(1, 0, ":b:").unwrap();
        assert_eq!(field.as_text(), ":a::a:\n:b::a:\n");
    }

    #[test]
    fn fill_all_overwrites_every_cell() {
        let mut field = Field::new(3, 2, "A").unwrap();
        field.set_cell(1, 1, "C").unwrap();
        field.fill_all("B");
        assert!(field.rows().iter().flatten().all(|cell| cell == "B"));
    }

    #[test]
    fn from_rows_rejects_jagged_and_empty_input() {
        let jagged = vec![vec!["A".to_string(), "A".to_string()], vec!["A".to_string()]];
        assert_eq!(
            Field::from_rows(jagged).unwrap_err(),
            FieldError::JaggedRows {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert!(matches!(
            Field::from_rows(Vec::new()).unwrap_err(),
            FieldError::InvalidDimensions { .. }
        ));
    }
}
