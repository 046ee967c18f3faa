//! Delimited Numeric Tables

use crate::StoreError;
use ndarray::{Array1, Array2};
use std::path::{Path, PathBuf};

/// Dense row-major table parsed from a weight file
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    source: PathBuf,
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

fn is_delimiter(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

impl NumericTable {
    /// Read and parse a table from disk
    pub fn read(path: &Path) -> Result<Self, StoreError> {
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parse delimited text
    ///
    /// Cells may be separated by commas, semicolons or whitespace. Lines
    /// before the first fully numeric line are treated as headers.
    pub fn parse(text: &str, source: &Path) -> Result<Self, StoreError> {
        let mut data = Vec::new();
        let mut cols = 0;
        let mut rows = 0;

        for (idx, line) in text.lines().enumerate() {
            let tokens: Vec<&str> = line.split(is_delimiter).filter(|t| !t.is_empty()).collect();
            if tokens.is_empty() {
                continue;
            }

            let parsed: Result<Vec<f64>, &str> = tokens
                .iter()
                .map(|t| t.parse::<f64>().map_err(|_| *t))
                .collect();

            let values = match parsed {
                Ok(values) => values,
                Err(_) if rows == 0 => continue,
                Err(token) => {
                    return Err(StoreError::Parse {
                        path: source.to_path_buf(),
                        line: idx + 1,
                        token: token.to_string(),
                    })
                }
            };

            if rows == 0 {
                cols = values.len();
            } else if values.len() != cols {
                return Err(StoreError::RaggedTable {
                    path: source.to_path_buf(),
                    line: idx + 1,
                    expected: cols,
                    actual: values.len(),
                });
            }
            data.extend(values);
            rows += 1;
        }

        if rows == 0 {
            return Err(StoreError::EmptyTable {
                path: source.to_path_buf(),
            });
        }

        Ok(Self {
            source: source.to_path_buf(),
            rows,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Values of one row
    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.cols..(index + 1) * self.cols]
    }

    /// Convert into a `rows x cols` matrix
    pub fn into_matrix(self) -> Result<Array2<f64>, StoreError> {
        let (rows, cols) = (self.rows, self.cols);
        let what = self.source.display().to_string();
        Array2::from_shape_vec((rows, cols), self.data).map_err(|e| {
            StoreError::ShapeMismatch {
                what,
                expected: format!("{}x{}", rows, cols),
                actual: e.to_string(),
            }
        })
    }

    /// Convert a single row or single column into a vector
    pub fn into_vector(self) -> Result<Array1<f64>, StoreError> {
        if self.rows == 1 || self.cols == 1 {
            Ok(Array1::from_vec(self.data))
        } else {
            Err(StoreError::ShapeMismatch {
                what: self.source.display().to_string(),
                expected: "a single row or column".to_string(),
                actual: format!("{}x{}", self.rows, self.cols),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<NumericTable, StoreError> {
        NumericTable::parse(text, Path::new("test.txt"))
    }

    #[test]
    fn test_whitespace_matrix() {
        let table = parse("1.0   2.0  3.0\n4.0\t5.0 6.0\n").unwrap();
        assert_eq!((table.rows(), table.cols()), (2, 3));
        assert_eq!(table.row(1), &[4.0, 5.0, 6.0]);
        assert_eq!(table.source(), Path::new("test.txt"));
        let m = table.into_matrix().unwrap();
        assert_eq!(m[[0, 2]], 3.0);
    }

    #[test]
    fn test_csv_column_vector() {
        let v = parse("0.5\n-1.25\n3e-2\n").unwrap().into_vector().unwrap();
        assert_eq!(v.to_vec(), vec![0.5, -1.25, 0.03]);
    }

    #[test]
    fn test_header_row_skipped() {
        let table = parse("lat lon dec_year\n35, 18, 2014.27\n").unwrap();
        assert_eq!(table.rows(), 1);
        assert_eq!(table.row(0), &[35.0, 18.0, 2014.27]);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let table = parse("\n1 2\n\n3 4\n\n").unwrap();
        assert_eq!(table.rows(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        match parse("1 2 3\n4 5\n") {
            Err(StoreError::RaggedTable { line, expected, actual, .. }) => {
                assert_eq!((line, expected, actual), (2, 3, 2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_after_data_rejected() {
        match parse("1 2\n3 x\n") {
            Err(StoreError::Parse { line, token, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(parse("only a header\n"), Err(StoreError::EmptyTable { .. })));
        assert!(matches!(parse(""), Err(StoreError::EmptyTable { .. })));
    }

    #[test]
    fn test_matrix_is_not_a_vector() {
        let table = parse("1 2\n3 4\n").unwrap();
        assert!(matches!(table.into_vector(), Err(StoreError::ShapeMismatch { .. })));
    }
}
