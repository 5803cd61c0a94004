//! Nested-array serde representation: `[[1.0, 2.0], [3.0, 4.0]]`.

use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::traits::Scalar;

use super::Matrix;

impl<T: Scalar + Serialize> Serialize for Matrix<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for i in 0..self.rows {
            seq.serialize_element(self.row_slice(i))?;
        }
        seq.end()
    }
}

impl<'de, T: Scalar + Deserialize<'de>> Deserialize<'de> for Matrix<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows: Vec<Vec<T>> = Vec::deserialize(deserializer)?;
        if rows.is_empty() {
            return Ok(Matrix::new(0, 0));
        }
        let cols = rows[0].len();
        if rows.iter().any(|r| r.len() != cols) {
            return Err(D::Error::custom("rows of a matrix must all have the same length"));
        }
        let n = rows.len();
        Ok(Matrix {
            data: rows.into_iter().flatten().collect(),
            rows: n,
            cols,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_array_json() {
        let m = Matrix::from_2d(&[[1.5, 2.0], [3.0, 4.0]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[1.5,2.0],[3.0,4.0]]");
        let back: Matrix<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn ragged_rejected() {
        let r: Result<Matrix<i32>, _> = serde_json::from_str("[[1,2],[3]]");
        assert!(r.is_err());
        let empty: Matrix<i32> = serde_json::from_str("[]").unwrap();
        assert!(empty.is_empty());
    }
}
