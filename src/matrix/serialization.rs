use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::matrix::construction::MatrixLoader;
use crate::matrix::model::Matrix;

/// Canonical bracketed text form, e.g. `{ { 0 1 } { -1 0 } }`.
///
/// The output parses back to an identical matrix.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for row in self.rows() {
            f.write_str("{ ")?;
            for value in row {
                write!(f, "{value} ")?;
            }
            f.write_str("} ")?;
        }
        f.write_str("}")
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

impl<'de> Deserialize<'de> for Matrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<i32>>::deserialize(deserializer)?;
        MatrixLoader::from_rows(rows).map_err(|err| D::Error::custom(format!("{err:#}")))
    }
}
