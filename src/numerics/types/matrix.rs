// src/numerics/types/matrix.rs
// Row-major 3x3 matrix used for rotation/scale bases and camera intrinsics.

use core::ops::Mul;
use serde::{Deserialize, Serialize};

use crate::numerics::types::traits::FloatingPoint;
use crate::numerics::types::vector::Vector3;

/// Row-major 3x3 matrix. `data[row][column]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3x3<T: FloatingPoint = f32> {
    pub data: [[T; 3]; 3],
}

impl<T: FloatingPoint> Matrix3x3<T> {
    /// Construct a new matrix from 3 rows
    pub fn from_rows(r0: [T; 3], r1: [T; 3], r2: [T; 3]) -> Self {
        Self { data: [r0, r1, r2] }
    }

    /// Construct a new matrix from 3 column vectors
    pub fn from_columns(c0: Vector3<T>, c1: Vector3<T>, c2: Vector3<T>) -> Self {
        Self {
            data: [
                [c0.x, c1.x, c2.x],
                [c0.y, c1.y, c2.y],
                [c0.z, c1.z, c2.z],
            ],
        }
    }

    /// Diagonal matrix, zero elsewhere
    pub fn from_diagonal(diagonal: Vector3<T>) -> Self {
        let zero = T::zero();
        Self::from_rows(
            [diagonal.x, zero, zero],
            [zero, diagonal.y, zero],
            [zero, zero, diagonal.z],
        )
    }

    /// Get a column by index
    pub fn column(&self, idx: usize) -> Vector3<T> {
        Vector3::new(self.data[0][idx], self.data[1][idx], self.data[2][idx])
    }

    /// Identity matrix
    pub fn identity() -> Self {
        Self::from_diagonal(Vector3::one())
    }

    pub fn transpose(&self) -> Self {
        Self::from_columns(
            Vector3::from(self.data[0]),
            Vector3::from(self.data[1]),
            Vector3::from(self.data[2]),
        )
    }
}

impl<T> Serialize for Matrix3x3<T>
where
    T: FloatingPoint + Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.data.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Matrix3x3<T>
where
    T: FloatingPoint + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let arr = <[[T; 3]; 3]>::deserialize(deserializer)?;
        Ok(Matrix3x3 { data: arr })
    }
}

impl<T: FloatingPoint> Mul<Vector3<T>> for Matrix3x3<T> {
    type Output = Vector3<T>;

    fn mul(self, rhs: Vector3<T>) -> Vector3<T> {
        Vector3 {
            x: self.data[0][0] * rhs.x + self.data[0][1] * rhs.y + self.data[0][2] * rhs.z,
            y: self.data[1][0] * rhs.x + self.data[1][1] * rhs.y + self.data[1][2] * rhs.z,
            z: self.data[2][0] * rhs.x + self.data[2][1] * rhs.y + self.data[2][2] * rhs.z,
        }
    }
}

impl<T: FloatingPoint> Mul<Matrix3x3<T>> for Matrix3x3<T> {
    type Output = Matrix3x3<T>;

    fn mul(self, rhs: Matrix3x3<T>) -> Matrix3x3<T> {
        let mut result = [[T::zero(); 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                result[i][j] =
                    self.data[i][0] * rhs.data[0][j] +
                        self.data[i][1] * rhs.data[1][j] +
                        self.data[i][2] * rhs.data[2][j];
            }
        }
        Matrix3x3 { data: result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m123() -> Matrix3x3<f32> {
        Matrix3x3::from_rows([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0])
    }

    #[test]
    fn test_matrix_json_roundtrip() {
        let m = m123();

        let encoded = serde_json::to_string(&m).unwrap();
        assert_eq!(encoded, "[[1.0,2.0,3.0],[4.0,5.0,6.0],[7.0,8.0,9.0]]");
        let decoded: Matrix3x3<f32> = serde_json::from_str(&encoded).unwrap();

        assert_eq!(m, decoded);
    }

    #[test]
    fn test_matrix_constructors_and_accessors() {
        let m = m123();

        assert_eq!(m.column(1), Vector3::new(2.0, 5.0, 8.0));
        assert_eq!(m.transpose().data[1], [2.0, 5.0, 8.0]);

        let by_columns = Matrix3x3::from_columns(
            Vector3::new(1.0f32, 4.0, 7.0),
            Vector3::new(2.0, 5.0, 8.0),
            Vector3::new(3.0, 6.0, 9.0),
        );
        assert_eq!(by_columns, m);

        let id = Matrix3x3::<f32>::identity();
        assert_eq!(id.data, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(Matrix3x3::from_diagonal(Vector3::new(2.0f32, 3.0, 4.0)).data[2], [0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_matrix_vector_mul() {
        let v = Vector3::new(1.0f32, 1.0f32, 1.0f32);
        assert_eq!(m123() * v, Vector3::new(6.0, 15.0, 24.0));
    }

    #[test]
    fn test_matrix_matrix_mul() {
        let a = m123();
        let b = Matrix3x3::from_rows([9.0f32, 8.0, 7.0], [6.0, 5.0, 4.0], [3.0, 2.0, 1.0]);

        let c = a * b;

        assert_eq!(c.data[0], [30.0, 24.0, 18.0]);
        assert_eq!(c.data[1], [84.0, 69.0, 54.0]);
        assert_eq!(c.data[2], [138.0, 114.0, 90.0]);
        assert_eq!(a * Matrix3x3::identity(), a);
    }
}
