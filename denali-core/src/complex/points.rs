//! Dense point storage for neighbour search.

use crate::error::ArgumentError;

/// A validated `n × d` point cloud stored row-major.
///
/// Every point has the same positive dimension and only finite coordinates.
///
/// # Examples
/// ```
/// use denali_core::PointCloud;
///
/// let cloud = PointCloud::from_rows(&[vec![0.0, 1.0], vec![2.0, 3.0]])?;
/// assert_eq!(cloud.len(), 2);
/// assert_eq!(cloud.dimension(), 2);
/// assert_eq!(cloud.point(1), &[2.0, 3.0]);
/// # Ok::<(), denali_core::ArgumentError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    coords: Vec<f64>,
    dimension: usize,
}

impl PointCloud {
    /// Validates `rows` and copies them into a contiguous buffer.
    ///
    /// # Errors
    /// Returns [`ArgumentError::EmptyPointCloud`] for no rows,
    /// [`ArgumentError::ZeroDimension`] when rows are empty,
    /// [`ArgumentError::RaggedPoints`] when lengths differ and
    /// [`ArgumentError::NonFiniteCoordinate`] for NaN or infinite values.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ArgumentError> {
        let first = rows.first().ok_or(ArgumentError::EmptyPointCloud)?;
        let dimension = first.as_ref().len();
        if dimension == 0 {
            return Err(ArgumentError::ZeroDimension);
        }

        let mut coords = Vec::with_capacity(rows.len() * dimension);
        for (row, point) in rows.iter().enumerate() {
            let point = point.as_ref();
            if point.len() != dimension {
                return Err(ArgumentError::RaggedPoints {
                    row,
                    expected: dimension,
                    found: point.len(),
                });
            }
            if let Some(column) = point.iter().position(|value| !value.is_finite()) {
                return Err(ArgumentError::NonFiniteCoordinate { row, column });
            }
            coords.extend_from_slice(point);
        }
        Ok(Self { coords, dimension })
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    /// Always `false`; construction rejects empty clouds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates per point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Coordinates of point `index`.
    ///
    /// # Panics
    /// Panics when `index >= self.len()`.
    #[must_use]
    pub fn point(&self, index: usize) -> &[f64] {
        let start = index * self.dimension;
        &self.coords[start..start + self.dimension]
    }

    pub(crate) fn squared_distance(&self, left: usize, right: usize) -> f64 {
        squared_distance(self.point(left), self.point(right))
    }
}

pub(crate) fn squared_distance(left: &[f64], right: &[f64]) -> f64 {
    left.iter()
        .zip(right)
        .map(|(a, b)| {
            let diff = a - b;
            diff * diff
        })
        .sum()
}
