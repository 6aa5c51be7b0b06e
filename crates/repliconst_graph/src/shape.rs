use std::fmt;

use crate::attr::TensorShapeProto;

/// Fully defined tensor shape.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct TensorShape {
    dims: Vec<i64>,
    num_elements: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    UnknownRank,
    NegativeDim { index: usize, size: i64 },
    TooManyDims(usize),
    Overflow,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRank => write!(f, "expected a shape of known rank"),
            Self::NegativeDim { index, size } => {
                write!(f, "expected a non-negative size for dimension {index}, got {size}")
            }
            Self::TooManyDims(rank) => write!(f, "shape has {rank} dimensions, at most {} allowed", TensorShape::MAX_DIMS),
            Self::Overflow => write!(f, "number of elements overflows i64"),
        }
    }
}

impl std::error::Error for ShapeError {}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;

        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{dim}")?;
        }

        write!(f, "]")
    }
}

impl TensorShape {
    pub const MAX_DIMS: usize = 254;

    pub fn build(proto: &TensorShapeProto) -> Result<Self, ShapeError> {
        if proto.unknown_rank {
            return Err(ShapeError::UnknownRank);
        }

        if proto.dim.len() > Self::MAX_DIMS {
            return Err(ShapeError::TooManyDims(proto.dim.len()));
        }

        let mut num_elements = 1i64;

        for (index, &size) in proto.dim.iter().enumerate() {
            if size < 0 {
                return Err(ShapeError::NegativeDim { index, size });
            }

            num_elements = num_elements.checked_mul(size).ok_or(ShapeError::Overflow)?;
        }

        Ok(Self { dims: proto.dim.clone(), num_elements })
    }

    /// Scalars hold a single element.
    pub fn num_elements(&self) -> i64 {
        self.num_elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_counts() -> Result<(), ShapeError> {
        assert_eq!(TensorShape::build(&TensorShapeProto::scalar())?.num_elements(), 1);
        assert_eq!(TensorShape::build(&TensorShapeProto::new([2, 3, 4]))?.num_elements(), 24);
        assert_eq!(TensorShape::build(&TensorShapeProto::new([7, 0, 4]))?.num_elements(), 0);
        Ok(())
    }

    #[test]
    fn malformed_shapes() {
        assert_eq!(TensorShape::build(&TensorShapeProto::unknown()), Err(ShapeError::UnknownRank));
        assert_eq!(
            TensorShape::build(&TensorShapeProto::new([4, -1])),
            Err(ShapeError::NegativeDim { index: 1, size: -1 })
        );
        assert_eq!(TensorShape::build(&TensorShapeProto::new([i64::MAX, 2])), Err(ShapeError::Overflow));
        assert_eq!(TensorShape::build(&TensorShapeProto::new(vec![1; 255])), Err(ShapeError::TooManyDims(255)));
    }

    #[test]
    fn display() -> Result<(), ShapeError> {
        assert_eq!(TensorShape::build(&TensorShapeProto::new([2, 8]))?.to_string(), "[2, 8]");
        Ok(())
    }
}
