use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[default]
    #[serde(rename = "DT_FLOAT")]
    Float,
    #[serde(rename = "DT_DOUBLE")]
    Double,
    #[serde(rename = "DT_INT32")]
    Int32,
    #[serde(rename = "DT_INT64")]
    Int64,
    #[serde(rename = "DT_BOOL")]
    Bool,
    #[serde(rename = "DT_STRING")]
    String,
}

/// Shape as it is stored on the wire. Sizes of `-1` mark unknown dimensions,
/// which are only valid for partially known shapes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorShapeProto {
    #[serde(default)]
    pub dim: Vec<i64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unknown_rank: bool,
}

impl TensorShapeProto {
    pub fn new(dim: impl Into<Vec<i64>>) -> Self {
        Self { dim: dim.into(), unknown_rank: false }
    }

    pub fn scalar() -> Self {
        Self::default()
    }

    pub fn unknown() -> Self {
        Self { dim: Vec::new(), unknown_rank: true }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TensorProto {
    pub dtype: DataType,
    #[serde(default)]
    pub tensor_shape: TensorShapeProto,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub float_val: Vec<f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub int_val: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub string_val: Vec<String>,
}

impl TensorProto {
    pub fn f32(dims: impl Into<Vec<i64>>, values: impl Into<Vec<f32>>) -> Self {
        Self {
            dtype: DataType::Float,
            tensor_shape: TensorShapeProto::new(dims),
            float_val: values.into(),
            ..Default::default()
        }
    }

    pub fn i64(dims: impl Into<Vec<i64>>, values: impl Into<Vec<i64>>) -> Self {
        Self {
            dtype: DataType::Int64,
            tensor_shape: TensorShapeProto::new(dims),
            int_val: values.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrValue {
    Tensor(TensorProto),
    S(String),
    I(i64),
    F(f32),
    B(bool),
    Type(DataType),
    Shape(TensorShapeProto),
}

impl AttrValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Tensor(_) => "tensor",
            Self::S(_) => "string",
            Self::I(_) => "int",
            Self::F(_) => "float",
            Self::B(_) => "bool",
            Self::Type(_) => "type",
            Self::Shape(_) => "shape",
        }
    }

    pub fn as_tensor(&self) -> Option<&TensorProto> {
        match self {
            Self::Tensor(tensor) => Some(tensor),
            _ => None,
        }
    }
}

impl From<TensorProto> for AttrValue {
    fn from(value: TensorProto) -> Self {
        Self::Tensor(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tensor(t) => write!(f, "tensor<{:?}{:?}>", t.dtype, t.tensor_shape.dim),
            Self::S(s) => write!(f, "{s:?}"),
            Self::I(i) => write!(f, "{i}"),
            Self::F(x) => write!(f, "{x}"),
            Self::B(b) => write!(f, "{b}"),
            Self::Type(ty) => write!(f, "{ty:?}"),
            Self::Shape(shape) if shape.unknown_rank => write!(f, "shape<?>"),
            Self::Shape(shape) => write!(f, "shape{:?}", shape.dim),
        }
    }
}
