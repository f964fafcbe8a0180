//! The [`Reflect`] trait: a value that knows how to write itself into a
//! document node and read itself back.
//!
//! `Reflect` is object safe so a [`PropertyMap`](crate::property_map::PropertyMap)
//! can walk heterogeneous fields (`i32`, `String`, nested aggregates) through
//! `&dyn Reflect` without knowing their concrete types.

use serde::Deserialize;

use crate::document::{self, Node};
use crate::ReflectError;

/// A value that can be written to and read from a document node.
pub trait Reflect {
    /// Write the value into `node`, replacing whatever a scalar node held.
    ///
    /// Aggregates turn `node` into an object and add one key per field.
    fn serialize_to(&self, node: &mut Node);

    /// Read the value from `node`.
    ///
    /// Aggregates leave fields whose keys are missing untouched. A node of the
    /// wrong kind is a [`ReflectError::Malformed`] error.
    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError>;

    /// Serialize into a fresh node.
    fn to_node(&self) -> Node {
        let mut node = Node::Null;
        self.serialize_to(&mut node);
        node
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Largest magnitude below which every integral `f64` is exact.
const MAX_EXACT_INTEGRAL_F64: f64 = 9_007_199_254_740_992.0;

/// Text forms of non-finite floats. JSON has no literal for them.
const NAN_TEXT: &str = "NaN";
const INFINITY_TEXT: &str = "inf";
const NEG_INFINITY_TEXT: &str = "-inf";

fn read_scalar<T>(node: &Node, type_name: &str) -> Result<T, ReflectError>
where
    T: for<'de> Deserialize<'de>,
{
    T::deserialize(node).map_err(|e| {
        ReflectError::malformed(format!(
            "expected {type_name}, found {}: {e}",
            document::kind_of(node)
        ))
    })
}

/// Read an integer, also accepting floats with no fractional part (`10.0`).
fn read_integer<T>(node: &Node, type_name: &str) -> Result<T, ReflectError>
where
    T: for<'de> Deserialize<'de>,
{
    if let Some(value) = node.as_f64().filter(|_| node.is_f64()) {
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGRAL_F64 {
            let integral = if value < 0.0 {
                Node::from(value as i64)
            } else {
                Node::from(value as u64)
            };
            return read_scalar(&integral, type_name);
        }
    }
    read_scalar(node, type_name)
}

macro_rules! impl_reflect_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn serialize_to(&self, node: &mut Node) {
                    *node = Node::from(*self);
                }

                fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
                    *self = read_integer(node, stringify!($ty))?;
                    Ok(())
                }
            }
        )*
    };
}

impl_reflect_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Finite floats are JSON numbers; `NaN` and the infinities are written as
/// the strings `"NaN"`, `"inf"` and `"-inf"` and read back from them.
macro_rules! impl_reflect_float {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn serialize_to(&self, node: &mut Node) {
                    *node = if self.is_nan() {
                        Node::from(NAN_TEXT)
                    } else if *self == $ty::INFINITY {
                        Node::from(INFINITY_TEXT)
                    } else if *self == $ty::NEG_INFINITY {
                        Node::from(NEG_INFINITY_TEXT)
                    } else {
                        Node::from(*self)
                    };
                }

                fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
                    *self = match node.as_str() {
                        Some(NAN_TEXT) => $ty::NAN,
                        Some(INFINITY_TEXT) => $ty::INFINITY,
                        Some(NEG_INFINITY_TEXT) => $ty::NEG_INFINITY,
                        _ => read_scalar(node, stringify!($ty))?,
                    };
                    Ok(())
                }
            }
        )*
    };
}

impl_reflect_float!(f32, f64);

impl Reflect for bool {
    fn serialize_to(&self, node: &mut Node) {
        *node = Node::Bool(*self);
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        *self = read_scalar(node, "bool")?;
        Ok(())
    }
}

impl Reflect for String {
    fn serialize_to(&self, node: &mut Node) {
        *node = Node::String(self.clone());
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        let text = document::expect_str(node)?;
        self.clear();
        self.push_str(text);
        Ok(())
    }
}

/// Raw document nodes pass through unchanged.
impl Reflect for Node {
    fn serialize_to(&self, node: &mut Node) {
        *node = self.clone();
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        *self = node.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Containers
// ---------------------------------------------------------------------------

/// `None` is written as `null`. Reading a non-null node into `None` starts
/// from `T::default()`.
impl<T: Reflect + Default> Reflect for Option<T> {
    fn serialize_to(&self, node: &mut Node) {
        match self {
            Some(value) => value.serialize_to(node),
            None => *node = Node::Null,
        }
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        if node.is_null() {
            *self = None;
            return Ok(());
        }
        match self {
            Some(value) => value.deserialize_from(node),
            None => {
                let mut value = T::default();
                value.deserialize_from(node)?;
                *self = Some(value);
                Ok(())
            }
        }
    }
}

/// Arrays are rebuilt on read: every element starts from `T::default()`, so
/// missing keys inside an element fall back to the element type's defaults.
impl<T: Reflect + Default> Reflect for Vec<T> {
    fn serialize_to(&self, node: &mut Node) {
        *node = Node::Array(self.iter().map(Reflect::to_node).collect());
    }

    fn deserialize_from(&mut self, node: &Node) -> Result<(), ReflectError> {
        let items = document::expect_array(node)?;
        let mut values = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let mut value = T::default();
            value
                .deserialize_from(item)
                .map_err(|e| e.within(&format!("[{i}]")))?;
            values.push(value);
        }
        *self = values;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_reads_accept_in_range_numbers() {
        let mut life = 0i32;
        life.deserialize_from(&json!(999999)).unwrap();
        assert_eq!(life, 999999);
    }

    #[test]
    fn integer_out_of_range_is_malformed() {
        let mut small = 0u8;
        let err = small.deserialize_from(&json!(300)).unwrap_err();
        assert!(matches!(err, ReflectError::Malformed { .. }));
        assert_eq!(small, 0);
    }

    #[test]
    fn float_accepts_integer_nodes() {
        let mut rot = 0.0f32;
        rot.deserialize_from(&json!(2)).unwrap();
        assert_eq!(rot, 2.0);
    }

    #[test]
    fn wrong_kind_names_expected_and_found() {
        let mut dead = false;
        let err = dead.deserialize_from(&json!("yes")).unwrap_err();
        match err {
            ReflectError::Malformed { details, .. } => {
                assert!(details.starts_with("expected bool, found string"), "{details}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn string_round_trip() {
        let name = String::from("Billy Jean");
        let node = name.to_node();
        assert_eq!(node, json!("Billy Jean"));

        let mut read = String::from("someone else");
        read.deserialize_from(&node).unwrap();
        assert_eq!(read, "Billy Jean");
    }

    #[test]
    fn option_maps_null_to_none() {
        let mut target: Option<u32> = Some(7);
        target.deserialize_from(&Node::Null).unwrap();
        assert_eq!(target, None);

        target.deserialize_from(&json!(3)).unwrap();
        assert_eq!(target, Some(3));
        assert_eq!(None::<u32>.to_node(), Node::Null);
    }

    #[test]
    fn vec_errors_carry_the_element_index() {
        let mut values: Vec<i32> = Vec::new();
        let err = values.deserialize_from(&json!([1, 2, "three"])).unwrap_err();
        assert_eq!(err.path(), Some("[2]"));
        assert!(values.is_empty());
    }

    #[test]
    fn vec_replaces_previous_contents() {
        let mut values = vec![9, 9, 9, 9];
        values.deserialize_from(&json!([1, 2])).unwrap();
        assert_eq!(values, vec![1, 2]);
        assert_eq!(values.to_node(), json!([1, 2]));
    }

    #[test]
    fn integer_accepts_integral_floats() {
        let mut life = 0i32;
        life.deserialize_from(&json!(10.0)).unwrap();
        assert_eq!(life, 10);

        let mut depth = 0i64;
        depth.deserialize_from(&json!(-3.0)).unwrap();
        assert_eq!(depth, -3);
    }

    #[test]
    fn integer_rejects_fractional_and_out_of_range_floats() {
        let mut life = 7i32;
        assert!(life.deserialize_from(&json!(10.5)).is_err());
        assert!(life.deserialize_from(&json!(1e12)).is_err());
        assert!(life.deserialize_from(&json!(1e300)).is_err());

        let mut count = 7u32;
        assert!(count.deserialize_from(&json!(-1.0)).is_err());
        assert_eq!((life, count), (7, 7));
    }

    #[test]
    fn non_finite_floats_are_written_as_text_and_read_back() {
        assert_eq!(f32::INFINITY.to_node(), json!("inf"));
        assert_eq!(f64::NEG_INFINITY.to_node(), json!("-inf"));
        assert_eq!(f32::NAN.to_node(), json!("NaN"));

        let mut rot = 0.0f32;
        rot.deserialize_from(&json!("inf")).unwrap();
        assert_eq!(rot, f32::INFINITY);
        rot.deserialize_from(&json!("-inf")).unwrap();
        assert_eq!(rot, f32::NEG_INFINITY);
        rot.deserialize_from(&json!("NaN")).unwrap();
        assert!(rot.is_nan());

        assert!(rot.deserialize_from(&json!("fast")).is_err());
        assert!(rot.deserialize_from(&Node::Null).is_err());
    }

    #[test]
    fn raw_nodes_pass_through_unchanged() {
        let extra = json!({ "tags": ["boss", 3, null], "meta": { "v": 1.5 } });
        assert_eq!(extra.to_node(), extra);

        let mut read = json!("replaced");
        read.deserialize_from(&extra).unwrap();
        assert_eq!(read, extra);
    }
}
