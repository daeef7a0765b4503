//! # Scan Targets
//!
//! A scan target is the destination a decode plan writes into. There are two
//! kinds:
//!
//! - `ScanTarget`: a single cell. It reports its `TargetShape` so the registry
//!   can pick a plan that produces something the cell can hold.
//! - `CompositeIndexScanner`: a destination addressed by field index. Record
//!   plans ask it for the cell of field `i` and may be told there is none, in
//!   which case the field is skipped.
//!
//! ## Provided Cells
//!
//! | Type | Shape | NULL |
//! |------|-------|------|
//! | `Value` | `Value` | `Value::Null` |
//! | `Option<T: FromValue>` | `T::SHAPE` | `None` |
//! | `ValueRow` | `Composite` | row marked null |
//! | `CompositeTarget` | `Composite` | forwarded to the wrapped scanner |
//!
//! ## Implementing a Typed Row
//!
//! ```ignore
//! struct Person {
//!     name: Option<String>,
//!     age: Option<i32>,
//! }
//!
//! impl CompositeIndexScanner for Person {
//!     fn scan_null(&mut self) -> Result<()> {
//!         eyre::bail!("person cannot be null")
//!     }
//!
//!     fn scan_index(&mut self, index: usize) -> Option<&mut dyn ScanTarget> {
//!         match index {
//!             0 => Some(&mut self.name),
//!             1 => Some(&mut self.age),
//!             _ => None,
//!         }
//!     }
//! }
//! ```
//!
//! A row type used as a field of another row implements `ScanTarget` with
//! shape `Composite` and returns itself from `as_composite()`.

use eyre::{bail, eyre, Result};

use crate::types::{TargetShape, Value};

/// A single destination cell.
pub trait ScanTarget {
    fn shape(&self) -> TargetShape;

    fn scan_null(&mut self) -> Result<()>;

    fn scan_value(&mut self, value: Value) -> Result<()>;

    /// Index-addressed access for composite-shaped cells.
    fn as_composite(&mut self) -> Option<&mut dyn CompositeIndexScanner> {
        None
    }
}

/// A destination whose fields are addressed by position.
pub trait CompositeIndexScanner {
    /// Marks the whole composite as SQL NULL.
    fn scan_null(&mut self) -> Result<()>;

    /// Called once per non-null record, before any field is scanned.
    /// `field_count` is the count the record declares.
    fn begin(&mut self, _field_count: u32) -> Result<()> {
        Ok(())
    }

    /// Returns the cell for field `index`, or `None` to skip the field.
    fn scan_index(&mut self, index: usize) -> Option<&mut dyn ScanTarget>;
}

impl ScanTarget for Value {
    fn shape(&self) -> TargetShape {
        TargetShape::Value
    }

    fn scan_null(&mut self) -> Result<()> {
        *self = Value::Null;
        Ok(())
    }

    fn scan_value(&mut self, value: Value) -> Result<()> {
        *self = value;
        Ok(())
    }
}

/// Conversion from a decoded `Value` into a concrete Rust type.
pub trait FromValue: Sized {
    const SHAPE: TargetShape;
    const NAME: &'static str;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch(value: &Value, target: &'static str) -> eyre::Report {
    eyre!("cannot scan {} value into {}", value.type_name(), target)
}

macro_rules! int_from_value {
    ($($ty:ty),*) => {
        $(
            impl FromValue for $ty {
                const SHAPE: TargetShape = TargetShape::Int;
                const NAME: &'static str = stringify!($ty);

                fn from_value(value: Value) -> Result<Self> {
                    let wide = value.as_i64().ok_or_else(|| mismatch(&value, Self::NAME))?;
                    <$ty>::try_from(wide)
                        .map_err(|_| eyre!("value {} out of range for {}", wide, Self::NAME))
                }
            }
        )*
    };
}

int_from_value!(i16, i32, i64);

impl FromValue for f32 {
    const SHAPE: TargetShape = TargetShape::Float;
    const NAME: &'static str = "f32";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Float4(v) => Ok(v),
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl FromValue for f64 {
    const SHAPE: TargetShape = TargetShape::Float;
    const NAME: &'static str = "f64";

    fn from_value(value: Value) -> Result<Self> {
        value.as_f64().ok_or_else(|| mismatch(&value, Self::NAME))
    }
}

impl FromValue for bool {
    const SHAPE: TargetShape = TargetShape::Bool;
    const NAME: &'static str = "bool";

    fn from_value(value: Value) -> Result<Self> {
        value.as_bool().ok_or_else(|| mismatch(&value, Self::NAME))
    }
}

impl FromValue for String {
    const SHAPE: TargetShape = TargetShape::Text;
    const NAME: &'static str = "String";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl FromValue for Vec<u8> {
    const SHAPE: TargetShape = TargetShape::Bytes;
    const NAME: &'static str = "Vec<u8>";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytea(b) => Ok(b),
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl FromValue for [u8; 16] {
    const SHAPE: TargetShape = TargetShape::Uuid;
    const NAME: &'static str = "[u8; 16]";

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(u) => Ok(u),
            other => Err(mismatch(&other, Self::NAME)),
        }
    }
}

impl<T: FromValue> ScanTarget for Option<T> {
    fn shape(&self) -> TargetShape {
        T::SHAPE
    }

    fn scan_null(&mut self) -> Result<()> {
        *self = None;
        Ok(())
    }

    fn scan_value(&mut self, value: Value) -> Result<()> {
        *self = match value {
            Value::Null => None,
            value => Some(T::from_value(value)?),
        };
        Ok(())
    }
}

/// A nullable row of generic values filled by field index.
///
/// Each scan starts from an empty row, so a reused row holds exactly the
/// fields of the last record. Indexes beyond the current length are padded
/// with `Value::Null` as the row grows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRow {
    fields: Option<Vec<Value>>,
}

impl ValueRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the row was scanned from a NULL record or never scanned.
    pub fn is_null(&self) -> bool {
        self.fields.is_none()
    }

    pub fn fields(&self) -> Option<&[Value]> {
        self.fields.as_deref()
    }

    pub fn into_fields(self) -> Option<Vec<Value>> {
        self.fields
    }
}

impl CompositeIndexScanner for ValueRow {
    fn scan_null(&mut self) -> Result<()> {
        self.fields = None;
        Ok(())
    }

    fn begin(&mut self, _field_count: u32) -> Result<()> {
        let fields = self.fields.get_or_insert_with(Vec::new);
        fields.clear();
        Ok(())
    }

    fn scan_index(&mut self, index: usize) -> Option<&mut dyn ScanTarget> {
        let fields = self.fields.get_or_insert_with(Vec::new);
        if fields.len() <= index {
            fields.resize(index + 1, Value::Null);
        }
        Some(&mut fields[index])
    }
}

impl ScanTarget for ValueRow {
    fn shape(&self) -> TargetShape {
        TargetShape::Composite
    }

    fn scan_null(&mut self) -> Result<()> {
        self.fields = None;
        Ok(())
    }

    fn scan_value(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Null => self.fields = None,
            Value::Record(fields) => self.fields = Some(fields),
            other => bail!("cannot scan {} value into a row", other.type_name()),
        }
        Ok(())
    }

    fn as_composite(&mut self) -> Option<&mut dyn CompositeIndexScanner> {
        Some(self)
    }
}

/// Presents any `CompositeIndexScanner` as a composite-shaped cell.
pub struct CompositeTarget<'s>(pub &'s mut dyn CompositeIndexScanner);

impl ScanTarget for CompositeTarget<'_> {
    fn shape(&self) -> TargetShape {
        TargetShape::Composite
    }

    fn scan_null(&mut self) -> Result<()> {
        self.0.scan_null()
    }

    fn scan_value(&mut self, value: Value) -> Result<()> {
        bail!(
            "cannot scan {} value into an index-addressed composite",
            value.type_name()
        )
    }

    fn as_composite(&mut self) -> Option<&mut dyn CompositeIndexScanner> {
        Some(&mut *self.0)
    }
}
