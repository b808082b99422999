//! Tagged scalar values stored in the leaves of a document tree.
use crate::error::TreeError;
use std::fmt;

/// The kind tag of a [`Scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Long => "long",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// A leaf value. Equality compares the tag and the value, so `Integer(1)` and
/// `Long(1)` are different scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Null,
}

impl Scalar {
    pub fn kind(&self) -> ValueKind {
        match self {
            Scalar::String(_) => ValueKind::String,
            Scalar::Integer(_) => ValueKind::Integer,
            Scalar::Long(_) => ValueKind::Long,
            Scalar::Float(_) => ValueKind::Float,
            Scalar::Double(_) => ValueKind::Double,
            Scalar::Boolean(_) => ValueKind::Boolean,
            Scalar::Null => ValueKind::Null,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Scalar::Integer(_) | Scalar::Long(_) | Scalar::Float(_) | Scalar::Double(_)
        )
    }

    /// The numeric value widened to `f64`, or `None` for non-numeric kinds.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(f64::from(*i)),
            Scalar::Long(l) => Some(*l as f64),
            Scalar::Float(f) => Some(f64::from(*f)),
            Scalar::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Parses an integer token, preferring `Integer` and overflowing to `Long`.
    pub fn parse_integer(text: &str) -> Option<Scalar> {
        if let Ok(i) = text.parse::<i32>() {
            Some(Scalar::Integer(i))
        } else {
            text.parse::<i64>().ok().map(Scalar::Long)
        }
    }

    /// Tags a real number as `Float` when the shortest text of its `f32`
    /// narrowing reads back as the same `f64`, otherwise as `Double`.
    pub fn from_real(value: f64) -> Scalar {
        let narrowed = value as f32;
        if narrowed.is_finite() && narrowed.to_string().parse::<f64>() == Ok(value) {
            Scalar::Float(narrowed)
        } else {
            Scalar::Double(value)
        }
    }

    /// Converts this scalar to another kind.
    ///
    /// Conversion to the same kind is the identity. Numbers convert among
    /// themselves when the value fits the target exactly (integral and in range
    /// for `Integer`/`Long`, finite for `Float`). Every kind converts to
    /// `String` using its JSON text. Strings parse into the numeric kinds and
    /// into `Boolean` from `"true"`/`"false"`. Only `Null` converts to `Null`.
    pub fn convert(&self, to: ValueKind) -> Result<Scalar, TreeError> {
        let from = self.kind();
        if from == to {
            return Ok(self.clone());
        }
        let not_representable = || TreeError::NotRepresentable { from, to };

        let converted = match (self, to) {
            (Scalar::String(s), ValueKind::Integer) => s.parse::<i32>().ok().map(Scalar::Integer),
            (Scalar::String(s), ValueKind::Long) => s.parse::<i64>().ok().map(Scalar::Long),
            (Scalar::String(s), ValueKind::Float) => s
                .parse::<f32>()
                .ok()
                .filter(|f| f.is_finite())
                .map(Scalar::Float),
            (Scalar::String(s), ValueKind::Double) => s
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite())
                .map(Scalar::Double),
            (Scalar::String(s), ValueKind::Boolean) => match s.as_str() {
                "true" => Some(Scalar::Boolean(true)),
                "false" => Some(Scalar::Boolean(false)),
                _ => None,
            },
            (Scalar::Boolean(b), ValueKind::String) => Some(Scalar::String(b.to_string())),
            (Scalar::Null, ValueKind::String) => Some(Scalar::String("null".to_string())),
            (_, ValueKind::String) if self.is_numeric() => Some(Scalar::String(self.to_string())),

            (Scalar::Integer(i), ValueKind::Long) => Some(Scalar::Long(i64::from(*i))),
            (Scalar::Integer(i), ValueKind::Float) => Some(Scalar::Float(*i as f32)),
            (Scalar::Integer(i), ValueKind::Double) => Some(Scalar::Double(f64::from(*i))),
            (Scalar::Long(l), ValueKind::Integer) => i32::try_from(*l).ok().map(Scalar::Integer),
            (Scalar::Long(l), ValueKind::Float) => Some(Scalar::Float(*l as f32)),
            (Scalar::Long(l), ValueKind::Double) => Some(Scalar::Double(*l as f64)),
            // Through the shortest textual form, so 1.1f32 widens to 1.1 rather
            // than 1.100000023841858.
            (Scalar::Float(f), ValueKind::Double) => f.to_string().parse::<f64>().ok().map(Scalar::Double),
            (Scalar::Double(d), ValueKind::Float) => {
                let narrowed = *d as f32;
                narrowed.is_finite().then_some(Scalar::Float(narrowed))
            }
            (Scalar::Float(_) | Scalar::Double(_), ValueKind::Integer) => self
                .integral_value()
                .and_then(|v| i32::try_from(v).ok())
                .map(Scalar::Integer),
            (Scalar::Float(_) | Scalar::Double(_), ValueKind::Long) => {
                self.integral_value().map(Scalar::Long)
            }
            _ => None,
        };

        converted.ok_or_else(not_representable)
    }

    fn integral_value(&self) -> Option<i64> {
        let value = self.as_f64()?;
        if value.is_finite() && value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
            Some(value as i64)
        } else {
            None
        }
    }
}

/// Formats a real number as JSON text. Whole values keep a trailing `.0` so
/// they re-parse as reals; non-finite values have no JSON form and print as
/// `null`.
fn format_real<T: fmt::Display>(value: T, finite: bool) -> String {
    if !finite {
        return "null".to_string();
    }
    let mut text = value.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}

/// Writes the scalar's JSON text. Strings are written raw, without quotes or
/// escaping; use the tree serializers for JSON output.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Long(l) => write!(f, "{}", l),
            Scalar::Float(v) => f.write_str(&format_real(v, v.is_finite())),
            Scalar::Double(v) => f.write_str(&format_real(v, v.is_finite())),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Long(value)
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::Float(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Double(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

impl From<()> for Scalar {
    fn from(_: ()) -> Self {
        Scalar::Null
    }
}
