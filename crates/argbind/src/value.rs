//! Value kinds, tagged values and typed bindings.
//!
//! Every registered argument owns one [`Value`] cell. The registry and the
//! caller share that cell through a [`Binding`], so a value the caller
//! supplied at registration time and a value the registry created itself are
//! the same thing from the parser's point of view.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// The element types a value can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    Float,
    Str,
}

impl ScalarKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "string",
        }
    }

    pub fn zero(self) -> Scalar {
        match self {
            Self::Bool => Scalar::Bool(false),
            Self::Int => Scalar::Int(0),
            Self::Float => Scalar::Float(0.0),
            Self::Str => Scalar::Str(String::new()),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "string" => Some(Self::Str),
            _ => None,
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The shape of a value slot.
///
/// The textual form (`int`, `pair<int>`, `list<string>`, `list<pair<int>>`,
/// `map<string>`) is what declarations use and what error messages print.
/// Pair keys and map keys are always strings.
///
/// ```
/// use argbind::{ScalarKind, ValueKind};
///
/// let kind: ValueKind = "map<int>".parse().unwrap();
/// assert_eq!(kind, ValueKind::Map(ScalarKind::Int));
/// assert_eq!(kind.to_string(), "map<int>");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueKind {
    Scalar(ScalarKind),
    Pair(ScalarKind),
    List(ScalarKind),
    PairList(ScalarKind),
    Map(ScalarKind),
}

impl ValueKind {
    pub const BOOL: Self = Self::Scalar(ScalarKind::Bool);
    pub const INT: Self = Self::Scalar(ScalarKind::Int);
    pub const FLOAT: Self = Self::Scalar(ScalarKind::Float);
    pub const STRING: Self = Self::Scalar(ScalarKind::Str);

    /// Containers take one element per hit and never stop accepting.
    pub fn is_container(self) -> bool {
        matches!(self, Self::List(_) | Self::PairList(_) | Self::Map(_))
    }

    /// Kinds whose raw text is split on a delimiter.
    pub fn splits(self) -> bool {
        matches!(self, Self::Pair(_) | Self::PairList(_) | Self::Map(_))
    }

    /// Flags can only count or toggle.
    pub fn is_flag_kind(self) -> bool {
        matches!(self, Self::Scalar(ScalarKind::Bool) | Self::Scalar(ScalarKind::Int))
    }

    pub fn zero(self) -> Value {
        match self {
            Self::Scalar(k) => Value::Scalar(k.zero()),
            Self::Pair(k) => Value::Pair(String::new(), k.zero()),
            Self::List(_) => Value::List(Vec::new()),
            Self::PairList(_) => Value::PairList(Vec::new()),
            Self::Map(_) => Value::Map(BTreeMap::new()),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(k) => write!(f, "{k}"),
            Self::Pair(k) => write!(f, "pair<{k}>"),
            Self::List(k) => write!(f, "list<{k}>"),
            Self::PairList(k) => write!(f, "list<pair<{k}>>"),
            Self::Map(k) => write!(f, "map<{k}>"),
        }
    }
}

impl FromStr for ValueKind {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let unknown = || SetupError::UnknownKind(s.to_string());

        fn inner<'a>(text: &'a str, outer: &str) -> Option<&'a str> {
            text.strip_prefix(outer)?.strip_prefix('<')?.strip_suffix('>')
        }

        if let Some(k) = ScalarKind::from_name(text) {
            return Ok(Self::Scalar(k));
        }
        if let Some(rest) = inner(text, "pair") {
            return ScalarKind::from_name(rest).map(Self::Pair).ok_or_else(unknown);
        }
        if let Some(rest) = inner(text, "map") {
            return ScalarKind::from_name(rest).map(Self::Map).ok_or_else(unknown);
        }
        if let Some(rest) = inner(text, "list") {
            if let Some(k) = ScalarKind::from_name(rest) {
                return Ok(Self::List(k));
            }
            if let Some(pair) = inner(rest, "pair") {
                return ScalarKind::from_name(pair)
                    .map(Self::PairList)
                    .ok_or_else(unknown);
            }
        }
        Err(unknown())
    }
}

impl TryFrom<String> for ValueKind {
    type Error = SetupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ValueKind> for String {
    fn from(kind: ValueKind) -> Self {
        kind.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int(_) => ScalarKind::Int,
            Self::Float(_) => ScalarKind::Float,
            Self::Str(_) => ScalarKind::Str,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// A tagged value held by a spec's slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(Scalar),
    Pair(String, Scalar),
    List(Vec<Scalar>),
    PairList(Vec<(String, Scalar)>),
    Map(BTreeMap<String, Scalar>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Pair(k, v) => write!(f, "{k}={v}"),
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|s| s.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::PairList(items) => {
                let parts: Vec<String> = items.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Self::Map(entries) => {
                let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// Rust types that can live in a value slot.
///
/// Implemented for `bool`, `i64`, `f64`, `String`, `(String, T)`, `Vec<T>`,
/// `Vec<(String, T)>` and `BTreeMap<String, T>` where `T` is a scalar.
pub trait Bindable: Clone + Default + 'static {
    const KIND: ValueKind;

    fn into_value(self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;
}

/// Scalar element types.
pub trait ScalarType: Bindable {
    const SCALAR: ScalarKind;

    fn into_scalar(self) -> Scalar;

    fn from_scalar(scalar: &Scalar) -> Option<Self>;
}

/// Element types a `Vec` slot can hold: scalars and string-keyed pairs.
pub trait ItemType: Clone + 'static {
    const LIST_KIND: ValueKind;

    fn list_into_value(items: Vec<Self>) -> Value;

    fn list_from_value(value: &Value) -> Option<Vec<Self>>;
}

/// Types a flag can be bound to: `bool` toggles, `i64` counts.
pub trait FlagType: ScalarType {}

impl FlagType for bool {}
impl FlagType for i64 {}

macro_rules! scalar_type {
    ($ty:ty, $kind:ident, $variant:ident) => {
        impl ScalarType for $ty {
            const SCALAR: ScalarKind = ScalarKind::$kind;

            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            fn from_scalar(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl Bindable for $ty {
            const KIND: ValueKind = ValueKind::Scalar(ScalarKind::$kind);

            fn into_value(self) -> Value {
                Value::Scalar(self.into_scalar())
            }

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::Scalar(s) => Self::from_scalar(s),
                    _ => None,
                }
            }
        }

        impl ItemType for $ty {
            const LIST_KIND: ValueKind = ValueKind::List(ScalarKind::$kind);

            fn list_into_value(items: Vec<Self>) -> Value {
                Value::List(items.into_iter().map(ScalarType::into_scalar).collect())
            }

            fn list_from_value(value: &Value) -> Option<Vec<Self>> {
                match value {
                    Value::List(items) => items.iter().map(Self::from_scalar).collect(),
                    _ => None,
                }
            }
        }
    };
}

scalar_type!(bool, Bool, Bool);
scalar_type!(i64, Int, Int);
scalar_type!(f64, Float, Float);
scalar_type!(String, Str, Str);

impl<T: ScalarType> Bindable for (String, T) {
    const KIND: ValueKind = ValueKind::Pair(T::SCALAR);

    fn into_value(self) -> Value {
        Value::Pair(self.0, self.1.into_scalar())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Pair(k, v) => Some((k.clone(), T::from_scalar(v)?)),
            _ => None,
        }
    }
}

impl<T: ScalarType> ItemType for (String, T) {
    const LIST_KIND: ValueKind = ValueKind::PairList(T::SCALAR);

    fn list_into_value(items: Vec<Self>) -> Value {
        Value::PairList(
            items
                .into_iter()
                .map(|(k, v)| (k, v.into_scalar()))
                .collect(),
        )
    }

    fn list_from_value(value: &Value) -> Option<Vec<Self>> {
        match value {
            Value::PairList(items) => items
                .iter()
                .map(|(k, v)| Some((k.clone(), T::from_scalar(v)?)))
                .collect(),
            _ => None,
        }
    }
}

impl<T: ItemType> Bindable for Vec<T> {
    const KIND: ValueKind = T::LIST_KIND;

    fn into_value(self) -> Value {
        T::list_into_value(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        T::list_from_value(value)
    }
}

impl<T: ScalarType> Bindable for BTreeMap<String, T> {
    const KIND: ValueKind = ValueKind::Map(T::SCALAR);

    fn into_value(self) -> Value {
        Value::Map(self.into_iter().map(|(k, v)| (k, v.into_scalar())).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Map(entries) => entries
                .iter()
                .map(|(k, v)| Some((k.clone(), T::from_scalar(v)?)))
                .collect(),
            _ => None,
        }
    }
}

/// A typed, shared handle onto a value slot.
///
/// Cloning a binding clones the handle, not the value: every clone observes
/// the writes the parser makes. Bindings are single-threaded (`!Send`).
///
/// ```
/// use argbind::{Binding, Parser};
///
/// let verbose = Binding::new(0i64);
/// let mut parser = Parser::new();
/// parser.add_flag_with("v,verbose", verbose.clone()).unwrap();
/// parser.parse(["prog", "-vvv"]).unwrap();
/// assert_eq!(verbose.get(), 3);
/// ```
pub struct Binding<T> {
    cell: Rc<RefCell<Value>>,
    marker: PhantomData<T>,
}

impl<T: Bindable> Binding<T> {
    pub fn new(initial: T) -> Self {
        Self {
            cell: Rc::new(RefCell::new(initial.into_value())),
            marker: PhantomData,
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        // The cell holds a `T::KIND` value for its whole life.
        T::from_value(&self.cell.borrow()).unwrap_or_default()
    }

    pub fn set(&self, value: T) {
        *self.cell.borrow_mut() = value.into_value();
    }

    pub(crate) fn from_cell(cell: Rc<RefCell<Value>>) -> Self {
        Self {
            cell,
            marker: PhantomData,
        }
    }

    pub(crate) fn cell(&self) -> Rc<RefCell<Value>> {
        Rc::clone(&self.cell)
    }
}

impl<T: Bindable> Default for Binding<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
            marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&*self.cell.borrow()).finish()
    }
}
