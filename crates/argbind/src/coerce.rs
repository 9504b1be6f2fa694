//! Raw text to typed values.

use crate::error::CoerceError;
use crate::value::{Scalar, ScalarKind, Value, ValueKind};

/// Parse one scalar.
///
/// Booleans are `true`/`false` in any case. Numbers must use the whole
/// string; surrounding whitespace, trailing garbage and overflow fail.
pub fn coerce_scalar(raw: &str, kind: ScalarKind) -> Result<Scalar, CoerceError> {
    match kind {
        ScalarKind::Bool => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(Scalar::Bool(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Scalar::Bool(false))
            } else {
                Err(CoerceError::InvalidBool(raw.to_string()))
            }
        }
        ScalarKind::Int => raw
            .parse::<i64>()
            .map(Scalar::Int)
            .map_err(|_| invalid_number(raw, kind)),
        ScalarKind::Float => raw
            .parse::<f64>()
            .map(Scalar::Float)
            .map_err(|_| invalid_number(raw, kind)),
        ScalarKind::Str => Ok(Scalar::Str(raw.to_string())),
    }
}

/// Split `raw` at the first `delimiter` and coerce the right-hand side.
pub fn coerce_pair(
    raw: &str,
    kind: ScalarKind,
    delimiter: char,
) -> Result<(String, Scalar), CoerceError> {
    split_pair(raw, ValueKind::Pair(kind), kind, delimiter)
}

fn split_pair(
    raw: &str,
    slot: ValueKind,
    kind: ScalarKind,
    delimiter: char,
) -> Result<(String, Scalar), CoerceError> {
    let Some((key, value)) = raw.split_once(delimiter) else {
        return Err(CoerceError::MissingDelimiter {
            raw: raw.to_string(),
            delimiter,
            kind: slot,
        });
    };
    let value = coerce_scalar(value, kind)?;
    Ok((key.to_string(), value))
}

/// Coerce `raw` for `kind` and store it into `slot`.
///
/// Scalars and pairs are replaced, lists get one more element and maps get
/// one more entry (an existing key is overwritten). `slot` is left untouched
/// when coercion fails. An empty `raw` is accepted and changes nothing.
pub fn apply(
    slot: &mut Value,
    kind: ValueKind,
    raw: &str,
    delimiter: char,
) -> Result<(), CoerceError> {
    if raw.is_empty() {
        return Ok(());
    }
    match kind {
        ValueKind::Scalar(k) => {
            *slot = Value::Scalar(coerce_scalar(raw, k)?);
        }
        ValueKind::Pair(k) => {
            let (key, value) = coerce_pair(raw, k, delimiter)?;
            *slot = Value::Pair(key, value);
        }
        ValueKind::List(k) => {
            let item = coerce_scalar(raw, k)?;
            match slot {
                Value::List(items) => items.push(item),
                other => *other = Value::List(vec![item]),
            }
        }
        ValueKind::PairList(k) => {
            let item = split_pair(raw, kind, k, delimiter)?;
            match slot {
                Value::PairList(items) => items.push(item),
                other => *other = Value::PairList(vec![item]),
            }
        }
        ValueKind::Map(k) => {
            let (key, value) = split_pair(raw, kind, k, delimiter)?;
            match slot {
                Value::Map(entries) => {
                    entries.insert(key, value);
                }
                other => {
                    let mut entries = std::collections::BTreeMap::new();
                    entries.insert(key, value);
                    *other = Value::Map(entries);
                }
            }
        }
    }
    Ok(())
}

/// Coerce a whole default value: one raw string per element for containers.
pub(crate) fn build_default<S: AsRef<str>>(
    kind: ValueKind,
    raws: &[S],
    delimiter: char,
) -> Result<Value, CoerceError> {
    let mut value = kind.zero();
    for raw in raws {
        apply(&mut value, kind, raw.as_ref(), delimiter)?;
    }
    Ok(value)
}

fn invalid_number(raw: &str, kind: ScalarKind) -> CoerceError {
    CoerceError::InvalidNumber {
        raw: raw.to_string(),
        kind: kind.name(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn bool_is_case_insensitive() {
        assert_eq!(coerce_scalar("TRUE", ScalarKind::Bool), Ok(Scalar::Bool(true)));
        assert_eq!(coerce_scalar("False", ScalarKind::Bool), Ok(Scalar::Bool(false)));
        let err = coerce_scalar("yes", ScalarKind::Bool).unwrap_err();
        assert_eq!(err.to_string(), "'yes' is not a valid bool");
    }

    #[test]
    fn int_requires_the_whole_string() {
        assert_eq!(coerce_scalar("-42", ScalarKind::Int), Ok(Scalar::Int(-42)));
        for raw in ["12abc", " 1", "", "99999999999999999999", "1.0"] {
            let err = coerce_scalar(raw, ScalarKind::Int).unwrap_err();
            assert_eq!(err.to_string(), format!("'{raw}' is not a valid int"));
        }
    }

    #[test]
    fn float_accepts_decimal_and_exponent_forms() {
        assert_eq!(coerce_scalar("1.5", ScalarKind::Float), Ok(Scalar::Float(1.5)));
        assert_eq!(coerce_scalar("2e3", ScalarKind::Float), Ok(Scalar::Float(2000.0)));
        assert!(coerce_scalar("1,5", ScalarKind::Float).is_err());
    }

    #[test]
    fn numbers_survive_their_own_formatting() {
        for n in [0i64, 1, -1, i64::MAX, i64::MIN] {
            assert_eq!(coerce_scalar(&n.to_string(), ScalarKind::Int), Ok(Scalar::Int(n)));
        }
        for x in [0.0f64, -0.25, 1e300, f64::MIN_POSITIVE, 0.1 + 0.2] {
            assert_eq!(
                coerce_scalar(&x.to_string(), ScalarKind::Float),
                Ok(Scalar::Float(x))
            );
        }
        for b in [true, false] {
            assert_eq!(coerce_scalar(&b.to_string(), ScalarKind::Bool), Ok(Scalar::Bool(b)));
        }
    }

    #[test]
    fn pair_splits_at_the_first_delimiter() {
        assert_eq!(
            coerce_pair("a=b=c", ScalarKind::Str, '='),
            Ok(("a".to_string(), Scalar::Str("b=c".to_string())))
        );
        assert_eq!(
            coerce_pair("hp:30", ScalarKind::Int, ':'),
            Ok(("hp".to_string(), Scalar::Int(30)))
        );
        let err = coerce_pair("novalue", ScalarKind::Str, '=').unwrap_err();
        assert_eq!(err.to_string(), "'novalue' is not a '=' separated pair<string>");
    }

    #[test]
    fn failed_apply_leaves_the_slot_alone() {
        let kind = ValueKind::Map(ScalarKind::Int);
        let mut slot = kind.zero();
        apply(&mut slot, kind, "a=1", '=').unwrap();
        assert!(apply(&mut slot, kind, "b=x", '=').is_err());
        let err = apply(&mut slot, kind, "b", '=').unwrap_err();
        assert_eq!(err.to_string(), "'b' is not a '=' separated map<int>");

        let mut expected = BTreeMap::new();
        expected.insert("a".to_string(), Scalar::Int(1));
        assert_eq!(slot, Value::Map(expected));
    }

    #[test]
    fn map_keeps_the_last_value_for_a_key() {
        let kind = ValueKind::Map(ScalarKind::Str);
        let mut slot = kind.zero();
        apply(&mut slot, kind, "k=1", '=').unwrap();
        apply(&mut slot, kind, "k=2", '=').unwrap();
        assert_eq!(slot.to_string(), "{k=2}");
    }

    #[test]
    fn empty_input_changes_nothing() {
        let kind = ValueKind::INT;
        let mut slot = Value::Scalar(Scalar::Int(7));
        apply(&mut slot, kind, "", '=').unwrap();
        assert_eq!(slot, Value::Scalar(Scalar::Int(7)));
    }

    #[test]
    fn lists_grow_in_order() {
        let kind = ValueKind::PairList(ScalarKind::Int);
        let value = build_default(kind, &["a=1", "b=2", "a=3"], '=').unwrap();
        assert_eq!(value.to_string(), "[a=1, b=2, a=3]");
    }
}
