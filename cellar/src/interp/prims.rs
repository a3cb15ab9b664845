//! Primitive operators available in every fresh global frame

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::value::{PrimFn, Primitive, Value};

const PRIMITIVES: &[(&str, PrimFn)] = &[
    ("+", builtin_add),
    ("-", builtin_sub),
    ("*", builtin_mul),
    ("/", builtin_div),
    ("=", builtin_eq),
    ("<", builtin_lt),
    ("<=", builtin_le),
    (">", builtin_gt),
    (">=", builtin_ge),
    ("not", builtin_not),
    ("and", builtin_and),
    ("or", builtin_or),
];

/// Bind every primitive in the global frame
pub fn install(env: &mut Environment) {
    let global = env.global();
    for &(name, func) in PRIMITIVES {
        let defined = env.define(global, name, Value::Prim(Primitive { name, func }));
        debug_assert!(defined.is_ok(), "primitive '{name}' installed twice");
    }
}

fn expect_arity<'a, const N: usize>(name: &str, args: &'a [Value]) -> InterpResult<&'a [Value; N]> {
    args.try_into()
        .map_err(|_| RuntimeError::arity_mismatch(name, N, args.len()))
}

fn num_operands(name: &str, args: &[Value]) -> InterpResult<(f64, f64)> {
    let [a, b] = expect_arity::<2>(name, args)?;
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok((*x, *y)),
        (Value::Num(_), other) | (other, _) => Err(RuntimeError::type_mismatch(
            &format!("'{name}'"),
            "two numbers",
            other.type_name(),
        )),
    }
}

fn bool_operands(name: &str, args: &[Value]) -> InterpResult<(bool, bool)> {
    let [a, b] = expect_arity::<2>(name, args)?;
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => Ok((*x, *y)),
        (Value::Bool(_), other) | (other, _) => Err(RuntimeError::type_mismatch(
            &format!("'{name}'"),
            "two booleans",
            other.type_name(),
        )),
    }
}

fn builtin_add(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands("+", args)?;
    Ok(Value::Num(a + b))
}

fn builtin_sub(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands("-", args)?;
    Ok(Value::Num(a - b))
}

fn builtin_mul(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands("*", args)?;
    Ok(Value::Num(a * b))
}

fn builtin_div(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands("/", args)?;
    if b == 0.0 {
        return Err(RuntimeError::division_by_zero());
    }
    Ok(Value::Num(a / b))
}

fn builtin_eq(args: &[Value]) -> InterpResult<Value> {
    let [a, b] = expect_arity::<2>("=", args)?;
    match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(Value::Bool(x == y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(x == y)),
        (Value::Num(_) | Value::Bool(_), other) | (other, _) => Err(RuntimeError::type_mismatch(
            "'='",
            "two numbers or two booleans",
            other.type_name(),
        )),
    }
}

fn builtin_lt(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands("<", args)?;
    Ok(Value::Bool(a < b))
}

fn builtin_le(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands("<=", args)?;
    Ok(Value::Bool(a <= b))
}

fn builtin_gt(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands(">", args)?;
    Ok(Value::Bool(a > b))
}

fn builtin_ge(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = num_operands(">=", args)?;
    Ok(Value::Bool(a >= b))
}

fn builtin_not(args: &[Value]) -> InterpResult<Value> {
    let [a] = expect_arity::<1>("not", args)?;
    match a {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(RuntimeError::type_mismatch("'not'", "a boolean", other.type_name())),
    }
}

fn builtin_and(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = bool_operands("and", args)?;
    Ok(Value::Bool(a && b))
}

fn builtin_or(args: &[Value]) -> InterpResult<Value> {
    let (a, b) = bool_operands("or", args)?;
    Ok(Value::Bool(a || b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::error::ErrorKind;

    fn call(name: &str, args: &[Value]) -> InterpResult<Value> {
        let env = Environment::with_primitives();
        match env.lookup(env.global(), name)? {
            Value::Prim(p) => p.call(args),
            other => panic!("{name} is not a primitive: {other:?}"),
        }
    }

    #[test]
    fn test_all_primitives_installed() {
        let env = Environment::with_primitives();
        assert_eq!(env.bindings(env.global()).len(), PRIMITIVES.len());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "installed twice")]
    fn test_install_twice_is_caught() {
        let mut env = Environment::with_primitives();
        install(&mut env);
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(call("+", &[Value::Num(2.0), Value::Num(3.0)]).unwrap(), Value::Num(5.0));
        assert_eq!(call("-", &[Value::Num(2.0), Value::Num(3.0)]).unwrap(), Value::Num(-1.0));
        assert_eq!(call("*", &[Value::Num(2.0), Value::Num(3.0)]).unwrap(), Value::Num(6.0));
        assert_eq!(call("/", &[Value::Num(3.0), Value::Num(2.0)]).unwrap(), Value::Num(1.5));
    }

    #[test]
    fn test_division_by_zero() {
        let err = call("/", &[Value::Num(1.0), Value::Num(0.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn test_comparison() {
        assert_eq!(call("<", &[Value::Num(1.0), Value::Num(2.0)]).unwrap(), Value::Bool(true));
        assert_eq!(call("<=", &[Value::Num(2.0), Value::Num(2.0)]).unwrap(), Value::Bool(true));
        assert_eq!(call(">", &[Value::Num(1.0), Value::Num(2.0)]).unwrap(), Value::Bool(false));
        assert_eq!(call(">=", &[Value::Num(1.0), Value::Num(2.0)]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_equality() {
        assert_eq!(call("=", &[Value::Num(1.0), Value::Num(1.0)]).unwrap(), Value::Bool(true));
        assert_eq!(call("=", &[Value::Bool(true), Value::Bool(false)]).unwrap(), Value::Bool(false));
        let err = call("=", &[Value::Num(1.0), Value::Bool(true)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_boolean_logic() {
        assert_eq!(call("not", &[Value::Bool(true)]).unwrap(), Value::Bool(false));
        assert_eq!(call("and", &[Value::Bool(true), Value::Bool(false)]).unwrap(), Value::Bool(false));
        assert_eq!(call("or", &[Value::Bool(true), Value::Bool(false)]).unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_wrong_kinds() {
        let err = call("+", &[Value::Bool(true), Value::Num(1.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.message.contains("boolean"));
        let err = call("and", &[Value::Bool(true), Value::Num(1.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
        assert!(err.message.contains("number"));
        let err = call("not", &[Value::Num(0.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_wrong_arity() {
        let err = call("+", &[Value::Num(1.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
        let err = call("not", &[]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ArityMismatch);
    }
}
