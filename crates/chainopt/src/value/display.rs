//! Display and Debug implementations for Value

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "'{}'", c),
            Value::I64(n) => write!(f, "{}", n),
            Value::F64(n) => write!(f, "{:?}", n),
            Value::String(s) => write!(f, "{:?}", s.as_str()),

            Value::Vec(None) => write!(f, "vec![]"),
            Value::Vec(Some(items)) => {
                write!(f, "vec![")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}", item)?;
                }
                write!(f, "]")
            }

            Value::Struct(s) => {
                write!(f, "{} {{ ", s.type_name)?;
                for (i, (k, v)) in s.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", k, v)?;
                }
                write!(f, " }}")
            }

            // References print identity only; their targets may be shared,
            // borrowed, or cyclic.
            Value::Map(m) => write!(f, "{:?}", m),
            Value::Function(func) => write!(f, "{:?}", func),
            Value::Channel(c) => write!(f, "{:?}", c),
            Value::Ref(p) => write!(f, "&{:?}", p),
            Value::Opaque(p) => write!(f, "<opaque {:p}>", *p),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s.as_str()), // No quotes for Display
            Value::Char(c) => write!(f, "{}", c),
            _ => fmt::Debug::fmt(self, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_forms() {
        assert_eq!(format!("{:?}", Value::Nil), "nil");
        assert_eq!(format!("{:?}", Value::nil_vec()), "vec![]");
        assert_eq!(
            format!("{:?}", Value::vec(vec![Value::I64(1), Value::string("a")])),
            "vec![1, \"a\"]"
        );
        assert_eq!(format!("{:?}", Value::F64(1.0)), "1.0");

        let point = StructValue::new("Point")
            .with_field("x", Value::I64(1))
            .with_field("y", Value::I64(2));
        assert_eq!(
            format!("{:?}", Value::structure(point)),
            "Point { x: 1, y: 2 }"
        );
    }

    #[test]
    fn test_display_strips_quotes() {
        assert_eq!(Value::string("hi").to_string(), "hi");
        assert_eq!(Value::Char('c').to_string(), "c");
        assert_eq!(Value::Ref(Ptr::null()).to_string(), "&Ptr(null)");
    }
}
