use super::core::Value;
use std::fmt;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::BigInt(b) => write!(f, "{b}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Rational(r) => write!(f, "{r}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Nil => write!(f, "nil"),
            Value::Char(c) => write!(f, "'{c}'"),
            Value::List(list) => {
                if let Some(s) = self.as_string() {
                    write!(f, "\"{s}\"")
                } else {
                    write!(f, "[")?;
                    for (i, item) in list.items.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{item}")?;
                    }
                    write!(f, "]")
                }
            }
            Value::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.0.iter().into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} => {v}")?;
                }
                write!(f, "}}")
            }
            Value::Tuple(t) => {
                write!(f, "(")?;
                for (i, item) in t.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
            Value::Record(r) => {
                write!(f, "{}{{", r.type_name.as_deref().unwrap_or(""))?;
                for (i, (k, v)) in r.fields().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::DataInstance(d) => {
                if d.fields.is_empty() {
                    write!(f, "{}", d.constructor)
                } else {
                    write!(f, "{}(", d.constructor)?;
                    for (i, field) in d.fields.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{field}")?;
                    }
                    write!(f, ")")
                }
            }
            Value::Bytes(b) => write!(f, "{}", b.display()),
            Value::Bits(b) => write!(f, "%b\"{}\"", b.to_binary_string()),
            Value::Uuid(u) => write!(f, "{}", uuid::Uuid::from_u128(*u)),
            Value::Function(func) => write!(f, "<function {}>", func.name.as_deref().unwrap_or("anonymous")),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Constructor(c) => write!(f, "<constructor {}>", c.name),
            Value::ClassMethod(c) => write!(f, "<class method {}.{}>", c.trait_name, c.method),
            Value::BoundMethod(_) => write!(f, "<bound method>"),
            Value::OperatorFunction(op) => write!(f, "<operator {op}>"),
            Value::ComposedFunction(_) => write!(f, "<composed function>"),
            Value::PartialApplication(p) => write!(f, "<partial application, {} remaining>", p.remaining),
            Value::TypeObject(t) => write!(f, "{}", t.name),
            Value::Task(_) => write!(f, "<task>"),
        }
    }
}
