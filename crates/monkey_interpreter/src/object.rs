use std::fmt::Display;

pub const TRUE: Object = Object::Boolean(true);
pub const FALSE: Object = Object::Boolean(false);
pub const NULL: Object = Object::Null;

/// Type tag of a runtime value.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Integer => write!(f, "Integer"),
            ObjectType::Boolean => write!(f, "Boolean"),
            ObjectType::Null => write!(f, "Null"),
        }
    }
}

/// A value produced by evaluation.
///
/// Booleans and null carry no identity of their own: `TRUE`, `FALSE` and `NULL` are the only
/// instances, so comparing two of them with `==` is the same as comparing which constant they are.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
}

impl Object {
    pub fn from_native_bool(value: bool) -> Object {
        if value {
            TRUE
        } else {
            FALSE
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
        }
    }

    /// Human-readable rendering of the value, as shown by the REPL.
    /// # Examples
    /// ```rust
    /// use monkey_interpreter::object::{Object, NULL};
    ///
    /// assert_eq!(Object::Integer(-5).inspect(), "-5");
    /// assert_eq!(NULL.inspect(), "null");
    /// ```
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{}", value),
            Object::Boolean(value) => write!(f, "{}", value),
            Object::Null => write!(f, "null"),
        }
    }
}
