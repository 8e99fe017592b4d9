use std::fmt;

/// A user-written textual type marker, per the GLOSSARY. Used in `dim`,
/// function parameter/return annotations, and FFI signatures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    Integer,
    Double,
    String,
    Boolean,
    Pointer,
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
    Quat,
    /// A struct name, optionally suffixed `*` for a typed pointer
    /// (`ffiParam := IDENT "as" (typeTag | "pointer") "*"?`).
    Named { name: String, is_pointer: bool },
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Integer => write!(f, "integer"),
            TypeTag::Double => write!(f, "double"),
            TypeTag::String => write!(f, "string"),
            TypeTag::Boolean => write!(f, "boolean"),
            TypeTag::Pointer => write!(f, "pointer"),
            TypeTag::Vec2 => write!(f, "vec2"),
            TypeTag::Vec3 => write!(f, "vec3"),
            TypeTag::Vec4 => write!(f, "vec4"),
            TypeTag::Mat3 => write!(f, "mat3"),
            TypeTag::Mat4 => write!(f, "mat4"),
            TypeTag::Quat => write!(f, "quat"),
            TypeTag::Named { name, is_pointer } => {
                write!(f, "{name}")?;
                if *is_pointer {
                    write!(f, "*")?;
                }
                Ok(())
            }
        }
    }
}

impl TypeTag {
    /// Parse a bare type-tag identifier (no trailing `*`); the parser
    /// handles the pointer suffix itself since only FFI params allow it.
    pub fn from_ident(name: &str) -> Self {
        match name {
            "integer" => TypeTag::Integer,
            "double" => TypeTag::Double,
            "string" => TypeTag::String,
            "boolean" => TypeTag::Boolean,
            "pointer" => TypeTag::Pointer,
            "vec2" => TypeTag::Vec2,
            "vec3" => TypeTag::Vec3,
            "vec4" => TypeTag::Vec4,
            "mat3" => TypeTag::Mat3,
            "mat4" => TypeTag::Mat4,
            "quat" => TypeTag::Quat,
            other => TypeTag::Named {
                name: other.to_string(),
                is_pointer: false,
            },
        }
    }
}
