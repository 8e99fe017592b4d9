//! Minimal GLM-style vector/matrix/quaternion value types.
//!
//! These mirror `original_source/include/unified_value.h`'s `Vec2`/`Vec3`/
//! `Vec4`/`Mat3`/`Mat4`/`Quat` wrappers, just without depending on an actual
//! GLM binding — braic only needs the handful of operations spec §6 names
//! (`length`, `normalize`, `dot`, `cross`) plus componentwise add/sub and
//! scalar multiply for the arithmetic rules in §4.4.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Column-major 3x3 matrix, identity by default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3(pub [[f32; 3]; 3]);

/// Column-major 4x4 matrix, identity by default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4(pub [[f32; 4]; 4]);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for Vec2 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }
}

impl Default for Vec4 {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0, w: 0.0 }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self { w: 1.0, x: 0.0, y: 0.0, z: 0.0 }
    }
}

macro_rules! vec_ops {
    ($name:ident { $($field:ident),+ }) => {
        impl $name {
            pub fn add(self, other: Self) -> Self {
                Self { $($field: self.$field + other.$field),+ }
            }
            pub fn sub(self, other: Self) -> Self {
                Self { $($field: self.$field - other.$field),+ }
            }
            pub fn scale(self, s: f32) -> Self {
                Self { $($field: self.$field * s),+ }
            }
            pub fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }
            pub fn length(self) -> f32 {
                self.dot(self).sqrt()
            }
            pub fn normalize(self) -> Self {
                let len = self.length();
                if len == 0.0 { self } else { self.scale(1.0 / len) }
            }
        }
    };
}

vec_ops!(Vec2 { x, y });
vec_ops!(Vec3 { x, y, z });
vec_ops!(Vec4 { x, y, z, w });

impl Vec3 {
    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }
}
