//! Vector and matrix records shared by several formats

use glam::{Mat4, Vec3, Vec4};

ssbh_record! {
    pub struct Vector3 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
    }
}

ssbh_record! {
    pub struct Vector4 {
        pub x: f32,
        pub y: f32,
        pub z: f32,
        pub w: f32,
    }
}

ssbh_record! {
    /// Row-major 4x4 matrix
    pub struct Matrix4x4 {
        pub row1: Vector4,
        pub row2: Vector4,
        pub row3: Vector4,
        pub row4: Vector4,
    }
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl Vector4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Matrix4x4 {
    pub const IDENTITY: Self = Self {
        row1: Vector4::new(1.0, 0.0, 0.0, 0.0),
        row2: Vector4::new(0.0, 1.0, 0.0, 0.0),
        row3: Vector4::new(0.0, 0.0, 1.0, 0.0),
        row4: Vector4::new(0.0, 0.0, 0.0, 1.0),
    };
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector4> for Vec4 {
    fn from(v: Vector4) -> Self {
        Vec4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vec4> for Vector4 {
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<&Matrix4x4> for Mat4 {
    /// Rows become columns of the transposed glam matrix
    fn from(m: &Matrix4x4) -> Self {
        Mat4::from_cols(
            m.row1.clone().into(),
            m.row2.clone().into(),
            m.row3.clone().into(),
            m.row4.clone().into(),
        )
        .transpose()
    }
}

impl From<Mat4> for Matrix4x4 {
    fn from(m: Mat4) -> Self {
        let rows = m.transpose();
        Self {
            row1: rows.x_axis.into(),
            row2: rows.y_axis.into(),
            row3: rows.z_axis.into(),
            row4: rows.w_axis.into(),
        }
    }
}
