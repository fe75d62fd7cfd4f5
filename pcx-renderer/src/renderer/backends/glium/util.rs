use pasture_core::nalgebra::{Matrix4, Vector3};

/// Copies a [Matrix4] matrix from nalgebra into a static array, as
/// understood by glium, and converts it from row-major format (as used by nalgebra)
/// into column-major format (as expected by glium / open gl) during that process.
pub fn matrix_to_gl(mat: &Matrix4<f64>) -> [[f32; 4]; 4] {
    [
        [mat.m11 as f32, mat.m21 as f32, mat.m31 as f32, mat.m41 as f32],
        [mat.m12 as f32, mat.m22 as f32, mat.m32 as f32, mat.m42 as f32],
        [mat.m13 as f32, mat.m23 as f32, mat.m33 as f32, mat.m43 as f32],
        [mat.m14 as f32, mat.m24 as f32, mat.m34 as f32, mat.m44 as f32],
    ]
}

/// Converts a vector into a static array, as understood by glium.
pub fn vector_to_gl(vec: &Vector3<f64>) -> [f32; 3] {
    [vec.x as f32, vec.y as f32, vec.z as f32]
}

/// The right and up direction of a camera in world space, extracted from its view matrix.
/// These are the first two rows of the rotation part of the view matrix.
pub fn camera_right_up(view: &Matrix4<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let right = Vector3::new(view.m11, view.m12, view.m13).normalize();
    let up = Vector3::new(view.m21, view.m22, view.m23).normalize();
    (right, up)
}
