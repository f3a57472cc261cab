pub use bevy_math::{DMat3, DQuat, DVec3};

/// Build a matrix from row-major entries. glam stores columns, so the rows
/// are laid in as columns and transposed.
#[inline]
pub fn mat3_from_rows(rows: [[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(&rows).transpose()
}

/// Entry at `(row, col)`.
#[inline]
pub fn mat3_at(m: &DMat3, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

/// Cross-product matrix: `skew(v) * u == v.cross(u)`.
#[inline]
pub fn skew(v: DVec3) -> DMat3 {
    mat3_from_rows([
        [0.0, -v.z, v.y],
        [v.z, 0.0, -v.x],
        [-v.y, v.x, 0.0],
    ])
}

// Below this angle the closed forms lose precision; use Taylor series.
const SMALL_ANGLE: f64 = 1e-4;

/// `sin(x) / x`, equal to 1 at `x = 0`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < SMALL_ANGLE {
        1.0 - x * x / 6.0
    } else {
        x.sin() / x
    }
}

/// `(1 - cos(x)) / x²`, equal to 1/2 at `x = 0`.
#[inline]
pub fn cosc(x: f64) -> f64 {
    if x.abs() < SMALL_ANGLE {
        0.5 - x * x / 24.0
    } else {
        // 1 - cos(x) == 2 sin²(x/2), without the cancellation
        let h = (0.5 * x).sin();
        2.0 * h * h / (x * x)
    }
}

pub fn mat3_is_finite(m: &DMat3) -> bool {
    m.x_axis.is_finite() && m.y_axis.is_finite() && m.z_axis.is_finite()
}

/// Largest absolute entry of `mᵀm − I`, a cheap orthonormality residual.
pub fn orthonormality_error(m: &DMat3) -> f64 {
    let r = m.transpose() * *m - DMat3::IDENTITY;
    r.x_axis
        .abs()
        .max_element()
        .max(r.y_axis.abs().max_element())
        .max(r.z_axis.abs().max_element())
}
