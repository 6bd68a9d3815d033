//! Axis system and unit conversion
//!
//! glTF content is Y-up, +Z front, right-handed and in meters. The requested
//! output system is reached with a signed axis permutation `M`; vectors map
//! as `M·v` and rotation matrices as `M·R·Mᵀ`.

use glam::{DMat3, DQuat, DVec3, EulerRot};

use crate::settings::{FrontAxis, Handedness, ImportSettings};

const SOURCE_UP: usize = 1;
const SOURCE_FRONT: usize = 2;
const SOURCE_SIDE: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConversion {
    matrix: DMat3,
    unit_scale: f64,
}

impl AxisConversion {
    pub fn new(settings: &ImportSettings) -> Self {
        let up = settings.up_axis.index();
        let remaining: Vec<usize> = (0..3).filter(|&axis| axis != up).collect();
        let (front, side) = match settings.front_axis {
            FrontAxis::ParityEven => (remaining[0], remaining[1]),
            FrontAxis::ParityOdd => (remaining[1], remaining[0]),
        };

        let mut columns = [DVec3::ZERO; 3];
        columns[SOURCE_UP] = unit_axis(up);
        columns[SOURCE_FRONT] = unit_axis(front);
        columns[SOURCE_SIDE] = unit_axis(side);

        let wanted = match settings.handedness {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        };
        let mut matrix = DMat3::from_cols(columns[0], columns[1], columns[2]);
        if matrix.determinant() * wanted < 0.0 {
            columns[SOURCE_SIDE] = -columns[SOURCE_SIDE];
            matrix = DMat3::from_cols(columns[0], columns[1], columns[2]);
        }

        Self {
            matrix,
            unit_scale: settings.unit.per_meter(),
        }
    }

    pub fn matrix(&self) -> DMat3 {
        self.matrix
    }

    /// Triangle winding must be reversed when the conversion mirrors.
    pub fn flips_winding(&self) -> bool {
        self.matrix.determinant() < 0.0
    }

    /// Direction vectors (normals, tangents); no unit scaling.
    pub fn direction(&self, v: [f32; 3]) -> [f32; 3] {
        (self.matrix * DVec3::from(v.map(f64::from))).as_vec3().to_array()
    }

    /// Mesh-space positions, scaled into the output unit.
    pub fn position(&self, v: [f32; 3]) -> [f32; 3] {
        (self.matrix * DVec3::from(v.map(f64::from)) * self.unit_scale)
            .as_vec3()
            .to_array()
    }

    pub fn translation(&self, t: [f32; 3]) -> [f64; 3] {
        (self.matrix * DVec3::from(t.map(f64::from)) * self.unit_scale).to_array()
    }

    pub fn scale(&self, s: [f32; 3]) -> [f64; 3] {
        let abs = DMat3::from_cols(
            self.matrix.x_axis.abs(),
            self.matrix.y_axis.abs(),
            self.matrix.z_axis.abs(),
        );
        (abs * DVec3::from(s.map(f64::from))).to_array()
    }

    /// Quaternion `[x, y, z, w]` to XYZ-order Euler angles in degrees.
    pub fn rotation(&self, q: [f32; 4]) -> [f64; 3] {
        let source = DQuat::from_array(q.map(f64::from)).normalize();
        let rotation = self.matrix * DMat3::from_quat(source) * self.matrix.transpose();
        let (z, y, x) = DQuat::from_mat3(&rotation).to_euler(EulerRot::ZYX);
        [x.to_degrees(), y.to_degrees(), z.to_degrees()]
    }
}

fn unit_axis(index: usize) -> DVec3 {
    match index {
        0 => DVec3::X,
        1 => DVec3::Y,
        _ => DVec3::Z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{UpAxis, Unit};

    fn settings(up: UpAxis, front: FrontAxis, handedness: Handedness) -> ImportSettings {
        ImportSettings {
            up_axis: up,
            front_axis: front,
            handedness,
            unit: Unit::M,
        }
    }

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-4, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_native_system_is_identity() {
        let conversion = AxisConversion::new(&settings(UpAxis::Y, FrontAxis::ParityOdd, Handedness::Right));
        assert_eq!(conversion.matrix(), DMat3::IDENTITY);
        assert!(!conversion.flips_winding());
    }

    #[test]
    fn test_determinant_matches_handedness() {
        for up in [UpAxis::X, UpAxis::Y, UpAxis::Z] {
            for front in [FrontAxis::ParityEven, FrontAxis::ParityOdd] {
                let right = AxisConversion::new(&settings(up, front, Handedness::Right));
                let left = AxisConversion::new(&settings(up, front, Handedness::Left));
                assert!((right.matrix().determinant() - 1.0).abs() < 1e-12);
                assert!((left.matrix().determinant() + 1.0).abs() < 1e-12);
                assert!(left.flips_winding());
            }
        }
    }

    #[test]
    fn test_z_up_moves_source_up_to_z() {
        let conversion = AxisConversion::new(&settings(UpAxis::Z, FrontAxis::ParityEven, Handedness::Right));
        assert_close(conversion.translation([0.0, 2.0, 0.0]), [0.0, 0.0, 2.0]);
        // parity-even with Z up puts the source front on X
        assert_close(conversion.translation([0.0, 0.0, 3.0]), [3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_unit_scale_applies_to_translation_only() {
        let mut s = settings(UpAxis::Y, FrontAxis::ParityOdd, Handedness::Right);
        s.unit = Unit::Cm;
        let conversion = AxisConversion::new(&s);
        assert_close(conversion.translation([1.0, 0.0, 0.0]), [100.0, 0.0, 0.0]);
        assert_close(conversion.scale([2.0, 2.0, 2.0]), [2.0, 2.0, 2.0]);
        assert_eq!(conversion.direction([0.0, 1.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_rotation_to_euler_degrees() {
        let conversion = AxisConversion::new(&settings(UpAxis::Y, FrontAxis::ParityOdd, Handedness::Right));
        let (sin, cos) = 15f32.to_radians().sin_cos();
        // 30 degrees about Y
        assert_close(conversion.rotation([0.0, sin, 0.0, cos]), [0.0, 30.0, 0.0]);
    }

    #[test]
    fn test_scale_is_permuted() {
        let conversion = AxisConversion::new(&settings(UpAxis::Z, FrontAxis::ParityEven, Handedness::Left));
        // source Y (up) lands on Z
        assert_close(conversion.scale([1.0, 5.0, 1.0]), [1.0, 1.0, 5.0]);
    }
}
