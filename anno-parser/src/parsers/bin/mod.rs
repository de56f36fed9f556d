use std::path::PathBuf;

use byteorder::{ByteOrder as _, LittleEndian};
use glam::{Quat, Vec3};
use rayon::prelude::*;

use anno_coords::backend_to_render;
use anno_core::annotation::dataset::EgoPose;

use super::{ParseError, Parser, ParserProvider};
use crate::pointcloud::cloud::DecodedCloud;

/// Provider for raw binary point buffers stored on disk: stride-N
/// little-endian f32 records, no header, fields beyond x/y/z ignored.
pub struct BinParserProvider {
    pub path: PathBuf,
    pub stride: usize,
    pub decimation: usize,
    /// Dataset ego pose; the heading is applied to every sampled point
    /// before coordinate conversion.
    pub ego_pose: Option<EgoPose>,
}

impl ParserProvider for BinParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(BinParser {
            path: self.path.clone(),
            stride: self.stride,
            decimation: self.decimation,
            ego_heading: self.ego_pose.map(|e| e.heading),
        })
    }
}

pub struct BinParser {
    pub path: PathBuf,
    pub stride: usize,
    pub decimation: usize,
    pub ego_heading: Option<Quat>,
}

impl Parser for BinParser {
    fn parse(&self) -> Result<DecodedCloud, ParseError> {
        let start = std::time::Instant::now();
        let data = std::fs::read(&self.path)?;
        log::debug!("read {} bytes in {:?}", data.len(), start.elapsed());
        parse_buffer(&data, self.stride, self.decimation, self.ego_heading)
    }
}

/// Decode an in-memory point buffer: sample every `decimation`-th
/// record, apply the ego heading, convert backend -> render, then build
/// the color ramp and bounds.
pub fn parse_buffer(
    data: &[u8],
    stride: usize,
    decimation: usize,
    ego_heading: Option<Quat>,
) -> Result<DecodedCloud, ParseError> {
    if stride < 3 {
        return Err(ParseError::StrideTooSmall { stride });
    }
    if decimation < 1 {
        return Err(ParseError::InvalidDecimation);
    }
    if data.len() % 4 != 0 {
        return Err(ParseError::UnalignedBuffer { len: data.len() });
    }
    let floats = data.len() / 4;
    if floats % stride != 0 {
        return Err(ParseError::PartialRecord { floats, stride });
    }

    let record_count = floats / stride;
    let sampled: Vec<usize> = (0..record_count).step_by(decimation).collect();

    let positions: Vec<Vec3> = sampled
        .par_iter()
        .map(|&record| {
            let base = record * stride * 4;
            let raw = Vec3::new(
                LittleEndian::read_f32(&data[base..base + 4]),
                LittleEndian::read_f32(&data[base + 4..base + 8]),
                LittleEndian::read_f32(&data[base + 8..base + 12]),
            );
            let oriented = match ego_heading {
                Some(heading) => heading * raw,
                None => raw,
            };
            backend_to_render(oriented)
        })
        .collect();

    log::debug!(
        "decoded {} of {} records (decimation {})",
        positions.len(),
        record_count,
        decimation
    );

    Ok(DecodedCloud::from_positions(positions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_of(floats: &[f32]) -> Vec<u8> {
        let mut data = vec![0u8; floats.len() * 4];
        LittleEndian::write_f32_into(floats, &mut data);
        data
    }

    #[test]
    fn three_point_buffer_decodes_without_nan() {
        // 9 floats, stride 3, decimation 1.
        let data = buffer_of(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
        let cloud = parse_buffer(&data, 3, 1, None).unwrap();
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.positions[0], Vec3::ZERO);
        assert_eq!(cloud.positions[1], Vec3::new(1.0, 0.0, 0.0));
        // Backend (0, 0, 2) lands at render (0, 2, 0).
        assert_eq!(cloud.positions[2], Vec3::new(0.0, 2.0, 0.0));
        for c in &cloud.colors {
            assert!(c.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn empty_buffer_yields_empty_cloud() {
        let cloud = parse_buffer(&[], 3, 1, None).unwrap();
        assert!(cloud.is_empty());
        assert_eq!(cloud.bounds.center(), Vec3::ZERO);
    }

    #[test]
    fn extra_record_fields_are_ignored() {
        // stride 4: intensity in the fourth slot.
        let data = buffer_of(&[1.0, 2.0, 3.0, 99.0, 4.0, 5.0, 6.0, 98.0]);
        let cloud = parse_buffer(&data, 4, 1, None).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions[0], backend_to_render(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn decimation_keeps_every_kth_record() {
        let data = buffer_of(&[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            2.0, 0.0, 0.0, //
            3.0, 0.0, 0.0,
        ]);
        let cloud = parse_buffer(&data, 3, 2, None).unwrap();
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.positions[1].x, 2.0);
    }

    #[test]
    fn ego_heading_rotates_before_conversion() {
        let data = buffer_of(&[1.0, 0.0, 0.0]);
        let heading = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let cloud = parse_buffer(&data, 3, 1, Some(heading)).unwrap();
        // Backend (1,0,0) rotates to (0,1,0), then converts to (0,0,-1).
        assert!((cloud.positions[0] - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn malformed_buffers_are_rejected() {
        assert!(matches!(
            parse_buffer(&[0u8; 10], 3, 1, None),
            Err(ParseError::UnalignedBuffer { .. })
        ));
        let data = buffer_of(&[1.0, 2.0, 3.0, 4.0]);
        assert!(matches!(
            parse_buffer(&data, 3, 1, None),
            Err(ParseError::PartialRecord { .. })
        ));
        assert!(matches!(
            parse_buffer(&[], 2, 1, None),
            Err(ParseError::StrideTooSmall { .. })
        ));
        assert!(matches!(
            parse_buffer(&[], 3, 0, None),
            Err(ParseError::InvalidDecimation)
        ));
    }
}
