//! Point samples, as they are stored in the GPU buffer, and the source-data asset owning such a
//! buffer.

use crate::renderer::error::{AttributeMismatchType, RendererError, RendererResult};
use bytemuck::{Pod, Zeroable};
use pasture_core::containers::{BorrowedBuffer, BorrowedBufferExt};
use pasture_core::layout::attributes::{COLOR_RGB, POSITION_3D};
use pasture_core::layout::{PointAttributeDefinition, PrimitiveType};
use pasture_core::nalgebra::Vector3;

/// A GPU-resident buffer of [PointRecord]s.
///
/// The renderer never looks into the buffer. It only passes the handle on to the material and
/// uses the element count as the vertex count of the draw call.
pub trait PointBuffer {
    /// Number of points in the buffer.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single point, in the memory layout that the shaders expect.
///
/// The color is packed as RGBA with 8 bits per channel, red in the least significant byte.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct PointRecord {
    pub position: [f32; 3],
    pub color: u32,
}

impl PointRecord {
    pub fn new(position: [f32; 3], rgba: [u8; 4]) -> Self {
        PointRecord {
            position,
            color: pack_rgba(rgba),
        }
    }

    /// The color of this point, as separate r, g, b, a channels.
    pub fn rgba(&self) -> [u8; 4] {
        self.color.to_le_bytes()
    }
}

/// Packs four 8 bit channels into a single `u32`.
pub fn pack_rgba(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

/// Source-data asset: owns the GPU buffer, that a point cloud renderer draws, unless the caller
/// supplies a buffer directly.
#[derive(Clone, Debug)]
pub struct PointCloudData<B> {
    buffer: B,
}

impl<B: PointBuffer> PointCloudData<B> {
    pub fn new(buffer: B) -> Self {
        PointCloudData { buffer }
    }

    /// The GPU buffer holding the points.
    pub fn compute_buffer(&self) -> &B {
        &self.buffer
    }

    pub fn point_count(&self) -> usize {
        self.buffer.len()
    }
}

/// Converts the points in a pasture point buffer into [PointRecord]s.
///
/// The points need the attribute [POSITION_3D]. If they also have [COLOR_RGB], the 16 bit color
/// channels are reduced to 8 bits. Otherwise all points are white.
/// Positions are converted to single precision, so they should be reasonably close to the origin.
pub fn point_records_from_pasture<'a, P>(points: &P) -> RendererResult<Vec<PointRecord>>
where
    P: BorrowedBuffer<'a> + 'a,
{
    check_attribute::<P, Vector3<f64>>(points, &POSITION_3D, true)?;
    let has_color = check_attribute::<P, Vector3<u16>>(points, &COLOR_RGB, false)?;

    let mut records: Vec<PointRecord> = points
        .view_attribute::<Vector3<f64>>(&POSITION_3D)
        .into_iter()
        .map(|pos| PointRecord::new([pos.x as f32, pos.y as f32, pos.z as f32], [255; 4]))
        .collect();

    if has_color {
        for (record, color) in records
            .iter_mut()
            .zip(points.view_attribute::<Vector3<u16>>(&COLOR_RGB))
        {
            record.color = pack_rgba([
                channel_to_u8(color.x),
                channel_to_u8(color.y),
                channel_to_u8(color.z),
                255,
            ]);
        }
    }

    Ok(records)
}

/// Checks, that the attribute exists in the point layout, with the data type `T`.
/// Returns false, if the attribute is missing and not required.
fn check_attribute<'a, P, T>(
    points: &P,
    attribute: &PointAttributeDefinition,
    required: bool,
) -> RendererResult<bool>
where
    P: BorrowedBuffer<'a>,
    T: PrimitiveType,
{
    let member = match points.point_layout().get_attribute_by_name(attribute.name()) {
        Some(member) => member,
        None if required => {
            return Err(RendererError::AttributeMismatch {
                attribute: attribute.clone(),
                problem: AttributeMismatchType::DoesNotExist,
            });
        }
        None => return Ok(false),
    };
    if member.datatype() != T::data_type() {
        return Err(RendererError::AttributeMismatch {
            attribute: attribute.clone(),
            problem: AttributeMismatchType::WrongType,
        });
    }
    Ok(true)
}

fn channel_to_u8(channel: u16) -> u8 {
    (channel >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::{PointBuffer, PointCloudData, PointRecord, pack_rgba, point_records_from_pasture};
    use crate::renderer::error::{AttributeMismatchType, RendererError};
    use bytemuck::{Pod, Zeroable};
    use pasture_core::containers::VectorBuffer;
    use pasture_core::layout::attributes::{COLOR_RGB, INTENSITY, POSITION_3D};
    use pasture_core::layout::{PointAttributeDataType, PointLayout};
    use pasture_core::nalgebra::Vector3;
    use pasture_derive::PointType;

    #[repr(C, packed)]
    #[derive(Clone, Copy, Debug, PartialEq, Default, PointType, Pod, Zeroable)]
    struct ColoredPoint {
        #[pasture(BUILTIN_POSITION_3D)]
        position: Vector3<f64>,
        #[pasture(BUILTIN_COLOR_RGB)]
        color: Vector3<u16>,
    }

    #[repr(C, packed)]
    #[derive(Clone, Copy, Debug, PartialEq, Default, PointType, Pod, Zeroable)]
    struct PlainPoint {
        #[pasture(BUILTIN_POSITION_3D)]
        position: Vector3<f64>,
    }

    struct Counted(usize);

    impl PointBuffer for Counted {
        fn len(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn record_layout() {
        assert_eq!(std::mem::size_of::<PointRecord>(), 16);
        let record = PointRecord::new([1.0, 2.0, 3.0], [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(record.color, 0x4433_2211);
        assert_eq!(record.rgba(), [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(pack_rgba([255, 0, 0, 255]), 0xff00_00ff);
    }

    #[test]
    fn convert_colored_points() {
        let points = [
            ColoredPoint {
                position: Vector3::new(1.0, 2.0, 3.0),
                color: Vector3::new(65535, 32768, 0),
            },
            ColoredPoint {
                position: Vector3::new(-1.5, 0.0, 0.25),
                color: Vector3::new(255, 256, 511),
            },
        ]
        .into_iter()
        .collect::<VectorBuffer>();

        let records = point_records_from_pasture(&points).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(records[0].rgba(), [255, 128, 0, 255]);
        assert_eq!(records[1].position, [-1.5, 0.0, 0.25]);
        assert_eq!(records[1].rgba(), [0, 1, 1, 255]);
    }

    #[test]
    fn missing_color_is_white() {
        let points = (0..10)
            .map(|i| PlainPoint {
                position: Vector3::new(i as f64, 0.0, 0.0),
            })
            .collect::<VectorBuffer>();
        let records = point_records_from_pasture(&points).unwrap();
        assert_eq!(records.len(), 10);
        assert!(records.iter().all(|r| r.rgba() == [255; 4]));
        assert_eq!(records[9].position, [9.0, 0.0, 0.0]);
    }

    #[test]
    fn missing_position_is_an_error() {
        let layout = PointLayout::from_attributes(&[INTENSITY]);
        let points = VectorBuffer::with_capacity(0, layout);
        let result = point_records_from_pasture(&points);
        assert!(matches!(
            result,
            Err(RendererError::AttributeMismatch {
                problem: AttributeMismatchType::DoesNotExist,
                ..
            })
        ));
    }

    #[test]
    fn color_of_wrong_type_is_an_error() {
        let layout = PointLayout::from_attributes(&[
            POSITION_3D,
            COLOR_RGB.with_custom_datatype(PointAttributeDataType::Vec3u8),
        ]);
        let points = VectorBuffer::with_capacity(0, layout);
        let result = point_records_from_pasture(&points);
        assert!(matches!(
            result,
            Err(RendererError::AttributeMismatch {
                problem: AttributeMismatchType::WrongType,
                ..
            })
        ));
    }

    #[test]
    fn source_data_reports_buffer_length() {
        let data = PointCloudData::new(Counted(1000));
        assert_eq!(data.point_count(), 1000);
        assert_eq!(data.compute_buffer().len(), 1000);
        assert!(!data.compute_buffer().is_empty());
        assert!(PointCloudData::new(Counted(0)).compute_buffer().is_empty());
    }
}
