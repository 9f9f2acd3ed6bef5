use std::collections::BTreeMap;
use std::io::Write;

use byteorder::{ByteOrder as _, LittleEndian, WriteBytesExt as _};
use serde::Serialize;

use pcd_core::pointcloud::point::PointBatch;

use crate::error::ExportError;

pub const COMPONENT_TYPE_UNSIGNED_BYTE: u32 = 5121;
pub const COMPONENT_TYPE_FLOAT: u32 = 5126;
pub const TARGET_ARRAY_BUFFER: u32 = 34962;
pub const PRIMITIVE_MODE_POINTS: u32 = 0;

// Interleaved vertex: position f32x3, then RGB bytes plus one pad byte.
const BYTE_STRIDE: usize = (4 * 3) + (3 + 1);

#[derive(Debug, Serialize)]
pub struct Asset {
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct Scene {
    pub nodes: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct Node {
    pub mesh: u32,
}

#[derive(Debug, Serialize)]
pub struct MeshPrimitive {
    pub attributes: BTreeMap<String, u32>,
    pub mode: u32,
}

#[derive(Debug, Serialize)]
pub struct Mesh {
    pub primitives: Vec<MeshPrimitive>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessor {
    pub name: String,
    pub buffer_view: u32,
    pub byte_offset: u32,
    pub component_type: u32,
    pub count: u32,
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Vec<f32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Vec<f32>>,
    pub normalized: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BufferView {
    pub buffer: u32,
    pub byte_offset: u32,
    pub byte_length: u32,
    pub byte_stride: u8,
    pub target: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Buffer {
    pub byte_length: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gltf {
    pub asset: Asset,
    pub scene: u32,
    pub scenes: Vec<Scene>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub accessors: Vec<Accessor>,
    pub buffer_views: Vec<BufferView>,
    pub buffers: Vec<Buffer>,
}

/// Binary glTF container: one JSON chunk, one BIN chunk.
pub struct Glb {
    pub json: Vec<u8>,
    pub bin: Vec<u8>,
}

impl Glb {
    /// Writes the container with both chunks aligned to 4 bytes, JSON padded
    /// with spaces and BIN with zeros.
    pub fn to_writer<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        let json_padding = padding(self.json.len());
        let bin_padding = padding(self.bin.len());
        let total_length =
            12 + 8 + self.json.len() + json_padding + 8 + self.bin.len() + bin_padding;

        writer.write_all(b"glTF")?;
        writer.write_u32::<LittleEndian>(2)?;
        writer.write_u32::<LittleEndian>(total_length as u32)?;

        writer.write_u32::<LittleEndian>((self.json.len() + json_padding) as u32)?;
        writer.write_all(b"JSON")?;
        writer.write_all(&self.json)?;
        writer.write_all(&[b' '; 3][..json_padding])?;

        writer.write_u32::<LittleEndian>((self.bin.len() + bin_padding) as u32)?;
        writer.write_all(b"BIN\0")?;
        writer.write_all(&self.bin)?;
        writer.write_all(&[0u8; 3][..bin_padding])?;

        Ok(())
    }
}

fn padding(length: usize) -> usize {
    (4 - length % 4) % 4
}

/// Builds a point-primitive GLB from one emitted batch.
pub fn generate_glb(batch: &PointBatch) -> Result<Glb, ExportError> {
    let mut bin_content: Vec<u8> = Vec::with_capacity(batch.positions.len() * BYTE_STRIDE);
    let mut buffer = [0u8; BYTE_STRIDE];

    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for (position, color) in batch.positions.iter().zip(&batch.colors) {
        let local = [
            position[0] as f32,
            position[1] as f32,
            position[2] as f32,
        ];
        for axis in 0..3 {
            min[axis] = min[axis].min(local[axis]);
            max[axis] = max[axis].max(local[axis]);
        }

        LittleEndian::write_f32_into(&local, &mut buffer[0..12]);
        buffer[12..15].copy_from_slice(&color.to_rgb8());
        buffer[15] = 0;

        bin_content.write_all(&buffer)?;
    }

    let count = batch.positions.len() as u32;

    let buffer_views = vec![BufferView {
        buffer: 0,
        byte_offset: 0,
        byte_length: bin_content.len() as u32,
        byte_stride: BYTE_STRIDE as u8,
        target: TARGET_ARRAY_BUFFER,
    }];

    let accessors = vec![
        Accessor {
            name: "positions".to_string(),
            buffer_view: 0,
            byte_offset: 0,
            component_type: COMPONENT_TYPE_FLOAT,
            count,
            type_: "VEC3".to_string(),
            min: Some(min.to_vec()),
            max: Some(max.to_vec()),
            normalized: false,
        },
        Accessor {
            name: "colors".to_string(),
            buffer_view: 0,
            byte_offset: 4 * 3,
            component_type: COMPONENT_TYPE_UNSIGNED_BYTE,
            count,
            type_: "VEC3".to_string(),
            min: None,
            max: None,
            normalized: true,
        },
    ];

    let meshes = vec![Mesh {
        primitives: vec![MeshPrimitive {
            attributes: BTreeMap::from([
                ("POSITION".to_string(), 0),
                ("COLOR_0".to_string(), 1),
            ]),
            mode: PRIMITIVE_MODE_POINTS,
        }],
    }];

    let gltf = Gltf {
        asset: Asset {
            version: "2.0".to_string(),
        },
        scene: 0,
        scenes: vec![Scene { nodes: vec![0] }],
        nodes: vec![Node { mesh: 0 }],
        meshes,
        accessors,
        buffer_views,
        buffers: vec![Buffer {
            byte_length: bin_content.len() as u32,
        }],
    };

    Ok(Glb {
        json: serde_json::to_vec(&gltf)?,
        bin: bin_content,
    })
}
