//! In-memory binary FBX writer for building test fixtures.

#![allow(dead_code)]

use fbx::binary::{ArrayValue, PropertyValue, FBX_MAGIC, LEGACY_VERSION};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

/// A record to encode: header values, leaf children and nested children.
#[derive(Clone, Debug, Default)]
pub struct Record {
    pub name: String,
    pub values: Vec<PropertyValue>,
    pub children: Vec<Record>,
}

impl Record {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn value(mut self, value: PropertyValue) -> Self {
        self.values.push(value);
        self
    }

    pub fn child(mut self, child: Record) -> Self {
        self.children.push(child);
        self
    }

    /// Shorthand for a leaf record holding `values`.
    pub fn leaf(name: &str, values: Vec<PropertyValue>) -> Self {
        Self {
            name: name.to_string(),
            values,
            children: Vec::new(),
        }
    }
}

pub fn string(s: &str) -> PropertyValue {
    PropertyValue::String(s.to_string())
}

pub fn f64_array(values: &[f64]) -> PropertyValue {
    PropertyValue::Array(ArrayValue::Float64(values.to_vec()))
}

pub fn i32_array(values: &[i32]) -> PropertyValue {
    PropertyValue::Array(ArrayValue::Int32(values.to_vec()))
}

/// Encoder settings.
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    pub version: u32,
    /// Zlib-compress every array payload.
    pub compress: bool,
}

impl Encoder {
    pub fn new(version: u32) -> Self {
        Self { version, compress: false }
    }

    pub fn compressed(version: u32) -> Self {
        Self { version, compress: true }
    }

    fn is_legacy(&self) -> bool {
        self.version == LEGACY_VERSION
    }

    /// Encode `records` as the top level of a complete file.
    pub fn encode(&self, records: &[Record]) -> Vec<u8> {
        let mut out = FBX_MAGIC.to_vec();
        out.extend_from_slice(&[0x1A, 0x00]);
        out.extend_from_slice(&self.version.to_le_bytes());

        for record in records {
            self.write_record(&mut out, record);
        }
        self.write_null_record(&mut out);

        // Footer: opaque to the reader
        out.extend_from_slice(&[0xFA, 0xBC, 0xAB, 0x09, 0xD0, 0xC8, 0xD4, 0x66]);
        out.extend_from_slice(&[0u8; 16]);
        out
    }

    fn write_field(&self, out: &mut Vec<u8>, value: u64) {
        if self.is_legacy() {
            out.extend_from_slice(&(value as u32).to_le_bytes());
        } else {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }

    fn patch_field(&self, out: &mut [u8], at: usize, value: u64) {
        if self.is_legacy() {
            out[at..at + 4].copy_from_slice(&(value as u32).to_le_bytes());
        } else {
            out[at..at + 8].copy_from_slice(&value.to_le_bytes());
        }
    }

    fn field_size(&self) -> usize {
        if self.is_legacy() { 4 } else { 8 }
    }

    fn write_null_record(&self, out: &mut Vec<u8>) {
        let size = 3 * self.field_size() + 1;
        out.extend(std::iter::repeat(0u8).take(size));
    }

    fn write_record(&self, out: &mut Vec<u8>, record: &Record) {
        let start = out.len();
        self.write_field(out, 0); // end offset, patched below
        self.write_field(out, record.values.len() as u64);
        self.write_field(out, 0); // property list length, patched below
        out.push(record.name.len() as u8);
        out.extend_from_slice(record.name.as_bytes());

        let list_start = out.len();
        for value in &record.values {
            self.write_value(out, value);
        }
        let list_len = (out.len() - list_start) as u64;

        if !record.children.is_empty() {
            for child in &record.children {
                self.write_record(out, child);
            }
            self.write_null_record(out);
        }

        let end = out.len() as u64;
        self.patch_field(out, start, end);
        self.patch_field(out, start + 2 * self.field_size(), list_len);
    }

    fn write_value(&self, out: &mut Vec<u8>, value: &PropertyValue) {
        match value {
            PropertyValue::Bool(v) => {
                out.push(b'C');
                out.push(*v as u8);
            }
            PropertyValue::Int16(v) => {
                out.push(b'Y');
                out.extend_from_slice(&v.to_le_bytes());
            }
            PropertyValue::Int32(v) => {
                out.push(b'I');
                out.extend_from_slice(&v.to_le_bytes());
            }
            PropertyValue::Int64(v) => {
                out.push(b'L');
                out.extend_from_slice(&v.to_le_bytes());
            }
            PropertyValue::Float32(v) => {
                out.push(b'F');
                out.extend_from_slice(&v.to_le_bytes());
            }
            PropertyValue::Float64(v) => {
                out.push(b'D');
                out.extend_from_slice(&v.to_le_bytes());
            }
            PropertyValue::String(s) => {
                out.push(b'S');
                out.extend_from_slice(&(s.len() as u32).to_le_bytes());
                out.extend_from_slice(s.as_bytes());
            }
            PropertyValue::Raw(bytes) => {
                out.push(b'R');
                out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
                out.extend_from_slice(bytes);
            }
            PropertyValue::Array(array) => {
                let (tag, payload): (u8, Vec<u8>) = match array {
                    ArrayValue::Bool(v) => (b'b', v.iter().map(|&b| b as u8).collect()),
                    ArrayValue::Int32(v) => (b'i', v.iter().flat_map(|x| x.to_le_bytes()).collect()),
                    ArrayValue::Int64(v) => (b'l', v.iter().flat_map(|x| x.to_le_bytes()).collect()),
                    ArrayValue::Float32(v) => (b'f', v.iter().flat_map(|x| x.to_le_bytes()).collect()),
                    ArrayValue::Float64(v) => (b'd', v.iter().flat_map(|x| x.to_le_bytes()).collect()),
                    ArrayValue::Untyped => panic!("cannot encode an untyped array"),
                };
                self.write_array(out, tag, array.len(), &payload);
            }
        }
    }

    fn write_array(&self, out: &mut Vec<u8>, tag: u8, count: usize, payload: &[u8]) {
        let (encoding, stored) = if self.compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(payload).unwrap();
            (1u32, encoder.finish().unwrap())
        } else {
            (0u32, payload.to_vec())
        };

        out.push(tag);
        out.extend_from_slice(&(count as u32).to_le_bytes());
        out.extend_from_slice(&encoding.to_le_bytes());
        out.extend_from_slice(&(stored.len() as u32).to_le_bytes());
        out.extend_from_slice(&stored);
    }
}

pub const CUBE_VERTICES: [f64; 24] = [
    -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0, 1.0, 1.0, 1.0,
    -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, -1.0, -1.0,
];

pub const CUBE_POLYGON_VERTEX_INDEX: [i32; 24] = [
    0, 1, 3, -3, 2, 3, 5, -5, 4, 5, 7, -7, 6, 7, 1, -1, 1, 7, 5, -4, 6, 0, 2, -5,
];

/// Polygon vertex positions starting each of the 12 cube edges.
pub const CUBE_EDGES: [i32; 12] = [0, 1, 2, 3, 4, 6, 7, 10, 11, 13, 18, 19];

pub const CUBE_GEOMETRY_ID: i64 = 2_035_615_390_896;
pub const CUBE_MODEL_ID: i64 = 2_035_615_390_000;

/// A minimal scene with one cube: header, geometry with normal and UV
/// layers, model and connections.
pub fn cube_scene() -> Vec<Record> {
    let normals: Vec<f64> = [
        [0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, -1.0],
        [0.0, -1.0, 0.0],
        [1.0, 0.0, 0.0],
        [-1.0, 0.0, 0.0],
    ]
    .iter()
    .flat_map(|n| std::iter::repeat(*n).take(4))
    .flatten()
    .collect();

    let header = Record::new("FBXHeaderExtension")
        .child(Record::leaf("FBXHeaderVersion", vec![PropertyValue::Int32(1003)]))
        .child(Record::leaf("Creator", vec![string("fbx test encoder")]));

    let geometry = Record::new("Geometry")
        .value(PropertyValue::Int64(CUBE_GEOMETRY_ID))
        .value(string("Cube\u{0}\u{1}Geometry"))
        .value(string("Mesh"))
        .child(Record::leaf("Vertices", vec![f64_array(&CUBE_VERTICES)]))
        .child(Record::leaf("PolygonVertexIndex", vec![i32_array(&CUBE_POLYGON_VERTEX_INDEX)]))
        .child(Record::leaf("Edges", vec![i32_array(&CUBE_EDGES)]))
        .child(Record::leaf("GeometryVersion", vec![PropertyValue::Int32(124)]))
        .child(
            Record::new("LayerElementNormal")
                .value(PropertyValue::Int32(0))
                .child(Record::leaf("Version", vec![PropertyValue::Int32(102)]))
                .child(Record::leaf("MappingInformationType", vec![string("ByPolygonVertex")]))
                .child(Record::leaf("ReferenceInformationType", vec![string("Direct")]))
                .child(Record::leaf("Normals", vec![f64_array(&normals)])),
        )
        .child(
            Record::new("LayerElementUV")
                .value(PropertyValue::Int32(0))
                .child(Record::leaf("MappingInformationType", vec![string("ByPolygonVertex")]))
                .child(Record::leaf("ReferenceInformationType", vec![string("IndexToDirect")]))
                .child(Record::leaf("UV", vec![f64_array(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])]))
                .child(Record::leaf("UVIndex", vec![i32_array(&[0, 1, 2, 3].repeat(6))])),
        );

    let model = Record::new("Model")
        .value(PropertyValue::Int64(CUBE_MODEL_ID))
        .value(string("Cube\u{0}\u{1}Model"))
        .value(string("Mesh"))
        .child(Record::leaf("Version", vec![PropertyValue::Int32(232)]))
        .child(
            Record::new("Properties70").child(Record::leaf("P", vec![
                string("Lcl Translation"),
                string("Lcl Translation"),
                string(""),
                string("A"),
                PropertyValue::Float64(0.0),
                PropertyValue::Float64(2.5),
                PropertyValue::Float64(0.0),
            ])),
        );

    let objects = Record::new("Objects").child(geometry).child(model);

    let connections = Record::new("Connections")
        .child(Record::leaf("C", vec![string("OO"), PropertyValue::Int64(CUBE_MODEL_ID), PropertyValue::Int64(0)]))
        .child(Record::leaf("C", vec![
            string("OO"),
            PropertyValue::Int64(CUBE_GEOMETRY_ID),
            PropertyValue::Int64(CUBE_MODEL_ID),
        ]));

    vec![header, objects, connections]
}
