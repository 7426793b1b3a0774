//! # Path Delta Encoding
//!
//! A navigation path is sent as offsets from the previous vertex, starting at
//! the origin. Offsets between nearby vertices are small, so each component
//! usually fits in one or two bytes.
//!
//! ```text
//! goal_index varint │ count varint │ node 0 │ node 1 │ ...
//!
//! node: offset.x │ offset.y │ offset.z │ side_radius
//!       (quantized vec3)                 (zigzag i32)
//!
//! side_radius =  round(radius)   side Right
//!               -round(radius)   side Left
//!                0               side Point
//! ```
//!
//! The decoder rebuilds absolute vertices by accumulating offsets. The encoder
//! takes each offset against the vertex the decoder will have rebuilt, not
//! the original one, so rounding error never carries from node to node: every
//! decoded vertex is within half a step of its source.

use std::fmt;

use paragon_shared::Vec3;

use crate::error::CodecError;
use crate::transfer::TransferStatus;
use crate::wire::{requantize, WireReader, WireWriter};

/// Smallest encoded node: three one-byte offsets and a one-byte side radius.
pub const MIN_NODE_BYTES: usize = 4;

/// Which side of a vertex the path bends around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NaviSide {
    /// Passes the vertex on its left.
    Left,
    /// Passes the vertex on its right.
    Right,
    /// Passes through the vertex with no lateral offset.
    #[default]
    Point,
}

/// One vertex of a movement path.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PathNode {
    /// Absolute world position.
    pub vertex: Vec3,
    /// Side the path passes on.
    pub side: NaviSide,
    /// Lateral clearance. Meaningful only when `side` is not `Point`.
    pub radius: f32,
}

impl PathNode {
    /// A node the path passes straight through.
    #[must_use]
    pub const fn point(vertex: Vec3) -> Self {
        Self {
            vertex,
            side: NaviSide::Point,
            radius: 0.0,
        }
    }

    /// A node the path bends around.
    #[must_use]
    pub const fn new(vertex: Vec3, side: NaviSide, radius: f32) -> Self {
        Self {
            vertex,
            side,
            radius,
        }
    }

    /// Packs side and radius into one signed integer.
    ///
    /// A `Point` node always packs to 0 whatever its radius.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn side_radius(&self) -> i32 {
        let magnitude = self.radius.abs().round() as i32;
        match self.side {
            NaviSide::Left => -magnitude,
            NaviSide::Right => magnitude,
            NaviSide::Point => 0,
        }
    }

    /// Unpacks a side radius value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn unpack_side_radius(value: i32) -> (NaviSide, f32) {
        match value {
            0 => (NaviSide::Point, 0.0),
            v if v < 0 => (NaviSide::Left, v.unsigned_abs() as f32),
            v => (NaviSide::Right, v as f32),
        }
    }
}

impl fmt::Display for PathNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} side={:?} radius={}", self.vertex, self.side, self.radius)
    }
}

/// Writes one node as an offset from `previous_vertex`.
///
/// Returns the vertex a decoder rebuilds from the written offset, which is
/// the `previous_vertex` for the next node.
pub fn write_path_node(
    writer: &mut WireWriter,
    node: &PathNode,
    previous_vertex: Vec3,
    precision_bits: u8,
) -> Vec3 {
    let offset = node.vertex - previous_vertex;
    writer.write_quantized_vec3(offset, precision_bits);
    writer.write_zigzag_i32(node.side_radius());
    previous_vertex
        + Vec3::new(
            requantize(offset.x, precision_bits),
            requantize(offset.y, precision_bits),
            requantize(offset.z, precision_bits),
        )
}

/// Reads one node, rebuilding its vertex from `previous_vertex`.
pub fn read_path_node(
    reader: &mut WireReader<'_>,
    previous_vertex: Vec3,
    precision_bits: u8,
    status: &mut TransferStatus,
) -> PathNode {
    let offset = status.take(reader.read_quantized_vec3(precision_bits));
    let (side, radius) = PathNode::unpack_side_radius(status.take(reader.read_zigzag_i32()));
    PathNode {
        vertex: previous_vertex + offset,
        side,
        radius,
    }
}

/// Writes goal index, node count and every node.
///
/// A negative goal index is logged and sent as its two's complement bits.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn write_path(writer: &mut WireWriter, goal_node_index: i32, nodes: &[PathNode], precision_bits: u8) {
    if goal_node_index < 0 {
        tracing::warn!("write_path(): path goal node index {} < 0", goal_node_index);
    }
    writer.write_varint_u32(goal_node_index as u32);
    writer.write_varint_u32(nodes.len() as u32);

    let mut previous_vertex = Vec3::ZERO;
    for node in nodes {
        previous_vertex = write_path_node(writer, node, previous_vertex, precision_bits);
    }
}

/// Reads goal index and nodes into `nodes`, replacing its contents.
///
/// The declared node count is drained in full even after a failed node. A
/// count that cannot fit in the buffer, or exceeds `max_nodes`, is recorded
/// as malformed and no nodes are read.
#[allow(clippy::cast_possible_wrap)]
pub fn read_path(
    reader: &mut WireReader<'_>,
    precision_bits: u8,
    max_nodes: u32,
    nodes: &mut Vec<PathNode>,
    status: &mut TransferStatus,
) -> i32 {
    let goal_node_index = status.take(reader.read_varint_u32()) as i32;
    let declared = status.take(reader.read_varint_u32());

    nodes.clear();
    if declared > max_nodes {
        status.record(CodecError::MalformedCount {
            what: "path nodes",
            count: u64::from(declared),
            remaining: reader.remaining(),
        });
        return goal_node_index;
    }
    let count = match reader.check_count("path nodes", u64::from(declared), MIN_NODE_BYTES) {
        Ok(count) => count,
        Err(error) => {
            status.record(error);
            return goal_node_index;
        }
    };

    nodes.reserve(count);
    let mut previous_vertex = Vec3::ZERO;
    for _ in 0..count {
        let node = read_path_node(reader, previous_vertex, precision_bits, status);
        previous_vertex = node.vertex;
        nodes.push(node);
    }
    goal_node_index
}
