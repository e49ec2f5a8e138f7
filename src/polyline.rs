//! Encoded polyline codec (precision 1e5) and the decoded `Polyline` type.
//!
//! The routing service returns geometries as compact ASCII strings. Each
//! coordinate is stored as a delta against the previous one, latitude first,
//! zigzag-encoded and split into 5-bit chunks offset by 63.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::RouteError;

const PRECISION: f64 = 1e5;
const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION: i64 = 0x20;
const OFFSET: u8 = 63;

/// Decodes an encoded polyline into coordinates.
///
/// The empty string yields an empty sequence. A value cut off before its
/// terminating chunk, a byte outside the codec alphabet, a value too long
/// for 64 bits, or a point outside the valid coordinate ranges fails with
/// [`RouteError::MalformedPolyline`]. For out-of-range points the position
/// is the first byte of that point.
pub fn decode(encoded: &str) -> Result<Vec<Coordinate>, RouteError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut coords = Vec::new();

    while index < bytes.len() {
        let start = index;
        lat = lat.wrapping_add(next_value(bytes, &mut index)?);
        lon = lon.wrapping_add(next_value(bytes, &mut index)?);
        let point = Coordinate::new(lat as f64 / PRECISION, lon as f64 / PRECISION)
            .map_err(|_| RouteError::MalformedPolyline { position: start })?;
        coords.push(point);
    }

    Ok(coords)
}

/// Reads one zigzag-encoded delta starting at `*index`.
fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, RouteError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;

    loop {
        let position = *index;
        let byte = *bytes
            .get(position)
            .ok_or(RouteError::MalformedPolyline { position })?;
        if !(OFFSET..=OFFSET + 63).contains(&byte) || shift >= 64 {
            return Err(RouteError::MalformedPolyline { position });
        }
        *index += 1;

        let chunk = i64::from(byte - OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        shift += CHUNK_BITS;

        if chunk & CONTINUATION == 0 {
            break;
        }
    }

    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

/// Encodes coordinates as a polyline string.
///
/// Values are rounded to 5 decimals, so `decode(encode(cs))` matches `cs`
/// within 1e-5 degrees.
pub fn encode(coords: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;

    for coord in coords {
        let lat = scaled(coord.lat());
        let lon = scaled(coord.lon());
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }

    out
}

fn scaled(value: f64) -> i64 {
    (value * PRECISION).round() as i64
}

fn push_value(out: &mut String, delta: i64) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };
    while value >= CONTINUATION {
        out.push(char::from((CONTINUATION | (value & CHUNK_MASK)) as u8 + OFFSET));
        value >>= CHUNK_BITS;
    }
    out.push(char::from(value as u8 + OFFSET));
}

/// A polyline representing a route geometry as decoded coordinates.
///
/// Encoding to and from the compact string form happens at the service
/// boundary; inside the crate geometry is handled as points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Parses an encoded polyline string.
    pub fn decode(encoded: &str) -> Result<Self, RouteError> {
        decode(encoded).map(Self::new)
    }

    /// Encodes the points back into the compact string form.
    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Points as `[lat, lng]` pairs, the shape map widgets consume.
    pub fn to_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|point| point.to_pair()).collect()
    }
}
