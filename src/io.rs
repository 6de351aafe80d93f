//! Text input and output around the core engine.
//!
//! Input is a stream of `name,x,y,z` records. Fields are separated by commas
//! or newlines, so a record may be written on one line or spread over
//! several. Output is one `name:distance` line per finalized vertex.

use std::borrow::Borrow;
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::error::{ProximityError, Result};
use crate::graph::{PathRecord, Vertex};

const FIELDS_PER_RECORD: usize = 4;
const COORDINATE_FIELDS: [&str; 3] = ["x", "y", "z"];

/// Parse `name,x,y,z` records into vertices, preserving input order.
///
/// Blank fields (trailing newlines, `\r\n` line endings, empty lines) are
/// ignored. Records are numbered from 1 in error messages.
pub fn parse_vertices(input: &str) -> Result<Vec<Vertex>> {
    let fields: Vec<&str> = input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect();

    let mut vertices = Vec::with_capacity(fields.len() / FIELDS_PER_RECORD);
    for (i, chunk) in fields.chunks(FIELDS_PER_RECORD).enumerate() {
        let record = i + 1;
        if chunk.len() != FIELDS_PER_RECORD {
            return Err(ProximityError::MalformedRecord {
                record,
                reason: format!(
                    "expected {FIELDS_PER_RECORD} fields (name,x,y,z), found {}",
                    chunk.len()
                ),
            });
        }

        let mut coordinates = [0.0f64; 3];
        for (slot, (&raw, field)) in chunk[1..].iter().zip(COORDINATE_FIELDS).enumerate() {
            coordinates[slot] = parse_coordinate(raw, record, field)?;
        }

        let [x, y, z] = coordinates;
        vertices.push(Vertex::new(chunk[0], x, y, z));
    }

    log::debug!("parsed {} vertices", vertices.len());
    Ok(vertices)
}

fn parse_coordinate(raw: &str, record: usize, field: &'static str) -> Result<f64> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ProximityError::InvalidCoordinate {
            record,
            field,
            value: raw.to_string(),
        })
}

/// Write one `name:distance` line per record, in the order received.
///
/// Returns the number of lines written.
pub fn write_paths<W, I, R>(mut writer: W, records: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: Borrow<PathRecord>,
{
    let mut written = 0;
    for record in records {
        writeln!(writer, "{}", record.borrow())?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Render records as `name:distance` lines.
pub fn render_paths<I, R>(records: I) -> String
where
    I: IntoIterator<Item = R>,
    R: Borrow<PathRecord>,
{
    let mut out = String::new();
    for record in records {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}", record.borrow());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Point3, ProximityGraph};

    #[test]
    fn test_parse_lines() {
        let vertices = parse_vertices("A,0,0,0\nB,1.5,-2,3e1\n").unwrap();

        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].name(), "A");
        assert_eq!(vertices[1].name(), "B");
        assert_eq!(vertices[1].position(), Point3::new(1.5, -2.0, 30.0));
    }

    #[test]
    fn test_parse_crlf_and_blank_lines() {
        let vertices = parse_vertices("A,0,0,0\r\n\r\nB,1,0,0\r\n").unwrap();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position(), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_record_split_across_lines() {
        let vertices = parse_vertices("A\n0\n0\n0\nB,1\n2,3").unwrap();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[1].position(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_vertices("").unwrap().is_empty());
        assert!(parse_vertices("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_incomplete_record() {
        let err = parse_vertices("A,0,0,0\nB,1,2\n").unwrap_err();
        assert!(matches!(err, ProximityError::MalformedRecord { record: 2, .. }));
    }

    #[test]
    fn test_parse_invalid_coordinate() {
        let err = parse_vertices("A,0,zero,0").unwrap_err();
        assert_eq!(
            err,
            ProximityError::InvalidCoordinate {
                record: 1,
                field: "y",
                value: "zero".to_string(),
            }
        );

        let err = parse_vertices("A,0,0,NaN").unwrap_err();
        assert!(matches!(
            err,
            ProximityError::InvalidCoordinate { field: "z", .. }
        ));
    }

    #[test]
    fn test_write_paths() {
        let vertices = parse_vertices("A,0,0,0\nB,1,0,0\nC,4,0,0\nD,100,100,100\n").unwrap();
        let graph = ProximityGraph::build(vertices).unwrap();

        let mut out = Vec::new();
        let written = write_paths(&mut out, graph.shortest_paths()).unwrap();

        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "B:1.0\nC:4.0\n");
    }

    #[test]
    fn test_render_paths_by_reference() {
        let graph = ProximityGraph::build(parse_vertices("A,0,0,0\nB,0,0,2.5").unwrap()).unwrap();
        let records: Vec<_> = graph.shortest_paths().collect();

        assert_eq!(render_paths(&records), "B:2.5\n");
        assert_eq!(render_paths(Vec::<PathRecord>::new()), "");
    }
}
