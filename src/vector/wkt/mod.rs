//! Well-Known Text geometry codec.
//!
//! ```
//! use geokit::vector::wkt::{WktReader, WktWriter};
//!
//! let geometry = WktReader::default()
//!     .read("polygon((1 1,10 1,10 10,1 10,1 1),(4 4,5 4,5 5,4 5,4 4))")
//!     .unwrap();
//! assert_eq!(
//!     WktWriter::new().write(&geometry),
//!     "POLYGON ((1 1, 10 1, 10 10, 1 10, 1 1), (4 4, 5 4, 5 5, 4 5, 4 4))"
//! );
//! ```

mod reader;
mod tokenizer;
mod writer;

pub use reader::WktReader;
pub use tokenizer::{Token, Tokenizer};
pub use writer::WktWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::vector::{Geometry, GeometryFactory, PrecisionModel};

    fn read(wkt: &str) -> Geometry {
        WktReader::default().read(wkt).unwrap()
    }

    fn squash(s: &str) -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase()
    }

    fn assert_round_trip(wkt: &str) {
        let written = WktWriter::new().write(&read(wkt));
        assert_eq!(squash(&written), squash(wkt), "round trip of {wkt}");
    }

    #[test]
    fn test_round_trips() {
        for wkt in [
            "POINT ( 3 4 )",
            "POINT EMPTY",
            "LINESTRING(50 31, 54 31, 54 29, 50 29, 50 31 )",
            "LINESTRING EMPTY",
            "POLYGON( ( 50 31, 54 31, 54 29, 50 29, 50 31) )",
            "POLYGON((1 1,10 1,10 10,1 10,1 1),(4 4,5 4,5 5,4 5,4 4))",
            "POLYGON EMPTY",
            "MULTIPOINT( 23 24, 34 35)",
            "MULTIPOINT EMPTY",
            "MULTILINESTRING((10 10, 20 20), (15 15, 30 15))",
            "MULTILINESTRING EMPTY",
            "MULTIPOLYGON(((10 10, 10 20, 20 20, 20 15, 10 10)), ((60 60, 70 70, 80 60, 60 60)))",
            "MULTIPOLYGON EMPTY",
            "GEOMETRYCOLLECTION(POINT (10 10), POINT (30 30), LINESTRING (15 15, 20 20))",
            "GEOMETRYCOLLECTION EMPTY",
        ] {
            assert_round_trip(wkt);
        }
    }

    #[test]
    fn test_read_point() {
        match read("POINT ( 3 4 )") {
            Geometry::Point(p) => {
                assert!(!p.is_empty());
                assert_eq!(p.x(), Some(3.0));
                assert_eq!(p.y(), Some(4.0));
            }
            other => panic!("expected a point, got {other:?}"),
        }
        assert!(read("point empty").is_empty());
    }

    #[test]
    fn test_read_polygon_with_hole() {
        let wkt = "POLYGON((1 1,10 1,10 10,1 10,1 1),(4 4,5 4,5 5,4 5,4 4))";
        match read(wkt) {
            Geometry::Polygon(p) => {
                assert_eq!(p.num_interior_rings(), 1);
                assert_eq!(p.exterior().num_points(), 5);
            }
            other => panic!("expected a polygon, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_point_forms() {
        let bare = read("MULTIPOINT (1 2, 3 4)");
        let nested = read("MULTIPOINT ((1 2), (3 4))");
        assert_eq!(bare, nested);
        assert_eq!(bare.num_geometries(), 2);
        assert_eq!(WktWriter::new().write(&nested), "MULTIPOINT (1 2, 3 4)");
    }

    #[test]
    fn test_failure_kinds() {
        let reader = WktReader::default();
        for bad in [
            "POINT *( 3  4 )",
            "POINT ( 3  , 4 )",
            "MULTIPOINT EMPTY2 ",
            "TRIANGLE ((0 0, 1 0, 0 1, 0 0))",
            "POINT (1 2) POINT (3 4)",
            "LINESTRING (1 2, 3",
            "  ",
            "",
        ] {
            let err = reader.read(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "{bad:?} gave {err}");
        }
        let err = reader.read("POLYGON ((0 0, 1 0, 1 1, 0 1))").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_numbers_are_not_scientific() {
        let wkt = "POINT (123456789012345680000 0.000001)";
        let written = WktWriter::new().write(&read(wkt));
        assert_eq!(written, wkt);
        assert!(!written.contains('e'));
    }

    #[test]
    fn test_reader_applies_precision_model() {
        let reader = WktReader::new(GeometryFactory::new(PrecisionModel::fixed(1.0), 0));
        let geom = reader.read("LINESTRING (1.4 1.6, 2.5 -2.5)").unwrap();
        assert_eq!(WktWriter::new().write(&geom), "LINESTRING (1 2, 3 -2)");
    }

    #[test]
    fn test_formatted_output() {
        let geom = read(
            "GEOMETRYCOLLECTION(POINT (1 2), POLYGON((1 1,10 1,10 10,1 10,1 1),(4 4,5 4,5 5,4 5,4 4)))",
        );
        let expected = "GEOMETRYCOLLECTION (POINT (1 2), \n  POLYGON ((1 1, 10 1, 10 10, 1 10, 1 1), \n    (4 4, 5 4, 5 5, 4 5, 4 4)))";
        assert_eq!(WktWriter::formatted().write(&geom), expected);
        assert_eq!(format!("{geom:#}"), expected);
    }

    #[test]
    fn test_formatted_long_line_wraps() {
        let coords: Vec<String> = (0..11).map(|i| format!("{i} {i}")).collect();
        let geom = read(&format!("MULTILINESTRING (({}), (0 0, 1 1))", coords.join(", ")));
        let written = WktWriter::formatted().write(&geom);
        assert!(written.contains("9 9, \n    10 10"));
        assert!(written.ends_with(", \n  (0 0, 1 1))"));
    }

    #[test]
    fn test_linear_ring_writes_as_line_string() {
        let ring = read("LINEARRING (0 0, 1 0, 1 1, 0 0)");
        assert!(matches!(ring, Geometry::LinearRing(_)));
        assert_eq!(
            WktWriter::new().write(&ring),
            "LINESTRING (0 0, 1 0, 1 1, 0 0)"
        );
    }
}
