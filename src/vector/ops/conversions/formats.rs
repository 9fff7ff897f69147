use crate::byte_order::ByteOrder;
use crate::errors::Result;
use crate::vector::wkb::{WkbReader, WkbWriter};
use crate::vector::wkt::{WktReader, WktWriter};
use crate::vector::Geometry;

/// Methods supporting translation between [`Geometry`] and the
/// ["Well Known" representations of geometry][wikipedia].
///
/// These use a default [`GeometryFactory`](crate::vector::GeometryFactory) with a
/// floating precision model. Use [`WktReader`] / [`WkbReader`] directly to parse
/// onto a fixed grid.
///
/// [wikipedia]: https://en.wikipedia.org/wiki/Well-known_text_representation_of_geometry
impl Geometry {
    /// Create a geometry by parsing a
    /// [WKT](https://en.wikipedia.org/wiki/Well-known_text_representation_of_geometry) string.
    pub fn from_wkt(wkt: &str) -> Result<Geometry> {
        WktReader::default().read(wkt)
    }

    /// Creates a geometry by parsing a slice of bytes in
    /// [WKB](https://en.wikipedia.org/wiki/Well-known_text_representation_of_geometry#Well-known_binary)
    /// (Well-Known Binary) format.
    pub fn from_wkb(wkb: &[u8]) -> Result<Geometry> {
        WkbReader::default().read(wkb)
    }

    /// Serialize the geometry as WKT.
    pub fn wkt(&self) -> String {
        WktWriter::new().write(self)
    }

    /// Serialize the geometry as indented, multi-line WKT.
    pub fn wkt_formatted(&self) -> String {
        WktWriter::formatted().write(self)
    }

    /// Serializes the geometry to
    /// [WKB](https://en.wikipedia.org/wiki/Well-known_text_representation_of_geometry#Well-known_binary)
    /// (Well-Known Binary) format.
    pub fn wkb(&self) -> Result<Vec<u8>> {
        // We default to little-endian. A WKB string explicitly indicates the byte
        // order, so this is not a problem for interoperability.
        self.wkb_with_byte_order(ByteOrder::LittleEndian)
    }

    pub fn wkb_with_byte_order(&self, byte_order: ByteOrder) -> Result<Vec<u8>> {
        WkbWriter::new(byte_order).write(self)
    }
}
