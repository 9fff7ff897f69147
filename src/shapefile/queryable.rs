use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

use crate::byte_order::ReadBytesExt;
use crate::dbase::{DbaseFileHeader, DbaseFileReader};
use crate::errors::{GeokitError, Result};
use crate::shapefile::data::column_names;
use crate::shapefile::handlers::{handler_for, ShapeHandler};
use crate::shapefile::{Feature, ShapeType, ShapefileHeader, ShapefileIndexReader};
use crate::vector::{Envelope, GeometryFactory};

/// Where a record's geometry and attributes live on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapefileRecordPointer {
    pub record_number: i32,
    /// Byte offset of the record header in the `.shp` file.
    pub geometry_offset: u64,
    /// Content length in bytes, record header excluded.
    pub geometry_length: u32,
    /// Byte offset of the record in the `.dbf` file.
    pub attribute_offset: u64,
}

type IndexEntry = GeomWithData<Rectangle<[f64; 2]>, ShapefileRecordPointer>;

/// Random-access shapefile reader backed by an in-memory R-tree over the
/// record bounding boxes.
///
/// The index is bulk-loaded once, from a single pass over the `.shx` file.
pub struct QueryableShapefileReader {
    shp: BufReader<File>,
    attributes: DbaseFileReader<BufReader<File>>,
    header: ShapefileHeader,
    handler: Option<Box<dyn ShapeHandler>>,
    factory: GeometryFactory,
    tree: RTree<IndexEntry>,
    extents: Envelope,
}

impl QueryableShapefileReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_factory(path, GeometryFactory::default())
    }

    pub fn open_with_factory<P: AsRef<Path>>(path: P, factory: GeometryFactory) -> Result<Self> {
        let path = path.as_ref();
        let index = ShapefileIndexReader::open(path.with_extension("shx"))?;
        let mut shp = BufReader::new(File::open(path.with_extension("shp"))?);
        let header = ShapefileHeader::read(&mut shp)?;
        let attributes = DbaseFileReader::open(path.with_extension("dbf"))?;
        let handler = match header.shape_type {
            ShapeType::Null => None,
            shape_type => Some(handler_for(shape_type)?),
        };

        let dbf_header = attributes.header();
        let mut entries = Vec::with_capacity(index.remaining());
        let mut extents = Envelope::null();
        for (i, entry) in index.enumerate() {
            let entry = entry?;
            let geometry_offset = entry.offset as u64 * 2;
            shp.seek(SeekFrom::Start(geometry_offset))?;
            let record_number = shp.read_i32_be()?;
            let content_length = shp.read_i32_be()?;
            let Some(bounds) = read_record_bounds(&mut shp)? else {
                continue;
            };
            extents.expand_to_include(&bounds);
            // DBF rows follow file order, whatever the record header says
            let row = i as u64;
            let pointer = ShapefileRecordPointer {
                record_number,
                geometry_offset,
                geometry_length: content_length.max(0) as u32 * 2,
                attribute_offset: dbf_header.header_length() as u64
                    + dbf_header.record_length() as u64 * row,
            };
            let rectangle = Rectangle::from_corners(
                [bounds.min_x(), bounds.min_y()],
                [bounds.max_x(), bounds.max_y()],
            );
            entries.push(GeomWithData::new(rectangle, pointer));
        }
        let tree = RTree::bulk_load(entries);
        tracing::debug!(
            path = %path.display(),
            records = tree.size(),
            "spatial index built"
        );
        Ok(QueryableShapefileReader {
            shp,
            attributes,
            header,
            handler,
            factory,
            tree,
            extents,
        })
    }

    pub fn header(&self) -> &ShapefileHeader {
        &self.header
    }

    pub fn dbase_header(&self) -> &DbaseFileHeader {
        self.attributes.header()
    }

    /// Union of the bounding boxes of every indexed record.
    pub fn extents(&self) -> Envelope {
        self.extents
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// `"Geometry"` followed by the DBF column names.
    pub fn column_names(&self) -> Vec<String> {
        column_names(self.attributes.header())
    }

    /// Features whose bounding box intersects `envelope`, in record order.
    ///
    /// Records deleted in the DBF file are left out.
    pub fn query(&mut self, envelope: &Envelope) -> Result<Vec<Feature>> {
        if envelope.is_null() {
            return Ok(Vec::new());
        }
        let aabb = AABB::from_corners(
            [envelope.min_x(), envelope.min_y()],
            [envelope.max_x(), envelope.max_y()],
        );
        let mut pointers: Vec<ShapefileRecordPointer> = self
            .tree
            .locate_in_envelope_intersecting(&aabb)
            .map(|entry| entry.data)
            .collect();
        pointers.sort_by_key(|p| p.record_number);

        let mut features = Vec::with_capacity(pointers.len());
        let mut content = Vec::new();
        for pointer in pointers {
            let Some(values) = self
                .attributes
                .read_record_at_offset(pointer.attribute_offset)?
            else {
                continue;
            };
            let handler = self.handler.as_ref().ok_or_else(|| {
                GeokitError::format("shapefile", "records found in a file of Null shapes")
            })?;
            self.shp
                .seek(SeekFrom::Start(pointer.geometry_offset + 8))?;
            content.resize(pointer.geometry_length as usize, 0);
            self.shp.read_exact(&mut content)?;
            let geometry = handler.read(&mut Cursor::new(&content), &self.factory)?;
            features.push(Feature {
                record_number: pointer.record_number,
                geometry,
                values,
            });
        }
        Ok(features)
    }
}

/// Bounding box from a record's content prefix. `None` for null shapes.
fn read_record_bounds<R: Read>(r: &mut R) -> Result<Option<Envelope>> {
    let shape_type = ShapeType::from_code(r.read_i32_le()?)?;
    match shape_type {
        ShapeType::Null => Ok(None),
        ShapeType::Point => {
            let x = r.read_f64_le()?;
            let y = r.read_f64_le()?;
            Ok(Some(Envelope::new(x, x, y, y)))
        }
        _ => {
            let min_x = r.read_f64_le()?;
            let min_y = r.read_f64_le()?;
            let max_x = r.read_f64_le()?;
            let max_y = r.read_f64_le()?;
            Ok(Some(Envelope::new(min_x, max_x, min_y, max_y)))
        }
    }
}
