use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::dbase::{
    DbaseFieldDescriptor, DbaseFieldType, DbaseFileHeader, DbaseFileReader, DbaseFileWriter,
    FieldValue,
};
use crate::errors::{GeokitError, Result};
use crate::shapefile::{ShapefileHeader, ShapefileReader, ShapefileWriter};
use crate::vector::{Geometry, GeometryFactory};

/// One row of a shapefile: a geometry and its attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub record_number: i32,
    pub geometry: Geometry,
    /// Attribute values in DBF column order.
    pub values: Vec<FieldValue>,
}

impl Feature {
    pub fn field(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }
}

/// Name of the geometry column reported ahead of the DBF columns.
pub const GEOMETRY_COLUMN: &str = "Geometry";

pub(crate) fn column_names(dbf: &DbaseFileHeader) -> Vec<String> {
    std::iter::once(GEOMETRY_COLUMN.to_string())
        .chain(dbf.fields().iter().map(|f| f.name.clone()))
        .collect()
}

/// Writes `.shp`, `.shx` and `.dbf` files in lockstep.
pub struct ShapefileDataWriter {
    shapes: ShapefileWriter,
    attributes: DbaseFileWriter,
}

impl ShapefileDataWriter {
    /// Create the three files next to `path`. Declare the attribute columns
    /// before writing the first feature.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(ShapefileDataWriter {
            shapes: ShapefileWriter::create(path)?,
            attributes: DbaseFileWriter::create(path.with_extension("dbf"))?,
        })
    }

    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let shapes = ShapefileWriter::append(path)?;
        let attributes = DbaseFileWriter::append(path.with_extension("dbf"))?;
        if shapes.num_records() as i64 != attributes.num_records() as i64 {
            return Err(GeokitError::format(
                "shapefile",
                format!(
                    "{} shapes but {} attribute records",
                    shapes.num_records(),
                    attributes.num_records()
                ),
            ));
        }
        Ok(ShapefileDataWriter { shapes, attributes })
    }

    pub fn add_column(
        &mut self,
        name: &str,
        field_type: DbaseFieldType,
        length: u8,
        decimal_count: u8,
    ) -> Result<()> {
        self.attributes
            .add_column(name, field_type, length, decimal_count)
    }

    pub fn remove_column(&mut self, name: &str) -> Result<DbaseFieldDescriptor> {
        self.attributes.remove_column(name)
    }

    pub fn shapefile_header(&self) -> &ShapefileHeader {
        self.shapes.header()
    }

    pub fn dbase_header(&self) -> &DbaseFileHeader {
        self.attributes.header()
    }

    /// Write one feature. Nothing is written when either part is rejected.
    ///
    /// The shape is encoded before the attribute record is written, so only an
    /// I/O error can leave the `.dbf` one record ahead of the `.shp`.
    pub fn write(&mut self, geometry: &Geometry, values: &[FieldValue]) -> Result<()> {
        let shape = self.shapes.encode(geometry)?;
        self.attributes.write(values)?;
        self.shapes.write_encoded(shape)
    }

    pub fn write_feature(&mut self, feature: &Feature) -> Result<()> {
        self.write(&feature.geometry, &feature.values)
    }

    pub fn close(self) -> Result<()> {
        let ShapefileDataWriter { shapes, attributes } = self;
        let shapes_result = shapes.close();
        attributes.close()?;
        shapes_result
    }
}

/// Reads `.shp` and `.dbf` files in lockstep. Features whose attribute
/// record is deleted are skipped.
pub struct ShapefileDataReader {
    shapes: ShapefileReader<BufReader<File>>,
    attributes: DbaseFileReader<BufReader<File>>,
}

impl ShapefileDataReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Ok(ShapefileDataReader {
            shapes: ShapefileReader::open(path)?,
            attributes: DbaseFileReader::open(path.with_extension("dbf"))?,
        })
    }

    pub fn with_factory(mut self, factory: GeometryFactory) -> Self {
        self.shapes = self.shapes.with_factory(factory);
        self
    }

    pub fn shapefile_header(&self) -> &ShapefileHeader {
        self.shapes.header()
    }

    pub fn dbase_header(&self) -> &DbaseFileHeader {
        self.attributes.header()
    }

    /// `"Geometry"` followed by the DBF column names.
    pub fn column_names(&self) -> Vec<String> {
        column_names(self.attributes.header())
    }

    fn read_feature(&mut self) -> Result<Option<Feature>> {
        loop {
            let Some(shape) = self.shapes.read_record()? else {
                return Ok(None);
            };
            let record = self.attributes.read_entry()?.ok_or_else(|| {
                GeokitError::format(
                    "shapefile",
                    format!("no attribute record for shape {}", shape.record_number),
                )
            })?;
            if record.deleted {
                continue;
            }
            return Ok(Some(Feature {
                record_number: shape.record_number,
                geometry: shape.geometry,
                values: record.values,
            }));
        }
    }
}

impl Iterator for ShapefileDataReader {
    type Item = Result<Feature>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_feature().transpose()
    }
}
