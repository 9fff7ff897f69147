use std::env;
use std::path::PathBuf;

use geokit::dbase::{DbaseFieldType, FieldValue};
use geokit::errors::Result;
use geokit::shapefile::{QueryableShapefileReader, ShapefileDataReader, ShapefileDataWriter};
use geokit::spatial_ref::air_distance;
use geokit::vector::{Envelope, Geometry};

fn run() -> Result<()> {
    let path: PathBuf = env::temp_dir().join("geokit_demo_cities.shp");

    // Create a new shapefile with three attribute columns:
    let mut writer = ShapefileDataWriter::create(&path)?;
    writer.add_column("NAME", DbaseFieldType::Character, 24, 0)?;
    writer.add_column("POP_K", DbaseFieldType::Numeric, 8, 0)?;
    writer.add_column("CAPITAL", DbaseFieldType::Logical, 1, 0)?;

    let cities: [(&str, &str, i32, bool); 5] = [
        ("POINT (2.3522 48.8566)", "Paris", 2102, true),
        ("POINT (4.8357 45.7640)", "Lyon", 522, false),
        ("POINT (5.3698 43.2965)", "Marseille", 873, false),
        ("POINT (-0.5792 44.8378)", "Bordeaux", 261, false),
        ("POINT (13.4050 52.5200)", "Berlin", 3878, true),
    ];
    for (wkt, name, population, capital) in cities {
        let values: [FieldValue; 3] = [name.into(), population.into(), capital.into()];
        writer.write(&Geometry::from_wkt(wkt)?, &values)?;
    }
    writer.close()?;

    // Read every feature back, in file order:
    let reader = ShapefileDataReader::open(&path)?;
    println!("Columns: {:?}", reader.column_names());
    for feature in reader {
        let feature = feature?;
        println!("#{} {} {:?}", feature.record_number, feature.geometry, feature.values);
    }

    // Query the French mainland through the spatial index:
    let mut indexed = QueryableShapefileReader::open(&path)?;
    println!("\nExtents: {:?}", indexed.extents());
    let france = Envelope::new(-5.0, 8.5, 42.0, 51.5);
    let paris = Geometry::from_wkt("POINT (2.3522 48.8566)")?.coordinates()[0];
    for feature in indexed.query(&france)? {
        let coord = feature.geometry.coordinates()[0];
        println!(
            "{:?}: {:.0} km from Paris",
            feature.values[0],
            air_distance(paris, coord)?
        );
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();
    run().unwrap();
}
