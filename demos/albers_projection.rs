use geokit::errors::Result;
use geokit::spatial_ref::{CoordTransform, Ellipsoid, ProjectionParameters};
use geokit::vector::Geometry;

fn run() -> Result<()> {
    // USGS contiguous United States Albers parameters:
    let params = ProjectionParameters::for_ellipsoid(Ellipsoid::GRS80)
        .with("central_meridian", -96.0)
        .with("latitude_of_origin", 23.0)
        .with("standard_parallel_1", 29.5)
        .with("standard_parallel_2", 45.5)
        .with("false_easting", 0.0)
        .with("false_northing", 0.0);
    let htransform = CoordTransform::from_projection("albers_conic_equal_area", params)?;

    let mut xs = [-122.42, -74.01];
    let mut ys = [37.77, 40.71];
    println!("Before transformation :\n{xs:?} {ys:?}");
    htransform.transform_coords(&mut xs, &mut ys)?;
    println!("After transformation :\n{xs:?} {ys:?}");
    htransform.inverse().transform_coords(&mut xs, &mut ys)?;
    println!("Back again :\n{xs:?} {ys:?}\n");

    let bounds = htransform.transform_bounds(&[-125.0, 24.0, -66.0, 50.0], 21)?;
    println!("Projected extent of the contiguous US:\n{bounds:?}\n");

    let geom = Geometry::from_wkt(
        "POLYGON ((-109.05 41.0, -102.05 41.0, -102.05 37.0, -109.05 37.0, -109.05 41.0))",
    )?;
    println!("Polygon before transformation:\n{}\n", geom.wkt());
    let projected = geom.transform(&htransform)?;
    println!("Polygon after transformation:\n{:#}\n", projected);

    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();
    run().unwrap();
}
