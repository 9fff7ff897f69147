mod formats;
mod geo_to_geokit;
mod geokit_to_geo;
