mod conversions;
mod transformations;
