use crate::errors::{GeokitError, Result};
use crate::spatial_ref::Ellipsoid;

/// Named numeric parameters handed to a projection constructor.
///
/// Names are matched case-insensitively. Setting a name twice replaces the
/// earlier value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectionParameters {
    entries: Vec<(String, f64)>,
}

impl ProjectionParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters seeded with `semi_major` and `semi_minor` from `ellipsoid`.
    pub fn for_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        Self::new()
            .with("semi_major", ellipsoid.semi_major)
            .with("semi_minor", ellipsoid.semi_minor)
    }

    pub fn set(&mut self, name: &str, value: f64) {
        match self.position(name) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Builder form of [`ProjectionParameters::set`].
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.set(name, value);
        self
    }

    /// The value of `name`, failing with [`GeokitError::MissingParameter`] if absent.
    pub fn get(&self, name: &str) -> Result<f64> {
        self.position(name)
            .map(|i| self.entries[i].1)
            .ok_or_else(|| GeokitError::MissingParameter(name.to_string()))
    }

    pub fn get_or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for ProjectionParameters {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut params = ProjectionParameters::new();
        for (name, value) in iter {
            params.set(name.as_ref(), value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    #[test]
    fn test_lookup_ignores_case() {
        let params = ProjectionParameters::new().with("Central_Meridian", -96.0);
        assert_eq!(params.get("central_meridian").unwrap(), -96.0);
        assert!(params.contains("CENTRAL_MERIDIAN"));
    }

    #[test]
    fn test_set_replaces() {
        let mut params: ProjectionParameters =
            [("scale_factor", 1.0), ("SCALE_FACTOR", 0.9996)].into_iter().collect();
        assert_eq!(params.len(), 1);
        params.set("scale_factor", 0.5);
        assert_eq!(params.get_or("scale_factor", 1.0), 0.5);
    }

    #[test]
    fn test_missing_parameter() {
        let params = ProjectionParameters::for_ellipsoid(Ellipsoid::WGS84);
        let err = params.get("false_easting").unwrap_err();
        assert!(matches!(err, GeokitError::MissingParameter(ref name) if name == "false_easting"));
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert_eq!(params.get_or("false_easting", 0.0), 0.0);
    }
}
