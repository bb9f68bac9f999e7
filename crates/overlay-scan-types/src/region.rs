use serde::Deserialize;

use crate::{FrameError, FrameResult};

/// Rectangle in source-frame pixel coordinates, `x1 < x2` and `y1 < y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionBounds {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl RegionBounds {
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> FrameResult<Self> {
        if x1 >= x2 || y1 >= y2 {
            return Err(FrameError::configuration(format!(
                "region bounds ({x1},{y1},{x2},{y2}) must satisfy x1<x2 and y1<y2"
            )));
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// How a region's pixels are turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Text,
    VerticalBar,
    HorizontalBar,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Text => "text",
            Strategy::VerticalBar => "vertical-bar",
            Strategy::HorizontalBar => "horizontal-bar",
        }
    }
}

/// Normalization role for text regions.
///
/// Timestamp regions get colon repair before the generic character
/// substitutions and are the target of time interpolation during
/// post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextRole {
    Numeric,
    Timestamp,
}

#[derive(Debug, Clone)]
pub struct RegionDescriptor {
    pub id: u32,
    pub name: String,
    pub bounds: RegionBounds,
    pub strategy: Strategy,
    pub role: Option<TextRole>,
}

impl RegionDescriptor {
    /// Explicit role wins; otherwise region names containing "timestamp"
    /// select the timestamp role.
    pub fn text_role(&self) -> TextRole {
        match self.role {
            Some(role) => role,
            None if self.name.contains("timestamp") => TextRole::Timestamp,
            None => TextRole::Numeric,
        }
    }
}

/// Validated, ordered set of regions. Region order defines column order in
/// the output table.
#[derive(Debug, Clone)]
pub struct RegionSet {
    regions: Vec<RegionDescriptor>,
}

impl RegionSet {
    pub fn new(regions: Vec<RegionDescriptor>) -> FrameResult<Self> {
        if regions.is_empty() {
            return Err(FrameError::configuration(
                "at least one region must be defined",
            ));
        }
        for (i, region) in regions.iter().enumerate() {
            if region.name.trim().is_empty() {
                return Err(FrameError::configuration(format!(
                    "region {} has an empty name",
                    region.id
                )));
            }
            if regions[..i].iter().any(|other| other.name == region.name) {
                return Err(FrameError::configuration(format!(
                    "region name '{}' is used more than once",
                    region.name
                )));
            }
        }
        Ok(Self { regions })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegionDescriptor> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: u32, name: &str) -> RegionDescriptor {
        RegionDescriptor {
            id,
            name: name.to_string(),
            bounds: RegionBounds::new(0, 0, 10, 10).unwrap(),
            strategy: Strategy::Text,
            role: None,
        }
    }

    #[test]
    fn bounds_must_be_ordered() {
        assert!(RegionBounds::new(5, 0, 5, 10).is_err());
        assert!(RegionBounds::new(6, 0, 5, 10).is_err());
        assert!(RegionBounds::new(0, 10, 5, 10).is_err());
        let bounds = RegionBounds::new(2, 3, 7, 9).unwrap();
        assert_eq!(bounds.width(), 5);
        assert_eq!(bounds.height(), 6);
    }

    #[test]
    fn set_rejects_empty_and_duplicates() {
        assert!(RegionSet::new(Vec::new()).is_err());
        let err = RegionSet::new(vec![descriptor(0, "speed"), descriptor(1, "speed")]).unwrap_err();
        assert!(matches!(err, FrameError::Configuration { .. }));
        assert!(RegionSet::new(vec![descriptor(0, "speed"), descriptor(1, "alt")]).is_ok());
    }

    #[test]
    fn timestamp_role_from_name_or_override() {
        let named = descriptor(0, "timestamp_utc");
        assert_eq!(named.text_role(), TextRole::Timestamp);

        let plain = descriptor(1, "speed");
        assert_eq!(plain.text_role(), TextRole::Numeric);

        let mut forced = descriptor(2, "clock");
        forced.role = Some(TextRole::Timestamp);
        assert_eq!(forced.text_role(), TextRole::Timestamp);
    }
}
