//! Compass sectors and the wind directions a site can be flown in

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of each compass sector in degrees
pub const SECTOR_WIDTH_DEG: f64 = 45.0;

/// One of the eight 45° compass sectors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CompassSector {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Returned when a sector tag is not one of the eight compass points
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown compass sector: {0:?}")]
pub struct ParseSectorError(pub String);

impl CompassSector {
    /// Sectors in clockwise order starting at north
    pub const ALL: [CompassSector; 8] = [
        CompassSector::N,
        CompassSector::NE,
        CompassSector::E,
        CompassSector::SE,
        CompassSector::S,
        CompassSector::SW,
        CompassSector::W,
        CompassSector::NW,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            CompassSector::N => "n",
            CompassSector::NE => "ne",
            CompassSector::E => "e",
            CompassSector::SE => "se",
            CompassSector::S => "s",
            CompassSector::SW => "sw",
            CompassSector::W => "w",
            CompassSector::NW => "nw",
        }
    }

    pub fn center_deg(&self) -> f64 {
        let index = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        index as f64 * SECTOR_WIDTH_DEG
    }

    /// `(min, max)` bounds. For north `min > max` because the sector wraps 360°.
    pub fn bounds(&self) -> (f64, f64) {
        let half = SECTOR_WIDTH_DEG / 2.0;
        let center = self.center_deg();
        ((center - half).rem_euclid(360.0), center + half)
    }

    /// Whether `direction_deg` falls inside this sector. Both bounds are inclusive.
    pub fn contains(&self, direction_deg: f64) -> bool {
        if !direction_deg.is_finite() {
            return false;
        }
        let direction = direction_deg.rem_euclid(360.0);
        let (min, max) = self.bounds();
        if min > max {
            direction >= min || direction <= max
        } else {
            direction >= min && direction <= max
        }
    }

    /// First sector, clockwise from north, containing the direction.
    ///
    /// Returns `None` only for non-finite input.
    pub fn from_degrees(direction_deg: f64) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.contains(direction_deg))
    }
}

impl std::fmt::Display for CompassSector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag().to_uppercase())
    }
}

impl FromStr for CompassSector {
    type Err = ParseSectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|sector| sector.tag() == tag)
            .ok_or_else(|| ParseSectorError(s.to_string()))
    }
}

/// Per-sector boolean columns as stored for each flying location
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SectorFlags {
    #[serde(default)]
    pub n: bool,
    #[serde(default)]
    pub ne: bool,
    #[serde(default)]
    pub e: bool,
    #[serde(default)]
    pub se: bool,
    #[serde(default)]
    pub s: bool,
    #[serde(default)]
    pub sw: bool,
    #[serde(default)]
    pub w: bool,
    #[serde(default)]
    pub nw: bool,
}

/// Wind directions a site can be flown in.
///
/// An empty set means no direction is flyable, never "any direction".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct SiteDirectionCapability {
    sectors: BTreeSet<CompassSector>,
}

impl SiteDirectionCapability {
    pub fn new(sectors: impl IntoIterator<Item = CompassSector>) -> Self {
        Self {
            sectors: sectors.into_iter().collect(),
        }
    }

    /// Build from tags such as `["n", "NW", "w"]`
    pub fn from_tags<I, S>(tags: I) -> Result<Self, ParseSectorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sectors = tags
            .into_iter()
            .map(|tag| tag.as_ref().parse())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { sectors })
    }

    pub fn contains(&self, sector: CompassSector) -> bool {
        self.sectors.contains(&sector)
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = CompassSector> + '_ {
        self.sectors.iter().copied()
    }

    /// Whether a wind from `direction_deg` can be flown.
    ///
    /// The direction is resolved to its single sector with
    /// [`CompassSector::from_degrees`] first, so a boundary direction is only
    /// allowed when that sector is. Fails closed on an empty set.
    pub fn allows(&self, direction_deg: f64) -> bool {
        CompassSector::from_degrees(direction_deg).is_some_and(|sector| self.contains(sector))
    }

    pub fn tags(&self) -> Vec<&'static str> {
        self.sectors.iter().map(|s| s.tag()).collect()
    }
}

impl From<SectorFlags> for SiteDirectionCapability {
    fn from(flags: SectorFlags) -> Self {
        let pairs = [
            (flags.n, CompassSector::N),
            (flags.ne, CompassSector::NE),
            (flags.e, CompassSector::E),
            (flags.se, CompassSector::SE),
            (flags.s, CompassSector::S),
            (flags.sw, CompassSector::SW),
            (flags.w, CompassSector::W),
            (flags.nw, CompassSector::NW),
        ];
        Self::new(pairs.into_iter().filter(|(on, _)| *on).map(|(_, s)| s))
    }
}

impl FromIterator<CompassSector> for SiteDirectionCapability {
    fn from_iter<T: IntoIterator<Item = CompassSector>>(iter: T) -> Self {
        Self::new(iter)
    }
}
