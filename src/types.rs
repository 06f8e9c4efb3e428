//! Shared types and enums used across SEAMASK.
//! Includes `Channel`, the WorldCover class codes, the configurable
//! `LandClassSet` predicate, and the on-disk `TileVariant` selector.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// SAR polarization channel of a scene pair.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum Channel {
    Hh,
    Hv,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Channel::Hh => "hh",
            Channel::Hv => "hv",
        };
        write!(f, "{}", s)
    }
}

/// ESA WorldCover v200 class codes.
pub mod worldcover_class {
    pub const TREE_COVER: u8 = 10;
    pub const SHRUBLAND: u8 = 20;
    pub const GRASSLAND: u8 = 30;
    pub const CROPLAND: u8 = 40;
    pub const BUILT_UP: u8 = 50;
    pub const BARE_SPARSE: u8 = 60;
    pub const SNOW_ICE: u8 = 70;
    pub const PERMANENT_WATER: u8 = 80;
    pub const HERBACEOUS_WETLAND: u8 = 90;
    pub const MANGROVES: u8 = 95;
    pub const MOSS_LICHEN: u8 = 100;

    /// Nodata marker in the raw class maps.
    pub const NODATA: u8 = 0;
}

/// Set of WorldCover class codes treated as "land" when building the mask.
///
/// The default keeps every class except permanent water, so lakes and ocean
/// are the only surfaces that survive masking. Arctic scenes can additionally
/// drop snow/ice from the land set so frozen-ocean returns are retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandClassSet(Vec<u8>);

impl LandClassSet {
    pub fn new(mut codes: Vec<u8>) -> Self {
        codes.sort_unstable();
        codes.dedup();
        LandClassSet(codes)
    }

    /// Every WorldCover class except permanent water.
    pub fn all_land() -> Self {
        use worldcover_class as wc;
        LandClassSet::new(vec![
            wc::TREE_COVER,
            wc::SHRUBLAND,
            wc::GRASSLAND,
            wc::CROPLAND,
            wc::BUILT_UP,
            wc::BARE_SPARSE,
            wc::SNOW_ICE,
            wc::HERBACEOUS_WETLAND,
            wc::MANGROVES,
            wc::MOSS_LICHEN,
        ])
    }

    /// Like [`LandClassSet::all_land`] but keeping snow/ice unmasked.
    pub fn keeping_sea_ice() -> Self {
        let codes = Self::all_land()
            .0
            .into_iter()
            .filter(|&c| c != worldcover_class::SNOW_ICE)
            .collect();
        LandClassSet(codes)
    }

    pub fn contains(&self, code: u8) -> bool {
        self.0.binary_search(&code).is_ok()
    }

    pub fn codes(&self) -> &[u8] {
        &self.0
    }
}

impl Default for LandClassSet {
    fn default() -> Self {
        LandClassSet::all_land()
    }
}

impl std::fmt::Display for LandClassSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", codes.join(","))
    }
}

/// Flavor of WorldCover tiles stored on disk.
///
/// `Map` is the raw class product; `Preprocessed` is the compact
/// land/water/nodata variant produced by tile preprocessing.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Serialize, Deserialize)]
pub enum TileVariant {
    Map,
    Preprocessed,
}

impl TileVariant {
    pub fn filename_suffix(&self) -> &'static str {
        match self {
            TileVariant::Map => "_Map.tif",
            TileVariant::Preprocessed => "_preprocessed.tif",
        }
    }

    /// Nodata sentinel used by this tile flavor.
    pub fn nodata(&self) -> u8 {
        match self {
            TileVariant::Map => worldcover_class::NODATA,
            TileVariant::Preprocessed => 255,
        }
    }

    /// Whether a (valid) sample counts as land under the given class set.
    pub fn is_land(&self, value: u8, classes: &LandClassSet) -> bool {
        match self {
            TileVariant::Map => classes.contains(value),
            TileVariant::Preprocessed => value == 1,
        }
    }
}

impl std::fmt::Display for TileVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileVariant::Map => write!(f, "map"),
            TileVariant::Preprocessed => write!(f, "preprocessed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_land_set_excludes_water() {
        let set = LandClassSet::default();
        assert!(!set.contains(worldcover_class::PERMANENT_WATER));
        assert!(set.contains(worldcover_class::TREE_COVER));
        assert!(set.contains(worldcover_class::SNOW_ICE));
    }

    #[test]
    fn sea_ice_variant_drops_snow_ice() {
        let set = LandClassSet::keeping_sea_ice();
        assert!(!set.contains(worldcover_class::SNOW_ICE));
        assert!(!set.contains(worldcover_class::PERMANENT_WATER));
        assert!(set.contains(worldcover_class::BUILT_UP));
    }

    #[test]
    fn land_class_set_dedups_and_sorts() {
        let set = LandClassSet::new(vec![90, 10, 10, 30]);
        assert_eq!(set.codes(), &[10, 30, 90]);
    }

    #[test]
    fn preprocessed_variant_uses_binary_predicate() {
        let classes = LandClassSet::default();
        assert!(TileVariant::Preprocessed.is_land(1, &classes));
        assert!(!TileVariant::Preprocessed.is_land(0, &classes));
        assert!(TileVariant::Map.is_land(10, &classes));
        assert!(!TileVariant::Map.is_land(80, &classes));
    }
}
