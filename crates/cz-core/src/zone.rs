//! The facility's closed zone set and fixed per-zone storage.
//!
//! Every per-zone quantity in the controller (setpoints, gains, controller
//! state, temperatures, damper demands) lives in a [`ZoneMap`], a fixed array
//! indexed by [`Zone`]. A `ZoneMap` always holds exactly one entry per zone,
//! so "missing zone" can only happen at the boundary where external data
//! (sensor readings, configuration files) is converted into one.

use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;
use std::collections::BTreeMap;

use crate::CoreError;

/// A refrigerated zone of the facility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Zone {
    Freezer,
    Cooler,
    Packing,
}

impl Zone {
    pub const COUNT: usize = 3;

    /// All zones, in declaration order.
    pub const ALL: [Zone; Zone::COUNT] = [Zone::Freezer, Zone::Cooler, Zone::Packing];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Zone::Freezer => "Freezer",
            Zone::Cooler => "Cooler",
            Zone::Packing => "Packing",
        }
    }

    /// Lowest temperature (°C) the zone's evaporator can pull it down to.
    pub fn physical_floor_c(self) -> f64 {
        match self {
            Zone::Freezer => -25.0,
            Zone::Cooler => -2.0,
            Zone::Packing => 10.0,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Zone {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|z| z.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownZone {
                name: s.to_string(),
            })
    }
}

/// Exactly one `T` per [`Zone`].
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ZoneMap<T>([T; Zone::COUNT]);

impl<T> ZoneMap<T> {
    pub fn from_fn(f: impl FnMut(Zone) -> T) -> Self {
        Self(Zone::ALL.map(f))
    }

    /// Build a map, stopping at the first zone whose value cannot be produced.
    pub fn try_from_fn<E>(mut f: impl FnMut(Zone) -> Result<T, E>) -> Result<Self, E> {
        let [a, b, c] = Zone::ALL;
        Ok(Self([f(a)?, f(b)?, f(c)?]))
    }

    /// Take ownership of a sparse map, failing with the first zone that is absent.
    pub fn from_entries(mut entries: BTreeMap<Zone, T>) -> Result<Self, Zone> {
        Self::try_from_fn(|z| entries.remove(&z).ok_or(z))
    }

    #[inline]
    pub fn get(&self, zone: Zone) -> &T {
        &self.0[zone.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, zone: Zone) -> &mut T {
        &mut self.0[zone.index()]
    }

    pub fn set(&mut self, zone: Zone, value: T) {
        self.0[zone.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, &T)> {
        Zone::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(Zone, &T) -> U) -> ZoneMap<U> {
        ZoneMap::from_fn(|z| f(z, self.get(z)))
    }
}

impl ZoneMap<f64> {
    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl<T> Index<Zone> for ZoneMap<T> {
    type Output = T;

    fn index(&self, zone: Zone) -> &T {
        self.get(zone)
    }
}

impl<T> IndexMut<Zone> for ZoneMap<T> {
    fn index_mut(&mut self, zone: Zone) -> &mut T {
        self.get_mut(zone)
    }
}

impl<T: fmt::Display> fmt::Display for ZoneMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (zone, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{zone}: {value}")?;
        }
        f.write_str("}")
    }
}

// Serialized as a map keyed by zone name, e.g. `{"Freezer": .., "Cooler": .., "Packing": ..}`.
#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Zone, ZoneMap};
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    impl<T: Serialize> Serialize for ZoneMap<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(Zone::COUNT))?;
            for (zone, value) in self.iter() {
                map.serialize_entry(&zone, value)?;
            }
            map.end()
        }
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for ZoneMap<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let entries = BTreeMap::<Zone, T>::deserialize(deserializer)?;
            ZoneMap::from_entries(entries)
                .map_err(|zone| D::Error::custom(format!("missing entry for zone {zone}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_indices_match_declaration_order() {
        for (i, zone) in Zone::ALL.into_iter().enumerate() {
            assert_eq!(zone.index(), i);
        }
    }

    #[test]
    fn zone_parses_case_insensitively() {
        assert_eq!("freezer".parse::<Zone>().unwrap(), Zone::Freezer);
        assert_eq!(" Packing ".parse::<Zone>().unwrap(), Zone::Packing);
        let err = "Lobby".parse::<Zone>().unwrap_err();
        assert!(format!("{err}").contains("Lobby"));
    }

    #[test]
    fn physical_floors() {
        assert_eq!(Zone::Freezer.physical_floor_c(), -25.0);
        assert_eq!(Zone::Cooler.physical_floor_c(), -2.0);
        assert_eq!(Zone::Packing.physical_floor_c(), 10.0);
    }

    #[test]
    fn zone_map_indexing_and_sum() {
        let mut m = ZoneMap::from_fn(|z| z.index() as f64 * 10.0);
        assert_eq!(m[Zone::Cooler], 10.0);
        m[Zone::Packing] = 5.0;
        assert_eq!(m.sum(), 15.0);
        let doubled = m.map(|_, v| v * 2.0);
        assert_eq!(doubled[Zone::Packing], 10.0);
    }

    #[test]
    fn from_entries_reports_first_missing_zone() {
        let mut entries = BTreeMap::new();
        entries.insert(Zone::Freezer, 1.0);
        entries.insert(Zone::Packing, 3.0);
        assert_eq!(ZoneMap::from_entries(entries), Err(Zone::Cooler));
    }

    #[test]
    fn display_lists_every_zone() {
        let m = ZoneMap::from_fn(|z| z.index());
        assert_eq!(m.to_string(), "{Freezer: 0, Cooler: 1, Packing: 2}");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_zone_names_as_keys() {
        let m = ZoneMap::from_fn(|z| z.index() as f64);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"Freezer":0.0,"Cooler":1.0,"Packing":2.0}"#);

        let back: ZoneMap<f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);

        let partial = serde_json::from_str::<ZoneMap<f64>>(r#"{"Freezer":0.0}"#);
        assert!(partial.is_err());
    }
}
