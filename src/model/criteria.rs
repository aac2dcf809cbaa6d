//! Filter and sort criteria.
//!
//! Criteria are always fully defined; `FilterCriteria::default()` is the
//! initial state (`all` / `all` / `modTime` / `desc` / empty search).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size bucket, measured in KiB (`size / 1024`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// No size restriction.
    #[default]
    All,
    /// At most 5000 KiB.
    Small,
    /// Above 5000 KiB, at most 20000 KiB.
    Medium,
    /// Above 20000 KiB.
    Large,
}

impl SizeClass {
    /// Lowercase listing name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::All => "all",
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

/// Age bucket relative to the moment the filter runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DateClass {
    /// No age restriction.
    #[default]
    All,
    /// Modified at most 7 days ago.
    #[value(name = "last7")]
    Last7,
    /// Modified at most 30 days ago.
    #[value(name = "last30")]
    Last30,
    /// Modified more than 30 days ago, or with an unknown time.
    Older,
}

impl DateClass {
    /// Listing name (`last7`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            DateClass::All => "all",
            DateClass::Last7 => "last7",
            DateClass::Last30 => "last30",
            DateClass::Older => "older",
        }
    }
}

/// Sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum SortKey {
    /// Byte-wise name order.
    #[serde(rename = "name")]
    Name,
    /// Byte count.
    #[serde(rename = "size")]
    Size,
    /// Modification instant; unknown times sort lowest.
    #[value(name = "modTime", aliases = ["modtime", "date"])]
    #[serde(rename = "modTime")]
    ModTime,
}

impl SortKey {
    /// Listing field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Size => "size",
            SortKey::ModTime => "modTime",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl SortDir {
    /// The opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    /// `asc` or `desc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(SizeClass, DateClass, SortKey, SortDir);

/// Combined filter and sort configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against the name. Empty matches all.
    pub search_term: String,
    /// Size bucket.
    pub size_class: SizeClass,
    /// Age bucket.
    pub date_class: DateClass,
    /// Active sort column.
    pub sort_key: SortKey,
    /// Active sort direction.
    pub sort_dir: SortDir,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            size_class: SizeClass::All,
            date_class: DateClass::All,
            sort_key: SortKey::ModTime,
            sort_dir: SortDir::Desc,
        }
    }
}

impl FilterCriteria {
    /// Toggle the sort column.
    ///
    /// Same key flips the direction; a new key is selected ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_key = key;
            self.sort_dir = SortDir::Asc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_sort_newest_first_with_no_filters() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.search_term, "");
        assert_eq!(criteria.size_class, SizeClass::All);
        assert_eq!(criteria.date_class, DateClass::All);
        assert_eq!(criteria.sort_key, SortKey::ModTime);
        assert_eq!(criteria.sort_dir, SortDir::Desc);
    }

    #[test]
    fn toggle_new_key_selects_ascending() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_sort(SortKey::Size);
        assert_eq!(criteria.sort_key, SortKey::Size);
        assert_eq!(criteria.sort_dir, SortDir::Asc);
    }

    #[test]
    fn toggle_same_key_flips_direction() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_sort(SortKey::Size);
        criteria.toggle_sort(SortKey::Size);
        assert_eq!(criteria.sort_dir, SortDir::Desc);
        criteria.toggle_sort(SortKey::Size);
        assert_eq!(criteria.sort_dir, SortDir::Asc);
    }

    #[test]
    fn toggle_active_default_key_flips_to_ascending() {
        let mut criteria = FilterCriteria::default();
        criteria.toggle_sort(SortKey::ModTime);
        assert_eq!(criteria.sort_key, SortKey::ModTime);
        assert_eq!(criteria.sort_dir, SortDir::Asc);
    }

    #[test]
    fn value_enum_parses_listing_spellings() {
        assert_eq!(DateClass::from_str("last7", true), Ok(DateClass::Last7));
        assert_eq!(DateClass::from_str("last30", true), Ok(DateClass::Last30));
        assert_eq!(SortKey::from_str("modTime", false), Ok(SortKey::ModTime));
        assert_eq!(SortKey::from_str("date", true), Ok(SortKey::ModTime));
        assert_eq!(SizeClass::from_str("LARGE", true), Ok(SizeClass::Large));
        assert!(SizeClass::from_str("huge", true).is_err());
    }

    #[test]
    fn criteria_serialize_with_listing_names() {
        let json = serde_json::to_value(FilterCriteria::default()).expect("serialize");
        assert_eq!(json["sort_key"], "modTime");
        assert_eq!(json["sort_dir"], "desc");
        assert_eq!(json["date_class"], "all");
    }
}
