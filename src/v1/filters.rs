/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::{ContentCategory, Feature, MediaType};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Filters applied to a media item search.
///
/// See [Photos Library API Docs](https://developers.google.com/photos/library/guides/apply-filters)
/// for how the server combines them. Filters cannot be combined with an album id.
#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_filter: Option<DateFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_filter: Option<ContentFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type_filter: Option<MediaTypeFilter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_filter: Option<FeatureFilter>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub include_archived_media: bool,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub exclude_non_app_created_data: bool,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn with_dates(mut self, dates: impl IntoIterator<Item = Date>) -> Self {
        self.date_filter
            .get_or_insert_with(DateFilter::default)
            .dates
            .extend(dates);
        self
    }

    pub fn with_range(mut self, start_date: Date, end_date: Date) -> Self {
        self.date_filter
            .get_or_insert_with(DateFilter::default)
            .ranges
            .push(DateRange {
                start_date,
                end_date,
            });
        self
    }

    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type_filter = Some(MediaTypeFilter {
            media_types: vec![media_type],
        });
        self
    }

    pub fn including(mut self, category: ContentCategory) -> Self {
        self.content_filter
            .get_or_insert_with(ContentFilter::default)
            .included_content_categories
            .push(category);
        self
    }

    pub fn excluding(mut self, category: ContentCategory) -> Self {
        self.content_filter
            .get_or_insert_with(ContentFilter::default)
            .excluded_content_categories
            .push(category);
        self
    }

    pub fn favorites_only(mut self) -> Self {
        self.feature_filter = Some(FeatureFilter {
            included_features: vec![Feature::Favorites],
        });
        self
    }
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
pub struct DateFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dates: Vec<Date>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<DateRange>,
}

/// Calendar date; a zero month or day matches any month or day
#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Date {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub month: u32,
    #[serde(default)]
    pub day: u32,
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included_content_categories: Vec<ContentCategory>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excluded_content_categories: Vec<ContentCategory>,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeFilter {
    #[serde(default)]
    pub media_types: Vec<MediaType>,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFilter {
    #[serde(default)]
    pub included_features: Vec<Feature>,
}
