/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use serde::{Deserialize, Serialize};
use strum_macros::{EnumString, IntoStaticStr};

/// Processing state of an uploaded video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoProcessingStatus {
    #[default]
    Unspecified,
    Processing,
    Ready,
    Failed,
}

/// Media types usable in a search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    AllMedia,
    Video,
    Photo,
}

/// Content categories recognised by the search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentCategory {
    None,
    Landscapes,
    Receipts,
    Cityscapes,
    Landmarks,
    Selfies,
    People,
    Pets,
    Weddings,
    Birthdays,
    Documents,
    Travel,
    Animals,
    Food,
    Sport,
    Night,
    Performances,
    Whiteboards,
    Screenshots,
    Utility,
    Arts,
    Crafts,
    Fashion,
    Houses,
    Gardens,
    Flowers,
    Holidays,
}

/// Features usable in a search filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    None,
    Favorites,
}
