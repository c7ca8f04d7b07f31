/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::v1::VideoProcessingStatus;
use serde::Deserialize;
use std::str::FromStr;

// Parses video processing status
pub fn from_video_status<'de, D>(deserializer: D) -> Result<VideoProcessingStatus, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Ok(VideoProcessingStatus::from_str(&s).unwrap_or_default())
}

// Parses strings that may be "" and sets to None
pub fn from_empty_str_to_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Num(u64),
}

// int64 values are sent as JSON strings; accept plain numbers as well
pub fn from_int64_str<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(StringOrNumber::Num(n)) => Ok(Some(n)),
        Some(StringOrNumber::Str(s)) if s.is_empty() => Ok(None),
        Some(StringOrNumber::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
