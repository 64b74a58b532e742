//! Resource types
//!
//! Resource kinds, page requests and the items list endpoints return.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

// ============================================================================
// Resource Kind
// ============================================================================

/// Category of listed entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Street lamp controller
    Lamp,
    /// Concentrator (gateway for a lamp segment)
    Concentrator,
    /// Loop (circuit) controller
    LoopController,
    /// Public-address playback unit
    PlaybackUnit,
    /// Environment sensor
    EnvironmentSensor,
    /// Camera
    Camera,
    /// Site
    Site,
}

impl ResourceKind {
    /// Every kind, in declaration order
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Lamp,
        ResourceKind::Concentrator,
        ResourceKind::LoopController,
        ResourceKind::PlaybackUnit,
        ResourceKind::EnvironmentSensor,
        ResourceKind::Camera,
        ResourceKind::Site,
    ];

    /// snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Lamp => "lamp",
            ResourceKind::Concentrator => "concentrator",
            ResourceKind::LoopController => "loop_controller",
            ResourceKind::PlaybackUnit => "playback_unit",
            ResourceKind::EnvironmentSensor => "environment_sensor",
            ResourceKind::Camera => "camera",
            ResourceKind::Site => "site",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    /// Accepts `loop_controller`, `LOOP_CONTROLLER` and `loop-controller`
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| Error::unknown_kind(s))
    }
}

// ============================================================================
// Page Request
// ============================================================================

/// Resource-specific filters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Road identifier, for road-scoped device lists
    #[serde(default)]
    pub road_id: Option<String>,
    /// Site identifier
    #[serde(default)]
    pub site_id: Option<String>,
    /// Only online (true) or offline (false) devices
    #[serde(default)]
    pub online: Option<bool>,
}

impl Filters {
    /// Road filter list
    ///
    /// An identifier that is not a numeric key means no road filter.
    pub fn road_ids(&self) -> Vec<i64> {
        match self.road_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match raw.parse::<i64>() {
                Ok(id) => vec![id],
                Err(_) => {
                    debug!(road_id = raw, "Non-numeric road id, not filtering by road");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }

    /// Site filter, when it is a numeric key
    pub fn numeric_site_id(&self) -> Option<i64> {
        self.site_id.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// Search keyword plus filters; fixed for the lifetime of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Free-text search keyword
    #[serde(default)]
    pub keyword: Option<String>,
    /// Resource-specific filters
    #[serde(default)]
    pub filters: Filters,
}

impl PageQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search keyword
    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Set the road filter
    #[must_use]
    pub fn road_id(mut self, road_id: impl Into<String>) -> Self {
        self.filters.road_id = Some(road_id.into());
        self
    }

    /// Set the site filter
    #[must_use]
    pub fn site_id(mut self, site_id: impl Into<String>) -> Self {
        self.filters.site_id = Some(site_id.into());
        self
    }

    /// Set the online filter
    #[must_use]
    pub fn online(mut self, online: bool) -> Self {
        self.filters.online = Some(online);
        self
    }

    /// Keyword to send, if it is not blank
    pub fn effective_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// One page load: page number, page size and the session's query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub query: PageQuery,
}

impl PageRequest {
    /// Create a page request; both numbers must be at least 1
    pub fn new(page_number: u32, page_size: u32, query: PageQuery) -> Result<Self> {
        if page_number == 0 {
            return Err(Error::invalid_page("page number starts at 1"));
        }
        if page_size == 0 {
            return Err(Error::invalid_page("page size must be at least 1"));
        }
        Ok(Self {
            page_number,
            page_size,
            query,
        })
    }

    /// Request for the first page
    pub fn first(page_size: u32, query: PageQuery) -> Result<Self> {
        Self::new(1, page_size, query)
    }
}

// ============================================================================
// Items
// ============================================================================

/// Server-side identifier; numeric on most endpoints, text on some
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{n}"),
            ResourceId::Text(s) => f.write_str(s),
        }
    }
}

/// A listed device of any hardware type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: ResourceId,
    #[serde(default, alias = "deviceName")]
    pub name: String,
    #[serde(default, alias = "sn")]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub product_type: Option<i32>,
    #[serde(default)]
    pub online: Option<bool>,
    #[serde(default, alias = "lng")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    /// Fields this crate does not model, kept verbatim
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// A listed site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: ResourceId,
    #[serde(default, alias = "siteName")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "lng")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub device_count: Option<u32>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Uniform list item
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    Device(Device),
    Site(Site),
}

impl Item {
    /// Server identifier
    pub fn id(&self) -> &ResourceId {
        match self {
            Item::Device(d) => &d.id,
            Item::Site(s) => &s.id,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        match self {
            Item::Device(d) => &d.name,
            Item::Site(s) => &s.name,
        }
    }
}
