//! Upstream call shapes
//!
//! Each kind lists through one of a few structurally different endpoints.
//! An `Endpoint` is the deterministic mapping from a `PageRequest` onto
//! that endpoint's request.

use super::types::{PageRequest, ResourceKind};
use crate::config::{ClientConfig, EndpointOverride};
use crate::http::OutboundRequest;
use serde_json::json;
use std::collections::HashMap;

/// Which item type an endpoint's payload decodes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemShape {
    Device,
    Site,
}

/// One upstream list call shape with its fixed parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET path?pageNum&pageSize&keyword&productType`
    Devices { path: String, product_type: i32 },
    /// `Devices` plus repeated `roadIds`
    RoadDevices { path: String, product_type: i32 },
    /// `GET path?pageNum&pageSize&siteName&siteId`
    Sites { path: String },
    /// `POST path` with `{current, size, keyword, category}`
    Cameras { path: String, category: i32 },
}

impl Endpoint {
    /// Built-in endpoint for a kind
    pub fn default_for(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Lamp => Endpoint::RoadDevices {
                path: "/device/lamp/page".to_string(),
                product_type: 1,
            },
            ResourceKind::Concentrator => device_page(2),
            ResourceKind::LoopController => device_page(3),
            ResourceKind::PlaybackUnit => device_page(4),
            ResourceKind::EnvironmentSensor => device_page(5),
            ResourceKind::Camera => Endpoint::Cameras {
                path: "/camera/page".to_string(),
                category: 6,
            },
            ResourceKind::Site => Endpoint::Sites {
                path: "/site/page".to_string(),
            },
        }
    }

    /// Apply a config override of path and fixed code
    #[must_use]
    pub fn with_override(mut self, over: &EndpointOverride) -> Self {
        if let Some(ref new_path) = over.path {
            match &mut self {
                Endpoint::Devices { path, .. }
                | Endpoint::RoadDevices { path, .. }
                | Endpoint::Sites { path }
                | Endpoint::Cameras { path, .. } => *path = new_path.clone(),
            }
        }
        if let Some(code) = over.code {
            match &mut self {
                Endpoint::Devices { product_type, .. }
                | Endpoint::RoadDevices { product_type, .. } => *product_type = code,
                Endpoint::Cameras { category, .. } => *category = code,
                Endpoint::Sites { .. } => {}
            }
        }
        self
    }

    /// Endpoint path
    pub fn path(&self) -> &str {
        match self {
            Endpoint::Devices { path, .. }
            | Endpoint::RoadDevices { path, .. }
            | Endpoint::Sites { path }
            | Endpoint::Cameras { path, .. } => path,
        }
    }

    /// Short name of the call shape
    pub fn shape_name(&self) -> &'static str {
        match self {
            Endpoint::Devices { .. } => "devices",
            Endpoint::RoadDevices { .. } => "road_devices",
            Endpoint::Sites { .. } => "sites",
            Endpoint::Cameras { .. } => "cameras",
        }
    }

    /// Item type of this endpoint's payload
    pub fn item_shape(&self) -> ItemShape {
        match self {
            Endpoint::Sites { .. } => ItemShape::Site,
            _ => ItemShape::Device,
        }
    }

    /// Map a page request onto this endpoint's request
    pub fn build_request(&self, request: &PageRequest) -> OutboundRequest {
        let keyword = request.query.effective_keyword();
        let filters = &request.query.filters;

        match self {
            Endpoint::Devices { path, product_type } => {
                device_query(path, *product_type, request, keyword, filters.online)
            }
            Endpoint::RoadDevices { path, product_type } => {
                filters.road_ids().into_iter().fold(
                    device_query(path, *product_type, request, keyword, filters.online),
                    |req, id| req.query("roadIds", id),
                )
            }
            Endpoint::Sites { path } => {
                let mut req = OutboundRequest::get(path.as_str())
                    .query("pageNum", request.page_number)
                    .query("pageSize", request.page_size);
                if let Some(keyword) = keyword {
                    req = req.query("siteName", keyword);
                }
                if let Some(site_id) = filters.numeric_site_id() {
                    req = req.query("siteId", site_id);
                }
                req
            }
            Endpoint::Cameras { path, category } => {
                let mut body = json!({
                    "current": request.page_number,
                    "size": request.page_size,
                    "category": category,
                });
                if let Some(keyword) = keyword {
                    body["keyword"] = json!(keyword);
                }
                if let Some(site_id) = filters.numeric_site_id() {
                    body["siteId"] = json!(site_id);
                }
                OutboundRequest::post(path.as_str()).json(body)
            }
        }
    }
}

fn device_page(product_type: i32) -> Endpoint {
    Endpoint::Devices {
        path: "/device/page".to_string(),
        product_type,
    }
}

fn device_query(
    path: &str,
    product_type: i32,
    request: &PageRequest,
    keyword: Option<&str>,
    online: Option<bool>,
) -> OutboundRequest {
    let mut req = OutboundRequest::get(path)
        .query("pageNum", request.page_number)
        .query("pageSize", request.page_size)
        .query("productType", product_type);
    if let Some(keyword) = keyword {
        req = req.query("keyword", keyword);
    }
    if let Some(online) = online {
        req = req.query("online", online);
    }
    req
}

/// Endpoint per kind, after config overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    endpoints: HashMap<ResourceKind, Endpoint>,
}

impl Default for EndpointTable {
    fn default() -> Self {
        Self {
            endpoints: ResourceKind::ALL
                .into_iter()
                .map(|kind| (kind, Endpoint::default_for(kind)))
                .collect(),
        }
    }
}

impl EndpointTable {
    /// Built-in endpoints with the config's overrides applied
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut table = Self::default();
        for (kind, over) in &config.endpoints {
            let endpoint = Endpoint::default_for(*kind).with_override(over);
            table.endpoints.insert(*kind, endpoint);
        }
        table
    }

    /// Endpoint for a kind
    pub fn get(&self, kind: ResourceKind) -> Option<&Endpoint> {
        self.endpoints.get(&kind)
    }

    /// Entries sorted by kind
    pub fn entries(&self) -> Vec<(ResourceKind, &Endpoint)> {
        let mut entries: Vec<_> = self.endpoints.iter().map(|(k, e)| (*k, e)).collect();
        entries.sort_by_key(|(k, _)| *k);
        entries
    }
}
