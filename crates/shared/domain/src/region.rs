//! Administrative regions and the weather grid.

use serde::{Deserialize, Serialize};

/// Province-level region (광역자치단체).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MasterRegion {
    pub region_name: String,
    pub region_type: String,
}

/// Municipal region (기초자치단체).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubRegion {
    pub main_region: String,
    pub sub_region_name: String,
    pub region_type: String,
}

/// Forecast grid cell of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: i32,
    pub y: i32,
}
