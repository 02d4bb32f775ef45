//! Wiring shared by the backend-facing commands.

use crate::api::HttpBackend;
use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::GeoAttendanceResolver;
use crate::core::gating::CheckoutPolicy;
use crate::core::resolver::{Discovery, Panel};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::location::{LayeredLocation, POSITION_ENV};
use crate::models::coordinate::AssetLocation;
use crate::utils::formatting;

pub type Resolver = GeoAttendanceResolver<HttpBackend, LayeredLocation>;

pub fn build_resolver(cli: &Cli, cfg: &Config) -> AppResult<Resolver> {
    let backend = HttpBackend::builder(cfg.api_base_url.clone())
        .token(cfg.api_token.clone())
        .timeout(cfg.request_timeout())
        .build()?;
    let location = LayeredLocation::new(cli.lat, cli.lon, cfg);
    let store = DbPool::open(&cfg.database_path())?;

    Ok(GeoAttendanceResolver::new(backend, location, cfg.thresholds())
        .with_checkout_policy(CheckoutPolicy::from_flag(cfg.checkout_requires_proximity))
        .with_store(store))
}

pub fn location_prompt() -> String {
    format!("Location unavailable. Enable it with --lat/--lon, {POSITION_ENV}, or default_latitude/default_longitude in the config.")
}

/// Why discovery found nothing, as an error.
pub fn nothing_in_range(d: &Discovery, radius_m: f64) -> AppError {
    if d.position.is_none() {
        return AppError::Location(location_prompt());
    }

    match &d.scan.nearest {
        Some(nearest) => AppError::OutOfRange {
            asset: nearest.asset.label(),
            distance_m: nearest.distance_m,
            threshold_m: radius_m,
        },
        None => AppError::AssetNotFound(format!(
            "no asset with coordinates within {}",
            formatting::distance(radius_m)
        )),
    }
}

/// `--asset` when given, otherwise the asset discovery lands on.
/// Today's status for it is loaded on the way.
pub fn select_asset(resolver: &mut Resolver, asset_id: Option<&str>) -> AppResult<AssetLocation> {
    select_panel(resolver, asset_id).map(|panel| panel.asset)
}

/// Resolve the target asset and load its panel.
pub fn select_panel(resolver: &mut Resolver, asset_id: Option<&str>) -> AppResult<Panel> {
    if let Some(id) = asset_id {
        let asset = resolver.find_asset(id)?;
        return Ok(resolver.inspect(asset));
    }

    let discovery = resolver.discover();
    let radius = resolver.thresholds().discovery_m;
    discovery
        .panel
        .clone()
        .ok_or_else(|| nothing_in_range(&discovery, radius))
}
