use crate::cli::context::{Resolver, location_prompt};
use crate::errors::AppResult;
use crate::geo::distance_m;
use crate::ui::messages::{info, warning};
use crate::utils::colors::{colorize_optional, colorize_range};
use crate::utils::formatting;
use crate::utils::table::{Column, Table};

/// List every asset in backend order with its distance from the current position.
pub fn handle(resolver: &mut Resolver) -> AppResult<()> {
    let position = resolver.position();
    let assets = resolver.assets();
    let radius = resolver.thresholds().discovery_m;

    if position.is_none() {
        warning(location_prompt());
    }
    if assets.is_empty() {
        info("No assets available.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("ID", 12),
        Column::new("NAME", 28),
        Column::new("COORDINATES", 26),
        Column::new("DISTANCE", 12),
    ]);

    for asset in &assets {
        let coords = asset
            .coordinate
            .map(|c| c.to_string())
            .unwrap_or_else(|| "--:--".to_string());
        let dist = match (position, asset.coordinate) {
            (Some(p), Some(c)) => {
                let d = distance_m(p, c);
                colorize_range(&formatting::distance(d), d <= radius)
            }
            _ => "--:--".to_string(),
        };

        table.add_row(vec![
            asset.id.clone(),
            asset.name.clone(),
            coords,
            colorize_optional(&dist),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
