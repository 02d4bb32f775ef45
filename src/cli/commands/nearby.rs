use super::status::{print_last_hint, print_no_asset, print_panel};
use crate::cli::context::Resolver;
use crate::errors::AppResult;
use crate::ui::messages::field;
use crate::utils::formatting::distance;

/// Discovery view: nearest asset, whether it is in range, and its panel.
pub fn handle(resolver: &mut Resolver) -> AppResult<()> {
    let discovery = resolver.discover();

    match &discovery.panel {
        Some(panel) => print_panel(panel),
        None => {
            print_no_asset(resolver, discovery.position.is_some());
            if let Some(nearest) = &discovery.scan.nearest {
                field(
                    "Nearest",
                    format!("{} at {}", nearest.asset.label(), distance(nearest.distance_m)),
                );
            }
        }
    }

    if discovery.scan.skipped > 0 {
        field("Skipped", format!("{} asset(s) without coordinates", discovery.scan.skipped));
    }

    print_last_hint(resolver);
    Ok(())
}
