use crate::cli::context::{Resolver, location_prompt, select_panel};
use crate::core::resolver::Panel;
use crate::errors::AppResult;
use crate::ui::messages::{field, header, info, warning};
use crate::utils::colors::{colorize_optional, colorize_range, colorize_status};
use crate::utils::date::local_stamp;
use crate::utils::formatting::{distance, yes_no};

/// Today's status for `--asset`, or for the asset discovery lands on.
pub fn handle(resolver: &mut Resolver, asset: Option<&str>) -> AppResult<()> {
    let panel = select_panel(resolver, asset)?;
    print_panel(&panel);
    print_last_hint(resolver);
    Ok(())
}

pub fn print_panel(panel: &Panel) {
    header(panel.asset.label());

    match &panel.action {
        Some(p) => field(
            "Distance",
            colorize_range(
                &format!("{} (limit {})", distance(p.distance_m), distance(p.threshold_m)),
                p.is_within_threshold,
            ),
        ),
        None if panel.position.is_none() => field("Distance", location_prompt()),
        None => field("Distance", "asset has no coordinates"),
    }

    field("Status", colorize_status(panel.today.status));
    field("Check-in", colorize_optional(&local_stamp(panel.today.check_in)));
    field("Check-out", colorize_optional(&local_stamp(panel.today.check_out)));

    let gate = &panel.gate;
    field(
        "Can check in",
        match &gate.check_in_reason {
            Some(reason) => format!("{} ({})", yes_no(gate.can_check_in), reason),
            None => yes_no(gate.can_check_in).to_string(),
        },
    );
    field(
        "Can check out",
        match &gate.check_out_reason {
            Some(reason) => format!("{} ({})", yes_no(gate.can_check_out), reason),
            None => yes_no(gate.can_check_out).to_string(),
        },
    );
}

/// Cached hint, shown for information only.
pub fn print_last_hint(resolver: &Resolver) {
    if let Some(last) = resolver.last_attendance() {
        info(format!("Last attendance on this device: {}", last.hint()));
    }
}

pub fn print_no_asset(resolver: &Resolver, position_known: bool) {
    if !position_known {
        warning(location_prompt());
    } else {
        warning(format!(
            "You are not within {} of any asset.",
            distance(resolver.thresholds().discovery_m)
        ));
    }
}
