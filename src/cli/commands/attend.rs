use crate::cli::context::{Resolver, select_asset};
use crate::core::gating::CheckoutPolicy;
use crate::core::resolver::ActionOutcome;
use crate::db::log::write_log;
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::AssetLocation;
use crate::models::last_attendance::AttendanceAction;
use crate::ui::messages::{field, info, success, warning};
use crate::utils::colors::colorize_status;
use crate::utils::date::local_stamp;
use crate::utils::formatting::distance;

pub fn check_in(resolver: &mut Resolver, asset: Option<&str>) -> AppResult<()> {
    let target = select_asset(resolver, asset)?;
    let outcome = resolver.check_in(&target)?;
    report(resolver, &outcome);
    Ok(())
}

pub fn check_out(resolver: &mut Resolver, asset: Option<&str>) -> AppResult<()> {
    let target = match select_asset(resolver, asset) {
        Ok(target) => target,
        Err(e) if asset.is_none() => checkout_fallback(resolver, e)?,
        Err(e) => return Err(e),
    };
    let outcome = resolver.check_out(&target)?;
    report(resolver, &outcome);
    Ok(())
}

/// Outside every geofence, checkout without `--asset` targets the asset of the
/// last check-in on this device. The backend status still decides whether the
/// checkout is allowed.
fn checkout_fallback(resolver: &mut Resolver, cause: AppError) -> AppResult<AssetLocation> {
    let out_of_range = matches!(cause, AppError::OutOfRange { .. } | AppError::AssetNotFound(_));
    if !out_of_range || resolver.checkout_policy() != CheckoutPolicy::Unrestricted {
        return Err(cause);
    }

    match resolver.last_attendance() {
        Some(last) if last.action == AttendanceAction::CheckIn => {
            info(format!("No asset in range, using {} from your last check-in", last.asset_name));
            resolver.find_asset(&last.asset_id)
        }
        _ => Err(cause),
    }
}

fn report(resolver: &Resolver, outcome: &ActionOutcome) {
    success(format!("{} at {}", outcome.action.verb(), outcome.asset.label()));

    if let Some(d) = outcome.distance_m {
        field("Distance", distance(d));
    }
    field("Status", colorize_status(outcome.today.status));
    let stamp = match outcome.action {
        AttendanceAction::CheckIn => outcome.today.check_in,
        AttendanceAction::CheckOut => outcome.today.check_out,
    };
    field("Recorded at", local_stamp(stamp));

    if let Some(store) = resolver.store()
        && let Err(e) = write_log(
            &store.conn,
            outcome.action.to_db_str(),
            &outcome.asset.id,
            &format!("{} at {}", outcome.action.verb(), outcome.position),
        )
    {
        warning(format!("Failed to write internal log: {}", e));
    }
}
