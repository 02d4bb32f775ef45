mod common;
use common::{FakeBackend, HQ, asset, north_of};
use geoattend::core::GeoAttendanceResolver;
use geoattend::core::gating::CheckoutPolicy;
use geoattend::db::cache;
use geoattend::db::pool::DbPool;
use geoattend::errors::AppError;
use geoattend::geo::Thresholds;
use geoattend::location::{FixedLocation, NoLocation};
use geoattend::models::attendance::TodayStatus;
use geoattend::models::coordinate::Coordinate;
use geoattend::models::last_attendance::{AttendanceAction, LastAttendance};
use chrono::Utc;
use geoattend::api::ApiResponse;
use serde_json::json;

fn site_backend() -> FakeBackend {
    FakeBackend::with_assets(vec![
        asset("far", "Depot", Some(Coordinate::new(41.9, 12.5))),
        asset("tower-a", "Tower A", Some(HQ)),
        asset("nocoords", "Annex", None),
    ])
}

fn resolver_at(
    backend: FakeBackend,
    at: Coordinate,
) -> GeoAttendanceResolver<FakeBackend, FixedLocation> {
    GeoAttendanceResolver::new(backend, FixedLocation(at), Thresholds::default())
        .with_store(DbPool::in_memory().expect("in-memory store"))
}

#[test]
fn test_discover_selects_asset_at_user_position() {
    let mut resolver = resolver_at(site_backend(), HQ);

    let discovery = resolver.discover();

    let panel = discovery.panel.expect("an asset in range");
    assert_eq!(panel.asset.id, "tower-a");
    assert_eq!(panel.action.as_ref().unwrap().distance_m, 0.0);
    assert_eq!(panel.today.status, TodayStatus::NotCheckedIn);
    assert!(panel.gate.can_check_in);
    assert!(!panel.gate.can_check_out);
    assert_eq!(discovery.scan.skipped, 1);
    assert_eq!(resolver.backend().status_calls.get(), 1);
}

#[test]
fn test_discover_without_location() {
    let mut resolver = GeoAttendanceResolver::new(site_backend(), NoLocation, Thresholds::default());

    let discovery = resolver.discover();

    assert!(discovery.position.is_none());
    assert!(discovery.panel.is_none());
    assert!(discovery.scan.nearest.is_none());
    assert_eq!(resolver.backend().status_calls.get(), 0);
}

#[test]
fn test_discover_with_failing_asset_list() {
    let backend = site_backend();
    backend.fail_assets.set(true);
    let mut resolver = resolver_at(backend, HQ);

    let discovery = resolver.discover();

    assert!(discovery.panel.is_none());
    assert_eq!(resolver.backend().status_calls.get(), 0);
}

#[test]
fn test_discovery_radius_is_independent_of_action_radius() {
    let thresholds = Thresholds {
        discovery_m: 1000.0,
        action_m: 200.0,
    };
    let mut resolver = GeoAttendanceResolver::new(
        site_backend(),
        FixedLocation(north_of(HQ, 600.0)),
        thresholds,
    );

    let panel = resolver.discover().panel.expect("discovered within 1 km");
    assert_eq!(panel.asset.id, "tower-a");
    assert!(!panel.action.unwrap().is_within_threshold);
    assert!(!panel.gate.can_check_in);
}

#[test]
fn test_check_in_then_check_out_scenario() {
    let mut resolver = resolver_at(site_backend(), north_of(HQ, 50.0));
    let tower = resolver.find_asset("tower-a").unwrap();

    let first = resolver.check_in(&tower).expect("check-in at 50 m");
    assert_eq!(first.action, AttendanceAction::CheckIn);
    assert_eq!(first.today.status, TodayStatus::CheckedIn);
    assert!(first.today.check_in.is_some());
    assert!((first.distance_m.unwrap() - 50.0).abs() < 0.5);

    let second = resolver.check_out(&tower).expect("check-out right after");
    assert_eq!(second.today.status, TodayStatus::CheckedOut);
    assert!(second.today.check_in.is_some());
    assert!(second.today.check_out.is_some());

    let again = resolver.check_out(&tower);
    assert!(matches!(again, Err(AppError::InvalidTransition(_))));
    assert_eq!(resolver.backend().check_in_calls.get(), 1);
    assert_eq!(resolver.backend().check_out_calls.get(), 1);
}

#[test]
fn test_check_in_out_of_range_issues_no_request() {
    let mut resolver = resolver_at(site_backend(), north_of(HQ, 250.0));
    let tower = resolver.find_asset("tower-a").unwrap();

    match resolver.check_in(&tower) {
        Err(AppError::OutOfRange {
            distance_m,
            threshold_m,
            ..
        }) => {
            assert!((distance_m - 250.0).abs() < 0.5);
            assert_eq!(threshold_m, 200.0);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
    assert_eq!(resolver.backend().check_in_calls.get(), 0);
    assert_eq!(resolver.backend().status_calls.get(), 0);
}

#[test]
fn test_check_in_requires_location_and_coordinates() {
    let mut resolver = GeoAttendanceResolver::new(site_backend(), NoLocation, Thresholds::default());
    let tower = resolver.find_asset("tower-a").unwrap();
    assert!(matches!(resolver.check_in(&tower), Err(AppError::Location(_))));

    let mut resolver = resolver_at(site_backend(), HQ);
    let annex = resolver.find_asset("nocoords").unwrap();
    assert!(matches!(
        resolver.check_in(&annex),
        Err(AppError::AssetWithoutCoordinate(_))
    ));
    assert_eq!(resolver.backend().check_in_calls.get(), 0);
}

#[test]
fn test_already_checked_in_on_server() {
    let backend = site_backend();
    backend.set_today(json!({ "hasCheckedIn": true, "hasCheckedOut": false, "attendance": null }));
    let mut resolver = resolver_at(backend, HQ);
    let tower = resolver.find_asset("tower-a").unwrap();

    assert!(matches!(
        resolver.check_in(&tower),
        Err(AppError::InvalidTransition(_))
    ));
    assert_eq!(resolver.backend().check_in_calls.get(), 0);

    let out = resolver.check_out(&tower).expect("check-out allowed");
    assert_eq!(out.today.status, TodayStatus::CheckedOut);
}

#[test]
fn test_network_failure_leaves_state_unchanged() {
    let backend = site_backend();
    backend.fail_actions.set(true);
    let mut resolver = resolver_at(backend, HQ);
    let tower = resolver.find_asset("tower-a").unwrap();

    assert!(matches!(resolver.check_in(&tower), Err(AppError::Backend(_))));
    assert_eq!(resolver.today().status, TodayStatus::NotCheckedIn);
    assert!(!resolver.in_flight());
    assert!(resolver.last_attendance().is_none());

    // user retries once the network is back
    resolver.backend().fail_actions.set(false);
    let ok = resolver.check_in(&tower).expect("retry succeeds");
    assert_eq!(ok.today.status, TodayStatus::CheckedIn);
}

#[test]
fn test_backend_rejection_is_surfaced() {
    let backend = site_backend();
    backend.reject_actions.set(true);
    let mut resolver = resolver_at(backend, HQ);
    let tower = resolver.find_asset("tower-a").unwrap();

    match resolver.check_in(&tower) {
        Err(AppError::Backend(msg)) => assert_eq!(msg, "attendance window closed"),
        other => panic!("expected Backend error, got {other:?}"),
    }
    assert_eq!(resolver.today().status, TodayStatus::NotCheckedIn);
}

#[test]
fn test_action_without_returned_record_refetches_status() {
    let backend = site_backend();
    backend.echo_record.set(false);
    let mut resolver = resolver_at(backend, HQ);
    let tower = resolver.find_asset("tower-a").unwrap();

    let outcome = resolver.check_in(&tower).unwrap();
    assert_eq!(outcome.today.status, TodayStatus::CheckedIn);
    assert!(outcome.today.check_in.is_some(), "timestamp comes from the refetch");
    assert_eq!(resolver.backend().status_calls.get(), 2);
}

#[test]
fn test_checkout_proximity_policy() {
    let backend = site_backend();
    backend.set_today(json!({ "hasCheckedIn": true, "hasCheckedOut": false }));
    let mut strict = resolver_at(backend, north_of(HQ, 900.0))
        .with_checkout_policy(CheckoutPolicy::RequireProximity);
    let tower = strict.find_asset("tower-a").unwrap();
    assert!(matches!(
        strict.check_out(&tower),
        Err(AppError::OutOfRange { .. })
    ));
    assert_eq!(strict.backend().check_out_calls.get(), 0);

    let backend = site_backend();
    backend.set_today(json!({ "hasCheckedIn": true, "hasCheckedOut": false }));
    let mut relaxed = resolver_at(backend, north_of(HQ, 900.0));
    let out = relaxed.check_out(&tower).expect("checkout away from site");
    assert_eq!(out.today.status, TodayStatus::CheckedOut);
}

#[test]
fn test_stale_status_response_is_ignored() {
    let mut resolver = resolver_at(site_backend(), HQ);

    let slow = resolver.begin_status_request();
    let fresh = resolver.begin_status_request();

    let checked_in = ApiResponse::ok(json!({ "hasCheckedIn": true, "hasCheckedOut": false }));
    let applied = resolver.complete_status_request(fresh, "tower-a", Ok(checked_in));
    assert_eq!(applied.status, TodayStatus::CheckedIn);

    let late = resolver.complete_status_request(slow, "tower-a", Ok(ApiResponse::ok(json!(null))));
    assert_eq!(late.status, TodayStatus::CheckedIn);
    assert_eq!(resolver.today().status, TodayStatus::CheckedIn);
}

#[test]
fn test_status_failure_degrades_to_not_checked_in() {
    let backend = site_backend();
    backend.fail_status.set(true);
    let mut resolver = resolver_at(backend, HQ);

    let today = resolver.refresh_status("tower-a");
    assert_eq!(today.status, TodayStatus::NotCheckedIn);
}

#[test]
fn test_successful_action_updates_last_attendance_cache() {
    let mut resolver = resolver_at(site_backend(), HQ);
    let tower = resolver.find_asset("tower-a").unwrap();

    resolver.check_in(&tower).unwrap();
    let last = resolver.last_attendance().expect("cached after check-in");
    assert_eq!(last.action, AttendanceAction::CheckIn);
    assert_eq!(last.asset_id, "tower-a");
    assert_eq!(last.asset_name, "Tower A");
    assert_eq!(last.position, HQ);

    resolver.check_out(&tower).unwrap();
    let last = resolver.last_attendance().unwrap();
    assert_eq!(last.action, AttendanceAction::CheckOut);
}

#[test]
fn test_cache_never_gates_actions() {
    let store = DbPool::in_memory().unwrap();
    cache::store(
        &store.conn,
        &LastAttendance {
            action: AttendanceAction::CheckIn,
            timestamp: Utc::now(),
            asset_id: "tower-a".into(),
            asset_name: "Tower A".into(),
            position: HQ,
        },
    )
    .unwrap();

    let mut resolver = GeoAttendanceResolver::new(site_backend(), FixedLocation(HQ), Thresholds::default())
        .with_store(store);
    assert!(resolver.last_attendance().is_some());

    let panel = resolver.discover().panel.unwrap();
    assert_eq!(panel.today.status, TodayStatus::NotCheckedIn);
    assert!(panel.gate.can_check_in);
    assert!(!panel.gate.can_check_out);
}

#[test]
fn test_weekly_history_passthrough() {
    let mut resolver = resolver_at(site_backend(), HQ);
    let tower = resolver.find_asset("tower-a").unwrap();
    resolver.check_in(&tower).unwrap();

    let week = resolver.weekly_attendance("tower-a").unwrap();
    assert_eq!(week.len(), 1);
    assert_eq!(week[0].asset_id.as_deref(), Some("tower-a"));
}

#[test]
fn test_find_unknown_asset() {
    let resolver = resolver_at(site_backend(), HQ);
    assert!(matches!(
        resolver.find_asset("missing"),
        Err(AppError::AssetNotFound(_))
    ));
}

#[test]
fn test_new_day_starts_from_a_fresh_record() {
    let mut resolver = resolver_at(site_backend(), HQ);
    let tower = resolver.find_asset("tower-a").unwrap();
    resolver.check_in(&tower).unwrap();
    assert_eq!(resolver.state().status, TodayStatus::CheckedIn);

    let tomorrow = resolver.state().day.succ_opt().unwrap();
    resolver.roll_to(tomorrow);
    assert_eq!(resolver.state().day, tomorrow);
    assert_eq!(resolver.state().status, TodayStatus::NotCheckedIn);
    assert_eq!(resolver.today().status, TodayStatus::NotCheckedIn);

    // rolling back is ignored
    resolver.roll_to(tomorrow.pred_opt().unwrap());
    assert_eq!(resolver.state().day, tomorrow);

    // the backend has no record for the new day yet
    resolver.backend().today.replace(None);
    let calls = resolver.backend().status_calls.get();
    let again = resolver.check_in(&tower).expect("check-in on the new day");
    assert_eq!(again.today.status, TodayStatus::CheckedIn);
    assert_eq!(resolver.backend().status_calls.get(), calls + 1);
    assert_eq!(resolver.backend().check_in_calls.get(), 2);
}
