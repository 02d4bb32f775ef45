//! GeoAttendanceResolver: position + assets → actionable asset → today status → gates.

use crate::api::{ApiResponse, AttendanceBackend};
use crate::core::gating::{self, ActionGate, CheckoutPolicy};
use crate::core::reconcile::reconcile_body;
use crate::core::sequence::{RequestSequencer, Ticket};
use crate::core::state::{AttendanceState, Transition};
use crate::db::cache;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::geo::proximity::{self, ProximityResult, ProximityScan, Thresholds};
use crate::location::LocationProvider;
use crate::models::attendance::{AttendanceRecord, TodayAttendance, TodayStatus};
use crate::models::coordinate::{AssetLocation, Coordinate};
use crate::models::last_attendance::{AttendanceAction, LastAttendance};
use crate::utils::date;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

/// Everything the attendance panel needs for one asset.
#[derive(Debug, Clone)]
pub struct Panel {
    pub asset: AssetLocation,
    pub position: Option<Coordinate>,
    /// Proximity judged against the action radius.
    pub action: Option<ProximityResult>,
    pub today: TodayAttendance,
    pub gate: ActionGate,
}

/// Result of auto-discovery.
#[derive(Debug, Clone)]
pub struct Discovery {
    pub position: Option<Coordinate>,
    pub scan: ProximityScan,
    /// Present only when an asset lies within the discovery radius.
    pub panel: Option<Panel>,
}

/// A successful check-in or check-out.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub action: AttendanceAction,
    pub asset: AssetLocation,
    pub position: Coordinate,
    pub distance_m: Option<f64>,
    pub today: TodayAttendance,
}

pub struct GeoAttendanceResolver<B, L> {
    backend: B,
    location: L,
    thresholds: Thresholds,
    checkout_policy: CheckoutPolicy,
    sequencer: RequestSequencer,
    today: TodayAttendance,
    today_asset: Option<String>,
    state: AttendanceState,
    store: Option<DbPool>,
}

impl<B: AttendanceBackend, L: LocationProvider> GeoAttendanceResolver<B, L> {
    pub fn new(backend: B, location: L, thresholds: Thresholds) -> Self {
        Self {
            backend,
            location,
            thresholds,
            checkout_policy: CheckoutPolicy::default(),
            sequencer: RequestSequencer::new(),
            today: TodayAttendance::not_checked_in(),
            today_asset: None,
            state: AttendanceState::new(date::today(), TodayStatus::NotCheckedIn),
            store: None,
        }
    }

    pub fn with_checkout_policy(mut self, policy: CheckoutPolicy) -> Self {
        self.checkout_policy = policy;
        self
    }

    /// Attach the local store used for the last-attendance hint.
    pub fn with_store(mut self, store: DbPool) -> Self {
        self.store = Some(store);
        self
    }

    pub fn store(&self) -> Option<&DbPool> {
        self.store.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn today(&self) -> &TodayAttendance {
        &self.today
    }

    pub fn in_flight(&self) -> bool {
        self.sequencer.in_flight()
    }

    pub fn checkout_policy(&self) -> CheckoutPolicy {
        self.checkout_policy
    }

    /// Day and status the next action is checked against.
    pub fn state(&self) -> AttendanceState {
        self.state
    }

    /// Move forward to `day`. A new day starts from a fresh record, so the
    /// loaded status is dropped and fetched again before the next action.
    pub fn roll_to(&mut self, day: NaiveDate) {
        if day <= self.state.day {
            return;
        }
        self.state.roll_to(day);
        self.today = TodayAttendance::not_checked_in();
        self.today_asset = None;
        debug!(%day, "attendance day rolled over");
    }

    /// Current position, or `None` when unavailable (degrades to "no asset in range").
    pub fn position(&self) -> Option<Coordinate> {
        match self.location.current_position() {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(error = %e, "location unavailable");
                None
            }
        }
    }

    fn require_position(&self) -> AppResult<Coordinate> {
        self.location
            .current_position()
            .map_err(|e| AppError::Location(e.to_string()))
    }

    /// Asset listing; a failing backend yields an empty list.
    pub fn assets(&self) -> Vec<AssetLocation> {
        match self.backend.list_assets() {
            Ok(list) => list,
            Err(e) => {
                warn!(error = %e, "asset list unavailable");
                Vec::new()
            }
        }
    }

    /// Look up one asset by id. Unlike [`Self::assets`], errors propagate.
    pub fn find_asset(&self, asset_id: &str) -> AppResult<AssetLocation> {
        self.backend
            .list_assets()?
            .into_iter()
            .find(|a| a.id == asset_id)
            .ok_or_else(|| AppError::AssetNotFound(asset_id.to_string()))
    }

    /// Find the first asset within the discovery radius and load its panel.
    pub fn discover(&mut self) -> Discovery {
        let position = self.position();
        let assets = if position.is_some() {
            self.assets()
        } else {
            Vec::new()
        };
        let scan = proximity::scan_from(position, &assets, self.thresholds.discovery_m);

        if let Some(nearest) = &scan.nearest {
            debug!(
                asset_id = %nearest.asset.id,
                distance_m = nearest.distance_m,
                in_range = scan.has_asset_in_range(),
                "proximity scan finished"
            );
        }

        let panel = scan
            .in_range
            .as_ref()
            .map(|hit| hit.asset.clone())
            .map(|asset| self.panel_at(asset, position));

        Discovery {
            position,
            scan,
            panel,
        }
    }

    /// Load the panel for an asset chosen by the caller.
    pub fn inspect(&mut self, asset: AssetLocation) -> Panel {
        let position = self.position();
        self.panel_at(asset, position)
    }

    fn panel_at(&mut self, asset: AssetLocation, position: Option<Coordinate>) -> Panel {
        let action = position.and_then(|p| proximity::within(p, &asset, self.thresholds.action_m));
        let today = self.refresh_status(&asset.id);
        let gate = gating::evaluate(
            &today,
            action.as_ref(),
            self.in_flight(),
            self.checkout_policy,
        );

        Panel {
            asset,
            position,
            action,
            today,
            gate,
        }
    }

    /// Fetch and apply today's status for `asset_id`.
    pub fn refresh_status(&mut self, asset_id: &str) -> TodayAttendance {
        self.roll_to(date::today());
        let ticket = self.begin_status_request();
        let response = self.backend.today_status(asset_id);
        self.complete_status_request(ticket, asset_id, response)
    }

    pub fn begin_status_request(&mut self) -> Ticket {
        self.sequencer.begin()
    }

    /// Apply a status response unless a newer one was applied already.
    /// Returns the state in effect afterwards.
    pub fn complete_status_request(
        &mut self,
        ticket: Ticket,
        asset_id: &str,
        response: AppResult<ApiResponse>,
    ) -> TodayAttendance {
        let today = match response {
            Ok(resp) => reconcile_body(resp.data.as_ref(), resp.success),
            Err(e) => {
                warn!(asset_id, error = %e, "today status unavailable");
                TodayAttendance::not_checked_in()
            }
        };

        if self.sequencer.finish(ticket) {
            debug!(asset_id, ticket = ticket.value(), status = today.status.as_str(), "status applied");
            self.state.status = today.status;
            self.today = today;
            self.today_asset = Some(asset_id.to_string());
        } else {
            debug!(asset_id, ticket = ticket.value(), "stale status response dropped");
        }
        self.today.clone()
    }

    fn ensure_status(&mut self, asset_id: &str) {
        self.roll_to(date::today());
        if self.today_asset.as_deref() != Some(asset_id) {
            self.refresh_status(asset_id);
        }
    }

    pub fn check_in(&mut self, asset: &AssetLocation) -> AppResult<ActionOutcome> {
        let position = self.require_position()?;
        let action = proximity::within(position, asset, self.thresholds.action_m)
            .ok_or_else(|| AppError::AssetWithoutCoordinate(asset.label()))?;

        // rejected locally, before any request leaves the machine
        if !action.is_within_threshold {
            return Err(out_of_range(&action));
        }

        self.ensure_status(&asset.id);
        let gate = gating::evaluate(&self.today, Some(&action), self.in_flight(), self.checkout_policy);
        if !gate.can_check_in {
            return Err(self.refusal(Transition::CheckIn));
        }

        let ticket = self.sequencer.begin();
        let response = self.backend.check_in(&asset.id, position);
        self.finish_action(ticket, Transition::CheckIn, asset, position, Some(action.distance_m), response)
    }

    pub fn check_out(&mut self, asset: &AssetLocation) -> AppResult<ActionOutcome> {
        let position = self.require_position()?;
        let action = proximity::within(position, asset, self.thresholds.action_m);

        if self.checkout_policy == CheckoutPolicy::RequireProximity {
            match &action {
                None => return Err(AppError::AssetWithoutCoordinate(asset.label())),
                Some(a) if !a.is_within_threshold => return Err(out_of_range(a)),
                Some(_) => {}
            }
        }

        self.ensure_status(&asset.id);
        let gate = gating::evaluate(&self.today, action.as_ref(), self.in_flight(), self.checkout_policy);
        if !gate.can_check_out {
            return Err(self.refusal(Transition::CheckOut));
        }

        let ticket = self.sequencer.begin();
        let response = self.backend.check_out(&asset.id, position);
        let distance = action.map(|a| a.distance_m);
        self.finish_action(ticket, Transition::CheckOut, asset, position, distance, response)
    }

    fn refusal(&self, t: Transition) -> AppError {
        if self.in_flight() {
            return AppError::RequestInFlight;
        }
        let mut probe = self.state;
        match probe.apply(t) {
            Err(e) => e,
            Ok(_) => AppError::Other("action not permitted".into()),
        }
    }

    fn finish_action(
        &mut self,
        ticket: Ticket,
        t: Transition,
        asset: &AssetLocation,
        position: Coordinate,
        distance_m: Option<f64>,
        response: AppResult<ApiResponse>,
    ) -> AppResult<ActionOutcome> {
        // an action outranks any status request issued before it
        self.sequencer.finish(ticket);

        let resp = response?;
        if !resp.success {
            return Err(AppError::Backend(resp.failure_message()));
        }

        let mut state = self.state;
        let next = state.apply(t)?;

        let returned = resp.data.as_ref().and_then(|d| {
            AttendanceRecord::from_json(d).or_else(|| {
                ["attendance", "record"]
                    .iter()
                    .find_map(|k| d.get(*k).and_then(AttendanceRecord::from_json))
            })
        });

        let mut today = match returned {
            Some(record) => TodayAttendance::from_record(record),
            None => self.refresh_status(&asset.id),
        };
        // the server may lag behind its own success response
        today.status = next;
        self.today = today;
        self.state = state;
        self.today_asset = Some(asset.id.clone());

        let action = match t {
            Transition::CheckIn => AttendanceAction::CheckIn,
            Transition::CheckOut => AttendanceAction::CheckOut,
        };
        let stamped = match action {
            AttendanceAction::CheckIn => self.today.check_in,
            AttendanceAction::CheckOut => self.today.check_out,
        };
        info!(asset_id = %asset.id, action = action.to_db_str(), status = self.today.status.as_str(), "attendance action succeeded");

        self.remember(LastAttendance {
            action,
            timestamp: stamped.unwrap_or_else(Utc::now),
            asset_id: asset.id.clone(),
            asset_name: asset.name.clone(),
            position,
        });

        Ok(ActionOutcome {
            action,
            asset: asset.clone(),
            position,
            distance_m,
            today: self.today.clone(),
        })
    }

    fn remember(&self, entry: LastAttendance) {
        if let Some(store) = &self.store
            && let Err(e) = cache::store(&store.conn, &entry)
        {
            warn!(error = %e, "could not update last-attendance cache");
        }
    }

    /// Display hint from the local cache. Never used for gating.
    pub fn last_attendance(&self) -> Option<LastAttendance> {
        let store = self.store.as_ref()?;
        match cache::load(&store.conn) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "could not read last-attendance cache");
                None
            }
        }
    }

    pub fn weekly_attendance(&self, asset_id: &str) -> AppResult<Vec<AttendanceRecord>> {
        self.backend.weekly_attendance(asset_id)
    }
}

fn out_of_range(p: &ProximityResult) -> AppError {
    AppError::OutOfRange {
        asset: p.asset.label(),
        distance_m: p.distance_m,
        threshold_m: p.threshold_m,
    }
}
