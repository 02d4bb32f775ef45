use crate::cli::context::{Resolver, select_asset};
use crate::errors::AppResult;
use crate::models::attendance::TodayStatus;
use crate::ui::messages::{header, info};
use crate::utils::colors::colorize_optional;
use crate::utils::date::{local_stamp, local_time};
use crate::utils::table::{Column, Table};

/// Read-only listing of this week's records.
pub fn handle(resolver: &mut Resolver, asset: Option<&str>) -> AppResult<()> {
    let target = select_asset(resolver, asset)?;
    let records = resolver.weekly_attendance(&target.id)?;

    header(format!("This week at {}", target.label()));
    if records.is_empty() {
        info("No attendance records this week.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        Column::new("CHECK-IN", 18),
        Column::new("CHECK-OUT", 10),
        Column::new("STATUS", 14),
    ]);

    for record in &records {
        let status = record
            .effective_status()
            .map(TodayStatus::from)
            .unwrap_or_default();
        table.add_row(vec![
            local_stamp(record.check_in_time),
            colorize_optional(&local_time(record.check_out_time)),
            status.as_str().to_string(),
        ]);
    }

    print!("{}", table.render());
    Ok(())
}
