use crate::config::Config;
use crate::db::cache;
use crate::db::log::write_log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{field, info, success, warning};
use crate::utils::date::local_stamp;

/// Show (or with `--clear`, forget) the cached last action. Purely informational.
pub fn handle(cfg: &Config, clear: bool) -> AppResult<()> {
    let pool = DbPool::open(&cfg.database_path())?;

    if clear {
        cache::clear(&pool.conn)?;
        if let Err(e) = write_log(&pool.conn, "cache_clear", "last_attendance", "Cleared last attendance") {
            warning(format!("Failed to write internal log: {}", e));
        }
        success("Last attendance cleared.");
        return Ok(());
    }

    match cache::load(&pool.conn)? {
        Some(last) => {
            info(last.hint());
            field("Asset", format!("{} ({})", last.asset_name, last.asset_id));
            field("Action", last.action.to_db_str());
            field("When", local_stamp(Some(last.timestamp)));
            field("Position", last.position);
        }
        None => info("No attendance recorded on this device yet."),
    }
    Ok(())
}
