use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::recent;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print: true, limit } = cmd {
        let pool = DbPool::open(&cfg.database_path())?;
        let rows = recent(&pool.conn, *limit)?;

        if rows.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ID", 5),
            Column::new("DATE", 26),
            Column::new("OPERATION", 18),
            Column::new("TARGET", 32),
            Column::new("MESSAGE", 0),
        ]);
        for row in rows {
            table.add_row(vec![
                row.id.to_string(),
                row.date,
                row.operation,
                row.target,
                row.message,
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
