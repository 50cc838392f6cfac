use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS historical_prices (
            symbol TEXT NOT NULL,
            date TEXT NOT NULL,
            minute TEXT NOT NULL,
            open TEXT,
            high TEXT,
            low TEXT,
            close TEXT,
            volume TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (symbol, date, minute)
        );

        CREATE INDEX IF NOT EXISTS idx_prices_symbol_date ON historical_prices(symbol, date);
        "
    ).map_err(|e| format!("Migration failed: {e}"))
}
