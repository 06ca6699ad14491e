//! Table definitions
//!
//! Statements are idempotent and run one at a time: Postgres refuses several
//! statements in one prepared query.

pub const EOD_PRICES: &str = r"
CREATE TABLE IF NOT EXISTS eod_prices (
    id            SERIAL PRIMARY KEY,
    symbol        TEXT NOT NULL,
    date          DATE NOT NULL,
    open          NUMERIC(12,4),
    high          NUMERIC(12,4),
    low           NUMERIC(12,4),
    close         NUMERIC(12,4),
    volume        BIGINT,
    adj_close     NUMERIC(12,4),
    exchange      TEXT,
    fetched_at    TIMESTAMPTZ DEFAULT NOW(),
    UNIQUE(symbol, date)
)";

pub const INTRADAY_PRICES: &str = r"
CREATE TABLE IF NOT EXISTS intraday_prices (
    id            SERIAL PRIMARY KEY,
    symbol        TEXT NOT NULL,
    date          TIMESTAMPTZ NOT NULL,
    interval      TEXT NOT NULL,
    open          NUMERIC(12,4),
    high          NUMERIC(12,4),
    low           NUMERIC(12,4),
    close         NUMERIC(12,4),
    volume        BIGINT,
    exchange      TEXT,
    fetched_at    TIMESTAMPTZ DEFAULT NOW(),
    UNIQUE(symbol, date, interval)
)";

/// `(table, statement)` in application order
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("eod_prices", EOD_PRICES),
    ("intraday_prices", INTRADAY_PRICES),
];

pub const UPSERT_EOD: &str = r"
INSERT INTO eod_prices (symbol, date, open, high, low, close, volume, adj_close, exchange)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (symbol, date) DO UPDATE SET
    open = EXCLUDED.open,
    high = EXCLUDED.high,
    low = EXCLUDED.low,
    close = EXCLUDED.close,
    volume = EXCLUDED.volume,
    adj_close = EXCLUDED.adj_close,
    exchange = EXCLUDED.exchange,
    fetched_at = NOW()";

pub const UPSERT_INTRADAY: &str = r"
INSERT INTO intraday_prices (symbol, date, interval, open, high, low, close, volume, exchange)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
ON CONFLICT (symbol, date, interval) DO UPDATE SET
    open = EXCLUDED.open,
    high = EXCLUDED.high,
    low = EXCLUDED.low,
    close = EXCLUDED.close,
    volume = EXCLUDED.volume,
    exchange = EXCLUDED.exchange,
    fetched_at = NOW()";

pub const SELECT_SYMBOLS: &str = "SELECT DISTINCT symbol FROM eod_prices ORDER BY symbol";

// NUMERIC decodes as a decimal; cast so rows map straight onto f64
pub const SELECT_EOD_HISTORY: &str = r"
SELECT date, COALESCE(close, 0)::float8 AS close, COALESCE(volume, 0) AS volume
FROM eod_prices
WHERE symbol = $1
ORDER BY date ASC";
