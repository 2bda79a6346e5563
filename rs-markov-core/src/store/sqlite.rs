use std::path::Path;

use log::info;
use rusqlite::{Connection, params};

use super::{FlushDurability, GlobalFrequency, StoreError, TransitionDelta, TransitionStore};

/// SQLite-backed counter store.
///
/// # Responsibilities
/// - Provision the schema: `global_freqs` plus one `transitions_<n>`
///   table per order in `1..=max_order`, all idempotently
/// - Apply batched additive upserts inside a transaction
/// - Replace the global frequency snapshot wholesale
///
/// # Schema
/// - `transitions_<n>(prefix TEXT, next_symbol TEXT, count INTEGER,
///   PRIMARY KEY (prefix, next_symbol))`
/// - `global_freqs(symbol TEXT PRIMARY KEY, count INTEGER,
///   probability REAL)`
///
/// # Notes
/// Flushing an order outside the provisioned range is a schema error,
/// never a silent mid-run table creation.
pub struct SqliteStore {
	conn: Connection,
	durability: FlushDurability,
	max_order: usize,
	run_open: bool,
}

impl SqliteStore {
	/// Opens (creating if needed) the store file.
	pub fn open<P: AsRef<Path>>(path: P, durability: FlushDurability) -> Result<Self, StoreError> {
		let conn = Connection::open(path).map_err(connection_error)?;
		Self::with_connection(conn, durability)
	}

	/// Opens a private in-memory store; used by tests and dry runs.
	pub fn open_in_memory(durability: FlushDurability) -> Result<Self, StoreError> {
		let conn = Connection::open_in_memory().map_err(connection_error)?;
		Self::with_connection(conn, durability)
	}

	fn with_connection(conn: Connection, durability: FlushDurability) -> Result<Self, StoreError> {
		conn.execute_batch(
			"PRAGMA journal_mode = WAL;
			PRAGMA synchronous = NORMAL;",
		)
		.map_err(connection_error)?;
		Ok(Self { conn, durability, max_order: 0, run_open: false })
	}

	/// Provisions `global_freqs` and `transitions_1..=max_order`.
	///
	/// Idempotent: existing tables (and their accumulated counts) are
	/// left untouched.
	pub fn create_schema(&mut self, max_order: usize) -> Result<(), StoreError> {
		info!("provisioning schema for orders 1..={max_order}");

		let mut ddl = String::from(
			"CREATE TABLE IF NOT EXISTS global_freqs (
				symbol TEXT PRIMARY KEY,
				count INTEGER NOT NULL,
				probability REAL NOT NULL
			);",
		);
		for order in 1..=max_order {
			ddl.push_str(&format!(
				"CREATE TABLE IF NOT EXISTS transitions_{order} (
					prefix TEXT NOT NULL,
					next_symbol TEXT NOT NULL,
					count INTEGER NOT NULL,
					PRIMARY KEY (prefix, next_symbol)
				);"
			));
		}

		self.conn.execute_batch(&ddl).map_err(schema_error)?;
		self.max_order = max_order;
		Ok(())
	}

	/// Reads one accumulated count back; zero if the row does not exist.
	pub fn transition_count(&self, order: usize, prefix: &str, next_symbol: char) -> Result<u64, StoreError> {
		let sql = format!("SELECT count FROM transitions_{order} WHERE prefix = ?1 AND next_symbol = ?2");
		let result = self.conn.query_row(
			&sql,
			params![prefix, next_symbol.to_string()],
			|row| row.get::<_, i64>(0),
		);
		match result {
			Ok(count) => Ok(count as u64),
			Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
			Err(err) => Err(query_error(err)),
		}
	}

	/// Reads the persisted global snapshot back, sorted by symbol.
	pub fn global_freqs(&self) -> Result<Vec<GlobalFrequency>, StoreError> {
		let mut stmt = self
			.conn
			.prepare("SELECT symbol, count, probability FROM global_freqs ORDER BY symbol")
			.map_err(query_error)?;
		let rows = stmt
			.query_map([], |row| {
				Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, f64>(2)?))
			})
			.map_err(query_error)?;

		let mut out = Vec::new();
		for row in rows {
			let (symbol, count, probability) = row.map_err(query_error)?;
			let symbol = symbol
				.chars()
				.next()
				.ok_or_else(|| StoreError::Query("empty symbol in global_freqs".to_owned()))?;
			out.push(GlobalFrequency { symbol, count: count as u64, probability });
		}
		Ok(out)
	}

	fn begin_run(&mut self) -> Result<(), StoreError> {
		if !self.run_open {
			self.conn.execute_batch("BEGIN").map_err(flush_error)?;
			self.run_open = true;
		}
		Ok(())
	}

	fn check_order(&self, order: usize) -> Result<(), StoreError> {
		if order == 0 || order > self.max_order {
			return Err(StoreError::Schema(format!(
				"no transition table for order {order} (schema covers 1..={})",
				self.max_order
			)));
		}
		Ok(())
	}
}

impl TransitionStore for SqliteStore {
	fn upsert_deltas(&mut self, order: usize, deltas: &[TransitionDelta]) -> Result<(), StoreError> {
		self.check_order(order)?;

		match self.durability {
			FlushDurability::PerBatch => {
				let tx = self.conn.unchecked_transaction().map_err(flush_error)?;
				upsert_into(&tx, order, deltas)?;
				tx.commit().map_err(flush_error)
			}
			FlushDurability::EndOfRun => {
				self.begin_run()?;
				upsert_into(&self.conn, order, deltas)
			}
		}
	}

	fn replace_global_freqs(&mut self, rows: &[GlobalFrequency]) -> Result<(), StoreError> {
		match self.durability {
			FlushDurability::PerBatch => {
				let tx = self.conn.unchecked_transaction().map_err(flush_error)?;
				replace_into(&tx, rows)?;
				tx.commit().map_err(flush_error)
			}
			FlushDurability::EndOfRun => {
				self.begin_run()?;
				replace_into(&self.conn, rows)
			}
		}
	}

	fn finish(&mut self) -> Result<(), StoreError> {
		if self.run_open {
			self.conn.execute_batch("COMMIT").map_err(flush_error)?;
			self.run_open = false;
		}
		Ok(())
	}
}

fn upsert_into(conn: &Connection, order: usize, deltas: &[TransitionDelta]) -> Result<(), StoreError> {
	let sql = format!(
		"INSERT INTO transitions_{order} (prefix, next_symbol, count)
		VALUES (?1, ?2, ?3)
		ON CONFLICT (prefix, next_symbol)
		DO UPDATE SET count = count + excluded.count"
	);
	let mut stmt = conn.prepare_cached(&sql).map_err(flush_error)?;
	for delta in deltas {
		stmt.execute(params![delta.prefix, delta.next_symbol.to_string(), delta.delta as i64])
			.map_err(flush_error)?;
	}
	Ok(())
}

fn replace_into(conn: &Connection, rows: &[GlobalFrequency]) -> Result<(), StoreError> {
	conn.execute("DELETE FROM global_freqs", []).map_err(flush_error)?;
	let mut stmt = conn
		.prepare_cached("INSERT INTO global_freqs (symbol, count, probability) VALUES (?1, ?2, ?3)")
		.map_err(flush_error)?;
	for row in rows {
		stmt.execute(params![row.symbol.to_string(), row.count as i64, row.probability])
			.map_err(flush_error)?;
	}
	Ok(())
}

fn connection_error(err: rusqlite::Error) -> StoreError {
	StoreError::Connection(err.to_string())
}

fn schema_error(err: rusqlite::Error) -> StoreError {
	StoreError::Schema(err.to_string())
}

fn flush_error(err: rusqlite::Error) -> StoreError {
	StoreError::Flush(err.to_string())
}

fn query_error(err: rusqlite::Error) -> StoreError {
	StoreError::Query(err.to_string())
}
