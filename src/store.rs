//! The madang store: one context object owning the shared handle and the
//! read-query cache, passed to (or cloned into) every session.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use madang_conn_mgr::{Database, DatabaseConfig};
use serde_json::{Value as JsonValue, json};
use sqlx::Executor;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::cache::{CacheStats, DEFAULT_TTL, QueryCache};
use crate::decode::{RowSet, bind_value, decode_rows};
use crate::error::{Error, Result};
use crate::executor::{WriteResult, run_statement};
use crate::ident;
use crate::router::{AdHocOutcome, StatementKind, classify};

/// Default path of the madang database file.
///
/// The path is a process-level constant, not runtime configuration; tests
/// and tooling may still point [`MadangStore::connect`] elsewhere.
pub const DB_FILE_PATH: &str = "madang.db";

const INSERT_CUSTOMER_SQL: &str =
   "INSERT INTO Customer (custid, name, address, phone) VALUES ($1, $2, $3, $4)";

const INSERT_ORDER_SQL: &str =
   "INSERT INTO Orders (orderid, custid, bookid, saleprice, orderdate) \
    VALUES ($1, $2, $3, $4, $5)";

const ORDERS_FOR_CUSTOMER_SQL: &str =
   "SELECT o.orderid, o.custid, c.name, o.bookid, o.saleprice, o.orderdate \
    FROM Orders o INNER JOIN Customer c ON c.custid = o.custid \
    WHERE o.custid = $1 ORDER BY o.orderid";

/// The three externally-owned madang tables.
///
/// The schema is an external given; this layer defines only the access
/// policy around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MadangTable {
   Customer,
   Orders,
   Book,
}

impl MadangTable {
   pub fn name(self) -> &'static str {
      match self {
         MadangTable::Customer => "Customer",
         MadangTable::Orders => "Orders",
         MadangTable::Book => "Book",
      }
   }

   /// Integer primary-key column of the table.
   pub fn id_column(self) -> &'static str {
      match self {
         MadangTable::Customer => "custid",
         MadangTable::Orders => "orderid",
         MadangTable::Book => "bookid",
      }
   }

   /// Fixed dump statement, which doubles as the cache key.
   ///
   /// Each dump orders by the table's natural primary key ascending, and
   /// the ordering is explicit in the SQL, never assumed from storage.
   pub(crate) fn dump_sql(self) -> &'static str {
      match self {
         MadangTable::Customer => "SELECT * FROM Customer ORDER BY custid",
         MadangTable::Orders => "SELECT * FROM Orders ORDER BY orderid",
         MadangTable::Book => "SELECT * FROM Book ORDER BY bookid",
      }
   }
}

impl FromStr for MadangTable {
   type Err = Error;

   fn from_str(s: &str) -> Result<Self> {
      match s {
         "Customer" => Ok(MadangTable::Customer),
         "Orders" => Ok(MadangTable::Orders),
         "Book" => Ok(MadangTable::Book),
         other => Err(Error::UnknownTable(other.to_string())),
      }
   }
}

/// Cache-coherent read/write access to the madang database.
///
/// Owns the one [`Database`] handle and the [`QueryCache`] generation.
/// Sessions sharing a process share one `MadangStore` (it is cheap to
/// clone), so a write by any session invalidates cached reads for all of
/// them — global invalidation is the intended policy.
#[derive(Debug, Clone)]
pub struct MadangStore {
   db: Arc<Database>,
   cache: Arc<QueryCache>,
   ttl: Duration,
}

impl MadangStore {
   /// Open the database at `path` with the default config and TTL.
   pub async fn connect(path: &str) -> Result<Self> {
      Self::connect_with(path, None, DEFAULT_TTL).await
   }

   /// Open with explicit configuration and cache TTL.
   pub async fn connect_with(
      path: &str,
      config: Option<DatabaseConfig>,
      ttl: Duration,
   ) -> Result<Self> {
      let db = Database::connect(path, config).await?;
      Ok(Self::from_database(db, ttl))
   }

   /// Wrap an already-open handle. Useful when the process opened the
   /// database before constructing the store.
   pub fn from_database(db: Arc<Database>, ttl: Duration) -> Self {
      Self {
         db,
         cache: Arc::new(QueryCache::new()),
         ttl,
      }
   }

   pub fn database(&self) -> &Arc<Database> {
      &self.db
   }

   pub fn ttl(&self) -> Duration {
      self.ttl
   }

   /// Hit/miss counters for the fixed-query cache.
   pub fn cache_stats(&self) -> CacheStats {
      self.cache.stats()
   }

   /// Dump one table, ordered by its natural primary key, served from the
   /// cache when a fresh entry exists.
   ///
   /// Execution errors are returned and never cached, so the next access
   /// retries against the engine.
   pub async fn fetch_table(&self, table: MadangTable) -> Result<RowSet> {
      let sql = table.dump_sql();

      if let Some(rows) = self.cache.lookup(sql, self.ttl) {
         return Ok(rows);
      }

      let rows = self.fetch_rows(sql, Vec::new()).await?;
      self.cache.store(sql, rows.clone());
      Ok(rows)
   }

   /// Orders for one customer, joined with Customer for the display name,
   /// ordered by orderid. Always executed against the engine (uncached).
   pub async fn fetch_orders_for_customer(&self, custid: i64) -> Result<RowSet> {
      self
         .fetch_rows(ORDERS_FOR_CUSTOMER_SQL, vec![json!(custid)])
         .await
   }

   /// Insert a customer row. Invalidates the cache on success.
   pub async fn insert_customer(
      &self,
      custid: i64,
      name: &str,
      address: &str,
      phone: &str,
   ) -> Result<WriteResult> {
      self
         .execute(
            INSERT_CUSTOMER_SQL,
            vec![json!(custid), json!(name), json!(address), json!(phone)],
         )
         .await
   }

   /// Insert an order row. The orderid comes from the identifier allocator
   /// and the order date defaults to today (UTC) when not supplied.
   ///
   /// The `next_id` read and the insert are two separate statements with no
   /// lock between them; a concurrent caller can be handed the same orderid
   /// and fail on the primary-key check, which is the authoritative
   /// uniqueness enforcement.
   pub async fn insert_order(
      &self,
      custid: i64,
      bookid: i64,
      saleprice: i64,
      orderdate: Option<Date>,
   ) -> Result<WriteResult> {
      let orderid = self.next_order_id().await?;

      let date = orderdate.unwrap_or_else(|| OffsetDateTime::now_utc().date());
      // Date's Display renders YYYY-MM-DD, the format Orders stores
      let date_str = date.to_string();

      self
         .execute(
            INSERT_ORDER_SQL,
            vec![
               json!(orderid),
               json!(custid),
               json!(bookid),
               json!(saleprice),
               json!(date_str),
            ],
         )
         .await
   }

   /// Suggested custid for the next customer insert.
   pub async fn next_customer_id(&self) -> Result<i64> {
      ident::next_id(&self.db, "Customer", "custid").await
   }

   /// Suggested orderid for the next order insert.
   pub async fn next_order_id(&self) -> Result<i64> {
      ident::next_id(&self.db, "Orders", "orderid").await
   }

   /// Execute one mutation statement; on success the whole cache generation
   /// is invalidated. On failure the cache is left untouched.
   pub async fn execute(&self, sql: &str, params: Vec<JsonValue>) -> Result<WriteResult> {
      let result = run_statement(&self.db, sql, params).await?;
      self.cache.invalidate_all();
      Ok(result)
   }

   /// Route free-form user text per the first-keyword heuristic.
   ///
   /// Reads execute uncached and return their rows; everything else goes
   /// through [`MadangStore::execute`]. A CTE read (`WITH …`) is classified
   /// as a write — a documented limitation of the classifier.
   pub async fn run_ad_hoc(&self, raw: &str) -> Result<AdHocOutcome> {
      let trimmed = raw.trim();
      let kind = classify(trimmed)?;
      debug!(?kind, "routing ad-hoc statement");

      match kind {
         StatementKind::Read => {
            let rows = self.fetch_rows(trimmed, Vec::new()).await?;
            Ok(AdHocOutcome::Rows(rows))
         }
         StatementKind::Write => {
            let result = self.execute(trimmed, Vec::new()).await?;
            Ok(AdHocOutcome::Write(result))
         }
      }
   }

   /// Run a read statement against the shared handle and decode the rows.
   async fn fetch_rows(&self, sql: &str, params: Vec<JsonValue>) -> Result<RowSet> {
      let mut q = sqlx::query(sql);
      for value in params {
         q = bind_value(q, value);
      }

      let rows = self
         .db
         .pool()
         .fetch_all(q)
         .await
         .map_err(|source| Error::Statement {
            sql: sql.to_string(),
            source,
         })?;

      decode_rows(rows)
   }
}
