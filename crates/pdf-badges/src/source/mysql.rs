use super::RecordSource;
use crate::constants::DEFAULT_MYSQL_PORT;
use crate::types::{BadgeError, BadgeRecord, Result};
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Row, Value};

/// Attendee query for a Drupal Commerce store: one row per purchased pass,
/// using the most recent customer profile of each buyer.
pub const DEFAULT_QUERY: &str = r#"
SELECT
    fdcca.commerce_customer_address_name_line AS full_name
    , co.mail AS email
    , CASE
        WHEN clt.line_item_label = 'conferencepass0th' THEN 'Conference Pass'
        WHEN clt.line_item_label = 'trainingPass0th' THEN 'Training Pass'
        WHEN clt.line_item_label = 'supporterpass0th' THEN 'Supporter Pass'
      END AS pass_type
FROM
    commerce_line_item AS clt
    INNER JOIN commerce_order AS co USING (order_id)
    INNER JOIN users AS u USING (uid)
    INNER JOIN (
        SELECT uid, profile_id
        FROM commerce_customer_profile AS ccp
        WHERE profile_id = (
            SELECT max(profile_id)
            FROM commerce_customer_profile AS ccp2
            WHERE ccp.uid = ccp2.uid
        )
    ) subq USING (uid)
    INNER JOIN field_data_commerce_customer_address AS fdcca
        ON subq.profile_id = fdcca.entity_id
"#;

/// Rows of a MySQL query, each row becoming one badge.
///
/// The connection is opened in `with_records` and closed when it returns.
#[derive(Clone)]
pub struct MysqlSource {
    pub user: String,
    pub password: String,
    pub host: String,
    pub database: String,
    pub port: u16,
    pub query: String,
}

impl std::fmt::Debug for MysqlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlSource")
            .field("user", &self.user)
            .field("password", &redact_password(&self.password))
            .field("host", &self.host)
            .field("database", &self.database)
            .field("port", &self.port)
            .field("query", &self.query)
            .finish()
    }
}

impl MysqlSource {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            host: host.into(),
            database: database.into(),
            port: DEFAULT_MYSQL_PORT,
            query: DEFAULT_QUERY.to_string(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    fn connect(&self) -> Result<Conn> {
        let opts = OptsBuilder::new()
            .user(Some(&self.user))
            .pass(Some(&self.password))
            .ip_or_hostname(Some(&self.host))
            .tcp_port(self.port)
            .db_name(Some(&self.database));

        Conn::new(opts).map_err(|source| {
            let password = redact_password(&self.password);
            log::error!(
                "Could not connect to MySQL: user {}, password {}, host {}:{}, database {}",
                self.user,
                password,
                self.host,
                self.port,
                self.database
            );
            BadgeError::Connect {
                user: self.user.clone(),
                password,
                host: self.host.clone(),
                database: self.database.clone(),
                source,
            }
        })
    }
}

impl RecordSource for MysqlSource {
    fn with_records<T>(
        self,
        f: impl FnOnce(&mut dyn Iterator<Item = Result<BadgeRecord>>) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.connect()?;
        log::debug!("Connected to {}:{}/{}", self.host, self.port, self.database);

        let rows = conn.query_iter(self.query.as_str())?;
        let mut records = rows.map(|row| -> Result<BadgeRecord> { Ok(record_from_row(row?)) });
        f(&mut records)
    }
}

fn record_from_row(mut row: Row) -> BadgeRecord {
    (0..row.len())
        .map(|i| row.take::<Value, _>(i).map(column_text).unwrap_or_default())
        .collect()
}

/// Text protocol results arrive as bytes; NULL becomes an empty field.
fn column_text(value: Value) -> String {
    match value {
        Value::NULL => String::new(),
        Value::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Value::Int(n) => n.to_string(),
        Value::UInt(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Double(n) => n.to_string(),
        other => other.as_sql(true).trim_matches('\'').to_string(),
    }
}

/// Keep the first character of a password and mask the rest.
pub fn redact_password(password: &str) -> String {
    let mut chars = password.chars();
    match chars.next() {
        Some(first) => std::iter::once(first)
            .chain(chars.map(|_| '*'))
            .collect(),
        None => String::new(),
    }
}
