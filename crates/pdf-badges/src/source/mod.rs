//! Where badge records come from

mod csv;
#[cfg(feature = "mysql")]
mod mysql;

pub use self::csv::CsvSource;
#[cfg(feature = "mysql")]
pub use self::mysql::{DEFAULT_QUERY, MysqlSource, redact_password};

use crate::types::{BadgeRecord, Result};

/// A producer of badge records.
///
/// Records are lent to `f` for the duration of the call, so a source can
/// release whatever it holds open (files, connections) as soon as `f`
/// returns, whether or not it succeeded.
pub trait RecordSource {
    fn with_records<T>(
        self,
        f: impl FnOnce(&mut dyn Iterator<Item = Result<BadgeRecord>>) -> Result<T>,
    ) -> Result<T>
    where
        Self: Sized;
}

/// Records given directly, e.g. on the command line
impl RecordSource for Vec<BadgeRecord> {
    fn with_records<T>(
        self,
        f: impl FnOnce(&mut dyn Iterator<Item = Result<BadgeRecord>>) -> Result<T>,
    ) -> Result<T> {
        f(&mut self.into_iter().map(Ok))
    }
}
