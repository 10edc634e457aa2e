use crate::{
    CBox, SqliteDriver, SqliteTransaction, as_c_string,
    bind::bind_all,
    error_message_from_ptr,
    extract::{extract_name, extract_value},
};
use libsqlite3_sys::{
    SQLITE_BUSY, SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE,
    SQLITE_OPEN_URI, SQLITE_ROW, sqlite3, sqlite3_changes, sqlite3_close, sqlite3_column_count,
    sqlite3_errmsg, sqlite3_exec, sqlite3_finalize, sqlite3_free, sqlite3_last_insert_rowid,
    sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt, sqlite3_total_changes,
};
use std::{
    ffi::{CStr, c_void},
    future::Future,
    ptr,
};
use tether_core::{
    Connection, Driver, Error, Executor, Result, RowLabeled, RowNames, RowsAffected, Statement,
    future::{self, TryFutureExt},
    stream::{self, Stream},
    truncate_long,
};

/// Connection to a sqlite database through the C library.
pub struct SqliteConnection {
    pub(crate) connection: CBox<*mut sqlite3>,
}

impl SqliteConnection {
    fn last_error(&self) -> Error {
        Error::msg(error_message_from_ptr(unsafe {
            sqlite3_errmsg(*self.connection)
        }))
    }

    /// Runs one or more unbound commands separated by `;`.
    pub(crate) fn execute_batch(&mut self, sql: &str) -> Result<RowsAffected> {
        let c_sql = as_c_string(sql)?;
        unsafe {
            let before = sqlite3_total_changes(*self.connection);
            let mut message = ptr::null_mut();
            let rc = sqlite3_exec(
                *self.connection,
                c_sql.as_ptr(),
                None,
                ptr::null_mut(),
                &mut message,
            );
            if rc != SQLITE_OK {
                let error = if message.is_null() {
                    self.last_error()
                } else {
                    let error = Error::msg(error_message_from_ptr(message));
                    sqlite3_free(message as *mut c_void);
                    error
                }
                .context(format!("While executing:\n{}", truncate_long!(sql)));
                log::error!("{:#}", error);
                return Err(error);
            }
            let changes = sqlite3_total_changes(*self.connection) - before;
            Ok(RowsAffected {
                rows_affected: changes.max(0) as u64,
                last_affected_id: None,
            })
        }
    }

    fn prepare(&mut self, sql: &str) -> Result<CBox<*mut sqlite3_stmt>> {
        let c_sql = as_c_string(sql)?;
        let context = || format!("While preparing the query:\n{}", truncate_long!(sql));
        let mut statement = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_finalize(p);
        });
        let mut tail = ptr::null();
        let rc = unsafe {
            sqlite3_prepare_v2(
                *self.connection,
                c_sql.as_ptr(),
                -1,
                &mut *statement,
                &mut tail,
            )
        };
        if rc != SQLITE_OK {
            let error = self.last_error().context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let remaining = if tail.is_null() {
            ""
        } else {
            unsafe { CStr::from_ptr(tail) }.to_str().unwrap_or_default()
        };
        if !remaining.trim().is_empty() {
            let error =
                Error::msg("Cannot prepare more than one statement at a time").context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(statement)
    }

    /// Prepares, binds and steps the statement to completion.
    pub(crate) fn run(&mut self, statement: Statement) -> Result<(Vec<RowLabeled>, RowsAffected)> {
        let prepared = self.prepare(&statement.sql)?;
        if prepared.is_null() {
            // Only whitespace or comments
            return Ok(Default::default());
        }
        bind_all(*prepared, statement.bindings)?;
        let mut rows = Vec::new();
        unsafe {
            let count = sqlite3_column_count(*prepared);
            let labels = (0..count)
                .map(|i| extract_name(*prepared, i))
                .collect::<Result<RowNames>>()?;
            loop {
                match sqlite3_step(*prepared) {
                    SQLITE_BUSY => continue,
                    SQLITE_DONE => break,
                    SQLITE_ROW => rows.push(RowLabeled::new(
                        labels.clone(),
                        (0..count)
                            .map(|i| extract_value(*prepared, i))
                            .collect::<Result<_>>()?,
                    )),
                    _ => {
                        let error = self
                            .last_error()
                            .context(format!("While executing:\n{}", truncate_long!(statement.sql)));
                        log::error!("{:#}", error);
                        return Err(error);
                    }
                }
            }
            let changes = sqlite3_changes(*self.connection);
            let affected = RowsAffected {
                rows_affected: changes.max(0) as u64,
                last_affected_id: (count == 0 && changes > 0)
                    .then(|| sqlite3_last_insert_rowid(*self.connection)),
            };
            Ok((rows, affected))
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;

    fn driver(&self) -> &SqliteDriver {
        &SqliteDriver
    }

    fn execute(
        &mut self,
        statement: Statement,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        future::ready(if statement.has_bindings() {
            self.run(statement).map(|(_, affected)| affected)
        } else {
            self.execute_batch(&statement.sql)
        })
    }

    fn fetch(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send {
        async move {
            let (rows, _) = self.run(statement)?;
            Ok::<_, Error>(stream::iter(rows.into_iter().map(Ok)))
        }
        .try_flatten_stream()
    }
}

impl Connection for SqliteConnection {
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send {
        let prefix = format!("{}://", SqliteDriver::NAME);
        let result = match url.strip_prefix(&prefix) {
            Some(path) => Self::open(path),
            None => {
                let error = Error::msg(format!(
                    "Expected sqlite connection url to start with `{}`, got `{}`",
                    prefix, url
                ));
                log::error!("{}", error);
                Err(error)
            }
        };
        future::ready(result)
    }

    fn begin(&mut self) -> impl Future<Output = Result<SqliteTransaction<'_>>> + Send {
        future::ready(SqliteTransaction::new(self))
    }
}

impl SqliteConnection {
    fn open(path: &str) -> Result<Self> {
        let location = if path == ":memory:" {
            path.to_string()
        } else {
            format!("file:{}", path)
        };
        let c_location = as_c_string(location)?;
        let mut connection = CBox::new(ptr::null_mut(), |p| unsafe {
            sqlite3_close(p);
        });
        let rc = unsafe {
            sqlite3_open_v2(
                c_location.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE | SQLITE_OPEN_URI,
                ptr::null(),
            )
        };
        let result = Self { connection };
        if rc != SQLITE_OK {
            let error = result
                .last_error()
                .context(format!("Could not open the sqlite database `{}`", path));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(result)
    }
}
