use crate::{as_c_string, error_message_from_ptr};
use libsqlite3_sys::*;
use std::ffi::{c_char, c_int, c_void};
use tether_core::{Binding, Error, Result, Value};

/// Binds `bindings` in order, positional ones take the placeholders from 1.
pub(crate) fn bind_all(statement: *mut sqlite3_stmt, bindings: Vec<Binding>) -> Result<()> {
    let mut position: c_int = 0;
    for binding in bindings {
        let (index, value) = match binding {
            Binding::Positional(value) => {
                position += 1;
                (position, value)
            }
            Binding::Named(name, value) => {
                let placeholder = as_c_string(format!(":{}", name))?;
                let index = unsafe { sqlite3_bind_parameter_index(statement, placeholder.as_ptr()) };
                if index == 0 {
                    let error = Error::msg(format!("No parameter named `:{}` in the statement", name));
                    log::error!("{}", error);
                    return Err(error);
                }
                (index, value)
            }
        };
        bind_value(statement, index, value)?;
    }
    Ok(())
}

fn bind_value(statement: *mut sqlite3_stmt, index: c_int, value: Value) -> Result<()> {
    unsafe {
        let rc = match value {
            v if v.is_null() => sqlite3_bind_null(statement, index),
            Value::Boolean(Some(v)) => sqlite3_bind_int(statement, index, v as c_int),
            Value::Int64(Some(v)) => sqlite3_bind_int64(statement, index, v),
            Value::Float64(Some(v)) => sqlite3_bind_double(statement, index, v),
            Value::Varchar(Some(v)) => sqlite3_bind_text(
                statement,
                index,
                v.as_ptr() as *const c_char,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
            Value::Blob(Some(v)) => sqlite3_bind_blob(
                statement,
                index,
                v.as_ptr() as *const c_void,
                v.len() as c_int,
                SQLITE_TRANSIENT(),
            ),
            _ => sqlite3_bind_null(statement, index),
        };
        if rc != SQLITE_OK {
            let error = Error::msg(error_message_from_ptr(sqlite3_errmsg(
                sqlite3_db_handle(statement),
            )))
            .context(format!("Could not bind the parameter {}", index));
            log::error!("{:#}", error);
            return Err(error);
        }
    }
    Ok(())
}
