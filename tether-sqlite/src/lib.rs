mod bind;
mod cbox;
mod connection;
mod driver;
mod extract;
mod sql_writer;
mod transaction;

use std::ffi::{CStr, CString, c_char};
use tether_core::{Context, Result};

pub(crate) use cbox::*;
pub use connection::*;
pub use driver::*;
pub use sql_writer::*;
pub use transaction::*;

pub(crate) fn error_message_from_ptr(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return "Unknown error (could not extract the error message)".into();
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

pub(crate) fn as_c_string(value: impl Into<Vec<u8>>) -> Result<CString> {
    CString::new(value).context("The string contains an interior nul byte")
}
