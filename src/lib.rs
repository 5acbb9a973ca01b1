//! A reader for flat INI files.
//!
//! An input is a sequence of `[section]` headers and `key=value` lines. Lines
//! starting with `;` or `#` and blank lines are ignored. Parsing fails on the first
//! malformed line, including any entry that appears before the first header.
//!
//! ```no_run
//! let mut store = inistore::parse(camino::Utf8Path::new("config.ini"))?;
//! if let Some(ip) = store.get("ip") {
//!     println!("ip: {ip}");
//! }
//! store.set("ip", "127.0.0.1");
//! inistore::release(store);
//! # Ok::<(), inistore::Error>(())
//! ```

use std::io::BufRead;

use camino::Utf8Path;
use terrors::OneOf;

mod error;
mod fs;
mod parser;
mod store;

pub use error::{FormatError, FormatErrorKind, IoError};
pub use store::{Entry, Section, Store};

pub type Error = OneOf<(IoError, FormatError)>;

impl Store {
    /// Parse the INI file at `path`.
    pub fn parse(path: &Utf8Path) -> Result<Self, Error> {
        fs::parse_file(path)
    }

    /// Parse INI text from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        parser::parse(reader)
    }

    /// Parse INI text held in memory.
    pub fn parse_str(text: &str) -> Result<Self, OneOf<(FormatError,)>> {
        parser::parse(text.as_bytes()).map_err(|e| match e.narrow::<FormatError, _>() {
            Ok(format) => OneOf::new(format),
            Err(_) => unreachable!("reading a byte slice of valid UTF-8 cannot fail"),
        })
    }
}

pub fn parse(path: &Utf8Path) -> Result<Store, Error> {
    Store::parse(path)
}

pub fn get<'a>(store: &'a Store, key: &str) -> Option<&'a str> {
    store.get(key)
}

pub fn set<'a>(store: &'a mut Store, key: &str, value: impl Into<String>) -> Option<&'a str> {
    store.set(key, value)
}

pub fn release(store: Store) {
    store.release();
}
