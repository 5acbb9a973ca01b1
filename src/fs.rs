use std::fs::File;
use std::io::BufReader;

use camino::Utf8Path;
use terrors::OneOf;
use tracing::debug;

use crate::error::{FormatError, IoError};
use crate::parser;
use crate::store::Store;

pub fn open(path: &Utf8Path) -> Result<BufReader<File>, OneOf<(IoError,)>> {
    let file =
        File::open(path).map_err(|e| OneOf::new(IoError::new(Some(path.to_owned()), e)))?;
    Ok(BufReader::new(file))
}

/// Parse the INI file at `path`. The file is closed before this returns, on every path.
pub fn parse_file(path: &Utf8Path) -> Result<Store, OneOf<(IoError, FormatError)>> {
    debug!(%path, "reading ini file");
    let reader = open(path).map_err(OneOf::broaden)?;

    parser::parse(reader).map_err(|e| match e.narrow::<IoError, _>() {
        // Read errors from the parser don't know which file they came from.
        Ok(io) => OneOf::new(IoError::new(Some(path.to_owned()), io.source)),
        Err(format) => OneOf::broaden(format),
    })
}
