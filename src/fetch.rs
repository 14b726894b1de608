//! Remote artifact download.
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use tracing::info;

use crate::{Error, Result};

/// Fetches the body of `source_url`.
///
/// `file://` URLs are read from the local filesystem, anything else goes
/// through an HTTP(S) GET that must answer 200.
pub fn fetch_bytes(source_url: &str) -> Result<Vec<u8>> {
    if let Some(path) = source_url.strip_prefix("file://") {
        return fs::read(path).map_err(|err| Error::fetch(source_url, err));
    }
    info!("downloading {source_url}");
    let response = ureq::get(source_url).call().map_err(|err| Error::fetch(source_url, err))?;
    let response_code = response.status();
    if response_code != 200 {
        return Err(Error::fetch(source_url, format!("unexpected response code {response_code}")));
    }
    let mut bytes = vec![];
    response.into_reader().read_to_end(&mut bytes).map_err(|err| Error::fetch(source_url, err))?;
    Ok(bytes)
}

/// Downloads `source_url` into `target_file`, creating parent directories.
pub fn download<P: AsRef<Path>>(source_url: &str, target_file: P) -> Result<()> {
    let bytes = fetch_bytes(source_url)?;
    write_creating_dirs(target_file, &bytes)
}

pub(crate) fn write_creating_dirs<P: AsRef<Path>>(target_file: P, bytes: &[u8]) -> Result<()> {
    let target_file = target_file.as_ref();
    if let Some(p) = target_file.parent() {
        if !p.exists() {
            fs::create_dir_all(p)?;
        }
    }
    let f = fs::File::create(target_file)?;
    let mut writer = io::BufWriter::new(f);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}
