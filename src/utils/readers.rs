use super::{Error, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read as ioRead};
use std::path::Path;

fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".gzip")
}

/// Opens a plain or gzip-compressed text input.
pub fn open_input_reader(path: &Path) -> Result<BufReader<Box<dyn ioRead>>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::Io(e),
    })?;
    if is_gzipped(path) {
        let gz_decoder = MultiGzDecoder::new(file);
        if gz_decoder.header().is_some() {
            Ok(BufReader::new(Box::new(gz_decoder)))
        } else {
            Err(Error::Parse(format!(
                "Invalid gzip header: {}",
                path.to_string_lossy()
            )))
        }
    } else {
        Ok(BufReader::new(Box::new(file)))
    }
}
