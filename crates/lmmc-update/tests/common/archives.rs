//! Archive fixture writers
//!
//! Entries are `(name, content)` pairs written in order. Tar headers get
//! their name bytes written directly so hostile names like
//! `../../etc/passwd` survive into the fixture.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// Write a zip archive with `entries` to `path`
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let file = File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }

    writer.finish().unwrap();
    path.to_path_buf()
}

/// Write a gzip-compressed tar archive with `entries` to `path`
pub fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let file = File::create(path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for (name, content) in entries {
        let header = raw_header(name, content.len() as u64);
        builder.append(&header, *content).unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap();
    path.to_path_buf()
}

/// Header whose name is copied verbatim, bypassing `set_path` validation
fn raw_header(name: &str, size: u64) -> tar::Header {
    let mut header = tar::Header::new_old();
    let bytes = name.as_bytes();
    assert!(bytes.len() < 100, "fixture entry names must fit the header");
    header.as_old_mut().name[..bytes.len()].copy_from_slice(bytes);
    header.set_size(size);
    header.set_mode(0o755);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_cksum();
    header
}

/// `len` bytes of a repeating pattern, compressible enough for bomb fixtures
pub fn patterned_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
