//! The weight blob: a fixed header followed by the raw weights and then the raw biases.
//!
//! ```text
//! offset  size  field
//! 0       4     magic (u32, 0x4641484E)
//! 4       4     major version (u32)
//! 8       4     minor version (u32)
//! 12      4     patch version (u32)
//! 16      8     weight count (u64)
//! 24      8     bias count (u64)
//! 32      4*W   weights (f32)
//! 32+4*W  4*B   biases (f32)
//! ```
//!
//! Every field is written in the native byte order of the writing machine.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{Params, Result};

/// Identifies a weight blob, reads "FAHN" as a big endian integer.
pub const MAGIC: u32 = 0x4641_484E;

/// The size in bytes of the blob header.
pub const HEADER_LEN: usize = 4 * size_of::<u32>() + 2 * size_of::<u64>();

/// The current version of the crate, stamped on every written blob.
pub const VERSION: Version = Version {
    major: 1,
    minor: 0,
    patch: 0,
};

/// A semantic version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// The header at the start of every weight blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobHeader {
    pub magic: u32,
    pub version: Version,
    pub weights: u64,
    pub biases: u64,
}

impl BlobHeader {
    /// Creates the header describing `params`.
    ///
    /// # Arguments
    /// * `version` - The version to stamp on the blob.
    /// * `params` - The parameters the blob will hold.
    pub fn new(version: Version, params: &Params) -> Self {
        Self {
            magic: MAGIC,
            version,
            weights: params.weights.len() as u64,
            biases: params.biases.len() as u64,
        }
    }

    /// Encodes this header in native byte order.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0; HEADER_LEN];
        buf[0..4].copy_from_slice(&self.magic.to_ne_bytes());
        buf[4..8].copy_from_slice(&self.version.major.to_ne_bytes());
        buf[8..12].copy_from_slice(&self.version.minor.to_ne_bytes());
        buf[12..16].copy_from_slice(&self.version.patch.to_ne_bytes());
        buf[16..24].copy_from_slice(&self.weights.to_ne_bytes());
        buf[24..32].copy_from_slice(&self.biases.to_ne_bytes());
        buf
    }
}

/// Writes the blob for `params` into `writer`.
///
/// # Arguments
/// * `writer` - The destination of the blob.
/// * `version` - The version to stamp on the header.
/// * `params` - The materialized parameters.
///
/// # Returns
/// An `Io` error if any of the writes fails.
pub fn write_blob<W: Write>(mut writer: W, version: Version, params: &Params) -> Result<()> {
    let header = BlobHeader::new(version, params);

    writer.write_all(&header.to_bytes())?;
    writer.write_all(bytemuck::cast_slice(&params.weights))?;
    writer.write_all(bytemuck::cast_slice(&params.biases))?;
    writer.flush()?;
    Ok(())
}

/// Creates (or truncates) the file at `path` and writes the blob for `params` into it.
///
/// A failure halfway leaves a partial file behind.
///
/// # Arguments
/// * `path` - The destination file.
/// * `version` - The version to stamp on the header.
/// * `params` - The materialized parameters.
///
/// # Returns
/// An `Io` error if the file could not be opened or written.
pub fn write_blob_file<P: AsRef<Path>>(path: P, version: Version, params: &Params) -> Result<()> {
    let file = File::create(path)?;
    write_blob(BufWriter::new(file), version, params)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{FahrenErr, Status};

    /// A writer that accepts a fixed amount of bytes and then fails.
    struct Limited {
        buf: Vec<u8>,
        limit: usize,
    }

    impl Write for Limited {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.buf.len();
            if room == 0 {
                return Err(io::Error::other("no room left"));
            }

            let n = data.len().min(room);
            self.buf.extend_from_slice(&data[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn params() -> Params {
        Params {
            weights: vec![0.25, -0.5, 0.125],
            biases: vec![0.375],
        }
    }

    #[test]
    fn header_len() {
        assert_eq!(HEADER_LEN, 32);
    }

    #[test]
    fn layout() {
        let mut buf = Vec::new();
        write_blob(&mut buf, VERSION, &params()).unwrap();

        assert_eq!(buf.len(), HEADER_LEN + 4 * 4);
        assert_eq!(buf[0..4], MAGIC.to_ne_bytes());
        assert_eq!(buf[4..8], 1u32.to_ne_bytes());
        assert_eq!(buf[8..12], 0u32.to_ne_bytes());
        assert_eq!(buf[12..16], 0u32.to_ne_bytes());
        assert_eq!(buf[16..24], 3u64.to_ne_bytes());
        assert_eq!(buf[24..32], 1u64.to_ne_bytes());
        assert_eq!(buf[32..36], 0.25f32.to_ne_bytes());
        assert_eq!(buf[40..44], 0.125f32.to_ne_bytes());
        assert_eq!(buf[44..48], 0.375f32.to_ne_bytes());
    }

    #[test]
    fn empty_params() {
        let params = Params {
            weights: vec![],
            biases: vec![],
        };

        let mut buf = Vec::new();
        write_blob(&mut buf, VERSION, &params).unwrap();

        assert_eq!(buf.len(), HEADER_LEN);
        assert_eq!(buf[16..32], [0; 16]);
    }

    #[test]
    fn failing_writer() {
        let writer = Limited {
            buf: Vec::new(),
            limit: HEADER_LEN + 2,
        };

        let err = write_blob(writer, VERSION, &params()).unwrap_err();

        assert!(matches!(err, FahrenErr::Io(_)));
        assert_eq!(err.status(), Status::ProcessingFailed);
    }
}
