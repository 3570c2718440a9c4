//! Reading romdisk images back: entry count, directory table and payloads.

use std::io::{Read, Seek, SeekFrom};

use serde::Serialize;

use crate::archive::{payload_start, DirectoryEntry, COUNT_SIZE, ENTRY_SIZE};
use crate::error::PackError;

/// A reader for romdisk images.
pub struct RomdiskReader<R: Read + Seek> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> RomdiskReader<R> {
    pub fn new(mut inner: R) -> Result<Self, PackError> {
        let len = inner.seek(SeekFrom::End(0)).map_err(malformed_io)?;
        Ok(Self { inner, len })
    }

    pub fn read_count(&mut self) -> Result<u16, PackError> {
        if self.len < COUNT_SIZE as u64 {
            return Err(PackError::Malformed(format!("image is only {} bytes", self.len)));
        }
        let mut raw = [0u8; COUNT_SIZE];
        self.inner.seek(SeekFrom::Start(0)).map_err(malformed_io)?;
        self.inner.read_exact(&mut raw).map_err(malformed_io)?;
        Ok(u16::from_le_bytes(raw))
    }

    /// Reads the whole directory table and checks every payload lies inside the image.
    pub fn read_directory(&mut self) -> Result<Vec<DirectoryEntry>, PackError> {
        let count = usize::from(self.read_count()?);
        if payload_start(count) > self.len {
            return Err(PackError::Malformed(format!(
                "directory of {} entries does not fit in {} bytes",
                count, self.len
            )));
        }

        let mut entries = Vec::with_capacity(count);
        let mut raw = [0u8; ENTRY_SIZE];
        for i in 0..count {
            self.inner.read_exact(&mut raw).map_err(malformed_io)?;
            let entry = DirectoryEntry::decode(&raw);
            if entry.payload_range().end > self.len {
                return Err(PackError::Malformed(format!(
                    "entry {} ('{}') points past the end of the image",
                    i,
                    entry.name_str()
                )));
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Reads the payload bytes of `entry`.
    pub fn read_payload(&mut self, entry: &DirectoryEntry) -> Result<Vec<u8>, PackError> {
        let mut data = vec![0u8; entry.size as usize];
        self.inner.seek(SeekFrom::Start(u64::from(entry.offset))).map_err(malformed_io)?;
        self.inner.read_exact(&mut data).map_err(malformed_io)?;
        Ok(data)
    }
}

fn malformed_io(e: std::io::Error) -> PackError {
    PackError::Malformed(e.to_string())
}

/// Serializable view of one entry, as printed by the listing tool.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub name: String,
    pub size: u32,
    pub offset: u32,
    pub modified: String,
    /// Raw BCD date bytes as stored in the image.
    pub date_bytes: [u8; 8],
}

impl From<&DirectoryEntry> for EntryInfo {
    fn from(entry: &DirectoryEntry) -> Self {
        Self {
            name: entry.name_str(),
            size: entry.size,
            offset: entry.offset,
            modified: entry.date.to_string(),
            date_bytes: entry.date.to_bytes(),
        }
    }
}

/// Lists every entry of an image.
pub fn list_entries<R: Read + Seek>(image: R) -> Result<Vec<EntryInfo>, PackError> {
    let mut reader = RomdiskReader::new(image)?;
    Ok(reader.read_directory()?.iter().map(EntryInfo::from).collect())
}
