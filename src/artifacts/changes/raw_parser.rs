//! Parser for `git diff --raw -z --abbrev=40` output
//!
//! Each record has the shape
//!
//! ```text
//! :<src mode> <dst mode> <src id> <dst id> <status>\0<path>\0
//! :<src mode> <dst mode> <src id> <dst id> <status>\0<src path>\0<dst path>\0   (copies, renames)
//! ```
//!
//! There is no record separator: the parser reads field by field and a clean end of stream
//! is only accepted where the next record's marker would start.

use crate::artifacts::changes::change::{
    Change, ChangeKind, Endpoint, Modification, Relocation, Revision,
};
use crate::artifacts::changes::error::{FormatError, RecordField};
use crate::artifacts::objects::file_mode::FileMode;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::{BufRead, ErrorKind};
use std::path::PathBuf;

const RECORD_MARKER: u8 = b':';
const MAX_SIMILARITY_SCORE: u8 = 100;

pub struct RawParser<R: BufRead> {
    reader: R,
    record: usize,
}

impl<R: BufRead> RawParser<R> {
    pub fn new(reader: R) -> Self {
        RawParser { reader, record: 0 }
    }

    /// Parse every record until the stream ends; any malformed record discards the whole result
    pub fn parse_all(mut self) -> Result<Vec<Change>, FormatError> {
        let mut changes = Vec::new();

        while let Some(change) = self.next_change()? {
            changes.push(change);
        }

        log::debug!("parsed {} raw diff record(s)", changes.len());
        Ok(changes)
    }

    pub fn next_change(&mut self) -> Result<Option<Change>, FormatError> {
        let marker = match self.read_marker()? {
            Some(marker) => marker,
            None => return Ok(None),
        };

        if marker != RECORD_MARKER {
            return Err(FormatError::BadMarker {
                record: self.record,
                found: marker,
            });
        }

        let src_mode = FileMode::new(self.read_text(b' ', RecordField::SourceMode)?);
        let dst_mode = FileMode::new(self.read_text(b' ', RecordField::DestinationMode)?);
        let src_oid = self.read_object_id(RecordField::SourceId)?;
        let dst_oid = self.read_object_id(RecordField::DestinationId)?;
        let (kind, score) = self.read_status()?;

        let change = match kind {
            ChangeKind::Modified => Change::Modified(Modification::new(
                self.read_path(RecordField::Path)?,
                Revision::new(src_mode, src_oid),
                Revision::new(dst_mode, dst_oid),
            )),
            ChangeKind::Copied => Change::Copied(self.read_relocation(
                Revision::new(src_mode, src_oid),
                Revision::new(dst_mode, dst_oid),
                score,
            )?),
            ChangeKind::Renamed => Change::Renamed(self.read_relocation(
                Revision::new(src_mode, src_oid),
                Revision::new(dst_mode, dst_oid),
                score,
            )?),
            ChangeKind::Added => {
                Change::Added(Endpoint::new(dst_mode, dst_oid, self.read_path(RecordField::Path)?))
            }
            ChangeKind::Deleted => {
                Change::Deleted(Endpoint::new(src_mode, src_oid, self.read_path(RecordField::Path)?))
            }
            ChangeKind::Unmerged => Change::Unmerged {
                path: self.read_path(RecordField::Path)?,
            },
        };

        log::trace!("record {}: {} {}", self.record, kind, change.display_path().display());
        self.record += 1;

        Ok(Some(change))
    }

    // copies and renames carry the source path, then the destination path
    fn read_relocation(
        &mut self,
        src: Revision,
        dst: Revision,
        score: Option<u8>,
    ) -> Result<Relocation, FormatError> {
        let src_path = self.read_path(RecordField::SourcePath)?;
        let dst_path = self.read_path(RecordField::DestinationPath)?;

        Ok(Relocation::new(
            Endpoint::new(src.mode, src.oid, src_path),
            Endpoint::new(dst.mode, dst.oid, dst_path),
            score,
        ))
    }

    fn read_marker(&mut self) -> Result<Option<u8>, FormatError> {
        let mut buffer = [0; 1];

        loop {
            match self.reader.read(&mut buffer) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buffer[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(FormatError::Io {
                        record: self.record,
                        field: RecordField::Marker,
                        source,
                    });
                }
            }
        }
    }

    /// Read raw bytes up to `delimiter`, consuming and discarding the delimiter itself
    fn read_field(&mut self, delimiter: u8, field: RecordField) -> Result<Vec<u8>, FormatError> {
        let mut bytes = Vec::new();
        self.reader
            .read_until(delimiter, &mut bytes)
            .map_err(|source| FormatError::Io {
                record: self.record,
                field,
                source,
            })?;

        match bytes.pop() {
            Some(last) if last == delimiter => Ok(bytes),
            _ => Err(FormatError::Truncated {
                record: self.record,
                field,
            }),
        }
    }

    fn read_text(&mut self, delimiter: u8, field: RecordField) -> Result<String, FormatError> {
        let bytes = self.read_field(delimiter, field)?;

        String::from_utf8(bytes).map_err(|_| FormatError::InvalidUtf8 {
            record: self.record,
            field,
        })
    }

    fn read_object_id(&mut self, field: RecordField) -> Result<ObjectId, FormatError> {
        let raw = self.read_text(b' ', field)?;

        ObjectId::try_parse(raw.clone()).map_err(|_| FormatError::InvalidObjectId {
            record: self.record,
            field,
            value: raw,
        })
    }

    fn read_status(&mut self) -> Result<(ChangeKind, Option<u8>), FormatError> {
        let status = self.read_text(b'\0', RecordField::Status)?;
        let letter_end = status.chars().next().map_or(0, char::len_utf8);
        let (letter, digits) = status.split_at(letter_end);

        let kind =
            ChangeKind::from_status_letter(letter).ok_or_else(|| FormatError::UnknownStatus {
                record: self.record,
                status: status.clone(),
            })?;
        let score = digits
            .parse::<u8>()
            .ok()
            .filter(|score| *score <= MAX_SIMILARITY_SCORE);

        Ok((kind, score))
    }

    fn read_path(&mut self, field: RecordField) -> Result<PathBuf, FormatError> {
        self.read_text(b'\0', field).map(PathBuf::from)
    }
}
