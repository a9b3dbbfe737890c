use thiserror::Error;

/// Field of a raw diff record, used to locate parse failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Marker,
    SourceMode,
    DestinationMode,
    SourceId,
    DestinationId,
    Status,
    SourcePath,
    DestinationPath,
    Path,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RecordField::Marker => "marker",
            RecordField::SourceMode => "source mode",
            RecordField::DestinationMode => "destination mode",
            RecordField::SourceId => "source id",
            RecordField::DestinationId => "destination id",
            RecordField::Status => "status",
            RecordField::SourcePath => "source path",
            RecordField::DestinationPath => "destination path",
            RecordField::Path => "path",
        };
        write!(f, "{}", name)
    }
}

/// Malformed raw diff stream; `record` is the zero-based ordinal of the offending record
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("record {record}: expected ':' marker, found byte 0x{found:02x}")]
    BadMarker { record: usize, found: u8 },

    #[error("record {record}: stream ended inside the {field} field")]
    Truncated { record: usize, field: RecordField },

    #[error("record {record}: unknown status '{status}'")]
    UnknownStatus { record: usize, status: String },

    #[error("record {record}: {field} field is not valid UTF-8")]
    InvalidUtf8 { record: usize, field: RecordField },

    #[error("record {record}: invalid {field} '{value}'")]
    InvalidObjectId {
        record: usize,
        field: RecordField,
        value: String,
    },

    #[error("record {record}: failed to read the {field} field")]
    Io {
        record: usize,
        field: RecordField,
        #[source]
        source: std::io::Error,
    },
}
