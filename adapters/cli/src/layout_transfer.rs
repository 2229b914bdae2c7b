use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tile_siege_core::layout::LevelLayout;

const TRANSFER_DOMAIN: &str = "siege";
const TRANSFER_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const TRANSFER_HEADER: &str = "siege:v1";
const FIELD_DELIMITER: char = ':';

/// Level layout packed into a single line for sharing between players.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LevelTransfer {
    /// Number of tile columns in the level.
    pub(crate) columns: u32,
    /// Number of tile rows in the level.
    pub(crate) rows: u32,
    /// Tile edge length in display pixels, when the level overrides the display default.
    pub(crate) tile_size: Option<f32>,
    /// ASCII layout of the level.
    pub(crate) layout: LevelLayout,
}

#[derive(Serialize, Deserialize)]
struct TransferPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tile_size: Option<f32>,
    layout: LevelLayout,
}

/// Errors raised while encoding or decoding level transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LayoutTransferError {
    #[error("level string was empty")]
    EmptyPayload,
    #[error("level string is missing the prefix")]
    MissingPrefix,
    #[error("level string is missing the version")]
    MissingVersion,
    #[error("level string is missing the grid dimensions")]
    MissingDimensions,
    #[error("level string is missing the payload")]
    MissingPayload,
    #[error("level prefix '{0}' is not supported")]
    InvalidPrefix(String),
    #[error("level version '{0}' is not supported")]
    UnsupportedVersion(String),
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    #[error("header declares {declared} but the layout is {actual}")]
    DimensionMismatch { declared: String, actual: String },
    #[error("could not decode level payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    #[error("could not parse level payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

impl LevelTransfer {
    /// Wraps a parsed layout for transfer.
    pub(crate) fn new(layout: LevelLayout, tile_size: Option<f32>) -> Self {
        Self {
            columns: layout.column_count(),
            rows: layout.row_count(),
            tile_size,
            layout,
        }
    }

    /// Reports whether the value looks like a transfer string rather than a path.
    pub(crate) fn is_transfer_string(value: &str) -> bool {
        value
            .trim()
            .strip_prefix(TRANSFER_DOMAIN)
            .is_some_and(|rest| rest.starts_with(FIELD_DELIMITER))
    }

    /// Encodes the level into a single-line string.
    pub(crate) fn encode(&self) -> Result<String, LayoutTransferError> {
        let payload = TransferPayload {
            tile_size: self.tile_size,
            layout: self.layout.clone(),
        };
        let json = serde_json::to_vec(&payload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{TRANSFER_HEADER}:{}x{}:{encoded}",
            self.columns, self.rows
        ))
    }

    /// Decodes a level from its string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LayoutTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LayoutTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LayoutTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LayoutTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(LayoutTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(LayoutTransferError::MissingPayload)?;

        if domain != TRANSFER_DOMAIN {
            return Err(LayoutTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != TRANSFER_VERSION {
            return Err(LayoutTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let decoded: TransferPayload = serde_json::from_slice(&bytes)?;

        if decoded.layout.column_count() != columns || decoded.layout.row_count() != rows {
            return Err(LayoutTransferError::DimensionMismatch {
                declared: dimensions.to_owned(),
                actual: format!(
                    "{}x{}",
                    decoded.layout.column_count(),
                    decoded.layout.row_count()
                ),
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_size: decoded.tile_size,
            layout: decoded.layout,
        })
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LayoutTransferError> {
    let invalid = || LayoutTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LevelLayout {
        LevelLayout::parse(&["S..#", ".T..", "...C"]).expect("valid layout")
    }

    #[test]
    fn encoded_header_names_columns_then_rows() {
        let encoded = LevelTransfer::new(layout(), Some(48.0))
            .encode()
            .expect("layout encodes");
        assert!(encoded.starts_with(&format!("{TRANSFER_HEADER}:4x3:")));

        let decoded = LevelTransfer::decode(&encoded).expect("level decodes");
        assert_eq!(decoded.layout, layout());
        assert_eq!(decoded.tile_size, Some(48.0));
    }

    #[test]
    fn transfer_strings_are_told_apart_from_paths() {
        assert!(LevelTransfer::is_transfer_string(" siege:v1:1x1:abc"));
        assert!(!LevelTransfer::is_transfer_string("levels/siege.txt"));
        assert!(!LevelTransfer::is_transfer_string("siegeworks/level.txt"));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert!(matches!(
            LevelTransfer::decode("   "),
            Err(LayoutTransferError::EmptyPayload)
        ));
        assert!(matches!(
            LevelTransfer::decode("fort:v1:3x3:e30"),
            Err(LayoutTransferError::InvalidPrefix(prefix)) if prefix == "fort"
        ));
        assert!(matches!(
            LevelTransfer::decode("siege:v2:3x3:e30"),
            Err(LayoutTransferError::UnsupportedVersion(_))
        ));
        assert!(matches!(
            LevelTransfer::decode("siege:v1:0x3:e30"),
            Err(LayoutTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            LevelTransfer::decode("siege:v1:3x3"),
            Err(LayoutTransferError::MissingPayload)
        ));
    }

    #[test]
    fn header_must_match_layout_size() {
        let encoded = LevelTransfer::new(layout(), None)
            .encode()
            .expect("layout encodes");
        let tampered = encoded.replacen(":4x3:", ":3x4:", 1);

        assert!(matches!(
            LevelTransfer::decode(&tampered),
            Err(LayoutTransferError::DimensionMismatch { .. })
        ));
    }
}
