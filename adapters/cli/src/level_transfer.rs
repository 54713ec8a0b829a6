use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_rampage_core::LevelPlan;
use maze_rampage_system_level_generation::MAX_ENEMY_COUNT;
use thiserror::Error;

const SHARE_DOMAIN: &str = "rampage";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded level payload.
pub(crate) const SHARE_HEADER: &str = "rampage:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Errors that can occur while encoding or decoding level share strings.
#[derive(Debug, Error)]
pub(crate) enum LevelTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("level string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the share string.
    #[error("level string is missing the prefix")]
    MissingPrefix,
    /// The share string did not contain a version segment.
    #[error("level string is missing the version")]
    MissingVersion,
    /// The share string did not include grid dimensions.
    #[error("level string is missing the grid dimensions")]
    MissingDimensions,
    /// The share string did not include the payload segment.
    #[error("level string is missing the payload")]
    MissingPayload,
    /// The share string used an unexpected prefix segment.
    #[error("level prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The share string used an unsupported version identifier.
    #[error("level version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The header dimensions disagree with the decoded grid.
    #[error("header announces a {expected:?} grid but the payload holds {actual:?}")]
    DimensionMismatch {
        /// Columns and rows announced by the header.
        expected: (u32, u32),
        /// Columns and rows of the decoded grid.
        actual: (u32, u32),
    },
    /// The decoded grid breaks the tile layout or its walled border.
    #[error("level grid is malformed: {0}")]
    InvalidGrid(&'static str),
    /// The decoded plan asks for a level or enemy count no level uses.
    #[error("level plan is out of range: {0}")]
    InvalidPlan(&'static str),
    /// The base64 payload could not be decoded.
    #[error("could not decode level payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not process level payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}

/// Encodes a level plan into a single-line share string.
pub(crate) fn encode(plan: &LevelPlan) -> Result<String, LevelTransferError> {
    let json = serde_json::to_vec(plan)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    Ok(format!(
        "{SHARE_HEADER}:{}x{}:{encoded}",
        plan.grid.columns(),
        plan.grid.rows()
    ))
}

/// Decodes a level plan from a share string.
pub(crate) fn decode(value: &str) -> Result<LevelPlan, LevelTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(LevelTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(LevelTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(LevelTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(LevelTransferError::MissingPayload)?;

    if domain != SHARE_DOMAIN {
        return Err(LevelTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(LevelTransferError::UnsupportedVersion(version.to_owned()));
    }

    let expected = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
    let plan: LevelPlan = serde_json::from_slice(&bytes)?;

    let actual = (plan.grid.columns(), plan.grid.rows());
    if actual != expected {
        return Err(LevelTransferError::DimensionMismatch { expected, actual });
    }
    validate(&plan)?;
    Ok(plan)
}

fn validate(plan: &LevelPlan) -> Result<(), LevelTransferError> {
    if !plan.grid.is_well_formed() {
        return Err(LevelTransferError::InvalidGrid(
            "tiles must fill the grid, tile length must be positive and the border walled",
        ));
    }
    if plan.level == 0 {
        return Err(LevelTransferError::InvalidPlan("levels start at 1"));
    }
    if plan.enemy_count > MAX_ENEMY_COUNT {
        return Err(LevelTransferError::InvalidPlan("too many enemies"));
    }
    if !(0.0..=1.0).contains(&plan.wall_density) {
        return Err(LevelTransferError::InvalidPlan(
            "wall density must lie between 0 and 1",
        ));
    }
    Ok(())
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), LevelTransferError> {
    let invalid = || LevelTransferError::InvalidDimensions(dimensions.to_owned());
    let (columns, rows) = dimensions.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;

    if columns == 0 || rows == 0 {
        return Err(invalid());
    }
    Ok((columns, rows))
}
