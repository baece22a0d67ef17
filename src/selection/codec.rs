//! Byte encoding of selections for the clipboard.
//!
//! A versioned bincode frame wrapping the ordered description list.

use crate::entities::EntityDescription;
use crate::error::SelectionError;
use serde::{Deserialize, Serialize};

pub const SELECTION_FORMAT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SelectionFrameRef<'a> {
    version: u32,
    entities: &'a [EntityDescription],
}

#[derive(Deserialize)]
struct SelectionFrame {
    version: u32,
    entities: Vec<EntityDescription>,
}

pub fn encode(entities: &[EntityDescription]) -> Result<Vec<u8>, SelectionError> {
    let frame = SelectionFrameRef {
        version: SELECTION_FORMAT_VERSION,
        entities,
    };
    Ok(bincode::serialize(&frame)?)
}

pub fn decode(bytes: &[u8]) -> Result<Vec<EntityDescription>, SelectionError> {
    let frame: SelectionFrame = bincode::deserialize(bytes)?;
    if frame.version > SELECTION_FORMAT_VERSION {
        return Err(SelectionError::UnsupportedVersion {
            found: frame.version,
            supported: SELECTION_FORMAT_VERSION,
        });
    }
    Ok(frame.entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CellDescription, ParticleDescription};
    use glam::Vec2;

    #[test]
    fn decoding_preserves_order_and_fields() {
        let entities: Vec<EntityDescription> = vec![
            ParticleDescription::new(9, Vec2::new(1.0, 2.0)).into(),
            CellDescription::new(3, Vec2::new(4.0, 5.0))
                .with_bonds([1, 2])
                .with_genome(vec![7; 4])
                .into(),
        ];

        let decoded = decode(&encode(&entities).unwrap()).unwrap();

        assert_eq!(decoded, entities);
    }

    #[test]
    fn newer_versions_are_rejected() {
        #[derive(Serialize)]
        struct FutureFrame {
            version: u32,
            entities: Vec<EntityDescription>,
        }
        let bytes = bincode::serialize(&FutureFrame {
            version: SELECTION_FORMAT_VERSION + 1,
            entities: Vec::new(),
        })
        .unwrap();

        assert!(matches!(
            decode(&bytes),
            Err(SelectionError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn truncated_input_is_a_codec_error() {
        let bytes = encode(&[CellDescription::new(1, Vec2::ZERO).into()]).unwrap();
        assert!(matches!(
            decode(&bytes[..bytes.len() / 2]),
            Err(SelectionError::Codec(_))
        ));
    }
}
