//! Baked animation file (.anim)
//!
//! Every take samples its channels at the same fixed rate, so the file only
//! stores raw values; frame `i` of a channel is at `i / bake_fps` seconds
//! from the start of its take.
//!
//! # Layout
//! ```text
//! u32  take count
//! per take:
//!   u32  channel count
//!   per channel:
//!     u32  node index (depth-first output numbering)
//!     u8   channel id
//!     u32  sample count
//!     f64  samples[sample count]
//! ```

use std::io::Write;

use crate::error::{FormatError, Result};
use crate::formats::BinaryFormat;
use crate::stream::{BinaryReader, BinaryWriter};

/// Scalar transform component driven by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChannelId {
    Invalid = 0,
    TranslateX = 1,
    TranslateY = 2,
    TranslateZ = 3,
    RotateX = 4,
    RotateY = 5,
    RotateZ = 6,
    ScaleX = 7,
    ScaleY = 8,
    ScaleZ = 9,
}

impl ChannelId {
    pub const TRANSLATE: [ChannelId; 3] = [Self::TranslateX, Self::TranslateY, Self::TranslateZ];
    pub const ROTATE: [ChannelId; 3] = [Self::RotateX, Self::RotateY, Self::RotateZ];
    pub const SCALE: [ChannelId; 3] = [Self::ScaleX, Self::ScaleY, Self::ScaleZ];

    pub fn from_u8(value: u8) -> Result<Self> {
        Ok(match value {
            0 => Self::Invalid,
            1 => Self::TranslateX,
            2 => Self::TranslateY,
            3 => Self::TranslateZ,
            4 => Self::RotateX,
            5 => Self::RotateY,
            6 => Self::RotateZ,
            7 => Self::ScaleX,
            8 => Self::ScaleY,
            9 => Self::ScaleZ,
            other => return Err(FormatError::UnknownChannel(other)),
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::TranslateX => "translateX",
            Self::TranslateY => "translateY",
            Self::TranslateZ => "translateZ",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::RotateZ => "rotateZ",
            Self::ScaleX => "scaleX",
            Self::ScaleY => "scaleY",
            Self::ScaleZ => "scaleZ",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRecord {
    pub node: u32,
    pub channel: ChannelId,
    pub samples: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TakeRecord {
    pub channels: Vec<ChannelRecord>,
}

impl TakeRecord {
    /// Frames in the take (longest channel)
    pub fn frame_count(&self) -> usize {
        self.channels.iter().map(|c| c.samples.len()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationFile {
    pub takes: Vec<TakeRecord>,
}

impl BinaryFormat for AnimationFile {
    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()> {
        writer.len_u32(self.takes.len())?;
        for take in &self.takes {
            writer.len_u32(take.channels.len())?;
            for channel in &take.channels {
                writer.u32(channel.node)?;
                writer.u8(channel.channel as u8)?;
                writer.f64_array(&channel.samples)?;
            }
        }
        Ok(())
    }

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let take_count = reader.u32()?;
        let mut takes = Vec::new();
        for _ in 0..take_count {
            let channel_count = reader.u32()?;
            let mut channels = Vec::new();
            for _ in 0..channel_count {
                let node = reader.u32()?;
                let channel = ChannelId::from_u8(reader.u8()?)?;
                let samples = reader.f64_array()?;
                channels.push(ChannelRecord {
                    node,
                    channel,
                    samples,
                });
            }
            takes.push(TakeRecord { channels });
        }
        Ok(Self { takes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> AnimationFile {
        AnimationFile {
            takes: vec![
                TakeRecord {
                    channels: vec![ChannelRecord {
                        node: 2,
                        channel: ChannelId::TranslateY,
                        samples: vec![0.0, 0.5, 1.0],
                    }],
                },
                TakeRecord::default(),
            ],
        }
    }

    #[test]
    fn test_layout() {
        let bytes = sample_file().encode().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.push(2);
        expected.extend_from_slice(&3u32.to_le_bytes());
        for v in [0.0f64, 0.5, 1.0] {
            expected.extend_from_slice(&v.to_le_bytes());
        }
        expected.extend_from_slice(&0u32.to_le_bytes());

        assert_eq!(bytes, expected);
        assert_eq!(AnimationFile::decode(&bytes).unwrap(), sample_file());
    }

    #[test]
    fn test_empty_file_is_a_single_zero_count() {
        let bytes = AnimationFile::default().encode().unwrap();
        assert_eq!(bytes, 0u32.to_le_bytes());
    }

    #[test]
    fn test_unknown_channel_is_rejected() {
        let mut bytes = sample_file().encode().unwrap();
        // take count, channel count, node, then the channel id byte
        bytes[12] = 42;
        assert!(matches!(
            AnimationFile::decode(&bytes),
            Err(FormatError::UnknownChannel(42))
        ));
    }

    #[test]
    fn test_frame_count() {
        assert_eq!(sample_file().takes[0].frame_count(), 3);
        assert_eq!(sample_file().takes[1].frame_count(), 0);
    }
}
