//! Animation encoder (.anim)

use bake_common::{AnimationFile, BinaryFormat, ChannelRecord, TakeRecord};

use crate::error::{ReferenceKind, Result};
use crate::hierarchy::IndexRemap;
use crate::import::AnimationTake;

/// Rewrite channel targets into depth-first numbering.
pub fn remap_takes(takes: &[AnimationTake], remap: &IndexRemap) -> Result<AnimationFile> {
    let takes = takes
        .iter()
        .map(|take| {
            let channels = take
                .channels
                .iter()
                .map(|channel| {
                    Ok(ChannelRecord {
                        node: remap.resolve(channel.node, ReferenceKind::Node)?,
                        channel: channel.channel,
                        samples: channel.samples.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(TakeRecord { channels })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(AnimationFile { takes })
}

pub fn encode_takes(takes: &[AnimationTake], remap: &IndexRemap) -> Result<Vec<u8>> {
    let file = remap_takes(takes, remap)?;
    for (take, record) in takes.iter().zip(&file.takes) {
        tracing::debug!(
            "Take '{}': {} channels, {} frames",
            take.name,
            record.channels.len(),
            record.frame_count()
        );
    }
    Ok(file.encode()?)
}
