//! Shared encode/decode entry points for the baked file formats.

use std::io::Write;

use crate::error::Result;
use crate::stream::{BinaryReader, BinaryWriter};

/// A whole baked file that can be streamed to and from bytes.
///
/// Implementors only describe their sequential layout; `encode` and
/// `decode` supply the buffer handling and reject trailing garbage.
pub trait BinaryFormat: Sized {
    fn write_to<W: Write>(&self, writer: &mut BinaryWriter<W>) -> Result<()>;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self>;

    fn encode(&self) -> Result<Vec<u8>> {
        let mut writer = BinaryWriter::new(Vec::new());
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(bytes);
        let value = Self::read_from(&mut reader)?;
        reader.finish()?;
        Ok(value)
    }
}
