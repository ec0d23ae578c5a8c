// Output writing

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, BufWriter, Write};

use crate::options::OutputTarget;

/// Write the audio bytes verbatim to stdout or a file
pub fn write_audio(target: &OutputTarget, audio: &[u8]) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            write_bytes(io::stdout().lock(), audio).context("Failed to write audio to stdout")
        }
        OutputTarget::File(path) => {
            fs::write(path, audio)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            println!("Audio content written to file: {}", path.display());
            Ok(())
        }
    }
}

fn write_bytes<W: Write>(writer: W, bytes: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    writer.write_all(bytes)?;
    writer.flush()
}
