// Input acquisition

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};

use crate::options::InputSource;

/// Read the whole input text from stdin or a file
pub fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => read_text(io::stdin().lock())
            .context("Failed to read input from stdin (input must be UTF-8 text)"),
        InputSource::File(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {}", path.display()))?;
            read_text(file)
                .with_context(|| {
                    format!(
                        "Failed to read input file: {} (input must be UTF-8 text)",
                        path.display()
                    )
                })
        }
    }
}

/// Read text, dropping trailing line endings
fn read_text<R: Read>(mut reader: R) -> Result<String> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let trimmed_len = text.trim_end_matches(['\r', '\n']).len();
    text.truncate(trimmed_len);
    Ok(text)
}
