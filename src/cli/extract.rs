use crate::cli::source::{CarrierOptions, LoadedCarrier};
use crate::codec::{Codec, ExtractPolicy};
use crate::error::Result;
use crate::selector::Strategy;
use log::info;
use std::path::Path;

/// Options for the extract command
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub strategy: Strategy,
    pub policy: ExtractPolicy,
    pub carrier: CarrierOptions,
}

/// Extract a hidden message from a carrier file
pub fn extract_message(input_path: &Path, options: &ExtractOptions) -> Result<Vec<u8>> {
    let carrier = LoadedCarrier::load(input_path, &options.carrier)?;

    let codec = Codec::new(options.strategy).with_policy(options.policy);
    let message = carrier.extract(&codec)?;

    info!(
        "recovered {} bytes from {} carrier {}",
        message.len(),
        carrier.kind(),
        input_path.display()
    );
    Ok(message)
}

/// Extract a hidden message and write its raw bytes to `output_path`
pub fn extract_to_file(
    input_path: &Path,
    output_path: &Path,
    options: &ExtractOptions,
) -> Result<usize> {
    let message = extract_message(input_path, options)?;
    std::fs::write(output_path, &message)?;
    Ok(message.len())
}

/// Render a recovered message for the terminal
pub fn render_message(message: &[u8], as_hex: bool) -> String {
    if as_hex {
        hex::encode(message)
    } else {
        String::from_utf8_lossy(message).into_owned()
    }
}
