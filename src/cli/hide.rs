use crate::cli::source::{CarrierOptions, LoadedCarrier};
use crate::codec::Codec;
use crate::error::{Result, StegoError};
use crate::image_io::is_lossy;
use crate::selector::Strategy;
use log::info;
use std::path::Path;

/// Options for the hide command
#[derive(Debug, Clone, Default)]
pub struct HideOptions {
    pub strategy: Strategy,
    pub carrier: CarrierOptions,
    /// Save image carriers even when the output format is lossy
    pub allow_lossy: bool,
}

/// Hide a message in a carrier file and write the result to `output_path`
/// Returns the number of bits written
pub fn hide_message(
    input_path: &Path,
    output_path: &Path,
    message: &[u8],
    options: &HideOptions,
) -> Result<usize> {
    if !options.carrier.raw && !options.allow_lossy && is_lossy(output_path) {
        return Err(StegoError::LossyFormat(output_path.display().to_string()));
    }

    let mut carrier = LoadedCarrier::load(input_path, &options.carrier)?;

    // Nothing is saved unless the whole message fits
    let codec = Codec::new(options.strategy);
    let bits = carrier.embed(&codec, message)?;

    carrier.save(output_path)?;
    info!(
        "hid {} bytes in {} carrier {} -> {}",
        message.len(),
        carrier.kind(),
        input_path.display(),
        output_path.display()
    );

    Ok(bits)
}
