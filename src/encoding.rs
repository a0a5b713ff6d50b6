use base64::{Engine as _, engine::general_purpose::URL_SAFE};

use super::Error;

/// URL-safe base64, with padding, no line wrapping.
pub(crate) fn encode(value: impl AsRef<[u8]>) -> String {
	URL_SAFE.encode(value)
}

pub(crate) fn decode(value: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
	URL_SAFE.decode(value).map_err(|e| {
		tracing::debug!(error=%e, "Invalid base64");
		Error::InvalidValue
	})
}
