use parking_lot::Mutex;
use serde::{Serialize, de::DeserializeOwned};

use super::Error;

/// Types that know how to turn themselves into bytes, and back again, without any help.
///
/// Values are normally serialized as CBOR, which works for anything that implements
/// [`serde::Serialize`] and [`serde::Deserialize`].  If you'd rather a type used its own
/// representation, implement [`Coder`] for it and pass it to
/// [`Codec::encode_coder`](super::Codec::encode_coder) and
/// [`Codec::decode_coder`](super::Codec::decode_coder) instead.
///
/// # Example
///
/// ```rust
/// use secure_cookie::{Codec as _, Coder, SecureCookie};
///
/// #[derive(Debug, PartialEq)]
/// struct SessionId(String);
///
/// impl Coder for SessionId {
///     type Error = std::str::Utf8Error;
///
///     fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
///         Ok(self.0.as_bytes().to_vec())
///     }
///
///     fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
///         Ok(Self(std::str::from_utf8(bytes)?.to_string()))
///     }
/// }
///
/// # fn main() -> Result<(), secure_cookie::Error> {
/// let codec = SecureCookie::new(b"very-secret", None);
///
/// let token = codec.encode_coder("sid", &SessionId("abc123".to_string()))?;
/// assert_eq!(SessionId("abc123".to_string()), codec.decode_coder("sid", &token)?);
/// # Ok(())
/// # }
/// ```
pub trait Coder: Sized {
	type Error: std::error::Error + Send + Sync + 'static;

	fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

	fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

// Big enough for any text string or byte string that will fit in a cookie
const SCRATCH_SIZE: usize = 4096;

/// The default CBOR serializer, with its working buffers.
///
/// Each [`SecureCookie`](super::SecureCookie) has its own; serialize and deserialize take turns
/// at the buffers.
pub(crate) struct Transcoder {
	scratch: Mutex<Scratch>,
}

struct Scratch {
	output: Vec<u8>,
	decoder: Box<[u8]>,
}

impl Default for Transcoder {
	fn default() -> Self {
		Self {
			scratch: Mutex::new(Scratch {
				output: Vec::new(),
				decoder: vec![0u8; SCRATCH_SIZE].into_boxed_slice(),
			}),
		}
	}
}

impl std::fmt::Debug for Transcoder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("Transcoder(CBOR)")
	}
}

impl Transcoder {
	#[tracing::instrument(level = "trace", skip(self, value))]
	pub(crate) fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, Error> {
		let mut scratch = self.scratch.lock();
		scratch.output.clear();

		let result = ciborium::into_writer(value, &mut scratch.output);
		let bytes = result.map(|()| scratch.output.clone());
		scratch.output.clear();

		bytes.map_err(|e| {
			tracing::debug!(error=%e, "Serialization failed");
			Error::serialization(e)
		})
	}

	#[tracing::instrument(level = "trace", skip(self, bytes))]
	pub(crate) fn deserialize<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, Error> {
		let mut scratch = self.scratch.lock();

		ciborium::de::from_reader_with_buffer(bytes, &mut scratch.decoder[..]).map_err(|e| {
			tracing::debug!(error=%e, "Deserialization failed");
			Error::deserialization(e)
		})
	}

	/// Check that a value makes it through serialization and back in one piece.
	#[tracing::instrument(level = "debug", skip(self, value))]
	pub(crate) fn register<T: Serialize + DeserializeOwned>(&self, value: &T) -> Result<(), Error> {
		let bytes = self.serialize(value)?;
		self.deserialize::<T>(&bytes).map(|_| ())
	}
}
