use hmac::{Hmac, Mac as _};
use sha2::{Sha224, Sha256, Sha384, Sha512};

use super::{Error, Key};

/// The hash function underneath the HMAC that authenticates every value.
///
/// Changing this on an existing deployment invalidates every value already handed out, so pick
/// one and stick with it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum HashFunction {
	Sha224,
	#[default]
	Sha256,
	Sha384,
	Sha512,
}

impl HashFunction {
	/// The length, in bytes, of a MAC produced with this hash function.
	pub fn output_size(&self) -> usize {
		match self {
			Self::Sha224 => 28,
			Self::Sha256 => 32,
			Self::Sha384 => 48,
			Self::Sha512 => 64,
		}
	}
}

macro_rules! hmac {
	($digest:ty, $key:expr, $message:expr) => {{
		let mut mac = Hmac::<$digest>::new_from_slice($key.expose_secret())
			.map_err(|_| Error::insanity("HMAC refused a key"))?;
		mac.update($message);

		Ok(mac.finalize().into_bytes().to_vec())
	}};
}

/// Compute the HMAC of `message` under `key`.
#[tracing::instrument(level = "trace", skip(key, message))]
pub(crate) fn compute_mac(
	key: &Key,
	hash: HashFunction,
	message: &[u8],
) -> Result<Vec<u8>, Error> {
	match hash {
		HashFunction::Sha224 => hmac!(Sha224, key, message),
		HashFunction::Sha256 => hmac!(Sha256, key, message),
		HashFunction::Sha384 => hmac!(Sha384, key, message),
		HashFunction::Sha512 => hmac!(Sha512, key, message),
	}
}

/// Check that `candidate` is the HMAC of `message` under `key`, without leaking (through timing)
/// how much of it was right.
///
/// A candidate of the wrong length fails straight away; MAC lengths aren't a secret.
#[tracing::instrument(level = "trace", skip(key, message, candidate))]
pub(crate) fn verify_mac(
	key: &Key,
	hash: HashFunction,
	message: &[u8],
	candidate: &[u8],
) -> Result<(), Error> {
	let expected = compute_mac(key, hash, message)?;

	if constant_time_eq::constant_time_eq(&expected, candidate) {
		Ok(())
	} else {
		Err(Error::MacInvalid)
	}
}
