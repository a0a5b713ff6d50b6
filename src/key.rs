use secrecy::{ExposeSecret as _, SecretSlice};

/// Raw key material used by a [`SecureCookie`](super::SecureCookie) for authenticating or
/// encrypting values.
///
/// The bytes are kept out of `Debug` output and zeroed when the key is dropped.
#[derive(Debug)]
pub struct Key(SecretSlice<u8>);

impl Key {
	pub fn expose_secret(&self) -> &[u8] {
		self.0.expose_secret()
	}

	pub fn len(&self) -> usize {
		self.expose_secret().len()
	}

	pub fn is_empty(&self) -> bool {
		self.expose_secret().is_empty()
	}
}

impl Clone for Key {
	fn clone(&self) -> Self {
		Self(self.expose_secret().to_vec().into())
	}
}

impl From<Vec<u8>> for Key {
	fn from(k: Vec<u8>) -> Self {
		Key(k.into())
	}
}

impl From<&[u8]> for Key {
	fn from(k: &[u8]) -> Self {
		k.to_vec().into()
	}
}

impl<const N: usize> From<&[u8; N]> for Key {
	fn from(k: &[u8; N]) -> Self {
		k.to_vec().into()
	}
}

/// Create a key of `strength` bytes, read from the operating system's entropy source.
///
/// Use 32 or 64 bytes for a hash key, and 16, 24, or 32 bytes for a block key (selecting
/// AES-128, AES-192, or AES-256 respectively).  Returns `None` if the entropy source could
/// not be read, in which case you should not go making up a key of your own.
#[tracing::instrument(level = "debug")]
pub fn generate_random_key(strength: usize) -> Option<Key> {
	use rand::{TryRngCore as _, rngs::OsRng};

	let mut k = vec![0u8; strength];

	match OsRng.try_fill_bytes(&mut k) {
		Ok(()) => Some(k.into()),
		Err(e) => {
			tracing::debug!(error=%e, "Entropy source failed");
			None
		}
	}
}
