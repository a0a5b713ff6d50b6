use aes::{Aes128, Aes192, Aes256};
use ctr::{
	CtrCore,
	cipher::{
		InnerIvInit as _, InvalidLength, KeyInit as _, StreamCipher as _, StreamCipherCoreWrapper,
	},
	flavors::Ctr128BE,
};
use std::fmt::Debug;

use super::{Error, generate_random_key};

/// A block cipher, run in counter mode to encrypt and decrypt values.
///
/// The keystream for a given `iv` must be the same every time it is asked for; that's what
/// makes decryption work.  You only need to implement this yourself if AES (the default, via
/// [`AesCipher`]) isn't to your liking; hand a constructor for your implementation to
/// [`SecureCookie::block_func`](super::SecureCookie::block_func).
pub trait BlockCipher: Send + Sync + Debug {
	/// The cipher's block size, in bytes, which is also the length of the IV.
	fn block_size(&self) -> usize;

	/// XOR the counter-mode keystream starting at `iv` into `buf`.
	///
	/// # Errors
	///
	/// Should return [`Error::Encryption`] or [`Error::Decryption`] if `iv` is unusable.
	fn apply_keystream(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), Error>;
}

/// AES in counter mode, with a big-endian counter spanning the whole IV.
///
/// The key length picks the variant: 16 bytes for AES-128, 24 for AES-192, 32 for AES-256.
#[derive(Clone)]
pub struct AesCipher(Aes);

#[derive(Clone)]
enum Aes {
	Aes128(Aes128),
	Aes192(Aes192),
	Aes256(Aes256),
}

impl AesCipher {
	/// Create an [`AesCipher`] from a 16, 24, or 32 byte key.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidKey`] for any other key length.
	pub fn new(key: &[u8]) -> Result<Self, Error> {
		let aes = match key.len() {
			16 => Aes128::new_from_slice(key).map(Aes::Aes128),
			24 => Aes192::new_from_slice(key).map(Aes::Aes192),
			32 => Aes256::new_from_slice(key).map(Aes::Aes256),
			n => return Err(Error::invalid_key(format!("invalid AES key size {n}"))),
		}
		.map_err(|_| Error::insanity("AES rejected a correctly-sized key"))?;

		Ok(Self(aes))
	}

	/// [`AesCipher::new`], boxed up for [`SecureCookie::block_func`](super::SecureCookie::block_func).
	pub fn boxed(key: &[u8]) -> Result<Box<dyn BlockCipher>, Error> {
		Ok(Box::new(Self::new(key)?))
	}
}

impl Debug for AesCipher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let bits = match self.0 {
			Aes::Aes128(_) => 128,
			Aes::Aes192(_) => 192,
			Aes::Aes256(_) => 256,
		};

		write!(f, "AesCipher(AES-{bits}-CTR)")
	}
}

impl BlockCipher for AesCipher {
	fn block_size(&self) -> usize {
		16
	}

	fn apply_keystream(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), Error> {
		let bad_iv =
			|_: InvalidLength| Error::invalid_key(format!("IV must be 16 bytes, not {}", iv.len()));

		match &self.0 {
			Aes::Aes128(c) => StreamCipherCoreWrapper::from_core(
				CtrCore::<Aes128, Ctr128BE>::inner_iv_slice_init(c.clone(), iv).map_err(bad_iv)?,
			)
			.apply_keystream(buf),
			Aes::Aes192(c) => StreamCipherCoreWrapper::from_core(
				CtrCore::<Aes192, Ctr128BE>::inner_iv_slice_init(c.clone(), iv).map_err(bad_iv)?,
			)
			.apply_keystream(buf),
			Aes::Aes256(c) => StreamCipherCoreWrapper::from_core(
				CtrCore::<Aes256, Ctr128BE>::inner_iv_slice_init(c.clone(), iv).map_err(bad_iv)?,
			)
			.apply_keystream(buf),
		}

		Ok(())
	}
}

/// Encrypt `plaintext` under a fresh random IV, returning the IV followed by the ciphertext.
#[tracing::instrument(level = "trace", skip(plaintext))]
pub(crate) fn encrypt(cipher: &dyn BlockCipher, plaintext: &[u8]) -> Result<Vec<u8>, Error> {
	let size = cipher.block_size();

	let Some(iv) = generate_random_key(size) else {
		tracing::debug!("Failed to generate IV");
		return Err(Error::Encryption);
	};

	let mut out = Vec::with_capacity(size + plaintext.len());
	out.extend_from_slice(iv.expose_secret());
	out.extend_from_slice(plaintext);

	let (iv, ciphertext) = out.split_at_mut(size);
	cipher
		.apply_keystream(iv, ciphertext)
		.map_err(|_| Error::Encryption)?;

	Ok(out)
}

/// Decrypt the output of [`encrypt`].  There must be at least one byte of ciphertext after the
/// IV.
#[tracing::instrument(level = "trace", skip(value))]
pub(crate) fn decrypt(cipher: &dyn BlockCipher, mut value: Vec<u8>) -> Result<Vec<u8>, Error> {
	let size = cipher.block_size();

	if value.len() <= size {
		tracing::debug!(len = value.len(), block_size = size, "Ciphertext too short");
		return Err(Error::Decryption);
	}

	let mut plaintext = value.split_off(size);
	cipher
		.apply_keystream(&value, &mut plaintext)
		.map_err(|_| Error::Decryption)?;

	Ok(plaintext)
}
