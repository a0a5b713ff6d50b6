use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

use super::{
	AesCipher, BlockCipher, Clock, Codec, Coder, Error, HashFunction, Key, KeyId, SystemClock,
	Transcoder, block_cipher, encoding, frame, key_id, mac,
};

/// The longest value that every browser worth caring about will store in a cookie.
pub const DEFAULT_MAX_LENGTH: usize = 4096;

/// Thirty days, in seconds.
pub const DEFAULT_MAX_AGE: i64 = 86400 * 30;

/// Encodes and decodes authenticated, and optionally encrypted, values.
///
/// Every value is serialized, encrypted (if a block key was provided), stamped with the time it
/// was created and the name it was created for, and then authenticated with an HMAC, before
/// being base64'd into a token that can safely be handed to a client.  The name isn't stored in
/// the token; it has to be provided again when decoding, and if it doesn't match, the token
/// won't decode.  That stops a value that was meant for one purpose being passed off as
/// another.
///
/// The hash key is required, and should be 32 or 64 random bytes (see
/// [`generate_random_key`](super::generate_random_key)).  The block key is optional; if you
/// want the value to be unreadable as well as unforgeable, provide a 16, 24, or 32 byte key,
/// to select AES-128, AES-192, or AES-256.
///
/// If the keys are no good (an empty hash key, say, or a block key of the wrong length), the
/// [`SecureCookie`] is still created, but every attempt to encode or decode a value will fail
/// with the same error.
///
/// # Example
///
/// ```rust
/// use secure_cookie::{Codec as _, Error, SecureCookie};
/// use std::collections::BTreeMap;
/// # fn main() -> Result<(), Error> {
///
/// let codec = SecureCookie::new(b"12345", Some(b"1234567890123456"));
///
/// let value = BTreeMap::from([("foo", "bar"), ("baz", "ding")]);
/// let token = codec.encode("sid", &value)?;
///
/// // Naturally, we can get back what we put in
/// let decoded: BTreeMap<String, String> = codec.decode("sid", &token)?;
/// assert_eq!(Some(&"bar".to_string()), decoded.get("foo"));
///
/// // ... but not under a different name
/// let result = codec.decode::<BTreeMap<String, String>>("uid", &token);
/// assert!(matches!(result, Err(Error::MacInvalid)));
///
/// // ... nor with a different key
/// let other = SecureCookie::new(b"54321", Some(b"6543210987654321"));
/// let result = other.decode::<BTreeMap<String, String>>("sid", &token);
/// assert!(matches!(result, Err(Error::MacInvalid)));
/// # Ok(())
/// # }
/// ```
pub struct SecureCookie {
	hash_key: Key,
	hash_key_id: KeyId,
	hash_func: HashFunction,
	block_key: Option<Key>,
	block: Option<Box<dyn BlockCipher>>,
	max_length: usize,
	max_age: i64,
	min_age: i64,
	state: State,
	transcoder: Transcoder,
	clock: Box<dyn Clock>,
}

// Once a SecureCookie has Failed, it stays that way.
#[derive(Clone, Debug, PartialEq)]
enum State {
	Ready,
	Failed(Fault),
}

#[derive(Clone, Debug, PartialEq)]
enum Fault {
	NoHashKey,
	NoBlockKey,
	InvalidKey(String),
}

impl From<Error> for Fault {
	fn from(e: Error) -> Self {
		match e {
			Error::NoHashKey => Self::NoHashKey,
			Error::NoBlockKey => Self::NoBlockKey,
			Error::InvalidKey(s) => Self::InvalidKey(s),
			e => Self::InvalidKey(e.to_string()),
		}
	}
}

impl From<&Fault> for Error {
	fn from(f: &Fault) -> Self {
		match f {
			Fault::NoHashKey => Error::NoHashKey,
			Fault::NoBlockKey => Error::NoBlockKey,
			Fault::InvalidKey(s) => Error::InvalidKey(s.clone()),
		}
	}
}

impl SecureCookie {
	/// Create a new [`SecureCookie`], which encrypts values if it is given a `block_key`.
	#[tracing::instrument(level = "debug", skip(hash_key, block_key))]
	pub fn new(hash_key: impl Into<Key>, block_key: Option<&[u8]>) -> Self {
		let hash_key = hash_key.into();
		let hash_key_id = key_id(&hash_key);
		tracing::debug!(%hash_key_id, "Hash key");

		let state = if hash_key.is_empty() {
			tracing::debug!("Hash key is empty");
			State::Failed(Fault::NoHashKey)
		} else {
			State::Ready
		};

		let codec = Self {
			hash_key,
			hash_key_id,
			hash_func: HashFunction::default(),
			block_key: block_key.map(Key::from),
			block: None,
			max_length: DEFAULT_MAX_LENGTH,
			max_age: DEFAULT_MAX_AGE,
			min_age: 0,
			state,
			transcoder: Transcoder::default(),
			clock: Box::new(SystemClock),
		};

		if codec.block_key.is_some() {
			codec.block_func(AesCipher::boxed)
		} else {
			codec
		}
	}

	/// Limit the length of tokens, in bytes; zero means no limit.
	///
	/// Defaults to [`DEFAULT_MAX_LENGTH`].  Tokens that would be longer fail to encode, and
	/// longer tokens presented for decoding are rejected before any other work is done.
	pub fn max_length(mut self, len: usize) -> Self {
		self.max_length = len;
		self
	}

	/// Limit how old, in seconds, a token can be and still be decoded; zero means no limit.
	///
	/// Defaults to [`DEFAULT_MAX_AGE`].
	pub fn max_age(mut self, secs: i64) -> Self {
		self.max_age = secs;
		self
	}

	/// Require tokens to be at least this old, in seconds, before they'll be decoded.
	///
	/// Defaults to zero, meaning that a token can be decoded as soon as it's created.
	pub fn min_age(mut self, secs: i64) -> Self {
		self.min_age = secs;
		self
	}

	/// Use a different hash function for the HMAC.  Defaults to SHA-256.
	pub fn hash_func(mut self, hash: HashFunction) -> Self {
		self.hash_func = hash;
		self
	}

	/// Use a different block cipher for encryption.  Defaults to [`AesCipher`].
	///
	/// `f` is called with the block key, and its result replaces any previous cipher.  If there
	/// is no block key, or `f` fails, the [`SecureCookie`] is broken for good.
	pub fn block_func<F>(mut self, f: F) -> Self
	where
		F: FnOnce(&[u8]) -> Result<Box<dyn BlockCipher>, Error>,
	{
		let Some(block_key) = &self.block_key else {
			tracing::debug!("No block key to build a cipher with");
			return self.fail(Error::NoBlockKey);
		};

		match f(block_key.expose_secret()) {
			Ok(block) => {
				tracing::debug!(?block, "Block cipher ready");
				self.block = Some(block);
				self
			}
			Err(e) => {
				tracing::debug!(error=%e, "Block cipher construction failed");
				self.fail(e)
			}
		}
	}

	/// Use a different source of the current time.  Defaults to [`SystemClock`].
	pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
		self.clock = Box::new(clock);
		self
	}

	/// Check that values like `value` survive serialization, so that a type which can't be
	/// encoded is discovered when you set things up, rather than at first use.
	///
	/// Registering is harmless to repeat, and has no effect on the tokens produced, so codecs
	/// with different registration histories can still decode each other's tokens.
	///
	/// # Errors
	///
	/// Will return [`Error::Serialization`] or [`Error::Deserialization`] if `value` doesn't
	/// make the round trip.
	pub fn register<T: Serialize + DeserializeOwned>(&self, value: &T) -> Result<(), Error> {
		self.transcoder.register(value)
	}

	fn fail(mut self, e: Error) -> Self {
		// First failure wins; there's no recovering from a bad key
		if self.state == State::Ready {
			self.state = State::Failed(e.into());
		}
		self
	}

	fn check(&self) -> Result<(), Error> {
		match &self.state {
			State::Failed(fault) => Err(fault.into()),
			State::Ready if self.hash_key.is_empty() => Err(Error::NoHashKey),
			State::Ready => Ok(()),
		}
	}

	#[tracing::instrument(level = "trace", skip(self, value))]
	fn encode_bytes(&self, name: &str, mut value: Vec<u8>) -> Result<String, Error> {
		// An empty payload field can never be split back out of the frame
		if value.is_empty() {
			tracing::debug!("Refusing to encode an empty value");
			return Err(Error::serialization("value serialized to nothing"));
		}

		if let Some(block) = &self.block {
			value = block_cipher::encrypt(block.as_ref(), &value)?;
		}
		let payload = encoding::encode(&value);

		let mut frame = frame::build_frame(name, self.clock.now(), payload.as_bytes());
		let mac = mac::compute_mac(&self.hash_key, self.hash_func, &frame[..frame.len() - 1])?;
		frame.extend_from_slice(&mac);

		// The name gets provided again at decode time, so there's no point sending it
		let token = encoding::encode(&frame[name.len() + 1..]);

		if self.max_length != 0 && token.len() > self.max_length {
			tracing::debug!(len = token.len(), max_length = self.max_length, "Token too long");
			return Err(Error::TooLong);
		}

		tracing::debug!(key_id=%self.hash_key_id, "Encoded");
		Ok(token)
	}

	#[tracing::instrument(level = "trace", skip(self, token))]
	fn decode_bytes(&self, name: &str, token: &str) -> Result<Vec<u8>, Error> {
		if self.max_length != 0 && token.len() > self.max_length {
			tracing::debug!(len = token.len(), max_length = self.max_length, "Token too long");
			return Err(Error::TooLong);
		}

		let frame = encoding::decode(token)?;

		let fields = match frame::split_frame(&frame) {
			Ok(fields) => fields,
			Err(e) => {
				// Do the same work as a MAC check would, so a mangled token takes as long as a
				// forged one
				let _ = mac::verify_mac(
					&self.hash_key,
					self.hash_func,
					&frame::mac_input(name, &frame),
					&[],
				);
				tracing::debug!(key_id=%self.hash_key_id, "Malformed token");
				return Err(e);
			}
		};

		let signed = frame::mac_input(name, fields.signed_part(&frame));
		mac::verify_mac(&self.hash_key, self.hash_func, &signed, fields.mac).inspect_err(|_| {
			tracing::debug!(key_id=%self.hash_key_id, "MAC verification failed");
		})?;

		let timestamp = std::str::from_utf8(fields.timestamp)
			.ok()
			.and_then(|t| t.parse::<i64>().ok())
			.ok_or(Error::TimestampInvalid)?;

		let now = self.clock.now();
		if self.min_age != 0 && timestamp > now.saturating_sub(self.min_age) {
			tracing::debug!(%timestamp, %now, min_age = self.min_age, "Token too new");
			return Err(Error::TooNew);
		}
		if self.max_age != 0 && timestamp < now.saturating_sub(self.max_age) {
			tracing::debug!(%timestamp, %now, max_age = self.max_age, "Token expired");
			return Err(Error::Expired);
		}

		let value = encoding::decode(fields.payload)?;

		if let Some(block) = &self.block {
			block_cipher::decrypt(block.as_ref(), value)
		} else {
			Ok(value)
		}
	}
}

impl Codec for SecureCookie {
	#[tracing::instrument(level = "debug", skip(self, value))]
	fn encode<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<String, Error> {
		self.check()?;

		let bytes = self.transcoder.serialize(value)?;
		self.encode_bytes(name, bytes)
	}

	#[tracing::instrument(level = "debug", skip(self, token))]
	fn decode<T: DeserializeOwned>(&self, name: &str, token: &str) -> Result<T, Error> {
		self.check()?;

		let bytes = self.decode_bytes(name, token)?;
		self.transcoder.deserialize(&bytes)
	}

	#[tracing::instrument(level = "debug", skip(self, value))]
	fn encode_coder<T: Coder>(&self, name: &str, value: &T) -> Result<String, Error> {
		self.check()?;

		let bytes = value.to_bytes().map_err(Error::serialization)?;
		self.encode_bytes(name, bytes)
	}

	#[tracing::instrument(level = "debug", skip(self, token))]
	fn decode_coder<T: Coder>(&self, name: &str, token: &str) -> Result<T, Error> {
		self.check()?;

		let bytes = self.decode_bytes(name, token)?;
		T::from_bytes(&bytes).map_err(Error::deserialization)
	}
}

impl Debug for SecureCookie {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SecureCookie")
			.field("hash_key_id", &self.hash_key_id)
			.field("hash_func", &self.hash_func)
			.field("block", &self.block)
			.field("max_length", &self.max_length)
			.field("max_age", &self.max_age)
			.field("min_age", &self.min_age)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
