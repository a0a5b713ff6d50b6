use serde::{Serialize, de::DeserializeOwned};

use super::{Coder, Error};

/// Core trait for anything that can turn values into tamper-evident tokens, and back again.
///
/// [`SecureCookie`](super::SecureCookie) is the implementation you'll want; the trait exists so
/// that [`encode_multi`](super::encode_multi) and [`decode_multi`](super::decode_multi) can try
/// a list of codecs in turn.
pub trait Codec {
	/// Serialize `value` as CBOR, then authenticate (and maybe encrypt) it under `name`.
	///
	/// # Errors
	///
	/// Will return [`Error::Serialization`] if the value can't be serialized,
	/// [`Error::TooLong`] if the token would be longer than allowed, or whatever
	/// configuration error the codec is stuck with.
	fn encode<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<String, Error>;

	/// Check that `token` was produced by [`Codec::encode`] for `name`, recently enough, and
	/// deserialize the value within.
	///
	/// # Errors
	///
	/// Will return one of the following:
	/// * [`Error::MacInvalid`] if the token has been tampered with, was created for a different
	///   name or with a different key, or was never a token at all.
	/// * [`Error::Expired`] or [`Error::TooNew`] if the token is outside the allowed age range.
	/// * [`Error::Deserialization`] if the value isn't a `T`.
	///
	/// Whatever the error, don't trust the token.
	fn decode<T: DeserializeOwned>(&self, name: &str, token: &str) -> Result<T, Error>;

	/// As [`Codec::encode`], but letting the value provide its own bytes.
	fn encode_coder<T: Coder>(&self, name: &str, value: &T) -> Result<String, Error>;

	/// As [`Codec::decode`], but letting the value rebuild itself from its own bytes.
	fn decode_coder<T: Coder>(&self, name: &str, token: &str) -> Result<T, Error>;
}
