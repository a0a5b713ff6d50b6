use serde::{Serialize, de::DeserializeOwned};

use super::{Codec, Error, MultiError, SecureCookie};

/// Create a list of [`SecureCookie`]s from a flat list of keys: hash key, block key, hash key,
/// block key, and so on.
///
/// An empty block key, or a hash key at the end of the list without a block key to follow it,
/// makes for a [`SecureCookie`] that signs, but doesn't encrypt.  Put the current keys first,
/// so that [`encode_multi`] uses them.
///
/// # Example
///
/// ```rust
/// use secure_cookie::{Error, codecs_from_pairs, decode_multi, encode_multi};
/// # fn main() -> Result<(), Error> {
///
/// let old_codecs = codecs_from_pairs(&[&b"old-hash-key"[..], b"old-block-key-16"]);
/// let token = encode_multi("sid", &"hello", &old_codecs)?;
///
/// // Rotate in a new pair of keys, keeping the old ones around for decoding
/// let codecs = codecs_from_pairs(&[
///     &b"new-hash-key"[..],
///     b"new-block-key-16",
///     b"old-hash-key",
///     b"old-block-key-16",
/// ]);
///
/// let decoded: String = decode_multi("sid", &token, &codecs)?;
/// assert_eq!("hello", decoded);
///
/// // New values are encoded with the new keys, which the old codecs know nothing about
/// let token = encode_multi("sid", &"hello", &codecs)?;
/// assert!(decode_multi::<String, _>("sid", &token, &old_codecs).is_err());
/// # Ok(())
/// # }
/// ```
#[tracing::instrument(level = "debug", skip(key_pairs))]
pub fn codecs_from_pairs<K: AsRef<[u8]>>(key_pairs: &[K]) -> Vec<SecureCookie> {
	key_pairs
		.chunks(2)
		.map(|pair| {
			let block_key = pair
				.get(1)
				.map(|k| k.as_ref())
				.filter(|k| !k.is_empty());
			SecureCookie::new(pair[0].as_ref(), block_key)
		})
		.collect()
}

/// Encode a value with the first of `codecs` that is able to.
///
/// # Errors
///
/// Will return [`Error::NoCodecs`] if `codecs` is empty, or an [`Error::Multi`] holding every
/// codec's failure if none of them succeed.
#[tracing::instrument(level = "debug", skip(value, codecs))]
pub fn encode_multi<T, C>(name: &str, value: &T, codecs: &[C]) -> Result<String, Error>
where
	T: Serialize + ?Sized,
	C: Codec,
{
	try_each(codecs, |codec| codec.encode(name, value))
}

/// Decode a token with the first of `codecs` that accepts it.
///
/// # Errors
///
/// Will return [`Error::NoCodecs`] if `codecs` is empty, or an [`Error::Multi`] holding every
/// codec's failure if none of them succeed.
#[tracing::instrument(level = "debug", skip(token, codecs))]
pub fn decode_multi<T, C>(name: &str, token: &str, codecs: &[C]) -> Result<T, Error>
where
	T: DeserializeOwned,
	C: Codec,
{
	try_each(codecs, |codec| codec.decode(name, token))
}

fn try_each<C, R>(codecs: &[C], mut f: impl FnMut(&C) -> Result<R, Error>) -> Result<R, Error> {
	if codecs.is_empty() {
		return Err(Error::NoCodecs);
	}

	let mut errors = MultiError::default();

	for (i, codec) in codecs.iter().enumerate() {
		match f(codec) {
			Ok(r) => {
				tracing::debug!(codec = i, "Codec succeeded");
				return Ok(r);
			}
			Err(e) => {
				tracing::debug!(codec = i, error=%e, "Codec failed");
				errors.push(e);
			}
		}
	}

	Err(Error::Multi(errors))
}
