#[derive(Debug, thiserror::Error, thiserror_ext::Construct)]
#[non_exhaustive]
pub enum Error {
	#[error("hash key is not set")]
	NoHashKey,

	#[error("no block key set")]
	NoBlockKey,

	#[error("invalid key: {0}")]
	InvalidKey(String),

	#[error("the value is not valid")]
	MacInvalid,

	#[error("invalid timestamp")]
	TimestampInvalid,

	#[error("timestamp too new")]
	TooNew,

	#[error("expired")]
	Expired,

	#[error("value too long")]
	TooLong,

	#[error("the value is not correctly encoded")]
	InvalidValue,

	#[error("failed to encrypt value")]
	Encryption,

	#[error("the value could not be decrypted")]
	Decryption,

	#[error("value serialization failure: {cause}")]
	Serialization {
		cause: Box<dyn std::error::Error + Send + Sync>,
	},

	#[error("value deserialization failure: {cause}")]
	Deserialization {
		cause: Box<dyn std::error::Error + Send + Sync>,
	},

	#[error("no codecs provided")]
	NoCodecs,

	#[error("{0}")]
	Multi(MultiError),

	#[error("CAN'T HAPPEN: {0}")]
	Insanity(String),
}

/// The collected failures of every codec tried by
/// [`encode_multi`](crate::encode_multi) or [`decode_multi`](crate::decode_multi), in the
/// order the codecs were tried.
#[derive(Debug, Default)]
pub struct MultiError(Vec<Error>);

impl MultiError {
	pub(crate) fn push(&mut self, e: Error) {
		self.0.push(e);
	}

	/// How many codecs failed.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// The failure reported by the first codec tried.
	pub fn first(&self) -> Option<&Error> {
		self.0.first()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Error> {
		self.0.iter()
	}
}

impl From<Vec<Error>> for MultiError {
	fn from(errors: Vec<Error>) -> Self {
		Self(errors)
	}
}

impl std::fmt::Display for MultiError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.0.as_slice() {
			[] => f.write_str("(0 errors)"),
			[e] => write!(f, "{e}"),
			[e, _] => write!(f, "{e} (and 1 other error)"),
			[e, rest @ ..] => write!(f, "{e} (and {} other errors)", rest.len()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn multi_error_messages() {
		assert_eq!("(0 errors)", MultiError::default().to_string());
		assert_eq!(
			"expired",
			MultiError::from(vec![Error::Expired]).to_string()
		);
		assert_eq!(
			"expired (and 1 other error)",
			MultiError::from(vec![Error::Expired, Error::MacInvalid]).to_string()
		);
		assert_eq!(
			"hash key is not set (and 2 other errors)",
			MultiError::from(vec![Error::NoHashKey, Error::MacInvalid, Error::TooLong])
				.to_string()
		);
	}

	#[test]
	fn multi_error_exposes_first_failure() {
		let errs = MultiError::from(vec![Error::TooNew, Error::MacInvalid]);

		assert_eq!(2, errs.len());
		assert!(matches!(errs.first(), Some(Error::TooNew)));
		assert!(errs.iter().skip(1).all(|e| matches!(e, Error::MacInvalid)));
	}
}
