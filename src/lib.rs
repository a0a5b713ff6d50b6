//! Authenticated, and optionally encrypted, values that can be trusted to an untrusted client.
//!
//! If you need to hand a value to someone (most often, a web browser, in a cookie) and have it
//! come back later *exactly* as you sent it, then a [`SecureCookie`] is for you.  It turns a
//! value into a token that can't be forged or modified without the hash key, and can't be read
//! without the block key (if you provided one).  Tokens also carry the time they were created,
//! so that old ones can be refused.
//!
//! Every token is created for a *name* (such as the name of the cookie it's going to be stored
//! in), and will only decode under that same name.  The name isn't stored in the token, so it
//! costs nothing, and it stops a token minted for one purpose being replayed for another.
//!
//! ```rust
//! use secure_cookie::{Codec as _, Error, SecureCookie, generate_random_key};
//! # fn main() -> Result<(), Error> {
//!
//! // In real life, you'd load these from somewhere safe
//! let hash_key = generate_random_key(64).expect("no entropy");
//! let block_key = generate_random_key(32).expect("no entropy");
//!
//! let codec = SecureCookie::new(hash_key, Some(block_key.expose_secret()));
//!
//! let token = codec.encode("session", &("user", 42u64))?;
//! let (who, id): (String, u64) = codec.decode("session", &token)?;
//!
//! assert_eq!(("user", 42), (who.as_str(), id));
//! # Ok(())
//! # }
//! ```
//!
//! # Key Rotation
//!
//! Every key should be replaced now and then.  To do that without instantly invalidating every
//! token already out in the world, create a list of codecs with [`codecs_from_pairs`], newest
//! keys first, and use [`encode_multi`] and [`decode_multi`].  New tokens are always created
//! with the first codec that works, while tokens created with any of the codecs can still be
//! decoded.
//!
//! # Errors
//!
//! Whatever [`Error`] you get from decoding, the token shouldn't be trusted.  In particular,
//! a token that has been tampered with and a token that was never a token at all both produce
//! [`Error::MacInvalid`]; there's deliberately no telling them apart.
mod block_cipher;
mod clock;
mod codec;
mod encoding;
mod error;
mod frame;
mod mac;
mod multi;
mod secure_cookie;
mod transcoder;

pub use ::ciborium;

pub use block_cipher::{AesCipher, BlockCipher};
pub use clock::{Clock, SystemClock};
pub use codec::Codec;
pub use error::{Error, MultiError};
pub use mac::HashFunction;
pub use multi::{codecs_from_pairs, decode_multi, encode_multi};
pub use secure_cookie::{DEFAULT_MAX_AGE, DEFAULT_MAX_LENGTH, SecureCookie};
pub use transcoder::Coder;

use transcoder::Transcoder;

mod key;
mod key_id;

pub use key::{Key, generate_random_key};
use key_id::{KeyId, key_id};

#[cfg(test)]
pub(crate) fn init_test_tracing() {
	use std::sync::Once;
	use tracing_subscriber::{layer::SubscriberExt as _, registry::Registry};

	static INIT: Once = Once::new();

	INIT.call_once(|| {
		let layer = tracing_tree::HierarchicalLayer::default()
			.with_writer(tracing_subscriber::fmt::TestWriter::new())
			.with_indent_lines(true)
			.with_indent_amount(2)
			.with_targets(true);

		let sub = Registry::default().with(layer);
		tracing::subscriber::set_global_default(sub).unwrap();
	});
}
