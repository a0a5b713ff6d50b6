use hkdf::Hkdf;
use sha2::Sha256;

use super::Key;

type Kid = [u8; 8];

#[allow(clippy::derived_hash_with_manual_eq)] // k1 == k2 => hash(k1) == hash(k2) will hold
#[derive(Clone, Copy, Debug, Hash)]
#[repr(transparent)]
pub(super) struct KeyId(Kid);

impl PartialEq for KeyId {
	fn eq(&self, other: &Self) -> bool {
		constant_time_eq::constant_time_eq_n(&self.0, &other.0)
	}
}

impl Eq for KeyId {}

impl std::fmt::Display for KeyId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for b in &self.0 {
			f.write_fmt(format_args!("{b:02x}"))?;
		}

		Ok(())
	}
}

/// Get a reasonably-unique ID for a key, safe to put in logs
#[tracing::instrument(level = "trace", skip(key))]
pub(super) fn key_id(key: &Key) -> KeyId {
	let mut id: Kid = Default::default();

	Hkdf::<Sha256>::new(None, key.expose_secret())
		.expand(b"key_id", &mut id)
		.expect("key_id is far shorter than the HKDF output limit");

	KeyId(id)
}
