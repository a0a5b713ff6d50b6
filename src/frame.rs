//! The `name|timestamp|payload|mac` byte layout that ties a value to its name and creation time.
//!
//! Nothing in here does any cryptography; it just shuffles bytes around.  The MAC goes after
//! the final delimiter, and is the only field that may itself contain a `|`.

use super::Error;

const DELIMITER: u8 = b'|';

/// Lay out `name|timestamp|payload|`, ready to have a MAC computed over everything but the
/// trailing delimiter, and then appended after it.
#[tracing::instrument(level = "trace", skip(payload))]
pub(crate) fn build_frame(name: &str, timestamp: i64, payload: &[u8]) -> Vec<u8> {
	let timestamp = timestamp.to_string();

	let mut frame = Vec::with_capacity(name.len() + timestamp.len() + payload.len() + 3);
	frame.extend_from_slice(name.as_bytes());
	frame.push(DELIMITER);
	frame.extend_from_slice(timestamp.as_bytes());
	frame.push(DELIMITER);
	frame.extend_from_slice(payload);
	frame.push(DELIMITER);

	frame
}

/// The fields of a name-stripped frame, borrowed from the decoded token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Fields<'a> {
	pub(crate) timestamp: &'a [u8],
	pub(crate) payload: &'a [u8],
	pub(crate) mac: &'a [u8],
}

impl<'a> Fields<'a> {
	/// The `timestamp|payload` prefix that, with the name prepended, was covered by the MAC.
	pub(crate) fn signed_part(&self, frame: &'a [u8]) -> &'a [u8] {
		&frame[..self.timestamp.len() + 1 + self.payload.len()]
	}
}

/// Split `timestamp|payload|mac` on the first two delimiters.
///
/// Everything after the second delimiter is the MAC, pipes and all.  A missing delimiter, or an
/// empty timestamp or payload, is reported as [`Error::MacInvalid`], so that a mangled token
/// can't be told apart from a forged one.
#[tracing::instrument(level = "trace", skip(frame))]
pub(crate) fn split_frame(frame: &[u8]) -> Result<Fields<'_>, Error> {
	let (timestamp, rest) = split_field(frame)?;
	let (payload, mac) = split_field(rest)?;

	Ok(Fields {
		timestamp,
		payload,
		mac,
	})
}

fn split_field(b: &[u8]) -> Result<(&[u8], &[u8]), Error> {
	match b.iter().position(|&c| c == DELIMITER) {
		Some(0) | None => Err(Error::MacInvalid),
		Some(i) => Ok((&b[..i], &b[i + 1..])),
	}
}

/// Rebuild `name|timestamp|payload` from a split frame and the name the caller expects.
pub(crate) fn mac_input(name: &str, signed_part: &[u8]) -> Vec<u8> {
	let mut v = Vec::with_capacity(name.len() + 1 + signed_part.len());
	v.extend_from_slice(name.as_bytes());
	v.push(DELIMITER);
	v.extend_from_slice(signed_part);

	v
}
