//! Storage-related types for the swap service.

use std::str::FromStr;

/// Storage namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
	/// Settlement receipts keyed by order hash.
	Swaps,
}

impl StorageKey {
	/// Key prefix used by storage backends.
	pub fn as_str(&self) -> &'static str {
		match self {
			StorageKey::Swaps => "swaps",
		}
	}

	/// Iterates over every namespace.
	pub fn all() -> impl Iterator<Item = Self> {
		[Self::Swaps].into_iter()
	}
}

impl FromStr for StorageKey {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"swaps" => Ok(Self::Swaps),
			_ => Err(()),
		}
	}
}

impl From<StorageKey> for &'static str {
	fn from(key: StorageKey) -> Self {
		key.as_str()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_storage_key_round_trips_through_str() {
		for key in StorageKey::all() {
			assert_eq!(key.as_str().parse::<StorageKey>(), Ok(key));
		}
		assert!("orders".parse::<StorageKey>().is_err());
	}
}
