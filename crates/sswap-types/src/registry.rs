//! Registry trait for pluggable implementations.
//!
//! Ledger and storage backends each expose a `Registry` type that ties the
//! name used under `implementations.<name>` in the configuration file to the
//! factory that builds the backend.

/// Binds a configuration name to a factory function.
pub trait ImplementationRegistry {
	/// Key under `<section>.implementations` that selects this implementation,
	/// e.g. `"memory"` for `[storage.implementations.memory]`.
	const NAME: &'static str;

	/// Factory signature, defined by the owning crate.
	type Factory;

	fn factory() -> Self::Factory;
}
