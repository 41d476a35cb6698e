//! Traits shared by structures and reports across the micella crates.

/// Identity derived from content rather than from a name.
///
/// Two values with the same content hash describe the same thing; structures
/// use it to check that a normalization step is idempotent.
pub trait ContentAddressable {
    /// Lowercase hex digest.
    fn content_hash(&self) -> String;
}

/// A value with a display name, such as a named structure.
pub trait Annotated {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }
}

/// One-line human-readable description, used in text reports.
pub trait Summarizable {
    fn summary(&self) -> String;
}
