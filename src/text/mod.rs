//! Text normalization for search.
//!
//! - [`normalize`]: canonical search form plus offset mapping
//! - [`DiffTable`]: normalized-to-original offset table
//! - [`char_type`]: character classes used by matching

pub mod char_type;
mod diff;
mod normalize;

pub use char_type::CharacterType;
pub use diff::DiffTable;
pub use normalize::{normalize, NormalizedText};
