// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Symbol and sequence codec: characters, strings and ordered lists as links.

mod balanced;
mod unicode;

pub use balanced::{balanced_sequence, sequence_to_records};
pub use unicode::UnicodeCodec;
