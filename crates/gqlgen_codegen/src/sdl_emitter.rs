//! Emits `sdl.rs`, which embeds the source SDL.

use crate::literal::rust_string;
use crate::BANNER;

/// Renders the SDL as a `SCHEMA_SDL` constant, as a raw string when possible.
#[must_use]
pub fn emit(sdl: &str) -> String {
    let literal = if sdl.contains('\r') {
        rust_string(sdl)
    } else {
        let hashes = "#".repeat(longest_hash_run(sdl) + 1);
        format!("r{hashes}\"{sdl}\"{hashes}")
    };
    format!("{BANNER}\n\n/// The SDL this module was generated from.\npub const SCHEMA_SDL: &str = {literal};\n")
}

/// Longest run of `#` directly after a `"`, which a raw string's delimiter
/// must exceed.
fn longest_hash_run(text: &str) -> usize {
    text.split('"')
        .skip(1)
        .map(|rest| rest.len() - rest.trim_start_matches('#').len())
        .max()
        .unwrap_or(0)
}
