// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Source-code sanitization
//!
//! Explorer responses for verified contracts frequently carry the full GPL
//! license text appended after the code itself. Everything from the license
//! banner onwards is boilerplate and is dropped before the source is shown
//! or handed to the interpreter.

/// First line of the appended license block in explorer payloads.
const LICENSE_MARKER: &str = "GNU GENERAL PUBLIC LICENSE";

/// Strips trailing license boilerplate from raw explorer source text.
///
/// Returns the prefix of `raw` up to, and not including, the first line that
/// contains the license marker; the newline separating that line from the
/// code is dropped as well. When no marker is present the input is returned
/// unchanged. Lines are separated by `\n` only, `\r\n` is not normalized.
///
/// The result is always a subslice of the input, so the sanitized source is
/// a line-wise prefix of the raw source by construction.
pub fn strip_license_boilerplate(raw: &str) -> &str {
    let mut offset: usize = 0;
    for line in raw.split('\n') {
        if line.contains(LICENSE_MARKER) {
            return &raw[..offset.saturating_sub(1)];
        }
        offset += line.len() + 1;
    }
    raw
}
