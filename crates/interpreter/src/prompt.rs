// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prompt construction for contract interpretation
//!
//! The completion model has a 10k-token budget per request, so the embedded
//! source is limited to 9.5k characters, using character count as a cheap
//! proxy for token count. Truncation is silent: the model sees a shorter
//! contract, not a marker.

/// Character ceiling for the source embedded in the user prompt
pub const MAX_SOURCE_CHARS: usize = 9500;

/// Fixed persona instruction sent as the system message
pub fn system_prompt() -> &'static str {
    "You are a web3 developer skilled in explaining complex smart contracts in natural language"
}

/// Build the user prompt around the (possibly truncated) source
pub fn user_prompt(source: &str) -> String {
    let limited = limit_source_chars(source);
    format!(
        "Give a synopsis of the general functionality described in the following smart contract source code:\n\n\
         {limited}\n\n\
         Please respond in markdown format and be concise. Don't explain the individual error codes, constants, etc.. Explain the overall meaning and function of the contract"
    )
}

/// Truncate source to the character budget
///
/// Splits on single spaces and accumulates tokens while the running count of
/// token characters stays within [`MAX_SOURCE_CHARS`]; the token that would
/// cross the ceiling is dropped along with everything after it. Whitespace
/// other than the single space separators counts toward the tokens it is
/// embedded in.
pub fn limit_source_chars(source: &str) -> String {
    let mut limited = String::new();
    let mut char_count = 0;

    for token in source.split(' ') {
        if char_count + token.len() > MAX_SOURCE_CHARS {
            break;
        }
        limited.push_str(token);
        limited.push(' ');
        char_count += token.len();
    }

    limited.trim().to_string()
}
