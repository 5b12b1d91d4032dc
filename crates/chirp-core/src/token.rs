//! Session-token and one-time-password generation
//!
//! The token's opaqueness is the only authorization factor, so both
//! generators draw from the OS CSPRNG.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Raw length of a session token before hex encoding.
pub const SESSION_TOKEN_BYTES: usize = 16;

/// Number of decimal digits in a one-time password.
pub const OTP_DIGITS: usize = 6;

/// Generate an opaque session token: fixed-length random bytes, hex-encoded.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Generate a 6-digit numeric one-time password, zero-padded.
pub fn generate_otp_code() -> String {
    format!("{:06}", OsRng.gen_range(0..1_000_000u32))
}
