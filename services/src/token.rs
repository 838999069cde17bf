//! Session identifiers, OTPs and QR payloads.

use rand::Rng;

pub const OTP_LEN: usize = 6;
const OTP_MIN: u32 = 100_000;
const OTP_MAX: u32 = 999_999;
const QR_PREFIX: &str = "ATTN";

pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Six-digit OTP drawn uniformly from `100000..=999999`.
pub fn generate_otp() -> String {
    generate_otp_with(&mut rand::rng())
}

pub fn generate_otp_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.random_range(OTP_MIN..=OTP_MAX).to_string()
}

/// Opaque payload binding a session to its OTP. Session ids never contain
/// `:`, so two sessions can never share a payload.
pub fn qr_payload(session_id: &str, otp: &str) -> String {
    format!("{QR_PREFIX}:{session_id}:{otp}")
}

/// Splits a payload back into `(session_id, otp)`.
pub fn parse_qr_payload(payload: &str) -> Option<(&str, &str)> {
    let rest = payload.strip_prefix(QR_PREFIX)?.strip_prefix(':')?;
    let (session_id, otp) = rest.rsplit_once(':')?;
    if session_id.is_empty() || session_id.contains(':') || !is_well_formed_otp(otp) {
        return None;
    }
    Some((session_id, otp))
}

pub fn is_well_formed_otp(otp: &str) -> bool {
    otp.len() == OTP_LEN && otp.bytes().all(|b| b.is_ascii_digit())
}

/// Exact, digit-for-digit comparison. No trimming or normalization.
pub fn otp_matches(expected: &str, submitted: &str) -> bool {
    is_well_formed_otp(submitted) && expected == submitted
}
