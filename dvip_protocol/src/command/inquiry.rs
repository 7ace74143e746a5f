use super::TERMINATOR;
use binrw::binrw;

/// Datavideo full status inquiry: `09 7e 7e 70 ff`
///
/// Polled periodically to keep the camera's view of the connection alive.
/// Replies are not decoded.
#[binrw]
#[brw(big)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FullStatusInquiry {
    #[br(temp, assert(terminator == TERMINATOR))]
    #[bw(calc = TERMINATOR)]
    terminator: u8,
}

pub const FULL_STATUS_INQUIRY: FullStatusInquiry = FullStatusInquiry {};
