//! ICS-20 wire types.
//!
//! Packet data and acknowledgement envelopes as defined by the fungible token
//! transfer standard. Both are JSON encoded on the wire.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Binary, StdResult};

/// ICS-20 version string negotiated during the channel handshake
pub const ICS20_VERSION: &str = "ics20-1";

/// Port id of the transfer application
pub const TRANSFER_PORT: &str = "transfer";

/// Packet payload of an ICS-20 transfer
#[cw_serde]
pub struct FungibleTokenPacketData {
    /// Denom trace as seen by the sender, e.g. `uatom` or `transfer/channel-3/uatom`
    pub denom: String,
    /// Decimal string amount (u256 on the wire, u128 accepted here)
    pub amount: String,
    /// Sender address on the counterparty chain
    pub sender: String,
    /// Receiver address on this chain
    pub receiver: String,
    /// Optional memo, ignored by the transfer handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// ICS-20 acknowledgement.
///
/// `Result` carries `[0x01]` on success; `Error` carries a human readable
/// reason that the source chain uses to refund the sender.
#[cw_serde]
pub enum Ics20Ack {
    Result(Binary),
    Error(String),
}

impl Ics20Ack {
    pub fn success() -> Self {
        Ics20Ack::Result(Binary::from(vec![1u8]))
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Ics20Ack::Error(reason.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Ics20Ack::Result(_))
    }

    pub fn to_binary(&self) -> StdResult<Binary> {
        to_json_binary(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_wire_format() {
        let ok = Ics20Ack::success().to_binary().unwrap();
        assert_eq!(ok.as_slice(), br#"{"result":"AQ=="}"#);

        let err = Ics20Ack::fail("invalid amount").to_binary().unwrap();
        assert_eq!(err.as_slice(), br#"{"error":"invalid amount"}"#);
    }

    #[test]
    fn test_packet_memo_optional() {
        let data: FungibleTokenPacketData = cosmwasm_std::from_json(
            br#"{"denom":"uatom","amount":"10","sender":"cosmos1a","receiver":"althea1b"}"#,
        )
        .unwrap();
        assert_eq!(data.memo, None);
        assert_eq!(data.amount, "10");
    }
}
