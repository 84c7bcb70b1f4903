//! ICS-20 transfer handler.
//!
//! `TransferModule` is the receive side of the fungible token transfer
//! application: it decodes the packet, mints a voucher for foreign denoms
//! (recording its denom trace) or releases escrow for tokens returning home,
//! and produces the acknowledgement. Everything it writes is discarded when
//! the acknowledgement is an error.
//!
//! Amounts are uint256 on the wire and are narrowed to the ledger's
//! `Uint128`; larger amounts are refused with an error acknowledgement.
//!
//! The contract never sends transfers, so nothing is ever escrowed in
//! production: a packet carrying a denom that names this chain as its
//! source is refused with `InsufficientEscrow` and refunded by the
//! counterparty.

use std::str::FromStr;

use cosmwasm_std::{from_json, Api, Event, IbcPacket, Storage, Uint128, Uint256};

use common::{FungibleTokenPacketData, Ics20Ack, InboundTransfer};

use crate::cache::StorageTransaction;
use crate::error::TransferError;
use crate::hash::{denom_trace_hash, voucher_denom};
use crate::ledger::Ledger;
use crate::state::{DenomTrace, CHANNELS, CHANNEL_ESCROW, DENOM_TRACES};

/// Event emitted for every received transfer packet
pub const TRANSFER_EVENT: &str = "fungible_token_packet";

/// What a packet receiver hands back to the IBC entry point
#[derive(Clone, Debug, PartialEq)]
pub struct Receipt {
    pub ack: Ics20Ack,
    pub events: Vec<Event>,
    /// Credited transfer, present only with a success acknowledgement
    pub transfer: Option<InboundTransfer>,
}

/// Receive half of an IBC application
pub trait PacketReceiver {
    /// Handle one inbound packet. Never fails: failures are encoded in the
    /// acknowledgement of the returned receipt.
    fn on_recv_packet(
        &self,
        storage: &mut dyn Storage,
        api: &dyn Api,
        packet: &IbcPacket,
    ) -> Receipt;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TransferModule<L: Ledger> {
    pub ledger: L,
}

impl<L: Ledger> TransferModule<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    fn receive(
        &self,
        storage: &mut dyn Storage,
        api: &dyn Api,
        packet: &IbcPacket,
    ) -> Result<InboundTransfer, TransferError> {
        let channel = &packet.dest.channel_id;
        if !CHANNELS.has(storage, channel) {
            return Err(TransferError::UnknownChannel {
                channel: channel.clone(),
            });
        }

        let data: FungibleTokenPacketData =
            from_json(&packet.data).map_err(|e| TransferError::InvalidPacketData {
                reason: e.to_string(),
            })?;
        if data.denom.is_empty() {
            return Err(TransferError::InvalidPacketData {
                reason: "empty denom".to_string(),
            });
        }

        let wire_amount = Uint256::from_str(&data.amount)
            .ok()
            .filter(|a| !a.is_zero())
            .ok_or_else(|| TransferError::InvalidAmount {
                amount: data.amount.clone(),
            })?;
        let amount = Uint128::try_from(wire_amount).map_err(|_| TransferError::AmountOverflow {
            amount: data.amount.clone(),
        })?;
        let receiver =
            api.addr_validate(&data.receiver)
                .map_err(|_| TransferError::InvalidReceiver {
                    receiver: data.receiver.clone(),
                })?;

        let source_prefix = format!("{}/{}/", packet.src.port_id, packet.src.channel_id);
        let denom = match data.denom.strip_prefix(&source_prefix) {
            // Token originally sent from this chain coming back: release escrow
            Some(unprefixed) => {
                let local = if unprefixed.contains('/') {
                    voucher_denom(unprefixed)
                } else {
                    unprefixed.to_string()
                };
                let available = CHANNEL_ESCROW
                    .may_load(storage, (channel.as_str(), local.as_str()))?
                    .unwrap_or_default();
                if available < amount {
                    return Err(TransferError::InsufficientEscrow {
                        denom: local,
                        available,
                        requested: amount,
                    });
                }
                CHANNEL_ESCROW.save(
                    storage,
                    (channel.as_str(), local.as_str()),
                    &(available - amount),
                )?;
                local
            }
            // Foreign token: mint a voucher under this chain's prefix
            None => {
                let full_path = format!("{}/{}/{}", packet.dest.port_id, channel, data.denom);
                let trace = parse_denom_trace(&full_path);
                DENOM_TRACES.save(storage, &denom_trace_hash(&full_path), &trace)?;
                voucher_denom(&full_path)
            }
        };

        self.ledger.credit(storage, &receiver, &denom, amount)?;

        Ok(InboundTransfer {
            denom,
            amount,
            sender: data.sender,
            receiver,
            source_channel: channel.clone(),
            sequence: packet.sequence,
        })
    }
}

impl<L: Ledger> PacketReceiver for TransferModule<L> {
    fn on_recv_packet(
        &self,
        storage: &mut dyn Storage,
        api: &dyn Api,
        packet: &IbcPacket,
    ) -> Receipt {
        let mut tx = StorageTransaction::new(storage);
        match self.receive(&mut tx, api, packet) {
            Ok(transfer) => {
                tx.commit();
                let event = Event::new(TRANSFER_EVENT)
                    .add_attribute("module", "transfer")
                    .add_attribute("sender", &transfer.sender)
                    .add_attribute("receiver", transfer.receiver.as_str())
                    .add_attribute("denom", &transfer.denom)
                    .add_attribute("amount", transfer.amount)
                    .add_attribute("success", "true");
                Receipt {
                    ack: Ics20Ack::success(),
                    events: vec![event],
                    transfer: Some(transfer),
                }
            }
            Err(err) => {
                tx.rollback();
                let event = Event::new(TRANSFER_EVENT)
                    .add_attribute("module", "transfer")
                    .add_attribute("success", "false")
                    .add_attribute("error", err.to_string());
                Receipt {
                    ack: Ics20Ack::fail(err.to_string()),
                    events: vec![event],
                    transfer: None,
                }
            }
        }
    }
}

/// Split `port/channel-N/.../base` into its hop path and base denom.
///
/// Hops are consumed while a segment pair looks like `<port>/channel-<n>`;
/// the rest, slashes included, is the base denom.
pub fn parse_denom_trace(full_path: &str) -> DenomTrace {
    let segments: Vec<&str> = full_path.split('/').collect();
    let mut hops = 0;
    while hops + 2 < segments.len() && segments[hops + 1].starts_with("channel-") {
        hops += 2;
    }
    DenomTrace {
        path: segments[..hops].join("/"),
        base_denom: segments[hops..].join("/"),
    }
}
